use std::sync::LazyLock;

use regex::Regex;

/// Raw pieces of one recognized chunk wrapper: the numeric chunk id and the
/// not-yet-parsed module-map source.
#[derive(Debug)]
pub struct ExtractedChunk {
  pub chunk_id: u64,
  pub map_source: String,
}

// `(self.<g> = self.<g> || []).push([[<id>], {` — the `regex` crate has no
// backreferences, so both global-name occurrences are captured and compared
// in code.
static CHUNK_WRAPPER_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"\(\s*self\.([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*self\.([A-Za-z_$][A-Za-z0-9_$]*)\s*\|\|\s*\[\s*\]\s*\)\s*\.push\(\s*\[\s*\[\s*([0-9]+)\s*\]\s*,\s*\{",
  )
  .unwrap()
});

/// Probes `source` for the bundler's self-assigning push-array wrapper.
/// `None` means "not a chunk" — the expected outcome for most files a caller
/// probes, not an error.
pub fn extract_chunk(source: &str) -> Option<ExtractedChunk> {
  let captures = CHUNK_WRAPPER_RE.captures(source)?;
  if captures.get(1)?.as_str() != captures.get(2)?.as_str() {
    return None;
  }
  let chunk_id = captures.get(3)?.as_str().parse().ok()?;

  // The map slice runs from its opening `{` to the `])` closing the push
  // call. An optional trailing callback argument survives inside the slice;
  // re-wrapped in parentheses it still parses, as a sequence expression.
  let map_start = captures.get(0)?.end() - 1;
  let map_end = find_map_end(source, map_start)?;

  Some(ExtractedChunk { chunk_id, map_source: source[map_start..map_end].to_string() })
}

/// Position of the `]` closing the push payload: the first `])` at bracket
/// depth zero after `from`. Quoted spans and comments do not count toward
/// the depth; regex literals are scanned as plain text.
fn find_map_end(source: &str, from: usize) -> Option<usize> {
  let bytes = source.as_bytes();
  let mut depth = 0usize;
  let mut i = from;
  while i < bytes.len() {
    match bytes[i] {
      quote @ (b'\'' | b'"' | b'`') => {
        i += 1;
        while i < bytes.len() && bytes[i] != quote {
          i += if bytes[i] == b'\\' { 2 } else { 1 };
        }
      }
      b'/' if bytes.get(i + 1) == Some(&b'/') => {
        while i < bytes.len() && bytes[i] != b'\n' {
          i += 1;
        }
      }
      b'/' if bytes.get(i + 1) == Some(&b'*') => {
        i += 2;
        while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
          i += 1;
        }
        i += 1;
      }
      b'(' | b'[' | b'{' => depth += 1,
      b']' if depth == 0 => return (bytes.get(i + 1) == Some(&b')')).then_some(i),
      b')' | b'}' if depth == 0 => return None,
      b')' | b']' | b'}' => depth -= 1,
      _ => {}
    }
    i += 1;
  }
  None
}

#[cfg(test)]
mod tests {
  use super::extract_chunk;

  #[test]
  fn captures_chunk_id_and_map() {
    let extracted = extract_chunk(
      "(self.webpackChunk = self.webpackChunk || []).push([[452], { 1: (e) => {} }]);",
    )
    .unwrap();
    assert_eq!(extracted.chunk_id, 452);
    assert_eq!(extracted.map_source, "{ 1: (e) => {} }");
  }

  #[test]
  fn accepts_trailing_callback_argument() {
    let extracted = extract_chunk(
      "(self.chunks = self.chunks || []).push([[7], { 1: (e) => {} }, function() {}]);",
    )
    .unwrap();
    assert_eq!(extracted.chunk_id, 7);
    assert_eq!(extracted.map_source, "{ 1: (e) => {} }, function() {}");
  }

  #[test]
  fn ignores_bracket_pairs_in_strings_and_trailing_code() {
    let extracted = extract_chunk(
      r#"(self.c = self.c || []).push([[9], { 1: (e) => { var s = "]) nope"; } }]); f(x[0]);"#,
    )
    .unwrap();
    assert_eq!(extracted.chunk_id, 9);
    assert_eq!(extracted.map_source, r#"{ 1: (e) => { var s = "]) nope"; } }"#);
  }

  #[test]
  fn rejects_unterminated_map() {
    assert!(extract_chunk("(self.c = self.c || []).push([[9], { 1: (e) => {} }").is_none());
  }

  #[test]
  fn rejects_mismatched_global_names() {
    assert!(extract_chunk("(self.a = self.b || []).push([[1], {}]);").is_none());
  }

  #[test]
  fn rejects_non_chunk_source() {
    assert!(extract_chunk("export const answer = 42;").is_none());
    assert!(extract_chunk("").is_none());
  }
}

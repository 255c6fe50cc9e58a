pub fn sanitize_file_name(str: &str) -> String {
  let mut sanitized = String::with_capacity(str.len());
  for char in str.chars() {
    if char.is_ascii_alphanumeric() || matches!(char, '-' | '_' | '.') {
      sanitized.push(char);
    } else {
      sanitized.push('_');
    }
  }
  sanitized
}

/// Maps a module id onto a writable relative file path. Ids are allowed to
/// look like paths (`./src/main.js`), so separators are kept while every
/// component is sanitized and traversal components are neutralized.
pub fn sanitize_module_file_name(id: &str) -> String {
  let id = id.strip_prefix("./").unwrap_or(id);

  let mut path = String::with_capacity(id.len() + 3);
  for (index, component) in id.split('/').enumerate() {
    if index > 0 {
      path.push('/');
    }
    if component.is_empty() || component == "." || component == ".." {
      path.push('_');
    } else {
      path.push_str(&sanitize_file_name(component));
    }
  }

  if !(path.ends_with(".js") || path.ends_with(".mjs") || path.ends_with(".cjs")) {
    path.push_str(".js");
  }
  path
}

#[test]
fn test_sanitize_file_name() {
  assert_eq!(sanitize_file_name("\0+a=Z_0-"), "__a_Z_0-");
  assert_eq!(sanitize_file_name("main.js"), "main.js");
}

#[test]
fn test_sanitize_module_file_name() {
  assert_eq!(sanitize_module_file_name("452"), "452.js");
  assert_eq!(sanitize_module_file_name("./src/main.js"), "src/main.js");
  assert_eq!(sanitize_module_file_name("../evil"), "_/evil.js");
  assert_eq!(sanitize_module_file_name("a//b"), "a/_/b.js");
}

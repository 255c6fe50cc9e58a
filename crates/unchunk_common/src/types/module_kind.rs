use serde::Serialize;

/// Shape verdict for one module. Decided once, before any rewriting, and
/// never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModuleKind {
  #[serde(rename = "cjs")]
  CommonJs,
  #[serde(rename = "esm")]
  Esm,
}

impl ModuleKind {
  pub fn is_commonjs(self) -> bool {
    matches!(self, Self::CommonJs)
  }
}

impl std::fmt::Display for ModuleKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::CommonJs => f.write_str("CJS"),
      Self::Esm => f.write_str("ESM"),
    }
  }
}

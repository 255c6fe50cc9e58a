use arcstr::ArcStr;
use unchunk_utils::concat_string;

/// `ModuleId` is the unique string key of a module within a chunk, after any
/// caller-supplied remapping has been applied. Bundle keys are sometimes
/// plain integers (`"452"`) and sometimes path-like (`"./src/main.js"`).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  /// The specifier a resynthesized import of this module should carry.
  pub fn import_source(&self) -> String {
    if self.0.starts_with("./") || self.0.starts_with("../") {
      self.0.to_string()
    } else {
      concat_string!("./", self.0)
    }
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl From<&str> for ModuleId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<String> for ModuleId {
  fn from(value: String) -> Self {
    Self::new(value)
  }
}

#[test]
fn test_import_source() {
  assert_eq!(ModuleId::new("452").import_source(), "./452");
  assert_eq!(ModuleId::new("./src/main.js").import_source(), "./src/main.js");
  assert_eq!(ModuleId::new("../shared").import_source(), "../shared");
}

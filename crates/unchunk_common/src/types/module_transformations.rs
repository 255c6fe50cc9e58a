use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Caller-supplied rename tables, keyed by the *raw* bundle key as it
/// appears in the module map (before any renaming). Read-only to the core.
pub type ModuleTransformations = FxHashMap<String, ModuleTransformation>;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleTransformation {
  /// Replacement module id, applied before the id is first used anywhere.
  pub rename_module: Option<String>,
  /// New binding names keyed by per-module variable index.
  pub rename_variables: FxHashMap<u32, String>,
}

#[test]
fn deserializes_from_json() {
  let table: ModuleTransformations = serde_json::from_str(
    r#"{ "452": { "renameModule": "math", "renameVariables": { "0": "sum" } } }"#,
  )
  .unwrap();
  let transformation = &table["452"];
  assert_eq!(transformation.rename_module.as_deref(), Some("math"));
  assert_eq!(transformation.rename_variables[&0], "sum");
}

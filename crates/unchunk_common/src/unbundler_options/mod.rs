pub mod normalized_unbundler_options;

use crate::{ModuleTransformations, SharedDependencyGraph};

#[derive(Default, Debug, Clone)]
pub struct UnbundlerOptions {
  /// When `false`, default exports are emitted as `module.exports =`
  /// assignments even for ESM-shaped modules. Defaults to `true`.
  pub esm_default_exports: Option<bool>,
  pub include_variable_declaration_comments: Option<bool>,
  pub include_variable_reference_comments: Option<bool>,
  pub module_transformations: Option<ModuleTransformations>,
  /// Output directory; persistence is off when `None`.
  pub dir: Option<String>,
  /// Shared graph sink; a fresh graph is created when `None`.
  pub graph: Option<SharedDependencyGraph>,
}

use crate::ModuleTransformations;

#[allow(clippy::struct_excessive_bools)] // Using raw booleans is more clear in this case
#[derive(Debug)]
pub struct NormalizedUnbundlerOptions {
  pub esm_default_exports: bool,
  pub include_variable_declaration_comments: bool,
  pub include_variable_reference_comments: bool,
  pub module_transformations: ModuleTransformations,
  pub dir: Option<String>,
}

impl NormalizedUnbundlerOptions {
  pub fn wants_variable_comments(&self) -> bool {
    self.include_variable_declaration_comments || self.include_variable_reference_comments
  }
}

mod classify;
mod export_resynthesizer;
mod import_resynthesizer;
mod matchers;
mod rename_applier;
mod scope_renamer;
mod variable_annotator;

pub use self::{
  classify::classify_module, export_resynthesizer::resynthesize_exports,
  import_resynthesizer::resynthesize_imports, scope_renamer::align_scope_names,
  variable_annotator::annotate_variables,
};

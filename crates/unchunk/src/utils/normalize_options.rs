use unchunk_common::{NormalizedUnbundlerOptions, SharedDependencyGraph, UnbundlerOptions};

pub struct NormalizeOptionsReturn {
  pub options: NormalizedUnbundlerOptions,
  pub graph: SharedDependencyGraph,
}

pub fn normalize_options(mut raw_options: UnbundlerOptions) -> NormalizeOptionsReturn {
  let graph = raw_options.graph.take().unwrap_or_default();

  let normalized = NormalizedUnbundlerOptions {
    esm_default_exports: raw_options.esm_default_exports.unwrap_or(true),
    include_variable_declaration_comments: raw_options
      .include_variable_declaration_comments
      .unwrap_or(false),
    include_variable_reference_comments: raw_options
      .include_variable_reference_comments
      .unwrap_or(false),
    module_transformations: raw_options.module_transformations.unwrap_or_default(),
    dir: raw_options.dir,
  };

  NormalizeOptionsReturn { options: normalized, graph }
}

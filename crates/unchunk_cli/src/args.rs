use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct InputArgs {
  /// Files to probe for chunk wrappers.
  #[clap(required = true)]
  pub inputs: Vec<PathBuf>,

  /// JSON file with per-module rename tables.
  #[clap(long)]
  pub transformations: Option<PathBuf>,
}

#[derive(Args)]
pub struct OutputArgs {
  /// Directory to write the split module files into.
  #[clap(long, short = 'd')]
  pub dir: Option<String>,

  /// Write a JSON snapshot of the dependency graph to this path.
  #[clap(long)]
  pub graph: Option<PathBuf>,

  /// Emit `module.exports =` assignments instead of `export default`.
  #[clap(long)]
  pub cjs_default_exports: bool,
}

#[derive(Args)]
pub struct AnnotateArgs {
  /// Mark each variable declaration with its index.
  #[clap(long)]
  pub declaration_comments: bool,

  /// Mark each variable reference with its index.
  #[clap(long)]
  pub reference_comments: bool,
}

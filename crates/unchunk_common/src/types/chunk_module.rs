use unchunk_ecmascript::EcmaAst;
use unchunk_utils::FxIndexSet;

use crate::{ModuleId, ModuleKind};

#[derive(Debug)]
pub struct ChunkModule {
  pub ast: EcmaAst,
  /// Printed output of the rewritten tree, rendered once and never mutated
  /// afterwards.
  pub source_text: String,
  pub module_kind: ModuleKind,
  /// Every distinct module this one imports, in first-sighting order.
  pub imported_modules: FxIndexSet<ModuleId>,
}

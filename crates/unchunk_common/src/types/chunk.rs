use unchunk_utils::FxIndexMap;

use crate::{ChunkModule, ModuleId};

/// One recognized bundler chunk: its numeric id plus every module that
/// survived splitting, in module-map declaration order. Immutable once
/// returned to the caller.
#[derive(Debug)]
pub struct Chunk {
  pub chunk_id: u64,
  pub modules: FxIndexMap<ModuleId, ChunkModule>,
}

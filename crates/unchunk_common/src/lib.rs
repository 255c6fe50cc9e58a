mod types;
mod unbundler_options;

pub use crate::{
  types::{
    chunk::Chunk,
    chunk_module::ChunkModule,
    dependency_graph::{
      DependencyGraph, GraphEdge, GraphNode, GraphSnapshot, NodeAttrs, SharedDependencyGraph,
    },
    module_id::ModuleId,
    module_kind::ModuleKind,
    module_transformations::{ModuleTransformation, ModuleTransformations},
    variable_idx::VariableIdx,
  },
  unbundler_options::{
    UnbundlerOptions, normalized_unbundler_options::NormalizedUnbundlerOptions,
  },
};

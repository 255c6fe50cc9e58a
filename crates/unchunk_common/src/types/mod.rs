pub mod chunk;
pub mod chunk_module;
pub mod dependency_graph;
pub mod module_id;
pub mod module_kind;
pub mod module_transformations;
pub mod variable_idx;

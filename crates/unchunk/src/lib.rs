mod extract_stage;
mod rewrite_stage;
mod split_stage;
mod unbundler;
mod utils;

pub use crate::unbundler::Unbundler;
pub use unchunk_common::*;

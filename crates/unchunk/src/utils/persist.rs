use std::path::{Path, PathBuf};

use futures::future::join_all;
use unchunk_common::Chunk;
use unchunk_error::{BuildError, BuildResult};
use unchunk_utils::{concat_string, sanitize_file_name::sanitize_module_file_name};

/// Writes one source file per module plus the pre-split module map, each
/// under a header naming chunk id, module id and detected kind. The writes
/// are independent futures joined once at the end, so on return every
/// artifact is on disk and IO failures arrive aggregated.
pub async fn persist_chunk(dir: &str, chunk: &Chunk, map_source: &str) -> BuildResult<()> {
  let dir = Path::new(dir);
  tokio::fs::create_dir_all(dir).await.map_err(anyhow::Error::from)?;

  let mut chunk_id_buffer = itoa::Buffer::new();
  let chunk_id = chunk_id_buffer.format(chunk.chunk_id);

  let mut writes = Vec::with_capacity(chunk.modules.len() + 1);
  for (id, module) in &chunk.modules {
    let header = concat_string!(
      "// chunk: ",
      chunk_id,
      " | module: ",
      id,
      " | kind: ",
      module.module_kind.to_string(),
      "\n"
    );
    writes.push(write_artifact(
      dir.join(sanitize_module_file_name(id)),
      concat_string!(header, module.source_text),
    ));
  }

  let map_header = concat_string!("// chunk: ", chunk_id, " | module map\n");
  writes.push(write_artifact(
    dir.join(concat_string!("chunk_", chunk_id, ".modules.js")),
    concat_string!(map_header, map_source),
  ));

  let errors: Vec<anyhow::Error> =
    join_all(writes).await.into_iter().filter_map(Result::err).collect();
  if errors.is_empty() { Ok(()) } else { Err(BuildError::from(errors)) }
}

async fn write_artifact(path: PathBuf, content: String) -> anyhow::Result<()> {
  // module ids may map onto nested paths
  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent).await?;
  }
  tokio::fs::write(&path, content).await?;
  Ok(())
}

use std::sync::Arc;

use arcstr::ArcStr;
use unchunk_common::{
  Chunk, ChunkModule, NodeAttrs, NormalizedUnbundlerOptions, SharedDependencyGraph,
  UnbundlerOptions,
};
use unchunk_ecmascript::EcmaCompiler;
use unchunk_error::BuildResult;
use unchunk_utils::FxIndexMap;

use crate::{
  extract_stage::extract_chunk,
  rewrite_stage::{
    align_scope_names, annotate_variables, classify_module, resynthesize_exports,
    resynthesize_imports,
  },
  split_stage::{SplitChunkOutput, split_chunk},
  utils::{
    normalize_options::{NormalizeOptionsReturn, normalize_options},
    persist::persist_chunk,
  },
};

pub type SharedOptions = Arc<NormalizedUnbundlerOptions>;

pub struct Unbundler {
  options: SharedOptions,
  graph: SharedDependencyGraph,
}

impl Unbundler {
  pub fn new(options: UnbundlerOptions) -> Self {
    let NormalizeOptionsReturn { options, graph } = normalize_options(options);
    Self { options: Arc::new(options), graph }
  }

  pub fn options(&self) -> &SharedOptions {
    &self.options
  }

  /// The shared graph sink every processed chunk writes into.
  pub fn graph(&self) -> &SharedDependencyGraph {
    &self.graph
  }

  /// Splits one bundled chunk back into per-module sources. `Ok(None)` means
  /// the text is not a chunk — the expected outcome for most probed files.
  /// Each call owns fresh per-chunk state, so one `Unbundler` may process
  /// many chunks, concurrently, against the shared graph.
  pub async fn unbundle(&self, source: impl Into<ArcStr>) -> BuildResult<Option<Chunk>> {
    let source = source.into();
    let Some(extracted) = extract_chunk(&source) else {
      return Ok(None);
    };
    tracing::debug!(chunk = extracted.chunk_id, "recognized chunk wrapper");

    let Some(SplitChunkOutput { chunk_id, map_source, params, modules: split_modules }) =
      split_chunk(extracted, &self.options, &self.graph)
    else {
      return Ok(None);
    };

    let mut modules = FxIndexMap::default();
    for mut module in split_modules {
      // classification is decided before any rewriting and never revisited
      let module_kind = classify_module(&module.ast, &params);
      if module_kind.is_commonjs() {
        self
          .graph
          .merge_node(module.id.clone(), NodeAttrs { chunk_id: None, kind: Some(module_kind) });
      } else {
        module.ast.source_type = module.ast.source_type.with_module(true);
        module.ast.program.with_mut(|fields| {
          fields.program.source_type = fields.program.source_type.with_module(true);
        });
      }

      resynthesize_exports(&mut module.ast, &module.id, &params, self.options.esm_default_exports);
      let imported_modules = resynthesize_imports(
        &mut module.ast,
        &module.id,
        module_kind,
        &params,
        &self.options,
        &self.graph,
      );
      align_scope_names(&mut module.ast, &module.id);

      let transformation = self.options.module_transformations.get(&module.raw_key);
      let wants_annotation = self.options.wants_variable_comments()
        || transformation.is_some_and(|t| !t.rename_variables.is_empty());
      let source_text = if wants_annotation {
        annotate_variables(&mut module.ast, &module.id, transformation, &self.options)
      } else {
        EcmaCompiler::print(&module.ast)
      };

      modules.insert(
        module.id.clone(),
        ChunkModule { ast: module.ast, source_text, module_kind, imported_modules },
      );
    }

    let chunk = Chunk { chunk_id, modules };
    if let Some(dir) = &self.options.dir {
      persist_chunk(dir, &chunk, &map_source).await?;
    }
    Ok(Some(chunk))
  }
}

#[cfg(test)]
mod tests {
  use unchunk_common::{
    Chunk, ModuleId, ModuleKind, ModuleTransformation, UnbundlerOptions,
  };
  use unchunk_utils::concat_string;

  use super::Unbundler;

  fn wrap(chunk_id: &str, map: &str) -> String {
    concat_string!(
      "(self.webpackChunk = self.webpackChunk || []).push([[",
      chunk_id,
      "], ",
      map,
      "]);"
    )
  }

  async fn unbundle(map: &str) -> Chunk {
    unbundle_with(map, UnbundlerOptions::default()).await
  }

  async fn unbundle_with(map: &str, options: UnbundlerOptions) -> Chunk {
    Unbundler::new(options).unbundle(wrap("452", map)).await.unwrap().unwrap()
  }

  fn source_of<'a>(chunk: &'a Chunk, id: &str) -> &'a str {
    &chunk.modules[&ModuleId::from(id)].source_text
  }

  #[tokio::test]
  async fn captures_wrapper_chunk_id() {
    let chunk = unbundle("{ 1: (e, t, r) => {} }").await;
    assert_eq!(chunk.chunk_id, 452);
  }

  #[tokio::test]
  async fn non_chunk_input_is_not_an_error() {
    let unbundler = Unbundler::new(UnbundlerOptions::default());
    assert!(unbundler.unbundle("const a = 1;").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn resynthesizes_named_and_default_exports() {
    let chunk = unbundle(
      "{ 100: (e, t, r) => { r.d(t, { foo: () => n, default: () => o }); var n = 1; var o = 2; } }",
    )
    .await;
    let source = source_of(&chunk, "100");
    assert!(!source.contains(".d("));
    // `n` is renamed to its external name `foo`
    assert!(source.contains("var foo = 1"));
    assert!(source.contains("export default o"));
    assert_eq!(chunk.modules[&ModuleId::from("100")].module_kind, ModuleKind::Esm);
  }

  #[tokio::test]
  async fn aliased_export_survives_rename_collision() {
    let chunk = unbundle(
      "{ 100: (e, t, r) => { r.d(t, { foo: () => bar }); var bar = 1; var foo = 2; } }",
    )
    .await;
    let source = source_of(&chunk, "100");
    // `foo` is already bound, so the alias stays and both bindings survive
    assert!(source.contains("bar as foo"));
    assert!(source.contains("var bar = 1"));
    assert!(source.contains("var foo = 2"));
  }

  #[tokio::test]
  async fn reserved_word_export_renames_with_underscore() {
    let chunk =
      unbundle("{ 100: (e, t, r) => { r.d(t, { delete: () => a }); var a = 1; } }").await;
    let source = source_of(&chunk, "100");
    assert!(source.contains("var _delete = 1"));
    assert!(!source.contains("var delete"));
  }

  #[tokio::test]
  async fn void_export_is_skipped_but_call_is_removed() {
    let chunk = unbundle(
      "{ 100: (e, t, r) => { r.d(t, { good: () => a, bad: () => {} }); var a = 1; } }",
    )
    .await;
    let source = source_of(&chunk, "100");
    assert!(!source.contains(".d("));
    assert!(source.contains("good"));
    assert!(!source.contains("bad"));
  }

  #[tokio::test]
  async fn cjs_default_exports_option_emits_module_exports() {
    let chunk = unbundle_with(
      "{ 100: (e, t, r) => { r.d(t, { default: () => o }); var o = 1; } }",
      UnbundlerOptions { esm_default_exports: Some(false), ..UnbundlerOptions::default() },
    )
    .await;
    let source = source_of(&chunk, "100");
    assert!(source.contains("module.exports = o"));
    assert!(!source.contains("export default"));
  }

  #[tokio::test]
  async fn dynamic_import_in_async_function_awaits() {
    let chunk = unbundle(
      "{ 100: (e, t, r) => { async function load() { return r.e(0).then(() => r(123)); } load(); } }",
    )
    .await;
    let source = source_of(&chunk, "100");
    assert!(source.contains(r#"await import("./123")"#));
  }

  #[tokio::test]
  async fn dynamic_import_in_sync_function_requires() {
    let chunk = unbundle(
      "{ 100: (e, t, r) => { function load() { return r.e(0).then(() => r(123)); } load(); } }",
    )
    .await;
    assert!(source_of(&chunk, "100").contains(r#"require("./123")"#));
  }

  #[tokio::test]
  async fn dynamic_import_in_cjs_module_requires() {
    let chunk = unbundle(
      "{ 100: (e, t, r) => { e.exports = {}; async function load() { return r.e(0).then(() => r(123)); } load(); } }",
    )
    .await;
    let module = &chunk.modules[&ModuleId::from("100")];
    assert_eq!(module.module_kind, ModuleKind::CommonJs);
    assert!(module.source_text.contains(r#"require("./123")"#));
    assert!(!module.source_text.contains("await import"));
  }

  #[tokio::test]
  async fn esm_declarator_binding_becomes_namespace_import() {
    let chunk =
      unbundle("{ 200: (e, t, r) => { var ns = r.e(0).then(() => r(100)); ns.run(); } }").await;
    let source = source_of(&chunk, "200");
    assert!(source.contains(r#"import * as ns from "./100""#));
    assert!(!source.contains(".then("));
  }

  #[tokio::test]
  async fn esm_member_binding_becomes_named_import() {
    let chunk =
      unbundle("{ 200: (e, t, r) => { var run = r.e(0).then(r.bind(r, 100)).run; run(); } }")
        .await;
    let source = source_of(&chunk, "200");
    assert!(source.contains(r#"from "./100""#));
    assert!(source.contains("run"));
  }

  #[tokio::test]
  async fn cjs_declarator_binding_requires_in_place() {
    let chunk = unbundle(
      "{ 200: (e, t, r) => { e.exports = {}; var dep = r.e(0).then(() => r(100)); dep.run(); } }",
    )
    .await;
    let source = source_of(&chunk, "200");
    assert!(source.contains(r#"var dep = require("./100")"#));
  }

  #[tokio::test]
  async fn destructured_import_binding_is_left_unrewritten() {
    let unbundler = Unbundler::new(UnbundlerOptions::default());
    let chunk = unbundler
      .unbundle(wrap("452", "{ 200: (e, t, r) => { var { run } = r.e(0).then(() => r(100)); run(); } }"))
      .await
      .unwrap()
      .unwrap();
    let source = source_of(&chunk, "200");
    assert!(source.contains(".then("));
    assert!(!source.contains("import"));

    // the rewrite is refused, the import fact is still on record
    let imported = ModuleId::from("100");
    assert!(chunk.modules[&ModuleId::from("200")].imported_modules.contains(&imported));
    assert!(unbundler.graph().contains_node(&imported));
    assert!(unbundler.graph().contains_edge(&ModuleId::from("200"), &imported));
  }

  #[tokio::test]
  async fn duplicate_imports_collapse_to_one_edge() {
    let chunk = unbundle(
      "{ 200: (e, t, r) => { function a() { return r.e(0).then(() => r(100)); } function b() { return r.e(0).then(() => r(100)); } a(); b(); } }",
    )
    .await;
    let module = &chunk.modules[&ModuleId::from("200")];
    assert_eq!(module.imported_modules.len(), 1);
  }

  #[tokio::test]
  async fn records_nodes_and_edges_in_the_shared_graph() {
    let unbundler = Unbundler::new(UnbundlerOptions::default());
    unbundler
      .unbundle(wrap("452", "{ 200: (e, t, r) => { var ns = r.e(0).then(() => r(100)); ns.run(); } }"))
      .await
      .unwrap()
      .unwrap();

    let graph = unbundler.graph();
    let importer = ModuleId::from("200");
    let imported = ModuleId::from("100");
    assert!(graph.contains_node(&importer));
    assert!(graph.contains_node(&imported));
    assert!(graph.contains_edge(&importer, &imported));
    assert_eq!(graph.node_attrs(&importer).unwrap().chunk_id, Some(452));
  }

  #[tokio::test]
  async fn cjs_verdict_reaches_the_graph() {
    let unbundler = Unbundler::new(UnbundlerOptions::default());
    unbundler.unbundle(wrap("1", "{ 7: (e, t, r) => { e.exports = {}; } }")).await.unwrap();
    let attrs = unbundler.graph().node_attrs(&ModuleId::from("7")).unwrap();
    assert_eq!(attrs.kind, Some(ModuleKind::CommonJs));
  }

  #[tokio::test]
  async fn module_rename_table_remaps_ids_and_import_paths() {
    let mut transformations = unchunk_common::ModuleTransformations::default();
    transformations.insert(
      "100".to_string(),
      ModuleTransformation { rename_module: Some("math".to_string()), ..Default::default() },
    );
    let chunk = unbundle_with(
      "{ 100: (e, t, r) => {}, 200: (e, t, r) => { var ns = r.e(0).then(() => r(100)); ns.run(); } }",
      UnbundlerOptions {
        module_transformations: Some(transformations),
        ..UnbundlerOptions::default()
      },
    )
    .await;

    assert!(chunk.modules.contains_key(&ModuleId::from("math")));
    assert!(source_of(&chunk, "200").contains(r#"from "./math""#));
  }

  #[tokio::test]
  async fn variable_rename_table_applies_by_index() {
    let mut transformations = unchunk_common::ModuleTransformations::default();
    transformations.insert(
      "300".to_string(),
      ModuleTransformation {
        rename_module: None,
        rename_variables: [(1u32, "renamed".to_string())].into_iter().collect(),
      },
    );
    let chunk = unbundle_with(
      "{ 300: (e, t, r) => { var first = 1; var second = first + 1; second; } }",
      UnbundlerOptions {
        module_transformations: Some(transformations),
        ..UnbundlerOptions::default()
      },
    )
    .await;
    let source = source_of(&chunk, "300");
    assert!(source.contains("var renamed"));
    assert!(source.contains("var first"));
  }

  #[tokio::test]
  async fn declaration_comments_mark_variable_indices() {
    let chunk = unbundle_with(
      "{ 300: (e, t, r) => { var first = 1; first; } }",
      UnbundlerOptions {
        include_variable_declaration_comments: Some(true),
        ..UnbundlerOptions::default()
      },
    )
    .await;
    assert!(source_of(&chunk, "300").contains("/* v0 */"));
  }

  #[tokio::test]
  async fn persists_module_files_and_map_source() {
    let dir = tempfile::TempDir::new().unwrap();
    let unbundler = Unbundler::new(UnbundlerOptions {
      dir: Some(dir.path().to_string_lossy().to_string()),
      ..UnbundlerOptions::default()
    });
    unbundler
      .unbundle(wrap("452", "{ 100: (e, t, r) => { var a = 1; a; } }"))
      .await
      .unwrap()
      .unwrap();

    let module_file = std::fs::read_to_string(dir.path().join("100.js")).unwrap();
    assert!(module_file.starts_with("// chunk: 452 | module: 100 | kind: ESM"));
    assert!(module_file.contains("var a = 1"));

    let map_file = std::fs::read_to_string(dir.path().join("chunk_452.modules.js")).unwrap();
    assert!(map_file.starts_with("// chunk: 452 | module map"));
  }
}

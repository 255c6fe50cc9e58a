use oxc::{
  ast::ast,
  span::{SourceType, Span},
};
use unchunk_common::{ModuleId, NodeAttrs, NormalizedUnbundlerOptions, SharedDependencyGraph};
use unchunk_ecmascript::{EcmaAst, EcmaCompiler, ExpressionExt, StatementExt};
use unchunk_utils::{FxIndexSet, concat_string};

use crate::extract_stage::ExtractedChunk;

/// Parameter names of the first valid module factory, positionally bound to
/// the (module, exports, require) slots. Fixed once per chunk and never
/// reset; every later factory must agree with it.
#[derive(Debug, Default)]
pub struct ModuleFunctionParams(Vec<String>);

impl ModuleFunctionParams {
  pub fn module_param(&self) -> Option<&str> {
    self.0.first().map(String::as_str)
  }

  pub fn exports_param(&self) -> Option<&str> {
    self.0.get(1).map(String::as_str)
  }

  pub fn require_param(&self) -> Option<&str> {
    self.0.get(2).map(String::as_str)
  }

  fn is_fixed(&self) -> bool {
    !self.0.is_empty()
  }

  /// Later factories may bind fewer parameters than the contract, never more
  /// and never under different names.
  fn accepts(&self, names: &[String]) -> bool {
    names.len() <= self.0.len() && self.0.iter().zip(names).all(|(fixed, name)| fixed == name)
  }
}

#[derive(Debug)]
pub struct SplitModule {
  /// The key exactly as it appears in the module map; transformation tables
  /// are looked up under this key.
  pub raw_key: String,
  pub id: ModuleId,
  pub ast: EcmaAst,
}

#[derive(Debug)]
pub struct SplitChunkOutput {
  pub chunk_id: u64,
  pub map_source: String,
  pub params: ModuleFunctionParams,
  pub modules: Vec<SplitModule>,
}

/// Parses the extracted module map and splits every well-shaped entry into
/// its own syntax tree. Module-level shape violations skip that entry only;
/// a map that is not a single object expression rejects the whole chunk.
pub fn split_chunk(
  extracted: ExtractedChunk,
  options: &NormalizedUnbundlerOptions,
  graph: &SharedDependencyGraph,
) -> Option<SplitChunkOutput> {
  let ExtractedChunk { chunk_id, map_source } = extracted;

  let Ok(map_ast) = EcmaCompiler::parse(concat_string!("(", map_source, ")"), SourceType::cjs())
  else {
    tracing::warn!(chunk = chunk_id, "module map does not parse");
    return None;
  };

  let program = map_ast.program();
  let object = match program.body.as_slice() {
    [stmt] => stmt.as_expression_statement().and_then(|stmt| match &stmt.expression {
      ast::Expression::ObjectExpression(object) => Some(&**object),
      // A trailing wrapper callback leaves the map inside a sequence.
      ast::Expression::SequenceExpression(seq) => {
        seq.expressions.first().and_then(ExpressionExt::as_object_expression)
      }
      _ => None,
    }),
    _ => None,
  };
  let Some(object) = object else {
    tracing::warn!(chunk = chunk_id, "module map is not a single object expression");
    return None;
  };

  let wrapped_source = map_ast.source();
  let mut params = ModuleFunctionParams::default();
  let mut seen = FxIndexSet::default();
  let mut modules = Vec::with_capacity(object.properties.len());

  for property in &object.properties {
    let ast::ObjectPropertyKind::ObjectProperty(property) = property else {
      tracing::warn!(chunk = chunk_id, "spread entry in module map, skipping");
      continue;
    };
    let Some(raw_key) = property_key_text(&property.key) else {
      tracing::warn!(chunk = chunk_id, "unusable module-map key, skipping entry");
      continue;
    };
    let id = resolve_module_id(&raw_key, options);

    // The node is inserted on first key sighting, before any validation, so
    // the graph keeps its topology even for modules that fail later stages.
    graph.merge_node(id.clone(), NodeAttrs { chunk_id: Some(chunk_id), kind: None });

    if !seen.insert(id.clone()) {
      tracing::warn!(chunk = chunk_id, module = %id, "duplicate module key, keeping the first");
      continue;
    }

    let Some((names, body_span)) = factory_shape(&property.value) else {
      tracing::warn!(chunk = chunk_id, module = %id, "module factory has an unsupported shape");
      continue;
    };
    if params.is_fixed() {
      if !params.accepts(&names) {
        tracing::warn!(
          chunk = chunk_id,
          module = %id,
          "factory parameters conflict with the chunk-wide contract"
        );
        continue;
      }
    } else if !names.is_empty() {
      params = ModuleFunctionParams(names);
    }

    // The factory body source is sliced out of the wrapped map, without the
    // surrounding braces, and parsed as its own tree.
    let inner =
      &wrapped_source[body_span.start as usize + 1..body_span.end as usize - 1];
    match EcmaCompiler::parse(inner.to_string(), SourceType::cjs()) {
      Ok(ast) => modules.push(SplitModule { raw_key, id, ast }),
      Err(_) => {
        tracing::warn!(chunk = chunk_id, module = %id, "module factory body does not parse");
      }
    }
  }

  Some(SplitChunkOutput { chunk_id, map_source, params, modules })
}

fn property_key_text(key: &ast::PropertyKey) -> Option<String> {
  match key {
    ast::PropertyKey::StaticIdentifier(ident) => Some(ident.name.to_string()),
    ast::PropertyKey::StringLiteral(literal) => Some(literal.value.to_string()),
    ast::PropertyKey::NumericLiteral(literal) => {
      let raw = literal.raw.as_ref()?;
      raw.as_str().bytes().all(|byte| byte.is_ascii_digit()).then(|| raw.to_string())
    }
    _ => None,
  }
}

fn resolve_module_id(raw_key: &str, options: &NormalizedUnbundlerOptions) -> ModuleId {
  options
    .module_transformations
    .get(raw_key)
    .and_then(|transformation| transformation.rename_module.as_deref())
    .map_or_else(|| ModuleId::from(raw_key), ModuleId::from)
}

/// Parameter names and block-body span of a module factory, or `None` when
/// the value is not a function taking up to three plain identifier
/// parameters with a block body.
fn factory_shape(value: &ast::Expression) -> Option<(Vec<String>, Span)> {
  let (params, body_span, is_expression_body) = match value {
    ast::Expression::FunctionExpression(func) => (&func.params, func.body.as_ref()?.span, false),
    ast::Expression::ArrowFunctionExpression(arrow) => {
      (&arrow.params, arrow.body.span, arrow.expression)
    }
    _ => return None,
  };
  if is_expression_body || params.rest.is_some() || params.items.len() > 3 {
    return None;
  }

  let mut names = Vec::with_capacity(params.items.len());
  for param in &params.items {
    let ast::BindingPatternKind::BindingIdentifier(ident) = &param.pattern.kind else {
      return None;
    };
    names.push(ident.name.to_string());
  }
  Some((names, body_span))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use unchunk_common::{DependencyGraph, ModuleId, NormalizedUnbundlerOptions};

  use super::{SplitChunkOutput, split_chunk};
  use crate::extract_stage::ExtractedChunk;

  fn options() -> NormalizedUnbundlerOptions {
    NormalizedUnbundlerOptions {
      esm_default_exports: true,
      include_variable_declaration_comments: false,
      include_variable_reference_comments: false,
      module_transformations: Default::default(),
      dir: None,
    }
  }

  fn split(map_source: &str) -> (Option<SplitChunkOutput>, Arc<DependencyGraph>) {
    let graph = Arc::new(DependencyGraph::default());
    let output = split_chunk(
      ExtractedChunk { chunk_id: 1, map_source: map_source.to_string() },
      &options(),
      &graph,
    );
    (output, graph)
  }

  #[test]
  fn splits_valid_modules_and_fixes_params() {
    let (output, _) = split("{ 1: (e, t, r) => { var a = 1; }, 2: (e, t) => { var b = 2; } }");
    let output = output.unwrap();
    assert_eq!(output.modules.len(), 2);
    assert_eq!(output.params.module_param(), Some("e"));
    assert_eq!(output.params.exports_param(), Some("t"));
    assert_eq!(output.params.require_param(), Some("r"));
  }

  #[test]
  fn rejects_non_object_map() {
    let (output, _) = split("42");
    assert!(output.is_none());
  }

  #[test]
  fn skips_four_parameter_factory_but_keeps_siblings() {
    let (output, graph) = split("{ 1: (e, t, r, x) => {}, 2: (e, t, r) => {} }");
    let output = output.unwrap();
    assert_eq!(output.modules.len(), 1);
    assert_eq!(*output.modules[0].id, *"2");
    // the skipped module still has its node from the key sighting
    assert!(graph.contains_node(&ModuleId::from("1")));
  }

  #[test]
  fn skips_factory_conflicting_with_the_contract() {
    let (output, _) = split("{ 1: (e, t, r) => {}, 2: (m, x) => {} }");
    let output = output.unwrap();
    assert_eq!(output.modules.len(), 1);
  }

  #[test]
  fn keeps_first_of_duplicate_keys() {
    let (output, graph) = split("{ 1: (e) => { var a = 1; }, 1: (e) => { var b = 2; } }");
    let output = output.unwrap();
    assert_eq!(output.modules.len(), 1);
    assert_eq!(graph.node_count(), 1);
  }

  #[test]
  fn skips_non_numeric_fractional_keys() {
    let (output, _) = split("{ 1.5: (e) => {}, 2: (e) => {} }");
    assert_eq!(output.unwrap().modules.len(), 1);
  }
}

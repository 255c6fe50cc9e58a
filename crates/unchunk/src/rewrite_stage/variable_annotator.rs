use oxc::{
  ast::ast,
  ast_visit::{Visit, VisitMut},
  semantic::{Scoping, SemanticBuilder, SymbolId},
};
use rustc_hash::FxHashMap;
use string_wizard::MagicString;
use unchunk_common::{ModuleId, ModuleTransformation, NormalizedUnbundlerOptions, VariableIdx};
use unchunk_ecmascript::{AstSnippet, EcmaAst, EcmaCompiler};
use unchunk_utils::concat_string;

use crate::rewrite_stage::{
  rename_applier::RenameApplier,
  scope_renamer::{bound_names, usable_rename_target},
};

/// Runs after export/import resynthesis so variable indices reflect the
/// rewritten tree. Applies the caller's per-index rename table, prints the
/// module, and when asked splices `/* v<i> */` markers into the printed
/// source. Returns the module's final source text.
pub fn annotate_variables(
  ast: &mut EcmaAst,
  module_id: &ModuleId,
  transformation: Option<&ModuleTransformation>,
  options: &NormalizedUnbundlerOptions,
) -> String {
  if let Some(table) =
    transformation.map(|t| &t.rename_variables).filter(|table| !table.is_empty())
  {
    apply_variable_renames(ast, module_id, table);
  }

  let printed = EcmaCompiler::print(ast);
  if !options.wants_variable_comments() {
    return printed;
  }

  // The markers are offsets into printed text, so the printed source is
  // reparsed and indexed the same way the rename pass indexed the tree.
  let Ok(reparsed) = EcmaCompiler::parse(printed.clone(), ast.source_type) else {
    tracing::warn!(module = %module_id, "printed source failed to reparse, skipping markers");
    return printed;
  };
  let semantic_ret = SemanticBuilder::new().build(reparsed.program());
  if !semantic_ret.errors.is_empty() {
    tracing::warn!(module = %module_id, "semantic analysis failed, skipping markers");
    return printed;
  }
  let scoping = semantic_ret.semantic.into_scoping();

  let index_of: FxHashMap<SymbolId, VariableIdx> = scoping
    .symbol_ids()
    .enumerate()
    .map(|(index, symbol_id)| (symbol_id, VariableIdx::from_usize(index)))
    .collect();

  let mut collector =
    MarkCollector { scoping: &scoping, index_of: &index_of, declarations: vec![], references: vec![] };
  collector.visit_program(reparsed.program());

  let mut magic = MagicString::new(&printed);
  if options.include_variable_declaration_comments {
    for (offset, index) in collector.declarations {
      magic.append_right(offset, marker(index));
    }
  }
  if options.include_variable_reference_comments {
    for (offset, index) in collector.references {
      magic.append_right(offset, marker(index));
    }
  }
  magic.to_string()
}

fn marker(index: VariableIdx) -> String {
  concat_string!(" /* v", itoa::Buffer::new().format(index.raw()), " */")
}

/// Renames bindings by their per-module index, under the same reserved-word
/// and collision rules as specifier alignment. Indices follow semantic
/// symbol order, which is declaration order.
fn apply_variable_renames(
  ast: &mut EcmaAst,
  module_id: &ModuleId,
  table: &FxHashMap<u32, String>,
) {
  ast.program.with_mut(|fields| {
    let semantic_ret = SemanticBuilder::new().build(fields.program);
    if !semantic_ret.errors.is_empty() {
      tracing::warn!(module = %module_id, "semantic analysis failed, skipping variable renames");
      return;
    }
    let scoping = semantic_ret.semantic.into_scoping();

    let mut taken = bound_names(&scoping);
    let mut renames: FxHashMap<SymbolId, String> = FxHashMap::default();
    for (index, symbol_id) in scoping.symbol_ids().enumerate() {
      let Some(new_name) = table.get(&VariableIdx::from_usize(index).raw()) else {
        continue;
      };
      let Some(desired) = usable_rename_target(new_name, &taken, module_id) else {
        continue;
      };
      taken.insert(desired.clone());
      renames.insert(symbol_id, desired);
    }
    if renames.is_empty() {
      return;
    }

    let mut applier = RenameApplier {
      snippet: AstSnippet::new(fields.allocator),
      scoping: &scoping,
      renames: &renames,
    };
    applier.visit_program(fields.program);
  });
}

struct MarkCollector<'a> {
  scoping: &'a Scoping,
  index_of: &'a FxHashMap<SymbolId, VariableIdx>,
  declarations: Vec<(usize, VariableIdx)>,
  references: Vec<(usize, VariableIdx)>,
}

impl<'ast> Visit<'ast> for MarkCollector<'_> {
  fn visit_binding_identifier(&mut self, ident: &ast::BindingIdentifier<'ast>) {
    if let Some(index) = ident.symbol_id.get().and_then(|symbol_id| self.index_of.get(&symbol_id))
    {
      self.declarations.push((ident.span.end as usize, *index));
    }
  }

  fn visit_identifier_reference(&mut self, ident: &ast::IdentifierReference<'ast>) {
    let Some(symbol_id) = ident
      .reference_id
      .get()
      .and_then(|reference_id| self.scoping.get_reference(reference_id).symbol_id())
    else {
      return;
    };
    if let Some(index) = self.index_of.get(&symbol_id) {
      self.references.push((ident.span.end as usize, *index));
    }
  }
}

use oxc::{
  ast::ast,
  ast_visit::VisitMut,
  semantic::{Scoping, SemanticBuilder, SymbolId},
  syntax::keyword::RESERVED_KEYWORDS,
};
use rustc_hash::{FxHashMap, FxHashSet};
use unchunk_common::ModuleId;
use unchunk_ecmascript::{AstSnippet, EcmaAst};
use unchunk_utils::{concat_string, ecmascript::is_validate_identifier_name};

use crate::rewrite_stage::rename_applier::RenameApplier;

/// Renames local bindings to their external import/export names where safe,
/// so downstream tooling sees alias-free specifiers. Skipping a rename is a
/// purely cosmetic degradation; the aliased form stays valid.
pub fn align_scope_names(ast: &mut EcmaAst, module_id: &ModuleId) {
  ast.program.with_mut(|fields| {
    let semantic_ret = SemanticBuilder::new().build(fields.program);
    if !semantic_ret.errors.is_empty() {
      tracing::warn!(module = %module_id, "semantic analysis failed, skipping scope renaming");
      return;
    }
    let scoping = semantic_ret.semantic.into_scoping();

    let mut taken = bound_names(&scoping);
    let mut renames: FxHashMap<SymbolId, String> = FxHashMap::default();
    for (external, symbol_id) in collect_aliased_specifiers(fields.program, &scoping) {
      let Some(desired) = usable_rename_target(&external, &taken, module_id) else {
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

/// Every name the module already binds or references globally. Renaming onto
/// any of them is refused, module-wide, which trades a few skipped cosmetic
/// renames for guaranteed validity.
pub(crate) fn bound_names(scoping: &Scoping) -> FxHashSet<String> {
  scoping
    .symbol_names()
    .map(ToString::to_string)
    .chain(scoping.root_unresolved_references().keys().map(ToString::to_string))
    .collect()
}

/// Applies the reserved-word and collision rules shared by specifier
/// alignment and variable renaming. `None` means the rename is refused; a
/// warning has already been emitted.
pub(crate) fn usable_rename_target(
  external: &str,
  taken: &FxHashSet<String>,
  module_id: &ModuleId,
) -> Option<String> {
  let desired = if RESERVED_KEYWORDS.iter().any(|keyword| *keyword == external) {
    concat_string!("_", external)
  } else {
    external.to_string()
  };
  if !is_validate_identifier_name(&desired) {
    tracing::warn!(module = %module_id, name = external, "name is not a usable identifier");
    return None;
  }
  if taken.contains(&desired) {
    tracing::warn!(
      module = %module_id,
      name = %desired,
      "rename target already bound in scope, keeping alias"
    );
    return None;
  }
  Some(desired)
}

/// Import and export specifiers whose external name differs from the local
/// binding, paired with the local binding's symbol.
fn collect_aliased_specifiers(
  program: &ast::Program,
  scoping: &Scoping,
) -> Vec<(String, SymbolId)> {
  let mut aliased = Vec::new();

  for stmt in &program.body {
    match stmt {
      ast::Statement::ImportDeclaration(decl) => {
        let Some(specifiers) = &decl.specifiers else {
          continue;
        };
        for specifier in specifiers {
          let ast::ImportDeclarationSpecifier::ImportSpecifier(specifier) = specifier else {
            continue;
          };
          let external = specifier.imported.name();
          if external == specifier.local.name {
            continue;
          }
          if let Some(symbol_id) = specifier.local.symbol_id.get() {
            aliased.push((external.to_string(), symbol_id));
          }
        }
      }
      ast::Statement::ExportNamedDeclaration(decl) => {
        for specifier in &decl.specifiers {
          let external = specifier.exported.name();
          let ast::ModuleExportName::IdentifierReference(local) = &specifier.local else {
            continue;
          };
          if external == local.name {
            continue;
          }
          let Some(symbol_id) = local
            .reference_id
            .get()
            .and_then(|reference_id| scoping.get_reference(reference_id).symbol_id())
          else {
            continue;
          };
          aliased.push((external.to_string(), symbol_id));
        }
      }
      _ => {}
    }
  }

  aliased
}

use oxc::{
  ast::ast,
  ast_visit::VisitMut,
  semantic::{Scoping, SymbolId},
};
use rustc_hash::FxHashMap;
use unchunk_ecmascript::AstSnippet;

/// Rewrites every binding and reference of the planned symbols to their new
/// names. References are resolved through the scoping built right before the
/// plan, so shadowed bindings stay untouched.
pub struct RenameApplier<'a, 'ast> {
  pub snippet: AstSnippet<'ast>,
  pub scoping: &'a Scoping,
  pub renames: &'a FxHashMap<SymbolId, String>,
}

impl<'ast> VisitMut<'ast> for RenameApplier<'_, 'ast> {
  fn visit_binding_identifier(&mut self, ident: &mut ast::BindingIdentifier<'ast>) {
    if let Some(new_name) =
      ident.symbol_id.get().and_then(|symbol_id| self.renames.get(&symbol_id))
    {
      ident.name = self.snippet.atom(new_name);
    }
  }

  fn visit_identifier_reference(&mut self, ident: &mut ast::IdentifierReference<'ast>) {
    let Some(symbol_id) = ident
      .reference_id
      .get()
      .and_then(|reference_id| self.scoping.get_reference(reference_id).symbol_id())
    else {
      return;
    };
    if let Some(new_name) = self.renames.get(&symbol_id) {
      ident.name = self.snippet.atom(new_name);
    }
  }
}

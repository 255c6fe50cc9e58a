use oxc::{
  allocator::TakeIn,
  ast::ast,
  span::{Atom, SPAN},
};
use unchunk_common::ModuleId;
use unchunk_ecmascript::{AstSnippet, EcmaAst, ExpressionExt, StatementExt};
use unchunk_utils::ecmascript::is_validate_identifier_name;

use crate::{
  rewrite_stage::matchers::{CallIdiom, match_call_idiom, single_return_argument},
  split_stage::ModuleFunctionParams,
};

/// Replaces every top-level export-definition call with native export
/// declarations. The new declarations land where the call statement stood;
/// the call statement itself is then dropped entirely, no matter how many of
/// its entries were skipped as unsupported.
pub fn resynthesize_exports(
  ast: &mut EcmaAst,
  module_id: &ModuleId,
  params: &ModuleFunctionParams,
  esm_default_exports: bool,
) {
  ast.program.with_mut(|fields| {
    let snippet = AstSnippet::new(fields.allocator);
    let old_body = fields.program.body.take_in(snippet.alloc());
    fields.program.body.reserve_exact(old_body.len());

    for stmt in old_body {
      let resolved = match find_export_definition(&stmt, params) {
        Some(entries) => resolve_entries(entries, module_id),
        None => {
          fields.program.body.push(stmt);
          continue;
        }
      };

      for (external, local) in resolved {
        if external == "default" {
          let local_expr = snippet.builder.expression_identifier(SPAN, local);
          fields.program.body.push(if esm_default_exports {
            snippet.export_default_expr_stmt(local_expr)
          } else {
            snippet.module_exports_expr_stmt(local_expr)
          });
        } else {
          fields.program.body.push(snippet.export_named_specifier_stmt(
            local.as_str(),
            external.as_str(),
            is_validate_identifier_name(external.as_str()),
          ));
        }
      }
    }
  });
}

/// The entries object of an export-definition call carried by `stmt`, either
/// directly or anywhere inside a sequence expression.
fn find_export_definition<'a, 'ast>(
  stmt: &'a ast::Statement<'ast>,
  params: &ModuleFunctionParams,
) -> Option<&'a ast::ObjectExpression<'ast>> {
  let probe = |expression: &'a ast::Expression<'ast>| {
    let call = expression.as_call_expression()?;
    match match_call_idiom(call, params) {
      CallIdiom::ExportDefinition { entries } => Some(entries),
      _ => None,
    }
  };

  let stmt = stmt.as_expression_statement()?;
  match &stmt.expression {
    ast::Expression::SequenceExpression(seq) => seq.expressions.iter().find_map(probe),
    expression => probe(expression),
  }
}

fn resolve_entries<'ast>(
  entries: &ast::ObjectExpression<'ast>,
  module_id: &ModuleId,
) -> Vec<(Atom<'ast>, Atom<'ast>)> {
  let mut resolved = Vec::with_capacity(entries.properties.len());

  for property in &entries.properties {
    let ast::ObjectPropertyKind::ObjectProperty(property) = property else {
      tracing::warn!(module = %module_id, "spread export entry is unsupported, skipping");
      continue;
    };
    let external = match &property.key {
      ast::PropertyKey::StaticIdentifier(ident) => ident.name,
      ast::PropertyKey::StringLiteral(literal) => literal.value,
      _ => {
        tracing::warn!(module = %module_id, "computed export name is unsupported, skipping");
        continue;
      }
    };
    let Some(local) = exported_identifier(&property.value) else {
      tracing::warn!(
        module = %module_id,
        export = %external,
        "export body does not resolve to a single identifier, skipping"
      );
      continue;
    };
    resolved.push((external, local));
  }

  resolved
}

/// The exported binding behind one entry: a zero-parameter function whose
/// body is exactly one returned identifier. Void returns and multi-statement
/// bodies stay unsupported.
fn exported_identifier<'ast>(value: &ast::Expression<'ast>) -> Option<Atom<'ast>> {
  let returned = match value {
    ast::Expression::ArrowFunctionExpression(arrow) if arrow.params.items.is_empty() => {
      if arrow.expression {
        let [stmt] = arrow.body.statements.as_slice() else {
          return None;
        };
        &stmt.as_expression_statement()?.expression
      } else {
        single_return_argument(&arrow.body)?
      }
    }
    ast::Expression::FunctionExpression(func) if func.params.items.is_empty() => {
      single_return_argument(func.body.as_deref()?)?
    }
    _ => return None,
  };
  returned.as_identifier().map(|ident| ident.name)
}

use oxc::ast::ast;
use unchunk_ecmascript::{ExpressionExt, StatementExt};

use crate::split_stage::ModuleFunctionParams;

/// Verdict of probing one call expression against the bundler's recognized
/// idioms. Keeping the probes in one closed matcher keeps the
/// unsupported-shape warnings centralized and the set exhaustively testable.
pub enum CallIdiom<'a, 'ast> {
  NoMatch,
  /// `<require>.d(<exports>, { ... })`
  ExportDefinition { entries: &'a ast::ObjectExpression<'ast> },
  /// `<loader>().then(<cb>)` where the callback hands back
  /// `<require>(<ref>)`. Carries the raw module reference.
  DynamicImport { raw_ref: String },
}

pub fn match_call_idiom<'a, 'ast>(
  call: &'a ast::CallExpression<'ast>,
  params: &ModuleFunctionParams,
) -> CallIdiom<'a, 'ast> {
  if let Some(entries) = match_export_definition(call, params) {
    return CallIdiom::ExportDefinition { entries };
  }
  if let Some(raw_ref) = match_dynamic_import(call, params) {
    return CallIdiom::DynamicImport { raw_ref };
  }
  CallIdiom::NoMatch
}

fn match_export_definition<'a, 'ast>(
  call: &'a ast::CallExpression<'ast>,
  params: &ModuleFunctionParams,
) -> Option<&'a ast::ObjectExpression<'ast>> {
  let require_param = params.require_param()?;
  let exports_param = params.exports_param()?;

  let callee = call.callee.as_static_member_expression()?;
  if callee.property.name != "d" || callee.object.as_identifier()?.name != require_param {
    return None;
  }

  let [exports_arg, entries_arg] = call.arguments.as_slice() else {
    return None;
  };
  if exports_arg.as_expression()?.as_identifier()?.name != exports_param {
    return None;
  }
  entries_arg.as_expression()?.as_object_expression()
}

fn match_dynamic_import(
  call: &ast::CallExpression,
  params: &ModuleFunctionParams,
) -> Option<String> {
  let require_param = params.require_param()?;

  let callee = call.callee.as_static_member_expression()?;
  if callee.property.name != "then" || callee.object.as_call_expression().is_none() {
    return None;
  }
  let [callback] = call.arguments.as_slice() else {
    return None;
  };
  let callback = callback.as_expression()?;

  if let Some(raw_ref) = match_bind_callback(callback, require_param) {
    return Some(raw_ref);
  }

  let require_call = callback_returned_expr(callback)?.as_call_expression()?;
  if require_call.callee.as_identifier()?.name != require_param
    || require_call.arguments.len() != 1
  {
    return None;
  }
  require_call.arguments.first()?.as_expression()?.as_raw_module_ref()
}

/// `<require>.bind(<require>, <ref>)` as a `.then` callback.
fn match_bind_callback(callback: &ast::Expression, require_param: &str) -> Option<String> {
  let call = callback.as_call_expression()?;
  let callee = call.callee.as_static_member_expression()?;
  if callee.property.name != "bind" || callee.object.as_identifier()?.name != require_param {
    return None;
  }
  let [this_arg, raw_ref] = call.arguments.as_slice() else {
    return None;
  };
  if this_arg.as_expression()?.as_identifier()?.name != require_param {
    return None;
  }
  raw_ref.as_expression()?.as_raw_module_ref()
}

fn callback_returned_expr<'a, 'ast>(
  callback: &'a ast::Expression<'ast>,
) -> Option<&'a ast::Expression<'ast>> {
  match callback {
    ast::Expression::ArrowFunctionExpression(arrow) if arrow.expression => {
      let [stmt] = arrow.body.statements.as_slice() else {
        return None;
      };
      Some(&stmt.as_expression_statement()?.expression)
    }
    ast::Expression::ArrowFunctionExpression(arrow) => single_return_argument(&arrow.body),
    ast::Expression::FunctionExpression(func) => single_return_argument(func.body.as_deref()?),
    _ => None,
  }
}

/// The argument of the only statement of `body` when that statement is a
/// `return` carrying a value.
pub fn single_return_argument<'a, 'ast>(
  body: &'a ast::FunctionBody<'ast>,
) -> Option<&'a ast::Expression<'ast>> {
  let [stmt] = body.statements.as_slice() else {
    return None;
  };
  let ast::Statement::ReturnStatement(ret) = stmt else {
    return None;
  };
  ret.argument.as_ref()
}

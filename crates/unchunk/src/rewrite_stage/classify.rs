use oxc::ast::ast;
use unchunk_common::ModuleKind;
use unchunk_ecmascript::{EcmaAst, ExpressionExt, StatementExt};

use crate::split_stage::ModuleFunctionParams;

/// CommonJS iff the module performs more than one default-export assignment,
/// or assigns an object literal as its default export. The scan stops the
/// moment either condition confirms; otherwise the module is ESM.
pub fn classify_module(ast: &EcmaAst, params: &ModuleFunctionParams) -> ModuleKind {
  let mut default_export_assignments = 0usize;

  for stmt in &ast.program().body {
    let Some(stmt) = stmt.as_expression_statement() else {
      continue;
    };
    let expressions: Vec<&ast::Expression> = match &stmt.expression {
      ast::Expression::SequenceExpression(seq) => seq.expressions.iter().collect(),
      expression => vec![expression],
    };

    for expression in expressions {
      let Some(assignment) = as_default_export_assignment(expression, params) else {
        continue;
      };
      default_export_assignments += 1;
      if default_export_assignments > 1 || assignment.right.as_object_expression().is_some() {
        return ModuleKind::CommonJs;
      }
    }
  }

  ModuleKind::Esm
}

/// `<module>.exports = …` or `<exports>.default = …`.
fn as_default_export_assignment<'a, 'ast>(
  expression: &'a ast::Expression<'ast>,
  params: &ModuleFunctionParams,
) -> Option<&'a ast::AssignmentExpression<'ast>> {
  let ast::Expression::AssignmentExpression(assignment) = expression else {
    return None;
  };
  if assignment.operator != ast::AssignmentOperator::Assign {
    return None;
  }
  let ast::AssignmentTarget::StaticMemberExpression(member) = &assignment.left else {
    return None;
  };
  let object = member.object.as_identifier()?;

  let is_default = params
    .module_param()
    .is_some_and(|param| object.name == param && member.property.name == "exports")
    || params
      .exports_param()
      .is_some_and(|param| object.name == param && member.property.name == "default");
  is_default.then_some(&**assignment)
}

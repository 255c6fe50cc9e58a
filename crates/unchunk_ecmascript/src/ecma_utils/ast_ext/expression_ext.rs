use oxc::ast::ast;

pub trait ExpressionExt<'ast> {
  fn as_identifier(&self) -> Option<&ast::IdentifierReference<'ast>>;
  fn as_string_literal(&self) -> Option<&ast::StringLiteral<'ast>>;
  fn as_call_expression(&self) -> Option<&ast::CallExpression<'ast>>;
  fn as_object_expression(&self) -> Option<&ast::ObjectExpression<'ast>>;
  fn as_static_member_expression(&self) -> Option<&ast::StaticMemberExpression<'ast>>;

  /// Raw module references inside the bundler idioms are numeric or string
  /// literals; anything else is not a reference.
  fn as_raw_module_ref(&self) -> Option<String>;
}

impl<'ast> ExpressionExt<'ast> for ast::Expression<'ast> {
  fn as_identifier(&self) -> Option<&ast::IdentifierReference<'ast>> {
    if let ast::Expression::Identifier(ident) = self { Some(ident) } else { None }
  }

  fn as_string_literal(&self) -> Option<&ast::StringLiteral<'ast>> {
    let ast::Expression::StringLiteral(expr) = self else {
      return None;
    };
    Some(expr)
  }

  fn as_call_expression(&self) -> Option<&ast::CallExpression<'ast>> {
    let ast::Expression::CallExpression(expr) = self else {
      return None;
    };
    Some(expr)
  }

  fn as_object_expression(&self) -> Option<&ast::ObjectExpression<'ast>> {
    let ast::Expression::ObjectExpression(expr) = self else {
      return None;
    };
    Some(expr)
  }

  fn as_static_member_expression(&self) -> Option<&ast::StaticMemberExpression<'ast>> {
    let ast::Expression::StaticMemberExpression(expr) = self else {
      return None;
    };
    Some(expr)
  }

  fn as_raw_module_ref(&self) -> Option<String> {
    match self {
      // Parsed literals always carry their raw text; synthetic ones don't,
      // and those are never module references.
      ast::Expression::NumericLiteral(literal) => literal.raw.as_ref().map(ToString::to_string),
      ast::Expression::StringLiteral(literal) => Some(literal.value.to_string()),
      _ => None,
    }
  }
}

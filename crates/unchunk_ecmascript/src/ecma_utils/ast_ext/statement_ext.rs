use oxc::ast::ast;

pub trait StatementExt<'me, 'ast> {
  fn as_expression_statement(&'me self) -> Option<&'me ast::ExpressionStatement<'ast>>;
  fn as_variable_declaration_mut(&'me mut self) -> Option<&'me mut ast::VariableDeclaration<'ast>>;
}

impl<'me, 'ast> StatementExt<'me, 'ast> for ast::Statement<'ast> {
  fn as_expression_statement(&'me self) -> Option<&'me ast::ExpressionStatement<'ast>> {
    if let ast::Statement::ExpressionStatement(stmt) = self {
      return Some(&**stmt);
    }
    None
  }

  fn as_variable_declaration_mut(&'me mut self) -> Option<&'me mut ast::VariableDeclaration<'ast>> {
    if let ast::Statement::VariableDeclaration(decl) = self {
      return Some(&mut **decl);
    }
    None
  }
}

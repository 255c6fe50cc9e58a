use oxc::{
  allocator::Allocator,
  ast::{
    AstBuilder, NONE,
    ast::{self, Expression, ImportOrExportKind, Statement},
  },
  span::{Atom, SPAN, Span},
};

type PassedStr<'a> = &'a str;

// `AstBuilder` is more suitable name, but it's already used in oxc.
pub struct AstSnippet<'ast> {
  pub builder: AstBuilder<'ast>,
}

impl<'ast> AstSnippet<'ast> {
  pub fn new(alloc: &'ast Allocator) -> Self {
    Self { builder: AstBuilder::new(alloc) }
  }

  #[inline]
  pub fn alloc(&self) -> &'ast Allocator {
    self.builder.allocator
  }

  pub fn atom(&self, value: &str) -> Atom<'ast> {
    self.builder.atom(value)
  }

  #[inline]
  pub fn id(&self, name: PassedStr, span: Span) -> ast::BindingIdentifier<'ast> {
    self.builder.binding_identifier(span, self.atom(name))
  }

  pub fn string_literal_expr(&self, value: PassedStr, span: Span) -> Expression<'ast> {
    Expression::StringLiteral(self.builder.alloc_string_literal(span, self.atom(value), None))
  }

  /// `require([source])`
  pub fn require_call_expr(&self, source: &str) -> Expression<'ast> {
    self.builder.expression_call(
      SPAN,
      self.builder.expression_identifier(SPAN, "require"),
      NONE,
      self.builder.vec1(ast::Argument::from(self.string_literal_expr(source, SPAN))),
      false,
    )
  }

  /// `await import([source])`
  pub fn awaited_dynamic_import_expr(&self, source: &str) -> Expression<'ast> {
    self.builder.expression_await(
      SPAN,
      self.builder.expression_import(SPAN, self.string_literal_expr(source, SPAN), None, None),
    )
  }

  /// `import * as [as_name] from '[source]';`
  pub fn import_star_stmt(&self, source: PassedStr, as_name: PassedStr) -> Statement<'ast> {
    let specifiers = self.builder.vec1(ast::ImportDeclarationSpecifier::ImportNamespaceSpecifier(
      self.builder.alloc_import_namespace_specifier(SPAN, self.id(as_name, SPAN)),
    ));
    Statement::ImportDeclaration(self.builder.alloc_import_declaration(
      SPAN,
      Some(specifiers),
      self.builder.string_literal(SPAN, self.atom(source), None),
      None,
      NONE,
      ImportOrExportKind::Value,
    ))
  }

  /// `import { [imported] as [local] } from '[source]';`
  pub fn import_named_stmt(
    &self,
    source: PassedStr,
    imported: PassedStr,
    local: PassedStr,
  ) -> Statement<'ast> {
    let specifiers = self.builder.vec1(ast::ImportDeclarationSpecifier::ImportSpecifier(
      self.builder.alloc_import_specifier(
        SPAN,
        self.builder.module_export_name_identifier_name(SPAN, self.atom(imported)),
        self.id(local, SPAN),
        ImportOrExportKind::Value,
      ),
    ));
    Statement::ImportDeclaration(self.builder.alloc_import_declaration(
      SPAN,
      Some(specifiers),
      self.builder.string_literal(SPAN, self.atom(source), None),
      None,
      NONE,
      ImportOrExportKind::Value,
    ))
  }

  /// `export { [local] as [exported] };`
  pub fn export_named_specifier_stmt(
    &self,
    local: PassedStr,
    exported: PassedStr,
    legal_ident: bool,
  ) -> Statement<'ast> {
    Statement::from(self.builder.module_declaration_export_named_declaration(
      SPAN,
      None,
      self.builder.vec1(self.builder.export_specifier(
        SPAN,
        self.builder.module_export_name_identifier_reference(SPAN, self.atom(local)),
        if legal_ident {
          self.builder.module_export_name_identifier_name(SPAN, self.atom(exported))
        } else {
          self.builder.module_export_name_string_literal(SPAN, self.atom(exported), None)
        },
        ImportOrExportKind::Value,
      )),
      None,
      ImportOrExportKind::Value,
      NONE,
    ))
  }

  /// convert `Expression` to
  /// export default ${Expression}
  pub fn export_default_expr_stmt(&self, expr: Expression<'ast>) -> Statement<'ast> {
    let ast_builder = &self.builder;
    Statement::from(ast_builder.module_declaration_export_default_declaration(
      SPAN,
      ast_builder.module_export_name_identifier_name(SPAN, "default"),
      ast::ExportDefaultDeclarationKind::from(expr),
    ))
  }

  /// convert `Expression` to
  /// module.exports = ${Expression}
  pub fn module_exports_expr_stmt(&self, expr: Expression<'ast>) -> Statement<'ast> {
    let ast_builder = &self.builder;
    ast_builder.statement_expression(
      SPAN,
      ast_builder.expression_assignment(
        SPAN,
        ast::AssignmentOperator::Assign,
        ast::AssignmentTarget::from(ast::SimpleAssignmentTarget::from(
          ast_builder.member_expression_static(
            SPAN,
            ast_builder.expression_identifier(SPAN, "module"),
            ast_builder.identifier_name(SPAN, "exports"),
            false,
          ),
        )),
        expr,
      ),
    )
  }
}

#[cfg(test)]
mod tests {
  use oxc::span::SourceType;

  use super::AstSnippet;
  use crate::EcmaCompiler;

  // the helpers must accept strings living shorter than the allocator
  #[test]
  fn builds_declarations_from_borrowed_names() {
    let mut ast =
      EcmaCompiler::parse(String::new(), SourceType::default().with_module(true)).unwrap();
    ast.program.with_mut(|fields| {
      let snippet = AstSnippet::new(fields.allocator);
      let source = String::from("./dep");
      fields.program.body.push(snippet.import_star_stmt(&source, "ns"));
      fields.program.body.push(snippet.import_named_stmt(&source, "run", "go"));
      fields.program.body.push(snippet.export_named_specifier_stmt("go", "run", true));
    });

    let printed = EcmaCompiler::print(&ast);
    assert!(printed.contains(r#"import * as ns from "./dep""#));
    assert!(printed.contains(r#"import { run as go } from "./dep""#));
    assert!(printed.contains("export { go as run }"));
  }
}

mod ast_ext;
mod ast_snippet;

pub use {
  ast_ext::{expression_ext::ExpressionExt, statement_ext::StatementExt},
  ast_snippet::AstSnippet,
};

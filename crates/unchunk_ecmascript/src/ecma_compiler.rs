use arcstr::ArcStr;
use oxc::{
  codegen::Codegen,
  parser::{ParseOptions, Parser},
  span::SourceType,
};
use unchunk_error::BuildResult;

use crate::ecma_ast::{
  EcmaAst,
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
};

pub struct EcmaCompiler;

impl EcmaCompiler {
  /// Module factory bodies are sliced out of a function, so a top-level
  /// `return` must stay parseable. Parentheses are dropped up front to keep
  /// the idiom matchers free of `ParenthesizedExpression` wrappers.
  pub fn parse(source: impl Into<ArcStr>, source_type: SourceType) -> BuildResult<EcmaAst> {
    let allocator = oxc::allocator::Allocator::default();
    let owner = ProgramCellOwner { source: source.into(), allocator };
    let program = ProgramCell::try_new(owner, |owner| {
      let ret = Parser::new(&owner.allocator, &owner.source, source_type)
        .with_options(ParseOptions {
          allow_return_outside_function: true,
          preserve_parens: false,
          ..ParseOptions::default()
        })
        .parse();
      if ret.errors.is_empty() {
        Ok(ProgramCellDependent { program: ret.program })
      } else {
        Err(anyhow::anyhow!("{:?}", ret.errors))
      }
    })?;

    Ok(EcmaAst { program, source_type })
  }

  pub fn print(ast: &EcmaAst) -> String {
    Codegen::new().build(ast.program()).code
  }
}

#[test]
fn basic_test() {
  let ast = EcmaCompiler::parse("const a = 1;".to_string(), SourceType::default()).unwrap();
  let code = EcmaCompiler::print(&ast);
  assert_eq!(code, "const a = 1;\n");
}

#[test]
fn tolerates_top_level_return() {
  assert!(EcmaCompiler::parse("if (a) return; var b = 1;", SourceType::cjs()).is_ok());
}

#[test]
fn rejects_broken_source() {
  assert!(EcmaCompiler::parse("var = ;", SourceType::cjs()).is_err());
}

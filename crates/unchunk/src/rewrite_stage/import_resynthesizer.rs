use oxc::{
  allocator::TakeIn,
  ast::ast,
  ast_visit::{VisitMut, walk_mut},
  span::Span,
  syntax::scope::ScopeFlags,
};
use rustc_hash::FxHashSet;
use unchunk_common::{
  ModuleId, ModuleKind, NodeAttrs, NormalizedUnbundlerOptions, SharedDependencyGraph,
};
use unchunk_ecmascript::{AstSnippet, EcmaAst, ExpressionExt, StatementExt};
use unchunk_utils::FxIndexSet;

use crate::{
  rewrite_stage::matchers::{CallIdiom, match_call_idiom},
  split_stage::ModuleFunctionParams,
};

/// Rewrites both bundler import idioms into module-appropriate forms and
/// records every resolved import in the dependency graph. Returns the set of
/// imported module ids in first-sighting order.
pub fn resynthesize_imports(
  ast: &mut EcmaAst,
  module_id: &ModuleId,
  module_kind: ModuleKind,
  params: &ModuleFunctionParams,
  options: &NormalizedUnbundlerOptions,
  graph: &SharedDependencyGraph,
) -> FxIndexSet<ModuleId> {
  let mut imported_modules = FxIndexSet::default();

  ast.program.with_mut(|fields| {
    let mut ctx = ImportContext {
      module_id,
      module_kind,
      params,
      options,
      graph,
      imported_modules: &mut imported_modules,
    };

    let snippet = AstSnippet::new(fields.allocator);
    let skipped = rewrite_declarator_imports(fields.program, &snippet, &mut ctx);

    let mut rewriter = ImportCallRewriter { snippet, ctx, async_stack: vec![], skipped };
    rewriter.visit_program(fields.program);
  });

  imported_modules
}

struct ImportContext<'a> {
  module_id: &'a ModuleId,
  module_kind: ModuleKind,
  params: &'a ModuleFunctionParams,
  options: &'a NormalizedUnbundlerOptions,
  graph: &'a SharedDependencyGraph,
  imported_modules: &'a mut FxIndexSet<ModuleId>,
}

impl ImportContext<'_> {
  /// Resolves a raw bundle reference through the rename table and records
  /// the import fact: node, edge and membership are all idempotent.
  fn resolve_and_record(&mut self, raw_ref: &str) -> ModuleId {
    let id = self
      .options
      .module_transformations
      .get(raw_ref)
      .and_then(|transformation| transformation.rename_module.as_deref())
      .map_or_else(|| ModuleId::from(raw_ref), ModuleId::from);

    self.graph.merge_node(id.clone(), NodeAttrs::default());
    self.graph.add_edge(self.module_id.clone(), id.clone());
    self.imported_modules.insert(id.clone());
    id
  }
}

/// The raw reference carried by `expr` when it is a dynamic-import idiom
/// call, along with the call's span.
fn match_idiom_ref(expr: &ast::Expression, params: &ModuleFunctionParams) -> Option<(String, Span)> {
  let call = expr.as_call_expression()?;
  match match_call_idiom(call, params) {
    CallIdiom::DynamicImport { raw_ref } => Some((raw_ref, call.span)),
    _ => None,
  }
}

enum DeclaratorAction<'ast> {
  Keep,
  Remove(ast::Statement<'ast>),
}

/// Declarator-init pass over the top-level statement list. ESM bindings turn
/// into import declarations inserted before the enclosing statement; CJS
/// bindings get their idiom subexpression replaced with a `require` call in
/// place. Initializers left untouched by a warning are remembered by span so
/// the expression pass below leaves their interior alone.
fn rewrite_declarator_imports<'ast>(
  program: &mut ast::Program<'ast>,
  snippet: &AstSnippet<'ast>,
  ctx: &mut ImportContext,
) -> FxHashSet<Span> {
  let mut skipped = FxHashSet::default();
  let old_body = program.body.take_in(snippet.alloc());
  program.body.reserve_exact(old_body.len());

  for mut stmt in old_body {
    let mut inserted = Vec::new();
    let keep_stmt = match stmt.as_variable_declaration_mut() {
      Some(declaration) => {
        let declarators = declaration.declarations.take_in(snippet.alloc());
        for mut declarator in declarators {
          match process_declarator(&mut declarator, snippet, ctx, &mut skipped) {
            DeclaratorAction::Keep => declaration.declarations.push(declarator),
            DeclaratorAction::Remove(import_stmt) => inserted.push(import_stmt),
          }
        }
        // a declaration left with zero declarators is dropped
        !declaration.declarations.is_empty()
      }
      None => true,
    };

    program.body.extend(inserted);
    if keep_stmt {
      program.body.push(stmt);
    }
  }

  skipped
}

fn process_declarator<'ast>(
  declarator: &mut ast::VariableDeclarator<'ast>,
  snippet: &AstSnippet<'ast>,
  ctx: &mut ImportContext,
  skipped: &mut FxHashSet<Span>,
) -> DeclaratorAction<'ast> {
  let Some(init) = declarator.init.as_mut() else {
    return DeclaratorAction::Keep;
  };

  // whole-module form: `var ns = <loader>().then(() => <require>(<ref>))`
  if let Some((raw_ref, idiom_span)) = match_idiom_ref(init, ctx.params) {
    // the import fact is recorded once the reference resolves; whether the
    // binding shape supports a rewrite is decided after
    let id = ctx.resolve_and_record(&raw_ref);
    if ctx.module_kind.is_commonjs() {
      *init = snippet.require_call_expr(&id.import_source());
      return DeclaratorAction::Keep;
    }
    let ast::BindingPatternKind::BindingIdentifier(local) = &declarator.id.kind else {
      tracing::warn!(
        module = %ctx.module_id,
        "destructured import binding is unsupported, leaving as-is"
      );
      skipped.insert(idiom_span);
      return DeclaratorAction::Keep;
    };
    return DeclaratorAction::Remove(snippet.import_star_stmt(&id.import_source(), &local.name));
  }

  // member form: one static property access off the idiom, binding a single
  // named import
  if let ast::Expression::StaticMemberExpression(member) = init {
    if let Some((raw_ref, idiom_span)) = match_idiom_ref(&member.object, ctx.params) {
      let id = ctx.resolve_and_record(&raw_ref);
      if ctx.module_kind.is_commonjs() {
        member.object = snippet.require_call_expr(&id.import_source());
        return DeclaratorAction::Keep;
      }
      let ast::BindingPatternKind::BindingIdentifier(local) = &declarator.id.kind else {
        tracing::warn!(
          module = %ctx.module_id,
          "destructured import binding is unsupported, leaving as-is"
        );
        skipped.insert(idiom_span);
        return DeclaratorAction::Keep;
      };
      return DeclaratorAction::Remove(snippet.import_named_stmt(
        &id.import_source(),
        &member.property.name,
        &local.name,
      ));
    }
  }

  DeclaratorAction::Keep
}

/// Expression pass over the whole tree: every remaining dynamic-import idiom
/// call becomes `require(path)` when the module is CommonJS or the enclosing
/// function is non-async, and `await import(path)` otherwise. The module top
/// level counts as non-async, matching the factory position the code lived
/// in at extraction time.
struct ImportCallRewriter<'a, 'ast> {
  snippet: AstSnippet<'ast>,
  ctx: ImportContext<'a>,
  async_stack: Vec<bool>,
  skipped: FxHashSet<Span>,
}

impl ImportCallRewriter<'_, '_> {
  fn in_async_context(&self) -> bool {
    self.async_stack.last().copied().unwrap_or(false)
  }
}

impl<'ast> VisitMut<'ast> for ImportCallRewriter<'_, 'ast> {
  fn visit_expression(&mut self, it: &mut ast::Expression<'ast>) {
    let matched = match it {
      ast::Expression::CallExpression(call) if !self.skipped.contains(&call.span) => {
        match match_call_idiom(call, self.ctx.params) {
          CallIdiom::DynamicImport { raw_ref } => Some(raw_ref),
          _ => None,
        }
      }
      _ => None,
    };

    if let Some(raw_ref) = matched {
      let source = self.ctx.resolve_and_record(&raw_ref).import_source();
      *it = if self.ctx.module_kind.is_commonjs() || !self.in_async_context() {
        self.snippet.require_call_expr(&source)
      } else {
        self.snippet.awaited_dynamic_import_expr(&source)
      };
      return;
    }

    walk_mut::walk_expression(self, it);
  }

  fn visit_function(&mut self, it: &mut ast::Function<'ast>, flags: ScopeFlags) {
    self.async_stack.push(it.r#async);
    walk_mut::walk_function(self, it, flags);
    self.async_stack.pop();
  }

  fn visit_arrow_function_expression(&mut self, it: &mut ast::ArrowFunctionExpression<'ast>) {
    self.async_stack.push(it.r#async);
    walk_mut::walk_arrow_function_expression(self, it);
    self.async_stack.pop();
  }
}

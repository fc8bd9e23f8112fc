//! Lexical scope tracking.
//!
//! A [`Scope`] holds the names bound by one scope-introducing node, computed
//! eagerly when the node is entered so that hoisted declarations are visible
//! before their textual position (`$(); var $ = 1;` binds `$` for the whole
//! function). The walker owns a [`ScopeChain`] and pushes/pops scopes as it
//! enters and leaves those nodes.
//!
//! | Node | Bindings |
//! |------|----------|
//! | program | imports, hoisted `var`s, top-level functions/classes/`let`/`const` |
//! | function | own name, parameters, hoisted `var`s, body-level declarations |
//! | arrow function | parameters, body-level declarations |
//! | block / static block / switch | lexical declarations directly inside |
//! | `catch` | the catch parameter |
//! | `for` / `for-in` / `for-of` | `let`/`const` in the head |
//! | class | the class name |

use oxc_ast::ast::*;
use oxc_ast_visit::Visit;
use oxc_syntax::scope::ScopeFlags;
use rustc_hash::FxHashSet;

/// What kind of node introduced a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Function,
    Block,
    Catch,
    Class,
}

/// Names bound by a single scope.
#[derive(Clone, Debug)]
pub struct Scope {
    kind: ScopeKind,
    names: FxHashSet<String>,
}

impl Scope {
    pub fn new(kind: ScopeKind) -> Self {
        Scope {
            kind,
            names: FxHashSet::default(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn declare(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn for_program(program: &Program<'_>) -> Self {
        let mut scope = Scope::new(ScopeKind::Program);
        scope.declare_hoisted_vars(&program.body);
        scope.declare_lexical(&program.body);
        scope
    }

    pub fn for_function(function: &Function<'_>) -> Self {
        let mut scope = Scope::new(ScopeKind::Function);
        if let Some(id) = &function.id {
            scope.declare(id.name.as_str());
        }
        scope.declare_parameters(&function.params);
        if let Some(body) = &function.body {
            scope.declare_hoisted_vars(&body.statements);
            scope.declare_lexical(&body.statements);
        }
        scope
    }

    pub fn for_arrow(arrow: &ArrowFunctionExpression<'_>) -> Self {
        let mut scope = Scope::new(ScopeKind::Function);
        scope.declare_parameters(&arrow.params);
        scope.declare_hoisted_vars(&arrow.body.statements);
        scope.declare_lexical(&arrow.body.statements);
        scope
    }

    pub fn for_block(statements: &[Statement<'_>]) -> Self {
        let mut scope = Scope::new(ScopeKind::Block);
        scope.declare_lexical(statements);
        scope
    }

    pub fn for_switch(switch: &SwitchStatement<'_>) -> Self {
        let mut scope = Scope::new(ScopeKind::Block);
        for case in &switch.cases {
            scope.declare_lexical(&case.consequent);
        }
        scope
    }

    pub fn for_catch(clause: &CatchClause<'_>) -> Self {
        let mut scope = Scope::new(ScopeKind::Catch);
        if let Some(param) = &clause.param {
            BindingNames::new(&mut scope.names).visit_binding_pattern(&param.pattern);
        }
        scope
    }

    /// Scope for a `for` head: only lexical declarations, `var` is hoisted.
    pub fn for_loop_head(declaration: Option<&VariableDeclaration<'_>>) -> Self {
        let mut scope = Scope::new(ScopeKind::Block);
        if let Some(declaration) = declaration
            && declaration.kind != VariableDeclarationKind::Var
        {
            scope.declare_variables(declaration);
        }
        scope
    }

    pub fn for_class(class: &Class<'_>) -> Self {
        let mut scope = Scope::new(ScopeKind::Class);
        if let Some(id) = &class.id {
            scope.declare(id.name.as_str());
        }
        scope
    }

    fn declare_parameters(&mut self, params: &FormalParameters<'_>) {
        BindingNames::new(&mut self.names).visit_formal_parameters(params);
    }

    fn declare_variables(&mut self, declaration: &VariableDeclaration<'_>) {
        let mut collector = BindingNames::new(&mut self.names);
        for declarator in &declaration.declarations {
            collector.visit_binding_pattern(&declarator.id);
        }
    }

    fn declare_hoisted_vars(&mut self, statements: &[Statement<'_>]) {
        let mut collector = HoistedVars {
            names: &mut self.names,
        };
        for statement in statements {
            collector.visit_statement(statement);
        }
    }

    /// Declarations that bind in the scope owning `statements` directly.
    fn declare_lexical(&mut self, statements: &[Statement<'_>]) {
        for statement in statements {
            match statement {
                Statement::VariableDeclaration(declaration)
                    if declaration.kind != VariableDeclarationKind::Var =>
                {
                    self.declare_variables(declaration);
                }
                Statement::FunctionDeclaration(function) => self.declare_function(function),
                Statement::ClassDeclaration(class) => self.declare_class(class),
                Statement::ImportDeclaration(import) => self.declare_import(import),
                Statement::ExportNamedDeclaration(export) => match &export.declaration {
                    Some(Declaration::VariableDeclaration(declaration))
                        if declaration.kind != VariableDeclarationKind::Var =>
                    {
                        self.declare_variables(declaration);
                    }
                    Some(Declaration::FunctionDeclaration(function)) => {
                        self.declare_function(function);
                    }
                    Some(Declaration::ClassDeclaration(class)) => self.declare_class(class),
                    _ => {}
                },
                Statement::ExportDefaultDeclaration(export) => match &export.declaration {
                    ExportDefaultDeclarationKind::FunctionDeclaration(function) => {
                        self.declare_function(function);
                    }
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                        self.declare_class(class);
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }

    fn declare_function(&mut self, function: &Function<'_>) {
        if let Some(id) = &function.id {
            self.declare(id.name.as_str());
        }
    }

    fn declare_class(&mut self, class: &Class<'_>) {
        if let Some(id) = &class.id {
            self.declare(id.name.as_str());
        }
    }

    fn declare_import(&mut self, import: &ImportDeclaration<'_>) {
        for name in import_local_names(import) {
            self.declare(name);
        }
    }
}

/// Local names bound by one import declaration.
pub fn import_local_names<'i>(import: &'i ImportDeclaration<'_>) -> impl Iterator<Item = &'i str> {
    import
        .specifiers
        .iter()
        .flatten()
        .map(|specifier| match specifier {
            ImportDeclarationSpecifier::ImportSpecifier(s) => s.local.name.as_str(),
            ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => s.local.name.as_str(),
            ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => s.local.name.as_str(),
        })
}

/// Names bound by the program's top-level import declarations.
pub fn top_level_imports(program: &Program<'_>) -> FxHashSet<String> {
    program
        .body
        .iter()
        .filter_map(|statement| match statement {
            Statement::ImportDeclaration(import) => Some(import),
            _ => None,
        })
        .flat_map(|import| import_local_names(import))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Scope chain
// =============================================================================

/// Stack of scopes from the program scope to the innermost scope.
#[derive(Clone, Debug, Default)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
}

impl ScopeChain {
    pub fn new() -> Self {
        ScopeChain::default()
    }

    pub fn push(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    pub fn pop(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    /// True when any scope on the chain binds `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn current(&self) -> Option<&Scope> {
        self.scopes.last()
    }
}

// =============================================================================
// Binding collectors
// =============================================================================

/// Collects every identifier bound by a pattern or parameter list.
///
/// Default values, computed keys, decorators and type annotations are not
/// descended into; they cannot bind names in the enclosing scope.
struct BindingNames<'n> {
    names: &'n mut FxHashSet<String>,
}

impl<'n> BindingNames<'n> {
    fn new(names: &'n mut FxHashSet<String>) -> Self {
        BindingNames { names }
    }
}

impl<'a> Visit<'a> for BindingNames<'_> {
    fn visit_binding_identifier(&mut self, it: &BindingIdentifier<'a>) {
        self.names.insert(it.name.to_string());
    }

    fn visit_expression(&mut self, _it: &Expression<'a>) {}

    fn visit_decorator(&mut self, _it: &Decorator<'a>) {}

    fn visit_ts_type_annotation(&mut self, _it: &TSTypeAnnotation<'a>) {}
}

/// Collects `var` declarations hoisted to the enclosing function or program.
///
/// Stops at nested functions and classes, which hoist into their own scope.
/// Expressions are skipped because a `var` can only appear inside one by way
/// of a nested function.
struct HoistedVars<'n> {
    names: &'n mut FxHashSet<String>,
}

impl<'a> Visit<'a> for HoistedVars<'_> {
    fn visit_variable_declaration(&mut self, it: &VariableDeclaration<'a>) {
        if it.kind == VariableDeclarationKind::Var {
            let mut collector = BindingNames::new(self.names);
            for declarator in &it.declarations {
                collector.visit_binding_pattern(&declarator.id);
            }
        }
    }

    fn visit_function(&mut self, _it: &Function<'a>, _flags: ScopeFlags) {}

    fn visit_arrow_function_expression(&mut self, _it: &ArrowFunctionExpression<'a>) {}

    fn visit_class(&mut self, _it: &Class<'a>) {}

    fn visit_expression(&mut self, _it: &Expression<'a>) {}
}

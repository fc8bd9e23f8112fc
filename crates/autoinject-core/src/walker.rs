//! Scope-aware reference walker.
//!
//! Visits a parsed program and reports every free reference to a configured
//! keypath. Classification works on the typed AST:
//!
//! - identifiers in expression position are candidates; property keys,
//!   method names, member property names, labels, import specifiers and
//!   export aliases are separate node types and never reach the candidate
//!   check
//! - a non-computed member chain (`a.b.c`) is a candidate when its root is an
//!   identifier; a computed access (`a[b]`) never is, though its object and
//!   key still are
//! - shorthand properties (`{ name }`) are matched on the name alone and
//!   never descended
//!
//! Once a candidate resolves, its subtree is not visited again, so `a.b.c`
//! matching `a.b` never also reports `a`.

use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_span::Span;
use oxc_syntax::scope::ScopeFlags;
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::config::{KeypathMapping, Target};
use crate::scope::{Scope, ScopeChain, top_level_imports};

/// A resolved free reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceMatch<'c> {
    /// Byte span of the whole reference expression
    pub span: Span,
    /// Full dotted keypath, root first
    pub keypath: String,
    /// Root identifier name
    pub name: String,
    pub target: &'c Target,
}

impl ReferenceMatch<'_> {
    /// A reference whose keypath is more than its root name is rewritten to an alias.
    pub fn needs_rewrite(&self) -> bool {
        self.keypath != self.name
    }
}

/// Candidate reference before resolution.
struct Candidate<'s> {
    span: Span,
    name: &'s str,
    keypath: String,
}

impl<'s> Candidate<'s> {
    fn from_expression(expr: &'s Expression<'_>) -> Option<Self> {
        match expr {
            Expression::Identifier(id) => Some(Candidate::identifier(id)),
            Expression::StaticMemberExpression(member) => Self::from_member(member),
            Expression::ParenthesizedExpression(paren) => {
                let inner = Self::from_expression(&paren.expression)?;
                Some(Candidate {
                    span: paren.span,
                    ..inner
                })
            }
            _ => None,
        }
    }

    fn from_member(member: &'s StaticMemberExpression<'_>) -> Option<Self> {
        let mut candidate = Self::from_expression(&member.object)?;
        candidate.keypath.push('.');
        candidate.keypath.push_str(member.property.name.as_str());
        candidate.span = member.span;
        Some(candidate)
    }

    fn identifier(id: &'s IdentifierReference<'_>) -> Self {
        let name = id.name.as_str();
        Candidate {
            span: id.span,
            name,
            keypath: name.to_string(),
        }
    }
}

/// Walks one program and collects [`ReferenceMatch`]es.
pub struct ReferenceWalker<'c> {
    mapping: &'c KeypathMapping,
    /// Normalized id of the file being walked; targets naming it are skipped
    file_id: &'c str,
    imports: FxHashSet<String>,
    scopes: ScopeChain,
    matches: Vec<ReferenceMatch<'c>>,
}

impl<'c> ReferenceWalker<'c> {
    pub fn new(mapping: &'c KeypathMapping, file_id: &'c str) -> Self {
        ReferenceWalker {
            mapping,
            file_id,
            imports: FxHashSet::default(),
            scopes: ScopeChain::new(),
            matches: Vec::new(),
        }
    }

    /// Walk `program` and return the matches in source order.
    pub fn walk(mut self, program: &Program<'_>) -> Vec<ReferenceMatch<'c>> {
        self.imports = top_level_imports(program);
        self.visit_program(program);
        debug_assert_eq!(self.scopes.depth(), 0, "unbalanced scope push/pop");
        self.matches
    }

    /// Record `candidate` if it resolves. Returns true when the subtree is consumed.
    fn handle_reference(&mut self, candidate: Candidate<'_>) -> bool {
        let Some(target) = self.mapping.get(&candidate.keypath) else {
            return false;
        };
        if self.imports.contains(candidate.name) || self.scopes.contains(candidate.name) {
            return false;
        }
        // A module never imports itself
        if target.module == self.file_id {
            return false;
        }

        trace!(
            keypath = %candidate.keypath,
            start = candidate.span.start,
            end = candidate.span.end,
            "free reference"
        );
        self.matches.push(ReferenceMatch {
            span: candidate.span,
            keypath: candidate.keypath,
            name: candidate.name.to_string(),
            target,
        });
        true
    }

    fn enter_scope_with(&mut self, scope: Scope) {
        trace!(kind = ?scope.kind(), bindings = scope.len(), depth = self.scopes.depth(), "enter scope");
        self.scopes.push(scope);
    }

    fn leave_scope_with(&mut self) {
        self.scopes.pop();
    }
}

impl<'a> Visit<'a> for ReferenceWalker<'_> {
    // ---- scope-introducing nodes ----

    fn visit_program(&mut self, it: &Program<'a>) {
        self.enter_scope_with(Scope::for_program(it));
        walk::walk_program(self, it);
        self.leave_scope_with();
    }

    fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
        self.enter_scope_with(Scope::for_function(it));
        walk::walk_function(self, it, flags);
        self.leave_scope_with();
    }

    fn visit_arrow_function_expression(&mut self, it: &ArrowFunctionExpression<'a>) {
        self.enter_scope_with(Scope::for_arrow(it));
        walk::walk_arrow_function_expression(self, it);
        self.leave_scope_with();
    }

    fn visit_block_statement(&mut self, it: &BlockStatement<'a>) {
        self.enter_scope_with(Scope::for_block(&it.body));
        walk::walk_block_statement(self, it);
        self.leave_scope_with();
    }

    fn visit_static_block(&mut self, it: &StaticBlock<'a>) {
        self.enter_scope_with(Scope::for_block(&it.body));
        walk::walk_static_block(self, it);
        self.leave_scope_with();
    }

    fn visit_switch_statement(&mut self, it: &SwitchStatement<'a>) {
        self.enter_scope_with(Scope::for_switch(it));
        walk::walk_switch_statement(self, it);
        self.leave_scope_with();
    }

    fn visit_catch_clause(&mut self, it: &CatchClause<'a>) {
        self.enter_scope_with(Scope::for_catch(it));
        walk::walk_catch_clause(self, it);
        self.leave_scope_with();
    }

    fn visit_for_statement(&mut self, it: &ForStatement<'a>) {
        let declaration = match &it.init {
            Some(ForStatementInit::VariableDeclaration(declaration)) => Some(&**declaration),
            _ => None,
        };
        self.enter_scope_with(Scope::for_loop_head(declaration));
        walk::walk_for_statement(self, it);
        self.leave_scope_with();
    }

    fn visit_for_in_statement(&mut self, it: &ForInStatement<'a>) {
        let declaration = match &it.left {
            ForStatementLeft::VariableDeclaration(declaration) => Some(&**declaration),
            _ => None,
        };
        self.enter_scope_with(Scope::for_loop_head(declaration));
        walk::walk_for_in_statement(self, it);
        self.leave_scope_with();
    }

    fn visit_for_of_statement(&mut self, it: &ForOfStatement<'a>) {
        let declaration = match &it.left {
            ForStatementLeft::VariableDeclaration(declaration) => Some(&**declaration),
            _ => None,
        };
        self.enter_scope_with(Scope::for_loop_head(declaration));
        walk::walk_for_of_statement(self, it);
        self.leave_scope_with();
    }

    fn visit_class(&mut self, it: &Class<'a>) {
        self.enter_scope_with(Scope::for_class(it));
        walk::walk_class(self, it);
        self.leave_scope_with();
    }

    // ---- reference candidates ----

    fn visit_expression(&mut self, it: &Expression<'a>) {
        if let Some(candidate) = Candidate::from_expression(it)
            && self.handle_reference(candidate)
        {
            return;
        }
        walk::walk_expression(self, it);
    }

    fn visit_simple_assignment_target(&mut self, it: &SimpleAssignmentTarget<'a>) {
        let candidate = match it {
            SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => {
                Some(Candidate::identifier(id))
            }
            SimpleAssignmentTarget::StaticMemberExpression(member) => {
                Candidate::from_member(member)
            }
            _ => None,
        };
        if let Some(candidate) = candidate
            && self.handle_reference(candidate)
        {
            return;
        }
        walk::walk_simple_assignment_target(self, it);
    }

    fn visit_chain_element(&mut self, it: &ChainElement<'a>) {
        if let ChainElement::StaticMemberExpression(member) = it
            && let Some(candidate) = Candidate::from_member(member)
            && self.handle_reference(candidate)
        {
            return;
        }
        walk::walk_chain_element(self, it);
    }

    fn visit_object_property(&mut self, it: &ObjectProperty<'a>) {
        // `{ name }`: key and value are the same token, match the name itself
        if it.shorthand
            && let Expression::Identifier(id) = &it.value
        {
            let name = id.name.as_str();
            self.handle_reference(Candidate {
                span: it.span,
                name,
                keypath: name.to_string(),
            });
            return;
        }
        walk::walk_object_property(self, it);
    }

    fn visit_export_named_declaration(&mut self, it: &ExportNamedDeclaration<'a>) {
        // `export { a } from 'mod'` names bindings of another module
        if it.source.is_some() {
            return;
        }
        walk::walk_export_named_declaration(self, it);
    }

    fn visit_export_specifier(&mut self, it: &ExportSpecifier<'a>) {
        // only the local side of `export { local as exported }` is a reference
        if let ModuleExportName::IdentifierReference(local) = &it.local {
            self.handle_reference(Candidate::identifier(local));
        }
    }

    fn visit_import_declaration(&mut self, _it: &ImportDeclaration<'a>) {}
}

//! AST traversal.
//!
//! `Walk` enumerates a node's children; the node structs and enums derive
//! it with `#[derive(WalkAst)]`. Id handles do not walk their node
//! directly: a blanket impl routes every `Id<T>` through the matching
//! `Visitor` hook, and the hook's default body resumes into the node via
//! the corresponding `descend_*` function. An override that returns
//! without calling `descend_*` prunes that whole subtree, which is how
//! the clause sorter stops at the first type switch on a path.

use crate::ast::*;
use crate::error::Span;

/// Enumerate the children of a value, feeding each through the visitor.
pub trait Walk<'t> {
    fn walk<V: Visitor<'t> + ?Sized>(&self, tree: &'t AstArena, v: &mut V);
}

/// Per-kind hooks, one per node arena.
///
/// Every default descends; override a hook and skip its `descend_*` call
/// to take over (or cut off) traversal below that node.
pub trait Visitor<'t> {
    fn visit_decl(&mut self, tree: &'t AstArena, id: DeclId) {
        descend_decl(tree, id, self);
    }

    fn visit_func(&mut self, tree: &'t AstArena, id: FuncDeclId) {
        descend_func(tree, id, self);
    }

    fn visit_stmt(&mut self, tree: &'t AstArena, id: StmtId) {
        descend_stmt(tree, id, self);
    }

    fn visit_expr(&mut self, tree: &'t AstArena, id: ExprId) {
        descend_expr(tree, id, self);
    }

    fn visit_type(&mut self, tree: &'t AstArena, id: TypeId) {
        descend_type(tree, id, self);
    }

    fn visit_field(&mut self, tree: &'t AstArena, id: FieldId) {
        descend_field(tree, id, self);
    }

    fn visit_signature(&mut self, tree: &'t AstArena, id: SignatureId) {
        descend_signature(tree, id, self);
    }

    fn visit_switch_clause(&mut self, tree: &'t AstArena, id: SwitchClauseId) {
        descend_switch_clause(tree, id, self);
    }

    fn visit_comm_clause(&mut self, tree: &'t AstArena, id: CommClauseId) {
        descend_comm_clause(tree, id, self);
    }

    fn visit_comment_group(&mut self, tree: &'t AstArena, id: CommentGroupId) {
        descend_comment_group(tree, id, self);
    }

    /// Comments are leaves; there is nothing to descend into.
    fn visit_comment(&mut self, tree: &'t AstArena, id: CommentId) {
        let _ = (tree, id);
    }
}

/// Entry point: feed a whole source file through the visitor.
pub fn walk_file<'t, V: Visitor<'t> + ?Sized>(tree: &'t AstArena, file: &SourceFile, v: &mut V) {
    file.walk(tree, v);
}

/// Ties a node type to the visitor hook that receives its ids.
pub trait Dispatch: Sized {
    fn dispatch<'t, V: Visitor<'t> + ?Sized>(tree: &'t AstArena, id: Id<Self>, v: &mut V);
}

impl<'t, T: Dispatch> Walk<'t> for Id<T> {
    #[inline]
    fn walk<V: Visitor<'t> + ?Sized>(&self, tree: &'t AstArena, v: &mut V) {
        T::dispatch(tree, *self, v);
    }
}

/// For each arena-stored node kind: the hook its ids dispatch to, and the
/// `descend_*` function that walks the identified node's children.
macro_rules! arena_nodes {
    ($($node:ty { $arena:ident, $hook:ident, $descend:ident }),+ $(,)?) => {
        $(
            impl Dispatch for $node {
                #[inline]
                fn dispatch<'t, V: Visitor<'t> + ?Sized>(
                    tree: &'t AstArena,
                    id: Id<Self>,
                    v: &mut V,
                ) {
                    v.$hook(tree, id);
                }
            }

            /// Walk the children of the identified node.
            pub fn $descend<'t, V: Visitor<'t> + ?Sized>(
                tree: &'t AstArena,
                id: Id<$node>,
                v: &mut V,
            ) {
                tree.$arena[id].walk(tree, v);
            }
        )+
    };
}

arena_nodes! {
    GenDecl { decls, visit_decl, descend_decl },
    FuncDecl { funcs, visit_func, descend_func },
    Stmt { stmts, visit_stmt, descend_stmt },
    Expr { exprs, visit_expr, descend_expr },
    Type { types, visit_type, descend_type },
    Field { fields, visit_field, descend_field },
    Signature { signatures, visit_signature, descend_signature },
    SwitchClause { switch_clauses, visit_switch_clause, descend_switch_clause },
    CommClause { comm_clauses, visit_comm_clause, descend_comm_clause },
    CommentGroup { comment_groups, visit_comment_group, descend_comment_group },
}

impl Dispatch for Comment {
    #[inline]
    fn dispatch<'t, V: Visitor<'t> + ?Sized>(tree: &'t AstArena, id: Id<Self>, v: &mut V) {
        v.visit_comment(tree, id);
    }
}

/// Ties a list element type to its centralized buffer accessor.
pub trait Listed: Sized {
    fn elems<'t>(tree: &'t AstArena, list: ListRef<Self>) -> &'t [Self];
}

impl<'t, T: Listed + Walk<'t>> Walk<'t> for ListRef<T> {
    fn walk<V: Visitor<'t> + ?Sized>(&self, tree: &'t AstArena, v: &mut V) {
        for item in T::elems(tree, *self) {
            item.walk(tree, v);
        }
    }
}

macro_rules! listed {
    ($($t:ty => $accessor:ident),+ $(,)?) => {
        $(
            impl Listed for $t {
                #[inline]
                fn elems<'t>(tree: &'t AstArena, list: ListRef<Self>) -> &'t [Self] {
                    tree.$accessor(list)
                }
            }
        )+
    };
}

listed! {
    IdentName => ident_names,
    ExprId => exprs_list,
    StmtId => stmts_list,
    TypeId => types_list,
    FieldId => fields_list,
    Spec => specs_list,
    KeyedElement => keyed_elems_list,
    TopLevelDecl => top_decls,
    SwitchClauseId => switch_clause_ids,
    CommClauseId => comm_clause_ids,
    CaseItem => case_items,
    InterfaceElem => iface_elems,
    CommentId => comment_ids,
}

impl<'t, T: Walk<'t>> Walk<'t> for Option<T> {
    #[inline]
    fn walk<V: Visitor<'t> + ?Sized>(&self, tree: &'t AstArena, v: &mut V) {
        for inner in self {
            inner.walk(tree, v);
        }
    }
}

/// Leaf data carried inside nodes: nothing beneath it.
macro_rules! terminal {
    ($($t:ty),+ $(,)?) => {
        $(
            impl<'t> Walk<'t> for $t {
                #[inline]
                fn walk<V: Visitor<'t> + ?Sized>(&self, _tree: &'t AstArena, _v: &mut V) {}
            }
        )+
    };
}

terminal! {
    Span,
    Symbol,
    bool,
    BasicLit,
    GenDeclKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    BranchKind,
}

//! Binding application: render bound types back into AST and instantiate
//! template clause bodies.
//!
//! Instantiation deep-copies the template's statements so the produced
//! clause shares no nodes with the original (or with other generated
//! clauses); stale sharing would alias later formatting. During the copy,
//! an identifier is rewritten iff its name is a binding key *and* the
//! caller's `is_var` predicate confirms it as the package's
//! empty-interface alias. Bare textual collisions with unrelated
//! uppercase names stay untouched, as do selector fields (`x.T`).

use crate::ty::{ChanDir, FuncTy, Ty};
use crate::unify::Binding;
use go_syntax::ast::{
    self, AstArena, Block, CommClauseId, DeclId, ExprId, FieldId, Interner, ListRef, SignatureId,
    Span, StmtId, SwitchClauseId, TypeId,
};

/// Build a fresh type expression AST for a ground type.
pub fn ty_to_ast(arena: &mut AstArena, interner: &mut Interner, ty: &Ty) -> TypeId {
    let node = match ty {
        Ty::Named(qualified) => match qualified.split_once('.') {
            Some((pkg, name)) => ast::Type::Named {
                pkg: Some(interner.intern(pkg)),
                name: interner.intern(name),
            },
            None => ast::Type::Named {
                pkg: None,
                name: interner.intern(qualified),
            },
        },
        Ty::Basic(kind) => ast::Type::Named {
            pkg: None,
            name: interner.intern(kind.name()),
        },
        Ty::Var(name) => ast::Type::Named {
            pkg: None,
            name: interner.intern(name),
        },
        Ty::Pointer(elem) => {
            let elem = ty_to_ast(arena, interner, elem);
            ast::Type::Pointer(elem)
        }
        Ty::Slice(elem) => {
            let elem = ty_to_ast(arena, interner, elem);
            ast::Type::Slice(elem)
        }
        Ty::Array(n, elem) => {
            let text = interner.intern(&n.to_string());
            let len = arena.exprs.alloc(
                ast::Expr::BasicLit(ast::BasicLit {
                    kind: ast::BasicLitKind::Int,
                    text,
                }),
                Span::default(),
            );
            let elem = ty_to_ast(arena, interner, elem);
            ast::Type::Array {
                len: ast::ArrayLen::Expr(len),
                elem,
            }
        }
        Ty::Map(key, val) => {
            let key = ty_to_ast(arena, interner, key);
            let val = ty_to_ast(arena, interner, val);
            ast::Type::Map { key, val }
        }
        Ty::Chan(dir, elem) => {
            let elem = ty_to_ast(arena, interner, elem);
            let dir = match dir {
                ChanDir::Both => ast::ChanDir::Both,
                ChanDir::Send => ast::ChanDir::Send,
                ChanDir::Recv => ast::ChanDir::Recv,
            };
            ast::Type::Chan { dir, elem }
        }
        Ty::Func(sig) => {
            let sig = func_ty_to_signature(arena, interner, sig);
            ast::Type::Func(sig)
        }
        Ty::Struct(fields) => {
            let mut ids = Vec::with_capacity(fields.len());
            for field in fields {
                let typ = ty_to_ast(arena, interner, &field.ty);
                let sym = interner.intern(&field.name);
                let names = arena.list_ident_names([ast::IdentName {
                    sym,
                    pos: Span::default(),
                }]);
                let tag = field.tag.as_deref().map(|t| interner.intern(t));
                ids.push(arena.fields.alloc(
                    ast::Field {
                        names,
                        variadic: false,
                        typ,
                        tag,
                        embedded: false,
                    },
                    Span::default(),
                ));
            }
            ast::Type::Struct {
                fields: arena.list_fields(ids),
            }
        }
        Ty::Interface(methods) => {
            let mut elems = Vec::with_capacity(methods.len());
            for method in methods {
                let sig = func_ty_to_signature(arena, interner, &method.sig);
                let name = interner.intern(&method.name);
                elems.push(ast::InterfaceElem::Method { name, sig });
            }
            ast::Type::Interface {
                elems: arena.list_iface_elems(elems),
            }
        }
    };
    arena.types.alloc(node, Span::default())
}

fn func_ty_to_signature(arena: &mut AstArena, interner: &mut Interner, sig: &FuncTy) -> SignatureId {
    let mut params = Vec::with_capacity(sig.params.len());
    for (i, param) in sig.params.iter().enumerate() {
        let variadic = sig.variadic && i == sig.params.len() - 1;
        // A variadic parameter's static type is `[]T`; the AST stores `T`.
        let typ = if variadic {
            match param {
                Ty::Slice(elem) => ty_to_ast(arena, interner, elem),
                other => ty_to_ast(arena, interner, other),
            }
        } else {
            ty_to_ast(arena, interner, param)
        };
        params.push(arena.fields.alloc(
            ast::Field {
                names: ListRef::EMPTY,
                variadic,
                typ,
                tag: None,
                embedded: false,
            },
            Span::default(),
        ));
    }
    let mut results = Vec::with_capacity(sig.results.len());
    for result in &sig.results {
        let typ = ty_to_ast(arena, interner, result);
        results.push(arena.fields.alloc(
            ast::Field {
                names: ListRef::EMPTY,
                variadic: false,
                typ,
                tag: None,
                embedded: false,
            },
            Span::default(),
        ));
    }
    let params = arena.list_fields(params);
    let results = arena.list_fields(results);
    arena
        .signatures
        .alloc(ast::Signature { params, results }, Span::default())
}

/// Instantiate a template clause for `concrete`: a fresh case clause whose
/// single item is the concrete type and whose body is the template body
/// with every bound variable substituted.
pub fn instantiate_clause(
    arena: &mut AstArena,
    interner: &mut Interner,
    template: SwitchClauseId,
    binding: &Binding,
    concrete: &Ty,
    is_var: &dyn Fn(&str) -> bool,
) -> SwitchClauseId {
    let tmpl = arena.switch_clauses[template];
    let case_type = ty_to_ast(arena, interner, concrete);
    let items = arena.list_case_items([ast::CaseItem::Type(case_type)]);

    let mut cloner = Cloner {
        arena: &mut *arena,
        interner: &mut *interner,
        binding,
        is_var,
    };
    let stmts = cloner.stmt_list(tmpl.stmts);

    arena.switch_clauses.alloc(
        ast::SwitchClause {
            doc: None,
            is_default: false,
            items,
            stmts,
        },
        Span::default(),
    )
}

/// Deep-copies AST subtrees, substituting bound variable identifiers.
struct Cloner<'a> {
    arena: &'a mut AstArena,
    interner: &'a mut Interner,
    binding: &'a Binding,
    is_var: &'a dyn Fn(&str) -> bool,
}

impl Cloner<'_> {
    /// Both conditions of the rewrite rule: the name is a binding key, and
    /// it resolves to the package's empty-interface alias.
    fn lookup(&self, sym: go_syntax::ast::Symbol) -> Option<Ty> {
        let name = self.interner.resolve(sym);
        if !(self.is_var)(name) {
            return None;
        }
        self.binding.get(name).cloned()
    }

    fn stmt_list(&mut self, stmts: ListRef<StmtId>) -> ListRef<StmtId> {
        let ids: Vec<_> = self.arena.stmts_list(stmts).to_vec();
        let cloned: Vec<_> = ids.into_iter().map(|id| self.stmt(id)).collect();
        self.arena.list_stmts(cloned)
    }

    fn stmt(&mut self, id: StmtId) -> StmtId {
        let node = self.arena.stmts[id];
        let cloned = match node {
            ast::Stmt::Empty => ast::Stmt::Empty,
            ast::Stmt::Expr(e) => ast::Stmt::Expr(self.expr(e)),
            ast::Stmt::Send { chan, value } => ast::Stmt::Send {
                chan: self.expr(chan),
                value: self.expr(value),
            },
            ast::Stmt::IncDec { expr, inc } => ast::Stmt::IncDec {
                expr: self.expr(expr),
                inc,
            },
            ast::Stmt::Assign { lhs, op, rhs } => ast::Stmt::Assign {
                lhs: self.expr_list(lhs),
                op,
                rhs: self.expr_list(rhs),
            },
            ast::Stmt::ShortVarDecl { names, values } => ast::Stmt::ShortVarDecl {
                names: self.ident_names(names),
                values: self.expr_list(values),
            },
            ast::Stmt::Decl(decl) => ast::Stmt::Decl(self.decl(decl)),
            ast::Stmt::Labeled { label, stmt } => ast::Stmt::Labeled {
                label,
                stmt: self.stmt(stmt),
            },
            ast::Stmt::Go(e) => ast::Stmt::Go(self.expr(e)),
            ast::Stmt::Defer(e) => ast::Stmt::Defer(self.expr(e)),
            ast::Stmt::Return { results } => ast::Stmt::Return {
                results: self.expr_list(results),
            },
            ast::Stmt::Branch { kind, label } => ast::Stmt::Branch { kind, label },
            ast::Stmt::Block(block) => ast::Stmt::Block(self.block(block)),
            ast::Stmt::If {
                init,
                cond,
                then_block,
                else_stmt,
            } => ast::Stmt::If {
                init: init.map(|s| self.stmt(s)),
                cond: self.expr(cond),
                then_block: self.block(then_block),
                else_stmt: else_stmt.map(|s| self.stmt(s)),
            },
            ast::Stmt::For { kind, block } => {
                let kind = match kind {
                    ast::ForKind::Infinite => ast::ForKind::Infinite,
                    ast::ForKind::Cond(cond) => ast::ForKind::Cond(self.expr(cond)),
                    ast::ForKind::Clause { init, cond, post } => ast::ForKind::Clause {
                        init: init.map(|s| self.stmt(s)),
                        cond: cond.map(|e| self.expr(e)),
                        post: post.map(|s| self.stmt(s)),
                    },
                    ast::ForKind::Range { lhs, expr } => ast::ForKind::Range {
                        lhs: lhs.map(|lhs| match lhs {
                            ast::RangeLhs::Define(names) => {
                                ast::RangeLhs::Define(self.ident_names(names))
                            }
                            ast::RangeLhs::Assign(exprs) => {
                                ast::RangeLhs::Assign(self.expr_list(exprs))
                            }
                        }),
                        expr: self.expr(expr),
                    },
                };
                ast::Stmt::For {
                    kind,
                    block: self.block(block),
                }
            }
            ast::Stmt::Switch { init, tag, clauses } => ast::Stmt::Switch {
                init: init.map(|s| self.stmt(s)),
                tag: tag.map(|e| self.expr(e)),
                clauses: self.switch_clauses(clauses),
            },
            ast::Stmt::TypeSwitch {
                init,
                guard,
                clauses,
            } => ast::Stmt::TypeSwitch {
                init: init.map(|s| self.stmt(s)),
                guard: ast::TypeSwitchGuard {
                    bind: guard.bind,
                    x: self.expr(guard.x),
                },
                clauses: self.switch_clauses(clauses),
            },
            ast::Stmt::Select { clauses } => ast::Stmt::Select {
                clauses: self.comm_clauses(clauses),
            },
        };
        self.arena.stmts.alloc(cloned, Span::default())
    }

    fn expr(&mut self, id: ExprId) -> ExprId {
        let node = self.arena.exprs[id];
        let cloned = match node {
            ast::Expr::Ident(sym) => {
                // A bound variable in expression position renders as the
                // bound type when that type is expressible as an
                // expression (a named or basic type).
                if let Some(ty) = self.lookup(sym) {
                    if let Some(expr) = self.ty_as_expr(&ty) {
                        return expr;
                    }
                }
                ast::Expr::Ident(sym)
            }
            ast::Expr::BasicLit(lit) => ast::Expr::BasicLit(lit),
            ast::Expr::FuncLit { sig, body } => ast::Expr::FuncLit {
                sig: self.signature(sig),
                body: self.block(body),
            },
            ast::Expr::CompositeLit { typ, elems } => ast::Expr::CompositeLit {
                typ: typ.map(|t| self.typ(t)),
                elems: self.keyed_elems(elems),
            },
            ast::Expr::Paren(inner) => ast::Expr::Paren(self.expr(inner)),
            ast::Expr::Selector { expr, sel } => ast::Expr::Selector {
                expr: self.expr(expr),
                sel,
            },
            ast::Expr::IndexExpr { expr, index } => ast::Expr::IndexExpr {
                expr: self.expr(expr),
                index: self.expr(index),
            },
            ast::Expr::SliceExpr { expr, lo, hi, max } => ast::Expr::SliceExpr {
                expr: self.expr(expr),
                lo: lo.map(|e| self.expr(e)),
                hi: hi.map(|e| self.expr(e)),
                max: max.map(|e| self.expr(e)),
            },
            ast::Expr::TypeAssert { expr, typ } => ast::Expr::TypeAssert {
                expr: self.expr(expr),
                typ: typ.map(|t| self.typ(t)),
            },
            ast::Expr::Call {
                callee,
                type_arg,
                args,
                ellipsis,
            } => {
                // `T(x)` conversions: a bound callee becomes a type callee,
                // which renders any bound type.
                let callee = match callee {
                    ast::Callee::Expr(e) => match self.arena.exprs[e] {
                        ast::Expr::Ident(sym) => match self.lookup(sym) {
                            Some(ty) => {
                                let typ = ty_to_ast(self.arena, self.interner, &ty);
                                ast::Callee::Type(typ)
                            }
                            None => ast::Callee::Expr(self.expr(e)),
                        },
                        _ => ast::Callee::Expr(self.expr(e)),
                    },
                    ast::Callee::Type(t) => ast::Callee::Type(self.typ(t)),
                };
                ast::Expr::Call {
                    callee,
                    type_arg: type_arg.map(|t| self.typ(t)),
                    args: self.expr_list(args),
                    ellipsis,
                }
            }
            ast::Expr::Unary { op, expr } => ast::Expr::Unary {
                op,
                expr: self.expr(expr),
            },
            ast::Expr::Binary { left, op, right } => ast::Expr::Binary {
                left: self.expr(left),
                op,
                right: self.expr(right),
            },
        };
        self.arena.exprs.alloc(cloned, Span::default())
    }

    fn ty_as_expr(&mut self, ty: &Ty) -> Option<ExprId> {
        let node = match ty {
            Ty::Named(qualified) => match qualified.split_once('.') {
                Some((pkg, name)) => {
                    let base = self.arena.exprs.alloc(
                        ast::Expr::Ident(self.interner.intern(pkg)),
                        Span::default(),
                    );
                    ast::Expr::Selector {
                        expr: base,
                        sel: self.interner.intern(name),
                    }
                }
                None => ast::Expr::Ident(self.interner.intern(qualified)),
            },
            Ty::Basic(kind) => ast::Expr::Ident(self.interner.intern(kind.name())),
            _ => return None,
        };
        Some(self.arena.exprs.alloc(node, Span::default()))
    }

    fn typ(&mut self, id: TypeId) -> TypeId {
        let node = self.arena.types[id];
        if let ast::Type::Named { pkg: None, name } = node {
            if let Some(ty) = self.lookup(name) {
                return ty_to_ast(self.arena, self.interner, &ty);
            }
        }
        let cloned = match node {
            ast::Type::Named { pkg, name } => ast::Type::Named { pkg, name },
            ast::Type::Pointer(elem) => ast::Type::Pointer(self.typ(elem)),
            ast::Type::Slice(elem) => ast::Type::Slice(self.typ(elem)),
            ast::Type::Array { len, elem } => ast::Type::Array {
                len: match len {
                    ast::ArrayLen::Expr(e) => ast::ArrayLen::Expr(self.expr(e)),
                    ast::ArrayLen::Ellipsis => ast::ArrayLen::Ellipsis,
                },
                elem: self.typ(elem),
            },
            ast::Type::Map { key, val } => ast::Type::Map {
                key: self.typ(key),
                val: self.typ(val),
            },
            ast::Type::Chan { dir, elem } => ast::Type::Chan {
                dir,
                elem: self.typ(elem),
            },
            ast::Type::Struct { fields } => ast::Type::Struct {
                fields: self.fields(fields),
            },
            ast::Type::Interface { elems } => {
                let elems: Vec<_> = self.arena.iface_elems(elems).to_vec();
                let cloned: Vec<_> = elems
                    .into_iter()
                    .map(|elem| match elem {
                        ast::InterfaceElem::Method { name, sig } => ast::InterfaceElem::Method {
                            name,
                            sig: self.signature(sig),
                        },
                        ast::InterfaceElem::Embedded(t) => {
                            ast::InterfaceElem::Embedded(self.typ(t))
                        }
                    })
                    .collect();
                ast::Type::Interface {
                    elems: self.arena.list_iface_elems(cloned),
                }
            }
            ast::Type::Func(sig) => ast::Type::Func(self.signature(sig)),
            ast::Type::Paren(inner) => ast::Type::Paren(self.typ(inner)),
        };
        self.arena.types.alloc(cloned, Span::default())
    }

    fn signature(&mut self, id: SignatureId) -> SignatureId {
        let sig = self.arena.signatures[id];
        let params = self.fields(sig.params);
        let results = self.fields(sig.results);
        self.arena
            .signatures
            .alloc(ast::Signature { params, results }, Span::default())
    }

    fn fields(&mut self, fields: ListRef<FieldId>) -> ListRef<FieldId> {
        let ids: Vec<_> = self.arena.fields_list(fields).to_vec();
        let cloned: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let field = self.arena.fields[id];
                let typ = self.typ(field.typ);
                self.arena.fields.alloc(
                    ast::Field {
                        names: field.names,
                        variadic: field.variadic,
                        typ,
                        tag: field.tag,
                        embedded: field.embedded,
                    },
                    Span::default(),
                )
            })
            .collect();
        self.arena.list_fields(cloned)
    }

    fn decl(&mut self, id: DeclId) -> DeclId {
        let decl = self.arena.decls[id];
        let specs: Vec<_> = self.arena.specs_list(decl.specs).to_vec();
        let cloned: Vec<_> = specs
            .into_iter()
            .map(|spec| match spec {
                ast::Spec::Import(import) => ast::Spec::Import(import),
                ast::Spec::Value(value) => ast::Spec::Value(ast::ValueSpec {
                    names: self.ident_names(value.names),
                    typ: value.typ.map(|t| self.typ(t)),
                    values: self.expr_list(value.values),
                }),
                ast::Spec::Type(spec) => ast::Spec::Type(ast::TypeSpec {
                    name: spec.name,
                    alias: spec.alias,
                    typ: self.typ(spec.typ),
                }),
            })
            .collect();
        let specs = self.arena.list_specs(cloned);
        self.arena.decls.alloc(
            ast::GenDecl {
                doc: None,
                kind: decl.kind,
                grouped: decl.grouped,
                specs,
            },
            Span::default(),
        )
    }

    fn block(&mut self, block: Block) -> Block {
        Block {
            stmts: self.stmt_list(block.stmts),
        }
    }

    fn switch_clauses(&mut self, clauses: ListRef<SwitchClauseId>) -> ListRef<SwitchClauseId> {
        let ids: Vec<_> = self.arena.switch_clause_ids(clauses).to_vec();
        let cloned: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let clause = self.arena.switch_clauses[id];
                let items: Vec<_> = self.arena.case_items(clause.items).to_vec();
                let items: Vec<_> = items
                    .into_iter()
                    .map(|item| match item {
                        ast::CaseItem::Expr(e) => ast::CaseItem::Expr(self.expr(e)),
                        ast::CaseItem::Type(t) => ast::CaseItem::Type(self.typ(t)),
                    })
                    .collect();
                let items = self.arena.list_case_items(items);
                let stmts = self.stmt_list(clause.stmts);
                self.arena.switch_clauses.alloc(
                    ast::SwitchClause {
                        doc: clause.doc,
                        is_default: clause.is_default,
                        items,
                        stmts,
                    },
                    Span::default(),
                )
            })
            .collect();
        self.arena.list_switch_clause_ids(cloned)
    }

    fn comm_clauses(&mut self, clauses: ListRef<CommClauseId>) -> ListRef<CommClauseId> {
        let ids: Vec<_> = self.arena.comm_clause_ids(clauses).to_vec();
        let cloned: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let clause = self.arena.comm_clauses[id];
                let comm = clause.comm.map(|s| self.stmt(s));
                let stmts = self.stmt_list(clause.stmts);
                self.arena
                    .comm_clauses
                    .alloc(ast::CommClause { comm, stmts }, Span::default())
            })
            .collect();
        self.arena.list_comm_clause_ids(cloned)
    }

    fn expr_list(&mut self, exprs: ListRef<ExprId>) -> ListRef<ExprId> {
        let ids: Vec<_> = self.arena.exprs_list(exprs).to_vec();
        let cloned: Vec<_> = ids.into_iter().map(|id| self.expr(id)).collect();
        self.arena.list_exprs(cloned)
    }

    fn ident_names(&mut self, names: ListRef<ast::IdentName>) -> ListRef<ast::IdentName> {
        let names: Vec<_> = self.arena.ident_names(names).to_vec();
        self.arena.list_ident_names(names)
    }

    fn keyed_elems(&mut self, elems: ListRef<ast::KeyedElement>) -> ListRef<ast::KeyedElement> {
        let elems: Vec<_> = self.arena.keyed_elems_list(elems).to_vec();
        let cloned: Vec<_> = elems
            .into_iter()
            .map(|elem| ast::KeyedElement {
                key: elem.key.map(|k| self.expr(k)),
                value: self.expr(elem.value),
            })
            .collect();
        self.arena.list_keyed_elems(cloned)
    }
}

//! Bundled syntactic oracle: type table, method sets, expression typing
//! for call arguments, and call-edge collection over the loaded program.
//!
//! This stands in for the loader/SSA/pointer-analysis stack of a full
//! toolchain. It is deliberately conservative: an argument is tagged as an
//! interface boxing only when its static type can be inferred *and* is
//! known to be concrete. Unknown imported named types are never treated as
//! concrete, so no witness is fabricated for a value that might already be
//! an interface.

use crate::error::Error;
use crate::oracle::{ArgKind, CallGraph, CallSite, Edge, InterfaceDef, TypeOracle};
use crate::program::Program;
use crate::ty::{self, BasicKind, Method, Ty};
use go_syntax::ast::{
    self, AstArena, Block, ExprId, Interner, StmtId, TypeId,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub struct Analysis {
    interfaces: Vec<InterfaceDef>,
    var_aliases: HashSet<String>,
    expr_types: HashMap<ExprId, Ty>,
    edges: HashMap<String, Vec<Edge>>,
    /// Named type → underlying (lifted declaration).
    underlying: HashMap<String, Ty>,
    /// Methods with value receivers (the method set of `T`).
    value_methods: HashMap<String, Vec<Method>>,
    /// All methods (the method set of `*T`).
    all_methods: HashMap<String, Vec<Method>>,
}

/// Run the whole-program pass.
///
/// `main_pkg` anchors call-edge collection: only files of that package
/// contribute call sites. `None` uses every loaded file, mirroring the
/// synthetic test-main fallback of entry-point-driven analyses.
pub fn analyze(program: &Program, main_pkg: Option<&str>) -> Result<Analysis, Error> {
    let arena = &program.arena;
    let interner = &program.interner;

    if let Some(pkg) = main_pkg {
        let found = program
            .files
            .iter()
            .any(|f| interner.resolve(f.file.package) == pkg);
        if !found {
            return Err(Error::Analysis(format!(
                "anchor package {pkg:?} is not among the loaded files"
            )));
        }
    }

    let mut builder = Builder {
        arena,
        interner,
        analysis: Analysis {
            interfaces: Vec::new(),
            var_aliases: HashSet::new(),
            expr_types: HashMap::new(),
            edges: HashMap::new(),
            underlying: HashMap::new(),
            value_methods: HashMap::new(),
            all_methods: HashMap::new(),
        },
        iface_decls: HashMap::new(),
        func_results: HashMap::new(),
    };

    builder.collect_decls(program);
    builder.build_interfaces();
    builder.collect_bodies(program, main_pkg);

    Ok(builder.analysis)
}

struct Builder<'p> {
    arena: &'p AstArena,
    interner: &'p Interner,
    analysis: Analysis,
    /// Interface declarations by name, for embedded-interface flattening.
    iface_decls: HashMap<String, TypeId>,
    /// Single-result functions, for typing call expressions.
    func_results: HashMap<String, Ty>,
}

impl<'p> Builder<'p> {
    fn collect_decls(&mut self, program: &Program) {
        for loaded in &program.files {
            for &decl in self.arena.top_decls(loaded.file.decls) {
                match decl {
                    ast::TopLevelDecl::Decl(id) => {
                        for &spec in self.arena.specs_list(self.arena.decls[id].specs) {
                            if let ast::Spec::Type(ts) = spec {
                                self.record_type_spec(ts);
                            }
                        }
                    }
                    ast::TopLevelDecl::Func(id) => self.record_func_decl(id),
                }
            }
        }
    }

    fn record_type_spec(&mut self, ts: ast::TypeSpec) {
        let name = self.interner.resolve(ts.name).to_string();
        let underlying = ty::lift(self.arena, self.interner, ts.typ);
        if underlying.is_empty_interface() {
            self.analysis.var_aliases.insert(name.clone());
        }
        if matches!(self.arena.types[ts.typ], ast::Type::Interface { .. }) {
            self.iface_decls.insert(name.clone(), ts.typ);
        }
        self.analysis.underlying.insert(name, underlying);
    }

    fn record_func_decl(&mut self, id: ast::FuncDeclId) {
        let func = self.arena.funcs[id];
        let name = self.interner.resolve(func.name).to_string();
        let sig = ty::lift_signature(self.arena, self.interner, func.signature);

        match func.recv {
            Some(recv) => {
                let (recv_name, pointer) = match receiver_base(self.arena, self.interner, recv.typ)
                {
                    Some(base) => base,
                    None => return,
                };
                let method = Method { name, sig };
                self.analysis
                    .all_methods
                    .entry(recv_name.clone())
                    .or_default()
                    .push(method.clone());
                if !pointer {
                    self.analysis
                        .value_methods
                        .entry(recv_name)
                        .or_default()
                        .push(method);
                }
            }
            None => {
                if sig.results.len() == 1 {
                    self.func_results.insert(name, sig.results[0].clone());
                }
            }
        }
    }

    /// Flatten embedded interfaces into method lists.
    fn build_interfaces(&mut self) {
        let names: Vec<String> = self.iface_decls.keys().cloned().collect();
        for name in names {
            let mut visited = HashSet::new();
            let mut methods = Vec::new();
            self.flatten_interface(&name, &mut visited, &mut methods);
            self.analysis.interfaces.push(InterfaceDef { name, methods });
        }
        self.analysis.interfaces.sort_by(|a, b| a.name.cmp(&b.name));
    }

    fn flatten_interface(
        &self,
        name: &str,
        visited: &mut HashSet<String>,
        out: &mut Vec<Method>,
    ) {
        if !visited.insert(name.to_string()) {
            return;
        }
        let Some(&type_id) = self.iface_decls.get(name) else {
            return;
        };
        let ast::Type::Interface { elems } = self.arena.types[type_id] else {
            return;
        };
        for &elem in self.arena.iface_elems(elems) {
            match elem {
                ast::InterfaceElem::Method { name, sig } => {
                    let method = Method {
                        name: self.interner.resolve(name).to_string(),
                        sig: ty::lift_signature(self.arena, self.interner, sig),
                    };
                    if !out.iter().any(|m| m.name == method.name) {
                        out.push(method);
                    }
                }
                ast::InterfaceElem::Embedded(t) => {
                    if let ast::Type::Named { pkg: None, name } = self.arena.types[t] {
                        self.flatten_interface(self.interner.resolve(name), visited, out);
                    }
                }
            }
        }
    }

    fn collect_bodies(&mut self, program: &Program, main_pkg: Option<&str>) {
        for loaded in &program.files {
            let collect_edges = match main_pkg {
                Some(pkg) => self.interner.resolve(loaded.file.package) == pkg,
                None => true,
            };
            for &decl in self.arena.top_decls(loaded.file.decls) {
                let ast::TopLevelDecl::Func(id) = decl else {
                    continue;
                };
                let func = self.arena.funcs[id];
                let Some(body) = func.body else {
                    continue;
                };
                let caller = self.interner.resolve(func.name).to_string();
                let mut env = HashMap::new();
                self.bind_signature(&mut env, func.signature);
                if let Some(recv) = func.recv {
                    if let Some(name) = recv.name {
                        env.insert(
                            self.interner.resolve(name).to_string(),
                            ty::lift(self.arena, self.interner, recv.typ),
                        );
                    }
                }
                self.walk_block(body, &mut env, &caller, collect_edges);
            }
        }
    }

    fn bind_signature(&self, env: &mut HashMap<String, Ty>, sig: ast::SignatureId) {
        let sig = self.arena.signatures[sig];
        for &fid in self.arena.fields_list(sig.params) {
            let field = self.arena.fields[fid];
            let mut param_ty = ty::lift(self.arena, self.interner, field.typ);
            if field.variadic {
                param_ty = Ty::Slice(Box::new(param_ty));
            }
            for name in self.arena.ident_names(field.names) {
                env.insert(self.interner.resolve(name.sym).to_string(), param_ty.clone());
            }
        }
    }

    fn walk_block(
        &mut self,
        block: Block,
        env: &mut HashMap<String, Ty>,
        caller: &str,
        collect_edges: bool,
    ) {
        for &stmt in self.arena.stmts_list(block.stmts) {
            self.walk_stmt(stmt, env, caller, collect_edges);
        }
    }

    fn walk_stmt(
        &mut self,
        id: StmtId,
        env: &mut HashMap<String, Ty>,
        caller: &str,
        collect_edges: bool,
    ) {
        match self.arena.stmts[id] {
            ast::Stmt::Empty | ast::Stmt::Branch { .. } => {}
            ast::Stmt::Expr(e) | ast::Stmt::Go(e) | ast::Stmt::Defer(e) => {
                self.walk_expr(e, env, caller, collect_edges)
            }
            ast::Stmt::Send { chan, value } => {
                self.walk_expr(chan, env, caller, collect_edges);
                self.walk_expr(value, env, caller, collect_edges);
            }
            ast::Stmt::IncDec { expr, .. } => self.walk_expr(expr, env, caller, collect_edges),
            ast::Stmt::Assign { lhs, rhs, .. } => {
                for &e in self.arena.exprs_list(lhs) {
                    self.walk_expr(e, env, caller, collect_edges);
                }
                for &e in self.arena.exprs_list(rhs) {
                    self.walk_expr(e, env, caller, collect_edges);
                }
            }
            ast::Stmt::ShortVarDecl { names, values } => {
                let names = self.arena.ident_names(names).to_vec();
                let values = self.arena.exprs_list(values).to_vec();
                for &e in &values {
                    self.walk_expr(e, env, caller, collect_edges);
                }
                if names.len() == values.len() {
                    for (name, &value) in names.iter().zip(&values) {
                        if let Some(inferred) = self.infer_expr(value, env) {
                            env.insert(self.interner.resolve(name.sym).to_string(), inferred);
                        }
                    }
                }
            }
            ast::Stmt::Decl(decl) => {
                for &spec in self.arena.specs_list(self.arena.decls[decl].specs) {
                    if let ast::Spec::Value(value) = spec {
                        let names = self.arena.ident_names(value.names).to_vec();
                        let values = self.arena.exprs_list(value.values).to_vec();
                        for &e in &values {
                            self.walk_expr(e, env, caller, collect_edges);
                        }
                        if let Some(typ) = value.typ {
                            let declared = ty::lift(self.arena, self.interner, typ);
                            for name in &names {
                                env.insert(
                                    self.interner.resolve(name.sym).to_string(),
                                    declared.clone(),
                                );
                            }
                        } else if names.len() == values.len() {
                            for (name, &value) in names.iter().zip(&values) {
                                if let Some(inferred) = self.infer_expr(value, env) {
                                    env.insert(
                                        self.interner.resolve(name.sym).to_string(),
                                        inferred,
                                    );
                                }
                            }
                        }
                    }
                }
            }
            ast::Stmt::Labeled { stmt, .. } => self.walk_stmt(stmt, env, caller, collect_edges),
            ast::Stmt::Return { results } => {
                for &e in self.arena.exprs_list(results) {
                    self.walk_expr(e, env, caller, collect_edges);
                }
            }
            ast::Stmt::Block(block) => self.walk_block(block, env, caller, collect_edges),
            ast::Stmt::If {
                init,
                cond,
                then_block,
                else_stmt,
            } => {
                if let Some(init) = init {
                    self.walk_stmt(init, env, caller, collect_edges);
                }
                self.walk_expr(cond, env, caller, collect_edges);
                self.walk_block(then_block, env, caller, collect_edges);
                if let Some(else_stmt) = else_stmt {
                    self.walk_stmt(else_stmt, env, caller, collect_edges);
                }
            }
            ast::Stmt::For { kind, block } => {
                match kind {
                    ast::ForKind::Infinite => {}
                    ast::ForKind::Cond(cond) => self.walk_expr(cond, env, caller, collect_edges),
                    ast::ForKind::Clause { init, cond, post } => {
                        if let Some(init) = init {
                            self.walk_stmt(init, env, caller, collect_edges);
                        }
                        if let Some(cond) = cond {
                            self.walk_expr(cond, env, caller, collect_edges);
                        }
                        if let Some(post) = post {
                            self.walk_stmt(post, env, caller, collect_edges);
                        }
                    }
                    ast::ForKind::Range { expr, .. } => {
                        self.walk_expr(expr, env, caller, collect_edges)
                    }
                }
                self.walk_block(block, env, caller, collect_edges);
            }
            ast::Stmt::Switch { init, tag, clauses } => {
                if let Some(init) = init {
                    self.walk_stmt(init, env, caller, collect_edges);
                }
                if let Some(tag) = tag {
                    self.walk_expr(tag, env, caller, collect_edges);
                }
                self.walk_clauses(clauses, env, caller, collect_edges);
            }
            ast::Stmt::TypeSwitch {
                init,
                guard,
                clauses,
            } => {
                if let Some(init) = init {
                    self.walk_stmt(init, env, caller, collect_edges);
                }
                // The switched-over expression's static type is what the
                // view interrogates.
                if let Some(target_ty) = self.infer_expr(guard.x, env) {
                    self.analysis.expr_types.insert(guard.x, target_ty);
                }
                self.walk_clauses(clauses, env, caller, collect_edges);
            }
            ast::Stmt::Select { clauses } => {
                for &cid in self.arena.comm_clause_ids(clauses) {
                    let clause = self.arena.comm_clauses[cid];
                    if let Some(comm) = clause.comm {
                        self.walk_stmt(comm, env, caller, collect_edges);
                    }
                    for &stmt in self.arena.stmts_list(clause.stmts) {
                        self.walk_stmt(stmt, env, caller, collect_edges);
                    }
                }
            }
        }
    }

    fn walk_clauses(
        &mut self,
        clauses: go_syntax::ast::ListRef<ast::SwitchClauseId>,
        env: &mut HashMap<String, Ty>,
        caller: &str,
        collect_edges: bool,
    ) {
        for &cid in self.arena.switch_clause_ids(clauses) {
            let clause = self.arena.switch_clauses[cid];
            for &item in self.arena.case_items(clause.items) {
                if let ast::CaseItem::Expr(e) = item {
                    self.walk_expr(e, env, caller, collect_edges);
                }
            }
            for &stmt in self.arena.stmts_list(clause.stmts) {
                self.walk_stmt(stmt, env, caller, collect_edges);
            }
        }
    }

    fn walk_expr(
        &mut self,
        id: ExprId,
        env: &mut HashMap<String, Ty>,
        caller: &str,
        collect_edges: bool,
    ) {
        match self.arena.exprs[id] {
            ast::Expr::Ident(_) | ast::Expr::BasicLit(_) => {}
            ast::Expr::FuncLit { sig, body } => {
                let mut inner = env.clone();
                self.bind_signature(&mut inner, sig);
                self.walk_block(body, &mut inner, caller, collect_edges);
            }
            ast::Expr::CompositeLit { elems, .. } => {
                for elem in self.arena.keyed_elems_list(elems).to_vec() {
                    if let Some(key) = elem.key {
                        self.walk_expr(key, env, caller, collect_edges);
                    }
                    self.walk_expr(elem.value, env, caller, collect_edges);
                }
            }
            ast::Expr::Paren(inner) => self.walk_expr(inner, env, caller, collect_edges),
            ast::Expr::Selector { expr, .. } => self.walk_expr(expr, env, caller, collect_edges),
            ast::Expr::IndexExpr { expr, index } => {
                self.walk_expr(expr, env, caller, collect_edges);
                self.walk_expr(index, env, caller, collect_edges);
            }
            ast::Expr::SliceExpr { expr, lo, hi, max } => {
                self.walk_expr(expr, env, caller, collect_edges);
                for e in [lo, hi, max].into_iter().flatten() {
                    self.walk_expr(e, env, caller, collect_edges);
                }
            }
            ast::Expr::TypeAssert { expr, .. } => {
                self.walk_expr(expr, env, caller, collect_edges)
            }
            ast::Expr::Call { callee, args, .. } => {
                let args = self.arena.exprs_list(args).to_vec();
                for &arg in &args {
                    self.walk_expr(arg, env, caller, collect_edges);
                }
                if let ast::Callee::Expr(e) = callee {
                    self.walk_expr(e, env, caller, collect_edges);
                }
                if collect_edges {
                    if let Some(callee_name) = self.callee_name(callee) {
                        self.record_edge(&callee_name, &args, env, caller);
                    }
                }
            }
            ast::Expr::Unary { expr, .. } => self.walk_expr(expr, env, caller, collect_edges),
            ast::Expr::Binary { left, right, .. } => {
                self.walk_expr(left, env, caller, collect_edges);
                self.walk_expr(right, env, caller, collect_edges);
            }
        }
    }

    fn callee_name(&self, callee: ast::Callee) -> Option<String> {
        let ast::Callee::Expr(e) = callee else {
            return None;
        };
        match self.arena.exprs[e] {
            ast::Expr::Ident(sym) => Some(self.interner.resolve(sym).to_string()),
            ast::Expr::Selector { expr, sel } => match self.arena.exprs[expr] {
                ast::Expr::Ident(_) => Some(self.interner.resolve(sel).to_string()),
                _ => None,
            },
            _ => None,
        }
    }

    fn record_edge(
        &mut self,
        callee: &str,
        args: &[ExprId],
        env: &HashMap<String, Ty>,
        caller: &str,
    ) {
        let tagged: Vec<ArgKind> = args
            .iter()
            .map(|&arg| match self.infer_expr(arg, env) {
                Some(arg_ty) if self.is_concrete(&arg_ty) => {
                    self.analysis.expr_types.insert(arg, arg_ty.clone());
                    ArgKind::InterfaceBox(arg_ty)
                }
                _ => ArgKind::Other,
            })
            .collect();
        debug!(caller, callee, args = tagged.len(), "call edge");
        self.analysis.edges.entry(callee.to_string()).or_default().push(Edge {
            caller: caller.to_string(),
            site: Some(CallSite { args: tagged }),
        });
    }

    /// Static type of an expression, where syntactically evident.
    fn infer_expr(&self, id: ExprId, env: &HashMap<String, Ty>) -> Option<Ty> {
        match self.arena.exprs[id] {
            ast::Expr::Ident(sym) => {
                let name = self.interner.resolve(sym);
                if name == "nil" || name == "true" || name == "false" {
                    return match name {
                        "nil" => None,
                        _ => Some(Ty::Basic(BasicKind::Bool)),
                    };
                }
                env.get(name).cloned()
            }
            ast::Expr::BasicLit(lit) => Some(match lit.kind {
                ast::BasicLitKind::Int => Ty::Basic(BasicKind::Int),
                ast::BasicLitKind::Float => Ty::Basic(BasicKind::Float64),
                ast::BasicLitKind::Imag => Ty::Basic(BasicKind::Complex128),
                ast::BasicLitKind::Rune => Ty::Basic(BasicKind::Rune),
                ast::BasicLitKind::String => Ty::Basic(BasicKind::String),
            }),
            ast::Expr::FuncLit { sig, .. } => Some(Ty::Func(ty::lift_signature(
                self.arena,
                self.interner,
                sig,
            ))),
            ast::Expr::CompositeLit { typ, elems } => {
                let typ = typ?;
                let lifted = ty::lift(self.arena, self.interner, typ);
                // `[...]T{a, b}` has length from the element count.
                if let (ast::Type::Array { len: ast::ArrayLen::Ellipsis, .. }, Ty::Array(_, elem)) =
                    (self.arena.types[typ], &lifted)
                {
                    let n = self.arena.keyed_elems_list(elems).len() as u64;
                    return Some(Ty::Array(n, elem.clone()));
                }
                Some(lifted)
            }
            ast::Expr::Paren(inner) => self.infer_expr(inner, env),
            ast::Expr::TypeAssert { typ, .. } => {
                typ.map(|t| ty::lift(self.arena, self.interner, t))
            }
            ast::Expr::Call {
                callee, type_arg, ..
            } => match callee {
                ast::Callee::Type(t) => Some(ty::lift(self.arena, self.interner, t)),
                ast::Callee::Expr(e) => {
                    if let ast::Expr::Ident(sym) = self.arena.exprs[e] {
                        let name = self.interner.resolve(sym);
                        match (name, type_arg) {
                            ("make", Some(t)) => {
                                return Some(ty::lift(self.arena, self.interner, t));
                            }
                            ("new", Some(t)) => {
                                return Some(Ty::Pointer(Box::new(ty::lift(
                                    self.arena,
                                    self.interner,
                                    t,
                                ))));
                            }
                            ("len", _) | ("cap", _) => {
                                return Some(Ty::Basic(BasicKind::Int));
                            }
                            _ => {}
                        }
                        return self.func_results.get(name).cloned();
                    }
                    None
                }
            },
            ast::Expr::Unary { op, expr } => match op {
                ast::UnaryOp::Addr => {
                    Some(Ty::Pointer(Box::new(self.infer_expr(expr, env)?)))
                }
                ast::UnaryOp::Deref => match self.infer_expr(expr, env)? {
                    Ty::Pointer(inner) => Some(*inner),
                    _ => None,
                },
                ast::UnaryOp::Recv => match self.infer_expr(expr, env)? {
                    Ty::Chan(_, elem) => Some(*elem),
                    _ => None,
                },
                ast::UnaryOp::Not => Some(Ty::Basic(BasicKind::Bool)),
                _ => self.infer_expr(expr, env),
            },
            ast::Expr::Binary { left, op, right: _ } => match op {
                ast::BinaryOp::Eq
                | ast::BinaryOp::Ne
                | ast::BinaryOp::Lt
                | ast::BinaryOp::Le
                | ast::BinaryOp::Gt
                | ast::BinaryOp::Ge
                | ast::BinaryOp::LAnd
                | ast::BinaryOp::LOr => Some(Ty::Basic(BasicKind::Bool)),
                _ => self.infer_expr(left, env),
            },
            ast::Expr::IndexExpr { expr, .. } => match self.infer_expr(expr, env)? {
                Ty::Map(_, val) => Some(*val),
                Ty::Slice(elem) | Ty::Array(_, elem) => Some(*elem),
                Ty::Basic(BasicKind::String) => Some(Ty::Basic(BasicKind::Byte)),
                _ => None,
            },
            ast::Expr::SliceExpr { expr, .. } => match self.infer_expr(expr, env)? {
                Ty::Array(_, elem) => Some(Ty::Slice(elem)),
                other @ (Ty::Slice(_) | Ty::Basic(BasicKind::String)) => Some(other),
                _ => None,
            },
            ast::Expr::Selector { .. } => None,
        }
    }

    /// Concrete = known not to be an interface. Unresolvable named types
    /// (imports) are treated as non-concrete so no witness is invented.
    fn is_concrete(&self, arg_ty: &Ty) -> bool {
        match arg_ty {
            Ty::Interface(_) => false,
            Ty::Named(name) => {
                if name == "error" {
                    return false;
                }
                match self.analysis.underlying.get(name) {
                    Some(underlying) => !underlying.is_interface(),
                    None => false,
                }
            }
            _ => true,
        }
    }
}

fn receiver_base(
    arena: &AstArena,
    interner: &Interner,
    typ: TypeId,
) -> Option<(String, bool)> {
    match arena.types[typ] {
        ast::Type::Named { pkg: None, name } => Some((interner.resolve(name).to_string(), false)),
        ast::Type::Pointer(inner) => match arena.types[inner] {
            ast::Type::Named { pkg: None, name } => {
                Some((interner.resolve(name).to_string(), true))
            }
            _ => None,
        },
        ast::Type::Paren(inner) => receiver_base(arena, interner, inner),
        _ => None,
    }
}

impl Analysis {
    fn method_set(&self, ty: &Ty) -> &[Method] {
        match ty {
            Ty::Pointer(inner) => match inner.as_ref() {
                Ty::Named(name) => self
                    .all_methods
                    .get(name)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]),
                _ => &[],
            },
            Ty::Named(name) => {
                if let Some(methods) = self.value_methods.get(name) {
                    return methods;
                }
                // A named interface type's method set is its own.
                if let Some(iface) = self.interfaces.iter().find(|i| i.name == *name) {
                    return &iface.methods;
                }
                &[]
            }
            _ => &[],
        }
    }
}

impl TypeOracle for Analysis {
    fn type_of_expr(&self, expr: ExprId) -> Option<Ty> {
        self.expr_types.get(&expr).cloned()
    }

    fn is_var_alias(&self, name: &str) -> bool {
        self.var_aliases.contains(name)
    }

    fn interfaces(&self) -> &[InterfaceDef] {
        &self.interfaces
    }

    fn implements(&self, ty: &Ty, iface: &InterfaceDef) -> bool {
        if iface.methods.is_empty() {
            return true;
        }
        let methods = self.method_set(ty);
        iface.methods.iter().all(|want| {
            methods
                .iter()
                .any(|have| have.name == want.name && have.sig == want.sig)
        })
    }
}

impl CallGraph for Analysis {
    fn in_edges(&self, callee: &str) -> &[Edge] {
        self.edges.get(callee).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Program;

    fn analyze_src(src: &str) -> (Program, Analysis) {
        let program = Program::from_sources(&[("test.go", src)]).expect("load");
        let analysis = analyze(&program, None).expect("analyze");
        (program, analysis)
    }

    #[test]
    fn empty_interface_aliases_are_var_aliases() {
        let (_p, analysis) = analyze_src(
            "package p\n\ntype T interface{}\ntype S interface{}\ntype I interface{ M() }\n",
        );
        assert!(analysis.is_var_alias("T"));
        assert!(analysis.is_var_alias("S"));
        assert!(!analysis.is_var_alias("I"));
    }

    #[test]
    fn interfaces_enumerated_and_flattened() {
        let (_p, analysis) = analyze_src(
            r#"
package p

type Closer interface{ Close() error }
type ReadCloser interface {
	Closer
	Read(p []byte) (int, error)
}
"#,
        );
        let names: Vec<_> = analysis.interfaces().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Closer", "ReadCloser"]);
        let rc = &analysis.interfaces()[1];
        let mut methods: Vec<_> = rc.methods.iter().map(|m| m.name.as_str()).collect();
        methods.sort();
        assert_eq!(methods, vec!["Close", "Read"]);
    }

    #[test]
    fn method_sets_follow_receiver_kind() {
        let (_p, analysis) = analyze_src(
            r#"
package p

type Closer interface{ Close() error }
type File struct{}

func (f File) Close() error { return nil }

type Conn struct{}

func (c *Conn) Close() error { return nil }
"#,
        );
        let closer = analysis
            .interfaces()
            .iter()
            .find(|i| i.name == "Closer")
            .unwrap()
            .clone();
        assert!(analysis.implements(&Ty::Named("File".into()), &closer));
        assert!(analysis.implements(&Ty::Pointer(Box::new(Ty::Named("File".into()))), &closer));
        // Pointer-receiver method is not in the value method set.
        assert!(!analysis.implements(&Ty::Named("Conn".into()), &closer));
        assert!(analysis.implements(&Ty::Pointer(Box::new(Ty::Named("Conn".into()))), &closer));
    }

    #[test]
    fn call_edges_tag_concrete_arguments() {
        let (_p, analysis) = analyze_src(
            r#"
package p

func main() {
	Foo(map[string]int{})
	Foo(nil)
	var x interface{}
	Foo(x)
}

func Foo(x interface{}) {}
"#,
        );
        let edges = analysis.in_edges("Foo");
        assert_eq!(edges.len(), 3);
        let kinds: Vec<_> = edges
            .iter()
            .map(|e| e.site.as_ref().unwrap().args[0].clone())
            .collect();
        assert_eq!(
            kinds[0],
            ArgKind::InterfaceBox(Ty::Map(
                Box::new(Ty::Basic(BasicKind::String)),
                Box::new(Ty::Basic(BasicKind::Int)),
            ))
        );
        assert_eq!(kinds[1], ArgKind::Other);
        assert_eq!(kinds[2], ArgKind::Other);
    }

    #[test]
    fn locals_type_through_declarations() {
        let (_p, analysis) = analyze_src(
            r#"
package p

func main() {
	m := map[string]bool{}
	var c []chan<- *int
	Foo(m)
	Foo(c)
	Foo(make(chan int))
	Foo(&m)
}

func Foo(x interface{}) {}
"#,
        );
        let edges = analysis.in_edges("Foo");
        let kinds: Vec<_> = edges
            .iter()
            .map(|e| match &e.site.as_ref().unwrap().args[0] {
                ArgKind::InterfaceBox(t) => t.to_string(),
                ArgKind::Other => "other".into(),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "map[string]bool",
                "[]chan<- *int",
                "chan int",
                "*map[string]bool",
            ]
        );
    }

    #[test]
    fn guard_identifier_gets_the_param_type() {
        let (program, analysis) = analyze_src(
            r#"
package p

func Foo(x interface{}) {
	switch x := x.(type) {
	default:
		_ = x
	}
}
"#,
        );
        // Exactly one expression typed as the empty interface: the guard.
        let empty_iface = analysis
            .expr_types
            .values()
            .filter(|t| t.is_empty_interface())
            .count();
        assert!(empty_iface >= 1, "guard should be typed");
        let _ = program;
    }
}

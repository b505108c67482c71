//! Deterministic pretty-printer from the arena AST to Go source.
//!
//! Output follows gofmt conventions where they are cheap to reproduce: tab
//! indentation, case clauses at switch level, one blank line between
//! top-level declarations. The printer never consults node positions, so
//! re-printing a re-parsed file is byte-stable.
//!
//! Explicit grouping survives as `Paren` nodes from the parser, so
//! expressions print without precedence analysis.

use crate::ast::*;

pub struct Printer<'a> {
    arena: &'a AstArena,
    interner: &'a Interner,
    out: String,
    indent: usize,
}

/// Format a whole source file.
pub fn print_file(arena: &AstArena, interner: &Interner, file: &SourceFile) -> String {
    let mut p = Printer::new(arena, interner);
    p.file(file);
    p.out
}

/// Format a single type expression.
pub fn print_type(arena: &AstArena, interner: &Interner, id: TypeId) -> String {
    let mut p = Printer::new(arena, interner);
    p.typ(id, false);
    p.out
}

/// Format a single statement at column zero.
pub fn print_stmt(arena: &AstArena, interner: &Interner, id: StmtId) -> String {
    let mut p = Printer::new(arena, interner);
    p.stmt(id);
    p.out
}

impl<'a> Printer<'a> {
    fn new(arena: &'a AstArena, interner: &'a Interner) -> Self {
        Self {
            arena,
            interner,
            out: String::new(),
            indent: 0,
        }
    }

    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn sym(&mut self, sym: Symbol) {
        let s = self.interner.resolve(sym);
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn comment_group(&mut self, id: CommentGroupId) {
        let group = self.arena.comment_groups[id];
        for &cid in self.arena.comment_ids(group.comments) {
            let text = self.arena.comments[cid].text;
            self.sym(text);
            self.newline();
        }
    }

    // =========================================================================
    // File and declarations
    // =========================================================================

    fn file(&mut self, file: &SourceFile) {
        if let Some(doc) = file.doc {
            self.comment_group(doc);
        }
        self.push("package ");
        self.sym(file.package);
        self.push("\n");

        for &decl in self.arena.top_decls(file.decls) {
            self.push("\n");
            match decl {
                TopLevelDecl::Decl(id) => self.gen_decl(id),
                TopLevelDecl::Func(id) => self.func_decl(id),
            }
            self.push("\n");
        }
    }

    fn gen_decl(&mut self, id: DeclId) {
        let decl = self.arena.decls[id];
        if let Some(doc) = decl.doc {
            self.comment_group(doc);
        }
        let kw = match decl.kind {
            GenDeclKind::Import => "import",
            GenDeclKind::Const => "const",
            GenDeclKind::Type => "type",
            GenDeclKind::Var => "var",
        };
        self.push(kw);

        if decl.grouped {
            self.push(" (");
            self.indent += 1;
            for i in 0..decl.specs.len() {
                let spec = self.arena.specs_list(decl.specs)[i as usize];
                self.newline();
                self.spec(spec);
            }
            self.indent -= 1;
            self.newline();
            self.push(")");
        } else if let Some(&spec) = self.arena.specs_list(decl.specs).first() {
            self.push(" ");
            self.spec(spec);
        }
    }

    fn spec(&mut self, spec: Spec) {
        match spec {
            Spec::Import(import) => {
                match import.name {
                    Some(ImportName::Dot) => self.push(". "),
                    Some(ImportName::Blank) => self.push("_ "),
                    Some(ImportName::Name(name)) => {
                        self.sym(name);
                        self.push(" ");
                    }
                    None => {}
                }
                self.sym(import.path);
            }
            Spec::Value(value) => {
                let names: Vec<_> = self
                    .arena
                    .ident_names(value.names)
                    .iter()
                    .map(|n| n.sym)
                    .collect();
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.sym(*name);
                }
                if let Some(typ) = value.typ {
                    self.push(" ");
                    self.typ(typ, false);
                }
                if !value.values.is_empty() {
                    self.push(" = ");
                    self.expr_list(value.values);
                }
            }
            Spec::Type(spec) => {
                self.sym(spec.name);
                if spec.alias {
                    self.push(" = ");
                } else {
                    self.push(" ");
                }
                self.typ(spec.typ, true);
            }
        }
    }

    fn func_decl(&mut self, id: FuncDeclId) {
        let func = self.arena.funcs[id];
        if let Some(doc) = func.doc {
            self.comment_group(doc);
        }
        self.push("func ");
        if let Some(recv) = func.recv {
            self.push("(");
            if let Some(name) = recv.name {
                self.sym(name);
                self.push(" ");
            }
            self.typ(recv.typ, false);
            self.push(") ");
        }
        self.sym(func.name);
        self.signature(func.signature);
        if let Some(body) = func.body {
            self.push(" ");
            self.block(body);
        }
    }

    fn signature(&mut self, id: SignatureId) {
        let sig = self.arena.signatures[id];
        self.push("(");
        self.field_list(sig.params);
        self.push(")");

        let results = self.arena.fields_list(sig.results);
        match results {
            [] => {}
            [single] if self.arena.fields[*single].names.is_empty() => {
                let typ = self.arena.fields[*single].typ;
                self.push(" ");
                self.typ(typ, false);
            }
            _ => {
                self.push(" (");
                self.field_list(sig.results);
                self.push(")");
            }
        }
    }

    fn field_list(&mut self, fields: ListRef<FieldId>) {
        let ids: Vec<_> = self.arena.fields_list(fields).to_vec();
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.field(*id);
        }
    }

    fn field(&mut self, id: FieldId) {
        let field = self.arena.fields[id];
        let names: Vec<_> = self
            .arena
            .ident_names(field.names)
            .iter()
            .map(|n| n.sym)
            .collect();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.sym(*name);
        }
        if !names.is_empty() {
            self.push(" ");
        }
        if field.variadic {
            self.push("...");
        }
        self.typ(field.typ, false);
        if let Some(tag) = field.tag {
            self.push(" ");
            self.sym(tag);
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// `multiline` lays struct/interface bodies out one member per line,
    /// as in type declarations; elsewhere they print inline.
    fn typ(&mut self, id: TypeId, multiline: bool) {
        match self.arena.types[id] {
            Type::Named { pkg, name } => {
                if let Some(pkg) = pkg {
                    self.sym(pkg);
                    self.push(".");
                }
                self.sym(name);
            }
            Type::Pointer(elem) => {
                self.push("*");
                self.typ(elem, false);
            }
            Type::Slice(elem) => {
                self.push("[]");
                self.typ(elem, false);
            }
            Type::Array { len, elem } => {
                self.push("[");
                match len {
                    ArrayLen::Expr(e) => self.expr(e),
                    ArrayLen::Ellipsis => self.push("..."),
                }
                self.push("]");
                self.typ(elem, false);
            }
            Type::Map { key, val } => {
                self.push("map[");
                self.typ(key, false);
                self.push("]");
                self.typ(val, false);
            }
            Type::Chan { dir, elem } => {
                match dir {
                    ChanDir::Both => self.push("chan "),
                    ChanDir::Send => self.push("chan<- "),
                    ChanDir::Recv => self.push("<-chan "),
                }
                // `chan (<-chan T)` needs the parens to parse as written.
                if dir == ChanDir::Both {
                    if let Type::Chan {
                        dir: ChanDir::Recv, ..
                    } = self.arena.types[elem]
                    {
                        self.push("(");
                        self.typ(elem, false);
                        self.push(")");
                        return;
                    }
                }
                self.typ(elem, false);
            }
            Type::Struct { fields } => {
                let ids: Vec<_> = self.arena.fields_list(fields).to_vec();
                if ids.is_empty() {
                    self.push("struct{}");
                } else if multiline {
                    self.push("struct {");
                    self.indent += 1;
                    for id in ids {
                        self.newline();
                        self.struct_field(id);
                    }
                    self.indent -= 1;
                    self.newline();
                    self.push("}");
                } else {
                    self.push("struct{ ");
                    for (i, id) in ids.iter().enumerate() {
                        if i > 0 {
                            self.push("; ");
                        }
                        self.struct_field(*id);
                    }
                    self.push(" }");
                }
            }
            Type::Interface { elems } => {
                let elems: Vec<_> = self.arena.iface_elems(elems).to_vec();
                if elems.is_empty() {
                    self.push("interface{}");
                } else if multiline {
                    self.push("interface {");
                    self.indent += 1;
                    for elem in elems {
                        self.newline();
                        self.iface_elem(elem);
                    }
                    self.indent -= 1;
                    self.newline();
                    self.push("}");
                } else {
                    self.push("interface{ ");
                    for (i, elem) in elems.iter().enumerate() {
                        if i > 0 {
                            self.push("; ");
                        }
                        self.iface_elem(*elem);
                    }
                    self.push(" }");
                }
            }
            Type::Func(sig) => {
                self.push("func");
                self.signature(sig);
            }
            Type::Paren(inner) => {
                self.push("(");
                self.typ(inner, false);
                self.push(")");
            }
        }
    }

    fn struct_field(&mut self, id: FieldId) {
        self.field(id);
    }

    fn iface_elem(&mut self, elem: InterfaceElem) {
        match elem {
            InterfaceElem::Method { name, sig } => {
                self.sym(name);
                self.signature(sig);
            }
            InterfaceElem::Embedded(typ) => self.typ(typ, false),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn block(&mut self, block: Block) {
        let stmts: Vec<_> = self.arena.stmts_list(block.stmts).to_vec();
        if stmts.is_empty() {
            self.push("{\n");
            for _ in 0..self.indent {
                self.out.push('\t');
            }
            self.push("}");
            return;
        }
        self.push("{");
        self.indent += 1;
        for id in stmts {
            self.newline();
            self.stmt(id);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn stmt(&mut self, id: StmtId) {
        match self.arena.stmts[id] {
            Stmt::Empty => {}
            Stmt::Expr(e) => self.expr(e),
            Stmt::Send { chan, value } => {
                self.expr(chan);
                self.push(" <- ");
                self.expr(value);
            }
            Stmt::IncDec { expr, inc } => {
                self.expr(expr);
                self.push(if inc { "++" } else { "--" });
            }
            Stmt::Assign { lhs, op, rhs } => {
                self.expr_list(lhs);
                self.push(assign_op_str(op));
                self.expr_list(rhs);
            }
            Stmt::ShortVarDecl { names, values } => {
                let names: Vec<_> = self
                    .arena
                    .ident_names(names)
                    .iter()
                    .map(|n| n.sym)
                    .collect();
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.sym(*name);
                }
                self.push(" := ");
                self.expr_list(values);
            }
            Stmt::Decl(id) => self.gen_decl(id),
            Stmt::Labeled { label, stmt } => {
                self.sym(label);
                self.push(":");
                self.newline();
                self.stmt(stmt);
            }
            Stmt::Go(call) => {
                self.push("go ");
                self.expr(call);
            }
            Stmt::Defer(call) => {
                self.push("defer ");
                self.expr(call);
            }
            Stmt::Return { results } => {
                self.push("return");
                if !results.is_empty() {
                    self.push(" ");
                    self.expr_list(results);
                }
            }
            Stmt::Branch { kind, label } => {
                self.push(match kind {
                    BranchKind::Break => "break",
                    BranchKind::Continue => "continue",
                    BranchKind::Goto => "goto",
                    BranchKind::Fallthrough => "fallthrough",
                });
                if let Some(label) = label {
                    self.push(" ");
                    self.sym(label);
                }
            }
            Stmt::Block(block) => self.block(block),
            Stmt::If { .. } => self.if_stmt(id),
            Stmt::For { kind, block } => {
                self.push("for");
                match kind {
                    ForKind::Infinite => {}
                    ForKind::Cond(cond) => {
                        self.push(" ");
                        self.expr(cond);
                    }
                    ForKind::Clause { init, cond, post } => {
                        self.push(" ");
                        if let Some(init) = init {
                            self.stmt(init);
                        }
                        self.push("; ");
                        if let Some(cond) = cond {
                            self.expr(cond);
                        }
                        self.push(";");
                        if let Some(post) = post {
                            self.push(" ");
                            self.stmt(post);
                        }
                    }
                    ForKind::Range { lhs, expr } => {
                        self.push(" ");
                        match lhs {
                            Some(RangeLhs::Define(names)) => {
                                let names: Vec<_> = self
                                    .arena
                                    .ident_names(names)
                                    .iter()
                                    .map(|n| n.sym)
                                    .collect();
                                for (i, name) in names.iter().enumerate() {
                                    if i > 0 {
                                        self.push(", ");
                                    }
                                    self.sym(*name);
                                }
                                self.push(" := ");
                            }
                            Some(RangeLhs::Assign(exprs)) => {
                                self.expr_list(exprs);
                                self.push(" = ");
                            }
                            None => {}
                        }
                        self.push("range ");
                        self.expr(expr);
                    }
                }
                self.push(" ");
                self.block(block);
            }
            Stmt::Switch { init, tag, clauses } => {
                self.push("switch");
                if let Some(init) = init {
                    self.push(" ");
                    self.stmt(init);
                    self.push(";");
                }
                if let Some(tag) = tag {
                    self.push(" ");
                    self.expr(tag);
                }
                self.push(" ");
                self.switch_body(clauses);
            }
            Stmt::TypeSwitch {
                init,
                guard,
                clauses,
            } => {
                self.push("switch");
                if let Some(init) = init {
                    self.push(" ");
                    self.stmt(init);
                    self.push(";");
                }
                self.push(" ");
                if let Some(bind) = guard.bind {
                    self.sym(bind);
                    self.push(" := ");
                }
                self.expr(guard.x);
                self.push(".(type) ");
                self.switch_body(clauses);
            }
            Stmt::Select { clauses } => {
                self.push("select {");
                let ids: Vec<_> = self.arena.comm_clause_ids(clauses).to_vec();
                for id in ids {
                    let clause = self.arena.comm_clauses[id];
                    self.newline();
                    match clause.comm {
                        Some(comm) => {
                            self.push("case ");
                            self.stmt(comm);
                            self.push(":");
                        }
                        None => self.push("default:"),
                    }
                    self.clause_stmts(clause.stmts);
                }
                self.newline();
                self.push("}");
            }
        }
    }

    fn if_stmt(&mut self, id: StmtId) {
        let Stmt::If {
            init,
            cond,
            then_block,
            else_stmt,
        } = self.arena.stmts[id]
        else {
            unreachable!("if_stmt called on a non-if statement");
        };
        self.push("if ");
        if let Some(init) = init {
            self.stmt(init);
            self.push("; ");
        }
        self.expr(cond);
        self.push(" ");
        self.block(then_block);
        if let Some(else_stmt) = else_stmt {
            self.push(" else ");
            match self.arena.stmts[else_stmt] {
                Stmt::If { .. } => self.if_stmt(else_stmt),
                Stmt::Block(block) => self.block(block),
                _ => self.stmt(else_stmt),
            }
        }
    }

    fn switch_body(&mut self, clauses: ListRef<SwitchClauseId>) {
        self.push("{");
        let ids: Vec<_> = self.arena.switch_clause_ids(clauses).to_vec();
        for id in ids {
            let clause = self.arena.switch_clauses[id];
            self.newline();
            if let Some(doc) = clause.doc {
                self.comment_group(doc);
            }
            if clause.is_default {
                self.push("default:");
            } else {
                self.push("case ");
                let items: Vec<_> = self.arena.case_items(clause.items).to_vec();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    match *item {
                        CaseItem::Expr(e) => self.expr(e),
                        CaseItem::Type(t) => self.typ(t, false),
                    }
                }
                self.push(":");
            }
            self.clause_stmts(clause.stmts);
        }
        self.newline();
        self.push("}");
    }

    fn clause_stmts(&mut self, stmts: ListRef<StmtId>) {
        let ids: Vec<_> = self.arena.stmts_list(stmts).to_vec();
        self.indent += 1;
        for id in ids {
            self.newline();
            self.stmt(id);
        }
        self.indent -= 1;
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr_list(&mut self, exprs: ListRef<ExprId>) {
        let ids: Vec<_> = self.arena.exprs_list(exprs).to_vec();
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(*id);
        }
    }

    fn expr(&mut self, id: ExprId) {
        match self.arena.exprs[id] {
            Expr::Ident(sym) => self.sym(sym),
            Expr::BasicLit(lit) => self.sym(lit.text),
            Expr::FuncLit { sig, body } => {
                self.push("func");
                self.signature(sig);
                self.push(" ");
                self.block(body);
            }
            Expr::CompositeLit { typ, elems } => {
                if let Some(typ) = typ {
                    self.typ(typ, false);
                }
                self.push("{");
                let elems: Vec<_> = self.arena.keyed_elems_list(elems).to_vec();
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    if let Some(key) = elem.key {
                        self.expr(key);
                        self.push(": ");
                    }
                    self.expr(elem.value);
                }
                self.push("}");
            }
            Expr::Paren(inner) => {
                self.push("(");
                self.expr(inner);
                self.push(")");
            }
            Expr::Selector { expr, sel } => {
                self.expr(expr);
                self.push(".");
                self.sym(sel);
            }
            Expr::IndexExpr { expr, index } => {
                self.expr(expr);
                self.push("[");
                self.expr(index);
                self.push("]");
            }
            Expr::SliceExpr { expr, lo, hi, max } => {
                self.expr(expr);
                self.push("[");
                if let Some(lo) = lo {
                    self.expr(lo);
                }
                self.push(":");
                if let Some(hi) = hi {
                    self.expr(hi);
                }
                if let Some(max) = max {
                    self.push(":");
                    self.expr(max);
                }
                self.push("]");
            }
            Expr::TypeAssert { expr, typ } => {
                self.expr(expr);
                self.push(".(");
                match typ {
                    Some(typ) => self.typ(typ, false),
                    None => self.push("type"),
                }
                self.push(")");
            }
            Expr::Call {
                callee,
                type_arg,
                args,
                ellipsis,
            } => {
                match callee {
                    Callee::Expr(e) => self.expr(e),
                    Callee::Type(t) => self.typ(t, false),
                }
                self.push("(");
                let mut first = true;
                if let Some(type_arg) = type_arg {
                    self.typ(type_arg, false);
                    first = false;
                }
                let ids: Vec<_> = self.arena.exprs_list(args).to_vec();
                for id in ids {
                    if !first {
                        self.push(", ");
                    }
                    first = false;
                    self.expr(id);
                }
                if ellipsis {
                    self.push("...");
                }
                self.push(")");
            }
            Expr::Unary { op, expr } => {
                self.push(match op {
                    UnaryOp::Add => "+",
                    UnaryOp::Sub => "-",
                    UnaryOp::Not => "!",
                    UnaryOp::Xor => "^",
                    UnaryOp::Deref => "*",
                    UnaryOp::Addr => "&",
                    UnaryOp::Recv => "<-",
                });
                self.expr(expr);
            }
            Expr::Binary { left, op, right } => {
                self.expr(left);
                self.push(binary_op_str(op));
                self.expr(right);
            }
        }
    }
}

fn assign_op_str(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => " = ",
        AssignOp::AddAssign => " += ",
        AssignOp::SubAssign => " -= ",
        AssignOp::MulAssign => " *= ",
        AssignOp::DivAssign => " /= ",
        AssignOp::ModAssign => " %= ",
        AssignOp::AndAssign => " &= ",
        AssignOp::OrAssign => " |= ",
        AssignOp::XorAssign => " ^= ",
        AssignOp::ShlAssign => " <<= ",
        AssignOp::ShrAssign => " >>= ",
        AssignOp::AndNotAssign => " &^= ",
    }
}

fn binary_op_str(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => " + ",
        BinaryOp::Sub => " - ",
        BinaryOp::Mul => " * ",
        BinaryOp::Div => " / ",
        BinaryOp::Mod => " % ",
        BinaryOp::And => " & ",
        BinaryOp::Or => " | ",
        BinaryOp::Xor => " ^ ",
        BinaryOp::Shl => " << ",
        BinaryOp::Shr => " >> ",
        BinaryOp::AndNot => " &^ ",
        BinaryOp::LAnd => " && ",
        BinaryOp::LOr => " || ",
        BinaryOp::Eq => " == ",
        BinaryOp::Ne => " != ",
        BinaryOp::Lt => " < ",
        BinaryOp::Le => " <= ",
        BinaryOp::Gt => " > ",
        BinaryOp::Ge => " >= ",
    }
}

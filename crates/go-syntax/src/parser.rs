//! Hand-written recursive-descent parser producing the arena AST.
//!
//! Expressions use precedence climbing over the Go binary operator table.
//! The composite-literal/block ambiguity in `if`/`for`/`switch` headers is
//! resolved with a `no_lit` flag: while a control-flow header is being
//! parsed, a `{` after an identifier or selector opens the block, not a
//! composite literal. Blocks, parentheses, brackets, and literal bodies
//! reset the flag.
//!
//! Comments are collected from the token stream as they are skipped and
//! attached as doc groups to top-level declarations and switch clauses;
//! elsewhere they are dropped.

use crate::ast::*;
use crate::error::{Diag, ParseFailure, Span};
use crate::lexer::{Lexer, Tok};

type PResult<T> = Result<T, ()>;

pub struct Parser<'a, 'src> {
    arena: &'a mut AstArena,
    interner: &'a mut Interner,
    toks: Vec<(usize, Tok<'src>, usize)>,
    pos: usize,
    prev_end: usize,
    diags: Vec<Diag>,
    pending_comments: Vec<CommentId>,
    /// Inside a control-flow header: `{` does not open a composite literal.
    no_lit: bool,
}

/// Parse one source file into a shared arena.
pub fn parse_file(
    arena: &mut AstArena,
    interner: &mut Interner,
    input: &str,
) -> Result<SourceFile, ParseFailure> {
    let mut lexer = Lexer::new(input);
    let toks: Vec<_> = lexer.by_ref().collect();
    let mut diags = lexer.finish();

    let mut parser = Parser {
        arena,
        interner,
        toks,
        pos: 0,
        prev_end: 0,
        diags: Vec::new(),
        pending_comments: Vec::new(),
        no_lit: false,
    };

    let file = parser.parse_source_file();
    diags.extend(parser.diags);

    match file {
        Ok(file) if diags.is_empty() => Ok(file),
        _ => Err(ParseFailure { diags }),
    }
}

/// Convenience entry point: parse into a fresh arena.
pub fn parse_source(input: &str) -> Result<(AstArena, Interner, SourceFile), ParseFailure> {
    let mut arena = AstArena::new();
    let mut interner = Interner::new();
    let file = parse_file(&mut arena, &mut interner, input)?;
    Ok((arena, interner, file))
}

impl<'a, 'src> Parser<'a, 'src> {
    // =========================================================================
    // Token cursor
    // =========================================================================

    /// Current non-comment token; comments are stashed for doc attachment.
    fn cur(&mut self) -> Tok<'src> {
        loop {
            match self.toks.get(self.pos) {
                Some(&(_, Tok::Comment(text), _)) => {
                    let sym = self.interner.intern(text);
                    let span = self.cur_span();
                    let id = self.arena.comments.alloc(Comment { text: sym }, span);
                    self.pending_comments.push(id);
                    self.pos += 1;
                }
                Some(&(_, tok, _)) => return tok,
                None => return Tok::Eof,
            }
        }
    }

    /// Current token without comment handling (lookahead helper).
    fn peek_nth(&self, n: usize) -> Tok<'src> {
        let mut seen = 0;
        for &(_, tok, _) in &self.toks[self.pos..] {
            if matches!(tok, Tok::Comment(_)) {
                continue;
            }
            if seen == n {
                return tok;
            }
            seen += 1;
        }
        Tok::Eof
    }

    fn cur_span(&self) -> Span {
        match self.toks.get(self.pos) {
            Some(&(s, _, e)) => Span::new(s, e),
            None => Span::empty_at(self.prev_end),
        }
    }

    fn bump(&mut self) -> Tok<'src> {
        let tok = self.cur();
        if let Some(&(_, _, end)) = self.toks.get(self.pos) {
            self.prev_end = end;
            self.pos += 1;
        }
        tok
    }

    fn start(&mut self) -> u32 {
        let _ = self.cur(); // position past comments
        self.cur_span().start
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start as usize, self.prev_end)
    }

    fn at(&mut self, tok: Tok<'static>) -> bool {
        self.cur() == tok
    }

    fn eat(&mut self, tok: Tok<'static>) -> bool {
        if self.at(tok) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn error<T>(&mut self, message: impl Into<String>) -> PResult<T> {
        let span = self.cur_span();
        self.diags.push(Diag::parse(span, message));
        Err(())
    }

    fn expect(&mut self, tok: Tok<'static>, what: &str) -> PResult<()> {
        if self.eat(tok) {
            Ok(())
        } else {
            let got = self.cur();
            self.error(format!("expected {what}, found {got}"))
        }
    }

    /// Statement terminator; Go permits omitting the semicolon before a
    /// closing delimiter or a new case clause.
    fn expect_semi(&mut self) -> PResult<()> {
        match self.cur() {
            Tok::Semi => {
                self.bump();
                Ok(())
            }
            Tok::RBrace | Tok::RParen | Tok::KwCase | Tok::KwDefault | Tok::Eof => Ok(()),
            got => self.error(format!("expected ';', found {got}")),
        }
    }

    fn expect_ident(&mut self, what: &str) -> PResult<IdentName> {
        match self.cur() {
            Tok::Ident(name) => {
                let pos = self.cur_span();
                let sym = self.interner.intern(name);
                self.bump();
                Ok(IdentName { sym, pos })
            }
            got => self.error(format!("expected {what}, found {got}")),
        }
    }

    fn take_doc(&mut self) -> Option<CommentGroupId> {
        if self.pending_comments.is_empty() {
            return None;
        }
        let ids = std::mem::take(&mut self.pending_comments);
        let comments = self.arena.list_comment_ids(ids);
        Some(
            self.arena
                .comment_groups
                .alloc(CommentGroup { comments }, Span::default()),
        )
    }

    fn drop_pending_comments(&mut self) {
        self.pending_comments.clear();
    }

    fn starts_type(&mut self) -> bool {
        matches!(
            self.cur(),
            Tok::Ident(_)
                | Tok::Star
                | Tok::LBrack
                | Tok::KwMap
                | Tok::KwChan
                | Tok::Arrow
                | Tok::KwFunc
                | Tok::KwStruct
                | Tok::KwInterface
                | Tok::LParen
        )
    }

    /// A type that cannot be confused with an expression operand.
    fn starts_unambiguous_type(&mut self) -> bool {
        match self.cur() {
            Tok::LBrack | Tok::KwMap | Tok::KwChan | Tok::KwStruct | Tok::KwInterface
            | Tok::KwFunc => true,
            Tok::Arrow => self.peek_nth(1) == Tok::KwChan,
            _ => false,
        }
    }

    // =========================================================================
    // Source file and declarations
    // =========================================================================

    fn parse_source_file(&mut self) -> PResult<SourceFile> {
        let _ = self.cur();
        let doc = self.take_doc();

        self.expect(Tok::KwPackage, "`package`")?;
        let package = self.expect_ident("package name")?.sym;
        self.expect_semi()?;

        let mut decls = Vec::new();
        loop {
            match self.cur() {
                Tok::Eof => break,
                Tok::Semi => {
                    self.bump();
                }
                _ => decls.push(self.parse_top_level_decl()?),
            }
        }

        let decls = self.arena.list_top_decls(decls);
        Ok(SourceFile {
            package,
            decls,
            doc,
        })
    }

    fn parse_top_level_decl(&mut self) -> PResult<TopLevelDecl> {
        let doc = self.take_doc();
        match self.cur() {
            Tok::KwImport | Tok::KwConst | Tok::KwType | Tok::KwVar => {
                let id = self.parse_gen_decl(doc)?;
                self.expect_semi()?;
                Ok(TopLevelDecl::Decl(id))
            }
            Tok::KwFunc => {
                let id = self.parse_func_decl(doc)?;
                self.expect_semi()?;
                Ok(TopLevelDecl::Func(id))
            }
            got => self.error(format!("expected declaration, found {got}")),
        }
    }

    fn parse_gen_decl(&mut self, doc: Option<CommentGroupId>) -> PResult<DeclId> {
        let start = self.start();
        let kind = match self.bump() {
            Tok::KwImport => GenDeclKind::Import,
            Tok::KwConst => GenDeclKind::Const,
            Tok::KwType => GenDeclKind::Type,
            Tok::KwVar => GenDeclKind::Var,
            _ => unreachable!("caller checked the keyword"),
        };

        let mut specs = Vec::new();
        let grouped = self.eat(Tok::LParen);
        if grouped {
            while !self.at(Tok::RParen) && !self.at(Tok::Eof) {
                if self.eat(Tok::Semi) {
                    continue;
                }
                self.drop_pending_comments();
                specs.push(self.parse_spec(kind)?);
                self.expect_semi()?;
            }
            self.expect(Tok::RParen, "`)`")?;
        } else {
            specs.push(self.parse_spec(kind)?);
        }

        let specs = self.arena.list_specs(specs);
        let span = self.span_from(start);
        Ok(self.arena.decls.alloc(
            GenDecl {
                doc,
                kind,
                grouped,
                specs,
            },
            span,
        ))
    }

    fn parse_spec(&mut self, kind: GenDeclKind) -> PResult<Spec> {
        match kind {
            GenDeclKind::Import => self.parse_import_spec(),
            GenDeclKind::Type => self.parse_type_spec(),
            GenDeclKind::Const | GenDeclKind::Var => self.parse_value_spec(),
        }
    }

    fn parse_import_spec(&mut self) -> PResult<Spec> {
        let name = match self.cur() {
            Tok::Dot => {
                self.bump();
                Some(ImportName::Dot)
            }
            Tok::Ident("_") => {
                self.bump();
                Some(ImportName::Blank)
            }
            Tok::Ident(name) => {
                let sym = self.interner.intern(name);
                self.bump();
                Some(ImportName::Name(sym))
            }
            _ => None,
        };
        let path = match self.cur() {
            Tok::StringLit(raw) | Tok::RawStringLit(raw) => {
                let sym = self.interner.intern(raw);
                self.bump();
                sym
            }
            got => return self.error(format!("expected import path, found {got}")),
        };
        Ok(Spec::Import(ImportSpec { name, path }))
    }

    fn parse_type_spec(&mut self) -> PResult<Spec> {
        let name = self.expect_ident("type name")?.sym;
        let alias = self.eat(Tok::Assign);
        let typ = self.parse_type()?;
        Ok(Spec::Type(TypeSpec { name, alias, typ }))
    }

    fn parse_value_spec(&mut self) -> PResult<Spec> {
        let mut names = vec![self.expect_ident("name")?];
        while self.eat(Tok::Comma) {
            names.push(self.expect_ident("name")?);
        }
        let names = self.arena.list_ident_names(names);

        let typ = if !self.at(Tok::Assign) && self.starts_type() && !self.at(Tok::Eof) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let values = if self.eat(Tok::Assign) {
            let exprs = self.parse_expr_list()?;
            self.arena.list_exprs(exprs)
        } else {
            ListRef::EMPTY
        };

        Ok(Spec::Value(ValueSpec {
            names,
            typ,
            values,
        }))
    }

    fn parse_func_decl(&mut self, doc: Option<CommentGroupId>) -> PResult<FuncDeclId> {
        let start = self.start();
        self.expect(Tok::KwFunc, "`func`")?;

        let recv = if self.at(Tok::LParen) {
            Some(self.parse_receiver()?)
        } else {
            None
        };

        let name_tok = self.expect_ident("function name")?;
        let signature = self.parse_signature()?;

        let body = if self.at(Tok::LBrace) {
            Some(self.parse_block()?)
        } else {
            None
        };

        let span = self.span_from(start);
        Ok(self.arena.funcs.alloc(
            FuncDecl {
                doc,
                recv,
                name: name_tok.sym,
                name_pos: name_tok.pos,
                signature,
                body,
            },
            span,
        ))
    }

    fn parse_receiver(&mut self) -> PResult<Receiver> {
        self.expect(Tok::LParen, "`(`")?;
        let recv = match self.cur() {
            // `(p Point)` / `(p *Point)` vs `(Point)`
            Tok::Ident(name) if self.peek_nth(1) != Tok::RParen && self.peek_nth(1) != Tok::Dot => {
                let sym = self.interner.intern(name);
                self.bump();
                let typ = self.parse_type()?;
                Receiver {
                    name: Some(sym),
                    typ,
                }
            }
            _ => {
                let typ = self.parse_type()?;
                Receiver { name: None, typ }
            }
        };
        self.expect(Tok::RParen, "`)`")?;
        Ok(recv)
    }

    fn parse_signature(&mut self) -> PResult<SignatureId> {
        let start = self.start();
        self.expect(Tok::LParen, "`(`")?;
        let params = self.parse_param_list()?;

        let results = if self.at(Tok::LParen) {
            self.bump();
            self.parse_param_list()?
        } else if self.starts_type() && !self.at(Tok::LBrace) {
            let typ = self.parse_type()?;
            let field = self.arena.fields.alloc(
                Field {
                    names: ListRef::EMPTY,
                    variadic: false,
                    typ,
                    tag: None,
                    embedded: false,
                },
                Span::default(),
            );
            self.arena.list_fields([field])
        } else {
            ListRef::EMPTY
        };

        let span = self.span_from(start);
        Ok(self
            .arena
            .signatures
            .alloc(Signature { params, results }, span))
    }

    /// Parameter/result list; the opening `(` has been consumed.
    ///
    /// Entries are parsed as types first; a bare identifier followed by
    /// another type is reinterpreted as a name. Bare entries group onto the
    /// next named entry, matching `(a, b int)`.
    fn parse_param_list(&mut self) -> PResult<ListRef<FieldId>> {
        enum Entry {
            Bare(TypeId),
            Named {
                name: IdentName,
                variadic: bool,
                typ: TypeId,
            },
            BareVariadic(TypeId),
        }

        let saved = std::mem::replace(&mut self.no_lit, false);
        let mut entries: Vec<Entry> = Vec::new();

        while !self.at(Tok::RParen) && !self.at(Tok::Eof) {
            if self.eat(Tok::Ellipsis) {
                let typ = self.parse_type()?;
                entries.push(Entry::BareVariadic(typ));
            } else {
                let before = self.cur_span();
                let typ = self.parse_type()?;
                let is_plain_ident = matches!(
                    self.arena.types[typ],
                    Type::Named { pkg: None, .. }
                );
                if is_plain_ident && (self.starts_type() || self.at(Tok::Ellipsis)) {
                    let Type::Named { name, .. } = self.arena.types[typ] else {
                        unreachable!()
                    };
                    let variadic = self.eat(Tok::Ellipsis);
                    let real = self.parse_type()?;
                    entries.push(Entry::Named {
                        name: IdentName {
                            sym: name,
                            pos: before,
                        },
                        variadic,
                        typ: real,
                    });
                } else {
                    entries.push(Entry::Bare(typ));
                }
            }
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        self.expect(Tok::RParen, "`)`")?;
        self.no_lit = saved;

        let named = entries
            .iter()
            .any(|e| matches!(e, Entry::Named { .. }));

        let mut fields = Vec::new();
        let mut group: Vec<IdentName> = Vec::new();
        for entry in entries {
            match entry {
                Entry::Bare(typ) if named => {
                    // A name waiting for its group's type.
                    let Type::Named { name, .. } = self.arena.types[typ] else {
                        return self.error("cannot mix named and unnamed parameters");
                    };
                    group.push(IdentName {
                        sym: name,
                        pos: self.arena.types.span(typ),
                    });
                }
                Entry::Bare(typ) => {
                    let field = self.alloc_field(ListRef::EMPTY, false, typ);
                    fields.push(field);
                }
                Entry::BareVariadic(typ) => {
                    let field = self.alloc_field(ListRef::EMPTY, true, typ);
                    fields.push(field);
                }
                Entry::Named {
                    name,
                    variadic,
                    typ,
                } => {
                    group.push(name);
                    let names = self.arena.list_ident_names(std::mem::take(&mut group));
                    let field = self.alloc_field(names, variadic, typ);
                    fields.push(field);
                }
            }
        }
        if !group.is_empty() {
            return self.error("parameter names without a type");
        }

        Ok(self.arena.list_fields(fields))
    }

    fn alloc_field(&mut self, names: ListRef<IdentName>, variadic: bool, typ: TypeId) -> FieldId {
        self.arena.fields.alloc(
            Field {
                names,
                variadic,
                typ,
                tag: None,
                embedded: false,
            },
            Span::default(),
        )
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> PResult<TypeId> {
        let start = self.start();
        let node = match self.cur() {
            Tok::Ident(name) => {
                let first = self.interner.intern(name);
                self.bump();
                if self.eat(Tok::Dot) {
                    let sel = self.expect_ident("type name")?.sym;
                    Type::Named {
                        pkg: Some(first),
                        name: sel,
                    }
                } else {
                    Type::Named {
                        pkg: None,
                        name: first,
                    }
                }
            }
            Tok::Star => {
                self.bump();
                let elem = self.parse_type()?;
                Type::Pointer(elem)
            }
            Tok::LBrack => {
                self.bump();
                if self.eat(Tok::RBrack) {
                    let elem = self.parse_type()?;
                    Type::Slice(elem)
                } else if self.eat(Tok::Ellipsis) {
                    self.expect(Tok::RBrack, "`]`")?;
                    let elem = self.parse_type()?;
                    Type::Array {
                        len: ArrayLen::Ellipsis,
                        elem,
                    }
                } else {
                    let saved = std::mem::replace(&mut self.no_lit, false);
                    let len = self.parse_expr()?;
                    self.no_lit = saved;
                    self.expect(Tok::RBrack, "`]`")?;
                    let elem = self.parse_type()?;
                    Type::Array {
                        len: ArrayLen::Expr(len),
                        elem,
                    }
                }
            }
            Tok::KwMap => {
                self.bump();
                self.expect(Tok::LBrack, "`[`")?;
                let key = self.parse_type()?;
                self.expect(Tok::RBrack, "`]`")?;
                let val = self.parse_type()?;
                Type::Map { key, val }
            }
            Tok::KwChan => {
                self.bump();
                let dir = if self.eat(Tok::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = self.parse_type()?;
                Type::Chan { dir, elem }
            }
            Tok::Arrow => {
                self.bump();
                self.expect(Tok::KwChan, "`chan`")?;
                let elem = self.parse_type()?;
                Type::Chan {
                    dir: ChanDir::Recv,
                    elem,
                }
            }
            Tok::KwFunc => {
                self.bump();
                let sig = self.parse_signature()?;
                Type::Func(sig)
            }
            Tok::KwStruct => {
                self.bump();
                let fields = self.parse_struct_fields()?;
                Type::Struct { fields }
            }
            Tok::KwInterface => {
                self.bump();
                let elems = self.parse_interface_elems()?;
                Type::Interface { elems }
            }
            Tok::LParen => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(Tok::RParen, "`)`")?;
                Type::Paren(inner)
            }
            got => return self.error(format!("expected type, found {got}")),
        };
        let span = self.span_from(start);
        Ok(self.arena.types.alloc(node, span))
    }

    fn parse_struct_fields(&mut self) -> PResult<ListRef<FieldId>> {
        let saved = std::mem::replace(&mut self.no_lit, false);
        self.expect(Tok::LBrace, "`{`")?;
        let mut fields = Vec::new();
        while !self.at(Tok::RBrace) && !self.at(Tok::Eof) {
            if self.eat(Tok::Semi) {
                continue;
            }
            self.drop_pending_comments();
            fields.push(self.parse_struct_field()?);
            self.expect_semi()?;
        }
        self.expect(Tok::RBrace, "`}`")?;
        self.no_lit = saved;
        Ok(self.arena.list_fields(fields))
    }

    fn parse_struct_field(&mut self) -> PResult<FieldId> {
        let start = self.start();
        // Embedded field: `io.Reader`, `*Buffer`, or a lone identifier
        // followed by the end of the field declaration.
        let embedded = match self.cur() {
            Tok::Star => true,
            Tok::Ident(_) => matches!(
                self.peek_nth(1),
                Tok::Dot
                    | Tok::Semi
                    | Tok::RBrace
                    | Tok::StringLit(_)
                    | Tok::RawStringLit(_)
            ),
            _ => false,
        };

        let (names, typ) = if embedded {
            (ListRef::EMPTY, self.parse_type()?)
        } else {
            let mut names = vec![self.expect_ident("field name")?];
            while self.eat(Tok::Comma) {
                names.push(self.expect_ident("field name")?);
            }
            let names = self.arena.list_ident_names(names);
            (names, self.parse_type()?)
        };

        let tag = match self.cur() {
            Tok::StringLit(raw) | Tok::RawStringLit(raw) => {
                let sym = self.interner.intern(raw);
                self.bump();
                Some(sym)
            }
            _ => None,
        };

        let span = self.span_from(start);
        Ok(self.arena.fields.alloc(
            Field {
                names,
                variadic: false,
                typ,
                tag,
                embedded,
            },
            span,
        ))
    }

    fn parse_interface_elems(&mut self) -> PResult<ListRef<InterfaceElem>> {
        let saved = std::mem::replace(&mut self.no_lit, false);
        self.expect(Tok::LBrace, "`{`")?;
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) && !self.at(Tok::Eof) {
            if self.eat(Tok::Semi) {
                continue;
            }
            self.drop_pending_comments();
            let elem = match self.cur() {
                Tok::Ident(_) if self.peek_nth(1) == Tok::LParen => {
                    let name = self.expect_ident("method name")?.sym;
                    let sig = self.parse_signature()?;
                    InterfaceElem::Method { name, sig }
                }
                _ => InterfaceElem::Embedded(self.parse_type()?),
            };
            elems.push(elem);
            self.expect_semi()?;
        }
        self.expect(Tok::RBrace, "`}`")?;
        self.no_lit = saved;
        Ok(self.arena.list_iface_elems(elems))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> PResult<Block> {
        let saved = std::mem::replace(&mut self.no_lit, false);
        self.expect(Tok::LBrace, "`{`")?;
        let stmts = self.parse_stmt_list()?;
        self.expect(Tok::RBrace, "`}`")?;
        self.no_lit = saved;
        Ok(Block { stmts })
    }

    fn parse_stmt_list(&mut self) -> PResult<ListRef<StmtId>> {
        let mut stmts = Vec::new();
        loop {
            match self.cur() {
                Tok::RBrace | Tok::KwCase | Tok::KwDefault | Tok::Eof => break,
                Tok::Semi => {
                    self.bump();
                }
                _ => {
                    self.drop_pending_comments();
                    stmts.push(self.parse_stmt()?);
                    self.expect_semi()?;
                }
            }
        }
        Ok(self.arena.list_stmts(stmts))
    }

    fn parse_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        let node = match self.cur() {
            Tok::KwVar | Tok::KwConst | Tok::KwType => {
                let id = self.parse_gen_decl(None)?;
                Stmt::Decl(id)
            }
            Tok::KwGo => {
                self.bump();
                Stmt::Go(self.parse_expr()?)
            }
            Tok::KwDefer => {
                self.bump();
                Stmt::Defer(self.parse_expr()?)
            }
            Tok::KwReturn => {
                self.bump();
                let results = if matches!(self.cur(), Tok::Semi | Tok::RBrace) {
                    ListRef::EMPTY
                } else {
                    let exprs = self.parse_expr_list()?;
                    self.arena.list_exprs(exprs)
                };
                Stmt::Return { results }
            }
            Tok::KwBreak | Tok::KwContinue | Tok::KwGoto | Tok::KwFallthrough => {
                let kind = match self.bump() {
                    Tok::KwBreak => BranchKind::Break,
                    Tok::KwContinue => BranchKind::Continue,
                    Tok::KwGoto => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                let label = match self.cur() {
                    Tok::Ident(name) if kind != BranchKind::Fallthrough => {
                        let sym = self.interner.intern(name);
                        self.bump();
                        Some(sym)
                    }
                    _ => None,
                };
                Stmt::Branch { kind, label }
            }
            Tok::LBrace => Stmt::Block(self.parse_block()?),
            Tok::KwIf => return self.parse_if_stmt(),
            Tok::KwFor => return self.parse_for_stmt(),
            Tok::KwSwitch => return self.parse_switch_stmt(),
            Tok::KwSelect => return self.parse_select_stmt(),
            Tok::Ident(name) if self.peek_nth(1) == Tok::Colon => {
                let sym = self.interner.intern(name);
                self.bump();
                self.bump(); // `:`
                let stmt = self.parse_stmt()?;
                Stmt::Labeled { label: sym, stmt }
            }
            _ => {
                let stmt = self.parse_simple_stmt()?;
                let span = self.span_from(start);
                return Ok(self.arena.stmts.alloc(stmt, span));
            }
        };
        let span = self.span_from(start);
        Ok(self.arena.stmts.alloc(node, span))
    }

    /// `SimpleStmt = ExpressionStmt | SendStmt | IncDecStmt | Assignment | ShortVarDecl`
    fn parse_simple_stmt(&mut self) -> PResult<Stmt> {
        let exprs = self.parse_expr_list()?;

        let assign_op = match self.cur() {
            Tok::Assign => Some(AssignOp::Assign),
            Tok::AddAssign => Some(AssignOp::AddAssign),
            Tok::SubAssign => Some(AssignOp::SubAssign),
            Tok::MulAssign => Some(AssignOp::MulAssign),
            Tok::DivAssign => Some(AssignOp::DivAssign),
            Tok::ModAssign => Some(AssignOp::ModAssign),
            Tok::AndAssign => Some(AssignOp::AndAssign),
            Tok::OrAssign => Some(AssignOp::OrAssign),
            Tok::XorAssign => Some(AssignOp::XorAssign),
            Tok::ShlAssign => Some(AssignOp::ShlAssign),
            Tok::ShrAssign => Some(AssignOp::ShrAssign),
            Tok::AndNotAssign => Some(AssignOp::AndNotAssign),
            _ => None,
        };

        if let Some(op) = assign_op {
            self.bump();
            let rhs = self.parse_expr_list()?;
            let lhs = self.arena.list_exprs(exprs);
            let rhs = self.arena.list_exprs(rhs);
            return Ok(Stmt::Assign { lhs, op, rhs });
        }

        if self.at(Tok::Define) {
            self.bump();
            let names = self.idents_from_exprs(&exprs)?;
            let values = self.parse_expr_list()?;
            let names = self.arena.list_ident_names(names);
            let values = self.arena.list_exprs(values);
            return Ok(Stmt::ShortVarDecl { names, values });
        }

        if exprs.len() != 1 {
            return self.error("expected one expression");
        }
        let expr = exprs[0];

        match self.cur() {
            Tok::Arrow => {
                self.bump();
                let value = self.parse_expr()?;
                Ok(Stmt::Send { chan: expr, value })
            }
            Tok::Inc => {
                self.bump();
                Ok(Stmt::IncDec { expr, inc: true })
            }
            Tok::Dec => {
                self.bump();
                Ok(Stmt::IncDec { expr, inc: false })
            }
            _ => Ok(Stmt::Expr(expr)),
        }
    }

    fn idents_from_exprs(&mut self, exprs: &[ExprId]) -> PResult<Vec<IdentName>> {
        let mut names = Vec::with_capacity(exprs.len());
        for &e in exprs {
            match self.arena.exprs[e] {
                Expr::Ident(sym) => names.push(IdentName {
                    sym,
                    pos: self.arena.exprs.span(e),
                }),
                _ => return self.error("expected identifier on left side of `:=`"),
            }
        }
        Ok(names)
    }

    fn parse_if_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        self.expect(Tok::KwIf, "`if`")?;

        let saved = std::mem::replace(&mut self.no_lit, true);
        let first = self.parse_simple_stmt()?;
        let (init, cond) = if self.eat(Tok::Semi) {
            let span = self.span_from(start);
            let init = self.arena.stmts.alloc(first, span);
            let cond = self.parse_expr()?;
            (Some(init), cond)
        } else {
            match first {
                Stmt::Expr(e) => (None, e),
                _ => return self.error("missing condition in if statement"),
            }
        };
        self.no_lit = saved;

        let then_block = self.parse_block()?;
        let else_stmt = if self.eat(Tok::KwElse) {
            let stmt = match self.cur() {
                Tok::KwIf => self.parse_if_stmt()?,
                Tok::LBrace => {
                    let s = self.start();
                    let block = self.parse_block()?;
                    let span = self.span_from(s);
                    self.arena.stmts.alloc(Stmt::Block(block), span)
                }
                got => return self.error(format!("expected `if` or block after `else`, found {got}")),
            };
            Some(stmt)
        } else {
            None
        };

        let span = self.span_from(start);
        Ok(self.arena.stmts.alloc(
            Stmt::If {
                init,
                cond,
                then_block,
                else_stmt,
            },
            span,
        ))
    }

    fn parse_for_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        self.expect(Tok::KwFor, "`for`")?;

        let saved = std::mem::replace(&mut self.no_lit, true);
        let kind = self.parse_for_header(start)?;
        self.no_lit = saved;

        let block = self.parse_block()?;
        let span = self.span_from(start);
        Ok(self.arena.stmts.alloc(Stmt::For { kind, block }, span))
    }

    fn parse_for_header(&mut self, start: u32) -> PResult<ForKind> {
        if self.at(Tok::LBrace) {
            return Ok(ForKind::Infinite);
        }

        if self.eat(Tok::KwRange) {
            let expr = self.parse_expr()?;
            return Ok(ForKind::Range { lhs: None, expr });
        }

        // `for ; cond ; post`
        if self.eat(Tok::Semi) {
            return self.parse_for_clause_tail(None, start);
        }

        let exprs = self.parse_expr_list()?;

        if self.at(Tok::Define) {
            self.bump();
            if self.eat(Tok::KwRange) {
                let names = self.idents_from_exprs(&exprs)?;
                let names = self.arena.list_ident_names(names);
                let expr = self.parse_expr()?;
                return Ok(ForKind::Range {
                    lhs: Some(RangeLhs::Define(names)),
                    expr,
                });
            }
            let names = self.idents_from_exprs(&exprs)?;
            let values = self.parse_expr_list()?;
            let names = self.arena.list_ident_names(names);
            let values = self.arena.list_exprs(values);
            let init = self
                .arena
                .stmts
                .alloc(Stmt::ShortVarDecl { names, values }, self.span_from(start));
            self.expect(Tok::Semi, "`;`")?;
            return self.parse_for_clause_tail(Some(init), start);
        }

        if self.at(Tok::Assign) {
            self.bump();
            if self.eat(Tok::KwRange) {
                let lhs = self.arena.list_exprs(exprs);
                let expr = self.parse_expr()?;
                return Ok(ForKind::Range {
                    lhs: Some(RangeLhs::Assign(lhs)),
                    expr,
                });
            }
            let rhs = self.parse_expr_list()?;
            let lhs = self.arena.list_exprs(exprs);
            let rhs = self.arena.list_exprs(rhs);
            let init = self.arena.stmts.alloc(
                Stmt::Assign {
                    lhs,
                    op: AssignOp::Assign,
                    rhs,
                },
                self.span_from(start),
            );
            self.expect(Tok::Semi, "`;`")?;
            return self.parse_for_clause_tail(Some(init), start);
        }

        if exprs.len() != 1 {
            return self.error("expected one expression in for header");
        }
        let expr = exprs[0];

        match self.cur() {
            Tok::Semi => {
                self.bump();
                let init = self
                    .arena
                    .stmts
                    .alloc(Stmt::Expr(expr), self.span_from(start));
                self.parse_for_clause_tail(Some(init), start)
            }
            Tok::Inc | Tok::Dec => {
                let inc = self.bump() == Tok::Inc;
                let init = self
                    .arena
                    .stmts
                    .alloc(Stmt::IncDec { expr, inc }, self.span_from(start));
                self.expect(Tok::Semi, "`;`")?;
                self.parse_for_clause_tail(Some(init), start)
            }
            _ => Ok(ForKind::Cond(expr)),
        }
    }

    /// Cond and post of a three-clause `for`; the first `;` is consumed.
    fn parse_for_clause_tail(&mut self, init: Option<StmtId>, start: u32) -> PResult<ForKind> {
        let cond = if self.at(Tok::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(Tok::Semi, "`;`")?;
        let post = if self.at(Tok::LBrace) {
            None
        } else {
            let stmt = self.parse_simple_stmt()?;
            Some(self.arena.stmts.alloc(stmt, self.span_from(start)))
        };
        Ok(ForKind::Clause { init, cond, post })
    }

    fn parse_switch_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        self.expect(Tok::KwSwitch, "`switch`")?;

        let saved = std::mem::replace(&mut self.no_lit, true);
        let mut init = None;
        let mut header = None;

        if !self.at(Tok::LBrace) {
            let first = self.parse_simple_stmt()?;
            if self.eat(Tok::Semi) {
                init = Some(self.arena.stmts.alloc(first, self.span_from(start)));
                if !self.at(Tok::LBrace) {
                    header = Some(self.parse_simple_stmt()?);
                }
            } else {
                header = Some(first);
            }
        }
        self.no_lit = saved;

        // A header of the form `x := y.(type)` or `y.(type)` selects a type
        // switch; any other expression is the tag of a value switch.
        let guard = match &header {
            Some(Stmt::ShortVarDecl { names, values }) => {
                let names = *names;
                let values = *values;
                let value_ids = self.arena.exprs_list(values);
                if names.len() == 1 && value_ids.len() == 1 {
                    let value = value_ids[0];
                    if let Expr::TypeAssert { expr, typ: None } = self.arena.exprs[value] {
                        let bind = self.arena.ident_names(names)[0].sym;
                        Some(TypeSwitchGuard {
                            bind: Some(bind),
                            x: expr,
                        })
                    } else {
                        None
                    }
                } else {
                    None
                }
            }
            Some(Stmt::Expr(e)) => {
                if let Expr::TypeAssert { expr, typ: None } = self.arena.exprs[*e] {
                    Some(TypeSwitchGuard {
                        bind: None,
                        x: expr,
                    })
                } else {
                    None
                }
            }
            _ => None,
        };

        let node = if let Some(guard) = guard {
            let clauses = self.parse_switch_body(true)?;
            Stmt::TypeSwitch {
                init,
                guard,
                clauses,
            }
        } else {
            let tag = match header {
                None => None,
                Some(Stmt::Expr(e)) => Some(e),
                Some(_) => return self.error("invalid switch header"),
            };
            let clauses = self.parse_switch_body(false)?;
            Stmt::Switch { init, tag, clauses }
        };

        let span = self.span_from(start);
        Ok(self.arena.stmts.alloc(node, span))
    }

    fn parse_switch_body(&mut self, type_switch: bool) -> PResult<ListRef<SwitchClauseId>> {
        let saved = std::mem::replace(&mut self.no_lit, false);
        self.expect(Tok::LBrace, "`{`")?;
        let mut clauses = Vec::new();
        while !self.at(Tok::RBrace) && !self.at(Tok::Eof) {
            if self.eat(Tok::Semi) {
                continue;
            }
            clauses.push(self.parse_switch_clause(type_switch)?);
        }
        self.expect(Tok::RBrace, "`}`")?;
        self.no_lit = saved;
        Ok(self.arena.list_switch_clause_ids(clauses))
    }

    fn parse_switch_clause(&mut self, type_switch: bool) -> PResult<SwitchClauseId> {
        let start = self.start();
        let doc = self.take_doc();

        let (is_default, items) = match self.cur() {
            Tok::KwDefault => {
                self.bump();
                (true, ListRef::EMPTY)
            }
            Tok::KwCase => {
                self.bump();
                let mut items = Vec::new();
                loop {
                    let item = if type_switch {
                        CaseItem::Type(self.parse_type()?)
                    } else {
                        CaseItem::Expr(self.parse_expr()?)
                    };
                    items.push(item);
                    if !self.eat(Tok::Comma) {
                        break;
                    }
                }
                (false, self.arena.list_case_items(items))
            }
            got => return self.error(format!("expected `case` or `default`, found {got}")),
        };

        self.expect(Tok::Colon, "`:`")?;
        let stmts = self.parse_stmt_list()?;

        let span = self.span_from(start);
        Ok(self.arena.switch_clauses.alloc(
            SwitchClause {
                doc,
                is_default,
                items,
                stmts,
            },
            span,
        ))
    }

    fn parse_select_stmt(&mut self) -> PResult<StmtId> {
        let start = self.start();
        self.expect(Tok::KwSelect, "`select`")?;
        self.expect(Tok::LBrace, "`{`")?;

        let mut clauses = Vec::new();
        while !self.at(Tok::RBrace) && !self.at(Tok::Eof) {
            if self.eat(Tok::Semi) {
                continue;
            }
            self.drop_pending_comments();
            let cstart = self.start();
            let comm = match self.cur() {
                Tok::KwDefault => {
                    self.bump();
                    None
                }
                Tok::KwCase => {
                    self.bump();
                    let stmt = self.parse_simple_stmt()?;
                    Some(self.arena.stmts.alloc(stmt, self.span_from(cstart)))
                }
                got => return self.error(format!("expected `case` or `default`, found {got}")),
            };
            self.expect(Tok::Colon, "`:`")?;
            let stmts = self.parse_stmt_list()?;
            let span = self.span_from(cstart);
            clauses.push(
                self.arena
                    .comm_clauses
                    .alloc(CommClause { comm, stmts }, span),
            );
        }
        self.expect(Tok::RBrace, "`}`")?;

        let clauses = self.arena.list_comm_clause_ids(clauses);
        let span = self.span_from(start);
        Ok(self.arena.stmts.alloc(Stmt::Select { clauses }, span))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(Tok::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self) -> PResult<ExprId> {
        self.parse_binary_expr(0)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> PResult<ExprId> {
        let start = self.start();
        let mut left = self.parse_unary_expr()?;

        loop {
            let (op, prec) = match self.cur() {
                Tok::LOr => (BinaryOp::LOr, 1),
                Tok::LAnd => (BinaryOp::LAnd, 2),
                Tok::EqEq => (BinaryOp::Eq, 3),
                Tok::NotEq => (BinaryOp::Ne, 3),
                Tok::Lt => (BinaryOp::Lt, 3),
                Tok::Le => (BinaryOp::Le, 3),
                Tok::Gt => (BinaryOp::Gt, 3),
                Tok::Ge => (BinaryOp::Ge, 3),
                Tok::Plus => (BinaryOp::Add, 4),
                Tok::Minus => (BinaryOp::Sub, 4),
                Tok::Pipe => (BinaryOp::Or, 4),
                Tok::Caret => (BinaryOp::Xor, 4),
                Tok::Star => (BinaryOp::Mul, 5),
                Tok::Slash => (BinaryOp::Div, 5),
                Tok::Percent => (BinaryOp::Mod, 5),
                Tok::Shl => (BinaryOp::Shl, 5),
                Tok::Shr => (BinaryOp::Shr, 5),
                Tok::Amp => (BinaryOp::And, 5),
                Tok::AndNot => (BinaryOp::AndNot, 5),
                _ => break,
            };
            if prec <= min_prec {
                break;
            }
            self.bump();
            let right = self.parse_binary_expr(prec)?;
            let span = self.span_from(start);
            left = self
                .arena
                .exprs
                .alloc(Expr::Binary { left, op, right }, span);
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let op = match self.cur() {
            Tok::Plus => Some(UnaryOp::Add),
            Tok::Minus => Some(UnaryOp::Sub),
            Tok::Bang => Some(UnaryOp::Not),
            Tok::Caret => Some(UnaryOp::Xor),
            Tok::Star => Some(UnaryOp::Deref),
            Tok::Amp => Some(UnaryOp::Addr),
            Tok::Arrow => Some(UnaryOp::Recv),
            _ => None,
        };
        if let Some(op) = op {
            // `<-chan T` here is a type operand (conversion), not a receive.
            if op != UnaryOp::Recv || self.peek_nth(1) != Tok::KwChan {
                self.bump();
                let expr = self.parse_unary_expr()?;
                let span = self.span_from(start);
                return Ok(self.arena.exprs.alloc(Expr::Unary { op, expr }, span));
            }
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> PResult<ExprId> {
        let start = self.start();
        let mut expr = self.parse_operand()?;

        loop {
            match self.cur() {
                Tok::Dot => {
                    self.bump();
                    if self.eat(Tok::LParen) {
                        let typ = if self.eat(Tok::KwType) {
                            None
                        } else {
                            Some(self.parse_type()?)
                        };
                        self.expect(Tok::RParen, "`)`")?;
                        let span = self.span_from(start);
                        expr = self
                            .arena
                            .exprs
                            .alloc(Expr::TypeAssert { expr, typ }, span);
                    } else {
                        let sel = self.expect_ident("selector")?.sym;
                        let span = self.span_from(start);
                        expr = self.arena.exprs.alloc(Expr::Selector { expr, sel }, span);
                    }
                }
                Tok::LParen => {
                    expr = self.parse_call(Callee::Expr(expr), start)?;
                }
                Tok::LBrack => {
                    self.bump();
                    let saved = std::mem::replace(&mut self.no_lit, false);
                    expr = self.parse_index_or_slice(expr, start)?;
                    self.no_lit = saved;
                }
                Tok::LBrace if !self.no_lit && self.is_literal_type(expr) => {
                    let typ = self.expr_to_named_type(expr)?;
                    let elems = self.parse_literal_value()?;
                    let span = self.span_from(start);
                    expr = self.arena.exprs.alloc(
                        Expr::CompositeLit {
                            typ: Some(typ),
                            elems,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Only identifiers and package-qualified selectors can name a
    /// composite literal type in expression position.
    fn is_literal_type(&self, expr: ExprId) -> bool {
        match self.arena.exprs[expr] {
            Expr::Ident(_) => true,
            Expr::Selector { expr: base, .. } => {
                matches!(self.arena.exprs[base], Expr::Ident(_))
            }
            _ => false,
        }
    }

    fn expr_to_named_type(&mut self, expr: ExprId) -> PResult<TypeId> {
        let span = self.arena.exprs.span(expr);
        let node = match self.arena.exprs[expr] {
            Expr::Ident(name) => Type::Named { pkg: None, name },
            Expr::Selector { expr: base, sel } => match self.arena.exprs[base] {
                Expr::Ident(pkg) => Type::Named {
                    pkg: Some(pkg),
                    name: sel,
                },
                _ => return self.error("invalid composite literal type"),
            },
            _ => return self.error("invalid composite literal type"),
        };
        Ok(self.arena.types.alloc(node, span))
    }

    fn parse_call(&mut self, callee: Callee, start: u32) -> PResult<ExprId> {
        self.expect(Tok::LParen, "`(`")?;
        let saved = std::mem::replace(&mut self.no_lit, false);

        // `make(T, ...)` / `new(T)` take a type as their first argument.
        let builtin_type_arg = match callee {
            Callee::Expr(e) => match self.arena.exprs[e] {
                Expr::Ident(sym) => {
                    let name = self.interner.resolve(sym);
                    name == "make" || name == "new"
                }
                _ => false,
            },
            Callee::Type(_) => false,
        };
        let type_arg = if builtin_type_arg && self.starts_unambiguous_type() {
            Some(self.parse_type()?)
        } else {
            None
        };
        if type_arg.is_some() && !self.at(Tok::RParen) {
            self.expect(Tok::Comma, "`,`")?;
        }

        let mut args = Vec::new();
        let mut ellipsis = false;
        while !self.at(Tok::RParen) && !self.at(Tok::Eof) {
            args.push(self.parse_expr()?);
            if self.eat(Tok::Ellipsis) {
                ellipsis = true;
            }
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        self.expect(Tok::RParen, "`)`")?;
        self.no_lit = saved;

        let args = self.arena.list_exprs(args);
        let span = self.span_from(start);
        Ok(self.arena.exprs.alloc(
            Expr::Call {
                callee,
                type_arg,
                args,
                ellipsis,
            },
            span,
        ))
    }

    /// Index or slice expression; the `[` has been consumed.
    fn parse_index_or_slice(&mut self, expr: ExprId, start: u32) -> PResult<ExprId> {
        let lo = if self.at(Tok::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        if self.eat(Tok::RBrack) {
            let index = match lo {
                Some(index) => index,
                None => return self.error("expected index expression"),
            };
            let span = self.span_from(start);
            return Ok(self.arena.exprs.alloc(Expr::IndexExpr { expr, index }, span));
        }

        self.expect(Tok::Colon, "`:`")?;
        let hi = if self.at(Tok::Colon) || self.at(Tok::RBrack) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let max = if self.eat(Tok::Colon) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(Tok::RBrack, "`]`")?;

        let span = self.span_from(start);
        Ok(self
            .arena
            .exprs
            .alloc(Expr::SliceExpr { expr, lo, hi, max }, span))
    }

    fn parse_operand(&mut self) -> PResult<ExprId> {
        let start = self.start();

        // Composite types open either a literal (`[]T{...}`) or a
        // conversion (`[]byte(x)`).
        if self.starts_unambiguous_type() {
            if self.at(Tok::KwFunc) {
                return self.parse_func_lit_or_conversion(start);
            }
            let typ = self.parse_type()?;
            return self.parse_literal_or_conversion(typ, start);
        }

        let node = match self.cur() {
            Tok::Ident(name) => {
                let sym = self.interner.intern(name);
                self.bump();
                Expr::Ident(sym)
            }
            Tok::IntLit(raw) => self.basic_lit(BasicLitKind::Int, raw),
            Tok::FloatLit(raw) => self.basic_lit(BasicLitKind::Float, raw),
            Tok::ImagLit(raw) => self.basic_lit(BasicLitKind::Imag, raw),
            Tok::RuneLit(raw) => self.basic_lit(BasicLitKind::Rune, raw),
            Tok::StringLit(raw) | Tok::RawStringLit(raw) => {
                self.basic_lit(BasicLitKind::String, raw)
            }
            Tok::LParen => {
                self.bump();
                let saved = std::mem::replace(&mut self.no_lit, false);
                // `(<-chan int)(x)`-style conversions: a parenthesized pure
                // type followed by an argument list.
                if self.starts_unambiguous_type() {
                    let inner = self.parse_type()?;
                    self.expect(Tok::RParen, "`)`")?;
                    self.no_lit = saved;
                    let span = self.span_from(start);
                    let typ = self.arena.types.alloc(Type::Paren(inner), span);
                    return self.parse_call(Callee::Type(typ), start);
                }
                let inner = self.parse_expr()?;
                self.expect(Tok::RParen, "`)`")?;
                self.no_lit = saved;
                Expr::Paren(inner)
            }
            got => return self.error(format!("expected expression, found {got}")),
        };

        let span = self.span_from(start);
        Ok(self.arena.exprs.alloc(node, span))
    }

    fn basic_lit(&mut self, kind: BasicLitKind, raw: &str) -> Expr {
        let text = self.interner.intern(raw);
        self.bump();
        Expr::BasicLit(BasicLit { kind, text })
    }

    fn parse_func_lit_or_conversion(&mut self, start: u32) -> PResult<ExprId> {
        self.expect(Tok::KwFunc, "`func`")?;
        let sig = self.parse_signature()?;
        if self.at(Tok::LBrace) {
            let body = self.parse_block()?;
            let span = self.span_from(start);
            return Ok(self.arena.exprs.alloc(Expr::FuncLit { sig, body }, span));
        }
        let span = self.span_from(start);
        let typ = self.arena.types.alloc(Type::Func(sig), span);
        self.parse_call(Callee::Type(typ), start)
    }

    fn parse_literal_or_conversion(&mut self, typ: TypeId, start: u32) -> PResult<ExprId> {
        match self.cur() {
            Tok::LBrace => {
                let elems = self.parse_literal_value()?;
                let span = self.span_from(start);
                Ok(self.arena.exprs.alloc(
                    Expr::CompositeLit {
                        typ: Some(typ),
                        elems,
                    },
                    span,
                ))
            }
            Tok::LParen => self.parse_call(Callee::Type(typ), start),
            got => self.error(format!("expected `{{` or `(` after type, found {got}")),
        }
    }

    /// `LiteralValue = "{" [ ElementList [ "," ] ] "}"`
    fn parse_literal_value(&mut self) -> PResult<ListRef<KeyedElement>> {
        let saved = std::mem::replace(&mut self.no_lit, false);
        self.expect(Tok::LBrace, "`{`")?;
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) && !self.at(Tok::Eof) {
            let first = self.parse_element_value()?;
            let elem = if self.eat(Tok::Colon) {
                let value = self.parse_element_value()?;
                KeyedElement {
                    key: Some(first),
                    value,
                }
            } else {
                KeyedElement {
                    key: None,
                    value: first,
                }
            };
            elems.push(elem);
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        self.expect(Tok::RBrace, "`}`")?;
        self.no_lit = saved;
        Ok(self.arena.list_keyed_elems(elems))
    }

    /// Element or key; nested `{...}` literals elide the element type.
    fn parse_element_value(&mut self) -> PResult<ExprId> {
        if self.at(Tok::LBrace) {
            let start = self.start();
            let elems = self.parse_literal_value()?;
            let span = self.span_from(start);
            return Ok(self
                .arena
                .exprs
                .alloc(Expr::CompositeLit { typ: None, elems }, span));
        }
        self.parse_expr()
    }
}

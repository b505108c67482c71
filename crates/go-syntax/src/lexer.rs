//! Go lexer: a Logos raw-token layer plus a wrapper that performs automatic
//! semicolon insertion.
//!
//! The wrapper yields `(start, Tok, end)` triples. Inserted semicolons have
//! `start == end`. Comments are surfaced as `Tok::Comment` so the parser can
//! attach them as documentation; they are transparent to semicolon
//! insertion (the flag carries across them, as in the Go scanner).

use crate::error::{Diag, LexError, LexErrorKind, Span};
use logos::{Lexer as LogosLexer, Logos};
use std::collections::VecDeque;
use std::ops::Range;

/// Scan a `/* ... */` comment; the `/*` has already been consumed.
#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    match rem.windows(2).position(|w| w == b"*/") {
        Some(pos) => {
            lex.bump(pos + 2);
            Ok(())
        }
        None => {
            lex.bump(rem.len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t]+")]
enum RawTok {
    // BOM (allowed only at file start; the wrapper enforces this)
    #[token("\u{FEFF}")]
    Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")]
    Newline,
    #[regex(r"//[^\n\r]*")]
    LineComment,
    #[token("/*", lex_block_comment)]
    BlockComment,

    // Keywords (before Ident)
    #[token("break")]
    KwBreak,
    #[token("case")]
    KwCase,
    #[token("chan")]
    KwChan,
    #[token("const")]
    KwConst,
    #[token("continue")]
    KwContinue,
    #[token("default")]
    KwDefault,
    #[token("defer")]
    KwDefer,
    #[token("else")]
    KwElse,
    #[token("fallthrough")]
    KwFallthrough,
    #[token("for")]
    KwFor,
    #[token("func")]
    KwFunc,
    #[token("go")]
    KwGo,
    #[token("goto")]
    KwGoto,
    #[token("if")]
    KwIf,
    #[token("import")]
    KwImport,
    #[token("interface")]
    KwInterface,
    #[token("map")]
    KwMap,
    #[token("package")]
    KwPackage,
    #[token("range")]
    KwRange,
    #[token("return")]
    KwReturn,
    #[token("select")]
    KwSelect,
    #[token("struct")]
    KwStruct,
    #[token("switch")]
    KwSwitch,
    #[token("type")]
    KwType,
    #[token("var")]
    KwVar,

    // Identifiers (Go spec: letter = '_' or Unicode letter; digit = Nd)
    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")]
    Ident,

    // Numeric literals. Longest-match disambiguates int vs float; the
    // trailing-`i` forms are imaginary literals.
    #[regex(r"[0-9][0-9_]*|0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+")]
    IntLit,
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    FloatLit,
    #[regex(r"([0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?)i")]
    ImagLit,

    // Strings / runes
    #[regex(r"`[^`]*`")]
    RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    String,
    #[regex(r"'([^'\\\n\r]|\\.)+'")]
    Rune,

    // Operators (multi-char first)
    #[token("...")]
    Ellipsis,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("&^=")]
    AndNotAssign,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    DivAssign,
    #[token("%=")]
    ModAssign,
    #[token("&=")]
    AndAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    XorAssign,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AndNot,
    #[token("&&")]
    LAnd,
    #[token("||")]
    LOr,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token(":=")]
    Define,
    #[token("<-")]
    Arrow,
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
}

impl RawTok {
    /// Go's insertion rule: a line break ends the statement after an
    /// identifier or literal, after the four keywords that can close a
    /// statement, after `++`/`--`, and after a closing delimiter.
    #[inline]
    fn ends_statement(self) -> bool {
        use RawTok::*;
        matches!(
            self,
            Ident | IntLit | FloatLit | ImagLit | Rune | String | RawString
                | KwBreak | KwContinue | KwFallthrough | KwReturn
                | Inc | Dec
                | RParen | RBrack | RBrace
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),
    Comment(&'input str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error,
    /// Never produced by the lexer; the parser's end-of-input sentinel.
    Eof,
}

impl std::fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl RawTok {
    fn to_token(self, slice: &str) -> Tok<'_> {
        match self {
            RawTok::Ident => Tok::Ident(slice),
            RawTok::IntLit => Tok::IntLit(slice),
            RawTok::FloatLit => Tok::FloatLit(slice),
            RawTok::ImagLit => Tok::ImagLit(slice),
            RawTok::Rune => Tok::RuneLit(slice),
            RawTok::String => Tok::StringLit(slice),
            RawTok::RawString => Tok::RawStringLit(slice),
            RawTok::LineComment | RawTok::BlockComment => Tok::Comment(slice),
            RawTok::KwBreak => Tok::KwBreak,
            RawTok::KwCase => Tok::KwCase,
            RawTok::KwChan => Tok::KwChan,
            RawTok::KwConst => Tok::KwConst,
            RawTok::KwContinue => Tok::KwContinue,
            RawTok::KwDefault => Tok::KwDefault,
            RawTok::KwDefer => Tok::KwDefer,
            RawTok::KwElse => Tok::KwElse,
            RawTok::KwFallthrough => Tok::KwFallthrough,
            RawTok::KwFor => Tok::KwFor,
            RawTok::KwFunc => Tok::KwFunc,
            RawTok::KwGo => Tok::KwGo,
            RawTok::KwGoto => Tok::KwGoto,
            RawTok::KwIf => Tok::KwIf,
            RawTok::KwImport => Tok::KwImport,
            RawTok::KwInterface => Tok::KwInterface,
            RawTok::KwMap => Tok::KwMap,
            RawTok::KwPackage => Tok::KwPackage,
            RawTok::KwRange => Tok::KwRange,
            RawTok::KwReturn => Tok::KwReturn,
            RawTok::KwSelect => Tok::KwSelect,
            RawTok::KwStruct => Tok::KwStruct,
            RawTok::KwSwitch => Tok::KwSwitch,
            RawTok::KwType => Tok::KwType,
            RawTok::KwVar => Tok::KwVar,
            RawTok::Ellipsis => Tok::Ellipsis,
            RawTok::ShlAssign => Tok::ShlAssign,
            RawTok::ShrAssign => Tok::ShrAssign,
            RawTok::AndNotAssign => Tok::AndNotAssign,
            RawTok::AddAssign => Tok::AddAssign,
            RawTok::SubAssign => Tok::SubAssign,
            RawTok::MulAssign => Tok::MulAssign,
            RawTok::DivAssign => Tok::DivAssign,
            RawTok::ModAssign => Tok::ModAssign,
            RawTok::AndAssign => Tok::AndAssign,
            RawTok::OrAssign => Tok::OrAssign,
            RawTok::XorAssign => Tok::XorAssign,
            RawTok::Shl => Tok::Shl,
            RawTok::Shr => Tok::Shr,
            RawTok::AndNot => Tok::AndNot,
            RawTok::LAnd => Tok::LAnd,
            RawTok::LOr => Tok::LOr,
            RawTok::EqEq => Tok::EqEq,
            RawTok::NotEq => Tok::NotEq,
            RawTok::Le => Tok::Le,
            RawTok::Ge => Tok::Ge,
            RawTok::Inc => Tok::Inc,
            RawTok::Dec => Tok::Dec,
            RawTok::Define => Tok::Define,
            RawTok::Arrow => Tok::Arrow,
            RawTok::Assign => Tok::Assign,
            RawTok::Plus => Tok::Plus,
            RawTok::Minus => Tok::Minus,
            RawTok::Star => Tok::Star,
            RawTok::Slash => Tok::Slash,
            RawTok::Percent => Tok::Percent,
            RawTok::Amp => Tok::Amp,
            RawTok::Pipe => Tok::Pipe,
            RawTok::Caret => Tok::Caret,
            RawTok::Tilde => Tok::Tilde,
            RawTok::Bang => Tok::Bang,
            RawTok::Lt => Tok::Lt,
            RawTok::Gt => Tok::Gt,
            RawTok::LParen => Tok::LParen,
            RawTok::RParen => Tok::RParen,
            RawTok::LBrack => Tok::LBrack,
            RawTok::RBrack => Tok::RBrack,
            RawTok::LBrace => Tok::LBrace,
            RawTok::RBrace => Tok::RBrace,
            RawTok::Comma => Tok::Comma,
            RawTok::Semi => Tok::Semi,
            RawTok::Colon => Tok::Colon,
            RawTok::Dot => Tok::Dot,
            RawTok::Bom | RawTok::Newline => Tok::Error,
        }
    }
}

/// Token stream with Go automatic semicolon insertion.
///
/// Built as a pull pipeline: each step consumes one raw token and queues
/// whatever becomes visible. Usually that is one public token, sometimes
/// none (skipped trivia), and at most two (a block comment hiding a line
/// break is followed by the inserted semicolon). The only insertion state
/// is `stmt_end`: whether the last real token could terminate a statement.
pub struct Lexer<'src> {
    raw: LogosLexer<'src, RawTok>,
    queue: VecDeque<(usize, Tok<'src>, usize)>,
    diags: Vec<Diag>,
    stmt_end: bool,
    done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            raw: RawTok::lexer(input),
            queue: VecDeque::with_capacity(2),
            diags: Vec::new(),
            stmt_end: false,
            done: false,
        }
    }

    /// Diagnostics collected while tokenizing.
    pub fn finish(self) -> Vec<Diag> {
        self.diags
    }

    /// Record a malformed token and surface it as `Tok::Error`.
    fn reject(&mut self, kind: LexErrorKind, span: Range<usize>) {
        self.diags.push(
            LexError {
                kind,
                span: Span::from_range(span.clone()),
            }
            .diag(),
        );
        self.stmt_end = false;
        self.queue.push_back((span.start, Tok::Error, span.end));
    }

    /// Consume one raw token, queueing its public form(s).
    fn pull(&mut self) {
        let Some(outcome) = self.raw.next() else {
            self.done = true;
            if std::mem::take(&mut self.stmt_end) {
                let end = self.raw.source().len();
                self.queue.push_back((end, Tok::Semi, end));
            }
            return;
        };

        let span = self.raw.span();
        let text = self.raw.slice();

        let raw = match outcome {
            Ok(raw) => raw,
            Err(kind) => {
                self.reject(kind, span);
                return;
            }
        };

        match raw {
            // A byte-order mark is tolerated at offset zero only.
            RawTok::Bom if span.start == 0 => {}
            RawTok::Bom => self.reject(LexErrorKind::InvalidToken, span),

            RawTok::Newline => {
                if std::mem::take(&mut self.stmt_end) {
                    self.queue.push_back((span.start, Tok::Semi, span.start));
                }
            }

            // Comments never touch `stmt_end`; the flag carries across
            // them to the next line break.
            RawTok::LineComment => {
                self.queue
                    .push_back((span.start, Tok::Comment(text), span.end));
            }

            // A block comment that spans a line acts as that line break
            // itself, with the semicolon following the comment token.
            RawTok::BlockComment => {
                let spans_line = text.bytes().any(|b| b == b'\n' || b == b'\r');
                self.queue
                    .push_back((span.start, Tok::Comment(text), span.end));
                if spans_line && std::mem::take(&mut self.stmt_end) {
                    self.queue.push_back((span.end, Tok::Semi, span.end));
                }
            }

            _ => {
                self.stmt_end = raw.ends_statement();
                self.queue
                    .push_back((span.start, raw.to_token(text), span.end));
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Tok<'src>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.queue.is_empty() && !self.done {
            self.pull();
        }
        self.queue.pop_front()
    }
}

//! Automatic semicolon insertion, checked against the Go scanner's
//! reference behavior (token-name tables in the Go source tree).

use go_syntax::lexer::{Lexer, Tok};

fn injected_semis(input: &str) -> Vec<usize> {
    Lexer::new(input)
        .filter_map(|(s, t, e)| {
            if matches!(t, Tok::Semi) && s == e {
                Some(s)
            } else {
                None
            }
        })
        .collect()
}

fn tok_name(t: &Tok<'_>) -> &'static str {
    match t {
        Tok::Ident(_) => "IDENT",
        Tok::IntLit(_) => "INT",
        Tok::FloatLit(_) => "FLOAT",
        Tok::ImagLit(_) => "IMAG",
        Tok::RuneLit(_) => "CHAR",
        Tok::StringLit(_) | Tok::RawStringLit(_) => "STRING",
        Tok::Comment(_) => "COMMENT",

        Tok::Semi => ";",

        Tok::Plus => "+",
        Tok::Minus => "-",
        Tok::Star => "*",
        Tok::Slash => "/",
        Tok::Percent => "%",
        Tok::Amp => "&",
        Tok::Pipe => "|",
        Tok::Caret => "^",
        Tok::Shl => "<<",
        Tok::Shr => ">>",
        Tok::AndNot => "&^",
        Tok::AddAssign => "+=",
        Tok::SubAssign => "-=",
        Tok::MulAssign => "*=",
        Tok::DivAssign => "/=",
        Tok::ModAssign => "%=",
        Tok::AndAssign => "&=",
        Tok::OrAssign => "|=",
        Tok::XorAssign => "^=",
        Tok::ShlAssign => "<<=",
        Tok::ShrAssign => ">>=",
        Tok::AndNotAssign => "&^=",
        Tok::LAnd => "&&",
        Tok::LOr => "||",
        Tok::Arrow => "<-",
        Tok::Inc => "++",
        Tok::Dec => "--",
        Tok::EqEq => "==",
        Tok::NotEq => "!=",
        Tok::Lt => "<",
        Tok::Gt => ">",
        Tok::Le => "<=",
        Tok::Ge => ">=",
        Tok::Assign => "=",
        Tok::Bang => "!",
        Tok::Define => ":=",
        Tok::Ellipsis => "...",
        Tok::Tilde => "~",
        Tok::LParen => "(",
        Tok::RParen => ")",
        Tok::LBrack => "[",
        Tok::RBrack => "]",
        Tok::LBrace => "{",
        Tok::RBrace => "}",
        Tok::Comma => ",",
        Tok::Dot => ".",
        Tok::Colon => ":",

        Tok::KwBreak => "break",
        Tok::KwCase => "case",
        Tok::KwChan => "chan",
        Tok::KwConst => "const",
        Tok::KwContinue => "continue",
        Tok::KwDefault => "default",
        Tok::KwDefer => "defer",
        Tok::KwElse => "else",
        Tok::KwFallthrough => "fallthrough",
        Tok::KwFor => "for",
        Tok::KwFunc => "func",
        Tok::KwGo => "go",
        Tok::KwGoto => "goto",
        Tok::KwIf => "if",
        Tok::KwImport => "import",
        Tok::KwInterface => "interface",
        Tok::KwMap => "map",
        Tok::KwPackage => "package",
        Tok::KwRange => "range",
        Tok::KwReturn => "return",
        Tok::KwSelect => "select",
        Tok::KwStruct => "struct",
        Tok::KwSwitch => "switch",
        Tok::KwType => "type",
        Tok::KwVar => "var",

        Tok::Error | Tok::Eof => "ERROR",
    }
}

fn lex_names(input: &str) -> String {
    Lexer::new(input)
        .map(|(_s, t, _e)| tok_name(&t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn check_semi_case(input: &str, want: &str) {
    let got = lex_names(input);
    assert_eq!(got, want, "input=<<{input}>> got=[{got}] want=[{want}]");
}

struct SemiCase {
    input: &'static str,
    want: &'static str,
}

// Subset of the Go scanner's semicolon table.
#[rustfmt::skip]
const SEMICOLON_TESTS: &[SemiCase] = &[
    SemiCase { input: "", want: "" },
    SemiCase { input: "\u{FEFF};", want: ";" }, // leading BOM is ignored
    SemiCase { input: ";", want: ";" },

    SemiCase { input: "foo\n", want: "IDENT ;" },
    SemiCase { input: "123\n", want: "INT ;" },
    SemiCase { input: "1.2\n", want: "FLOAT ;" },
    SemiCase { input: "'x'\n", want: "CHAR ;" },
    SemiCase { input: "\"x\"\n", want: "STRING ;" },
    SemiCase { input: "`x`\n", want: "STRING ;" },

    SemiCase { input: "+\n", want: "+" },
    SemiCase { input: "-\n", want: "-" },
    SemiCase { input: "*\n", want: "*" },
    SemiCase { input: "/\n", want: "/" },
    SemiCase { input: "%\n", want: "%" },

    SemiCase { input: "&&\n", want: "&&" },
    SemiCase { input: "||\n", want: "||" },
    SemiCase { input: "<-\n", want: "<-" },
    SemiCase { input: "++\n", want: "++ ;" },
    SemiCase { input: "--\n", want: "-- ;" },

    SemiCase { input: ":=\n", want: ":=" },
    SemiCase { input: "...\n", want: "..." },

    SemiCase { input: "(\n", want: "(" },
    SemiCase { input: "[\n", want: "[" },
    SemiCase { input: "{\n", want: "{" },
    SemiCase { input: ",\n", want: "," },
    SemiCase { input: ".\n", want: "." },

    SemiCase { input: ")\n", want: ") ;" },
    SemiCase { input: "]\n", want: "] ;" },
    SemiCase { input: "}\n", want: "} ;" },
    SemiCase { input: ";\n", want: ";" },
    SemiCase { input: ":\n", want: ":" },

    SemiCase { input: "break\n", want: "break ;" },
    SemiCase { input: "case\n", want: "case" },
    SemiCase { input: "chan\n", want: "chan" },
    SemiCase { input: "continue\n", want: "continue ;" },
    SemiCase { input: "fallthrough\n", want: "fallthrough ;" },
    SemiCase { input: "return\n", want: "return ;" },
    SemiCase { input: "if\n", want: "if" },
    SemiCase { input: "for\n", want: "for" },
    SemiCase { input: "func\n", want: "func" },
    SemiCase { input: "switch\n", want: "switch" },
    SemiCase { input: "type\n", want: "type" },
    SemiCase { input: "var\n", want: "var" },

    SemiCase { input: "foo//comment\n", want: "IDENT COMMENT ;" },
    SemiCase { input: "foo//comment", want: "IDENT COMMENT ;" },
    SemiCase { input: "foo/*comment*/\n", want: "IDENT COMMENT ;" },
    SemiCase { input: "foo/*\n*/", want: "IDENT COMMENT ;" },
    SemiCase { input: "foo/*comment*/    \n", want: "IDENT COMMENT ;" },
    SemiCase { input: "foo/*\n*/    ", want: "IDENT COMMENT ;" },

    SemiCase { input: "package main", want: "package IDENT ;" },
];

#[test]
fn semicolon_table_matches_go_scanner() {
    for t in SEMICOLON_TESTS {
        check_semi_case(t.input, t.want);
    }
}

#[test]
fn many_semis_mixed() {
    let src = r#"
package p
func f() {
    x := 1
    x++
    if x > 0 {
        return
    } else {
        x--
    }
}
"#;
    let semis = injected_semis(src);
    assert!(!semis.is_empty());
}

#[test]
fn comment_newline_equivalence() {
    let a = injected_semis("x/*\n*/y");
    let b = injected_semis("x\ny");
    assert_eq!(a.len(), b.len());
}

#[test]
fn semicolon_insertion_windows_newline_crlf() {
    assert_eq!(injected_semis("x\r\ny"), vec![1, 4]);
}

#[test]
fn block_comment_newline_does_not_insert_after_if() {
    assert_eq!(injected_semis("if/*\n*/x"), vec![8]);
}

#[test]
fn line_comment_at_eof_ok() {
    let src = "x//c";
    assert_eq!(injected_semis(src), vec![src.len()]);
}

#[test]
fn semicolon_insertion_after_break_continue_fallthrough() {
    assert_eq!(injected_semis("break\nx"), vec![5, 7]);
    assert_eq!(injected_semis("continue\nx"), vec![8, 10]);
    assert_eq!(injected_semis("fallthrough\nx"), vec![11, 13]);
}

#[test]
fn semicolon_insertion_after_inc_dec() {
    assert_eq!(injected_semis("x++\ny"), vec![3, 5]);
    assert_eq!(injected_semis("x--\ny"), vec![3, 5]);
}

#[test]
fn semicolon_insertion_after_imag_literal() {
    assert_eq!(injected_semis("1i\nx"), vec![2, 4]);
}

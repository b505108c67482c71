use go_syntax::lexer::{Lexer, Tok};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]
    #[test]
    fn never_panics_and_progresses(s in ".*") {
        let lx = Lexer::new(&s);

        // Max progress seen in the stream (end positions).
        let mut max_end = 0usize;

        // End position of the last real (non-injected) token.
        let mut last_real_end = 0usize;

        let max_steps = s.len().saturating_mul(4) + 64;

        for (steps, (start, tok, end)) in lx.enumerate() {
            // Spans must be in-bounds.
            prop_assert!(start <= end, "start>end: ({start},{end}) tok={tok:?} input={s:?}");
            prop_assert!(end <= s.len(), "end out of bounds: ({start},{end}) len={} tok={tok:?} input={s:?}", s.len());

            let injected_semi = matches!(tok, Tok::Semi) && start == end;

            if !injected_semi {
                // Real tokens cannot overlap backwards.
                prop_assert!(
                    start >= last_real_end,
                    "real token moved backwards: start={start} < last_real_end={last_real_end} tok={tok:?} input={s:?}"
                );
                last_real_end = end;
                prop_assert!(
                    end >= max_end,
                    "real token end regressed: end={end} < max_end={max_end} tok={tok:?} input={s:?}"
                );
            } else {
                // Injected semis appear at or after the consumed frontier.
                prop_assert!(
                    start >= max_end,
                    "injected semi before progress: pos={start} < max_end={max_end} input={s:?}"
                );
            }

            max_end = max_end.max(end);

            prop_assert!(
                steps <= max_steps,
                "too many steps (possible hang): steps={steps} max_steps={max_steps} len={} input={s:?}",
                s.len()
            );
        }
    }

    #[test]
    fn ascii_identifier_round_trips(name in "[A-Za-z_][A-Za-z0-9_]{0,12}") {
        prop_assume!(!is_keyword(&name));
        let toks: Vec<_> = Lexer::new(&name).collect();
        // The identifier plus the semicolon injected at EOF.
        prop_assert_eq!(toks.len(), 2, "{:?}", &toks);
        prop_assert!(matches!(toks[0].1, Tok::Ident(s) if s == name));
        prop_assert!(matches!(toks[1].1, Tok::Semi));
    }
}

fn is_keyword(s: &str) -> bool {
    matches!(
        s,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
    )
}

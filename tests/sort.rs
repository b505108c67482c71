//! End-to-end popularity sort over a real source file, with the bundled
//! analysis computing interface method sets.

use go_syntax::print_file;
use indoc::indoc;
use tsgen::{analysis, program::Program, sort};

fn sort_source(src: &str) -> String {
    let mut program = Program::from_sources(&[("input.go", src)]).expect("load");
    let oracle = analysis::analyze(&program, None).expect("analyze");
    let file = program.files[0].file;
    sort::sort_file_type_switches(&mut program.arena, &program.interner, &file, &oracle);
    print_file(&program.arena, &program.interner, &file)
}

fn assert_ordered(haystack: &str, needles: &[&str]) {
    let mut last = 0;
    for needle in needles {
        let pos = haystack[last..]
            .find(needle)
            .unwrap_or_else(|| panic!("missing or out of order: {needle:?} in:\n{haystack}"));
        last += pos + needle.len();
    }
}

const FIXTURE: &str = indoc! {r#"
    package p

    type I1 interface{ M1() }
    type I2 interface{ M2() }

    type A struct{}

    func (A) M1() {}

    type B struct{}

    func (B) M2() {}

    type C struct{}

    func (C) M1() {}
    func (C) M2() {}

    type D struct{}

    func (D) M2() {}

    func f(x interface{}) {
    	switch x.(type) {
    	case A:
    	case B:
    	case C:
    	case D:
    	}
    }
"#};

#[test]
fn popularity_orders_c_b_d_a() {
    // I2 is implemented by B, C, D (popularity 3); I1 by A, C (2).
    // C implements both, so it leads; B and D tie on I2 and break on
    // name; A implements only the less popular I1.
    let out = sort_source(FIXTURE);
    assert_ordered(&out, &["case C:", "case B:", "case D:", "case A:"]);
}

#[test]
fn sorting_is_idempotent() {
    let once = sort_source(FIXTURE);
    let twice = sort_source(&once);
    assert_eq!(once, twice);
}

#[test]
fn default_goes_last_and_nested_switches_are_sorted() {
    let src = indoc! {r#"
        package p

        type I interface{ M() }

        type A struct{}

        func (A) M() {}

        type Z struct{}

        func f(x interface{}) {
        	if true {
        		switch x.(type) {
        		default:
        		case Z:
        		case A:
        		}
        	}
        }
    "#};
    let out = sort_source(src);
    assert_ordered(&out, &["case A:", "case Z:", "default:"]);
}

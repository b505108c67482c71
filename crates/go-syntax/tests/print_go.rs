//! Printer golden checks and print/reparse stability.

use go_syntax::{parse_source, print_file};
use indoc::indoc;

fn format(src: &str) -> String {
    let (arena, interner, file) = parse_source(src).expect("parse");
    print_file(&arena, &interner, &file)
}

#[test]
fn formats_a_type_switch() {
    let src = indoc! {r#"
        package p

        func Foo(x interface{}) {
        	switch x := x.(type) {
        	case map[string]int:
        		_ = x
        	default:
        	}
        }
    "#};
    assert_eq!(format(src), src);
}

#[test]
fn formats_declarations() {
    let src = indoc! {r#"
        package p

        import (
        	"fmt"
        	_ "net/http"
        )

        const limit = 10

        var names []string

        type Point struct {
        	X, Y float64
        	Tag  string
        }
    "#};
    let out = format(src);
    assert!(out.contains("import (\n\t\"fmt\"\n\t_ \"net/http\"\n)"), "{out}");
    assert!(out.contains("const limit = 10"), "{out}");
    assert!(out.contains("var names []string"), "{out}");
    assert!(out.contains("type Point struct {\n\tX, Y float64\n"), "{out}");
}

#[test]
fn keeps_doc_comments_on_declarations_and_clauses() {
    let src = indoc! {r#"
        package p

        // Foo dispatches on the dynamic type of x.
        func Foo(x interface{}) {
        	switch x := x.(type) {
        	// ints are special
        	case int:
        		_ = x
        	}
        }
    "#};
    let out = format(src);
    assert!(out.contains("// Foo dispatches on the dynamic type of x.\nfunc Foo"), "{out}");
    assert!(out.contains("// ints are special\n\tcase int:"), "{out}");
}

#[test]
fn print_is_a_fixed_point_of_parse() {
    let sources = [
        indoc! {r#"
            package p

            func f(a, b int, ch chan<- int) (int, error) {
            	x := a + b*2
            	if x > 0 {
            		ch <- x
            	} else if x < -1 {
            		x++
            	}
            	for i := 0; i < x; i++ {
            		defer func() {}()
            	}
            	m := map[string][]int{"a": {1, 2}}
            	for k, v := range m {
            		_ = k
            		_ = v
            	}
            	return x, nil
            }
        "#},
        indoc! {r#"
            package p

            type T interface{}

            type reader interface {
            	Read(p []byte) (int, error)
            }

            func g(x interface{}) {
            	switch x := x.(type) {
            	case map[string]T:
            		var r T
            		_ = r
            	case []chan<- T, *T:
            		_ = x
            	case nil:
            	default:
            	}
            }
        "#},
        indoc! {r#"
            package p

            func h() {
            	_ = make([]chan<- *int, 0)
            	_ = []byte("hi")
            	_ = []struct{}{}
            	v := struct{ foo []byte }{foo: nil}
            	_ = v
            	select {
            	case <-done:
            	default:
            	}
            }
        "#},
    ];

    for src in sources {
        let once = format(src);
        let twice = format(&once);
        assert_eq!(once, twice, "printing must be parse-stable for:\n{src}");
    }
}

//! End-to-end expansion: Go source in, expanded Go source out, using the
//! bundled syntactic analysis for types and call edges.

use indoc::indoc;
use tsgen::{expand_source, Options};

fn expand(src: &str) -> String {
    expand_source(src, &Options::default()).expect("expand")
}

/// Assert `needles` all occur in `haystack`, in the given order.
fn assert_ordered(haystack: &str, needles: &[&str]) {
    let mut last = 0;
    for needle in needles {
        let pos = haystack[last..]
            .find(needle)
            .unwrap_or_else(|| panic!("missing or out of order: {needle:?} in:\n{haystack}"));
        last += pos + needle.len();
    }
}

/// The reference corpus: eight template shapes, four call sites.
const CORPUS: &str = indoc! {r#"
    package E

    type T interface{}
    type S interface{}

    type xxx struct{}

    func main() {
    	Foo(map[string][]io.Reader{})
    	Foo(map[int]bool{})
    	Foo(make([]chan<- *xxx, 0))
    	Foo([]struct{}{})
    }

    func Foo(x interface{}) {
    	switch x := x.(type) {
    	case map[string]T:
    		var r T
    		for _, v := range x {
    			r = v
    		}
    		_ = r
    	case map[T]bool:
    		var keys []T = make([]T, 0)
    		for k := range x {
    			keys = append(keys, k)
    		}
    		_ = keys
    	case []chan<- T:
    		var t1, t2 T
    		for _, c := range x {
    			c <- t1
    			c <- t2
    		}
    	case []T:
    		var t T = x[0]
    		_ = t
    	case *T:
    		var t T = *x
    		_ = t
    	case func(T):
    		var t *T
    		x(*t)
    	case func(T) (S, error):
    		var t T
    		var s S
    		s, _ = x(t)
    		_ = s
    	case struct{ foo T }:
    		var t T = x.foo
    		_ = t
    	}
    }
"#};

#[test]
fn corpus_expands_every_call_site() {
    let out = expand(CORPUS);

    // One generated clause per incoming type, in first-seen order, then
    // the templates in source order.
    assert_ordered(
        &out,
        &[
            "case map[string][]io.Reader:",
            "case map[int]bool:",
            "case []chan<- *xxx:",
            "case []struct{}:",
            "case map[string]T:",
            "case map[T]bool:",
            "case []chan<- T:",
            "case []T:",
            "case *T:",
            "case func(T):",
            "case func(T) (S, error):",
            "case struct{ foo T }:",
        ],
    );
}

#[test]
fn corpus_substitutes_bodies() {
    let out = expand(CORPUS);
    assert!(out.contains("var r []io.Reader"), "{out}");
    assert!(out.contains("var keys []int = make([]int, 0)"), "{out}");
    assert!(out.contains("var t1, t2 *xxx"), "{out}");
    assert!(out.contains("var t struct{}"), "{out}");
}

#[test]
fn basic_map_expansion() {
    let src = indoc! {r#"
        package p

        type T interface{}

        func main() {
        	Foo(map[string]int{})
        	Foo(map[string]bool{})
        }

        func Foo(x interface{}) {
        	switch x := x.(type) {
        	case map[string]T:
        		_ = x
        	}
        }
    "#};
    let out = expand(src);
    assert_ordered(
        &out,
        &[
            "case map[string]int:",
            "case map[string]bool:",
            "case map[string]T:",
        ],
    );
}

#[test]
fn variable_in_map_key_position() {
    let src = indoc! {r#"
        package p

        type T interface{}

        func main() {
        	Foo(map[int]bool{})
        }

        func Foo(x interface{}) {
        	switch x := x.(type) {
        	case map[T]bool:
        		_ = x
        	}
        }
    "#};
    let out = expand(src);
    assert!(out.contains("case map[int]bool:"), "{out}");
}

#[test]
fn function_type_binds_two_variables() {
    let src = indoc! {r#"
        package p

        type T interface{}
        type S interface{}
        type Reader interface{ Read() }

        func main() {
        	var f func(bool) (Reader, error)
        	Foo(f)
        }

        func Foo(x interface{}) {
        	switch x := x.(type) {
        	case func(T) (S, error):
        		var t T
        		var s S
        		s, _ = x(t)
        		_ = s
        	}
        }
    "#};
    let out = expand(src);
    assert!(out.contains("case func(bool) (Reader, error):"), "{out}");
    assert!(out.contains("var t bool"), "{out}");
    assert!(out.contains("var s Reader"), "{out}");
}

#[test]
fn no_match_preserves_switch() {
    let src = indoc! {r#"
        package p

        type T interface{}

        func main() {
        	Foo(map[int]int{})
        }

        func Foo(x interface{}) {
        	switch x := x.(type) {
        	case *T:
        		_ = x
        	}
        }
    "#};
    let out = expand(src);
    assert!(out.contains("case *T:"), "{out}");
    assert!(!out.contains("case map[int]int:"), "{out}");
}

#[test]
fn expansion_is_idempotent() {
    let once = expand(CORPUS);
    let twice = expand(&once);
    assert_eq!(once, twice);
}

#[test]
fn default_clause_stays_last() {
    let src = indoc! {r#"
        package p

        type T interface{}

        func main() {
        	Foo(map[string]int{})
        }

        func Foo(x interface{}) {
        	switch x := x.(type) {
        	case int:
        		_ = x
        	case map[string]T:
        		_ = x
        	default:
        		_ = x
        	}
        }
    "#};
    let out = expand(src);
    assert_ordered(
        &out,
        &[
            "case int:",
            "case map[string]int:",
            "case map[string]T:",
            "default:",
        ],
    );
}

#[test]
fn already_interface_arguments_contribute_nothing() {
    let src = indoc! {r#"
        package p

        type T interface{}

        func main() {
        	var x interface{}
        	Foo(x)
        }

        func Foo(x interface{}) {
        	switch x := x.(type) {
        	case map[string]T:
        		_ = x
        	}
        }
    "#};
    let out = expand(src);
    // No concrete witness, no generated clause.
    assert_eq!(out.matches("case ").count(), 1, "{out}");
}

#[test]
fn repeated_variable_requires_consistent_types() {
    let src = indoc! {r#"
        package p

        type T interface{}

        func main() {
        	Foo(map[int]bool{})
        	Foo(map[int]int{})
        }

        func Foo(x interface{}) {
        	switch x := x.(type) {
        	case map[T]T:
        		_ = x
        	}
        }
    "#};
    let out = expand(src);
    assert!(out.contains("case map[int]int:"), "{out}");
    assert!(!out.contains("case map[int]bool:"), "{out}");
}

#[test]
fn shadowing_variable_name_is_not_rewritten_without_alias_declaration() {
    // `T` is a real struct type here, not an empty-interface alias, so the
    // clause is not a template target for body rewriting; in fact its
    // pattern is still syntactically variable, but body occurrences must
    // survive untouched.
    let src = indoc! {r#"
        package p

        type T struct{}

        func main() {
        	Foo(map[string]int{})
        }

        func Foo(x interface{}) {
        	switch x := x.(type) {
        	case map[string]T:
        		var keep T
        		_ = keep
        		_ = x
        	}
        }
    "#};
    let out = expand(src);
    // The pattern matched (T bound to int), but `var keep T` keeps its
    // identifier because T is not declared as an empty-interface alias.
    assert!(out.contains("case map[string]int:"), "{out}");
    assert!(out.contains("var keep T"), "{out}");
}

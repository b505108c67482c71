use go_syntax::parse_source;

fn assert_parses(src: &str) {
    if let Err(f) = parse_source(src) {
        panic!("expected parse ok, got diagnostics: {:#?}", f.diags);
    }
}

#[test]
fn parses_imports_and_decls() {
    assert_parses(
        r#"
package main

import (
    "fmt"
    . "math"
    _ "net/http"
)

const (
    A = 1
    B int = 2
)

var (
    x = 1
    y, z int
)

type (
    T = int
    V interface {
        M(x int) int
    }
)

func main() {
    fmt.Println(Sqrt(4))
}
"#,
    );
}

#[test]
fn parses_statements() {
    assert_parses(
        r#"
package p

func f(x int, ch chan int) int {
    if x < 0 { return -x }
    for i := 0; i < 10; i++ {
        if i == 5 { break }
        continue
    }
    for range []int{1,2,3} {
    }
    switch x {
    case 0, 1:
        x++
    default:
        x = 3
    }
    select {
    case ch <- x:
        return x
    default:
        return 0
    }
}
"#,
    );
}

#[test]
fn parses_expressions() {
    assert_parses(
        r#"
package p

func f(a, b, c int, ch chan<- int) {
    _ = a + b*c - (a<<2)
    _ = a == b || a < c && b <= c
    _ = &a
    _ = []int{1,2,3}[0]
    _ = []int{1,2,3}[1:]
    _ = []int{1,2,3}[:2]
    _ = []int{1,2,3}[0:2:3]
    _ = map[string]int{"a":1, "b":2}["a"]
    _ = f2(a, b, c)
    _ = f3(a, b, c...)
}
"#,
    );
}

#[test]
fn parses_type_switches() {
    assert_parses(
        r#"
package p

func f(x interface{}) {
    switch x := x.(type) {
    case map[string]T:
        var r T
        _ = r
        _ = x
    case []chan<- T:
    case func(T) (S, error):
    case struct{ foo T }:
    case nil:
    default:
    }

    switch x.(type) {
    case int:
    }
}
"#,
    );
}

#[test]
fn parses_methods_and_func_lits() {
    assert_parses(
        r#"
package geometry

type Point struct {
    X, Y float64
}

func (p Point) Abs() float64 {
    return sqrt(p.X*p.X + p.Y*p.Y)
}

func (p *Point) Scale(f float64) {
    p.X = p.X * f
    p.Y = p.Y * f
}

func apply(f func(float64) float64, x float64) float64 {
    g := func(y float64) float64 { return f(y) + 1 }
    defer func() {}()
    go func() {}()
    return g(x)
}
"#,
    );
}

#[test]
fn parses_struct_tags_and_embedding() {
    assert_parses(
        r#"
package p

type Inner struct{}

type Outer struct {
    Inner
    *Inner
    Name string `json:"name"`
    Pair a.B
}
"#,
    );
}

#[test]
fn parses_builtin_make_and_new() {
    assert_parses(
        r#"
package p

func f() {
    _ = make([]chan<- *int, 0)
    _ = make(map[string]bool)
    _ = make(chan int, 4)
    _ = new(int)
    _ = []byte("hi")
}
"#,
    );
}

#[test]
fn rejects_garbage() {
    assert!(parse_source("package p\n\nfunc f( {}\n").is_err());
    assert!(parse_source("not a go file").is_err());
}

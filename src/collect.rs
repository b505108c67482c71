//! Call-site witness collection: the concrete types flowing into a named
//! interface parameter across all call edges.

use crate::oracle::{ArgKind, CallGraph};
use crate::ty::Ty;
use go_syntax::ast::{AstArena, FuncDeclId, Symbol};
use indexmap::IndexSet;
use tracing::debug;

/// Positional index of the parameter named `name`, flattening grouped
/// names left-to-right (`func f(a, b int, c bool)`: `c` is at 2).
pub fn named_param_pos(arena: &AstArena, func: FuncDeclId, name: Symbol) -> Option<usize> {
    let sig = arena.signatures[arena.funcs[func].signature];
    let mut pos = 0;
    for &fid in arena.fields_list(sig.params) {
        for ident in arena.ident_names(arena.fields[fid].names) {
            if ident.sym == name {
                return Some(pos);
            }
            pos += 1;
        }
    }
    None
}

/// Concrete types observed at call sites for the parameter `param` of
/// `func_id`.
///
/// Only interface-boxing arguments contribute: a call that passes an
/// already-interface value carries no concrete witness. Synthetic edges
/// without a call site are skipped. Results are deduplicated, preserving
/// first-seen order.
pub fn incoming_types_for(
    arena: &AstArena,
    callee_name: &str,
    func_id: FuncDeclId,
    param: Symbol,
    graph: &dyn CallGraph,
) -> Vec<Ty> {
    let Some(pos) = named_param_pos(arena, func_id, param) else {
        return Vec::new();
    };

    let mut seen: IndexSet<Ty> = IndexSet::new();
    for edge in graph.in_edges(callee_name) {
        let Some(site) = &edge.site else {
            continue;
        };
        let Some(arg) = site.args.get(pos) else {
            continue;
        };
        if let ArgKind::InterfaceBox(ty) = arg {
            debug!(callee = callee_name, caller = %edge.caller, incoming = %ty, "argument type witness");
            seen.insert(ty.clone());
        }
    }
    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{CallSite, Edge};
    use crate::ty::BasicKind;
    use go_syntax::parse_source;
    use std::collections::HashMap;

    struct MapGraph {
        edges: HashMap<String, Vec<Edge>>,
    }

    impl CallGraph for MapGraph {
        fn in_edges(&self, callee: &str) -> &[Edge] {
            self.edges.get(callee).map(Vec::as_slice).unwrap_or(&[])
        }
    }

    fn fixture() -> (AstArena, go_syntax::ast::Interner, FuncDeclId, Symbol) {
        let src = "package p\n\nfunc Foo(n, m int, x interface{}) {\n}\n";
        let (arena, mut interner, file) = parse_source(src).expect("parse");
        let func = arena
            .top_decls(file.decls)
            .iter()
            .find_map(|&d| match d {
                go_syntax::ast::TopLevelDecl::Func(id) => Some(id),
                _ => None,
            })
            .expect("func");
        let x = interner.intern("x");
        (arena, interner, func, x)
    }

    fn boxed(ty: Ty) -> ArgKind {
        ArgKind::InterfaceBox(ty)
    }

    #[test]
    fn grouped_names_flatten_left_to_right() {
        let (arena, mut interner, func, _) = fixture();
        let n = interner.intern("n");
        let m = interner.intern("m");
        let x = interner.intern("x");
        let missing = interner.intern("zzz");
        assert_eq!(named_param_pos(&arena, func, n), Some(0));
        assert_eq!(named_param_pos(&arena, func, m), Some(1));
        assert_eq!(named_param_pos(&arena, func, x), Some(2));
        assert_eq!(named_param_pos(&arena, func, missing), None);
    }

    #[test]
    fn collects_boxed_types_in_first_seen_order() {
        let (arena, _interner, func, x) = fixture();
        let graph = MapGraph {
            edges: HashMap::from([(
                "Foo".to_string(),
                vec![
                    Edge {
                        caller: "main".into(),
                        site: Some(CallSite {
                            args: vec![
                                ArgKind::Other,
                                ArgKind::Other,
                                boxed(Ty::Basic(BasicKind::Int)),
                            ],
                        }),
                    },
                    Edge {
                        caller: "main".into(),
                        site: Some(CallSite {
                            args: vec![
                                ArgKind::Other,
                                ArgKind::Other,
                                boxed(Ty::Basic(BasicKind::Bool)),
                            ],
                        }),
                    },
                    // Duplicate witness; must not repeat.
                    Edge {
                        caller: "helper".into(),
                        site: Some(CallSite {
                            args: vec![
                                ArgKind::Other,
                                ArgKind::Other,
                                boxed(Ty::Basic(BasicKind::Int)),
                            ],
                        }),
                    },
                    // Passes an interface through; no witness.
                    Edge {
                        caller: "relay".into(),
                        site: Some(CallSite {
                            args: vec![ArgKind::Other, ArgKind::Other, ArgKind::Other],
                        }),
                    },
                    // Synthetic edge without a site.
                    Edge {
                        caller: "root".into(),
                        site: None,
                    },
                ],
            )]),
        };

        let incoming = incoming_types_for(&arena, "Foo", func, x, &graph);
        assert_eq!(
            incoming,
            vec![Ty::Basic(BasicKind::Int), Ty::Basic(BasicKind::Bool)]
        );
    }

    #[test]
    fn no_edges_yields_empty() {
        let (arena, _interner, func, x) = fixture();
        let graph = MapGraph {
            edges: HashMap::new(),
        };
        assert!(incoming_types_for(&arena, "Foo", func, x, &graph).is_empty());
    }

    #[test]
    fn unknown_param_yields_empty() {
        let (arena, mut interner, func, _) = fixture();
        let graph = MapGraph {
            edges: HashMap::new(),
        };
        let bogus = interner.intern("bogus");
        assert!(incoming_types_for(&arena, "Foo", func, bogus, &graph).is_empty());
    }
}

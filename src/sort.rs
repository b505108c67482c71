//! Popularity sort for type-switch case clauses.
//!
//! Interfaces are ranked by how many of the switch's case types implement
//! them (descending, ties by ascending name); clauses are then ordered by
//! the lexicographic key over that interface order, so a clause whose type
//! implements a more popular interface sorts first. `default` goes last;
//! final ties break on the printed case type.

use crate::oracle::{InterfaceDef, TypeOracle};
use crate::ty::{self, Ty};
use go_syntax::ast::{AstArena, CaseItem, Interner, SourceFile, Stmt, StmtId};
use go_syntax::walk::{self, Visitor};
use std::cmp::Ordering;
use tracing::debug;

/// Sort every type switch in the file, however deeply nested in ordinary
/// control flow. Discovery stops at the first type switch on a path, so
/// one nested in another's clause body is left as written.
pub fn sort_file_type_switches(
    arena: &mut AstArena,
    interner: &Interner,
    file: &SourceFile,
    oracle: &dyn TypeOracle,
) -> usize {
    struct Collect {
        switches: Vec<StmtId>,
    }

    impl<'t> Visitor<'t> for Collect {
        fn visit_stmt(&mut self, tree: &'t AstArena, id: StmtId) {
            // Record and prune: clause bodies of a collected switch are
            // not searched for further switches.
            if matches!(tree.stmts[id], Stmt::TypeSwitch { .. }) {
                self.switches.push(id);
                return;
            }
            walk::descend_stmt(tree, id, self);
        }
    }

    let mut collect = Collect {
        switches: Vec::new(),
    };
    walk::walk_file(arena, file, &mut collect);

    let count = collect.switches.len();
    for stmt in collect.switches {
        sort_switch(arena, interner, stmt, oracle);
    }
    count
}

fn sort_switch(arena: &mut AstArena, interner: &Interner, stmt: StmtId, oracle: &dyn TypeOracle) {
    let Stmt::TypeSwitch { clauses, .. } = arena.stmts[stmt] else {
        return;
    };
    let clause_ids: Vec<_> = arena.switch_clause_ids(clauses).to_vec();
    if clause_ids.len() < 2 {
        return;
    }

    // The type of each clause (its first case item); `default` carries none.
    let clause_tys: Vec<Option<Ty>> = clause_ids
        .iter()
        .map(|&id| {
            let clause = arena.switch_clauses[id];
            if clause.is_default {
                return None;
            }
            match arena.case_items(clause.items).first() {
                Some(CaseItem::Type(type_id)) => Some(ty::lift(arena, interner, *type_id)),
                _ => None,
            }
        })
        .collect();

    let order = rank_interfaces(clause_tys.iter().flatten(), oracle);
    for iface in &order {
        debug!(iface = %iface.name, "interface in popularity order");
    }

    let mut indices: Vec<usize> = (0..clause_ids.len()).collect();
    indices.sort_by(|&a, &b| {
        compare_clauses(
            clause_tys[a].as_ref(),
            clause_tys[b].as_ref(),
            &order,
            oracle,
        )
    });

    let reordered: Vec<_> = indices.into_iter().map(|i| clause_ids[i]).collect();
    let new_list = arena.list_switch_clause_ids(reordered);
    match &mut arena.stmts[stmt] {
        Stmt::TypeSwitch { clauses: slot, .. } => *slot = new_list,
        _ => unreachable!("checked above"),
    }
}

/// Interfaces implemented by at least one case type, most popular first,
/// ties by ascending canonical name.
fn rank_interfaces<'t>(
    case_tys: impl Iterator<Item = &'t Ty>,
    oracle: &dyn TypeOracle,
) -> Vec<InterfaceDef> {
    let case_tys: Vec<&Ty> = case_tys.collect();
    let mut ranked: Vec<(InterfaceDef, usize)> = oracle
        .interfaces()
        .iter()
        .map(|iface| {
            let popularity = case_tys
                .iter()
                .filter(|ty| oracle.implements(ty, iface))
                .count();
            (iface.clone(), popularity)
        })
        .filter(|(_, popularity)| *popularity > 0)
        .collect();

    ranked.sort_by(|(ia, pa), (ib, pb)| pb.cmp(pa).then_with(|| ia.name.cmp(&ib.name)));
    ranked.into_iter().map(|(iface, _)| iface).collect()
}

fn compare_clauses(
    a: Option<&Ty>,
    b: Option<&Ty>,
    order: &[InterfaceDef],
    oracle: &dyn TypeOracle,
) -> Ordering {
    // Clauses without a type list (`default`) sort last.
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => (a, b),
    };

    for iface in order {
        let impl_a = oracle.implements(a, iface);
        let impl_b = oracle.implements(b, iface);
        if impl_a != impl_b {
            return if impl_a { Ordering::Less } else { Ordering::Greater };
        }
    }
    a.to_string().cmp(&b.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::InterfaceDef;
    use go_syntax::ast::ExprId;
    use go_syntax::{parse_source, print_file};

    /// Mock oracle with an explicit implements relation.
    struct Fixed {
        ifaces: Vec<InterfaceDef>,
        relation: Vec<(&'static str, &'static str)>, // (type, iface)
    }

    impl TypeOracle for Fixed {
        fn type_of_expr(&self, _expr: ExprId) -> Option<Ty> {
            None
        }
        fn is_var_alias(&self, _name: &str) -> bool {
            false
        }
        fn interfaces(&self) -> &[InterfaceDef] {
            &self.ifaces
        }
        fn implements(&self, ty: &Ty, iface: &InterfaceDef) -> bool {
            let name = ty.to_string();
            self.relation
                .iter()
                .any(|(t, i)| *t == name && *i == iface.name)
        }
    }

    fn iface(name: &str) -> InterfaceDef {
        InterfaceDef {
            name: name.to_string(),
            methods: Vec::new(),
        }
    }

    #[test]
    fn popularity_orders_c_b_d_a() {
        // A implements I1; B implements I2; C implements I1, I2;
        // D implements I2. I2 (popularity 3) outranks I1 (2), so C B D A.
        let src = r#"
package p

func f(x interface{}) {
	switch x.(type) {
	case A:
	case B:
	case C:
	case D:
	}
}
"#;
        let (mut arena, interner, file) = parse_source(src).expect("parse");
        let oracle = Fixed {
            ifaces: vec![iface("I1"), iface("I2")],
            relation: vec![("A", "I1"), ("B", "I2"), ("C", "I1"), ("C", "I2"), ("D", "I2")],
        };
        let sorted = sort_file_type_switches(&mut arena, &interner, &file, &oracle);
        assert_eq!(sorted, 1);

        let printed = print_file(&arena, &interner, &file);
        let positions: Vec<usize> = ["case C:", "case B:", "case D:", "case A:"]
            .iter()
            .map(|needle| printed.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{printed}");
    }

    #[test]
    fn default_clause_sorts_last() {
        let src = r#"
package p

func f(x interface{}) {
	switch x.(type) {
	default:
	case B:
	case A:
	}
}
"#;
        let (mut arena, interner, file) = parse_source(src).expect("parse");
        let oracle = Fixed {
            ifaces: vec![],
            relation: vec![],
        };
        sort_file_type_switches(&mut arena, &interner, &file, &oracle);
        let printed = print_file(&arena, &interner, &file);
        let a = printed.find("case A:").expect("A");
        let b = printed.find("case B:").expect("B");
        let d = printed.find("default:").expect("default");
        assert!(a < b && b < d, "{printed}");
    }

    #[test]
    fn sorted_input_is_stable() {
        let src = r#"
package p

func f(x interface{}) {
	switch x.(type) {
	case A:
	case B:
	}
}
"#;
        let (mut arena, interner, file) = parse_source(src).expect("parse");
        let oracle = Fixed {
            ifaces: vec![],
            relation: vec![],
        };
        let before = print_file(&arena, &interner, &file);
        sort_file_type_switches(&mut arena, &interner, &file, &oracle);
        let after = print_file(&arena, &interner, &file);
        assert_eq!(before, after);
    }

    #[test]
    fn type_switch_inside_a_sorted_clause_is_left_alone() {
        let src = r#"
package p

func f(x interface{}) {
	switch x.(type) {
	case B:
		switch x.(type) {
		case N:
		case M:
		}
	case A:
	}
}
"#;
        let (mut arena, interner, file) = parse_source(src).expect("parse");
        let oracle = Fixed {
            ifaces: vec![],
            relation: vec![],
        };
        let sorted = sort_file_type_switches(&mut arena, &interner, &file, &oracle);
        assert_eq!(sorted, 1, "only the outer switch is discovered");

        let printed = print_file(&arena, &interner, &file);
        // The outer clauses reorder (A before B); the nested switch keeps
        // its source order (N before M).
        let a = printed.find("case A:").expect("A");
        let b = printed.find("case B:").expect("B");
        assert!(a < b, "{printed}");
        let n = printed.find("case N:").expect("N");
        let m = printed.find("case M:").expect("M");
        assert!(n < m, "{printed}");
    }

    #[test]
    fn zero_popularity_interfaces_are_ignored() {
        let tys = [Ty::Named("A".into())];
        let oracle = Fixed {
            ifaces: vec![iface("I1"), iface("Unused")],
            relation: vec![("A", "I1")],
        };
        let ranked = rank_interfaces(tys.iter(), &oracle);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "I1");
    }
}

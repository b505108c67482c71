//! Template view over one type-switch statement.
//!
//! Construction triages the clauses into fixed clauses, template clauses
//! (single type item containing at least one variable), and the `default`
//! clause. Expansion inserts one specialized clause per matching incoming
//! type and reassembles the switch with the original templates preserved
//! as trailing fallbacks.

use crate::oracle::TypeOracle;
use crate::subst;
use crate::ty::{self, Ty};
use crate::unify;
use go_syntax::ast::{
    AstArena, CaseItem, Ident, Interner, Stmt, StmtId, SwitchClauseId,
};
use indexmap::IndexSet;
use tracing::debug;

/// A case clause whose type pattern mentions at least one variable.
#[derive(Debug)]
pub struct TemplateClause {
    pub pattern: Ty,
    pub clause: SwitchClauseId,
}

/// One type switch, decomposed for expansion.
pub struct TypeSwitchView {
    stmt: StmtId,
    /// Name of the switched-over identifier.
    pub target: Ident,
    fixed: Vec<SwitchClauseId>,
    templates: Vec<TemplateClause>,
    default: Option<SwitchClauseId>,
}

impl TypeSwitchView {
    /// Build a view over `stmt`.
    ///
    /// Returns `None` unless the statement is a type switch over a single
    /// identifier whose static type is the empty interface.
    pub fn from_stmt(
        arena: &AstArena,
        interner: &Interner,
        stmt: StmtId,
        oracle: &dyn TypeOracle,
    ) -> Option<Self> {
        let Stmt::TypeSwitch { guard, clauses, .. } = arena.stmts[stmt] else {
            return None;
        };
        let go_syntax::ast::Expr::Ident(target) = arena.exprs[guard.x] else {
            return None;
        };
        let target_ty = oracle.type_of_expr(guard.x)?;
        if !target_ty.is_empty_interface() {
            return None;
        }

        let mut fixed = Vec::new();
        let mut templates = Vec::new();
        let mut default = None;
        for &clause_id in arena.switch_clause_ids(clauses) {
            let clause = arena.switch_clauses[clause_id];
            if clause.is_default {
                default = Some(clause_id);
                continue;
            }
            let items = arena.case_items(clause.items);
            if let [CaseItem::Type(type_id)] = items {
                let pattern = ty::lift(arena, interner, *type_id);
                if !pattern.is_ground() {
                    templates.push(TemplateClause {
                        pattern,
                        clause: clause_id,
                    });
                    continue;
                }
            }
            fixed.push(clause_id);
        }

        Some(Self {
            stmt,
            target,
            fixed,
            templates,
            default,
        })
    }

    pub fn has_templates(&self) -> bool {
        !self.templates.is_empty()
    }

    /// Find the first template (in source order) whose pattern unifies
    /// with `incoming`.
    pub fn find_matching_template(
        &self,
        incoming: &Ty,
    ) -> Option<(&TemplateClause, unify::Binding)> {
        self.templates
            .iter()
            .find_map(|tmpl| unify::unify(&tmpl.pattern, incoming).map(|b| (tmpl, b)))
    }

    /// Rewrite the switch in place: fixed clauses, then one generated
    /// clause per matching incoming type (first-seen order, deduplicated
    /// by printed form), then the original templates, then `default`.
    ///
    /// Returns the number of clauses generated.
    pub fn expand(
        &self,
        arena: &mut AstArena,
        interner: &mut Interner,
        oracle: &dyn TypeOracle,
        incoming: &[Ty],
    ) -> usize {
        let mut present: IndexSet<String> = IndexSet::new();
        for &clause_id in &self.fixed {
            let clause = arena.switch_clauses[clause_id];
            let items: Vec<_> = arena.case_items(clause.items).to_vec();
            for item in items {
                if let CaseItem::Type(type_id) = item {
                    present.insert(ty::lift(arena, interner, type_id).to_string());
                }
            }
        }

        let is_var = |name: &str| oracle.is_var_alias(name);
        let mut generated = Vec::new();
        for incoming_ty in incoming {
            let key = incoming_ty.to_string();
            if present.contains(&key) {
                continue;
            }
            let Some((tmpl, binding)) = self.find_matching_template(incoming_ty) else {
                debug!(incoming = %key, "no template matches; skipping");
                continue;
            };
            debug!(incoming = %key, pattern = %tmpl.pattern, "specializing template clause");
            let clause = subst::instantiate_clause(
                arena,
                interner,
                tmpl.clause,
                &binding,
                incoming_ty,
                &is_var,
            );
            present.insert(key);
            generated.push(clause);
        }

        // Nothing produced: leave the switch untouched, clause order
        // included.
        if generated.is_empty() {
            return 0;
        }

        let count = generated.len();

        let mut order = Vec::with_capacity(
            self.fixed.len() + count + self.templates.len() + usize::from(self.default.is_some()),
        );
        order.extend(&self.fixed);
        order.extend(&generated);
        order.extend(self.templates.iter().map(|t| &t.clause));
        order.extend(&self.default);

        let clauses = arena.list_switch_clause_ids(order.into_iter().copied());
        match &mut arena.stmts[self.stmt] {
            Stmt::TypeSwitch { clauses: slot, .. } => *slot = clauses,
            _ => unreachable!("view constructed from a type switch"),
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{InterfaceDef, TypeOracle};
    use go_syntax::ast::ExprId;
    use go_syntax::{parse_source, print_stmt};
    use std::collections::HashMap;

    /// Minimal oracle: types the guard identifier as `interface{}` and
    /// treats every all-uppercase name as a variable alias.
    struct GuardOracle {
        types: HashMap<ExprId, Ty>,
        ifaces: Vec<InterfaceDef>,
    }

    impl TypeOracle for GuardOracle {
        fn type_of_expr(&self, expr: ExprId) -> Option<Ty> {
            self.types.get(&expr).cloned()
        }
        fn is_var_alias(&self, name: &str) -> bool {
            ty::is_type_var_name(name)
        }
        fn interfaces(&self) -> &[InterfaceDef] {
            &self.ifaces
        }
        fn implements(&self, _ty: &Ty, _iface: &InterfaceDef) -> bool {
            false
        }
    }

    fn switch_of(src: &str) -> (AstArena, Interner, StmtId, GuardOracle) {
        let (arena, interner, file) = parse_source(src).expect("parse");
        let mut found = None;
        for &decl in arena.top_decls(file.decls) {
            let go_syntax::ast::TopLevelDecl::Func(id) = decl else {
                continue;
            };
            let Some(body) = arena.funcs[id].body else {
                continue;
            };
            for &stmt in arena.stmts_list(body.stmts) {
                if let Stmt::TypeSwitch { guard, .. } = arena.stmts[stmt] {
                    found = Some((stmt, guard.x));
                }
            }
        }
        let (stmt, guard_x) = found.expect("fixture contains a type switch");
        let mut types = HashMap::new();
        types.insert(guard_x, Ty::Interface(Vec::new()));
        let oracle = GuardOracle {
            types,
            ifaces: Vec::new(),
        };
        (arena, interner, stmt, oracle)
    }

    const FIXTURE: &str = r#"
package p

func Foo(x interface{}) {
	switch x := x.(type) {
	case int:
		_ = x
	case map[string]T:
		var r T
		_ = r
	default:
		return
	}
}
"#;

    #[test]
    fn triage_splits_fixed_template_default() {
        let (arena, interner, stmt, oracle) = switch_of(FIXTURE);
        let view = TypeSwitchView::from_stmt(&arena, &interner, stmt, &oracle).expect("view");
        assert_eq!(view.fixed.len(), 1);
        assert_eq!(view.templates.len(), 1);
        assert!(view.default.is_some());
        assert_eq!(view.templates[0].pattern.to_string(), "map[string]T");
    }

    #[test]
    fn rejects_non_empty_interface_target() {
        let (arena, interner, stmt, mut oracle) = switch_of(FIXTURE);
        for ty in oracle.types.values_mut() {
            *ty = Ty::Named("io.Reader".into());
        }
        assert!(TypeSwitchView::from_stmt(&arena, &interner, stmt, &oracle).is_none());
    }

    #[test]
    fn expand_orders_fixed_generated_template_default() {
        let (mut arena, mut interner, stmt, oracle) = switch_of(FIXTURE);
        let view =
            TypeSwitchView::from_stmt(&arena, &interner, stmt, &oracle).expect("view");
        let incoming = vec![
            Ty::Map(
                Box::new(Ty::Basic(ty::BasicKind::String)),
                Box::new(Ty::Basic(ty::BasicKind::Int)),
            ),
            Ty::Map(
                Box::new(Ty::Basic(ty::BasicKind::String)),
                Box::new(Ty::Basic(ty::BasicKind::Bool)),
            ),
        ];
        let generated = view.expand(&mut arena, &mut interner, &oracle, &incoming);
        assert_eq!(generated, 2);

        let printed = print_stmt(&arena, &interner, stmt);
        let case_positions: Vec<usize> = [
            "case int:",
            "case map[string]int:",
            "case map[string]bool:",
            "case map[string]T:",
            "default:",
        ]
        .iter()
        .map(|needle| printed.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
        assert!(case_positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn expand_with_no_incoming_is_a_noop() {
        let (mut arena, mut interner, stmt, oracle) = switch_of(FIXTURE);
        let before = print_stmt(&arena, &interner, stmt);
        let view =
            TypeSwitchView::from_stmt(&arena, &interner, stmt, &oracle).expect("view");
        let generated = view.expand(&mut arena, &mut interner, &oracle, &[]);
        assert_eq!(generated, 0);
        assert_eq!(print_stmt(&arena, &interner, stmt), before);
    }

    #[test]
    fn expand_skips_types_already_fixed() {
        let (mut arena, mut interner, stmt, oracle) = switch_of(FIXTURE);
        let view =
            TypeSwitchView::from_stmt(&arena, &interner, stmt, &oracle).expect("view");
        let generated = view.expand(
            &mut arena,
            &mut interner,
            &oracle,
            &[Ty::Basic(ty::BasicKind::Int)],
        );
        assert_eq!(generated, 0);
    }

    #[test]
    fn substituted_body_rewrites_variable_declarations() {
        let (mut arena, mut interner, stmt, oracle) = switch_of(FIXTURE);
        let view =
            TypeSwitchView::from_stmt(&arena, &interner, stmt, &oracle).expect("view");
        let incoming = vec![Ty::Map(
            Box::new(Ty::Basic(ty::BasicKind::String)),
            Box::new(Ty::Slice(Box::new(Ty::Named("io.Reader".into())))),
        )];
        view.expand(&mut arena, &mut interner, &oracle, &incoming);
        let printed = print_stmt(&arena, &interner, stmt);
        assert!(printed.contains("case map[string][]io.Reader:"), "{printed}");
        assert!(printed.contains("var r []io.Reader"), "{printed}");
    }
}

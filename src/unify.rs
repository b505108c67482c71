//! Structural unification of template type patterns against ground types.
//!
//! The walk is top-down and componentwise; a variable binds the aligned
//! subterm of the target, and a re-occurrence of the same variable must
//! match its existing binding structurally. Bindings are always ground, so
//! no occurs check is needed.

use crate::ty::{BasicKind, ChanDir, FuncTy, Ty};
use indexmap::IndexMap;

/// Variable name → ground type, in first-bound order.
pub type Binding = IndexMap<String, Ty>;

/// Match `pattern` against ground `target`.
///
/// Returns `None` on any constructor, arity, direction, field-name, or tag
/// mismatch, and on inconsistent rebinding of a variable.
pub fn unify(pattern: &Ty, target: &Ty) -> Option<Binding> {
    let mut binding = Binding::new();
    if unify_into(pattern, target, &mut binding) {
        Some(binding)
    } else {
        None
    }
}

fn unify_into(pattern: &Ty, target: &Ty, binding: &mut Binding) -> bool {
    match (pattern, target) {
        (Ty::Var(name), _) => match binding.get(name) {
            Some(bound) => identical(bound, target),
            None => {
                binding.insert(name.clone(), target.clone());
                true
            }
        },

        // Named types match by exact qualified name only; no structural
        // subtyping, assignability, or interface satisfaction.
        (Ty::Named(a), Ty::Named(b)) => a == b,
        (Ty::Basic(a), Ty::Basic(b)) => basic_identical(*a, *b),

        (Ty::Pointer(a), Ty::Pointer(b)) | (Ty::Slice(a), Ty::Slice(b)) => {
            unify_into(a, b, binding)
        }
        (Ty::Array(n1, a), Ty::Array(n2, b)) => n1 == n2 && unify_into(a, b, binding),
        (Ty::Map(k1, v1), Ty::Map(k2, v2)) => {
            unify_into(k1, k2, binding) && unify_into(v1, v2, binding)
        }

        // A bidirectional template channel accepts any direction; a
        // directed template accepts only the same direction.
        (Ty::Chan(d1, a), Ty::Chan(d2, b)) => {
            (*d1 == ChanDir::Both || d1 == d2) && unify_into(a, b, binding)
        }

        (Ty::Func(a), Ty::Func(b)) => unify_func(a, b, binding),

        (Ty::Struct(a), Ty::Struct(b)) => {
            a.len() == b.len()
                && a.iter().zip(b).all(|(fa, fb)| {
                    fa.name == fb.name && fa.tag == fb.tag && unify_into(&fa.ty, &fb.ty, binding)
                })
        }

        (Ty::Interface(a), Ty::Interface(b)) => {
            a.len() == b.len()
                && a.iter().zip(b).all(|(ma, mb)| {
                    ma.name == mb.name && unify_func(&ma.sig, &mb.sig, binding)
                })
        }

        _ => false,
    }
}

fn unify_func(a: &FuncTy, b: &FuncTy, binding: &mut Binding) -> bool {
    a.variadic == b.variadic
        && a.params.len() == b.params.len()
        && a.results.len() == b.results.len()
        && a.params
            .iter()
            .zip(&b.params)
            .all(|(pa, pb)| unify_into(pa, pb, binding))
        && a.results
            .iter()
            .zip(&b.results)
            .all(|(ra, rb)| unify_into(ra, rb, binding))
}

/// Structural identity between ground types, with Go's byte/uint8 and
/// rune/int32 aliasing.
fn identical(a: &Ty, b: &Ty) -> bool {
    match (a, b) {
        (Ty::Basic(ka), Ty::Basic(kb)) => basic_identical(*ka, *kb),
        (Ty::Pointer(ea), Ty::Pointer(eb)) | (Ty::Slice(ea), Ty::Slice(eb)) => identical(ea, eb),
        (Ty::Array(na, ea), Ty::Array(nb, eb)) => na == nb && identical(ea, eb),
        (Ty::Map(ka, va), Ty::Map(kb, vb)) => identical(ka, kb) && identical(va, vb),
        (Ty::Chan(da, ea), Ty::Chan(db, eb)) => da == db && identical(ea, eb),
        _ => a == b,
    }
}

fn basic_identical(a: BasicKind, b: BasicKind) -> bool {
    normalize(a) == normalize(b)
}

fn normalize(kind: BasicKind) -> BasicKind {
    match kind {
        BasicKind::Byte => BasicKind::Uint8,
        BasicKind::Rune => BasicKind::Int32,
        other => other,
    }
}

/// Substitute every variable in `pattern` with its binding.
///
/// Unbound variables are left in place, so `apply` on a fully bound
/// pattern yields a ground type (the unification soundness property:
/// `unify(P, G) = Some(b)` implies `apply(P, b)` is identical to `G`).
pub fn apply(pattern: &Ty, binding: &Binding) -> Ty {
    match pattern {
        Ty::Var(name) => binding.get(name).cloned().unwrap_or_else(|| pattern.clone()),
        Ty::Named(_) | Ty::Basic(_) => pattern.clone(),
        Ty::Pointer(elem) => Ty::Pointer(Box::new(apply(elem, binding))),
        Ty::Slice(elem) => Ty::Slice(Box::new(apply(elem, binding))),
        Ty::Array(n, elem) => Ty::Array(*n, Box::new(apply(elem, binding))),
        Ty::Map(key, val) => Ty::Map(
            Box::new(apply(key, binding)),
            Box::new(apply(val, binding)),
        ),
        Ty::Chan(dir, elem) => Ty::Chan(*dir, Box::new(apply(elem, binding))),
        Ty::Func(sig) => Ty::Func(apply_func(sig, binding)),
        Ty::Struct(fields) => Ty::Struct(
            fields
                .iter()
                .map(|f| crate::ty::StructField {
                    name: f.name.clone(),
                    ty: apply(&f.ty, binding),
                    tag: f.tag.clone(),
                })
                .collect(),
        ),
        Ty::Interface(methods) => Ty::Interface(
            methods
                .iter()
                .map(|m| crate::ty::Method {
                    name: m.name.clone(),
                    sig: apply_func(&m.sig, binding),
                })
                .collect(),
        ),
    }
}

fn apply_func(sig: &FuncTy, binding: &Binding) -> FuncTy {
    FuncTy {
        params: sig.params.iter().map(|t| apply(t, binding)).collect(),
        results: sig.results.iter().map(|t| apply(t, binding)).collect(),
        variadic: sig.variadic,
    }
}

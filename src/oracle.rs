//! Capability traits the transformer core consumes.
//!
//! The core never depends on how these are computed; the bundled
//! implementation lives in `analysis`, and tests substitute hand-rolled
//! mocks.

use crate::ty::{Method, Ty};
use go_syntax::ast::ExprId;

/// A declared interface, with its method set flattened (embedded
/// interfaces resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDef {
    /// Canonical (package-qualified where applicable) name.
    pub name: String,
    pub methods: Vec<Method>,
}

/// How a call argument reaches an interface-typed parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgKind {
    /// The argument is a concrete value implicitly boxed into an
    /// interface; carries the boxed concrete type.
    InterfaceBox(Ty),
    /// Anything else, including arguments that are already interfaces.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Positional arguments, tagged.
    pub args: Vec<ArgKind>,
}

/// One in-edge of the call graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Caller function name, for diagnostics.
    pub caller: String,
    /// Synthetic edges carry no site and contribute no witnesses.
    pub site: Option<CallSite>,
}

pub trait TypeOracle {
    /// Static type of an expression, if known. Must be sound for the
    /// loaded program; returned types are ground.
    fn type_of_expr(&self, expr: ExprId) -> Option<Ty>;

    /// Whether `name` is declared in the target package as a type alias of
    /// the empty interface (`type T interface{}`), the declaration idiom
    /// that makes template bodies type-check.
    fn is_var_alias(&self, name: &str) -> bool;

    /// Every interface declared in any package of the loaded program.
    fn interfaces(&self) -> &[InterfaceDef];

    /// Method-set satisfaction of `iface` by `ty`.
    fn implements(&self, ty: &Ty, iface: &InterfaceDef) -> bool;
}

pub trait CallGraph {
    /// All in-edges to the function named `callee` (package-local name).
    fn in_edges(&self, callee: &str) -> &[Edge];
}

//! tsgen: template type-switch expansion for Go sources.
//!
//! A type switch may contain *template* case clauses whose type expression
//! mentions type variables (all-uppercase identifiers such as `T`, `S1`).
//! `tsgen` inflates each template into concrete clauses, one per distinct
//! argument type observed at the enclosing function's call sites, keeping
//! the template as the trailing fallback. A second mode reorders existing
//! case clauses by interface popularity.
//!
//! The core consumes its type and call-graph knowledge through the
//! capability traits in [`oracle`]; [`analysis`] is the bundled syntactic
//! implementation.

pub mod analysis;
pub mod collect;
pub mod error;
pub mod expand;
pub mod oracle;
pub mod program;
pub mod sort;
pub mod subst;
pub mod ty;
pub mod unify;
pub mod view;

pub use error::Error;
pub use expand::{expand_source, Options, Rewriter};
pub use program::Program;
pub use ty::Ty;
pub use unify::{unify, Binding};
pub use view::TypeSwitchView;

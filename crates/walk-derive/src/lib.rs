//! `#[derive(WalkAst)]`: child enumeration for the `go-syntax` traversal
//! layer.
//!
//! The expansion destructures the node (a `let` for structs, a `match`
//! for enums) and feeds every binding through `walk::Walk::walk`. Leaf
//! data (spans, symbols, operator kinds) gets empty impls by hand in
//! `go_syntax::walk`; deriving is only for nodes with children.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as Expansion;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident};

#[proc_macro_derive(WalkAst)]
pub fn walk_ast(input: TokenStream) -> TokenStream {
    let node = parse_macro_input!(input as DeriveInput);
    let name = &node.ident;

    let body = match &node.data {
        Data::Struct(data) => {
            if matches!(data.fields, Fields::Unit) {
                quote! { let _ = (tree, v); }
            } else {
                let (pattern, steps) = shape(&data.fields);
                quote! {
                    let Self #pattern = self;
                    #steps
                }
            }
        }
        Data::Enum(data) => {
            let arms = data.variants.iter().map(|variant| {
                let ident = &variant.ident;
                let (pattern, steps) = shape(&variant.fields);
                quote! { Self::#ident #pattern => { #steps } }
            });
            quote! {
                match self {
                    #(#arms)*
                }
            }
        }
        Data::Union(_) => {
            return syn::Error::new_spanned(name, "`WalkAst` supports structs and enums only")
                .into_compile_error()
                .into();
        }
    };

    let expanded = quote! {
        impl<'t> crate::walk::Walk<'t> for #name {
            fn walk<V: crate::walk::Visitor<'t> + ?Sized>(
                &self,
                tree: &'t crate::ast::AstArena,
                v: &mut V,
            ) {
                #body
            }
        }
    };
    expanded.into()
}

/// Destructuring pattern for a field set plus the walk call per binding.
/// Named fields bind under their own names; tuple fields as `c0`, `c1`, …
fn shape(fields: &Fields) -> (Expansion, Expansion) {
    match fields {
        Fields::Named(named) => {
            let names: Vec<&Ident> = named
                .named
                .iter()
                .map(|f| f.ident.as_ref().expect("named field has an identifier"))
                .collect();
            let pattern = quote! { { #(#names),* } };
            (pattern, steps(&names))
        }
        Fields::Unnamed(unnamed) => {
            let names: Vec<Ident> = (0..unnamed.unnamed.len())
                .map(|i| format_ident!("c{i}"))
                .collect();
            let pattern = quote! { ( #(#names),* ) };
            let refs: Vec<&Ident> = names.iter().collect();
            (pattern, steps(&refs))
        }
        Fields::Unit => (quote!(), quote!()),
    }
}

fn steps(names: &[&Ident]) -> Expansion {
    let calls = names
        .iter()
        .map(|name| quote! { crate::walk::Walk::walk(#name, tree, v); });
    quote! { #(#calls)* }
}

//! Procedural macros for querybus.
//!
//! - `#[derive(Query)]` - implements `querybus::Query`, optionally with a
//!   self-reported name given by `#[query(name = "...")]`

use proc_macro::TokenStream;

mod query;

/// Derive macro for implementing the `Query` trait.
///
/// Without attributes the query is routed by its structural type name.
/// `#[query(name = "users/GetByID")]` makes it report a stable name instead.
///
/// Type parameters are bounded by `Send + Sync + 'static`.
#[proc_macro_derive(Query, attributes(query))]
pub fn derive_query(input: TokenStream) -> TokenStream {
    query::derive_query_impl(input)
}

//! `#[derive(Query)]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, DeriveInput, GenericParam, Ident, LitStr, Token,
    parse::{Parse, ParseStream},
    parse_macro_input, parse_quote,
};

/// Arguments for the `#[query(...)]` attribute.
pub(crate) struct QueryArgs {
    pub name: Option<LitStr>,
}

impl Parse for QueryArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "query name must not be empty"));
                    }
                    if name.is_some() {
                        return Err(syn::Error::new(ident.span(), "duplicate `name` argument"));
                    }
                    name = Some(lit);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(QueryArgs { name })
    }
}

fn query_args(attrs: &[Attribute]) -> syn::Result<QueryArgs> {
    let mut found: Option<QueryArgs> = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("query")) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate `#[query]` attribute"));
        }
        found = Some(attr.parse_args()?);
    }
    Ok(found.unwrap_or(QueryArgs { name: None }))
}

/// Implementation of `#[derive(Query)]`.
pub fn derive_query_impl(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);

    let args = match query_args(&input.attrs) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let type_params: Vec<Ident> = input
        .generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(ty.ident.clone()),
            _ => None,
        })
        .collect();
    if !type_params.is_empty() {
        let where_clause = input.generics.make_where_clause();
        for ident in type_params {
            where_clause
                .predicates
                .push(parse_quote!(#ident: ::core::marker::Send + ::core::marker::Sync + 'static));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let query_name = query_name_fn(args.name.as_ref());

    let expanded = quote! {
        impl #impl_generics ::querybus::Query for #name #ty_generics #where_clause {
            #query_name
        }
    };

    TokenStream::from(expanded)
}

/// The `query_name` override, empty when no name was given.
fn query_name_fn(name: Option<&LitStr>) -> proc_macro2::TokenStream {
    match name {
        Some(lit) => quote! {
            fn query_name(&self) -> ::core::option::Option<&str> {
                ::core::option::Option::Some(#lit)
            }
        },
        None => proc_macro2::TokenStream::new(),
    }
}

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Expr, ItemStruct, Lit, Meta};

/// Binds a fixed cookie name to a marker struct by implementing `CookieName` for it.
///
/// `CookieName` must be in scope where the macro is used.
#[proc_macro_attribute]
pub fn cookie(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);

    let parsed_attr = parse_macro_input!(attr as Meta);

    if !parsed_attr.path().is_ident("name") {
        return syn::Error::new_spanned(
            parsed_attr.path().get_ident(),
            "Expected `name` parameter: #[cookie(name = \"...\")]",
        )
        .into_compile_error()
        .into();
    }

    let lit_str = match &parsed_attr {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(expr) => match &expr.lit {
                Lit::Str(lit_str) => lit_str.clone(),
                other => {
                    return syn::Error::new_spanned(other, "Expected a string literal")
                        .into_compile_error()
                        .into()
                }
            },
            other => {
                return syn::Error::new_spanned(other, "Expected a string literal")
                    .into_compile_error()
                    .into()
            }
        },
        other => {
            return syn::Error::new_spanned(other, "Expected `name = \"...\"`")
                .into_compile_error()
                .into()
        }
    };

    let cookie_name = lit_str.value();

    // The name is written to the host unencoded, so it must survive the header split
    if cookie_name.is_empty() {
        return syn::Error::new_spanned(lit_str, "The cookie name cannot be empty")
            .into_compile_error()
            .into();
    }
    if let Some(c) = cookie_name
        .chars()
        .find(|c| matches!(*c, '=' | ';' | ',') || c.is_whitespace())
    {
        return syn::Error::new_spanned(
            lit_str,
            format!("The cookie name cannot contain `{}`", c.escape_default()),
        )
        .into_compile_error()
        .into();
    }

    let cookie_struct = &input.ident;

    let expanded = quote! {
        #input

        impl CookieName for #cookie_struct {
            const COOKIE_NAME: &'static str = #cookie_name;
        }
    };

    expanded.into()
}

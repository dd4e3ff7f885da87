use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Data, DeriveInput, Field, Fields, Type, parse_macro_input};

/// Finds a named field.
fn find_field<'a>(fields: &'a Punctuated<Field, Comma>, name: &str) -> Option<&'a Field> {
    fields
        .iter()
        .find(|f| f.ident.as_ref().is_some_and(|ident| ident == name))
}

/// Checks if a type's last path segment is `ident`, e.g. `String`.
fn is_type(ty: &Type, ident: &str) -> bool {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
    {
        return segment.ident == ident;
    }
    false
}

/// Derive macro for bank records.
///
/// The struct must have a `script_name: String` field. The macro implements
/// `crate::Identified` on top of it, along with `PartialEq`/`Eq` comparing by
/// script name only. If the struct also has a `common: CommonProperties`
/// field, `crate::HasCommonProperties` is implemented as well.
///
/// # Usage
///
/// ```ignore
/// #[derive(Debug, Clone, Identified)]
/// pub struct Commander {
///     script_name: String,
///     common: CommonProperties,
///     portrait: String,
/// }
/// ```
#[proc_macro_derive(Identified)]
pub fn derive_identified(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    &input,
                    "Identified only works on structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "Identified only works on structs")
                .to_compile_error()
                .into();
        }
    };

    match find_field(fields, "script_name") {
        Some(field) if is_type(&field.ty, "String") => {}
        Some(field) => {
            return syn::Error::new_spanned(&field.ty, "script_name must be a String")
                .to_compile_error()
                .into();
        }
        None => {
            return syn::Error::new_spanned(&input, "Identified requires a script_name field")
                .to_compile_error()
                .into();
        }
    }

    let common_impl = match find_field(fields, "common") {
        Some(field) if is_type(&field.ty, "CommonProperties") => quote! {
            impl crate::HasCommonProperties for #name {
                fn common(&self) -> &crate::CommonProperties {
                    &self.common
                }
            }
        },
        _ => quote! {},
    };

    let expanded = quote! {
        impl crate::Identified for #name {
            fn script_name(&self) -> &str {
                &self.script_name
            }
        }

        impl ::core::cmp::PartialEq for #name {
            fn eq(&self, other: &Self) -> bool {
                self.script_name == other.script_name
            }
        }

        impl ::core::cmp::Eq for #name {}

        #common_impl
    };

    TokenStream::from(expanded)
}

use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Generates typed field lenses and name-based value access for a struct of
/// string fields. Every named field becomes a form field keyed by its name.
#[proc_macro_derive(FormModel)]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormModel derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_ident = input.ident;
    let fields_struct_ident = format_ident!("{model_ident}Fields");

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new_spanned(
                    &model_ident,
                    "FormModel derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(
                &model_ident,
                "FormModel derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let chirper = chirper_path();
    let mut lens_defs = Vec::new();
    let mut fields_methods = Vec::new();
    let mut key_exprs = Vec::new();
    let mut value_arms = Vec::new();
    let mut set_arms = Vec::new();

    for field in named_fields {
        let Some(field_ident) = field.ident else {
            continue;
        };
        let field_ty = field.ty;
        let field_name = field_ident.to_string();
        let lens_ident = format_ident!("{model_ident}{}Lens", to_pascal_case(&field_name));

        lens_defs.push(quote! {
            #[derive(Clone, Copy, Debug, Default)]
            pub struct #lens_ident;

            impl #chirper::form::FieldLens<#model_ident> for #lens_ident {
                type Value = #field_ty;

                fn key(self) -> #chirper::form::FieldKey {
                    #chirper::form::FieldKey::new(#field_name)
                }

                fn get<'a>(self, model: &'a #model_ident) -> &'a Self::Value {
                    &model.#field_ident
                }

                fn set(self, model: &mut #model_ident, value: Self::Value) {
                    model.#field_ident = value;
                }
            }
        });

        fields_methods.push(quote! {
            pub const fn #field_ident(&self) -> #lens_ident {
                #lens_ident
            }
        });

        key_exprs.push(quote! {
            #chirper::form::FieldKey::new(#field_name)
        });

        value_arms.push(quote! {
            #field_name => ::core::option::Option::Some(
                ::core::convert::AsRef::<str>::as_ref(&self.#field_ident)
            ),
        });

        set_arms.push(quote! {
            #field_name => {
                self.#field_ident = ::core::convert::From::from(value);
                true
            }
        });
    }

    quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #fields_struct_ident;

        impl #fields_struct_ident {
            #(#fields_methods)*
        }

        impl #chirper::form::FormModel for #model_ident {
            type Fields = #fields_struct_ident;

            fn fields() -> Self::Fields {
                #fields_struct_ident
            }

            fn field_keys() -> &'static [#chirper::form::FieldKey] {
                const KEYS: &[#chirper::form::FieldKey] = &[#(#key_exprs),*];
                KEYS
            }

            fn value(&self, key: #chirper::form::FieldKey) -> ::core::option::Option<&str> {
                match key.as_str() {
                    #(#value_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_value(
                &mut self,
                key: #chirper::form::FieldKey,
                value: ::std::string::String,
            ) -> bool {
                match key.as_str() {
                    #(#set_arms)*
                    _ => false,
                }
            }
        }

        #(#lens_defs)*
    }
    .into()
}

fn chirper_path() -> TokenStream2 {
    match crate_name("chirper") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        // Integration tests and doctests share the manifest with the library
        // but are compiled as separate crates.
        Ok(FoundCrate::Itself) => match std::env::var("CARGO_CRATE_NAME") {
            Ok(name) if name != "chirper" => quote!(::chirper),
            _ => quote!(crate),
        },
        Err(_) => quote!(::chirper),
    }
}

fn to_pascal_case(input: &str) -> String {
    let mut out = String::new();
    for segment in input.split('_') {
        if segment.is_empty() {
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

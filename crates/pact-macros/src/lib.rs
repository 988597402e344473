use proc_macro::TokenStream;
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{
    Error, Ident, ItemStruct, Result, Token, Type,
    parse::{Parse, ParseStream},
    parse_macro_input, parse_quote,
    spanned::Spanned,
};

const SHAPE_KEYS: [&str; 4] = ["body", "params", "query", "response"];

#[derive(Default)]
struct ShapeArgs {
    body: Option<Type>,
    params: Option<Type>,
    query: Option<Type>,
    response: Option<Type>,
}

impl ShapeArgs {
    fn slot(&mut self, key: &Ident) -> Result<&mut Option<Type>> {
        let slot: &mut Option<Type> = match key.to_string().as_str() {
            "body" => &mut self.body,
            "params" => &mut self.params,
            "query" => &mut self.query,
            "response" => &mut self.response,
            _ => {
                return Err(Error::new(
                    key.span(),
                    format!("Expected one of {}", SHAPE_KEYS.map(|k: &str| format!("`{k}`")).join(", ")),
                ));
            }
        };

        if slot.is_some() {
            return Err(Error::new(key.span(), format!("`{key}` given more than once")));
        }

        Ok(slot)
    }
}

impl Parse for ShapeArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args: ShapeArgs = ShapeArgs::default();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let ty: Type = input.parse()?;

            *args.slot(&key)? = Some(ty);

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

fn resolve_router_path() -> syn::Path {
    match crate_name("pact-router") {
        Ok(FoundCrate::Itself) => parse_quote!(crate),
        Ok(FoundCrate::Name(name)) => {
            let name: Ident = format_ident!("{name}");
            parse_quote!(::#name)
        }
        Err(_) => match crate_name("pact") {
            Ok(FoundCrate::Itself) => parse_quote!(crate::pact_router),
            Ok(FoundCrate::Name(name)) => {
                let name: Ident = format_ident!("{name}");
                parse_quote!(::#name::pact_router)
            }
            Err(_) => parse_quote!(::pact_router),
        },
    }
}

/// Implements `RouteShape` for the annotated struct.
///
/// `#[route_shape(body = T, params = T, query = T, response = T)]`, every key optional.
/// Missing request fields accept any input, a missing response is `()`.
#[proc_macro_attribute]
pub fn route_shape(attr: TokenStream, item: TokenStream) -> TokenStream {
    let shape: ItemStruct = parse_macro_input!(item);
    let args: ShapeArgs = parse_macro_input!(attr);

    if !shape.generics.params.is_empty() {
        return Error::new(shape.generics.span(), "#[route_shape] Does not support generic structs")
            .to_compile_error()
            .into();
    }

    let router_path: syn::Path = resolve_router_path();
    let any: Type = parse_quote!(#router_path::IgnoredAny);

    let name: &Ident = &shape.ident;
    let body: Type = args.body.unwrap_or_else(|| any.clone());
    let params: Type = args.params.unwrap_or_else(|| any.clone());
    let query: Type = args.query.unwrap_or_else(|| any.clone());
    let response: Type = args.response.unwrap_or_else(|| parse_quote!(()));

    quote! {
        #shape

        impl #router_path::RouteShape for #name {
            type Body = #body;
            type Params = #params;
            type Query = #query;
            type Response = #response;
        }
    }
    .into()
}

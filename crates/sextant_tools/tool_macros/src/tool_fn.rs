//! Code generation for `#[tool]` on async functions.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use sextant_macro_utils::{SextantCrate, resolve_crate_path, to_pascal_case};
use syn::{FnArg, ItemFn, Signature};

use crate::param::{ToolParam, doc_text, returns_result};

/// Expands `#[tool]` on an async function.
///
/// The function body moves into a private `__tool_impl_<name>`; a unit
/// `<Name>Tool` struct implements `Tool` by extracting the arguments and
/// calling it, and a constructor with the original name returns the struct.
pub(crate) fn generate_tool_fn(input: &ItemFn) -> TokenStream {
    expand(input).unwrap_or_else(syn::Error::into_compile_error)
}

fn expand(input: &ItemFn) -> syn::Result<TokenStream> {
    validate(&input.sig)?;

    let params = input
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(ToolParam::parse(pat_type)),
            FnArg::Receiver(_) => None,
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let pt = resolve_crate_path(SextantCrate::Tools);
    let json = quote! { #pt::__private::serde_json };

    let fn_name = &input.sig.ident;
    let name = fn_name.to_string();
    let struct_name = format_ident!("{}Tool", to_pascal_case(&name));
    let impl_fn = format_ident!("__tool_impl_{}", fn_name);

    let description = doc_text(&input.attrs).map(|doc| quote! { .with_description(#doc) });
    let schemas = params.iter().map(|param| param.schema(&pt));
    let extractions = params.iter().map(|param| param.extraction(&pt));
    let declarations = params.iter().map(ToolParam::declaration);
    let idents: Vec<_> = params.iter().map(ToolParam::ident).collect();

    let bind_call = if params.is_empty() {
        quote! { let _ = __args; }
    } else {
        quote! { let __call = #pt::ToolArgs::from_value(#name, __args)?; }
    };
    let output_value = if returns_result(&input.sig.output) {
        quote! { #impl_fn(#(#idents),*).await? }
    } else {
        quote! { #impl_fn(#(#idents),*).await }
    };

    let vis = &input.vis;
    let output = &input.sig.output;
    let block = &input.block;
    let struct_doc = format!("The `{name}` tool.");
    let constructor_doc = format!("Creates the `{name}` tool.");

    Ok(quote! {
        async fn #impl_fn(#(#declarations),*) #output #block

        #[doc = #struct_doc]
        #[derive(Debug, Clone, Copy, Default)]
        #vis struct #struct_name;

        impl #pt::Tool for #struct_name {
            fn definition(&self) -> #pt::ToolDefinition {
                #pt::FunctionMetadata::new(#name)
                    #description
                    #(.add_parameter(#schemas))*
                    .to_tool_definition()
            }

            fn execute(
                &self,
                __args: #json::Value,
            ) -> ::core::pin::Pin<Box<dyn ::core::future::Future<Output = Result<#json::Value, #pt::ToolError>> + Send + '_>> {
                Box::pin(async move {
                    #bind_call
                    #(#extractions)*
                    #json::to_value(#output_value).map_err(#pt::ToolError::SerializationError)
                })
            }
        }

        #[doc = #constructor_doc]
        #[must_use]
        #vis fn #fn_name() -> #struct_name {
            #struct_name
        }
    })
}

/// Rejects signatures `#[tool]` cannot wrap: non-async, unsafe, extern,
/// generic, or taking `self`.
fn validate(sig: &Signature) -> syn::Result<()> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            sig.fn_token,
            "#[tool] requires an async function",
        ));
    }
    if let Some(unsafety) = &sig.unsafety {
        return Err(syn::Error::new_spanned(
            unsafety,
            "#[tool] cannot be applied to unsafe functions",
        ));
    }
    if let Some(abi) = &sig.abi {
        return Err(syn::Error::new_spanned(
            abi,
            "#[tool] cannot be applied to extern functions",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[tool] does not support generic parameters",
        ));
    }
    if let Some(FnArg::Receiver(receiver)) = sig.inputs.first() {
        return Err(syn::Error::new_spanned(
            receiver,
            "#[tool] functions cannot have a `self` receiver; \
             capture state in a type that implements `Tool` instead",
        ));
    }
    Ok(())
}

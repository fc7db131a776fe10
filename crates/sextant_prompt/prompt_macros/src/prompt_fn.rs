//! Code generation for `#[prompt]` and `#[prompt_chain]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use sextant_macro_utils::{SextantCrate, resolve_crate_path, to_pascal_case};
use syn::{Attribute, Expr, ExprLit, FnArg, Ident, ItemFn, Lit, Meta, Pat, PatType, ReturnType, Type};

use crate::args::PromptArgs;

/// Which invoker the declaration builds.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flavor {
    /// A single backend call per invocation.
    Prompt,
    /// Tool calls are executed until the model answers.
    Chain,
}

impl Flavor {
    fn attribute(self) -> &'static str {
        match self {
            Self::Prompt => "#[prompt]",
            Self::Chain => "#[prompt_chain]",
        }
    }
}

/// A declared prompt parameter.
struct PromptParam {
    ident: Ident,
    ty: Type,
    description: Option<String>,
    default_expr: Option<Expr>,
}

impl PromptParam {
    /// The type the generated `call` and `render` methods take.
    fn call_type(&self) -> TokenStream {
        let ty = &self.ty;
        if self.default_expr.is_some() {
            quote! { ::core::option::Option<#ty> }
        } else {
            quote! { #ty }
        }
    }
}

/// Generates the prompt struct and constructor for a declaration.
pub(crate) fn generate_prompt_fn(args: PromptArgs, input: &ItemFn, flavor: Flavor) -> TokenStream {
    match expand(args, input, flavor) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(args: PromptArgs, input: &ItemFn, flavor: Flavor) -> syn::Result<TokenStream> {
    validate_signature(input, flavor)?;

    let attribute = flavor.attribute();
    let return_type = match &input.sig.output {
        ReturnType::Type(_, ty) => (**ty).clone(),
        ReturnType::Default => {
            return Err(syn::Error::new_spanned(
                &input.sig,
                format!("{attribute} functions must declare a return type"),
            ));
        }
    };

    if flavor == Flavor::Prompt
        && let Some((key, _)) = &args.max_iterations
    {
        return Err(syn::Error::new_spanned(
            key,
            "`max_iterations` is only supported by #[prompt_chain]",
        ));
    }

    let doc = raw_doc(&input.attrs);
    let template = args
        .template
        .as_ref()
        .filter(|template| !template.value().trim().is_empty());
    if template.is_none() && doc.is_none() {
        return Err(syn::Error::new_spanned(
            &input.sig.ident,
            format!(
                "{attribute} requires a template: pass `template = \"...\"` or document the function"
            ),
        ));
    }

    let params = input
        .sig
        .inputs
        .iter()
        .map(|arg| match arg {
            FnArg::Typed(pat_type) => parse_param(pat_type, attribute),
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                format!("{attribute} functions cannot take `self`"),
            )),
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let pp = resolve_crate_path(SextantCrate::Prompt);
    let json = quote! { #pp::__private::serde_json };

    let fn_name = &input.sig.ident;
    let fn_name_str = fn_name.to_string();
    let vis = &input.vis;

    let (struct_name, invoker, build) = match flavor {
        Flavor::Prompt => (
            format_ident!("{}Prompt", to_pascal_case(&fn_name_str)),
            quote! { #pp::PromptFunction<#return_type> },
            quote! { .build()? },
        ),
        Flavor::Chain => {
            let limit = args
                .max_iterations
                .as_ref()
                .map(|(_, value)| quote! { .with_max_iterations(#value) });
            (
                format_ident!("{}Chain", to_pascal_case(&fn_name_str)),
                quote! { #pp::PromptChain<#return_type> },
                quote! { .build_chain()? #limit },
            )
        }
    };

    let doc_call = doc.as_ref().map(|doc| quote! { .doc(#doc) });
    let template_call = template.map(|template| quote! { .template(#template) });
    let param_calls = params.iter().map(|param| {
        let name = param.ident.to_string();
        let description = param
            .description
            .as_ref()
            .map(|description| quote! { .with_description(#description) });
        let default = param
            .default_expr
            .as_ref()
            .map(|expr| quote! { .with_default(#json::json!(#expr)) });
        quote! { .param(#pp::Parameter::new(#name) #default #description) }
    });
    let function_calls = args.functions.iter().map(|tool| quote! { .function(#tool) });
    let model_call = args.model.as_ref().map(|model| quote! { .model(#model) });

    let typed_params: Vec<TokenStream> = params
        .iter()
        .map(|param| {
            let ident = &param.ident;
            let ty = param.call_type();
            quote! { #ident: #ty }
        })
        .collect();
    let param_idents: Vec<&Ident> = params.iter().map(|param| &param.ident).collect();
    let bindings = params.iter().map(|param| {
        let ident = &param.ident;
        let name = ident.to_string();
        if param.default_expr.is_some() {
            quote! {
                let __args = match &#ident {
                    ::core::option::Option::Some(__value) => __args.try_kwarg(#name, __value)?,
                    ::core::option::Option::None => __args,
                };
            }
        } else {
            quote! { let __args = __args.try_kwarg(#name, &#ident)?; }
        }
    });

    let struct_doc = format!("The `{fn_name_str}` prompt function, built by `{fn_name_str}()`.");
    let try_new_doc = format!(
        "Builds the `{fn_name_str}` prompt function.\n\n\
         # Errors\n\n\
         Returns a `DeclarationError` if the declaration is invalid."
    );
    let panic_doc = format!(
        "\n\n# Panics\n\nPanics if the declaration is invalid; see `{struct_name}::try_new`."
    );

    let doc_attrs: Vec<&Attribute> = input
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .collect();
    let other_attrs: Vec<&Attribute> = input
        .attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("doc"))
        .collect();
    let constructor_doc = if doc_attrs.is_empty() {
        let fallback = format!("Creates the `{fn_name_str}` prompt function.{panic_doc}");
        quote! { #[doc = #fallback] }
    } else {
        quote! {
            #(#doc_attrs)*
            #[doc = #panic_doc]
        }
    };

    Ok(quote! {
        #[doc = #struct_doc]
        #vis struct #struct_name {
            inner: #invoker,
        }

        impl #struct_name {
            #[doc = #try_new_doc]
            pub fn try_new() -> ::core::result::Result<Self, #pp::DeclarationError> {
                let inner = #pp::PromptBuilder::<#return_type>::new(#fn_name_str)
                    #doc_call
                    #template_call
                    #(#param_calls)*
                    #(#function_calls)*
                    #model_call
                    #build;
                ::core::result::Result::Ok(Self { inner })
            }

            fn bind_arguments(
                #(#typed_params),*
            ) -> ::core::result::Result<#pp::Arguments, #pp::BindingError> {
                let __args = #pp::Arguments::new();
                #(#bindings)*
                ::core::result::Result::Ok(__args)
            }

            /// Calls the prompt function.
            ///
            /// # Errors
            ///
            /// Returns a `PromptError` if binding, rendering or the backend
            /// fails, or if the answer does not match the return type.
            pub async fn call(
                &self,
                #(#typed_params),*
            ) -> ::core::result::Result<#return_type, #pp::PromptError> {
                let __args = Self::bind_arguments(#(#param_idents),*)?;
                self.inner.call(__args).await
            }

            /// Renders the template without contacting the backend.
            ///
            /// # Errors
            ///
            /// Returns a `PromptError` if binding or rendering fails.
            pub fn render(
                &self,
                #(#typed_params),*
            ) -> ::core::result::Result<::std::string::String, #pp::PromptError> {
                let __args = Self::bind_arguments(#(#param_idents),*)?;
                self.inner.render(__args)
            }
        }

        impl ::core::ops::Deref for #struct_name {
            type Target = #invoker;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::core::fmt::Debug for #struct_name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(&self.inner, f)
            }
        }

        #constructor_doc
        #(#other_attrs)*
        #[must_use]
        #vis fn #fn_name() -> #struct_name {
            match #struct_name::try_new() {
                ::core::result::Result::Ok(prompt) => prompt,
                ::core::result::Result::Err(err) => {
                    ::core::panic!("invalid prompt declaration `{}`: {}", #fn_name_str, err)
                }
            }
        }
    })
}

fn validate_signature(input: &ItemFn, flavor: Flavor) -> syn::Result<()> {
    let attribute = flavor.attribute();
    let sig = &input.sig;

    if let Some(unsafety) = &sig.unsafety {
        return Err(syn::Error::new_spanned(
            unsafety,
            format!("{attribute} cannot be applied to unsafe functions"),
        ));
    }
    if let Some(abi) = &sig.abi {
        return Err(syn::Error::new_spanned(
            abi,
            format!("{attribute} cannot be applied to extern functions"),
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            format!("{attribute} does not support generic parameters"),
        ));
    }
    if !input.block.stmts.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.block,
            format!("{attribute} functions must have an empty body; the template is the body"),
        ));
    }
    Ok(())
}

fn parse_param(pat_type: &PatType, attribute: &str) -> syn::Result<PromptParam> {
    let Pat::Ident(pat_ident) = &*pat_type.pat else {
        return Err(syn::Error::new_spanned(
            &pat_type.pat,
            format!("{attribute} parameters must be plain identifiers"),
        ));
    };

    let default_expr = pat_type
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("default"))
        .map(|attr| attr.parse_args::<Expr>())
        .transpose()?;

    Ok(PromptParam {
        ident: pat_ident.ident.clone(),
        ty: (*pat_type.ty).clone(),
        description: raw_doc(&pat_type.attrs).map(|doc| doc.trim().to_string()),
        default_expr,
    })
}

/// Joins doc comment lines without trimming, so relative indentation survives
/// until the builder dedents the text.
fn raw_doc(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter_map(|attr| {
            if attr.path().is_ident("doc")
                && let Meta::NameValue(meta) = &attr.meta
                && let Expr::Lit(ExprLit {
                    lit: Lit::Str(lit_str),
                    ..
                }) = &meta.value
            {
                Some(lit_str.value())
            } else {
                None
            }
        })
        .collect();

    if lines.iter().all(|line| line.trim().is_empty()) {
        None
    } else {
        Some(lines.join("\n"))
    }
}

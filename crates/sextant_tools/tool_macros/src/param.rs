//! Parameters of a `#[tool]` function.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Attribute, Expr, ExprLit, GenericArgument, Ident, Lit, Meta, Pat, PatIdent, PatType,
    PathArguments, ReturnType, Type,
};

/// A typed parameter of a `#[tool]` function.
pub(crate) struct ToolParam {
    binding: PatIdent,
    ty: Type,
    /// `T` when the parameter is declared as `Option<T>`.
    optional: Option<Type>,
    description: Option<String>,
    default_expr: Option<Expr>,
}

impl ToolParam {
    pub(crate) fn parse(pat_type: &PatType) -> syn::Result<Self> {
        let Pat::Ident(binding) = &*pat_type.pat else {
            return Err(syn::Error::new_spanned(
                &pat_type.pat,
                "#[tool] parameters must be plain identifiers",
            ));
        };

        let default_expr = pat_type
            .attrs
            .iter()
            .find(|attr| attr.path().is_ident("default"))
            .map(|attr| attr.parse_args::<Expr>())
            .transpose()?;

        Ok(Self {
            binding: binding.clone(),
            ty: (*pat_type.ty).clone(),
            optional: option_inner(&pat_type.ty).cloned(),
            description: doc_text(&pat_type.attrs),
            default_expr,
        })
    }

    pub(crate) fn ident(&self) -> &Ident {
        &self.binding.ident
    }

    /// The parameter as the private implementation function declares it,
    /// without its `#[default]` and doc attributes.
    pub(crate) fn declaration(&self) -> TokenStream {
        let binding = &self.binding;
        let ty = &self.ty;
        quote! { #binding: #ty }
    }

    /// A `ParameterInfo` expression describing the parameter.
    pub(crate) fn schema(&self, pt: &TokenStream) -> TokenStream {
        let name = self.ident().to_string();
        let schema_ty = self.optional.as_ref().unwrap_or(&self.ty);
        let required = self.optional.is_none() && self.default_expr.is_none();
        let description = self
            .description
            .as_ref()
            .map(|description| quote! { info.description = Some(#description.to_string()); });
        let default = self.default_expr.as_ref().map(|expr| {
            quote! { info.default_value = Some(#pt::__private::serde_json::json!(#expr)); }
        });

        quote! {
            {
                let mut info = <#schema_ty as #pt::InputParam>::schema_info(#name);
                info.required = #required;
                #description
                #default
                info
            }
        }
    }

    /// A `let` statement binding the argument from `__call`.
    pub(crate) fn extraction(&self, pt: &TokenStream) -> TokenStream {
        let ident = self.ident();
        let name = ident.to_string();
        let ty = &self.ty;

        match (&self.optional, &self.default_expr) {
            (Some(inner), _) => quote! {
                let #ident: #ty = <#inner as #pt::FunctionParam>::extract_optional(&__call, #name)?;
            },
            (None, Some(default)) => quote! {
                let #ident: #ty = <#ty as #pt::FunctionParam>::extract_optional(&__call, #name)?
                    .unwrap_or(#default);
            },
            (None, None) => quote! {
                let #ident: #ty = <#ty as #pt::FunctionParam>::extract(&__call, #name)?;
            },
        }
    }
}

/// Doc comment text with each line trimmed, or `None` if there is none.
pub(crate) fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(text),
                    ..
                }) => Some(text.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Whether the function returns a `Result`, whose error is propagated.
pub(crate) fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Path(path) => path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Result"),
            _ => false,
        },
        ReturnType::Default => false,
    }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

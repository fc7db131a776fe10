//! Parsing of `#[prompt(...)]` and `#[prompt_chain(...)]` arguments.

use syn::parse::{Parse, ParseStream};
use syn::{Expr, ExprArray, Ident, LitStr, Token};

/// Options given in the attribute.
#[derive(Default)]
pub(crate) struct PromptArgs {
    /// Explicit template, from `template = "..."` or a bare string literal.
    pub template: Option<LitStr>,
    /// Tool constructor expressions from `functions = [..]`.
    pub functions: Vec<Expr>,
    /// Backend expression from `model = ..`.
    pub model: Option<Expr>,
    /// Iteration bound from `max_iterations = ..`, chains only.
    pub max_iterations: Option<(Ident, Expr)>,
}

impl Parse for PromptArgs {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut args = Self::default();

        while !input.is_empty() {
            if input.peek(LitStr) {
                let template: LitStr = input.parse()?;
                set_template(&mut args, template)?;
            } else {
                let key: Ident = input.parse()?;
                input.parse::<Token![=]>()?;

                match key.to_string().as_str() {
                    "template" => {
                        let template: LitStr = input.parse()?;
                        set_template(&mut args, template)?;
                    }
                    "functions" => {
                        if !args.functions.is_empty() {
                            return Err(syn::Error::new_spanned(key, "duplicate `functions`"));
                        }
                        let list: ExprArray = input.parse()?;
                        args.functions = list.elems.into_iter().collect();
                    }
                    "model" => {
                        if args.model.is_some() {
                            return Err(syn::Error::new_spanned(key, "duplicate `model`"));
                        }
                        args.model = Some(input.parse()?);
                    }
                    "max_iterations" => {
                        if args.max_iterations.is_some() {
                            return Err(syn::Error::new_spanned(
                                key,
                                "duplicate `max_iterations`",
                            ));
                        }
                        let value: Expr = input.parse()?;
                        args.max_iterations = Some((key, value));
                    }
                    _ => {
                        return Err(syn::Error::new_spanned(
                            &key,
                            format!(
                                "unknown option `{key}`; expected `template`, `functions`, \
                                 `model` or `max_iterations`"
                            ),
                        ));
                    }
                }
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

fn set_template(args: &mut PromptArgs, template: LitStr) -> syn::Result<()> {
    if args.template.is_some() {
        return Err(syn::Error::new_spanned(template, "duplicate template"));
    }
    args.template = Some(template);
    Ok(())
}

//! Prompt templates.
//!
//! A [`Template`] is parsed once, when the prompt function is declared, into
//! literal text and placeholders. Rendering substitutes each placeholder with
//! the string form of a bound argument.
//!
//! Placeholder syntax:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{name}` | the argument `name` |
//! | `{name.field}` | a field of an object argument |
//! | `{name[0]}` | an element of an array argument (or the key `"0"` of an object) |
//! | `{name[key]}` | the key `"key"` of an object argument |
//! | `{{` / `}}` | literal braces |
//!
//! Strings render without quotes; numbers, booleans and `null` render as
//! JSON; arrays and objects render as compact JSON.

use crate::error::{PlaceholderError, TemplateError};
use crate::signature::BoundArguments;
use serde_json::Value;

/// A parsed prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    text: String,
    root: String,
    path: Vec<Accessor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Accessor {
    Field(String),
    Index(usize),
    Key(String),
}

impl Template {
    /// Parses template text.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for unbalanced braces, empty placeholders,
    /// conversion or format specifiers, and malformed field paths.
    pub fn parse(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let segments = parse_segments(&source)?;
        Ok(Self { source, segments })
    }

    /// Returns the original template text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the argument names referenced by placeholders, in first-use order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(placeholder) = segment
                && !names.contains(&placeholder.root.as_str())
            {
                names.push(&placeholder.root);
            }
        }
        names
    }

    /// Renders the template with bound arguments.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceholderError::Unbound`] if a placeholder names an
    /// argument that is not bound, and [`PlaceholderError::MissingField`] if
    /// a field path does not exist on the bound value.
    pub fn render(&self, args: &BoundArguments) -> Result<String, PlaceholderError> {
        let mut rendered = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(placeholder) => {
                    let value = placeholder.resolve(args)?;
                    push_value(&mut rendered, value);
                }
            }
        }
        Ok(rendered)
    }
}

impl core::fmt::Display for Template {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.source)
    }
}

impl core::str::FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Placeholder {
    fn resolve<'a>(&self, args: &'a BoundArguments) -> Result<&'a Value, PlaceholderError> {
        let mut value = args.get(&self.root).ok_or_else(|| PlaceholderError::Unbound {
            name: self.root.clone(),
        })?;

        for accessor in &self.path {
            let next = match (accessor, value) {
                (Accessor::Field(key) | Accessor::Key(key), Value::Object(map)) => map.get(key),
                (Accessor::Index(index), Value::Array(items)) => items.get(*index),
                (Accessor::Index(index), Value::Object(map)) => map.get(&index.to_string()),
                _ => None,
            };
            value = next.ok_or_else(|| PlaceholderError::MissingField {
                placeholder: self.text.clone(),
            })?;
        }

        Ok(value)
    }
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::String(text) => out.push_str(text),
        other => out.push_str(&other.to_string()),
    }
}

fn parse_segments(source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(TemplateError::UnmatchedClose { position }),
            '{' => {
                let mut text = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(TemplateError::Unclosed { position }),
                        _ => text.push(inner),
                    }
                }
                if !closed {
                    return Err(TemplateError::Unclosed { position });
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(core::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(parse_placeholder(text, position)?));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn parse_placeholder(text: String, position: usize) -> Result<Placeholder, TemplateError> {
    if text.trim().is_empty() {
        return Err(TemplateError::EmptyPlaceholder { position });
    }
    if text.contains(['!', ':']) {
        return Err(TemplateError::UnsupportedSpecifier { placeholder: text });
    }

    let invalid = |text: &str| TemplateError::InvalidPlaceholder {
        placeholder: text.to_string(),
    };

    let root_end = text.find(['.', '[']).unwrap_or(text.len());
    let root = &text[..root_end];
    if !is_name(root) {
        return Err(invalid(&text));
    }

    let mut path = Vec::new();
    let mut rest = &text[root_end..];
    while !rest.is_empty() {
        if let Some(after_dot) = rest.strip_prefix('.') {
            let end = after_dot.find(['.', '[']).unwrap_or(after_dot.len());
            let field = &after_dot[..end];
            if !is_name(field) {
                return Err(invalid(&text));
            }
            path.push(Accessor::Field(field.to_string()));
            rest = &after_dot[end..];
        } else if let Some(after_bracket) = rest.strip_prefix('[') {
            let Some(end) = after_bracket.find(']') else {
                return Err(invalid(&text));
            };
            let key = &after_bracket[..end];
            if key.is_empty() || key.contains('[') {
                return Err(invalid(&text));
            }
            path.push(match key.parse::<usize>() {
                Ok(index) => Accessor::Index(index),
                Err(_) => Accessor::Key(key.to_string()),
            });
            rest = &after_bracket[end + 1..];
        } else {
            return Err(invalid(&text));
        }
    }

    Ok(Placeholder {
        root: root.to_string(),
        text,
        path,
    })
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

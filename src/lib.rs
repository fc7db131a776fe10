//! Prompt functions for Rust.
//!
//! Declare a function whose body is a natural-language template; calling it
//! renders the template, asks a language model, and hands back a typed value.
//!

pub use sextant_model_providers;
pub use sextant_models;
pub use sextant_prompt;
pub use sextant_tools;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use sextant_prompt::prelude::*;
}

//! Built-in prompt templates embedded at compile time.
//!
//! The shipped template set under `crates/llm-code-templates/prompts/` is
//! compiled into the binary via [`include_str!`], so the assistant works
//! with no templates on disk (e.g. after `cargo install`). A `prompts`
//! directory under the user's config dir takes priority over this set.

use crate::loader::parse_template_file;
use crate::{TemplateError, TemplateLibrary};

const CODING_TOML: &str = include_str!("../prompts/coding.toml");

/// The names the built-in set must provide for the CLI to function.
pub(crate) const REQUIRED_BUILTINS: [&str; 3] =
    ["coding/system", "coding/simple", "coding/input"];

/// Build the library of templates compiled into the binary.
///
/// Fails only if the embedded definitions are themselves malformed, which a
/// test guards against.
pub fn builtin_library() -> Result<TemplateLibrary, TemplateError> {
    let library = TemplateLibrary::from_templates(parse_template_file("coding", CODING_TOML));
    for name in REQUIRED_BUILTINS {
        library.lookup(name)?;
    }
    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_library_parses() {
        let library = builtin_library().unwrap();
        assert_eq!(library.len(), REQUIRED_BUILTINS.len());
    }

    #[test]
    fn test_builtin_variables() {
        let library = builtin_library().unwrap();
        assert!(library.lookup("coding/system").unwrap().variables().is_empty());
        assert_eq!(
            library.lookup("coding/simple").unwrap().variables(),
            ["instructions"]
        );
        assert_eq!(
            library.lookup("coding/input").unwrap().variables(),
            ["code", "instructions"]
        );
    }
}

//! Prompt templates and chat messages for llm-code.
//!
//! A [`TemplateLibrary`] holds named, role-tagged prompt templates loaded
//! from TOML files (or the built-in set compiled into the binary). Rendering
//! a [`Template`] substitutes `{name}` placeholders and yields a [`Message`];
//! a [`Message`] wrapping a model reply can locate its first fenced code
//! block as a [`CodeBlock`].

mod builtin;
mod error;
mod library;
mod loader;
mod message;
mod template;

pub use builtin::builtin_library;
pub use error::TemplateError;
pub use library::TemplateLibrary;
pub use loader::load_templates_from_dir;
pub use message::{CodeBlock, Message, Role};
pub use template::Template;

//! llm-code: a command-line coding assistant.
//!
//! One invocation handles one instruction-to-response exchange: render the
//! prompt from templates, call the chat-completion API, log the exchange,
//! and print the code block from the reply.

pub mod error;
pub mod exchange;
pub mod output;
pub mod settings;

pub use error::CliError;
pub use exchange::{gather_inputs, run_exchange, ExchangeOutcome};
pub use settings::Settings;

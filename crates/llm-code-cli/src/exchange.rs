//! The exchange orchestrator: templates in, code block out.

use std::collections::HashMap;

use tracing::{debug, warn};

use llm_code_client::{ChatBackend, ChatMessage, ChatRole, CompletionRequest, Usage};
use llm_code_store::{NewRecord, RecordStore, StoreError};
use llm_code_templates::{CodeBlock, Message, Role, TemplateLibrary};

use crate::{CliError, Settings};

/// Result of one completed exchange.
#[derive(Debug)]
pub struct ExchangeOutcome {
    /// The model's reply, verbatim.
    pub reply: Message,
    /// First fenced code block in the reply, if any.
    pub code: Option<CodeBlock>,
    /// Token usage reported by the API.
    pub usage: Usage,
    /// Set when the exchange completed but could not be recorded. The
    /// answer is still delivered; the caller must inform the user.
    pub logging_error: Option<StoreError>,
}

/// Run one instruction-to-response exchange.
///
/// Selects `coding/input` when file input was supplied and `coding/simple`
/// otherwise, always preceded by `coding/system`. The exchange is recorded
/// after the call completes; a store failure is carried in the outcome
/// rather than masking a successful answer.
pub async fn run_exchange(
    settings: &Settings,
    library: &TemplateLibrary,
    backend: &dyn ChatBackend,
    store: &RecordStore,
    instructions: &str,
    input: &str,
) -> Result<ExchangeOutcome, CliError> {
    let system = library.lookup("coding/system")?.render(&HashMap::new())?;

    let mut vars = HashMap::new();
    vars.insert("instructions".to_string(), instructions.to_string());
    let user = if input.is_empty() {
        library.lookup("coding/simple")?.render(&vars)?
    } else {
        vars.insert("code".to_string(), input.to_string());
        library.lookup("coding/input")?.render(&vars)?
    };

    let request = CompletionRequest {
        model: settings.model.clone(),
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
        messages: vec![to_chat_message(&system), to_chat_message(&user)],
    };

    let response = backend.complete(&request).await?;
    let reply = Message::from_reply(Role::Assistant, response.message.content);

    let logging_error = store
        .append(NewRecord {
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: i64::from(settings.max_tokens),
            system_message: system.content().to_string(),
            user_message: user.content().to_string(),
            assistant_message: reply.content().to_string(),
            input_tokens: i64::from(response.usage.prompt_tokens),
            output_tokens: i64::from(response.usage.completion_tokens),
        })
        .await
        .err();
    if let Some(err) = &logging_error {
        warn!(%err, "failed to record exchange");
    }

    let code = reply.extract_code();
    debug!(found_code = code.is_some(), "exchange complete");

    Ok(ExchangeOutcome {
        reply,
        code,
        usage: response.usage,
        logging_error,
    })
}

/// Expand an input glob and concatenate the matched files' contents.
pub fn gather_inputs(pattern: Option<&str>) -> Result<String, CliError> {
    let Some(pattern) = pattern else {
        return Ok(String::new());
    };
    let paths = glob::glob(pattern)
        .map_err(|err| CliError::Usage(format!("invalid input glob `{pattern}`: {err}")))?;

    let mut contents = Vec::new();
    for path in paths {
        let path = path.map_err(|err| err.into_error())?;
        if path.is_file() {
            contents.push(std::fs::read_to_string(&path)?);
        }
    }
    Ok(contents.join("\n\n"))
}

fn to_chat_message(message: &Message) -> ChatMessage {
    let role = match message.role() {
        Role::System => ChatRole::System,
        Role::User => ChatRole::User,
        Role::Assistant => ChatRole::Assistant,
    };
    ChatMessage::new(role, message.content())
}

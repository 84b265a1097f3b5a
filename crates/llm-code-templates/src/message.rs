//! Chat messages and fenced code-block extraction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TemplateError;

/// Message role in a chat exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse a role from its wire name.
    pub fn parse(s: &str) -> Result<Self, TemplateError> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(TemplateError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged turn in a chat exchange.
///
/// Content is immutable once constructed: a message is either the result of
/// rendering a template or a verbatim wrap of a model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Wrap a raw model reply with no transformation of its content.
    pub fn from_reply(role: Role, raw: impl Into<String>) -> Self {
        Self::new(role, raw)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Find the first well-formed fenced code block in the content.
    ///
    /// A block opens with ``` at the start of a line, optionally followed
    /// immediately by a language tag, and closes with ``` on its own line.
    /// An opening fence with no closer is skipped and the scan continues
    /// from the following line, so a later well-formed block can still win.
    /// Returns `None` when no well-formed block exists; absence is not an
    /// error. Later blocks after the first are ignored.
    pub fn extract_code(&self) -> Option<CodeBlock> {
        let lines: Vec<&str> = self.content.lines().collect();
        let mut i = 0;
        while i < lines.len() {
            let Some(rest) = lines[i].strip_prefix("```") else {
                i += 1;
                continue;
            };
            let language = rest.trim().to_string();
            for (j, candidate) in lines.iter().enumerate().skip(i + 1) {
                if candidate.trim_end() == "```" {
                    return Some(CodeBlock {
                        language,
                        code: lines[i + 1..j].join("\n"),
                    });
                }
            }
            // Unterminated fence: skip the opener and keep scanning.
            i += 1;
        }
        None
    }
}

/// A language-tagged span of code extracted from a fenced region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag from the opening fence; empty when none was given.
    pub language: String,
    /// Text between the fences, with the trailing newline stripped.
    pub code: String,
}

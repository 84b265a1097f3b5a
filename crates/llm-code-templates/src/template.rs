//! Prompt template with `{name}` placeholder substitution.

use std::collections::HashMap;

use crate::{Message, Role, TemplateError};

/// A named, role-tagged prompt fragment.
///
/// Template names use `/`-separated paths (e.g. `"coding/system"`) to group
/// related templates under a category. Placeholders are parsed out of the
/// body at construction time so a malformed body fails the load, not the
/// render. `{{` and `}}` escape to literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    role: Role,
    body: String,
    variables: Vec<String>,
}

impl Template {
    /// Build a template, validating the placeholder syntax of `body`.
    pub fn new(
        name: impl Into<String>,
        role: Role,
        body: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let name = name.into();
        let body = body.into();
        let variables = parse_placeholders(&body).map_err(|message| {
            TemplateError::InvalidTemplate {
                template: name.clone(),
                message,
            }
        })?;
        Ok(Self {
            name,
            role,
            body,
            variables,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Placeholder names the body declares, in first-appearance order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Render the template into a [`Message`] by substituting placeholders.
    ///
    /// Every placeholder declared in the body must be present in `vars`;
    /// extra entries are ignored. Substitution is pure text replacement:
    /// no recursion, no re-scanning of substituted values.
    pub fn render(&self, vars: &HashMap<String, String>) -> Result<Message, TemplateError> {
        let mut content = String::with_capacity(self.body.len());
        let mut chars = self.body.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    content.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    content.push('}');
                }
                '{' => {
                    let mut variable = String::new();
                    for c in chars.by_ref() {
                        if c == '}' {
                            break;
                        }
                        variable.push(c);
                    }
                    // Syntax was validated in `new`; only absence can fail.
                    let value = vars.get(&variable).ok_or_else(|| {
                        TemplateError::MissingVariable {
                            template: self.name.clone(),
                            variable: variable.clone(),
                        }
                    })?;
                    content.push_str(value);
                }
                other => content.push(other),
            }
        }
        Ok(Message::new(self.role, content))
    }
}

/// Collect placeholder names, rejecting malformed brace syntax.
fn parse_placeholders(body: &str) -> Result<Vec<String>, String> {
    let mut variables: Vec<String> = Vec::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err("unclosed `{` placeholder".to_string());
                }
                if name.is_empty()
                    || !name
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(format!("invalid placeholder name `{{{name}}}`"));
                }
                if !variables.contains(&name) {
                    variables.push(name);
                }
            }
            '}' => return Err("unmatched `}` outside a placeholder".to_string()),
            _ => {}
        }
    }
    Ok(variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_variables_parsed_at_construction() {
        let template =
            Template::new("coding/input", Role::User, "Code:\n{code}\n\nDo: {instructions}")
                .unwrap();
        assert_eq!(template.variables(), ["code", "instructions"]);
    }

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let template = Template::new("t", Role::User, "{a} and {b} and {a}").unwrap();
        let message = template.render(&vars(&[("a", "x"), ("b", "y")])).unwrap();
        assert_eq!(message.content(), "x and y and x");
        assert_eq!(message.role(), Role::User);
    }

    #[test]
    fn test_render_with_no_placeholders() {
        let template = Template::new("coding/system", Role::System, "You write code.").unwrap();
        let message = template.render(&HashMap::new()).unwrap();
        assert_eq!(message.content(), "You write code.");
    }

    #[test]
    fn test_missing_variable_fails_with_name() {
        let template = Template::new("t", Role::User, "{instructions}").unwrap();
        let err = template.render(&HashMap::new()).unwrap_err();
        match err {
            TemplateError::MissingVariable { variable, .. } => {
                assert_eq!(variable, "instructions");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_variables_ignored() {
        let template = Template::new("t", Role::User, "{a}").unwrap();
        let message = template
            .render(&vars(&[("a", "x"), ("unused", "y")]))
            .unwrap();
        assert_eq!(message.content(), "x");
    }

    #[test]
    fn test_substitution_is_not_recursive() {
        let template = Template::new("t", Role::User, "{a}").unwrap();
        let message = template.render(&vars(&[("a", "{b}")])).unwrap();
        assert_eq!(message.content(), "{b}");
    }

    #[test]
    fn test_escaped_braces() {
        let template = Template::new("t", Role::User, "literal {{x}} and {a}").unwrap();
        assert_eq!(template.variables(), ["a"]);
        let message = template.render(&vars(&[("a", "v")])).unwrap();
        assert_eq!(message.content(), "literal {x} and v");
    }

    #[test]
    fn test_malformed_bodies_rejected() {
        assert!(Template::new("t", Role::User, "unclosed {a").is_err());
        assert!(Template::new("t", Role::User, "empty {}").is_err());
        assert!(Template::new("t", Role::User, "bad {a b}").is_err());
        assert!(Template::new("t", Role::User, "stray } brace").is_err());
    }
}

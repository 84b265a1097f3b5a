//! TOML template loader.
//!
//! Recursively walks a directory for `.toml` files. Each file defines a
//! category named after its path relative to the root (without extension);
//! each top-level table in the file defines one template with `role` and
//! `body` keys. `coding.toml` with a `[system]` table yields the template
//! `coding/system`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::{Role, Template, TemplateError};

#[derive(Debug, Deserialize)]
struct TemplateDef {
    role: String,
    body: String,
}

/// Load every template defined under `dir`.
///
/// A file that fails to parse, and a definition with a bad role or body, are
/// skipped with a warning rather than aborting the load; one bad file must
/// not take down the library.
pub fn load_templates_from_dir(dir: &Path) -> Result<Vec<Template>, TemplateError> {
    let mut templates = Vec::new();
    load_recursive(dir, dir, &mut templates)?;
    Ok(templates)
}

fn load_recursive(
    base: &Path,
    current: &Path,
    templates: &mut Vec<Template>,
) -> Result<(), TemplateError> {
    for entry in std::fs::read_dir(current)? {
        let path = entry?.path();
        if path.is_dir() {
            load_recursive(base, &path, templates)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("toml") {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            let category = relative
                .with_extension("")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");

            let content = std::fs::read_to_string(&path)?;
            templates.extend(parse_template_file(&category, &content));
        }
    }
    Ok(())
}

/// Parse one template file into its templates, skipping bad definitions.
pub(crate) fn parse_template_file(category: &str, content: &str) -> Vec<Template> {
    // BTreeMap keeps definition order stable across loads.
    let defs: BTreeMap<String, TemplateDef> = match toml::from_str(content) {
        Ok(defs) => defs,
        Err(err) => {
            warn!(category, %err, "skipping malformed template file");
            return Vec::new();
        }
    };

    let mut templates = Vec::new();
    for (id, def) in defs {
        let name = format!("{category}/{id}");
        let template = Role::parse(&def.role)
            .and_then(|role| Template::new(&name, role, def.body));
        match template {
            Ok(template) => templates.push(template),
            Err(err) => warn!(%name, %err, "skipping malformed template definition"),
        }
    }
    templates
}

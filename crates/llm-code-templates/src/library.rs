//! Template library with first-root-wins loading and exact-match lookup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::loader::load_templates_from_dir;
use crate::{Template, TemplateError};

/// An indexed collection of templates loaded from a single root.
///
/// Lookup is exact-match only: a name either resolves to its template or
/// reports [`TemplateError::TemplateNotFound`]. The library owns its
/// templates exclusively and is immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: BTreeMap<String, Template>,
}

impl TemplateLibrary {
    /// Build a library from already-constructed templates.
    ///
    /// A later template with a duplicate name replaces the earlier one, so
    /// names stay unique within the library.
    pub fn from_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let templates = templates
            .into_iter()
            .map(|t| (t.name().to_string(), t))
            .collect();
        Self { templates }
    }

    /// Try candidate roots in priority order and load the first that yields
    /// any templates.
    ///
    /// For each root, the template source is its `prompts` subdirectory when
    /// one exists, otherwise the root itself. Roots are never merged: the
    /// first root with at least one template is used in full. Returns `None`
    /// when no root yields a template.
    pub fn load(roots: &[PathBuf]) -> Option<Self> {
        for root in roots {
            let source = template_source(root);
            if !source.is_dir() {
                debug!(root = %root.display(), "no template source at root");
                continue;
            }
            match load_templates_from_dir(&source) {
                Ok(templates) if !templates.is_empty() => {
                    let library = Self::from_templates(templates);
                    info!(
                        source = %source.display(),
                        count = library.len(),
                        "loaded template library"
                    );
                    return Some(library);
                }
                Ok(_) => debug!(source = %source.display(), "root yielded no templates"),
                Err(err) => debug!(source = %source.display(), %err, "skipping unreadable root"),
            }
        }
        None
    }

    /// Exact-match lookup by hierarchical name.
    pub fn lookup(&self, name: &str) -> Result<&Template, TemplateError> {
        self.templates
            .get(name)
            .ok_or_else(|| TemplateError::TemplateNotFound(name.to_string()))
    }

    /// Registered template names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn template_source(root: &Path) -> PathBuf {
    let prompts = root.join("prompts");
    if prompts.is_dir() {
        prompts
    } else {
        root.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::Role;

    fn write_prompts(dir: &Path, body: &str) {
        let prompts = dir.join("prompts");
        fs::create_dir_all(&prompts).unwrap();
        fs::write(prompts.join("coding.toml"), body).unwrap();
    }

    #[test]
    fn test_lookup_returns_template_with_queried_name() {
        let library = TemplateLibrary::from_templates([
            Template::new("coding/system", Role::System, "sys").unwrap(),
            Template::new("coding/simple", Role::User, "{instructions}").unwrap(),
        ]);
        for name in ["coding/system", "coding/simple"] {
            assert_eq!(library.lookup(name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_lookup_unknown_name_never_returns_default() {
        let library = TemplateLibrary::from_templates([
            Template::new("coding/system", Role::System, "sys").unwrap()
        ]);
        let err = library.lookup("coding/nope").unwrap_err();
        assert!(matches!(err, TemplateError::TemplateNotFound(name) if name == "coding/nope"));
        // Partial matches do not resolve either.
        assert!(library.lookup("coding").is_err());
        assert!(library.lookup("system").is_err());
    }

    #[test]
    fn test_first_root_with_templates_wins() {
        let empty = tempfile::tempdir().unwrap();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_prompts(
            first.path(),
            "[system]\nrole = \"system\"\nbody = \"from first\"\n",
        );
        write_prompts(
            second.path(),
            "[system]\nrole = \"system\"\nbody = \"from second\"\n[extra]\nrole = \"user\"\nbody = \"x\"\n",
        );

        let roots = vec![
            empty.path().to_path_buf(),
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ];
        let library = TemplateLibrary::load(&roots).unwrap();

        // No merging: only the first yielding root is used.
        assert_eq!(library.len(), 1);
        assert_eq!(library.lookup("coding/system").unwrap().body(), "from first");
    }

    #[test]
    fn test_root_that_is_already_a_prompts_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("coding.toml"),
            "[system]\nrole = \"system\"\nbody = \"direct\"\n",
        )
        .unwrap();

        let library = TemplateLibrary::load(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(library.lookup("coding/system").unwrap().body(), "direct");
    }

    #[test]
    fn test_no_root_yields_no_library() {
        let empty = tempfile::tempdir().unwrap();
        let missing = empty.path().join("does-not-exist");
        assert!(TemplateLibrary::load(&[missing, empty.path().to_path_buf()]).is_none());
    }
}

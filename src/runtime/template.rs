//! Window template loading.
//!
//! Templates are addressed by the path convention `"<root>/<group>/<name>"`.
//! A template carries the scene prototype plus the template-level window
//! flags, the way a serialized panel asset would.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::core::options::{TemplateKey, WindowOptions};
use crate::error::WindowError;
use crate::scene::TemplateId;

/// Loadable window template: scene prototype plus template-level flags.
#[derive(Clone, Copy, Debug)]
pub struct WindowTemplate {
    pub template: TemplateId,
    pub options: WindowOptions,
    /// Per-template transition duration; `None` falls back to the manager's
    /// cross-fade default.
    pub show_time: Option<Duration>,
}

impl WindowTemplate {
    pub fn new(template: TemplateId, options: WindowOptions) -> Self {
        Self {
            template,
            options,
            show_time: None,
        }
    }

    pub fn with_show_time(mut self, show_time: Duration) -> Self {
        self.show_time = Some(show_time);
        self
    }
}

/// Template loader collaborator.
pub trait TemplateSource {
    /// Resolve a template by identity; `None` when the template is unknown.
    fn load(&mut self, key: &TemplateKey) -> Option<WindowTemplate>;
}

/// Path-addressed in-memory [`TemplateSource`].
pub struct TemplateRegistry {
    root: String,
    entries: HashMap<String, WindowTemplate>,
}

#[derive(Deserialize)]
struct ManifestEntry {
    #[serde(flatten)]
    options: WindowOptions,
    show_time_ms: Option<u64>,
}

impl TemplateRegistry {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
        }
    }

    /// Template path for a key: `"<root>/<group>/<name>"`.
    pub fn template_path(&self, key: &TemplateKey) -> String {
        format!("{}/{}/{}", self.root, key.group, key.name)
    }

    pub fn register(&mut self, key: &TemplateKey, template: WindowTemplate) {
        self.entries.insert(self.template_path(key), template);
    }

    /// Apply a JSON manifest of per-path option overrides.
    ///
    /// The manifest maps template paths to full flag sets (absent fields take
    /// the defaults) plus an optional `show_time_ms`. Every named path must
    /// already be registered. Returns the number of templates updated.
    pub fn apply_manifest(&mut self, manifest: &str) -> Result<usize, WindowError> {
        let parsed: HashMap<String, ManifestEntry> = serde_json::from_str(manifest)
            .map_err(|source| WindowError::ManifestParse { source })?;

        for path in parsed.keys() {
            if !self.entries.contains_key(path) {
                return Err(WindowError::UnknownTemplatePath { path: path.clone() });
            }
        }

        let updated = parsed.len();
        for (path, entry) in parsed {
            if let Some(template) = self.entries.get_mut(&path) {
                template.options = entry.options;
                if let Some(show_time_ms) = entry.show_time_ms {
                    template.show_time = Some(Duration::from_millis(show_time_ms));
                }
            }
        }
        Ok(updated)
    }
}

impl TemplateSource for TemplateRegistry {
    fn load(&mut self, key: &TemplateKey) -> Option<WindowTemplate> {
        self.entries.get(&self.template_path(key)).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{TemplateRegistry, TemplateSource, WindowTemplate};
    use crate::core::options::{TemplateKey, WindowOptions};
    use crate::error::WindowError;
    use crate::scene::TemplateId;

    fn registry_with_confirm() -> (TemplateRegistry, TemplateKey) {
        let mut registry = TemplateRegistry::new("ui");
        let key = TemplateKey::new("Dialogs", "Confirm");
        registry.register(
            &key,
            WindowTemplate::new(TemplateId::from_raw(0), WindowOptions::default()),
        );
        (registry, key)
    }

    #[test]
    fn path_convention_joins_root_group_and_name() {
        let (mut registry, key) = registry_with_confirm();
        assert_eq!(registry.template_path(&key), "ui/Dialogs/Confirm");
        assert!(registry.load(&key).is_some());
        assert!(registry
            .load(&TemplateKey::new("Dialogs", "Missing"))
            .is_none());
    }

    #[test]
    fn manifest_overrides_options_and_show_time() {
        let (mut registry, key) = registry_with_confirm();
        let updated = registry
            .apply_manifest(
                r#"{
                    "ui/Dialogs/Confirm": {
                        "destroy_on_close": false,
                        "exclusive_visibility": true,
                        "show_time_ms": 120
                    }
                }"#,
            )
            .expect("apply manifest");
        assert_eq!(updated, 1);

        let template = registry.load(&key).expect("template registered");
        assert!(!template.options.destroy_on_close);
        assert!(template.options.exclusive_visibility);
        assert!(template.options.animated_show);
        assert_eq!(template.show_time, Some(Duration::from_millis(120)));
    }

    #[test]
    fn manifest_rejects_unknown_paths() {
        let (mut registry, _) = registry_with_confirm();
        let err = registry
            .apply_manifest(r#"{"ui/Dialogs/Missing": {}}"#)
            .expect_err("unknown path");
        assert!(matches!(err, WindowError::UnknownTemplatePath { .. }));
    }

    #[test]
    fn manifest_rejects_malformed_json() {
        let (mut registry, _) = registry_with_confirm();
        let err = registry.apply_manifest("{not json").expect_err("parse error");
        assert!(matches!(err, WindowError::ManifestParse { .. }));
    }
}

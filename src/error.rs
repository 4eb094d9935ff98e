use thiserror::Error;

/// Reported setup failure from caller-supplied window setup logic.
pub type SetupError = Box<dyn std::error::Error + 'static>;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("malformed unique window id '{id}': expected '<group>_<name>!<number>'")]
    MalformedUniqueId { id: String },

    #[error("failed to parse template options manifest: {source}")]
    ManifestParse {
        #[source]
        source: serde_json::Error,
    },

    #[error("template options manifest names unknown path '{path}'")]
    UnknownTemplatePath { path: String },

    #[error("window setup failed for {unique_id}: {source}")]
    Setup {
        unique_id: String,
        #[source]
        source: SetupError,
    },
}

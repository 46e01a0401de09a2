//! Error taxonomy for the launch pipeline.
//!
//! Every failure here is terminal for the current launch attempt: nothing is
//! retried and the original message is surfaced to the caller intact.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed coordinate or version string. Carries the offending raw text.
    #[error("cannot parse {what}: {raw:?}")]
    Parse { what: &'static str, raw: String },

    /// A required library artifact is absent from the on-disk store.
    #[error("missing library: {0}")]
    MissingLibrary(String),

    /// A `${` placeholder with no closing `}` before end of input.
    #[error("cannot format string: unterminated placeholder in {0:?}")]
    Format(String),

    /// The composed patch chain produced no main class.
    #[error("launch failed: no mainClass in version manifest")]
    MissingMainClass,

    /// The identity provider rejected the credentials. The server's own
    /// message is preserved; the shell treats the account as absent.
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("version manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    // Archive-read failures propagate unchanged, per the resolver contract.
    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn parse(what: &'static str, raw: impl Into<String>) -> Self {
        Self::Parse {
            what,
            raw: raw.into(),
        }
    }
}

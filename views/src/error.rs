use std::path::PathBuf;
use thiserror::Error;

/// A type-erased error produced by a wrapped template engine
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Concrete errors that occur while loading or rendering views
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// the template source could not be listed or a file could not be
    /// read
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// a template file matched the extension but its contents are not
    /// utf-8
    #[error("template file {} is not valid utf-8", .0.display())]
    NotUtf8(PathBuf),

    /// the wrapped engine could not construct a fresh template set
    #[error("template set could not be built: {0}")]
    Build(#[source] BoxError),

    /// the wrapped engine rejected a template source
    #[error("template {name} could not be registered: {source}")]
    Register {
        /// the template name, relative to the root and without extension
        name: String,
        /// the engine error
        #[source]
        source: BoxError,
    },

    /// no template is registered under this name
    #[error("render: template {0} could not be loaded")]
    NotFound(String),

    /// no layout template is registered under this name
    #[error("render: layout {0} could not be loaded")]
    LayoutNotFound(String),

    /// the wrapped engine failed while executing a template
    #[error("render: template {name} failed: {source}")]
    Execute {
        /// the template that was executing
        name: String,
        /// the engine error
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// whether this error describes a missing template or layout
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::LayoutNotFound(_))
    }
}

/// this crate's result type
pub type Result<T, E = Error> = std::result::Result<T, E>;

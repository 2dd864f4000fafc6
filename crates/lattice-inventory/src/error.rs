//! Error types for the menu toolkit.

use lattice_inventory_core::GridError;

use crate::host::ViewerId;
use crate::page::InventoryKind;

/// Result type alias for toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or opening screens.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A grid primitive was misused.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// No opener is registered for the requested host inventory kind.
    #[error("No inventory opener registered for inventory kind {kind:?}")]
    NoOpener { kind: InventoryKind },

    /// A page configuration failed validation.
    #[error("Invalid page configuration: {0}")]
    InvalidConfig(String),

    /// The viewer has no open screen.
    #[error("Viewer {viewer} has no open screen")]
    NotOpen { viewer: ViewerId },

    /// A page's open predicate refused the viewer.
    #[error("Page '{page}' refused to open for viewer {viewer}")]
    OpenDenied { page: String, viewer: ViewerId },

    /// A page declaration could not be parsed.
    #[error("Failed to parse page configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The background tick worker could not be started.
    #[error("Failed to start tick worker: {0}")]
    Worker(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

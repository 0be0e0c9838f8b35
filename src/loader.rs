//! Asset loader boundary.
//!
//! Loading is the one async seam of the viewer: the controller awaits the
//! loader and only touches the scene once a complete node is in hand, so a
//! failed load can never leave a half-built puppet behind.

use async_trait::async_trait;

use crate::scene::PuppetNode;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },
    #[error("invalid model definition in {source_name}: {error}")]
    Parse {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },
    #[error("model {source_name} rejected: {reason}")]
    Invalid { source_name: String, reason: String },
}

/// Produces renderer nodes from a model source (URL or path).
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Fetch and build the node for `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the source cannot be read or parsed.
    async fn load(&self, source: &str) -> Result<Box<dyn PuppetNode>, LoadError>;
}

//! Error types for the `geoview-map` crate.
//!
//! Lifecycle code treats most of these as recoverable: teardown applies a
//! best-effort remove-if-present policy and never propagates a missing
//! resource, because the order of map disposal and component disposal is
//! not guaranteed.

/// Errors that can occur while mutating map resources.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A layer-mutating call was made before the style finished loading.
    #[error("map style is not loaded yet")]
    StyleNotLoaded,

    /// A source with this id already exists.
    #[error("duplicate source id: {0}")]
    DuplicateSource(String),

    /// A layer with this id already exists.
    #[error("duplicate layer id: {0}")]
    DuplicateLayer(String),

    /// The referenced source does not exist.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// The referenced layer does not exist.
    #[error("layer not found: {0}")]
    LayerNotFound(String),

    /// A source still has layers attached and cannot be removed.
    #[error("source {source_id} still referenced by layer {layer}")]
    SourceInUse {
        /// The source being removed.
        source_id: String,
        /// A layer still referencing it.
        layer: String,
    },

    /// The map backend rejected the operation.
    #[error("map backend error: {0}")]
    Backend(String),
}

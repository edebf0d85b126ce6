//! Upstream feed handling for the GeoView map-sync engine.
//!
//! The upstream feed is a periodically fetched GeoJSON feature collection
//! (the USGS earthquake summary feed by default). This crate owns the
//! three steps between the wire and the engine:
//!
//! - [`raw`] -- serde model of the feed response, permissive enough that
//!   one malformed record cannot fail the whole decode
//! - [`normalize`] -- raw feature to canonical [`geoview_types::Event`],
//!   dropping records without usable coordinates
//! - [`poller`] -- the timer-driven refresh scheduler publishing batches
//!   over a last-write-wins watch channel

pub mod error;
pub mod normalize;
pub mod poller;
pub mod raw;

pub use error::FeedError;
pub use normalize::{normalize_feature, normalize_response};
pub use poller::{FeedPoller, FeedStatus, FeedUpdate};
pub use raw::{FeedMetadata, FeedResponse, RawFeature, RawGeometry, RawProperties};

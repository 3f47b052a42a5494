//! Zoom-aware hierarchical point clustering for map rendering.
//!
//! Builds an immutable spatial index over geo-tagged point features and
//! answers viewport queries with a mix of individual points and synthetic
//! clusters, at a resolution that follows the map zoom level.
//!
//! ```rust
//! use geoclust::{BoundingBox, ClusterIndex, PointFeature};
//!
//! let index = ClusterIndex::with_defaults(vec![
//!     PointFeature::new("venue:1", -75.5636, 6.2518),
//!     PointFeature::new("venue:2", -75.5637, 6.2519),
//! ])?;
//!
//! let items = index.query_within_bbox(&BoundingBox::world(), 10.0)?;
//! assert_eq!(items.len(), 1);
//! assert_eq!(items[0].point_count(), 2);
//! # Ok::<(), geoclust::ClusterError>(())
//! ```
//!
//! The index is immutable after construction and `Send + Sync`: build it on
//! a background task if the point set is large, then hand it to the thread
//! driving the viewport. When the point set changes, build a fresh index
//! and swap the reference; queries in flight against the old index keep
//! working.

pub mod builder;
pub mod cluster;
pub mod config;
pub mod error;
pub mod projection;
pub mod types;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use builder::ClusterIndexBuilder;
pub use cluster::{ClusterIndex, RejectedPoint};
pub use config::{ClusterConfig, RejectPolicy};
pub use error::{ClusterError, Result};
pub use types::{BoundingBox, ClusterNode, PointFeature, ResultItem, abbreviate_count};

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterError, ClusterIndex, ClusterIndexBuilder, Result};

    pub use crate::{BoundingBox, ClusterNode, PointFeature, ResultItem};

    pub use crate::{ClusterConfig, RejectPolicy};

    pub use geo::Point;
}

//! Index builder for flexible configuration
//!
//! This module provides a builder pattern for assembling a cluster index
//! without constructing a [`ClusterConfig`] by hand.

use crate::cluster::ClusterIndex;
use crate::config::{ClusterConfig, RejectPolicy};
use crate::error::Result;
use crate::types::PointFeature;

/// Builder for a [`ClusterIndex`] with fluent configuration.
///
/// # Example
///
/// ```rust
/// use geoclust::{ClusterIndexBuilder, PointFeature};
///
/// let index = ClusterIndexBuilder::new()
///     .radius(40.0)
///     .max_zoom(14)
///     .min_points(3)
///     .build(vec![PointFeature::new("p", 0.0, 0.0)])?;
/// assert_eq!(index.config().max_zoom, 14);
/// # Ok::<(), geoclust::ClusterError>(())
/// ```
#[derive(Debug, Default)]
pub struct ClusterIndexBuilder {
    config: ClusterConfig,
}

impl ClusterIndexBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClusterConfig) -> Self {
        self.config = config;
        self
    }

    /// Clustering radius in pixels at the reference tile extent.
    pub fn radius(mut self, radius: f64) -> Self {
        self.config.radius = radius;
        self
    }

    /// Highest zoom level at which clustering is applied.
    pub fn max_zoom(mut self, max_zoom: u8) -> Self {
        self.config.max_zoom = max_zoom;
        self
    }

    /// Minimum leaf count required to form a cluster.
    pub fn min_points(mut self, min_points: usize) -> Self {
        self.config.min_points = min_points;
        self
    }

    /// Pixel extent of a reference map tile.
    pub fn tile_extent(mut self, tile_extent: f64) -> Self {
        self.config.tile_extent = tile_extent;
        self
    }

    /// Fractional buffer applied to range-query bounding boxes.
    pub fn query_margin(mut self, query_margin: f64) -> Self {
        self.config.query_margin = query_margin;
        self
    }

    /// Policy for malformed input points.
    pub fn reject_policy(mut self, policy: RejectPolicy) -> Self {
        self.config.reject_policy = policy;
        self
    }

    /// Build the index. Validates the configuration and ingests the points.
    pub fn build(self, points: Vec<PointFeature>) -> Result<ClusterIndex> {
        ClusterIndex::build(points, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let builder = ClusterIndexBuilder::new();
        assert_eq!(builder.config, ClusterConfig::default());
    }

    #[test]
    fn test_builder_setters() {
        let index = ClusterIndexBuilder::new()
            .radius(80.0)
            .max_zoom(12)
            .min_points(4)
            .tile_extent(512.0)
            .query_margin(0.2)
            .reject_policy(RejectPolicy::Abort)
            .build(Vec::new())
            .unwrap();

        let config = index.config();
        assert_eq!(config.radius, 80.0);
        assert_eq!(config.max_zoom, 12);
        assert_eq!(config.min_points, 4);
        assert_eq!(config.tile_extent, 512.0);
        assert_eq!(config.query_margin, 0.2);
        assert_eq!(config.reject_policy, RejectPolicy::Abort);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        assert!(
            ClusterIndexBuilder::new()
                .radius(-1.0)
                .build(Vec::new())
                .is_err()
        );
    }
}

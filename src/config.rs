//! Build-time configuration for the cluster index.
//!
//! The configuration is fixed per build: radius, zoom ceiling and merge
//! thresholds shape the precomputed layer ladder, so changing any of them
//! requires building a new index.

use crate::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};

/// Policy for input points with malformed coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RejectPolicy {
    /// Drop the offending point, keep building, report the rejects on the
    /// built index (recommended default).
    #[default]
    DropAndCount,
    /// Abort the whole build on the first malformed point.
    Abort,
}

/// Configuration for [`ClusterIndex::build`](crate::ClusterIndex::build).
///
/// Easily serializable and loadable from JSON (or TOML with the `toml`
/// feature) while keeping complexity minimal.
///
/// # Example
///
/// ```rust
/// use geoclust::ClusterConfig;
///
/// let config = ClusterConfig::default();
/// assert_eq!(config.radius, 60.0);
///
/// let json = r#"{ "radius": 40.0, "max_zoom": 14 }"#;
/// let config = ClusterConfig::from_json(json).unwrap();
/// assert_eq!(config.max_zoom, 14);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Clustering radius in pixels at the reference tile extent.
    #[serde(default = "ClusterConfig::default_radius")]
    pub radius: f64,

    /// Highest zoom level at which clustering is still applied. Queries
    /// above it return individual points only.
    #[serde(default = "ClusterConfig::default_max_zoom")]
    pub max_zoom: u8,

    /// Minimum number of leaf points required to form a cluster.
    #[serde(default = "ClusterConfig::default_min_points")]
    pub min_points: usize,

    /// Pixel extent of a reference map tile; scales `radius` into projected
    /// world units per zoom level.
    #[serde(default = "ClusterConfig::default_tile_extent")]
    pub tile_extent: f64,

    /// Fractional buffer applied to every range-query bounding box so edge
    /// markers do not pop in and out during pans.
    #[serde(default = "ClusterConfig::default_query_margin")]
    pub query_margin: f64,

    /// What to do with malformed input points.
    #[serde(default)]
    pub reject_policy: RejectPolicy,
}

impl ClusterConfig {
    const fn default_radius() -> f64 {
        60.0
    }

    const fn default_max_zoom() -> u8 {
        16
    }

    const fn default_min_points() -> usize {
        2
    }

    const fn default_tile_extent() -> f64 {
        256.0
    }

    const fn default_query_margin() -> f64 {
        0.1
    }

    /// Hard ceiling on `max_zoom`; beyond this the per-zoom radius
    /// underflows the resolution of projected world coordinates.
    pub const MAX_ZOOM_CEILING: u8 = 24;

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn with_tile_extent(mut self, tile_extent: f64) -> Self {
        self.tile_extent = tile_extent;
        self
    }

    pub fn with_query_margin(mut self, query_margin: f64) -> Self {
        self.query_margin = query_margin;
        self
    }

    pub fn with_reject_policy(mut self, policy: RejectPolicy) -> Self {
        self.reject_policy = policy;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "radius must be finite and positive, got: {}",
                self.radius
            )));
        }

        if self.max_zoom > Self::MAX_ZOOM_CEILING {
            return Err(ClusterError::InvalidConfig(format!(
                "max_zoom must be at most {}, got: {}",
                Self::MAX_ZOOM_CEILING,
                self.max_zoom
            )));
        }

        if self.min_points < 2 {
            return Err(ClusterError::InvalidConfig(format!(
                "min_points must be at least 2, got: {}",
                self.min_points
            )));
        }

        if !self.tile_extent.is_finite() || self.tile_extent <= 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "tile_extent must be finite and positive, got: {}",
                self.tile_extent
            )));
        }

        if !self.query_margin.is_finite() || self.query_margin < 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "query_margin must be finite and non-negative, got: {}",
                self.query_margin
            )));
        }

        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ClusterConfig = serde_json::from_str(json)
            .map_err(|e| ClusterError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ClusterError::InvalidConfig(e.to_string()))
    }

    /// Load configuration from a TOML string (requires the `toml` feature).
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: ClusterConfig =
            toml::from_str(toml_str).map_err(|e| ClusterError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as a TOML string (requires the `toml` feature).
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ClusterError::InvalidConfig(e.to_string()))
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius: Self::default_radius(),
            max_zoom: Self::default_max_zoom(),
            min_points: Self::default_min_points(),
            tile_extent: Self::default_tile_extent(),
            query_margin: Self::default_query_margin(),
            reject_policy: RejectPolicy::default(),
        }
    }
}

//! Public data types: input point features, synthetic cluster nodes and the
//! query result union, plus the geographic bounding box used for range
//! queries.

use geo::Point;
use serde::{Deserialize, Serialize};

/// An immutable geo-tagged input record eligible for clustering.
///
/// The `category` tag is passed through unchanged on singleton results; the
/// engine never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointFeature {
    /// Opaque unique identifier of the underlying entity.
    pub id: String,
    /// Location in WGS84 degrees (longitude, latitude).
    pub point: Point,
    /// Optional classification tag, used by callers for styling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl PointFeature {
    /// Create a feature without a category tag.
    pub fn new(id: impl Into<String>, lng: f64, lat: f64) -> Self {
        Self {
            id: id.into(),
            point: Point::new(lng, lat),
            category: None,
        }
    }

    /// Attach a category tag.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A synthetic aggregate of nearby points, rendered as a single marker with
/// a count badge.
///
/// The `id` is an arena handle minted by the index: stable across repeated
/// queries against the same built index, meaningless across rebuilds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterNode {
    /// Handle for expansion lookups against the same index.
    pub id: usize,
    /// Leaf-count-weighted centroid of all subsumed points.
    pub point: Point,
    /// Exact count of leaf points subsumed, including transitively.
    pub point_count: usize,
    /// Display-only rounded representation of `point_count` ("1.2k").
    pub point_count_abbreviated: String,
}

/// The union returned by range and expansion queries: either an input point
/// (untouched) or a synthetic cluster node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultItem {
    Point(PointFeature),
    Cluster(ClusterNode),
}

impl ResultItem {
    /// Location of this item in WGS84 degrees.
    pub fn point(&self) -> Point {
        match self {
            ResultItem::Point(p) => p.point,
            ResultItem::Cluster(c) => c.point,
        }
    }

    /// Number of leaf points this item stands for (1 for a singleton).
    pub fn point_count(&self) -> usize {
        match self {
            ResultItem::Point(_) => 1,
            ResultItem::Cluster(c) => c.point_count,
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, ResultItem::Cluster(_))
    }

    /// The cluster handle, if this item is a cluster.
    pub fn cluster_id(&self) -> Option<usize> {
        match self {
            ResultItem::Point(_) => None,
            ResultItem::Cluster(c) => Some(c.id),
        }
    }
}

/// Round a point count into a short badge label.
///
/// Counts below 1000 print as-is, counts up to 10k keep one decimal
/// ("1.2k"), larger counts round to whole thousands ("12k").
pub fn abbreviate_count(count: usize) -> String {
    if count >= 10_000 {
        format!("{}k", (count as f64 / 1000.0).round())
    } else if count >= 1_000 {
        format!("{}k", (count as f64 / 100.0).round() / 10.0)
    } else {
        count.to_string()
    }
}

/// A rectangular geographic region in west/south/east/north degrees.
///
/// `west > east` signals a wraparound query spanning the antimeridian; such
/// a box is handled by splitting into two plain boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// A box covering the whole world.
    pub fn world() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Whether all members are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.west.is_finite()
            && self.south.is_finite()
            && self.east.is_finite()
            && self.north.is_finite()
    }

    /// Whether this box wraps across the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Longitudinal span in degrees, accounting for wraparound.
    pub fn width(&self) -> f64 {
        if self.crosses_antimeridian() {
            (180.0 - self.west) + (self.east + 180.0)
        } else {
            self.east - self.west
        }
    }

    /// Latitudinal span in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Split a wraparound box into two plain boxes at the antimeridian.
    /// A non-wrapping box is returned unchanged.
    pub fn split_antimeridian(&self) -> (Self, Option<Self>) {
        if self.crosses_antimeridian() {
            (
                Self::new(self.west, self.south, 180.0, self.north),
                Some(Self::new(-180.0, self.south, self.east, self.north)),
            )
        } else {
            (*self, None)
        }
    }

    /// Grow the box by a fraction of its own span on every side, clamping
    /// latitude to the valid range. Longitude is left unclamped here; the
    /// caller handles wraparound.
    pub fn expand_fraction(&self, fraction: f64) -> Self {
        let dx = self.width() * fraction;
        let dy = self.height() * fraction;
        Self {
            west: self.west - dx,
            south: (self.south - dy).max(-90.0),
            east: self.east + dx,
            north: (self.north + dy).min(90.0),
        }
    }
}

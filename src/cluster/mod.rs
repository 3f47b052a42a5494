//! The zoom-aware cluster index: construction, range queries and expansion.
//!
//! An index is built once from a finite point set and is immutable
//! afterwards. Construction precomputes one aggregation layer per zoom
//! level from `max_zoom` down to 0, with the raw leaf layer one level above
//! `max_zoom`; queries pick a layer and run a 2D range search over its
//! R-tree. Because nothing mutates after construction the index is
//! `Send + Sync` and queries never block; dataset changes are handled by
//! building a fresh index and swapping the reference, which leaves in-flight
//! queries against the old index unaffected.

mod expand;
mod layer;
mod query;

#[cfg(test)]
mod tests;

use crate::config::{ClusterConfig, RejectPolicy};
use crate::error::{ClusterError, Result};
use crate::projection::{lat_to_y, lng_to_x, x_to_lng, y_to_lat};
use crate::types::{ClusterNode, PointFeature, ResultItem, abbreviate_count};

use geo::Point;
use layer::{EntryRef, Layer, NodeData, PlacedEntry, aggregate};

/// An input point dropped during construction, with its reason.
#[derive(Debug, Clone)]
pub struct RejectedPoint {
    /// Position in the input array.
    pub position: usize,
    /// The offending feature's id.
    pub id: String,
    /// Human-readable rejection reason.
    pub reason: String,
}

/// An immutable hierarchical cluster index over a set of point features.
///
/// # Example
///
/// ```rust
/// use geoclust::{BoundingBox, ClusterIndex, PointFeature};
///
/// let points = vec![
///     PointFeature::new("venue:1", -75.5636, 6.2518),
///     PointFeature::new("venue:2", -75.5637, 6.2519),
///     PointFeature::new("venue:3", 139.6917, 35.6895),
/// ];
/// let index = ClusterIndex::with_defaults(points)?;
///
/// let items = index.query_within_bbox(&BoundingBox::world(), 10.0)?;
/// let total: usize = items.iter().map(|i| i.point_count()).sum();
/// assert_eq!(total, 3);
/// # Ok::<(), geoclust::ClusterError>(())
/// ```
#[derive(Debug)]
pub struct ClusterIndex {
    config: ClusterConfig,
    /// Accepted input points, in input order.
    points: Vec<PointFeature>,
    /// Layer `z` for zooms `0..=max_zoom`, leaf layer at `max_zoom + 1`.
    layers: Vec<Layer>,
    /// Cluster arena; a node's position is its public id.
    nodes: Vec<NodeData>,
    rejects: Vec<RejectedPoint>,
}

impl ClusterIndex {
    /// Build an index with the default configuration.
    pub fn with_defaults(points: Vec<PointFeature>) -> Result<Self> {
        Self::build(points, ClusterConfig::default())
    }

    /// Build an index from a point set.
    ///
    /// Construction is the expensive step: an amortized near-linear spatial
    /// sort plus one greedy aggregation pass per zoom level. Malformed
    /// points are handled per [`ClusterConfig::reject_policy`]; with the
    /// default `DropAndCount` they are dropped and reported via
    /// [`rejects`](Self::rejects).
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration fails validation;
    /// `InvalidPoint` under [`RejectPolicy::Abort`] on the first malformed
    /// coordinate.
    pub fn build(points: Vec<PointFeature>, config: ClusterConfig) -> Result<Self> {
        config.validate()?;

        let mut accepted = Vec::with_capacity(points.len());
        let mut rejects = Vec::new();

        for (position, feature) in points.into_iter().enumerate() {
            match validate_feature(&feature) {
                Ok(()) => accepted.push(feature),
                Err(reason) => match config.reject_policy {
                    RejectPolicy::Abort => {
                        return Err(ClusterError::InvalidPoint(format!(
                            "'{}' at input {}: {}",
                            feature.id, position, reason
                        )));
                    }
                    RejectPolicy::DropAndCount => {
                        log::warn!(
                            "dropping point '{}' at input {}: {}",
                            feature.id,
                            position,
                            reason
                        );
                        rejects.push(RejectedPoint {
                            position,
                            id: feature.id.clone(),
                            reason,
                        });
                    }
                },
            }
        }

        // Leaf layer: projected points in deterministic spatial order
        // (x, then y, then input position on exact duplicates).
        let mut leaf_entries: Vec<PlacedEntry> = accepted
            .iter()
            .enumerate()
            .map(|(idx, feature)| PlacedEntry {
                x: lng_to_x(feature.point.x()),
                y: lat_to_y(feature.point.y()),
                count: 1,
                entry: EntryRef::Point(idx as u32),
            })
            .collect();
        leaf_entries.sort_by(|a, b| {
            a.x.total_cmp(&b.x)
                .then(a.y.total_cmp(&b.y))
                .then_with(|| entry_point_index(a).cmp(&entry_point_index(b)))
        });

        // Ladder of layers, finest to coarsest, then flipped so that
        // `layers[z]` serves zoom z.
        let mut nodes = Vec::new();
        let mut ladder = Vec::with_capacity(config.max_zoom as usize + 2);
        ladder.push(Layer::from_entries(leaf_entries));
        for zoom in (0..=config.max_zoom).rev() {
            let coarser = aggregate(
                ladder.last().expect("ladder is never empty"),
                zoom,
                config.radius,
                config.tile_extent,
                config.min_points,
                &mut nodes,
            );
            ladder.push(coarser);
        }
        ladder.reverse();

        log::debug!(
            "built cluster index: {} points, {} rejected, {} clusters, {} layers",
            accepted.len(),
            rejects.len(),
            nodes.len(),
            ladder.len()
        );

        Ok(Self {
            config,
            points: accepted,
            layers: ladder,
            nodes,
            rejects,
        })
    }

    /// The configuration this index was built with.
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Number of accepted input points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points dropped during construction under `DropAndCount`.
    pub fn rejects(&self) -> &[RejectedPoint] {
        &self.rejects
    }

    pub fn rejected_count(&self) -> usize {
        self.rejects.len()
    }

    /// Total clusters minted across all zoom levels.
    pub fn cluster_count(&self) -> usize {
        self.nodes.len()
    }

    /// The layer serving a (possibly fractional) zoom: floored, clamped to
    /// `[0, max_zoom]`, with anything above `max_zoom` degrading to the
    /// unclustered leaf layer.
    pub(crate) fn layer_for_zoom(&self, zoom: f64) -> &Layer {
        let leaf = self.layers.len() - 1;
        let z = if zoom < 0.0 {
            0
        } else {
            (zoom.floor() as usize).min(leaf)
        };
        &self.layers[z]
    }

    pub(crate) fn item_for(&self, placed: &PlacedEntry) -> ResultItem {
        self.item_for_entry(placed.entry)
    }

    pub(crate) fn item_for_entry(&self, entry: EntryRef) -> ResultItem {
        match entry {
            EntryRef::Point(idx) => ResultItem::Point(self.points[idx as usize].clone()),
            EntryRef::Cluster(id) => ResultItem::Cluster(self.cluster_node(id as usize)),
        }
    }

    pub(crate) fn cluster_node(&self, id: usize) -> ClusterNode {
        let node = &self.nodes[id];
        ClusterNode {
            id,
            point: Point::new(x_to_lng(node.x), y_to_lat(node.y)),
            point_count: node.count as usize,
            point_count_abbreviated: abbreviate_count(node.count as usize),
        }
    }

    pub(crate) fn node(&self, id: usize) -> Result<&NodeData> {
        self.nodes.get(id).ok_or(ClusterError::UnknownCluster(id))
    }
}

fn entry_point_index(entry: &PlacedEntry) -> u32 {
    match entry.entry {
        EntryRef::Point(idx) => idx,
        EntryRef::Cluster(id) => id,
    }
}

/// Validate a feature's coordinates: finite, longitude in [-180, 180],
/// latitude in [-90, 90]. Returns the rejection reason on failure.
fn validate_feature(feature: &PointFeature) -> std::result::Result<(), String> {
    let (x, y) = (feature.point.x(), feature.point.y());

    if !x.is_finite() {
        return Err(format!("longitude must be finite, got: {}", x));
    }

    if !y.is_finite() {
        return Err(format!("latitude must be finite, got: {}", y));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(format!("longitude out of range [-180.0, 180.0]: {}", x));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(format!("latitude out of range [-90.0, 90.0]: {}", y));
    }

    Ok(())
}

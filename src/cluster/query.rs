//! Range queries: bounding box + zoom against the precomputed layers.

use super::ClusterIndex;
use super::layer::{EntryRef, Layer, TreeEntry};
use crate::error::{ClusterError, Result};
use crate::projection::{lat_to_y, lng_to_x};
use crate::types::{BoundingBox, ResultItem};

use rstar::AABB;
use rustc_hash::FxHashSet;

impl ClusterIndex {
    /// Return all clusters and points visible in `bbox` at `zoom`.
    ///
    /// The zoom is floored and clamped to `[0, max_zoom]`; anything above
    /// `max_zoom` selects the unclustered leaf layer. A bbox with
    /// `west > east` wraps across the antimeridian and is answered by two
    /// merged sub-queries. The configured query margin is applied before
    /// the search so edge markers do not pop during pans.
    ///
    /// The returned array is flat and unordered; callers must not rely on
    /// ordering. Identical arguments against the same index return the same
    /// set of items with the same ids.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` for a non-finite zoom, a bbox with non-finite
    /// members, or latitudes that remain inverted after clamping.
    ///
    /// # Example
    ///
    /// ```rust
    /// use geoclust::{BoundingBox, ClusterIndex, PointFeature};
    ///
    /// let index = ClusterIndex::with_defaults(vec![
    ///     PointFeature::new("a", -75.56, 6.25),
    ///     PointFeature::new("b", -75.57, 6.26),
    /// ])?;
    ///
    /// let medellin = BoundingBox::new(-76.0, 6.0, -75.0, 7.0);
    /// let items = index.query_within_bbox(&medellin, 8.0)?;
    /// assert!(!items.is_empty());
    /// # Ok::<(), geoclust::ClusterError>(())
    /// ```
    pub fn query_within_bbox(&self, bbox: &BoundingBox, zoom: f64) -> Result<Vec<ResultItem>> {
        if !zoom.is_finite() {
            log::warn!("rejecting query with non-finite zoom");
            return Err(ClusterError::InvalidQuery(format!(
                "zoom must be finite, got: {}",
                zoom
            )));
        }

        if !bbox.is_finite() {
            log::warn!("rejecting query with non-finite bounding box");
            return Err(ClusterError::InvalidQuery(
                "bounding box members must be finite".into(),
            ));
        }

        let south = bbox.south.clamp(-90.0, 90.0);
        let north = bbox.north.clamp(-90.0, 90.0);
        if south > north {
            return Err(ClusterError::InvalidQuery(format!(
                "inverted latitudes: south {} > north {}",
                south, north
            )));
        }

        let layer = self.layer_for_zoom(zoom);
        if layer.entries.is_empty() {
            return Ok(Vec::new());
        }

        let margin = self.config.query_margin;
        let clamped = BoundingBox::new(bbox.west, south, bbox.east, north);
        let expanded = clamped.expand_fraction(margin);

        let mut seen: FxHashSet<EntryRef> = FxHashSet::default();
        let mut out = Vec::new();

        // Margin-expanded longitudinal coverage, computed from the original
        // width: a wide crossing box can stop reading as crossing once both
        // ends move, which would make the expanded width unreliable.
        if clamped.width() * (1.0 + 2.0 * margin) >= 360.0 {
            // Longitudinally global; the latitude band still applies.
            self.search_layer(
                layer,
                -180.0,
                expanded.south,
                180.0,
                expanded.north,
                &mut seen,
                &mut out,
            );
            return Ok(out);
        }

        // The margin may have pushed a longitude out of range; wrapping it
        // back can turn a plain box into a crossing one.
        let normalized = BoundingBox::new(
            wrap_lng(expanded.west),
            expanded.south,
            wrap_lng(expanded.east),
            expanded.north,
        );

        // A crossing box becomes two sub-queries whose results are merged,
        // de-duplicating entries the margin made overlap.
        let (first, second) = normalized.split_antimeridian();
        self.search_layer(
            layer,
            first.west,
            first.south,
            first.east,
            first.north,
            &mut seen,
            &mut out,
        );
        if let Some(rest) = second {
            self.search_layer(
                layer,
                rest.west,
                rest.south,
                rest.east,
                rest.north,
                &mut seen,
                &mut out,
            );
        }

        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn search_layer(
        &self,
        layer: &Layer,
        west: f64,
        south: f64,
        east: f64,
        north: f64,
        seen: &mut FxHashSet<EntryRef>,
        out: &mut Vec<ResultItem>,
    ) {
        // World y grows southward, so the top edge comes from `north`.
        let envelope = AABB::from_corners(
            TreeEntry {
                x: lng_to_x(west),
                y: lat_to_y(north),
                slot: u32::MAX,
            },
            TreeEntry {
                x: lng_to_x(east),
                y: lat_to_y(south),
                slot: u32::MAX,
            },
        );

        for hit in layer.tree.locate_in_envelope(&envelope) {
            let placed = &layer.entries[hit.slot as usize];
            if seen.insert(placed.entry) {
                out.push(self.item_for(placed));
            }
        }
    }
}

/// Wrap a longitude into [-180, 180], leaving in-range values untouched so
/// the ±180 edges stay where the caller put them.
fn wrap_lng(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

//! Expansion lookups: cluster children and paginated leaf listings.

use super::ClusterIndex;
use super::layer::EntryRef;
use crate::error::Result;
use crate::types::{PointFeature, ResultItem};

impl ClusterIndex {
    /// Return the immediate next-finer constituents of a cluster: one
    /// clustering layer down, a mix of points and smaller clusters.
    ///
    /// Pure lookup into the precomputed tree; no side effects.
    ///
    /// # Errors
    ///
    /// `UnknownCluster` if the id was not minted by this index, e.g. a
    /// stale handle kept across a rebuild. Callers should refresh their
    /// data and retry.
    pub fn children(&self, cluster_id: usize) -> Result<Vec<ResultItem>> {
        let node = self.node(cluster_id)?;
        Ok(node
            .children
            .iter()
            .map(|&child| self.item_for_entry(child))
            .collect())
    }

    /// Return the full set of points underneath a cluster, paginated.
    ///
    /// Leaves come back in the deterministic order fixed at construction,
    /// so `offset`/`limit` windows are stable across calls.
    ///
    /// # Errors
    ///
    /// `UnknownCluster` if the id was not minted by this index.
    pub fn leaves(
        &self,
        cluster_id: usize,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PointFeature>> {
        let node = self.node(cluster_id)?;

        let mut out = Vec::with_capacity(limit.min(node.count as usize));
        let mut skipped = 0usize;
        let mut stack: Vec<EntryRef> = node.children.iter().rev().copied().collect();

        while let Some(entry) = stack.pop() {
            if out.len() >= limit {
                break;
            }
            match entry {
                EntryRef::Point(idx) => {
                    if skipped < offset {
                        skipped += 1;
                    } else {
                        out.push(self.points[idx as usize].clone());
                    }
                }
                EntryRef::Cluster(id) => {
                    let child = &self.nodes[id as usize];
                    // Whole subtree falls before the window: skip it without
                    // descending.
                    if skipped + (child.count as usize) <= offset {
                        skipped += child.count as usize;
                    } else {
                        stack.extend(child.children.iter().rev().copied());
                    }
                }
            }
        }

        Ok(out)
    }
}

//! Zoom layers and the greedy radius aggregation that builds them.
//!
//! Every zoom level holds a flat vector of positioned entries plus an
//! R-tree over their world coordinates. Entries reference either an input
//! point or a node in the cluster arena; the arena owns centroid, count and
//! the child list recorded when the cluster formed.

use rstar::{Point as RstarPoint, RTree};
use smallvec::SmallVec;

/// Reference to an input point or an arena cluster node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EntryRef {
    /// Index into the accepted input points.
    Point(u32),
    /// Index into the cluster arena.
    Cluster(u32),
}

/// One positioned entry of a zoom layer, in world coordinates.
#[derive(Debug, Clone)]
pub(crate) struct PlacedEntry {
    pub x: f64,
    pub y: f64,
    /// Number of leaf points this entry stands for.
    pub count: u32,
    pub entry: EntryRef,
}

/// A cluster node in the arena. The arena position is the node's public id.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    /// Weighted centroid, world coordinates.
    pub x: f64,
    pub y: f64,
    /// Total leaf points subsumed, including transitively.
    pub count: u32,
    /// Immediate constituents one layer finer, in merge order.
    pub children: SmallVec<[EntryRef; 8]>,
}

/// R-tree payload for a layer entry.
///
/// Carries the entry's slot in the layer vector so tree hits can be mapped
/// back without cloning entry data into the tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TreeEntry {
    pub x: f64,
    pub y: f64,
    pub slot: u32,
}

impl RstarPoint for TreeEntry {
    type Scalar = f64;
    const DIMENSIONS: usize = 2;

    fn generate(mut generator: impl FnMut(usize) -> Self::Scalar) -> Self {
        Self {
            x: generator(0),
            y: generator(1),
            slot: u32::MAX,
        }
    }

    fn nth(&self, index: usize) -> Self::Scalar {
        match index {
            0 => self.x,
            1 => self.y,
            _ => unreachable!(),
        }
    }

    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => unreachable!(),
        }
    }
}

/// One precomputed zoom level.
#[derive(Debug)]
pub(crate) struct Layer {
    pub entries: Vec<PlacedEntry>,
    pub tree: RTree<TreeEntry>,
}

impl Layer {
    pub fn from_entries(entries: Vec<PlacedEntry>) -> Self {
        let tree_entries = entries
            .iter()
            .enumerate()
            .map(|(slot, e)| TreeEntry {
                x: e.x,
                y: e.y,
                slot: slot as u32,
            })
            .collect();
        Self {
            entries,
            tree: RTree::bulk_load(tree_entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Greedily aggregate the entries of `finer` into the layer for `zoom`.
///
/// Entries are visited in layer order (spatial sort, input order on ties).
/// Each unvisited entry gathers the unvisited neighbours within the
/// zoom-scaled radius; when the combined leaf count reaches `min_points` a
/// cluster node is allocated at the leaf-weighted centroid, otherwise the
/// entry passes through to the coarser layer unchanged. Neighbour slots are
/// sorted before merging so repeated builds over the same input produce
/// identical trees.
pub(crate) fn aggregate(
    finer: &Layer,
    zoom: u8,
    radius: f64,
    tile_extent: f64,
    min_points: usize,
    nodes: &mut Vec<NodeData>,
) -> Layer {
    let r = radius / (tile_extent * f64::powi(2.0, zoom as i32));
    let r2 = r * r;

    let mut visited = vec![false; finer.len()];
    let mut out = Vec::with_capacity(finer.len());

    for slot in 0..finer.len() {
        if visited[slot] {
            continue;
        }
        visited[slot] = true;

        let seed = &finer.entries[slot];
        let probe = TreeEntry {
            x: seed.x,
            y: seed.y,
            slot: slot as u32,
        };

        let mut neighbour_slots: SmallVec<[u32; 16]> = finer
            .tree
            .locate_within_distance(probe, r2)
            .filter(|hit| hit.slot as usize != slot && !visited[hit.slot as usize])
            .map(|hit| hit.slot)
            .collect();
        neighbour_slots.sort_unstable();

        let total: u32 = seed.count
            + neighbour_slots
                .iter()
                .map(|&s| finer.entries[s as usize].count)
                .sum::<u32>();

        if !neighbour_slots.is_empty() && total as usize >= min_points {
            let mut wx = seed.x * seed.count as f64;
            let mut wy = seed.y * seed.count as f64;
            let mut children: SmallVec<[EntryRef; 8]> = SmallVec::new();
            children.push(seed.entry);

            for &s in &neighbour_slots {
                visited[s as usize] = true;
                let member = &finer.entries[s as usize];
                wx += member.x * member.count as f64;
                wy += member.y * member.count as f64;
                children.push(member.entry);
            }

            let x = wx / total as f64;
            let y = wy / total as f64;
            let id = nodes.len() as u32;
            nodes.push(NodeData {
                x,
                y,
                count: total,
                children,
            });
            out.push(PlacedEntry {
                x,
                y,
                count: total,
                entry: EntryRef::Cluster(id),
            });
        } else {
            out.push(seed.clone());
        }
    }

    Layer::from_entries(out)
}

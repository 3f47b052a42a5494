use super::*;
use crate::config::RejectPolicy;
use crate::types::BoundingBox;

fn grid_points(n: usize, lng0: f64, lat0: f64, step: f64) -> Vec<PointFeature> {
    (0..n)
        .map(|i| {
            PointFeature::new(
                format!("p{}", i),
                lng0 + (i % 10) as f64 * step,
                lat0 + (i / 10) as f64 * step,
            )
        })
        .collect()
}

#[test]
fn test_build_empty() {
    let index = ClusterIndex::with_defaults(Vec::new()).unwrap();
    assert!(index.is_empty());
    assert_eq!(index.cluster_count(), 0);

    let items = index
        .query_within_bbox(&BoundingBox::world(), 0.0)
        .unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_build_is_deterministic() {
    let points = grid_points(50, -75.6, 6.2, 0.003);

    let a = ClusterIndex::with_defaults(points.clone()).unwrap();
    let b = ClusterIndex::with_defaults(points).unwrap();

    for zoom in [0.0, 5.0, 10.0, 14.0, 17.0] {
        let mut items_a = a.query_within_bbox(&BoundingBox::world(), zoom).unwrap();
        let mut items_b = b.query_within_bbox(&BoundingBox::world(), zoom).unwrap();
        let key = |i: &ResultItem| (format!("{:?}", i.cluster_id()), format!("{:?}", i.point()));
        items_a.sort_by_key(key);
        items_b.sort_by_key(key);
        assert_eq!(items_a, items_b, "zoom {} differs between builds", zoom);
    }
}

#[test]
fn test_cluster_ids_stable_within_index() {
    let points = grid_points(30, 10.0, 45.0, 0.001);
    let index = ClusterIndex::with_defaults(points).unwrap();

    let first = index
        .query_within_bbox(&BoundingBox::world(), 5.0)
        .unwrap();
    let second = index
        .query_within_bbox(&BoundingBox::world(), 5.0)
        .unwrap();

    let ids = |items: &[ResultItem]| {
        let mut ids: Vec<usize> = items.iter().filter_map(|i| i.cluster_id()).collect();
        ids.sort_unstable();
        ids
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn test_children_sum_matches_parent_count() {
    let points = grid_points(40, 2.0, 48.0, 0.0005);
    let index = ClusterIndex::with_defaults(points).unwrap();

    let items = index
        .query_within_bbox(&BoundingBox::world(), 0.0)
        .unwrap();
    let cluster = items
        .iter()
        .find(|i| i.is_cluster())
        .expect("expected at least one cluster at zoom 0");

    let id = cluster.cluster_id().unwrap();
    let children = index.children(id).unwrap();
    assert!(!children.is_empty());

    let total: usize = children.iter().map(|c| c.point_count()).sum();
    assert_eq!(total, cluster.point_count());
}

#[test]
fn test_children_unknown_id() {
    let index = ClusterIndex::with_defaults(grid_points(5, 0.0, 0.0, 0.1)).unwrap();

    let stale = index.cluster_count() + 100;
    match index.children(stale) {
        Err(ClusterError::UnknownCluster(id)) => assert_eq!(id, stale),
        other => panic!("expected UnknownCluster, got {:?}", other),
    }
    assert!(matches!(
        index.leaves(stale, 10, 0),
        Err(ClusterError::UnknownCluster(_))
    ));
}

#[test]
fn test_leaves_pagination() {
    // Five points close enough to form one cluster at coarse zooms.
    let points: Vec<PointFeature> = (0..5)
        .map(|i| PointFeature::new(format!("p{}", i), 7.0 + i as f64 * 0.0001, 46.0))
        .collect();
    let index = ClusterIndex::with_defaults(points).unwrap();

    let items = index
        .query_within_bbox(&BoundingBox::world(), 0.0)
        .unwrap();
    assert_eq!(items.len(), 1);
    let id = items[0].cluster_id().expect("expected one cluster");

    let all = index.leaves(id, usize::MAX, 0).unwrap();
    assert_eq!(all.len(), 5);

    let first_two = index.leaves(id, 2, 0).unwrap();
    let next_two = index.leaves(id, 2, 2).unwrap();
    let last = index.leaves(id, 2, 4).unwrap();
    assert_eq!(first_two.len(), 2);
    assert_eq!(next_two.len(), 2);
    assert_eq!(last.len(), 1);

    let paged: Vec<_> = first_two
        .into_iter()
        .chain(next_two)
        .chain(last)
        .collect();
    assert_eq!(paged, all);
}

#[test]
fn test_leaves_preserve_category() {
    let points = vec![
        PointFeature::new("a", 0.0, 0.0).with_category("cafe"),
        PointFeature::new("b", 0.0001, 0.0001).with_category("bar"),
    ];
    let index = ClusterIndex::with_defaults(points).unwrap();

    let items = index
        .query_within_bbox(&BoundingBox::world(), 0.0)
        .unwrap();
    let id = items[0].cluster_id().unwrap();

    let leaves = index.leaves(id, 10, 0).unwrap();
    let categories: Vec<_> = leaves.iter().filter_map(|p| p.category.clone()).collect();
    assert_eq!(categories.len(), 2);
    assert!(categories.contains(&"cafe".to_string()));
    assert!(categories.contains(&"bar".to_string()));
}

#[test]
fn test_reject_policy_drop_and_count() {
    let points = vec![
        PointFeature::new("ok", 10.0, 10.0),
        PointFeature::new("bad_lng", 200.0, 10.0),
        PointFeature::new("bad_lat", 10.0, 95.0),
        PointFeature::new("nan", f64::NAN, 10.0),
    ];
    let index = ClusterIndex::with_defaults(points).unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.rejected_count(), 3);
    assert_eq!(index.rejects()[0].id, "bad_lng");
    assert_eq!(index.rejects()[0].position, 1);
    assert!(index.rejects()[0].reason.contains("longitude"));
}

#[test]
fn test_reject_policy_abort() {
    let config = ClusterConfig::default().with_reject_policy(RejectPolicy::Abort);
    let points = vec![
        PointFeature::new("ok", 10.0, 10.0),
        PointFeature::new("bad", 200.0, 10.0),
    ];
    assert!(matches!(
        ClusterIndex::build(points, config),
        Err(ClusterError::InvalidPoint(_))
    ));
}

#[test]
fn test_duplicate_coordinates_cluster() {
    let points = vec![
        PointFeature::new("a", 5.0, 5.0),
        PointFeature::new("b", 5.0, 5.0),
        PointFeature::new("c", 5.0, 5.0),
    ];
    let index = ClusterIndex::with_defaults(points).unwrap();

    let items = index
        .query_within_bbox(&BoundingBox::world(), 16.0)
        .unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].is_cluster());
    assert_eq!(items[0].point_count(), 3);
}

#[test]
fn test_invalid_queries() {
    let index = ClusterIndex::with_defaults(grid_points(5, 0.0, 0.0, 0.1)).unwrap();

    assert!(matches!(
        index.query_within_bbox(&BoundingBox::world(), f64::NAN),
        Err(ClusterError::InvalidQuery(_))
    ));
    assert!(matches!(
        index.query_within_bbox(&BoundingBox::new(f64::NAN, -10.0, 10.0, 10.0), 5.0),
        Err(ClusterError::InvalidQuery(_))
    ));
    // South above north is not representable after clamping.
    assert!(matches!(
        index.query_within_bbox(&BoundingBox::new(-10.0, 50.0, 10.0, -50.0), 5.0),
        Err(ClusterError::InvalidQuery(_))
    ));
}

#[test]
fn test_query_margin_wraps_past_antimeridian() {
    let config = ClusterConfig::default().with_query_margin(0.1);
    let points = vec![PointFeature::new("edge", 179.5, 0.0)];
    let index = ClusterIndex::build(points, config).unwrap();

    // Expansion pushes the west edge past -180 and wraps around to reach
    // the marker on the far side.
    let bbox = BoundingBox::new(-180.0, -5.0, -170.0, 5.0);
    let items = index.query_within_bbox(&bbox, 17.0).unwrap();
    assert_eq!(items.len(), 1);

    let strict = ClusterIndex::build(
        vec![PointFeature::new("edge", 179.5, 0.0)],
        ClusterConfig::default().with_query_margin(0.0),
    )
    .unwrap();
    assert!(strict.query_within_bbox(&bbox, 17.0).unwrap().is_empty());
}

#[test]
fn test_wide_wraparound_box_keeps_latitude_filter() {
    let points = vec![
        PointFeature::new("east", 120.0, 0.0),
        PointFeature::new("west", -120.0, 0.0),
        PointFeature::new("gap", 0.5, 0.0),
        PointFeature::new("arctic", 0.0, 80.0),
    ];
    let index = ClusterIndex::with_defaults(points).unwrap();

    // Crossing box covering all but one degree of longitude; the margin
    // closes the gap so the span goes fully global, yet the latitude band
    // still excludes the arctic marker.
    let bbox = BoundingBox::new(1.0, -10.0, 0.0, 10.0);
    let items = index.query_within_bbox(&bbox, 17.0).unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| !i.is_cluster()));
}

#[test]
fn test_query_margin_includes_edge_markers() {
    let config = ClusterConfig::default().with_query_margin(0.1);
    let points = vec![PointFeature::new("edge", 10.5, 0.0)];
    let index = ClusterIndex::build(points, config).unwrap();

    // The point sits just east of the box but inside the 10% margin.
    let bbox = BoundingBox::new(0.0, -5.0, 10.0, 5.0);
    let items = index.query_within_bbox(&bbox, 17.0).unwrap();
    assert_eq!(items.len(), 1);

    // With no margin the same query excludes it.
    let strict = ClusterIndex::build(
        vec![PointFeature::new("edge", 10.5, 0.0)],
        ClusterConfig::default().with_query_margin(0.0),
    )
    .unwrap();
    assert!(strict.query_within_bbox(&bbox, 17.0).unwrap().is_empty());
}

//! Build an index over a handful of markers and walk through the core
//! operations: viewport query, one-step expansion and paginated leaves.
//!
//! Run with: cargo run --example getting_started

use geoclust::{BoundingBox, ClusterIndexBuilder, PointFeature, ResultItem};

fn main() -> geoclust::Result<()> {
    env_logger::init();

    let points = vec![
        PointFeature::new("medellin:1", -75.5636, 6.2518).with_category("concert"),
        PointFeature::new("medellin:2", -75.5641, 6.2520).with_category("theatre"),
        PointFeature::new("medellin:3", -75.5702, 6.2443),
        PointFeature::new("bogota:1", -74.0721, 4.7110),
        PointFeature::new("tokyo:1", 139.6917, 35.6895),
    ];

    let index = ClusterIndexBuilder::new()
        .radius(60.0)
        .max_zoom(16)
        .build(points)?;
    println!(
        "indexed {} points ({} rejected, {} clusters minted)",
        index.len(),
        index.rejected_count(),
        index.cluster_count()
    );

    // A world view at low zoom groups the Colombian markers together.
    let items = index.query_within_bbox(&BoundingBox::world(), 3.0)?;
    println!("\nworld view at zoom 3:");
    for item in &items {
        match item {
            ResultItem::Cluster(c) => println!(
                "  cluster #{} at ({:.4}, {:.4}) holding {} points",
                c.id,
                c.point.x(),
                c.point.y(),
                c.point_count_abbreviated
            ),
            ResultItem::Point(p) => {
                println!("  point {} at ({:.4}, {:.4})", p.id, p.point.x(), p.point.y())
            }
        }
    }

    // Expand the first cluster one zoom step.
    if let Some(id) = items.iter().find_map(|i| i.cluster_id()) {
        println!("\nchildren of cluster #{}:", id);
        for child in index.children(id)? {
            println!(
                "  {}",
                match child {
                    ResultItem::Cluster(c) => format!("cluster #{} ({})", c.id, c.point_count),
                    ResultItem::Point(p) => format!("point {}", p.id),
                }
            );
        }

        // And list its underlying markers two at a time.
        println!("leaves of cluster #{}:", id);
        let mut offset = 0;
        loop {
            let page = index.leaves(id, 2, offset)?;
            if page.is_empty() {
                break;
            }
            for leaf in &page {
                println!("  {} ({:?})", leaf.id, leaf.category);
            }
            offset += page.len();
        }
    }

    Ok(())
}

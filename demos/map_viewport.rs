//! Simulate a map client panning and zooming over a synthetic dataset,
//! including a viewport that crosses the antimeridian.
//!
//! Run with: cargo run --example map_viewport

use geoclust::{BoundingBox, ClusterIndex, PointFeature};

fn main() -> geoclust::Result<()> {
    env_logger::init();

    // A grid of markers spread across the Pacific rim.
    let mut points = Vec::new();
    for i in 0..40 {
        for j in 0..25 {
            let lng = 140.0 + i as f64 * 2.0;
            let lng = if lng > 180.0 { lng - 360.0 } else { lng };
            let lat = -30.0 + j as f64 * 2.4;
            points.push(PointFeature::new(format!("buoy:{}-{}", i, j), lng, lat));
        }
    }
    let index = ClusterIndex::with_defaults(points)?;
    println!("indexed {} markers", index.len());

    // Zoom in over the same center, watching clusters break apart.
    let center = BoundingBox::new(150.0, -20.0, 170.0, 0.0);
    for zoom in [0.0, 3.0, 6.0, 9.0, 12.0] {
        let items = index.query_within_bbox(&center, zoom)?;
        let clusters = items.iter().filter(|i| i.is_cluster()).count();
        println!(
            "zoom {:>4}: {} items ({} clusters, {} singles)",
            zoom,
            items.len(),
            clusters,
            items.len() - clusters
        );
    }

    // A viewport straddling the date line: west > east signals wraparound.
    let straddling = BoundingBox::new(170.0, -25.0, -170.0, 5.0);
    let items = index.query_within_bbox(&straddling, 5.0)?;
    let total: usize = items.iter().map(|i| i.point_count()).sum();
    println!(
        "\ndate-line viewport at zoom 5: {} items covering {} markers",
        items.len(),
        total
    );

    Ok(())
}

//! GeoJSON conversions for query results and input features.
//!
//! Map SDKs consume marker sources as GeoJSON: clusters become point
//! features carrying `cluster: true` plus count properties, singletons
//! carry their id and category. The reverse direction parses a
//! `FeatureCollection` of points into [`PointFeature`]s for
//! [`ClusterIndex::build`](crate::ClusterIndex::build).

use crate::error::{ClusterError, Result};
use crate::types::{PointFeature, ResultItem};

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;

/// Convert one result item into a GeoJSON point feature.
pub fn item_to_feature(item: &ResultItem) -> Feature {
    let point = item.point();
    let geometry = Geometry::new(Value::Point(vec![point.x(), point.y()]));

    let mut properties = JsonObject::new();
    let id = match item {
        ResultItem::Cluster(cluster) => {
            properties.insert("cluster".into(), json!(true));
            properties.insert("cluster_id".into(), json!(cluster.id));
            properties.insert("point_count".into(), json!(cluster.point_count));
            properties.insert(
                "point_count_abbreviated".into(),
                json!(cluster.point_count_abbreviated),
            );
            None
        }
        ResultItem::Point(feature) => {
            if let Some(category) = &feature.category {
                properties.insert("category".into(), json!(category));
            }
            Some(Id::String(feature.id.clone()))
        }
    };

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Convert a query result into a GeoJSON feature collection.
pub fn items_to_feature_collection(items: &[ResultItem]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: items.iter().map(item_to_feature).collect(),
        foreign_members: None,
    }
}

/// Extract input point features from a GeoJSON feature collection.
///
/// Only `Point` geometries are accepted; each feature must carry an id
/// (feature-level or an `id` property). A `category` property, when
/// present, is passed through.
///
/// # Errors
///
/// `InvalidPoint` for non-point geometries or features without an id.
pub fn features_from_collection(collection: &FeatureCollection) -> Result<Vec<PointFeature>> {
    collection
        .features
        .iter()
        .enumerate()
        .map(|(idx, feature)| feature_to_point(idx, feature))
        .collect()
}

/// Parse a GeoJSON string holding a feature collection of points.
pub fn points_from_geojson(geojson_str: &str) -> Result<Vec<PointFeature>> {
    let parsed: GeoJson = geojson_str
        .parse()
        .map_err(|e: geojson::Error| ClusterError::InvalidPoint(e.to_string()))?;
    match parsed {
        GeoJson::FeatureCollection(fc) => features_from_collection(&fc),
        other => Err(ClusterError::InvalidPoint(format!(
            "expected a FeatureCollection, got {}",
            geojson_type_name(&other)
        ))),
    }
}

fn feature_to_point(idx: usize, feature: &Feature) -> Result<PointFeature> {
    let geometry = feature.geometry.as_ref().ok_or_else(|| {
        ClusterError::InvalidPoint(format!("feature at index {} has no geometry", idx))
    })?;

    let (lng, lat) = match &geometry.value {
        Value::Point(coords) if coords.len() >= 2 => (coords[0], coords[1]),
        _ => {
            return Err(ClusterError::InvalidPoint(format!(
                "feature at index {} is not a point geometry",
                idx
            )));
        }
    };

    let id = feature_id(feature).ok_or_else(|| {
        ClusterError::InvalidPoint(format!("feature at index {} has no id", idx))
    })?;

    let category = feature
        .properties
        .as_ref()
        .and_then(|props| props.get("category"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let mut point = PointFeature::new(id, lng, lat);
    point.category = category;
    Ok(point)
}

fn feature_id(feature: &Feature) -> Option<String> {
    match &feature.id {
        Some(Id::String(s)) => Some(s.clone()),
        Some(Id::Number(n)) => Some(n.to_string()),
        None => feature
            .properties
            .as_ref()
            .and_then(|props| props.get("id"))
            .map(|v| match v.as_str() {
                Some(s) => s.to_string(),
                None => v.to_string(),
            }),
    }
}

fn geojson_type_name(geojson: &GeoJson) -> &'static str {
    match geojson {
        GeoJson::Geometry(_) => "Geometry",
        GeoJson::Feature(_) => "Feature",
        GeoJson::FeatureCollection(_) => "FeatureCollection",
    }
}

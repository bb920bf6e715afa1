//! Conversion of committed shapes into GeoJSON features.
//!
//! This is the export contract consumed by print/export collaborators: points become
//! `Point` geometries, lines `LineString`s, and polygons a `Polygon` with a single closed
//! outer ring (drawn shapes have no holes). Properties are a flat bag with the shape id,
//! kind, style color and label text.

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use vespucci_types::{GeoPoint, GroundPoint};

use crate::draw::{DrawMode, Shape};

/// Converts one committed shape into a GeoJSON feature.
pub fn shape_to_feature(shape: &Shape) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("kind".into(), shape.kind().name().into());
    properties.insert("color".into(), shape.style().color().to_hex().into());
    if let Some(label) = shape.label() {
        properties.insert("label".into(), label.into());
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(shape_geometry(shape))),
        id: Some(Id::String(shape.id().to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Converts shapes into a GeoJSON feature collection.
pub fn to_feature_collection<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: shapes.into_iter().map(shape_to_feature).collect(),
        foreign_members: None,
    }
}

fn shape_geometry(shape: &Shape) -> Value {
    match shape.kind() {
        DrawMode::Point | DrawMode::Label => Value::Point(position(&shape.points()[0])),
        DrawMode::Line => Value::LineString(shape.points().iter().map(position).collect()),
        DrawMode::Polygon => {
            // The closing vertex is appended here only; the stored ring stays open.
            Value::Polygon(vec![shape.render_points().map(position).collect()])
        }
    }
}

fn position(point: &GroundPoint) -> Vec<f64> {
    let mut position = vec![point.lon(), point.lat()];
    if let Some(height) = point.height() {
        position.push(height);
    }
    position
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::draw::ShapeStore;
    use crate::style::{LabelStyle, PointStyle, PolygonStyle, Style};

    fn store_with_polygon() -> (ShapeStore, crate::draw::ShapeId) {
        let mut store = ShapeStore::default();
        let id = store
            .insert(
                DrawMode::Polygon,
                vec![
                    GroundPoint::new(45.0, 14.0),
                    GroundPoint::new(45.0, 14.1),
                    GroundPoint::new(45.1, 14.1),
                ],
                Style::Polygon(PolygonStyle::default()),
                None,
            )
            .expect("insert failed");
        (store, id)
    }

    #[test]
    fn point_feature() {
        let mut store = ShapeStore::default();
        let id = store
            .insert(
                DrawMode::Point,
                vec![GroundPoint::new(45.0, 14.0)],
                Style::Point(PointStyle::default()),
                None,
            )
            .expect("insert failed");

        let feature = shape_to_feature(store.get(id).expect("shape missing"));

        let geometry = feature.geometry.expect("geometry missing");
        assert_matches!(geometry.value, Value::Point(position) => {
            assert_eq!(position, vec![14.0, 45.0]);
        });
        let properties = feature.properties.expect("properties missing");
        assert_eq!(properties["kind"], "point");
    }

    #[test]
    fn polygon_ring_is_closed_in_export_only() {
        let (store, id) = store_with_polygon();
        let shape = store.get(id).expect("shape missing");

        let feature = shape_to_feature(shape);

        let geometry = feature.geometry.expect("geometry missing");
        assert_matches!(geometry.value, Value::Polygon(rings) => {
            assert_eq!(rings.len(), 1);
            assert_eq!(rings[0].len(), 4);
            assert_eq!(rings[0][0], rings[0][3]);
        });
        assert_eq!(shape.points().len(), 3);
    }

    #[test]
    fn label_feature_carries_text_property() {
        let mut store = ShapeStore::default();
        let id = store
            .insert(
                DrawMode::Label,
                vec![GroundPoint::with_height(45.0, 14.0, 320.0)],
                Style::Label(LabelStyle::default()),
                Some("Summit".into()),
            )
            .expect("insert failed");

        let feature = shape_to_feature(store.get(id).expect("shape missing"));

        let properties = feature.properties.expect("properties missing");
        assert_eq!(properties["label"], "Summit");
        let geometry = feature.geometry.expect("geometry missing");
        assert_matches!(geometry.value, Value::Point(position) => {
            assert_eq!(position, vec![14.0, 45.0, 320.0]);
        });
    }

    #[test]
    fn collection_serializes_as_geojson() {
        let (store, _) = store_with_polygon();
        let collection = to_feature_collection(store.iter());

        let json = serde_json::to_value(&collection).expect("serialization failed");
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["geometry"]["type"], "Polygon");
    }
}

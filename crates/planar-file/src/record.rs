//! JSON 实体记录
//!
//! 每个实体是一个扁平的 JSON 对象，`type` 字段区分图元种类：
//!
//! ```json
//! { "id": "…", "type": "circle", "layer": "0", "color": 4278190080,
//!   "lineWidth": 1.0, "isSelected": false,
//!   "center": { "x": 0.0, "y": 0.0 }, "radius": 5.0 }
//! ```
//!
//! 读取时校验几何不变量，违反时返回 [`FileError::InvalidEntity`]。

use crate::error::FileError;
use planar_core::document::{Document, GridSettings};
use planar_core::entity::Entity;
use planar_core::layer::{Layer, LayerId};
use serde::{Deserialize, Serialize};

/// 文档的 JSON 记录
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentRecord {
    layers: Vec<Layer>,
    active_layer: LayerId,
    grid_size: f64,
    show_grid: bool,
    snap_to_grid: bool,
    entities: Vec<Entity>,
}

fn validated(entity: Entity) -> Result<Entity, FileError> {
    entity.validate().map_err(|source| FileError::InvalidEntity {
        id: entity.id().to_string(),
        source,
    })?;
    Ok(entity)
}

pub fn entity_to_json(entity: &Entity) -> Result<String, FileError> {
    Ok(serde_json::to_string(entity)?)
}

pub fn entity_from_json(json: &str) -> Result<Entity, FileError> {
    validated(serde_json::from_str(json)?)
}

pub fn entities_to_json(entities: &[Entity]) -> Result<String, FileError> {
    Ok(serde_json::to_string_pretty(entities)?)
}

pub fn entities_from_json(json: &str) -> Result<Vec<Entity>, FileError> {
    let entities: Vec<Entity> = serde_json::from_str(json)?;
    entities.into_iter().map(validated).collect()
}

pub fn document_to_json(document: &Document) -> Result<String, FileError> {
    let grid = document.grid();
    let record = DocumentRecord {
        layers: document.layers().to_vec(),
        active_layer: document.active_layer_id().clone(),
        grid_size: grid.size,
        show_grid: grid.show,
        snap_to_grid: grid.snap,
        entities: document.entities().to_vec(),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

/// 读取文档；缺失的图层与无效的活动图层按文档规则修复
pub fn document_from_json(json: &str) -> Result<Document, FileError> {
    let record: DocumentRecord = serde_json::from_str(json)?;
    let entities = record
        .entities
        .into_iter()
        .map(validated)
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        "Parsed document record: {} entities, {} layers",
        entities.len(),
        record.layers.len()
    );

    Ok(Document::from_parts(
        record.layers,
        entities,
        record.active_layer,
        GridSettings {
            size: record.grid_size,
            show: record.show_grid,
            snap: record.snap_to_grid,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_core::entity::EntityId;
    use planar_core::geometry::{Arc, Circle, Geometry, Line, Polyline, SplineKind};
    use planar_core::math::Point2;
    use planar_core::properties::Color;
    use serde_json::Value;

    #[test]
    fn test_line_record_layout() {
        let entity = Entity::with_id(
            EntityId::new("l1"),
            Geometry::Line(Line::new(Point2::new(1.0, 2.0), Point2::new(3.0, 4.0))),
        )
        .with_color(Color::RED);
        let value: Value = serde_json::from_str(&entity_to_json(&entity).unwrap()).unwrap();

        assert_eq!(value["id"], "l1");
        assert_eq!(value["type"], "line");
        assert_eq!(value["layer"], "0");
        assert_eq!(value["color"], Color::RED.argb());
        assert_eq!(value["lineWidth"], 1.0);
        assert_eq!(value["isSelected"], false);
        assert_eq!(value["start"]["x"], 1.0);
        assert_eq!(value["end"]["y"], 4.0);
    }

    #[test]
    fn test_arc_and_spline_field_names() {
        let arc = Entity::new(Geometry::Arc(Arc::new(Point2::origin(), 2.0, 0.5, 1.5)));
        let value: Value = serde_json::from_str(&entity_to_json(&arc).unwrap()).unwrap();
        assert_eq!(value["startAngle"], 0.5);
        assert_eq!(value["endAngle"], 1.5);

        let json = r#"{"id":"s","type":"spline","layer":"0","color":0,"lineWidth":1.0,
            "isSelected":false,"controlPoints":[{"x":0,"y":0},{"x":1,"y":1}],
            "splineType":1,"tension":0.5}"#;
        match entity_from_json(json).unwrap().geometry {
            Geometry::Spline(s) => {
                assert_eq!(s.kind, SplineKind::CatmullRom);
                assert_eq!(s.control_points.len(), 2);
            }
            other => panic!("expected spline, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_rejects_bad_records() {
        let unknown = r#"{"id":"x","type":"hexagon","layer":"0","color":0,"lineWidth":1.0,"isSelected":false}"#;
        assert!(matches!(entity_from_json(unknown), Err(FileError::Json(_))));

        let missing = r#"{"id":"x","type":"circle","layer":"0","color":0,"lineWidth":1.0,"isSelected":false,"radius":1.0}"#;
        assert!(matches!(entity_from_json(missing), Err(FileError::Json(_))));

        let bad_spline = r#"{"id":"s","type":"spline","layer":"0","color":0,"lineWidth":1.0,
            "isSelected":false,"controlPoints":[{"x":0,"y":0},{"x":1,"y":1}],
            "splineType":7,"tension":0.5}"#;
        assert!(matches!(entity_from_json(bad_spline), Err(FileError::Json(_))));

        let negative = r#"{"id":"c","type":"circle","layer":"0","color":0,"lineWidth":1.0,
            "isSelected":false,"center":{"x":0,"y":0},"radius":-1.0}"#;
        assert!(matches!(
            entity_from_json(negative),
            Err(FileError::InvalidEntity { .. })
        ));
    }

    #[test]
    fn test_entities_roundtrip() {
        let entities = vec![
            Entity::new(Geometry::Circle(Circle::new(Point2::new(1.0, 1.0), 0.0))),
            Entity::new(Geometry::Polyline(Polyline::new(vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
            ]))),
        ];
        let json = entities_to_json(&entities).unwrap();
        assert_eq!(entities_from_json(&json).unwrap(), entities);
    }

    #[test]
    fn test_document_roundtrip() {
        let walls = Layer::new(LayerId::new("walls"), "Walls").with_color(Color::BLUE);
        let doc = Document::new()
            .with_layer(walls.clone())
            .with_active_layer(&walls.id)
            .with_grid(5.0, false, true)
            .with_entity(
                Entity::new(Geometry::Line(Line::new(Point2::origin(), Point2::new(1.0, 1.0))))
                    .on_layer(walls.id.clone()),
            );

        let loaded = document_from_json(&document_to_json(&doc).unwrap()).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_document_repairs_active_layer() {
        let json = r#"{"layers":[],"activeLayer":"gone","gridSize":0.0,"showGrid":true,
            "snapToGrid":false,"entities":[]}"#;
        let doc = document_from_json(json).unwrap();
        assert_eq!(doc.layers().len(), 1);
        assert_eq!(doc.active_layer_id(), &LayerId::default_layer());
        assert_eq!(doc.grid_size(), planar_core::document::DEFAULT_GRID_SIZE);
    }
}

//! 实体：几何图元 + 标识 + 视觉属性
//!
//! 实体是不可变值。任何修改都通过 `with_*` 产生新的实体，标识保持不变。

use crate::geometry::{Geometry, GeometryError};
use crate::layer::LayerId;
use crate::math::Point2;
use crate::properties::Color;
use crate::snap::SnapType;
use crate::transform::ViewTransform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 实体标识，创建后不再改变
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// 生成新的唯一标识
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    id: EntityId,
    pub layer: LayerId,
    pub color: Color,
    pub line_width: f64,
    #[serde(rename = "isSelected")]
    pub selected: bool,
    #[serde(flatten)]
    pub geometry: Geometry,
}

impl Entity {
    /// 在默认图层上创建实体，分配新标识
    pub fn new(geometry: Geometry) -> Self {
        Self::with_id(EntityId::generate(), geometry)
    }

    /// 使用指定标识创建实体
    pub fn with_id(id: EntityId, geometry: Geometry) -> Self {
        Self {
            id,
            layer: LayerId::default_layer(),
            color: Color::default(),
            line_width: 1.0,
            selected: false,
            geometry,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.geometry.type_name()
    }

    pub fn on_layer(&self, layer: LayerId) -> Self {
        Self {
            layer,
            ..self.clone()
        }
    }

    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    pub fn with_line_width(&self, line_width: f64) -> Self {
        Self {
            line_width,
            ..self.clone()
        }
    }

    pub fn with_selected(&self, selected: bool) -> Self {
        Self {
            selected,
            ..self.clone()
        }
    }

    /// 替换几何，保留标识与属性
    pub fn with_geometry(&self, geometry: Geometry) -> Self {
        Self {
            id: self.id.clone(),
            layer: self.layer.clone(),
            color: self.color,
            line_width: self.line_width,
            selected: self.selected,
            geometry,
        }
    }

    /// 点击测试
    ///
    /// `screen_point` 为屏幕坐标，`tolerance` 为像素容差。
    pub fn hit_test(&self, screen_point: &Point2, view: &ViewTransform, tolerance: f64) -> bool {
        let world = view.screen_to_world(screen_point);
        self.geometry
            .contains_point(&world, view.screen_tolerance_to_world(tolerance))
    }

    pub fn characteristic_points(&self) -> Vec<Point2> {
        self.geometry.characteristic_points()
    }

    pub fn snap_anchors(&self) -> Vec<(SnapType, Point2)> {
        self.geometry.snap_anchors()
    }

    /// 校验几何与属性的不变量
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(GeometryError::InvalidLineWidth(self.line_width));
        }
        self.geometry.validate()
    }
}

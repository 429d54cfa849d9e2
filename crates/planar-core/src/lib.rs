//! Planar 核心几何引擎
//!
//! 提供2D几何图元、求交、延伸/修剪操作和对象捕捉。
//!
//! # 架构设计
//!
//! 所有类型都是不可变值：
//! - `Geometry`: 封闭的图元枚举（线段、圆、矩形、圆弧、椭圆、多段线、样条）
//! - `Entity`: 图元 + 标识 + 视觉属性（颜色、线宽、图层）
//! - `Document`: 实体与图层的集合，修改时返回新文档
//!
//! # 示例
//!
//! ```rust
//! use planar_core::prelude::*;
//!
//! // 创建一条线段
//! let line = Line::new(Point2::origin(), Point2::new(3.0, 4.0));
//!
//! // 计算长度
//! assert_eq!(line.length(), 5.0);
//! ```

pub mod document;
pub mod entity;
pub mod extend;
pub mod geometry;
pub mod history;
pub mod intersection;
pub mod layer;
pub mod math;
pub mod properties;
pub mod snap;
pub mod transform;
pub mod trim;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::document::{Document, GridSettings};
    pub use crate::entity::{Entity, EntityId};
    pub use crate::geometry::{
        Arc, Circle, Ellipse, Geometry, GeometryError, Line, Polyline, Rectangle, Spline,
        SplineKind,
    };
    pub use crate::history::History;
    pub use crate::intersection::find_intersections;
    pub use crate::layer::{Layer, LayerId};
    pub use crate::math::{BoundingBox2, Point2, Vector2, EPSILON, LENGTH_EPSILON};
    pub use crate::properties::Color;
    pub use crate::snap::{SnapEngine, SnapMask, SnapResult, SnapSettings, SnapType};
    pub use crate::transform::ViewTransform;
}

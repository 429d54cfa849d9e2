//! 数学基础类型
//!
//! 点和向量直接使用 nalgebra 的类型，这里补充容差常量、包围盒和角度工具。

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

pub type Point2 = nalgebra::Point2<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;

/// 角度/位置相等的容差
pub const EPSILON: f64 = 1e-9;

/// 几何长度相等的容差
pub const LENGTH_EPSILON: f64 = 1e-6;

/// 把角度归一化到 [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid 在极小负数时可能返回 TAU 本身
    if a >= TAU - EPSILON {
        0.0
    } else {
        a
    }
}

/// 从 `from` 逆时针转到 `to` 的角距离，范围 [0, 2π)
pub fn ccw_distance(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

/// 两个角度在 2π 周期下是否相等
pub fn angles_equal(a: f64, b: f64) -> bool {
    let d = ccw_distance(a, b);
    d < EPSILON || TAU - d < EPSILON
}

/// 点相对圆心的极角，范围 [0, 2π)
pub fn angle_of(center: &Point2, point: &Point2) -> f64 {
    normalize_angle((point.y - center.y).atan2(point.x - center.x))
}

/// 圆心、半径、角度 -> 圆周上的点
pub fn point_on_circle(center: &Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

pub fn points_equal(a: &Point2, b: &Point2) -> bool {
    (a - b).norm() < EPSILON
}

/// 二维叉积（z 分量）
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// 轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// 空包围盒（min > max）
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::MAX, f64::MAX),
            max: Point2::new(f64::MIN, f64::MIN),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_to_include(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// 向四周扩张 `margin`
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn intersects(&self, other: &BoundingBox2) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

/// 以 `{x, y}` 结构序列化单个点
pub mod serde_point {
    use super::Point2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    pub(crate) struct PointRecord {
        x: f64,
        y: f64,
    }

    impl From<&Point2> for PointRecord {
        fn from(p: &Point2) -> Self {
            Self { x: p.x, y: p.y }
        }
    }

    impl From<PointRecord> for Point2 {
        fn from(r: PointRecord) -> Self {
            Point2::new(r.x, r.y)
        }
    }

    pub fn serialize<S: Serializer>(point: &Point2, serializer: S) -> Result<S::Ok, S::Error> {
        PointRecord::from(point).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Point2, D::Error> {
        PointRecord::deserialize(deserializer).map(Point2::from)
    }
}

/// 以 `[{x, y}, ...]` 序列化点列表
pub mod serde_points {
    use super::serde_point::PointRecord;
    use super::Point2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(points: &[Point2], serializer: S) -> Result<S::Ok, S::Error> {
        let records: Vec<PointRecord> = points.iter().map(PointRecord::from).collect();
        records.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Point2>, D::Error> {
        let records = Vec::<PointRecord>::deserialize(deserializer)?;
        Ok(records.into_iter().map(Point2::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < EPSILON);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < EPSILON);
        assert_eq!(normalize_angle(TAU), 0.0);
        assert_eq!(normalize_angle(-1e-12), 0.0);
    }

    #[test]
    fn test_ccw_distance() {
        assert!((ccw_distance(0.0, PI / 2.0) - PI / 2.0).abs() < EPSILON);
        assert!((ccw_distance(PI / 2.0, 0.0) - 3.0 * PI / 2.0).abs() < EPSILON);
        assert!(angles_equal(0.0, TAU));
        assert!(angles_equal(-PI, PI));
    }

    #[test]
    fn test_bbox() {
        let bbox = BoundingBox2::from_points([Point2::new(1.0, 5.0), Point2::new(-2.0, 3.0)]);
        assert_eq!(bbox.min, Point2::new(-2.0, 3.0));
        assert_eq!(bbox.max, Point2::new(1.0, 5.0));
        assert!(bbox.contains(&Point2::new(0.0, 4.0)));
        assert!(!bbox.contains(&Point2::new(0.0, 6.0)));
        assert!(bbox.expanded(1.0).contains(&Point2::new(0.0, 6.0)));
        assert!(BoundingBox2::empty().is_empty());
    }
}

//! 几何图元定义
//!
//! 支持的基本图元：
//! - 线段 (Line)
//! - 圆 (Circle)
//! - 矩形 (Rectangle，轴对齐)
//! - 圆弧 (Arc)
//! - 椭圆 (Ellipse，轴对齐)
//! - 多段线 (Polyline)
//! - 样条曲线 (Spline)
//!
//! 角度约定：弧度，逆时针，0 指向 +x 轴。圆弧的扫掠角总是从起始角逆时针量到终止角，
//! 起止角相等时表示整圆而不是零长度弧。

use crate::math::{
    angle_of, ccw_distance, normalize_angle, point_on_circle, BoundingBox2, Point2, Vector2,
    EPSILON, LENGTH_EPSILON,
};
use crate::snap::SnapType;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use thiserror::Error;

/// 椭圆近似为多边形时的分段数
pub const ELLIPSE_SEGMENTS: usize = 64;

/// 椭圆最近点的牛顿迭代上限
const ELLIPSE_NEWTON_ITERATIONS: usize = 16;

/// 样条每个控制区间的离散段数
pub const SPLINE_SEGMENTS_PER_SPAN: usize = 16;

/// 图元不变量被破坏
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("radius must be non-negative, got {0}")]
    NegativeRadius(f64),

    #[error("{kind} needs at least 2 points, got {count}")]
    TooFewPoints { kind: &'static str, count: usize },

    #[error("line width must be positive, got {0}")]
    InvalidLineWidth(f64),

    #[error("tension must be within [0, 1], got {0}")]
    InvalidTension(f64),

    #[error("unknown spline type index {0}")]
    UnknownSplineType(u8),

    #[error("{0} contains a non-finite coordinate")]
    NonFinite(&'static str),
}

/// 几何类型枚举
///
/// 序列化时以 `type` 字段区分变体，字段名使用 camelCase。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Line(Line),
    Circle(Circle),
    Rectangle(Rectangle),
    Arc(Arc),
    Ellipse(Ellipse),
    Polyline(Polyline),
    Spline(Spline),
}

impl Geometry {
    /// 获取几何的包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        match self {
            Geometry::Line(l) => l.bounding_box(),
            Geometry::Circle(c) => c.bounding_box(),
            Geometry::Rectangle(r) => r.bounding_box(),
            Geometry::Arc(a) => a.bounding_box(),
            Geometry::Ellipse(e) => e.bounding_box(),
            Geometry::Polyline(pl) => pl.bounding_box(),
            Geometry::Spline(s) => s.bounding_box(),
        }
    }

    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Line(_) => "Line",
            Geometry::Circle(_) => "Circle",
            Geometry::Rectangle(_) => "Rectangle",
            Geometry::Arc(_) => "Arc",
            Geometry::Ellipse(_) => "Ellipse",
            Geometry::Polyline(_) => "Polyline",
            Geometry::Spline(_) => "Spline",
        }
    }

    /// 点到图元边界的距离（非负）
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        match self {
            Geometry::Line(l) => l.distance_to_point(point),
            Geometry::Circle(c) => c.distance_to_point(point).abs(),
            Geometry::Rectangle(r) => r.distance_to_point(point),
            Geometry::Arc(a) => a.distance_to_point(point),
            Geometry::Ellipse(e) => e.distance_to_point(point),
            Geometry::Polyline(pl) => pl.distance_to_point(point),
            Geometry::Spline(s) => s.distance_to_point(point),
        }
    }

    /// 边界上离 `point` 最近的点
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        match self {
            Geometry::Line(l) => l.nearest_point(point),
            Geometry::Circle(c) => c.nearest_point(point),
            Geometry::Rectangle(r) => r.nearest_point(point),
            Geometry::Arc(a) => a.nearest_point(point),
            Geometry::Ellipse(e) => e.nearest_point(point),
            Geometry::Polyline(pl) => pl.nearest_point(point),
            Geometry::Spline(s) => nearest_on_path(&s.flatten(SPLINE_SEGMENTS_PER_SPAN), point),
        }
    }

    /// 检查世界坐标点是否在边界的容差范围内
    pub fn contains_point(&self, point: &Point2, tolerance: f64) -> bool {
        self.distance_to_point(point) <= tolerance
    }

    /// 特征点，顺序固定：
    /// - Line: 起点、终点、中点
    /// - Circle: 圆心、0/90/180/270 度象限点
    /// - Rectangle: 四个角点（左上、右上、右下、左下）、中心
    /// - Arc: 起点、终点、弧中点、圆心
    /// - Ellipse: 中心、四个轴端点
    /// - Polyline: 各顶点，然后各段中点
    /// - Spline: 控制点
    pub fn characteristic_points(&self) -> Vec<Point2> {
        self.snap_anchors().into_iter().map(|(_, p)| p).collect()
    }

    /// 带捕捉类型的特征点，与 [`Geometry::characteristic_points`] 顺序一致
    pub fn snap_anchors(&self) -> Vec<(SnapType, Point2)> {
        match self {
            Geometry::Line(l) => vec![
                (SnapType::Endpoint, l.start),
                (SnapType::Endpoint, l.end),
                (SnapType::Midpoint, l.midpoint()),
            ],
            Geometry::Circle(c) => {
                let mut anchors = vec![(SnapType::Center, c.center)];
                anchors.extend(c.quadrant_points().map(|p| (SnapType::Quadrant, p)));
                anchors
            }
            Geometry::Rectangle(r) => {
                let mut anchors: Vec<_> = r
                    .corners()
                    .into_iter()
                    .map(|p| (SnapType::Endpoint, p))
                    .collect();
                anchors.push((SnapType::Center, r.center()));
                anchors
            }
            Geometry::Arc(a) => vec![
                (SnapType::Endpoint, a.start_point()),
                (SnapType::Endpoint, a.end_point()),
                (SnapType::Midpoint, a.mid_point()),
                (SnapType::Center, a.center),
            ],
            Geometry::Ellipse(e) => {
                let mut anchors = vec![(SnapType::Center, e.center)];
                anchors.extend(e.axis_vertices().map(|p| (SnapType::Quadrant, p)));
                anchors
            }
            Geometry::Polyline(pl) => {
                let mut anchors: Vec<_> = pl
                    .points
                    .iter()
                    .map(|p| (SnapType::Endpoint, *p))
                    .collect();
                anchors.extend(pl.segments().map(|s| (SnapType::Midpoint, s.midpoint())));
                anchors
            }
            Geometry::Spline(s) => s
                .control_points
                .iter()
                .map(|p| (SnapType::Endpoint, *p))
                .collect(),
        }
    }

    /// 校验各变体的几何不变量
    pub fn validate(&self) -> Result<(), GeometryError> {
        let finite = |p: &Point2| p.x.is_finite() && p.y.is_finite();
        match self {
            Geometry::Line(l) => {
                if !(finite(&l.start) && finite(&l.end)) {
                    return Err(GeometryError::NonFinite("Line"));
                }
            }
            Geometry::Circle(c) => {
                if !finite(&c.center) {
                    return Err(GeometryError::NonFinite("Circle"));
                }
                check_radius(c.radius)?;
            }
            Geometry::Rectangle(r) => {
                if !(finite(&r.top_left) && finite(&r.bottom_right)) {
                    return Err(GeometryError::NonFinite("Rectangle"));
                }
            }
            Geometry::Arc(a) => {
                if !(finite(&a.center) && a.start_angle.is_finite() && a.end_angle.is_finite()) {
                    return Err(GeometryError::NonFinite("Arc"));
                }
                check_radius(a.radius)?;
            }
            Geometry::Ellipse(e) => {
                if !finite(&e.center) {
                    return Err(GeometryError::NonFinite("Ellipse"));
                }
                check_radius(e.radius_x)?;
                check_radius(e.radius_y)?;
            }
            Geometry::Polyline(pl) => {
                if pl.points.len() < 2 {
                    return Err(GeometryError::TooFewPoints {
                        kind: "Polyline",
                        count: pl.points.len(),
                    });
                }
                if !pl.points.iter().all(finite) {
                    return Err(GeometryError::NonFinite("Polyline"));
                }
            }
            Geometry::Spline(s) => {
                if s.control_points.len() < 2 {
                    return Err(GeometryError::TooFewPoints {
                        kind: "Spline",
                        count: s.control_points.len(),
                    });
                }
                if !s.control_points.iter().all(finite) {
                    return Err(GeometryError::NonFinite("Spline"));
                }
                if !(0.0..=1.0).contains(&s.tension) {
                    return Err(GeometryError::InvalidTension(s.tension));
                }
            }
        }
        Ok(())
    }
}

fn check_radius(radius: f64) -> Result<(), GeometryError> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(GeometryError::NegativeRadius(radius));
    }
    Ok(())
}

/// 折线路径上的最近点
fn nearest_on_path(path: &[Point2], point: &Point2) -> Point2 {
    match path {
        [] => *point,
        [only] => *only,
        _ => path
            .windows(2)
            .map(|w| Line::new(w[0], w[1]).nearest_point(point))
            .min_by(|a, b| {
                (a - point)
                    .norm()
                    .partial_cmp(&(b - point).norm())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(path[0]),
    }
}

fn distance_to_path(path: &[Point2], point: &Point2) -> f64 {
    (nearest_on_path(path, point) - point).norm()
}

/// 线段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(with = "crate::math::serde_point")]
    pub start: Point2,
    #[serde(with = "crate::math::serde_point")]
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 方向向量（未归一化）
    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }

    /// 计算线段中点
    pub fn midpoint(&self) -> Point2 {
        Point2::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// 参数 t 对应的点，t=0 为起点，t=1 为终点
    pub fn point_at(&self, t: f64) -> Point2 {
        self.start + self.delta() * t
    }

    /// 点在直线上的投影参数，零长度线段返回 0
    pub fn project(&self, point: &Point2) -> f64 {
        let v = self.delta();
        let len_sq = v.dot(&v);
        if len_sq < EPSILON * EPSILON {
            return 0.0;
        }
        (point - self.start).dot(&v) / len_sq
    }

    /// 线段上离 `point` 最近的点
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        self.point_at(self.project(point).clamp(0.0, 1.0))
    }

    /// 计算点到线段的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.nearest_point(point)).norm()
    }

    /// 点是否落在线段上：到两端距离之和等于线段长度
    pub fn contains_point(&self, point: &Point2) -> bool {
        let sum = (point - self.start).norm() + (point - self.end).norm();
        (sum - self.length()).abs() < LENGTH_EPSILON
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points([self.start, self.end])
    }
}

/// 圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    #[serde(with = "crate::math::serde_point")]
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// 计算周长
    pub fn circumference(&self) -> f64 {
        TAU * self.radius
    }

    /// 计算面积
    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    /// 计算点到圆的距离（负值表示在圆内）
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.center).norm() - self.radius
    }

    /// 获取圆上指定角度的点
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        point_on_circle(&self.center, self.radius, angle)
    }

    /// 0°, 90°, 180°, 270° 象限点
    pub fn quadrant_points(&self) -> impl Iterator<Item = Point2> + '_ {
        [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2]
            .into_iter()
            .map(|a| self.point_at_angle(a))
    }

    /// 圆周上离 `point` 最近的点；点在圆心时取 0° 方向
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        let v = point - self.center;
        let d = v.norm();
        if d < EPSILON {
            return self.point_at_angle(0.0);
        }
        self.center + v * (self.radius / d)
    }

    /// 从外部点到圆的切点，点在圆内或圆上时没有切点
    pub fn tangent_points(&self, point: &Point2) -> Vec<Point2> {
        let d = (point - self.center).norm();
        if d <= self.radius + EPSILON {
            return vec![];
        }

        let base_angle = angle_of(&self.center, point);
        let offset = (self.radius / d).acos();

        vec![
            self.point_at_angle(base_angle + offset),
            self.point_at_angle(base_angle - offset),
        ]
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.center.x - self.radius, self.center.y - self.radius),
            Point2::new(self.center.x + self.radius, self.center.y + self.radius),
        )
    }
}

/// 轴对齐矩形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    #[serde(with = "crate::math::serde_point")]
    pub top_left: Point2,
    #[serde(with = "crate::math::serde_point")]
    pub bottom_right: Point2,
}

impl Rectangle {
    pub fn new(top_left: Point2, bottom_right: Point2) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn width(&self) -> f64 {
        (self.bottom_right.x - self.top_left.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.bottom_right.y - self.top_left.y).abs()
    }

    /// 角点：左上、右上、右下、左下
    pub fn corners(&self) -> [Point2; 4] {
        [
            self.top_left,
            Point2::new(self.bottom_right.x, self.top_left.y),
            self.bottom_right,
            Point2::new(self.top_left.x, self.bottom_right.y),
        ]
    }

    /// 四条边，首尾相接
    pub fn edges(&self) -> [Line; 4] {
        let [a, b, c, d] = self.corners();
        [
            Line::new(a, b),
            Line::new(b, c),
            Line::new(c, d),
            Line::new(d, a),
        ]
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.top_left.x + self.bottom_right.x) / 2.0,
            (self.top_left.y + self.bottom_right.y) / 2.0,
        )
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        self.edges()
            .iter()
            .map(|e| e.distance_to_point(point))
            .fold(f64::MAX, f64::min)
    }

    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        let corners = self.corners();
        let mut path = corners.to_vec();
        path.push(corners[0]);
        nearest_on_path(&path, point)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points([self.top_left, self.bottom_right])
    }
}

/// 圆弧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc {
    #[serde(with = "crate::math::serde_point")]
    pub center: Point2,
    pub radius: f64,
    /// 起始角度（弧度）
    pub start_angle: f64,
    /// 终止角度（弧度）
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// 起止角在 2π 周期下相等即为整圆
    pub fn is_full_circle(&self) -> bool {
        crate::math::angles_equal(self.start_angle, self.end_angle)
    }

    /// 计算扫过的角度，范围 (0, 2π]
    pub fn sweep_angle(&self) -> f64 {
        if self.is_full_circle() {
            TAU
        } else {
            ccw_distance(self.start_angle, self.end_angle)
        }
    }

    /// 计算弧长
    pub fn length(&self) -> f64 {
        self.sweep_angle() * self.radius
    }

    /// 获取起点
    pub fn start_point(&self) -> Point2 {
        point_on_circle(&self.center, self.radius, self.start_angle)
    }

    /// 获取终点
    pub fn end_point(&self) -> Point2 {
        point_on_circle(&self.center, self.radius, self.end_angle)
    }

    /// 弧的中点（扫掠角一半处）
    pub fn mid_point(&self) -> Point2 {
        point_on_circle(
            &self.center,
            self.radius,
            self.start_angle + self.sweep_angle() / 2.0,
        )
    }

    /// 所在的整圆
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// 检查角度是否在弧的范围内（含端点，带容差）
    pub fn contains_angle(&self, angle: f64) -> bool {
        if self.is_full_circle() {
            return true;
        }
        let d = ccw_distance(self.start_angle, angle);
        d <= self.sweep_angle() + EPSILON || TAU - d < EPSILON
    }

    /// 检查点的方位角是否落在弧的范围内（不检查半径）
    pub fn contains_point(&self, point: &Point2) -> bool {
        self.contains_angle(angle_of(&self.center, point))
    }

    /// 计算点到圆弧的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        // 同时检查径向距离与角度归属
        if self.contains_point(point) {
            ((point - self.center).norm() - self.radius).abs()
        } else {
            // 返回到端点的最小距离
            let d1 = (point - self.start_point()).norm();
            let d2 = (point - self.end_point()).norm();
            d1.min(d2)
        }
    }

    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        if self.contains_point(point) {
            return self.circle().nearest_point(point);
        }
        let start = self.start_point();
        let end = self.end_point();
        if (point - start).norm() <= (point - end).norm() {
            start
        } else {
            end
        }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points([self.start_point(), self.end_point()]);

        // 检查象限点
        for angle in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            if self.contains_angle(angle) {
                bbox.expand_to_include(&point_on_circle(&self.center, self.radius, angle));
            }
        }

        bbox
    }
}

/// 轴对齐椭圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    #[serde(with = "crate::math::serde_point")]
    pub center: Point2,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl Ellipse {
    pub fn new(center: Point2, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
        }
    }

    /// 参数角 `t` 对应的点
    pub fn point_at(&self, t: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius_x * t.cos(),
            self.center.y + self.radius_y * t.sin(),
        )
    }

    /// 0°, 90°, 180°, 270° 轴端点
    pub fn axis_vertices(&self) -> impl Iterator<Item = Point2> + '_ {
        [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2]
            .into_iter()
            .map(|t| self.point_at(t))
    }

    /// 闭合折线近似，首尾点重合
    pub fn flatten(&self, segments: usize) -> Vec<Point2> {
        let n = segments.max(4);
        (0..=n)
            .map(|i| self.point_at(TAU * i as f64 / n as f64))
            .collect()
    }

    /// 椭圆上离 `point` 最近的点
    ///
    /// 先取 `ELLIPSE_SEGMENTS` 个采样角中最近的一个，再用牛顿迭代求
    /// `(P(t) - q) · P'(t) = 0`。
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        let step = TAU / ELLIPSE_SEGMENTS as f64;
        let dist = |t: f64| (self.point_at(t) - point).norm();
        let seed = (0..ELLIPSE_SEGMENTS)
            .map(|i| i as f64 * step)
            .min_by(|a, b| {
                dist(*a)
                    .partial_cmp(&dist(*b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(0.0);

        let mut t = seed;
        for _ in 0..ELLIPSE_NEWTON_ITERATIONS {
            let (sin, cos) = t.sin_cos();
            let offset = self.point_at(t) - point;
            let tangent = Vector2::new(-self.radius_x * sin, self.radius_y * cos);
            let second = Vector2::new(-self.radius_x * cos, -self.radius_y * sin);
            let f = offset.dot(&tangent);
            let df = tangent.norm_squared() + offset.dot(&second);
            // 只在极小值附近迭代
            if df <= EPSILON {
                break;
            }
            let delta = (f / df).clamp(-step, step);
            t -= delta;
            if delta.abs() < EPSILON {
                break;
            }
        }

        if dist(t) <= dist(seed) {
            self.point_at(t)
        } else {
            self.point_at(seed)
        }
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (self.nearest_point(point) - point).norm()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.center.x - self.radius_x, self.center.y - self.radius_y),
            Point2::new(self.center.x + self.radius_x, self.center.y + self.radius_y),
        )
    }
}

/// 多段线（开放，至少两个点）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    #[serde(with = "crate::math::serde_points")]
    pub points: Vec<Point2>,
}

impl Polyline {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// 线段数量
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// 依次返回各线段
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    /// 计算总长度
    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    /// 计算点到多段线的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        distance_to_path(&self.points, point)
    }

    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        nearest_on_path(&self.points, point)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        if self.points.is_empty() {
            return BoundingBox2::empty();
        }
        BoundingBox2::from_points(self.points.iter().copied())
    }
}

/// 样条曲线类型，序列化为整数索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SplineKind {
    #[default]
    Bezier,
    CatmullRom,
}

impl TryFrom<u8> for SplineKind {
    type Error = GeometryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SplineKind::Bezier),
            1 => Ok(SplineKind::CatmullRom),
            other => Err(GeometryError::UnknownSplineType(other)),
        }
    }
}

impl From<SplineKind> for u8 {
    fn from(kind: SplineKind) -> Self {
        match kind {
            SplineKind::Bezier => 0,
            SplineKind::CatmullRom => 1,
        }
    }
}

/// 样条曲线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spline {
    #[serde(with = "crate::math::serde_points")]
    pub control_points: Vec<Point2>,
    #[serde(rename = "splineType")]
    pub kind: SplineKind,
    /// 张力，[0, 1]；仅影响 Catmull-Rom
    pub tension: f64,
}

impl Spline {
    pub fn new(control_points: Vec<Point2>, kind: SplineKind, tension: f64) -> Self {
        Self {
            control_points,
            kind,
            tension: tension.clamp(0.0, 1.0),
        }
    }

    /// 离散为折线
    pub fn flatten(&self, segments_per_span: usize) -> Vec<Point2> {
        let pts = &self.control_points;
        if pts.len() < 2 {
            return pts.clone();
        }
        let per_span = segments_per_span.max(1);
        let spans = pts.len() - 1;

        match self.kind {
            SplineKind::Bezier => {
                let n = per_span * spans;
                (0..=n)
                    .map(|i| de_casteljau(pts, i as f64 / n as f64))
                    .collect()
            }
            SplineKind::CatmullRom => {
                let s = (1.0 - self.tension) / 2.0;
                let mut out = Vec::with_capacity(per_span * spans + 1);
                out.push(pts[0]);
                for i in 0..spans {
                    let p0 = pts[i.saturating_sub(1)];
                    let p1 = pts[i];
                    let p2 = pts[i + 1];
                    let p3 = pts[(i + 2).min(pts.len() - 1)];
                    let m1 = (p2 - p0) * s;
                    let m2 = (p3 - p1) * s;
                    for step in 1..=per_span {
                        let t = step as f64 / per_span as f64;
                        out.push(hermite(&p1, &m1, &p2, &m2, t));
                    }
                }
                out
            }
        }
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        distance_to_path(&self.flatten(SPLINE_SEGMENTS_PER_SPAN), point)
    }

    /// 以控制点外包作为包围盒；贝塞尔曲线始终位于控制多边形的凸包内
    pub fn bounding_box(&self) -> BoundingBox2 {
        match self.kind {
            SplineKind::Bezier => BoundingBox2::from_points(self.control_points.iter().copied()),
            SplineKind::CatmullRom => BoundingBox2::from_points(self.flatten(SPLINE_SEGMENTS_PER_SPAN)),
        }
    }
}

fn de_casteljau(points: &[Point2], t: f64) -> Point2 {
    let mut work: Vec<Point2> = points.to_vec();
    for level in (1..work.len()).rev() {
        for i in 0..level {
            work[i] = work[i] + (work[i + 1] - work[i]) * t;
        }
    }
    work[0]
}

fn hermite(p1: &Point2, m1: &Vector2, p2: &Point2, m2: &Vector2, t: f64) -> Point2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    Point2::from(p1.coords * h00 + *m1 * h10 + p2.coords * h01 + *m2 * h11)
}

/// 圆弧扫掠角是否退化（接近 0 或 2π）
pub(crate) fn is_degenerate_sweep(sweep: f64) -> bool {
    let sweep = normalize_angle(sweep);
    sweep < EPSILON || TAU - sweep < EPSILON
}

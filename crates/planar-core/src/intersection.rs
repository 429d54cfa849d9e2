//! 求交计算
//!
//! 纯函数，无副作用。几何退化（平行、零长度、同心、内含）一律返回空结果。
//!
//! 直线-直线与直线-圆各有两个入口：无限延长版本供延伸使用，
//! 线段版本（参数 t ∈ [0,1]）供修剪与捕捉使用。

use crate::geometry::{Arc, Geometry, Line, Rectangle};
use crate::math::{cross, Point2, Vector2, EPSILON, LENGTH_EPSILON};
use std::cmp::Ordering;

/// 两条无限直线的交点
///
/// 平行或共线时返回 `None`。若其中一条"直线"长度为零，则退化为点是否在另一条线段上的判断。
pub fn line_line_intersection(l1: &Line, l2: &Line) -> Option<Point2> {
    match (l1.length() < EPSILON, l2.length() < EPSILON) {
        (true, true) => return crate::math::points_equal(&l1.start, &l2.start).then_some(l1.start),
        (true, false) => return l2.contains_point(&l1.start).then_some(l1.start),
        (false, true) => return l1.contains_point(&l2.start).then_some(l2.start),
        (false, false) => {}
    }

    let (t, _) = line_line_parameters(l1, l2)?;
    Some(l1.point_at(t))
}

/// 两条线段的交点（两者的参数都必须落在 [0,1] 内）
pub fn segment_segment_intersection(l1: &Line, l2: &Line) -> Option<Point2> {
    if l1.length() < EPSILON || l2.length() < EPSILON {
        return line_line_intersection(l1, l2);
    }

    let (t, u) = line_line_parameters(l1, l2)?;
    if in_unit_range(t) && in_unit_range(u) {
        Some(l1.point_at(t))
    } else {
        None
    }
}

/// 解参数方程 l1.start + t*d1 = l2.start + u*d2
fn line_line_parameters(l1: &Line, l2: &Line) -> Option<(f64, f64)> {
    let d1 = l1.delta();
    let d2 = l2.delta();

    let denom = cross(&d1, &d2);

    // 平行
    if denom.abs() < EPSILON {
        return None;
    }

    let d = l2.start - l1.start;
    let t = cross(&d, &d2) / denom;
    let u = cross(&d, &d1) / denom;
    Some((t, u))
}

fn in_unit_range(t: f64) -> bool {
    (-EPSILON..=1.0 + EPSILON).contains(&t)
}

/// 直线与圆的交点参数 t（以线段参数表示，未限制范围）
fn line_circle_parameters(line: &Line, center: &Point2, radius: f64) -> Vec<f64> {
    let d = line.delta();
    let len = d.norm();
    if len < EPSILON {
        let on_circle = ((line.start - center).norm() - radius).abs() < LENGTH_EPSILON;
        return if on_circle { vec![0.0] } else { vec![] };
    }

    // 单位方向下 a = 1
    let u = d / len;
    let f = line.start - center;
    let b = 2.0 * f.dot(&u);
    let c = f.dot(&f) - radius * radius;

    let discriminant = b * b - 4.0 * c;

    if discriminant < -EPSILON {
        return vec![];
    }

    if discriminant.abs() <= EPSILON {
        // 相切
        vec![-b / 2.0 / len]
    } else {
        let sqrt_disc = discriminant.sqrt();
        vec![(-b - sqrt_disc) / 2.0 / len, (-b + sqrt_disc) / 2.0 / len]
    }
}

/// 线段与圆的交点
pub fn line_circle_intersection(line: &Line, center: &Point2, radius: f64) -> Vec<Point2> {
    line_circle_parameters(line, center, radius)
        .into_iter()
        .filter(|t| in_unit_range(*t))
        .map(|t| line.point_at(t))
        .collect()
}

/// 无限直线与圆的交点
pub fn infinite_line_circle_intersection(line: &Line, center: &Point2, radius: f64) -> Vec<Point2> {
    line_circle_parameters(line, center, radius)
        .into_iter()
        .map(|t| line.point_at(t))
        .collect()
}

/// 圆-圆交点（根轴法）
///
/// 同心、相离、内含返回空；外切或内切返回一个点；一般情况两个点。
pub fn circle_circle_intersection(c1: &Point2, r1: f64, c2: &Point2, r2: f64) -> Vec<Point2> {
    let delta = c2 - c1;
    let d = delta.norm();

    // 同心
    if d < EPSILON {
        return vec![];
    }

    // 相离或内含
    if d > r1 + r2 + EPSILON || d < (r1 - r2).abs() - EPSILON {
        return vec![];
    }

    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let dir = delta / d;
    let p = c1 + dir * a;

    let tangent = (d - (r1 + r2)).abs() <= EPSILON || (d - (r1 - r2).abs()).abs() <= EPSILON;
    let h_sq = r1 * r1 - a * a;
    if tangent || h_sq <= 0.0 {
        return vec![p];
    }

    let h = h_sq.sqrt();
    let perp = Vector2::new(-dir.y, dir.x);
    vec![p + perp * h, p - perp * h]
}

/// 线段与矩形四条边的交点（角点只计一次）
pub fn line_rectangle_intersection(line: &Line, rect: &Rectangle) -> Vec<Point2> {
    let hits = rect
        .edges()
        .iter()
        .filter_map(|edge| segment_segment_intersection(line, edge))
        .collect();
    dedup_points(hits)
}

/// 求交使用的曲线片段
#[derive(Debug, Clone)]
enum Piece {
    Segment(Line),
    /// 整圆以起止角相等的圆弧表示
    Arc(Arc),
}

/// 把图元分解为线段与圆弧；椭圆与样条不参与求交
fn pieces(geometry: &Geometry) -> Vec<Piece> {
    match geometry {
        Geometry::Line(l) => vec![Piece::Segment(l.clone())],
        Geometry::Rectangle(r) => r.edges().into_iter().map(Piece::Segment).collect(),
        Geometry::Polyline(pl) => pl.segments().map(Piece::Segment).collect(),
        Geometry::Circle(c) => vec![Piece::Arc(Arc::new(c.center, c.radius, 0.0, 0.0))],
        Geometry::Arc(a) => vec![Piece::Arc(a.clone())],
        Geometry::Ellipse(_) | Geometry::Spline(_) => vec![],
    }
}

fn piece_intersections(a: &Piece, b: &Piece) -> Vec<Point2> {
    match (a, b) {
        (Piece::Segment(l1), Piece::Segment(l2)) => {
            segment_segment_intersection(l1, l2).into_iter().collect()
        }
        (Piece::Segment(line), Piece::Arc(arc)) | (Piece::Arc(arc), Piece::Segment(line)) => {
            line_circle_intersection(line, &arc.center, arc.radius)
                .into_iter()
                .filter(|p| arc.contains_point(p))
                .collect()
        }
        (Piece::Arc(a1), Piece::Arc(a2)) => {
            circle_circle_intersection(&a1.center, a1.radius, &a2.center, a2.radius)
                .into_iter()
                .filter(|p| a1.contains_point(p) && a2.contains_point(p))
                .collect()
        }
    }
}

/// 两个图元的交点
///
/// 只返回同时落在两个图元上的点；结果去重并按坐标排序，参数顺序不影响结果。
pub fn find_intersections(a: &Geometry, b: &Geometry) -> Vec<Point2> {
    let pa = pieces(a);
    let pb = pieces(b);

    let mut points = Vec::new();
    for p in &pa {
        for q in &pb {
            points.extend(piece_intersections(p, q));
        }
    }

    let mut points = dedup_points(points);
    points.sort_by(|p, q| {
        p.x.partial_cmp(&q.x)
            .unwrap_or(Ordering::Equal)
            .then(p.y.partial_cmp(&q.y).unwrap_or(Ordering::Equal))
    });
    points
}

fn dedup_points(points: Vec<Point2>) -> Vec<Point2> {
    let mut unique: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if !unique.iter().any(|u| (u - p).norm() < LENGTH_EPSILON) {
            unique.push(p);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Ellipse, Polyline};
    use std::f64::consts::PI;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn test_line_intersection() {
        let l1 = Line::new(p(0.0, 0.0), p(10.0, 10.0));
        let l2 = Line::new(p(0.0, 10.0), p(10.0, 0.0));

        let intersection = line_line_intersection(&l1, &l2).unwrap();
        assert!((intersection.x - 5.0).abs() < EPSILON);
        assert!((intersection.y - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_infinite_lines_meet_outside_segments() {
        let l1 = Line::new(p(0.0, 0.0), p(1.0, 0.0));
        let l2 = Line::new(p(5.0, 1.0), p(5.0, 2.0));
        let hit = line_line_intersection(&l1, &l2).unwrap();
        assert!((hit - p(5.0, 0.0)).norm() < EPSILON);
        assert!(segment_segment_intersection(&l1, &l2).is_none());
    }

    #[test]
    fn test_parallel_lines() {
        let l1 = Line::new(p(0.0, 0.0), p(10.0, 0.0));
        let l2 = Line::new(p(0.0, 1.0), p(10.0, 1.0));
        assert!(line_line_intersection(&l1, &l2).is_none());

        let collinear = Line::new(p(2.0, 0.0), p(5.0, 0.0));
        assert!(line_line_intersection(&l1, &collinear).is_none());
    }

    #[test]
    fn test_zero_length_line_is_point_test() {
        let seg = Line::new(p(0.0, 0.0), p(10.0, 0.0));
        let on = Line::new(p(3.0, 0.0), p(3.0, 0.0));
        let off = Line::new(p(3.0, 1.0), p(3.0, 1.0));
        assert_eq!(line_line_intersection(&on, &seg), Some(p(3.0, 0.0)));
        assert_eq!(line_line_intersection(&seg, &on), Some(p(3.0, 0.0)));
        assert!(line_line_intersection(&off, &seg).is_none());
    }

    #[test]
    fn test_line_circle_segment_vs_infinite() {
        let line = Line::new(p(-2.0, 0.0), p(2.0, 0.0));
        let center = p(0.0, 0.0);
        assert!(line_circle_intersection(&line, &center, 5.0).is_empty());

        let hits = infinite_line_circle_intersection(&line, &center, 5.0);
        assert_eq!(hits.len(), 2);
        assert!((hits[0] - p(-5.0, 0.0)).norm() < EPSILON);
        assert!((hits[1] - p(5.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_line_circle_tangent() {
        let line = Line::new(p(-10.0, 5.0), p(10.0, 5.0));
        let hits = line_circle_intersection(&line, &p(0.0, 0.0), 5.0);
        assert_eq!(hits.len(), 1);
        assert!((hits[0] - p(0.0, 5.0)).norm() < 1e-6);
    }

    #[test]
    fn test_circle_circle_two_points() {
        let hits = circle_circle_intersection(&p(0.0, 0.0), 5.0, &p(8.0, 0.0), 5.0);
        assert_eq!(hits.len(), 2);
        for h in &hits {
            assert!((h.x - 4.0).abs() < EPSILON);
            assert!((h.y.abs() - 3.0).abs() < EPSILON);
        }
        assert!((hits[0].y + hits[1].y).abs() < EPSILON);
    }

    #[test]
    fn test_circle_circle_degenerate_cases() {
        // 同心
        assert!(circle_circle_intersection(&p(0.0, 0.0), 5.0, &p(0.0, 0.0), 3.0).is_empty());
        // 相离
        assert!(circle_circle_intersection(&p(0.0, 0.0), 1.0, &p(10.0, 0.0), 1.0).is_empty());
        // 内含
        assert!(circle_circle_intersection(&p(0.0, 0.0), 10.0, &p(1.0, 0.0), 2.0).is_empty());
        // 外切
        let ext = circle_circle_intersection(&p(0.0, 0.0), 2.0, &p(5.0, 0.0), 3.0);
        assert_eq!(ext.len(), 1);
        assert!((ext[0] - p(2.0, 0.0)).norm() < EPSILON);
        // 内切
        let int = circle_circle_intersection(&p(0.0, 0.0), 5.0, &p(2.0, 0.0), 3.0);
        assert_eq!(int.len(), 1);
        assert!((int[0] - p(5.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_line_rectangle() {
        let rect = Rectangle::new(p(0.0, 10.0), p(10.0, 0.0));
        let line = Line::new(p(-5.0, 5.0), p(15.0, 5.0));
        let hits = line_rectangle_intersection(&line, &rect);
        assert_eq!(hits.len(), 2);

        // 穿过对角
        let diagonal = Line::new(p(-1.0, -1.0), p(11.0, 11.0));
        assert_eq!(line_rectangle_intersection(&diagonal, &rect).len(), 2);
    }

    #[test]
    fn test_find_intersections_scenario() {
        let a = Geometry::Line(Line::new(p(0.0, 0.0), p(10.0, 0.0)));
        let b = Geometry::Line(Line::new(p(5.0, -5.0), p(5.0, 5.0)));
        let ab = find_intersections(&a, &b);
        let ba = find_intersections(&b, &a);
        assert_eq!(ab.len(), 1);
        assert!((ab[0] - p(5.0, 0.0)).norm() < EPSILON);
        assert_eq!(ba.len(), 1);
        assert!((ba[0] - ab[0]).norm() < EPSILON);
    }

    #[test]
    fn test_find_intersections_arc_filters_sweep() {
        let upper = Geometry::Arc(Arc::new(p(0.0, 0.0), 5.0, 0.0, PI));
        let vertical = Geometry::Line(Line::new(p(0.0, -10.0), p(0.0, 10.0)));
        let hits = find_intersections(&upper, &vertical);
        assert_eq!(hits.len(), 1);
        assert!((hits[0] - p(0.0, 5.0)).norm() < EPSILON);
    }

    #[test]
    fn test_find_intersections_circle_polyline() {
        let circle = Geometry::Circle(Circle::new(p(0.0, 0.0), 5.0));
        let poly = Geometry::Polyline(Polyline::new(vec![p(-10.0, 0.0), p(0.0, 0.0), p(0.0, 10.0)]));
        let hits = find_intersections(&poly, &circle);
        assert_eq!(hits.len(), 2);
        assert!((hits[0] - p(-5.0, 0.0)).norm() < EPSILON);
        assert!((hits[1] - p(0.0, 5.0)).norm() < EPSILON);
    }

    #[test]
    fn test_ellipse_has_no_intersections() {
        let ellipse = Geometry::Ellipse(Ellipse::new(p(0.0, 0.0), 5.0, 3.0));
        let line = Geometry::Line(Line::new(p(-10.0, 0.0), p(10.0, 0.0)));
        assert!(find_intersections(&ellipse, &line).is_empty());
    }
}

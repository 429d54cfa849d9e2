//! 延伸：把图元的一端延长到边界图元上
//!
//! 点击位置决定移动哪一端（离点击点较近的一端），另一端保持不动。
//! 只接受让图元变长的交点；线段只参考第一个可用的边界，圆弧在所有边界中取角度变化最小者。

use crate::entity::Entity;
use crate::geometry::{Arc, Geometry, Line};
use crate::intersection::{
    circle_circle_intersection, infinite_line_circle_intersection, line_circle_intersection,
    line_line_intersection,
};
use crate::math::{angle_of, ccw_distance, Point2, EPSILON};
use std::f64::consts::TAU;

impl Entity {
    /// 延伸到边界，返回保留标识的新实体；无法延伸时返回 `None`
    ///
    /// 只有 Line 和 Arc 可以延伸，其余类型总是返回 `None`。
    pub fn extend(&self, boundaries: &[Entity], click: &Point2) -> Option<Entity> {
        let boundaries: Vec<&Geometry> = boundaries
            .iter()
            .filter(|b| b.id() != self.id())
            .map(|b| &b.geometry)
            .collect();

        let extended = match &self.geometry {
            Geometry::Line(line) => extend_line(line, &boundaries, click).map(Geometry::Line),
            Geometry::Arc(arc) => extend_arc(arc, &boundaries, click).map(Geometry::Arc),
            Geometry::Circle(_)
            | Geometry::Rectangle(_)
            | Geometry::Ellipse(_)
            | Geometry::Polyline(_)
            | Geometry::Spline(_) => None,
        };

        match &extended {
            Some(g) => tracing::debug!("Extended {} {} to {:?}", self.type_name(), self.id(), g),
            None => tracing::debug!("{} {} cannot be extended", self.type_name(), self.id()),
        }

        extended.map(|g| self.with_geometry(g))
    }
}

/// 线段所在无限直线与边界的交点；边界类型不支持时返回 `None`
fn line_boundary_candidates(target: &Line, boundary: &Geometry) -> Option<Vec<Point2>> {
    match boundary {
        Geometry::Line(b) => Some(line_line_intersection(target, b).into_iter().collect()),
        Geometry::Circle(c) => Some(infinite_line_circle_intersection(target, &c.center, c.radius)),
        Geometry::Arc(a) => Some(
            infinite_line_circle_intersection(target, &a.center, a.radius)
                .into_iter()
                .filter(|p| a.contains_point(p))
                .collect(),
        ),
        Geometry::Rectangle(r) => Some(hits_on_edges(target, r.edges().into_iter())),
        Geometry::Polyline(pl) => Some(hits_on_edges(target, pl.segments())),
        Geometry::Ellipse(_) | Geometry::Spline(_) => None,
    }
}

/// 无限直线与若干有界边的交点
fn hits_on_edges(target: &Line, edges: impl Iterator<Item = Line>) -> Vec<Point2> {
    edges
        .filter_map(|edge| line_line_intersection(target, &edge).filter(|p| edge.contains_point(p)))
        .collect()
}

fn extend_line(line: &Line, boundaries: &[&Geometry], click: &Point2) -> Option<Line> {
    // 移动离点击点较近的一端
    let move_start = (click - line.start).norm_squared() < (click - line.end).norm_squared();
    let (fixed, moving) = if move_start {
        (line.end, line.start)
    } else {
        (line.start, line.end)
    };

    let direction = moving - fixed;
    if direction.norm() < EPSILON {
        return None;
    }

    // 只参考第一个可用的边界
    let candidates = boundaries
        .iter()
        .find_map(|b| line_boundary_candidates(line, b))?;

    let target = candidates
        .into_iter()
        .filter(|p| {
            let offset = p - moving;
            offset.dot(&direction) > 0.0 && offset.norm() > EPSILON
        })
        .min_by(|a, b| {
            (a - moving)
                .norm()
                .partial_cmp(&(b - moving).norm())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    Some(if move_start {
        Line::new(target, line.end)
    } else {
        Line::new(line.start, target)
    })
}

/// 圆弧所在整圆与边界的交点
fn arc_boundary_candidates(arc: &Arc, boundary: &Geometry) -> Vec<Point2> {
    let center = &arc.center;
    let radius = arc.radius;
    match boundary {
        Geometry::Line(b) => infinite_line_circle_intersection(b, center, radius),
        Geometry::Circle(c) => circle_circle_intersection(center, radius, &c.center, c.radius),
        Geometry::Arc(a) => circle_circle_intersection(center, radius, &a.center, a.radius)
            .into_iter()
            .filter(|p| a.contains_point(p))
            .collect(),
        Geometry::Rectangle(r) => r
            .edges()
            .iter()
            .flat_map(|edge| line_circle_intersection(edge, center, radius))
            .collect(),
        Geometry::Polyline(pl) => pl
            .segments()
            .flat_map(|seg| line_circle_intersection(&seg, center, radius))
            .collect(),
        Geometry::Ellipse(_) | Geometry::Spline(_) => vec![],
    }
}

fn extend_arc(arc: &Arc, boundaries: &[&Geometry], click: &Point2) -> Option<Arc> {
    if arc.is_full_circle() || arc.radius < EPSILON {
        return None;
    }

    let move_start =
        (click - arc.start_point()).norm_squared() < (click - arc.end_point()).norm_squared();
    let sweep = arc.sweep_angle();

    // (新角度, 角度增量)
    let best = boundaries
        .iter()
        .flat_map(|b| arc_boundary_candidates(arc, b))
        .filter_map(|p| {
            let angle = angle_of(&arc.center, &p);
            // 终点逆时针前进，起点顺时针后退
            let delta = if move_start {
                ccw_distance(angle, arc.start_angle)
            } else {
                ccw_distance(arc.end_angle, angle)
            };
            (delta > EPSILON && sweep + delta < TAU - EPSILON).then_some((angle, delta))
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))?;

    let (angle, _) = best;
    Some(if move_start {
        Arc::new(arc.center, arc.radius, angle, arc.end_angle)
    } else {
        Arc::new(arc.center, arc.radius, arc.start_angle, angle)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Ellipse, Rectangle};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn line(a: Point2, b: Point2) -> Entity {
        Entity::new(Geometry::Line(Line::new(a, b)))
    }

    fn as_line(e: &Entity) -> &Line {
        match &e.geometry {
            Geometry::Line(l) => l,
            other => panic!("expected line, got {}", other.type_name()),
        }
    }

    fn as_arc(e: &Entity) -> &Arc {
        match &e.geometry {
            Geometry::Arc(a) => a,
            other => panic!("expected arc, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_extend_line_to_line() {
        let target = line(p(0.0, 0.0), p(5.0, 0.0));
        let boundary = line(p(10.0, -5.0), p(10.0, 5.0));
        let result = target.extend(&[boundary], &p(4.0, 0.0)).unwrap();
        assert_eq!(result.id(), target.id());

        let l = as_line(&result);
        assert_eq!(l.start, p(0.0, 0.0));
        assert!((l.end - p(10.0, 0.0)).norm() < EPSILON);
        // 新线段包含原线段
        assert!(l.contains_point(&p(0.0, 0.0)) && l.contains_point(&p(5.0, 0.0)));
        assert!(l.length() > 5.0);
    }

    #[test]
    fn test_boundary_line_is_treated_as_infinite() {
        let target = line(p(0.0, 0.0), p(5.0, 0.0));
        let boundary = line(p(10.0, 2.0), p(10.0, 5.0));
        let result = target.extend(&[boundary], &p(4.0, 0.0)).unwrap();
        assert!((as_line(&result).end - p(10.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_extend_start_end() {
        let target = line(p(0.0, 0.0), p(5.0, 0.0));
        let boundary = line(p(-3.0, -5.0), p(-3.0, 5.0));
        let result = target.extend(&[boundary], &p(1.0, 0.0)).unwrap();
        let l = as_line(&result);
        assert!((l.start - p(-3.0, 0.0)).norm() < EPSILON);
        assert_eq!(l.end, p(5.0, 0.0));
    }

    #[test]
    fn test_extend_never_shortens() {
        let target = line(p(0.0, 0.0), p(5.0, 0.0));
        // 边界在线段中间
        let crossing = line(p(3.0, -5.0), p(3.0, 5.0));
        assert!(target.extend(&[crossing], &p(4.0, 0.0)).is_none());

        // 边界在另一侧
        let behind = line(p(10.0, -5.0), p(10.0, 5.0));
        assert!(target.extend(&[behind], &p(1.0, 0.0)).is_none());
    }

    #[test]
    fn test_extend_line_to_circle_picks_nearest() {
        let target = line(p(0.0, 0.0), p(2.0, 0.0));
        let circle = Entity::new(Geometry::Circle(Circle::new(p(10.0, 0.0), 3.0)));
        let result = target.extend(&[circle], &p(2.0, 0.0)).unwrap();
        assert!((as_line(&result).end - p(7.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_extend_line_to_arc_filters_sweep() {
        let target = line(p(0.0, 1.0), p(2.0, 1.0));
        let upper = Entity::new(Geometry::Arc(Arc::new(p(10.0, 0.0), 3.0, 0.0, PI)));
        let result = target.extend(&[upper], &p(2.0, 1.0)).unwrap();
        let expected_x = 10.0 - 8.0_f64.sqrt();
        assert!((as_line(&result).end - p(expected_x, 1.0)).norm() < 1e-9);

        let lower = Entity::new(Geometry::Arc(Arc::new(p(10.0, 0.0), 3.0, PI, 0.0)));
        assert!(target.extend(&[lower], &p(2.0, 1.0)).is_none());
    }

    #[test]
    fn test_only_first_compatible_boundary_is_used() {
        let target = line(p(0.0, 0.0), p(2.0, 0.0));
        let ellipse = Entity::new(Geometry::Ellipse(Ellipse::new(p(5.0, 0.0), 1.0, 1.0)));
        let far = line(p(20.0, -1.0), p(20.0, 1.0));
        let near = line(p(5.0, -1.0), p(5.0, 1.0));
        let result = target.extend(&[ellipse, far, near], &p(2.0, 0.0)).unwrap();
        assert!((as_line(&result).end - p(20.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_extend_line_to_rectangle_edge() {
        let target = line(p(0.0, 5.0), p(2.0, 5.0));
        let rect = Entity::new(Geometry::Rectangle(Rectangle::new(p(4.0, 10.0), p(8.0, 0.0))));
        let result = target.extend(&[rect], &p(2.0, 5.0)).unwrap();
        assert!((as_line(&result).end - p(4.0, 5.0)).norm() < EPSILON);
    }

    #[test]
    fn test_extend_arc_end() {
        let arc = Entity::new(Geometry::Arc(Arc::new(p(0.0, 0.0), 5.0, 0.0, FRAC_PI_2)));
        let boundary = line(p(-3.0, -10.0), p(-3.0, 10.0));
        let result = arc.extend(&[boundary.clone()], &p(0.0, 5.0)).unwrap();
        assert_eq!(result.id(), arc.id());
        let a = as_arc(&result);
        assert_eq!(a.start_angle, 0.0);
        assert!((a.end_point() - p(-3.0, 4.0)).norm() < 1e-9);

        // 点击起点一侧：起点顺时针后退到 (-3, -4)
        let result = arc.extend(&[boundary], &p(5.0, 0.0)).unwrap();
        let a = as_arc(&result);
        assert!((a.start_point() - p(-3.0, -4.0)).norm() < 1e-9);
        assert_eq!(a.end_angle, FRAC_PI_2);
    }

    #[test]
    fn test_extend_arc_to_circle() {
        let arc = Entity::new(Geometry::Arc(Arc::new(p(0.0, 0.0), 5.0, 0.0, FRAC_PI_2)));
        let circle = Entity::new(Geometry::Circle(Circle::new(p(-8.0, 0.0), 5.0)));
        let result = arc.extend(&[circle], &p(0.0, 5.0)).unwrap();
        assert!((as_arc(&result).end_point() - p(-4.0, 3.0)).norm() < 1e-9);
    }

    #[test]
    fn test_unsupported_variants() {
        let boundary = line(p(-10.0, 0.0), p(10.0, 0.0));
        let circle = Entity::new(Geometry::Circle(Circle::new(p(0.0, 0.0), 5.0)));
        assert!(circle.extend(&[boundary.clone()], &p(0.0, 5.0)).is_none());
        let rect = Entity::new(Geometry::Rectangle(Rectangle::new(p(0.0, 1.0), p(1.0, 0.0))));
        assert!(rect.extend(&[boundary], &p(0.0, 0.0)).is_none());
    }
}

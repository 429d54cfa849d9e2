//! 修剪：在交点处切断图元，保留点击所在的部分
//!
//! 修剪从不原地修改，结果是替换原实体的新实体（保留标识与属性），
//! 由调用方通过 [`Document::with_entities_replaced`](crate::document::Document::with_entities_replaced)
//! 一次性写回文档。

use crate::entity::Entity;
use crate::geometry::{is_degenerate_sweep, Arc, Circle, Geometry, Line};
use crate::intersection::find_intersections;
use crate::math::{angle_of, ccw_distance, points_equal, Point2, EPSILON, LENGTH_EPSILON};
use std::cmp::Ordering;

impl Entity {
    /// 用切割实体修剪，`click` 指示要保留的部分
    ///
    /// `intersections` 为空时自动计算与切割实体的交点。
    /// 只有 Line 和 Circle 可以修剪；其余类型或修剪无效时返回 `None`。
    pub fn trim(&self, cutter: &Entity, intersections: &[Point2], click: &Point2) -> Option<Entity> {
        let computed;
        let points = if intersections.is_empty() {
            computed = find_intersections(&self.geometry, &cutter.geometry);
            computed.as_slice()
        } else {
            intersections
        };

        let trimmed = match &self.geometry {
            Geometry::Line(line) => trim_line(line, points, click).map(Geometry::Line),
            Geometry::Circle(circle) => trim_circle(circle, points, click).map(Geometry::Arc),
            Geometry::Rectangle(_)
            | Geometry::Arc(_)
            | Geometry::Ellipse(_)
            | Geometry::Polyline(_)
            | Geometry::Spline(_) => None,
        };

        match &trimmed {
            Some(g) => tracing::debug!("Trimmed {} {} to {:?}", self.type_name(), self.id(), g),
            None => tracing::debug!(
                "{} {} not trimmed by {} ({} intersections)",
                self.type_name(),
                self.id(),
                cutter.id(),
                points.len()
            ),
        }

        trimmed.map(|g| self.with_geometry(g))
    }
}

fn trim_line(line: &Line, intersections: &[Point2], click: &Point2) -> Option<Line> {
    let cut = intersections
        .iter()
        .filter(|p| line.contains_point(p))
        .min_by(|a, b| {
            (*a - click)
                .norm()
                .partial_cmp(&(*b - click).norm())
                .unwrap_or(Ordering::Equal)
        })?;

    let keep_start = (click - line.start).norm() <= (click - line.end).norm();
    let result = if keep_start {
        Line::new(line.start, *cut)
    } else {
        Line::new(*cut, line.end)
    };

    if result.length() < LENGTH_EPSILON {
        return None;
    }
    if points_equal(&result.start, &line.start) && points_equal(&result.end, &line.end) {
        return None;
    }
    Some(result)
}

fn trim_circle(circle: &Circle, intersections: &[Point2], click: &Point2) -> Option<Arc> {
    let mut angles: Vec<f64> = intersections
        .iter()
        .map(|p| angle_of(&circle.center, p))
        .collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    angles.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
    if angles.len() < 2 {
        return None;
    }

    let click_angle = angle_of(&circle.center, click);
    // 相邻交点（首尾相接）围成的区间中，找包含点击角度的那一段
    let (start, end) = angles
        .iter()
        .zip(angles.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
        .find(|(a, b)| ccw_distance(*a, click_angle) <= ccw_distance(*a, *b))?;

    if is_degenerate_sweep(ccw_distance(start, end)) {
        return None;
    }
    Some(Arc::new(circle.center, circle.radius, start, end))
}

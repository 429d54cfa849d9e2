//! 对象捕捉系统
//!
//! 参考 LibreCAD 的设计，实现 CAD 标准的对象捕捉功能。
//!
//! 支持的捕捉类型（按优先级从低到高）：
//! - 网格点 (Grid)
//! - 最近点 (Nearest)
//! - 中点 (Midpoint)
//! - 象限点 (Quadrant)
//! - 圆心 (Center)
//! - 切点 (Tangent)
//! - 垂足 (Perpendicular)
//! - 端点 (Endpoint)
//! - 交点 (Intersection)
//!
//! 多个候选同时落在容差内时，先比较优先级，优先级相同再比较到光标的距离。

use crate::document::Document;
use crate::entity::{Entity, EntityId};
use crate::geometry::Geometry;
use crate::intersection::find_intersections;
use crate::math::Point2;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 捕捉类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapType {
    /// 端点捕捉
    Endpoint,
    /// 中点捕捉
    Midpoint,
    /// 圆心捕捉
    Center,
    /// 交点捕捉
    Intersection,
    /// 垂足捕捉
    Perpendicular,
    /// 切点捕捉
    Tangent,
    /// 最近点捕捉
    Nearest,
    /// 网格点捕捉
    Grid,
    /// 象限点（圆/椭圆的0°, 90°, 180°, 270°位置）
    Quadrant,
}

impl SnapType {
    pub const ALL: [SnapType; 9] = [
        SnapType::Grid,
        SnapType::Nearest,
        SnapType::Midpoint,
        SnapType::Quadrant,
        SnapType::Center,
        SnapType::Tangent,
        SnapType::Perpendicular,
        SnapType::Endpoint,
        SnapType::Intersection,
    ];

    /// 优先级，数值越大越优先
    pub fn priority(&self) -> u8 {
        match self {
            SnapType::Grid => 0,
            SnapType::Nearest => 1,
            SnapType::Midpoint => 2,
            SnapType::Quadrant => 3,
            SnapType::Center => 4,
            SnapType::Tangent => 5,
            SnapType::Perpendicular => 6,
            SnapType::Endpoint => 7,
            SnapType::Intersection => 8,
        }
    }

    /// 获取捕捉类型的名称
    pub fn name(&self) -> &'static str {
        match self {
            SnapType::Endpoint => "端点",
            SnapType::Midpoint => "中点",
            SnapType::Center => "圆心",
            SnapType::Intersection => "交点",
            SnapType::Perpendicular => "垂足",
            SnapType::Tangent => "切点",
            SnapType::Nearest => "最近点",
            SnapType::Grid => "网格点",
            SnapType::Quadrant => "象限点",
        }
    }

    /// 获取捕捉类型的快捷键
    pub fn shortcut(&self) -> &'static str {
        match self {
            SnapType::Endpoint => "END",
            SnapType::Midpoint => "MID",
            SnapType::Center => "CEN",
            SnapType::Intersection => "INT",
            SnapType::Perpendicular => "PER",
            SnapType::Tangent => "TAN",
            SnapType::Nearest => "NEA",
            SnapType::Grid => "GRI",
            SnapType::Quadrant => "QUA",
        }
    }
}

/// 捕捉结果
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// 捕捉到的世界坐标
    pub point: Point2,
    /// 捕捉类型
    pub snap_type: SnapType,
    /// 显示给用户的提示
    pub label: &'static str,
    /// 来源实体（仅用于高亮查找，不持有实体）
    pub entity_id: Option<EntityId>,
}

impl SnapResult {
    pub fn new(point: Point2, snap_type: SnapType, entity_id: Option<EntityId>) -> Self {
        Self {
            point,
            snap_type,
            label: snap_type.name(),
            entity_id,
        }
    }

    pub fn distance_to(&self, cursor: &Point2) -> f64 {
        (self.point - cursor).norm()
    }
}

/// 捕捉掩码（位域，用于快速启用/禁用捕捉类型）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapMask {
    bits: u16,
}

impl SnapMask {
    pub const ENDPOINT: u16 = 1 << 0;
    pub const MIDPOINT: u16 = 1 << 1;
    pub const CENTER: u16 = 1 << 2;
    pub const INTERSECTION: u16 = 1 << 3;
    pub const PERPENDICULAR: u16 = 1 << 4;
    pub const TANGENT: u16 = 1 << 5;
    pub const NEAREST: u16 = 1 << 6;
    pub const GRID: u16 = 1 << 7;
    pub const QUADRANT: u16 = 1 << 8;

    pub const NONE: SnapMask = SnapMask { bits: 0 };
    pub const ALL: SnapMask = SnapMask { bits: 0x01FF };

    pub fn new(bits: u16) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    fn bit(snap_type: SnapType) -> u16 {
        match snap_type {
            SnapType::Endpoint => Self::ENDPOINT,
            SnapType::Midpoint => Self::MIDPOINT,
            SnapType::Center => Self::CENTER,
            SnapType::Intersection => Self::INTERSECTION,
            SnapType::Perpendicular => Self::PERPENDICULAR,
            SnapType::Tangent => Self::TANGENT,
            SnapType::Nearest => Self::NEAREST,
            SnapType::Grid => Self::GRID,
            SnapType::Quadrant => Self::QUADRANT,
        }
    }

    pub fn is_enabled(&self, snap_type: SnapType) -> bool {
        self.bits & Self::bit(snap_type) != 0
    }

    pub fn set(&mut self, snap_type: SnapType, enabled: bool) {
        let bit = Self::bit(snap_type);
        if enabled {
            self.bits |= bit;
        } else {
            self.bits &= !bit;
        }
    }

    pub fn toggle(&mut self, snap_type: SnapType) {
        let enabled = self.is_enabled(snap_type);
        self.set(snap_type, !enabled);
    }
}

impl Default for SnapMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// 捕捉设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// 总开关
    pub enabled: bool,
    /// 启用的捕捉类型
    pub enabled_types: SnapMask,
    /// 捕捉半径（屏幕像素）
    pub distance: f64,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            enabled_types: SnapMask::default(),
            distance: 10.0, // 10像素
        }
    }
}

/// 捕捉引擎
///
/// 无内部状态：每次查询都只依赖传入的文档、光标与缩放。
#[derive(Debug, Clone, Default)]
pub struct SnapEngine {
    settings: SnapSettings,
}

impl SnapEngine {
    pub fn new(settings: SnapSettings) -> Self {
        Self { settings }
    }

    /// 获取设置
    pub fn settings(&self) -> &SnapSettings {
        &self.settings
    }

    /// 获取设置（可变）
    pub fn settings_mut(&mut self) -> &mut SnapSettings {
        &mut self.settings
    }

    fn enabled(&self, snap_type: SnapType) -> bool {
        self.settings.enabled_types.is_enabled(snap_type)
    }

    /// 查找并选出最佳捕捉点
    pub fn snap(&self, cursor: Point2, document: &Document, scale: f64) -> Option<SnapResult> {
        let results = self.find_snap_points(cursor, document, scale);
        let best = self.find_best_snap_point(&results, cursor);
        if let Some(snap) = &best {
            tracing::debug!(
                "Snapped to {} at ({:.3}, {:.3}) from {} candidates",
                snap.snap_type.shortcut(),
                snap.point.x,
                snap.point.y,
                results.len()
            );
        }
        best
    }

    /// 收集容差范围内的所有候选捕捉点
    ///
    /// # 参数
    /// - `cursor`: 光标的世界坐标
    /// - `document`: 只搜索其中的可见实体
    /// - `scale`: 当前缩放（每世界单位的像素数），用于把屏幕容差换算到世界坐标
    pub fn find_snap_points(&self, cursor: Point2, document: &Document, scale: f64) -> Vec<SnapResult> {
        if !self.settings.enabled || scale <= 0.0 {
            return vec![];
        }

        // 世界坐标容差
        let tolerance = self.settings.distance / scale;
        let mut candidates = Vec::with_capacity(64);

        // 1. 网格捕捉
        if self.enabled(SnapType::Grid) && document.snap_to_grid() {
            if let Some(snap) = snap_to_grid(cursor, document.grid_size(), tolerance) {
                candidates.push(snap);
            }
        }

        // 2. 逐个实体收集捕捉点，只看边界离光标不超过两倍容差的实体
        let visible: Vec<&Entity> = document.visible_entities().collect();
        for entity in &visible {
            if entity.geometry.distance_to_point(&cursor) > 2.0 * tolerance {
                continue;
            }
            self.collect_entity_snap_points(entity, cursor, tolerance, &mut candidates);
        }

        // 3. 交点捕捉（需要成对的实体）
        if self.enabled(SnapType::Intersection) {
            collect_intersection_points(&visible, cursor, tolerance, &mut candidates);
        }

        candidates
    }

    /// 选出最佳捕捉点：优先级最高者胜出，同优先级取离光标最近者
    pub fn find_best_snap_point(&self, results: &[SnapResult], cursor: Point2) -> Option<SnapResult> {
        results
            .iter()
            .min_by(|a, b| {
                b.snap_type
                    .priority()
                    .cmp(&a.snap_type.priority())
                    .then_with(|| {
                        a.distance_to(&cursor)
                            .partial_cmp(&b.distance_to(&cursor))
                            .unwrap_or(Ordering::Equal)
                    })
            })
            .cloned()
    }

    /// 收集单个实体的捕捉点
    fn collect_entity_snap_points(
        &self,
        entity: &Entity,
        cursor: Point2,
        tolerance: f64,
        out: &mut Vec<SnapResult>,
    ) {
        let id = entity.id();
        let mut push = |point: Point2, snap_type: SnapType| {
            if (point - cursor).norm() <= tolerance {
                out.push(SnapResult::new(point, snap_type, Some(id.clone())));
            }
        };

        // 特征点：端点、中点、圆心、象限点
        for (snap_type, point) in entity.snap_anchors() {
            if self.enabled(snap_type) {
                push(point, snap_type);
            }
        }

        match &entity.geometry {
            Geometry::Line(line) => {
                // 垂足：光标在线段上的投影，超出两端时夹到端点
                if self.enabled(SnapType::Perpendicular) {
                    push(line.nearest_point(&cursor), SnapType::Perpendicular);
                }
            }
            Geometry::Circle(circle) => {
                if self.enabled(SnapType::Tangent) {
                    for tangent in circle.tangent_points(&cursor) {
                        push(tangent, SnapType::Tangent);
                    }
                }
            }
            Geometry::Arc(arc) => {
                if self.enabled(SnapType::Tangent) {
                    for tangent in arc.circle().tangent_points(&cursor) {
                        if arc.contains_point(&tangent) {
                            push(tangent, SnapType::Tangent);
                        }
                    }
                }
            }
            _ => {}
        }

        // 最近点
        if self.enabled(SnapType::Nearest) {
            match &entity.geometry {
                Geometry::Line(_)
                | Geometry::Circle(_)
                | Geometry::Arc(_)
                | Geometry::Rectangle(_)
                | Geometry::Polyline(_) => {
                    push(entity.geometry.nearest_point(&cursor), SnapType::Nearest);
                }
                Geometry::Ellipse(_) | Geometry::Spline(_) => {}
            }
        }
    }
}

/// 收集交点
fn collect_intersection_points(
    entities: &[&Entity],
    cursor: Point2,
    tolerance: f64,
    out: &mut Vec<SnapResult>,
) {
    // 双重循环检查所有实体对
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            for point in find_intersections(&entities[i].geometry, &entities[j].geometry) {
                if (point - cursor).norm() <= tolerance {
                    // 交点涉及两个实体，记录第一个用于高亮
                    out.push(SnapResult::new(
                        point,
                        SnapType::Intersection,
                        Some(entities[i].id().clone()),
                    ));
                }
            }
        }
    }
}

/// 网格捕捉
fn snap_to_grid(cursor: Point2, spacing: f64, tolerance: f64) -> Option<SnapResult> {
    if spacing <= 0.0 {
        return None;
    }

    let grid_x = (cursor.x / spacing).round() * spacing;
    let grid_y = (cursor.y / spacing).round() * spacing;
    let grid_point = Point2::new(grid_x, grid_y);

    if (grid_point - cursor).norm() <= tolerance {
        Some(SnapResult::new(grid_point, SnapType::Grid, None))
    } else {
        None
    }
}

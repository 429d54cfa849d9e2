//! 修剪 Action

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use planar_core::entity::EntityId;
use planar_core::geometry::Geometry;
use planar_core::intersection::find_intersections;
use planar_core::math::Point2;

/// 修剪状态
#[derive(Debug, Clone, PartialEq)]
enum Status {
    /// 等待选择剪切边
    SelectCutter,
    /// 等待选择要修剪的对象
    SelectTarget { cutter: EntityId },
    /// 等待指定保留的部分
    SelectPortion {
        cutter: EntityId,
        target: EntityId,
        intersections: Vec<Point2>,
    },
}

/// 修剪 Action
///
/// 剪切边 -> 目标（线段或圆，且与剪切边相交）-> 保留部分。
/// 完成一次修剪后回到选择目标，剪切边保持不变。
pub struct TrimAction {
    status: Status,
}

impl TrimAction {
    pub fn new() -> Self {
        Self {
            status: Status::SelectCutter,
        }
    }

    /// 已选的剪切边
    pub fn cutter(&self) -> Option<&EntityId> {
        match &self.status {
            Status::SelectCutter => None,
            Status::SelectTarget { cutter } | Status::SelectPortion { cutter, .. } => Some(cutter),
        }
    }

    /// 目标与剪切边的交点
    pub fn pending_intersections(&self) -> &[Point2] {
        match &self.status {
            Status::SelectPortion { intersections, .. } => intersections,
            _ => &[],
        }
    }

    fn select_cutter(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult {
        let Some(cutter) = ctx.pick_entity(&point) else {
            return ActionResult::NeedSelection;
        };
        tracing::debug!("Trim cutter: {} {}", cutter.type_name(), cutter.id());
        self.status = Status::SelectTarget {
            cutter: cutter.id().clone(),
        };
        ActionResult::Continue
    }

    fn select_target(&mut self, ctx: &ActionContext, cutter_id: EntityId, point: Point2) -> ActionResult {
        let Some(cutter) = ctx.document.entity(&cutter_id) else {
            self.reset();
            return ActionResult::NeedSelection;
        };
        let Some(target) = ctx.pick_entity(&point) else {
            return ActionResult::NeedSelection;
        };
        if target.id() == cutter.id() {
            return ActionResult::NeedSelection;
        }
        if !matches!(target.geometry, Geometry::Line(_) | Geometry::Circle(_)) {
            tracing::debug!("{} cannot be trimmed", target.type_name());
            return ActionResult::NeedSelection;
        }

        let intersections = find_intersections(&target.geometry, &cutter.geometry);
        if intersections.is_empty() {
            tracing::debug!("{} does not intersect the cutter", target.id());
            return ActionResult::NeedSelection;
        }

        self.status = Status::SelectPortion {
            cutter: cutter_id,
            target: target.id().clone(),
            intersections,
        };
        ActionResult::Continue
    }

    fn select_portion(
        &mut self,
        ctx: &ActionContext,
        cutter_id: EntityId,
        target_id: EntityId,
        intersections: Vec<Point2>,
        point: Point2,
    ) -> ActionResult {
        let (Some(cutter), Some(target)) = (
            ctx.document.entity(&cutter_id),
            ctx.document.entity(&target_id),
        ) else {
            self.reset();
            return ActionResult::NeedSelection;
        };

        match target.trim(cutter, &intersections, &point) {
            Some(trimmed) => {
                self.status = Status::SelectTarget { cutter: cutter_id };
                ActionResult::ReplaceEntities {
                    id: target_id,
                    replacements: vec![trimmed],
                }
            }
            None => {
                self.status = Status::SelectPortion {
                    cutter: cutter_id,
                    target: target_id,
                    intersections,
                };
                ActionResult::NeedSelection
            }
        }
    }
}

impl Default for TrimAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for TrimAction {
    fn action_type(&self) -> ActionType {
        ActionType::Trim
    }

    fn reset(&mut self) {
        self.status = Status::SelectCutter;
    }

    fn is_idle(&self) -> bool {
        self.status == Status::SelectCutter
    }

    fn on_pick(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult {
        match std::mem::replace(&mut self.status, Status::SelectCutter) {
            Status::SelectCutter => self.select_cutter(ctx, point),
            Status::SelectTarget { cutter } => {
                // 未命中时保持当前步骤
                self.status = Status::SelectTarget {
                    cutter: cutter.clone(),
                };
                self.select_target(ctx, cutter, point)
            }
            Status::SelectPortion {
                cutter,
                target,
                intersections,
            } => self.select_portion(ctx, cutter, target, intersections, point),
        }
    }

    fn get_prompt(&self) -> &str {
        match self.status {
            Status::SelectCutter => "选择剪切边:",
            Status::SelectTarget { .. } => "选择要修剪的对象:",
            Status::SelectPortion { .. } => "指定要保留的部分:",
        }
    }

    fn get_preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry> {
        let mut previews = Vec::new();

        if let Some(cutter) = self.cutter().and_then(|id| ctx.document.entity(id)) {
            previews.push(PreviewGeometry::reference(cutter.geometry.clone()));
        }
        if let Status::SelectPortion { target, .. } = &self.status {
            if let Some(target) = ctx.document.entity(target) {
                previews.push(PreviewGeometry::new(target.geometry.clone()));
            }
        }

        previews
    }
}

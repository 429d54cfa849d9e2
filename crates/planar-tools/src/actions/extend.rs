//! 延伸 Action

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use planar_core::entity::EntityId;
use planar_core::math::Point2;

/// 延伸状态
#[derive(Debug, Clone, PartialEq)]
enum Status {
    /// 等待选择边界
    SelectBoundary,
    /// 等待选择要延伸的对象（可连续选择多个）
    SelectTarget { boundary: EntityId },
}

/// 延伸 Action
pub struct ExtendAction {
    status: Status,
}

impl ExtendAction {
    pub fn new() -> Self {
        Self {
            status: Status::SelectBoundary,
        }
    }

    pub fn boundary(&self) -> Option<&EntityId> {
        match &self.status {
            Status::SelectBoundary => None,
            Status::SelectTarget { boundary } => Some(boundary),
        }
    }
}

impl Default for ExtendAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for ExtendAction {
    fn action_type(&self) -> ActionType {
        ActionType::Extend
    }

    fn reset(&mut self) {
        self.status = Status::SelectBoundary;
    }

    fn is_idle(&self) -> bool {
        self.status == Status::SelectBoundary
    }

    fn on_pick(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult {
        match self.status.clone() {
            Status::SelectBoundary => {
                let Some(boundary) = ctx.pick_entity(&point) else {
                    return ActionResult::NeedSelection;
                };
                tracing::debug!("Extend boundary: {} {}", boundary.type_name(), boundary.id());
                self.status = Status::SelectTarget {
                    boundary: boundary.id().clone(),
                };
                ActionResult::Continue
            }
            Status::SelectTarget { boundary } => {
                let Some(boundary) = ctx.document.entity(&boundary) else {
                    self.reset();
                    return ActionResult::NeedSelection;
                };
                let Some(target) = ctx.pick_entity(&point) else {
                    return ActionResult::NeedSelection;
                };
                if target.id() == boundary.id() {
                    return ActionResult::NeedSelection;
                }

                match target.extend(std::slice::from_ref(boundary), &point) {
                    Some(extended) => ActionResult::ReplaceEntities {
                        id: target.id().clone(),
                        replacements: vec![extended],
                    },
                    None => ActionResult::NeedSelection,
                }
            }
        }
    }

    fn get_prompt(&self) -> &str {
        match self.status {
            Status::SelectBoundary => "选择边界:",
            Status::SelectTarget { .. } => "选择要延伸的对象:",
        }
    }

    fn get_preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry> {
        self.boundary()
            .and_then(|id| ctx.document.entity(id))
            .map(|b| vec![PreviewGeometry::reference(b.geometry.clone())])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::MouseButton;
    use planar_core::document::Document;
    use planar_core::entity::Entity;
    use planar_core::geometry::{Arc, Circle, Geometry, Line};
    use planar_core::math::EPSILON;
    use planar_core::transform::ViewTransform;
    use std::f64::consts::FRAC_PI_2;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn pick(action: &mut ExtendAction, doc: &Document, point: Point2) -> ActionResult {
        let view = ViewTransform::default();
        let ctx = ActionContext::new(doc, &view, 2.0, point);
        action.on_mouse_click(&ctx, MouseButton::Left)
    }

    #[test]
    fn test_extend_several_targets() {
        let boundary = Entity::new(Geometry::Line(Line::new(p(10.0, -20.0), p(10.0, 20.0))));
        let a = Entity::new(Geometry::Line(Line::new(p(0.0, 0.0), p(5.0, 0.0))));
        let b = Entity::new(Geometry::Line(Line::new(p(0.0, 5.0), p(4.0, 5.0))));
        let mut doc = Document::new()
            .with_entity(boundary.clone())
            .with_entity(a.clone())
            .with_entity(b.clone());
        let mut action = ExtendAction::new();

        assert_eq!(pick(&mut action, &doc, p(10.0, 15.0)), ActionResult::Continue);
        assert_eq!(action.boundary(), Some(boundary.id()));

        for (target, at) in [(&a, p(4.0, 0.0)), (&b, p(3.5, 5.0))] {
            let result = pick(&mut action, &doc, at);
            doc = result.apply(&doc).unwrap();
            match &doc.entity(target.id()).unwrap().geometry {
                Geometry::Line(l) => assert!((l.end.x - 10.0).abs() < EPSILON),
                other => panic!("expected line, got {}", other.type_name()),
            }
        }
        assert!(!action.is_idle());
    }

    #[test]
    fn test_extend_arc_to_circle() {
        let boundary = Entity::new(Geometry::Circle(Circle::new(p(-8.0, 0.0), 5.0)));
        let arc = Entity::new(Geometry::Arc(Arc::new(p(0.0, 0.0), 5.0, 0.0, FRAC_PI_2)));
        let doc = Document::new()
            .with_entity(boundary)
            .with_entity(arc.clone());
        let mut action = ExtendAction::new();

        pick(&mut action, &doc, p(-13.0, 0.0));
        let result = pick(&mut action, &doc, p(0.0, 5.0));
        let edited = result.apply(&doc).unwrap();
        match &edited.entity(arc.id()).unwrap().geometry {
            Geometry::Arc(a) => {
                let end = a.end_point();
                assert!((end - p(-4.0, 3.0)).norm() < 1e-9);
            }
            other => panic!("expected arc, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_circle_cannot_be_extended() {
        let boundary = Entity::new(Geometry::Line(Line::new(p(10.0, -20.0), p(10.0, 20.0))));
        let circle = Entity::new(Geometry::Circle(Circle::new(p(0.0, 0.0), 2.0)));
        let doc = Document::new().with_entity(boundary).with_entity(circle);
        let mut action = ExtendAction::new();

        pick(&mut action, &doc, p(10.0, 0.0));
        assert_eq!(pick(&mut action, &doc, p(2.0, 0.0)), ActionResult::NeedSelection);
        assert_eq!(action.get_prompt(), "选择要延伸的对象:");
    }
}

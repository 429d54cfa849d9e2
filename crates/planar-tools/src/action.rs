//! Action 系统 - 状态机式的编辑工具
//!
//! 每个编辑工具是一个独立的 Action 实现，采用状态机模式处理用户的逐次拾取。
//! 工具只保存继续交互所需的数据（已选实体的标识、待用的交点），
//! 文档本身不知道任何"进行中"的操作。

use planar_core::document::Document;
use planar_core::entity::{Entity, EntityId};
use planar_core::geometry::Geometry;
use planar_core::math::Point2;
use planar_core::transform::ViewTransform;

/// Action 执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// 继续当前 action
    Continue,
    /// 以新实体替换指定实体（修剪/延伸的结果）
    ReplaceEntities {
        id: EntityId,
        replacements: Vec<Entity>,
    },
    /// 取消当前 action
    Cancel,
    /// 需要重新选择实体（未拾取到，或拾取的实体不可用）
    NeedSelection,
}

impl ActionResult {
    /// 把结果写回文档；不修改文档的结果返回 `None`
    pub fn apply(&self, document: &Document) -> Option<Document> {
        match self {
            ActionResult::ReplaceEntities { id, replacements } => {
                Some(document.with_entities_replaced(id, replacements.clone()))
            }
            ActionResult::Continue | ActionResult::Cancel | ActionResult::NeedSelection => None,
        }
    }

    pub fn modifies_document(&self) -> bool {
        matches!(self, ActionResult::ReplaceEntities { .. })
    }
}

/// Action 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Trim,
    Extend,
}

impl ActionType {
    pub const ALL: [ActionType; 2] = [ActionType::Trim, ActionType::Extend];

    /// 获取 action 的名称
    pub fn name(&self) -> &'static str {
        match self {
            ActionType::Trim => "Trim",
            ActionType::Extend => "Extend",
        }
    }

    /// 获取快捷命令
    pub fn shortcut(&self) -> &'static str {
        match self {
            ActionType::Trim => "TR",
            ActionType::Extend => "EX",
        }
    }

    /// 按完整命令或快捷命令查找（不区分大小写）
    pub fn from_command(input: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| {
            input.eq_ignore_ascii_case(action.name()) || input.eq_ignore_ascii_case(action.shortcut())
        })
    }
}

/// Action 上下文 - 传递给 Action 的运行时信息
pub struct ActionContext<'a> {
    /// 当前文档（只读快照）
    pub document: &'a Document,
    /// 视图变换，用于拾取
    pub view: &'a ViewTransform,
    /// 拾取容差（屏幕像素）
    pub tolerance: f64,
    /// 鼠标世界坐标
    pub mouse_pos: Point2,
    /// 捕捉后的坐标（如果有）
    pub snap_pos: Option<Point2>,
}

impl<'a> ActionContext<'a> {
    pub fn new(document: &'a Document, view: &'a ViewTransform, tolerance: f64, mouse_pos: Point2) -> Self {
        Self {
            document,
            view,
            tolerance,
            mouse_pos,
            snap_pos: None,
        }
    }

    pub fn with_snap(self, snap_pos: Option<Point2>) -> Self {
        Self { snap_pos, ..self }
    }

    /// 获取有效点（优先使用捕捉点）
    pub fn effective_point(&self) -> Point2 {
        self.snap_pos.unwrap_or(self.mouse_pos)
    }

    /// 拾取世界坐标处最上层的可见实体
    pub fn pick_entity(&self, point: &Point2) -> Option<&'a Entity> {
        let screen = self.view.world_to_screen(point);
        self.document.hit_test(&screen, self.view, self.tolerance)
    }
}

/// 预览几何体
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewGeometry {
    pub geometry: Geometry,
    pub is_reference: bool, // 是否是参考线（虚线显示）
}

impl PreviewGeometry {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            is_reference: false,
        }
    }

    pub fn reference(geometry: Geometry) -> Self {
        Self {
            geometry,
            is_reference: true,
        }
    }
}

/// 鼠标按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Action trait - 所有编辑工具的核心接口
pub trait Action: Send {
    /// 获取 action 类型
    fn action_type(&self) -> ActionType;

    /// 获取 action 名称
    fn name(&self) -> &str {
        self.action_type().name()
    }

    /// 重置 action 状态
    fn reset(&mut self);

    /// 是否处于第一步（没有待用的选择）
    fn is_idle(&self) -> bool;

    /// 拾取一个世界坐标点
    fn on_pick(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult;

    /// 鼠标点击事件：左键拾取，右键回到第一步或取消
    fn on_mouse_click(&mut self, ctx: &ActionContext, button: MouseButton) -> ActionResult {
        match button {
            MouseButton::Left => self.on_pick(ctx, ctx.effective_point()),
            MouseButton::Right => {
                if self.is_idle() {
                    ActionResult::Cancel
                } else {
                    self.reset();
                    ActionResult::Continue
                }
            }
            MouseButton::Middle => ActionResult::Continue,
        }
    }

    /// 获取当前状态的提示文本
    fn get_prompt(&self) -> &str;

    /// 获取预览几何体（已选实体的高亮）
    fn get_preview(&self, _ctx: &ActionContext) -> Vec<PreviewGeometry> {
        vec![]
    }
}

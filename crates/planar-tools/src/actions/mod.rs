//! 具体的 Action 实现
//!
//! 每个编辑工具对应一个 Action 实现

mod extend;
mod trim;

pub use extend::ExtendAction;
pub use trim::TrimAction;

use crate::action::{Action, ActionType};

/// 创建指定类型的 Action
pub fn create_action(action_type: ActionType) -> Box<dyn Action> {
    match action_type {
        ActionType::Trim => Box::new(TrimAction::new()),
        ActionType::Extend => Box::new(ExtendAction::new()),
    }
}

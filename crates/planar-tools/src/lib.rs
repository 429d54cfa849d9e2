//! Planar 编辑工具
//!
//! 修剪、延伸等多步交互的状态机。工具通过 `ActionContext` 读取文档快照，
//! 以 `ActionResult` 返回要写回的修改。

pub mod action;
pub mod actions;

pub use action::{Action, ActionContext, ActionResult, ActionType, MouseButton, PreviewGeometry};
pub use actions::{create_action, ExtendAction, TrimAction};

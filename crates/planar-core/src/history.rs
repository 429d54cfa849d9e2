//! 撤销/重做历史
//!
//! 文档是不可变值，历史只需保存完整的文档快照。
//! 两个栈都有容量上限，超出时丢弃最旧的快照。

use crate::document::Document;
use std::collections::VecDeque;

/// 默认历史容量
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Document>,
    redo_stack: VecDeque<Document>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 在修改文档前记录当前快照，清空重做栈
    pub fn record(&mut self, snapshot: Document) {
        push_bounded(&mut self.undo_stack, snapshot, self.capacity);
        self.redo_stack.clear();
    }

    /// 撤销：返回上一个快照，当前文档进入重做栈
    pub fn undo(&mut self, current: Document) -> Option<Document> {
        let previous = self.undo_stack.pop_back()?;
        push_bounded(&mut self.redo_stack, current, self.capacity);
        tracing::debug!("Undo, {} steps left", self.undo_stack.len());
        Some(previous)
    }

    /// 重做：返回下一个快照，当前文档进入撤销栈
    pub fn redo(&mut self, current: Document) -> Option<Document> {
        let next = self.redo_stack.pop_back()?;
        push_bounded(&mut self.undo_stack, current, self.capacity);
        tracing::debug!("Redo, {} steps left", self.redo_stack.len());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

fn push_bounded(stack: &mut VecDeque<Document>, doc: Document, capacity: usize) {
    if stack.len() >= capacity {
        stack.pop_front();
    }
    stack.push_back(doc);
}

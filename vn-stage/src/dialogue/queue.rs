//! # Queue 模块
//!
//! 待展示对话的先进先出队列。

use std::collections::VecDeque;

use super::node::DialogueNode;

/// 对话队列
#[derive(Debug, Clone, Default)]
pub struct DialogueQueue {
    nodes: VecDeque<DialogueNode>,
}

impl DialogueQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加到队尾
    pub fn push(&mut self, node: DialogueNode) {
        self.nodes.push_back(node);
    }

    /// 取出队首
    pub fn pop(&mut self) -> Option<DialogueNode> {
        self.nodes.pop_front()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Extend<DialogueNode> for DialogueQueue {
    fn extend<T: IntoIterator<Item = DialogueNode>>(&mut self, iter: T) {
        self.nodes.extend(iter);
    }
}

//! # Node 模块
//!
//! 对话节点与选项。

use serde::{Deserialize, Serialize};

/// 对话选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueChoice {
    /// 选项文本
    pub text: String,
    /// 目标对话标识（含义由调用方定义，引擎不解析）
    pub next_dialogue_id: i32,
}

impl DialogueChoice {
    pub fn new(text: impl Into<String>, next_dialogue_id: i32) -> Self {
        Self {
            text: text.into(),
            next_dialogue_id,
        }
    }
}

/// 对话节点
///
/// `has_choices` 为 `false` 时，`choices` 中的内容被忽略。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogueNode {
    /// 说话者（空字符串表示不显示名字）
    #[serde(default)]
    pub speaker: String,
    /// 正文
    pub text: String,
    /// 选项列表
    #[serde(default)]
    pub choices: Vec<DialogueChoice>,
    /// 是否启用选项
    #[serde(default)]
    pub has_choices: bool,
}

impl DialogueNode {
    /// 创建不带选项的节点
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            choices: Vec::new(),
            has_choices: false,
        }
    }

    /// 创建旁白节点（无说话者）
    pub fn narration(text: impl Into<String>) -> Self {
        Self::new(String::new(), text)
    }

    /// 附加选项并启用
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = DialogueChoice>) -> Self {
        self.choices = choices.into_iter().collect();
        self.has_choices = true;
        self
    }

    /// 生效的选项（`has_choices` 为 `false` 时为空）
    pub fn active_choices(&self) -> &[DialogueChoice] {
        if self.has_choices {
            self.choices.as_slice()
        } else {
            &[]
        }
    }

    /// 是否显示说话者
    pub fn has_speaker(&self) -> bool {
        !self.speaker.is_empty()
    }

    /// 正文长度（字符数）
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

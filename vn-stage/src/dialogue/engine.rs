//! # Engine 模块
//!
//! 对话状态机。
//!
//! ## 状态
//!
//! ```text
//! Idle             -> 没有正在展示的节点
//! Typing           -> 正在逐字显示正文
//! AwaitingAdvance  -> 正文显示完毕，等待推进
//! AwaitingChoice   -> 正文显示完毕，等待选择
//! ```
//!
//! ## 状态转换
//!
//! ```text
//! Idle            --start_dialogue (队列非空)--> Typing
//! Typing          --update 显示完毕 / next_dialogue--> AwaitingAdvance | AwaitingChoice
//! AwaitingAdvance --next_dialogue--> Typing (队列非空) | Idle
//! AwaitingChoice  --select_choice(合法下标)--> Typing (队列非空) | Idle
//! ```

use tracing::{debug, info, trace};

use super::layout::DialogueLayout;
use super::node::{DialogueChoice, DialogueNode};
use super::queue::DialogueQueue;
use super::typewriter::Typewriter;
use crate::error::StageResult;
use crate::geometry::{Color, Point, RectF};
use crate::surface::DrawSurface;
use crate::typeface::{FontSource, Typeface, TypefaceLoader, load_first_available};

/// 对话引擎状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialoguePhase {
    Idle,
    Typing,
    AwaitingAdvance,
    AwaitingChoice,
}

/// 对话引擎
///
/// 持有待展示队列与当前节点。当前节点是从队列中取出的独立副本，
/// `current` 为 `None` 即引擎处于 Idle。
#[derive(Debug)]
pub struct DialogueEngine {
    typeface: Typeface,
    layout: DialogueLayout,
    queue: DialogueQueue,
    current: Option<DialogueNode>,
    typewriter: Typewriter,
    is_typing: bool,
}

impl DialogueEngine {
    /// 依次尝试候选字体并创建引擎
    ///
    /// 所有候选都无法加载时返回错误，调用方应中止启动。
    pub fn initialize(
        loader: &dyn TypefaceLoader,
        candidates: &[FontSource],
        layout: DialogueLayout,
    ) -> StageResult<Self> {
        let typeface = load_first_available(loader, candidates, layout.font_size)?;
        Ok(Self::with_typeface(typeface, layout))
    }

    /// 使用已加载的字体创建引擎
    pub fn with_typeface(typeface: Typeface, layout: DialogueLayout) -> Self {
        Self {
            typeface,
            layout,
            queue: DialogueQueue::new(),
            current: None,
            typewriter: Typewriter::default(),
            is_typing: false,
        }
    }

    /// 关闭对话引擎
    ///
    /// 按值消费引擎：记录关闭日志后引擎被 drop，字体数据与未展示的对话随之释放。
    /// 之后无法再调用任何操作。
    pub fn shutdown(self) {
        info!(
            typeface = self.typeface.name(),
            pending = self.queue.len(),
            "对话引擎关闭"
        );
    }

    /// 追加对话到队尾（任何状态下都可以调用）
    pub fn add_dialogue(&mut self, node: DialogueNode) {
        self.queue.push(node);
    }

    /// 取出队首节点开始展示；队列为空时不做任何事
    pub fn start_dialogue(&mut self) {
        let Some(node) = self.queue.pop() else {
            trace!("对话队列为空，忽略 start_dialogue");
            return;
        };

        debug!(speaker = %node.speaker, chars = node.char_len(), "开始对话");
        self.typewriter.reset();
        // 空正文没有可显示的字符，直接视为显示完毕
        self.is_typing = !node.text.is_empty();
        self.current = Some(node);
    }

    /// 推进命令
    ///
    /// - Typing：立即显示全文（不会在同一次调用中进入下一句）
    /// - AwaitingAdvance：进入下一句，队列为空时结束
    /// - AwaitingChoice / Idle：忽略
    pub fn next_dialogue(&mut self) {
        match self.phase() {
            DialoguePhase::Typing => {
                if let Some(node) = &self.current {
                    self.typewriter.finish(&node.text);
                }
                self.is_typing = false;
            }
            DialoguePhase::AwaitingAdvance => self.advance_backlog(),
            DialoguePhase::AwaitingChoice => trace!("等待选择中，忽略推进"),
            DialoguePhase::Idle => trace!("对话未激活，忽略推进"),
        }
    }

    /// 选择选项
    ///
    /// 仅在 AwaitingChoice 且下标合法时生效：返回被选中的选项，并按队列顺序进入下一句。
    /// 选项的 `next_dialogue_id` 不参与流程控制。
    pub fn select_choice(&mut self, index: usize) -> Option<DialogueChoice> {
        if self.phase() != DialoguePhase::AwaitingChoice {
            trace!(index, "当前不在等待选择，忽略");
            return None;
        }

        let choice = self
            .current
            .as_ref()
            .and_then(|node| node.active_choices().get(index))
            .cloned();

        match choice {
            Some(choice) => {
                debug!(index, text = %choice.text, target = choice.next_dialogue_id, "选择选项");
                self.advance_backlog();
                Some(choice)
            }
            None => {
                trace!(index, "选项下标越界，忽略");
                None
            }
        }
    }

    /// 逐字显示（仅在 Typing 状态下生效）
    pub fn update(&mut self, dt: f32) {
        if !self.is_typing {
            return;
        }
        let Some(node) = &self.current else {
            return;
        };

        self.typewriter.advance(dt, &node.text);
        if self.typewriter.is_complete(&node.text) {
            self.is_typing = false;
        }
    }

    /// 绘制对话框
    ///
    /// 顺序：背景 → 说话者 → 正文（仅已显示部分）→ 选项（显示完毕后）。
    pub fn render(&self, surface: &mut dyn DrawSurface) {
        let Some(node) = &self.current else {
            return;
        };
        let layout = &self.layout;

        surface.fill_rect(layout.textbox.to_f32(), layout.textbox_color);

        if node.has_speaker() {
            self.draw_text(
                surface,
                &node.speaker,
                layout.speaker_anchor,
                layout.speaker_color,
                None,
            );
        }

        let shown = self.displayed_text();
        if !shown.is_empty() {
            let origin = Point::new(layout.text_area.x, layout.text_area.y);
            self.draw_text(
                surface,
                shown,
                origin,
                layout.text_color,
                Some(layout.wrap_width()),
            );
        }

        if !self.is_typing {
            for (i, choice) in node.active_choices().iter().enumerate() {
                self.draw_text(
                    surface,
                    &choice.text,
                    layout.choice_anchor(i),
                    layout.choice_color,
                    None,
                );
            }
        }
    }

    /// 光栅化 → 贴图 → 丢弃
    fn draw_text(
        &self,
        surface: &mut dyn DrawSurface,
        text: &str,
        origin: Point,
        color: Color,
        wrap_width: Option<u32>,
    ) {
        let Some(raster) = surface.rasterize_text(&self.typeface, text, color, wrap_width) else {
            return;
        };
        let w = raster.size.width as f32;
        let h = raster.size.height as f32;
        let src = RectF::new(0.0, 0.0, w, h);
        let dst = RectF::new(origin.x as f32, origin.y as f32, w, h);
        surface.blit(&raster.bitmap, src, dst, Color::WHITE);
    }

    fn advance_backlog(&mut self) {
        if self.queue.is_empty() {
            debug!("对话队列已展示完毕");
            self.current = None;
            self.is_typing = false;
            self.typewriter.reset();
        } else {
            self.start_dialogue();
        }
    }

    // === 查询 ===

    pub fn phase(&self) -> DialoguePhase {
        match &self.current {
            None => DialoguePhase::Idle,
            Some(_) if self.is_typing => DialoguePhase::Typing,
            Some(node) if node.has_choices => DialoguePhase::AwaitingChoice,
            Some(_) => DialoguePhase::AwaitingAdvance,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn has_choices(&self) -> bool {
        self.current.as_ref().is_some_and(|node| node.has_choices)
    }

    /// 当前节点生效的选项
    pub fn choices(&self) -> &[DialogueChoice] {
        self.current
            .as_ref()
            .map(|node| node.active_choices())
            .unwrap_or(&[])
    }

    pub fn current(&self) -> Option<&DialogueNode> {
        self.current.as_ref()
    }

    /// 已显示的正文
    pub fn displayed_text(&self) -> &str {
        self.current
            .as_ref()
            .map(|node| self.typewriter.revealed(&node.text))
            .unwrap_or("")
    }

    /// 已显示的字符数
    pub fn current_char_index(&self) -> usize {
        self.typewriter.cursor()
    }

    /// 队列中尚未展示的节点数
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn typewriter_speed(&self) -> f32 {
        self.typewriter.speed()
    }

    /// 设置打字速度（字符/秒，负数按 0 处理）
    pub fn set_typewriter_speed(&mut self, chars_per_second: f32) {
        self.typewriter.set_speed(chars_per_second);
    }

    pub fn layout(&self) -> &DialogueLayout {
        &self.layout
    }

    pub fn typeface(&self) -> &Typeface {
        &self.typeface
    }
}

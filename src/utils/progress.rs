//! # 进度条工具
//!
//! 封装 `indicatif` 提供统一的进度条样式，并把批次进度接到进度条上。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 实现 `batch::ProgressSink`
//! - 使用 `indicatif` crate

use crate::batch::{ProgressSink, Stage};

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 创建标准进度条
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// 创建 spinner（用于不确定进度的任务）
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {elapsed_precise} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// 批次进度条
///
/// 收集阶段长度未知，进入处理阶段后才设置总数。
pub struct BatchProgress {
    pb: ProgressBar,
}

impl BatchProgress {
    pub fn new() -> Self {
        BatchProgress {
            pb: create_progress_bar(0, "collecting"),
        }
    }
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BatchProgress {
    fn on_stage(&mut self, stage: Stage, total: usize) {
        match stage {
            Stage::Processing => self.pb.set_length(total as u64),
            Stage::Done => {
                self.pb.finish_with_message("done");
                return;
            }
            _ => {}
        }
        self.pb.set_message(stage.to_string());
    }

    fn on_item(&mut self, index: usize, _total: usize) {
        self.pb.set_position(index as u64);
    }
}

//! # watermark 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/watermark.rs`

use super::InputArgs;
use crate::models::Anchor;

use clap::Args;
use std::path::PathBuf;

/// watermark 子命令参数
#[derive(Args, Debug)]
pub struct WatermarkArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Watermark image (PNG with transparency works best)
    #[arg(short, long)]
    pub mark: PathBuf,

    /// Watermark opacity, 0.0 to 1.0
    #[arg(long, default_value_t = 0.5)]
    pub opacity: f32,

    /// Watermark width as a fraction of the photo width, (0, 1]
    #[arg(long, default_value_t = 0.25)]
    pub scale: f32,

    /// Where to place the watermark
    #[arg(short, long, value_enum, default_value_t = Anchor::BottomRight)]
    pub anchor: Anchor,
}

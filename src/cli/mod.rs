//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `rename`: 批量重命名
//! - `convert`: 批量转换为 JPEG
//! - `watermark`: 批量叠加水印
//! - `upload`: 上传已有归档
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: input, rename, convert, watermark, upload

pub mod convert;
pub mod input;
pub mod rename;
pub mod upload;
pub mod watermark;

pub use input::InputArgs;

use clap::{Parser, Subcommand};

/// Photoflow - 图片批处理工具
#[derive(Parser)]
#[command(name = "photoflow")]
#[command(version)]
#[command(about = "Batch rename, convert and watermark photos into a single zip", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Rename images with a numbered sequence or a regex substitution
    Rename(rename::RenameArgs),

    /// Convert images to high-quality JPEG
    Convert(convert::ConvertArgs),

    /// Overlay a watermark image onto every photo
    Watermark(watermark::WatermarkArgs),

    /// Upload an existing archive and print the download link
    Upload(upload::UploadArgs),
}

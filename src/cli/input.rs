//! # 批处理共用参数
//!
//! 输入来源、输出归档与报告选项，由各批处理子命令 `flatten` 引用。
//!
//! ## 依赖关系
//! - 被 `cli/rename.rs`, `cli/convert.rs`, `cli/watermark.rs` 使用
//! - 参数传递给 `commands/batch.rs`

use crate::batch::MAX_INPUT_MB;
use crate::utils::transfer::DEFAULT_UPLOAD_URL;

use clap::Args;
use std::path::PathBuf;

/// 批处理共用参数
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Image files, zip archives or directories, processed in the given order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output archive path (defaults to a mode-specific name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Recurse into subdirectories of directory inputs
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Glob pattern for files inside directory inputs
    #[arg(short, long, default_value = "*")]
    pub pattern: String,

    /// Per-file size limit in MB
    #[arg(long, default_value_t = MAX_INPUT_MB)]
    pub max_size_mb: u64,

    /// Also write the processing log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Write a per-file CSV report
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Upload the finished archive and print the download link
    #[arg(long, default_value_t = false)]
    pub upload: bool,

    /// Upload endpoint
    #[arg(long, env = "PHOTOFLOW_UPLOAD_URL", default_value = DEFAULT_UPLOAD_URL)]
    pub upload_url: String,
}

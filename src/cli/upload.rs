//! # upload 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/upload.rs`

use crate::utils::transfer::DEFAULT_UPLOAD_URL;

use clap::Args;
use std::path::PathBuf;

/// upload 子命令参数
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Archive to upload
    pub file: PathBuf,

    /// Upload endpoint
    #[arg(long, env = "PHOTOFLOW_UPLOAD_URL", default_value = DEFAULT_UPLOAD_URL)]
    pub url: String,
}

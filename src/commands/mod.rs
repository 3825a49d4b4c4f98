//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `transform/`, `utils/`
//! - 子模块: batch, rename, convert, watermark, upload

pub mod batch;
pub mod convert;
pub mod rename;
pub mod upload;
pub mod watermark;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Rename(args) => rename::execute(args),
        Commands::Convert(args) => convert::execute(args),
        Commands::Watermark(args) => watermark::execute(args),
        Commands::Upload(args) => upload::execute(args),
    }
}

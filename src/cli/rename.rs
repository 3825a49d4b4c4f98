//! # rename 子命令 CLI 定义
//!
//! 两种命名规则二选一: 前缀 + 补零序号，或对文件名主干做正则替换。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rename.rs`

use super::InputArgs;

use clap::Args;

/// rename 子命令参数
#[derive(Args, Debug)]
pub struct RenameArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Prefix for sequential names
    #[arg(long, default_value = "photo_", conflicts_with = "find")]
    pub prefix: String,

    /// First sequence number
    #[arg(long, default_value_t = 1, conflicts_with = "find")]
    pub start: u32,

    /// Zero-padding width of the sequence number
    #[arg(long, default_value_t = 3, conflicts_with = "find")]
    pub width: usize,

    /// Regex applied to the file stem instead of numbering
    #[arg(long, requires = "replace")]
    pub find: Option<String>,

    /// Replacement for --find (supports $1 style groups)
    #[arg(long, requires = "find")]
    pub replace: Option<String>,
}

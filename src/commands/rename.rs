//! # rename 命令实现
//!
//! 按序号或正则替换重命名，图片内容原样复制。
//!
//! ## 依赖关系
//! - 使用 `cli/rename.rs` 定义的参数
//! - 使用 `transform::NamingRule`, `commands/batch.rs`

use super::batch;
use crate::cli::rename::RenameArgs;
use crate::error::Result;
use crate::transform::{Mode, NamingRule};

/// 执行 rename 命令
pub fn execute(args: RenameArgs) -> Result<()> {
    let rule = naming_rule(&args)?;
    batch::run_batch(Mode::Rename(rule), &args.input)
}

fn naming_rule(args: &RenameArgs) -> Result<NamingRule> {
    match (&args.find, &args.replace) {
        (Some(find), Some(replace)) => NamingRule::substitute(find, replace.as_str()),
        _ => Ok(NamingRule::sequence(args.prefix.as_str(), args.start, args.width)),
    }
}

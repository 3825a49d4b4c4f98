//! # 输出路径登记
//!
//! 保证同一批次内没有两个成功产物落在同一个归档路径上。
//! 冲突时在文件名主干后追加 `_1`, `_2`, ...
//!
//! ## 依赖关系
//! - 被 `transform/` 各策略使用

use crate::error::{PhotoflowError, Result};
use crate::models::input::relative_display;
use crate::models::Output;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 归档根目录保留给日志的条目名
pub const LOG_ENTRY: &str = "log.txt";

/// 单个名称最多尝试的后缀数
const MAX_SUFFIX: u32 = 9999;

/// 已占用输出路径的登记表
#[derive(Debug)]
pub struct OutputRegistry {
    root: PathBuf,
    taken: HashSet<String>,
}

/// 一次登记的结果
#[derive(Debug)]
pub struct Claim {
    pub output: Output,
    /// 是否因冲突被改名
    pub renamed: bool,
}

impl OutputRegistry {
    pub fn new(root: &Path) -> Self {
        let mut taken = HashSet::new();
        taken.insert(LOG_ENTRY.to_string());
        OutputRegistry {
            root: root.to_path_buf(),
            taken,
        }
    }

    /// 登记期望的相对路径，必要时追加后缀
    pub fn claim(&mut self, wanted: &Path) -> Result<Claim> {
        if self.try_take(wanted) {
            return Ok(self.make_claim(wanted.to_path_buf(), false));
        }

        let stem = wanted
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let ext = wanted
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        for n in 1..=MAX_SUFFIX {
            let candidate = wanted.with_file_name(format!("{}_{}{}", stem, n, ext));
            if self.try_take(&candidate) {
                return Ok(self.make_claim(candidate, true));
            }
        }

        Err(PhotoflowError::OutputCollision(relative_display(wanted)))
    }

    /// 按小写路径比较
    fn try_take(&mut self, relative: &Path) -> bool {
        self.taken
            .insert(relative_display(relative).to_lowercase())
    }

    fn make_claim(&self, relative_path: PathBuf, renamed: bool) -> Claim {
        Claim {
            output: Output {
                path: self.root.join(&relative_path),
                relative_path,
            },
            renamed,
        }
    }
}

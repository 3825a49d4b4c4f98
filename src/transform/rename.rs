//! # 重命名
//!
//! 按命名规则计算新文件名，直接复制文件，不重新编码像素。
//!
//! ## 命名规则
//! - `Sequence`: `{prefix}{counter:0width}.{ext}`，计数器仅在成功后前进
//! - `Substitute`: 对文件名主干做正则替换
//!
//! 扩展名统一转为小写，子目录保持不变。
//!
//! ## 依赖关系
//! - 实现 `transform::Transform`
//! - 使用 `regex` crate, `transform/outputs.rs`

use super::{create_parent, into_result, OutputRegistry, Produced, Transform};
use crate::error::{PhotoflowError, Result};
use crate::models::{InputItem, ProcessingResult};

use regex::Regex;
use std::fs;
use std::path::Path;

/// 命名规则
#[derive(Debug, Clone)]
pub enum NamingRule {
    /// 前缀 + 补零计数器
    Sequence {
        prefix: String,
        start: u32,
        width: usize,
    },
    /// 文件名主干正则替换
    Substitute { pattern: Regex, replacement: String },
}

impl NamingRule {
    pub fn sequence(prefix: impl Into<String>, start: u32, width: usize) -> Self {
        NamingRule::Sequence {
            prefix: prefix.into(),
            start,
            width,
        }
    }

    pub fn substitute(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            PhotoflowError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e))
        })?;
        Ok(NamingRule::Substitute {
            pattern,
            replacement: replacement.into(),
        })
    }

    /// 第 `index` 个成功条目的新文件名（从 0 开始）
    pub fn file_name(&self, index: u32, item: &InputItem) -> Result<String> {
        let stem = match self {
            NamingRule::Sequence {
                prefix,
                start,
                width,
            } => {
                let n = start.saturating_add(index);
                format!("{}{:0width$}", prefix, n, width = *width)
            }
            NamingRule::Substitute {
                pattern,
                replacement,
            } => {
                let original = Path::new(&item.name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                pattern
                    .replace_all(&original, replacement.as_str())
                    .into_owned()
            }
        };

        let stem = stem.trim();
        if stem.is_empty() || stem.contains(['/', '\\']) || stem == "." || stem == ".." {
            return Err(PhotoflowError::InvalidArgument(format!(
                "naming rule produced an unusable name '{}'",
                stem
            )));
        }

        if item.extension.is_empty() {
            Ok(stem.to_string())
        } else {
            Ok(format!("{}.{}", stem, item.extension))
        }
    }
}

/// 重命名策略
pub struct Renamer {
    rule: NamingRule,
    renamed: u32,
    outputs: OutputRegistry,
}

impl Renamer {
    pub fn new(rule: NamingRule, outputs: OutputRegistry) -> Self {
        Renamer {
            rule,
            renamed: 0,
            outputs,
        }
    }

    fn rename(&mut self, item: &InputItem) -> Result<Produced> {
        let name = self.rule.file_name(self.renamed, item)?;
        let claim = self.outputs.claim(&item.relative_path.with_file_name(name))?;

        create_parent(&claim.output.path)?;
        fs::copy(&item.path, &claim.output.path).map_err(|e| PhotoflowError::FileReadError {
            path: item.display_path(),
            source: e,
        })?;

        self.renamed += 1;
        Ok(Produced {
            output: claim.output,
            note: claim.renamed.then(|| "name taken, suffix added".to_string()),
        })
    }
}

impl Transform for Renamer {
    fn transform(&mut self, item: &InputItem) -> ProcessingResult {
        let outcome = self.rename(item);
        into_result(item, outcome)
    }
}

//! # 批量执行器
//!
//! 驱动一次完整批次: 收集 → 逐个变换 → 打包。
//!
//! ## 功能
//! - 状态机 `Idle → Collecting → Processing → Packaging → Done`，每个执行器只运行一次
//! - 单线程顺序处理，单文件失败不影响后续条目
//! - 每处理完一个条目回报 `(index, total)` 进度
//! - 工作区为临时目录，批次结束（无论成败）即被删除
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `batch/collector.rs`, `batch/packager.rs`, `transform/`
//! - 使用 `tempfile` 管理工作区

use super::collector::{Collected, Collector, MAX_INPUT_MB};
use super::packager::{self, OutputArchive};
use crate::error::{PhotoflowError, Result};
use crate::models::{Output, ProcessingResult, Status, UploadedEntry};
use crate::transform::Mode;

use serde::Serialize;
use std::fmt;

/// 批次所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Collecting,
    Processing,
    Packaging,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::Collecting => write!(f, "collecting"),
            Stage::Processing => write!(f, "processing"),
            Stage::Packaging => write!(f, "packaging"),
            Stage::Done => write!(f, "done"),
        }
    }
}

/// 进度回报
pub trait ProgressSink {
    /// 进入新阶段；`total` 为待处理条目数（收集完成前为 0）
    fn on_stage(&mut self, _stage: Stage, _total: usize) {}

    /// 第 `index` 个条目处理完毕（从 1 开始）
    fn on_item(&mut self, index: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn on_item(&mut self, index: usize, total: usize) {
        self(index, total)
    }
}

/// 批次计数
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// 条目总数
    pub total: usize,
    /// 成功数量
    pub processed: usize,
    /// 失败数量
    pub errors: usize,
    /// 收集阶段跳过的数量（类型不支持或超限）
    pub skipped: usize,
}

/// 批处理汇总，批次完成后只读
#[derive(Debug, Default, Clone)]
pub struct BatchSummary {
    stats: Stats,
    results: Vec<ProcessingResult>,
    /// 进入处理阶段的图片总字节数
    input_bytes: u64,
}

impl BatchSummary {
    /// 合并单个条目结果
    pub fn record(&mut self, result: ProcessingResult) {
        self.stats.total += 1;
        match result.status {
            Status::Success => self.stats.processed += 1,
            Status::Error => self.stats.errors += 1,
            Status::SkippedUnsupported | Status::SkippedOversized => self.stats.skipped += 1,
        }
        self.results.push(result);
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn input_bytes(&self) -> u64 {
        self.input_bytes
    }

    /// 所有结果（处理顺序）
    pub fn results(&self) -> &[ProcessingResult] {
        &self.results
    }

    /// 日志行（每个条目一行，处理顺序）
    pub fn log(&self) -> Vec<String> {
        self.results.iter().map(|r| r.message.clone()).collect()
    }

    /// `log.txt` 的内容
    pub fn log_text(&self) -> String {
        self.log().join("\n")
    }

    /// 成功产物
    pub fn outputs(&self) -> impl Iterator<Item = &Output> {
        self.results.iter().filter_map(|r| r.output.as_ref())
    }

    /// 未成功的结果
    pub fn failures(&self) -> impl Iterator<Item = &ProcessingResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

/// 一次批次的最终产物，交由调用方下载或展示
#[derive(Debug, Clone)]
pub struct BatchRunContext {
    /// 模式名
    pub mode: String,
    pub summary: BatchSummary,
    pub archive: OutputArchive,
}

/// 批量执行器
pub struct BatchRunner {
    stage: Stage,
    /// 单条目大小上限 (MB)
    limit_mb: u64,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new() -> Self {
        BatchRunner {
            stage: Stage::Idle,
            limit_mb: MAX_INPUT_MB,
        }
    }

    /// 设置单条目大小上限
    pub fn limit_mb(mut self, limit_mb: u64) -> Self {
        self.limit_mb = limit_mb;
        self
    }

    fn enter(&mut self, stage: Stage, total: usize, progress: &mut dyn ProgressSink) {
        self.stage = stage;
        progress.on_stage(stage, total);
    }

    /// 执行一次完整批次
    pub fn run(
        &mut self,
        entries: Vec<UploadedEntry>,
        mode: Mode,
        progress: &mut dyn ProgressSink,
    ) -> Result<BatchRunContext> {
        if self.stage != Stage::Idle {
            return Err(PhotoflowError::InvalidArgument(format!(
                "batch runner already used (stage: {})",
                self.stage
            )));
        }

        // 工作区在函数返回时随 TempDir 一起删除
        let work = tempfile::Builder::new()
            .prefix("photoflow-")
            .tempdir()
            .map_err(|e| PhotoflowError::FileWriteError {
                path: std::env::temp_dir().display().to_string(),
                source: e,
            })?;

        self.enter(Stage::Collecting, 0, progress);
        let collected = Collector::new(&work.path().join("inputs"))
            .limit_mb(self.limit_mb)
            .collect(entries);

        let mode_name = mode.to_string();
        let mut summary = BatchSummary::default();
        let total = collected.len();

        if collected.iter().any(Collected::is_item) {
            self.enter(Stage::Processing, total, progress);
            let mut transformer = mode.build(&work.path().join("output"));
            for (i, entry) in collected.into_iter().enumerate() {
                let result = match entry {
                    Collected::Item(item) => {
                        summary.input_bytes += item.size;
                        transformer.transform(&item)
                    }
                    Collected::Rejected(result) => result,
                };
                summary.record(result);
                progress.on_item(i + 1, total);
            }
        } else {
            // 没有可处理的图片：仅记录拒绝条目，直接打包日志
            for entry in collected {
                if let Collected::Rejected(result) = entry {
                    summary.record(result);
                }
            }
        }

        self.enter(Stage::Packaging, total, progress);
        let archive = packager::package(summary.outputs(), &summary.log())?;

        self.enter(Stage::Done, total, progress);
        Ok(BatchRunContext {
            mode: mode_name,
            summary,
            archive,
        })
    }
}

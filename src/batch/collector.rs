//! # 输入收集器
//!
//! 将上传条目（散图与 zip 归档）展开为有序的待处理列表。
//!
//! ## 功能
//! - 散图: 原样写入工作区，相对路径即文件名
//! - zip: 落盘后按归档内顺序解压，仅保留支持的图片，保留子目录
//! - 超过大小上限的条目在解压/解码前即被拒绝
//! - 被拒绝的条目以结果的形式留在原位，保证日志顺序与输入顺序一致
//!
//! 归档内的非图片成员被静默丢弃，不写入日志。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `zip` crate 读取归档
//! - 使用 `models/input.rs`

use crate::error::{PhotoflowError, Result};
use crate::models::input::{is_supported_image, is_zip, sanitize_relative};
use crate::models::{InputItem, ProcessingResult, UploadedEntry};

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// 默认单条目大小上限 (MB)
pub const MAX_INPUT_MB: u64 = 400;

/// 收集阶段的产物：待处理图片，或已确定结果的拒绝条目
#[derive(Debug)]
pub enum Collected {
    Item(InputItem),
    Rejected(ProcessingResult),
}

impl Collected {
    pub fn is_item(&self) -> bool {
        matches!(self, Collected::Item(_))
    }
}

/// 输入收集器
pub struct Collector {
    /// 工作区内的输入目录
    root: PathBuf,
    /// 大小上限 (MB)
    limit_mb: u64,
}

impl Collector {
    /// 创建收集器，文件落在 `root` 下
    pub fn new(root: &Path) -> Self {
        Collector {
            root: root.to_path_buf(),
            limit_mb: MAX_INPUT_MB,
        }
    }

    /// 设置大小上限
    pub fn limit_mb(mut self, limit_mb: u64) -> Self {
        self.limit_mb = limit_mb;
        self
    }

    fn limit_bytes(&self) -> u64 {
        self.limit_mb.saturating_mul(1024 * 1024)
    }

    fn oversized(&self, size: u64) -> PhotoflowError {
        PhotoflowError::OversizedInput {
            size,
            limit_mb: self.limit_mb,
        }
    }

    /// 按输入顺序收集所有条目
    pub fn collect(&self, entries: Vec<UploadedEntry>) -> Vec<Collected> {
        let mut collected = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            self.collect_entry(index, entry, &mut collected);
        }
        collected
    }

    fn collect_entry(&self, index: usize, mut entry: UploadedEntry, out: &mut Vec<Collected>) {
        let name = entry.name.clone();

        if entry.size > self.limit_bytes() {
            let err = self.oversized(entry.size);
            out.push(Collected::Rejected(ProcessingResult::failure(name, &err)));
            return;
        }

        let entry_dir = self.root.join(index.to_string());

        if is_supported_image(&name) {
            let outcome = sanitize_relative(&name)
                .ok_or_else(|| PhotoflowError::InvalidArgument("unsafe file name".to_string()))
                .and_then(|rel| {
                    let dest = entry_dir.join("upload").join(&rel);
                    let size = self.materialize(entry.content(), &dest)?;
                    Ok(InputItem::new(rel, dest, size))
                });
            out.push(match outcome {
                Ok(item) => Collected::Item(item),
                Err(e) => Collected::Rejected(ProcessingResult::failure(name, &e)),
            });
        } else if is_zip(&name) {
            let zip_path = entry_dir.join("archive.zip");
            match self.materialize(entry.content(), &zip_path) {
                Ok(_) => self.expand_zip(&name, &zip_path, &entry_dir.join("extracted"), out),
                Err(e) => out.push(Collected::Rejected(ProcessingResult::failure(name, &e))),
            }
        } else {
            let err = PhotoflowError::UnsupportedType;
            out.push(Collected::Rejected(ProcessingResult::failure(name, &err)));
        }
    }

    /// 将内容流写入工作区，超出上限时报错
    fn materialize(&self, content: &mut dyn Read, dest: &Path) -> Result<u64> {
        let write_err = |e| PhotoflowError::FileWriteError {
            path: dest.display().to_string(),
            source: e,
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let mut file = File::create(dest).map_err(write_err)?;

        let limit = self.limit_bytes();
        let mut bounded = content.take(limit.saturating_add(1));
        let written = io::copy(&mut bounded, &mut file).map_err(write_err)?;
        if written > limit {
            drop(file);
            fs::remove_file(dest).ok();
            return Err(self.oversized(written));
        }
        Ok(written)
    }

    /// 解压归档中的图片成员
    fn expand_zip(
        &self,
        archive_name: &str,
        zip_path: &Path,
        dest: &Path,
        out: &mut Vec<Collected>,
    ) {
        let extraction_err = |reason: String| PhotoflowError::ExtractionError {
            archive: archive_name.to_string(),
            reason,
        };

        let mut archive = match File::open(zip_path)
            .map_err(|e| extraction_err(e.to_string()))
            .and_then(|f| ZipArchive::new(f).map_err(|e| extraction_err(e.to_string())))
        {
            Ok(archive) => archive,
            Err(e) => {
                out.push(Collected::Rejected(ProcessingResult::failure(archive_name, &e)));
                return;
            }
        };

        for i in 0..archive.len() {
            let mut member = match archive.by_index(i) {
                Ok(member) => member,
                Err(e) => {
                    let source = format!("{}#{}", archive_name, i);
                    let err = extraction_err(e.to_string());
                    out.push(Collected::Rejected(ProcessingResult::failure(source, &err)));
                    continue;
                }
            };

            if member.is_dir() {
                continue;
            }
            let member_name = member.name().to_string();
            if !is_supported_image(&member_name) {
                continue;
            }

            let declared = member.size();
            let outcome =
                self.extract_member(archive_name, &member_name, declared, &mut member, dest);

            out.push(match outcome {
                Ok(item) => Collected::Item(item),
                Err(e) => Collected::Rejected(ProcessingResult::failure(member_name, &e)),
            });
        }
    }

    /// 解压单个成员
    fn extract_member(
        &self,
        archive_name: &str,
        member_name: &str,
        declared: u64,
        member: &mut dyn Read,
        dest: &Path,
    ) -> Result<InputItem> {
        let extraction_err = |reason: String| PhotoflowError::ExtractionError {
            archive: archive_name.to_string(),
            reason,
        };

        let rel = sanitize_relative(member_name)
            .ok_or_else(|| extraction_err(format!("unsafe path '{}'", member_name)))?;
        if declared > self.limit_bytes() {
            return Err(self.oversized(declared));
        }

        let target = dest.join(&rel);
        let size = self.materialize(member, &target).map_err(|e| match e {
            PhotoflowError::OversizedInput { .. } => e,
            other => extraction_err(format!("{} ({})", member_name, describe(&other))),
        })?;
        Ok(InputItem::new(rel, target, size))
    }
}

/// 错误及其来源的单行描述
fn describe(err: &PhotoflowError) -> String {
    match std::error::Error::source(err) {
        Some(cause) => format!("{}: {}", err, cause),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::test_support;

    fn items(collected: &[Collected]) -> Vec<String> {
        collected
            .iter()
            .filter_map(|c| match c {
                Collected::Item(item) => Some(item.display_path()),
                Collected::Rejected(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_loose_files_in_upload_order() {
        let dir = tempfile::tempdir().unwrap();
        let collector = Collector::new(dir.path());
        let collected = collector.collect(vec![
            UploadedEntry::from_bytes("b.png", vec![1]),
            UploadedEntry::from_bytes("a.JPG", vec![2, 2]),
        ]);

        assert_eq!(items(&collected), vec!["b.png", "a.JPG"]);
        if let Collected::Item(item) = &collected[1] {
            assert_eq!(item.size, 2);
            assert_eq!(fs::read(&item.path).unwrap(), vec![2, 2]);
        } else {
            panic!("expected item");
        }
    }

    #[test]
    fn test_zip_members_drop_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let png = test_support::png_bytes(2, 2, [0, 0, 0, 255]);
        let zip = test_support::zip_bytes(&[("a.png", png.as_slice()), ("b.txt", &b"hello"[..])]);

        let collected =
            Collector::new(dir.path()).collect(vec![UploadedEntry::from_bytes("in.zip", zip)]);
        assert_eq!(collected.len(), 1);
        assert_eq!(items(&collected), vec!["a.png"]);
    }

    #[test]
    fn test_zip_members_keep_archive_order_and_folders() {
        let dir = tempfile::tempdir().unwrap();
        let zip = test_support::zip_bytes(&[
            ("trip/z.jpg", &b"z"[..]),
            ("trip/", &b""[..]),
            ("a.webp", &b"a"[..]),
            ("trip/day2/m.heic", &b"m"[..]),
        ]);
        let collected = Collector::new(dir.path()).collect(vec![
            UploadedEntry::from_bytes("first.png", vec![0]),
            UploadedEntry::from_bytes("photos.zip", zip),
            UploadedEntry::from_bytes("last.bmp", vec![0]),
        ]);

        assert_eq!(
            items(&collected),
            vec!["first.png", "trip/z.jpg", "a.webp", "trip/day2/m.heic", "last.bmp"]
        );
    }

    #[test]
    fn test_unsupported_and_oversized_rejected_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let collector = Collector::new(dir.path()).limit_mb(1);
        let big = UploadedEntry::new("huge.zip", 2 * 1024 * 1024, io::empty());

        let collected = collector.collect(vec![
            UploadedEntry::from_bytes("notes.txt", b"x".to_vec()),
            big,
            UploadedEntry::from_bytes("ok.png", vec![1]),
        ]);

        assert_eq!(collected.len(), 3);
        match &collected[0] {
            Collected::Rejected(r) => assert_eq!(r.status, Status::SkippedUnsupported),
            other => panic!("unexpected {:?}", other),
        }
        match &collected[1] {
            Collected::Rejected(r) => {
                assert_eq!(r.status, Status::SkippedOversized);
                assert!(r.message.contains("huge.zip"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(collected[2].is_item());
        // 超限归档从未落盘
        assert!(!dir.path().join("1").exists());
    }

    #[test]
    fn test_declared_size_understated_is_still_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let collector = Collector::new(dir.path()).limit_mb(1);
        let liar = UploadedEntry::new("liar.png", 10, io::repeat(7).take(2 * 1024 * 1024));

        let collected = collector.collect(vec![liar]);
        match &collected[0] {
            Collected::Rejected(r) => assert_eq!(r.status, Status::SkippedOversized),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_oversized_zip_member_never_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let big = vec![0u8; 1536 * 1024];
        let zip = test_support::zip_bytes(&[("big.png", big.as_slice()), ("small.png", &b"s"[..])]);

        let collected = Collector::new(dir.path())
            .limit_mb(1)
            .collect(vec![UploadedEntry::from_bytes("set.zip", zip)]);

        assert_eq!(collected.len(), 2);
        match &collected[0] {
            Collected::Rejected(r) => {
                assert_eq!(r.status, Status::SkippedOversized);
                assert_eq!(r.source, "big.png");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(items(&collected), vec!["small.png"]);

        let extracted = dir.path().join("0").join("extracted");
        assert!(!extracted.join("big.png").exists());
        assert!(extracted.join("small.png").exists());
    }

    #[test]
    fn test_corrupt_zip_is_single_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let collected = Collector::new(dir.path())
            .collect(vec![UploadedEntry::from_bytes("broken.zip", b"PK nope".to_vec())]);

        assert_eq!(collected.len(), 1);
        match &collected[0] {
            Collected::Rejected(r) => {
                assert_eq!(r.status, Status::Error);
                assert!(r.message.contains("failed to extract from broken.zip"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_zip_path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let zip = test_support::zip_bytes(&[("../escape.png", &b"x"[..]), ("fine.png", &b"y"[..])]);
        let collected = Collector::new(&dir.path().join("inputs"))
            .collect(vec![UploadedEntry::from_bytes("evil.zip", zip)]);

        assert_eq!(collected.len(), 2);
        assert!(!collected[0].is_item());
        assert_eq!(items(&collected), vec!["fine.png"]);
        assert!(!dir.path().join("escape.png").exists());
    }
}

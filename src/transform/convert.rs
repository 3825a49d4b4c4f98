//! # 转换为 JPEG
//!
//! 解码任意支持格式，丢弃 alpha 通道后以最高质量写出渐进式、优化编码的 JPEG，
//! 原图带有 ICC 色彩配置时一并保留。
//!
//! ## 依赖关系
//! - 实现 `transform::Transform`
//! - 使用 `transform/codec.rs`, `transform/outputs.rs`

use super::codec;
use super::{create_parent, into_result, OutputRegistry, Produced, Transform};
use crate::error::Result;
use crate::models::{InputItem, ProcessingResult};

/// JPEG 输出质量
pub const JPEG_QUALITY: u8 = 100;

/// 转 JPEG 策略
pub struct Converter {
    outputs: OutputRegistry,
}

impl Converter {
    pub fn new(outputs: OutputRegistry) -> Self {
        Converter { outputs }
    }

    fn convert(&mut self, item: &InputItem) -> Result<Produced> {
        let decoded = codec::decode_file(&item.path)?;
        let rgb = decoded.image.to_rgb8();

        let claim = self
            .outputs
            .claim(&item.relative_path.with_extension("jpg"))?;
        create_parent(&claim.output.path)?;
        codec::write_jpeg(&rgb, decoded.icc_profile, JPEG_QUALITY, &claim.output.path)?;

        Ok(Produced {
            output: claim.output,
            note: claim.renamed.then(|| "name taken, suffix added".to_string()),
        })
    }
}

impl Transform for Converter {
    fn transform(&mut self, item: &InputItem) -> ProcessingResult {
        let outcome = self.convert(item);
        into_result(item, outcome)
    }
}

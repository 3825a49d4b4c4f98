//! # 图片编解码
//!
//! 封装 `image` crate 的读取与写出，统一转换为 `DecodeError` / `EncodeError`。
//! JPEG 统一以渐进式、优化 Huffman 表写出。
//!
//! ## 依赖关系
//! - 被 `transform/convert.rs`, `transform/watermark.rs` 使用
//! - 使用 `image` crate 解码，`jpeg-encoder` 写 JPEG

use crate::error::{PhotoflowError, Result};

use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, RgbImage};
use jpeg_encoder::{ColorType, Encoder};
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// 解码后的图片及其 ICC 色彩配置
pub struct Decoded {
    pub image: DynamicImage,
    pub icc_profile: Option<Vec<u8>>,
}

/// 从磁盘解码图片（按内容嗅探格式），保留 ICC 配置
pub fn decode_file(path: &Path) -> Result<Decoded> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| PhotoflowError::DecodeError(e.to_string()))?;
    decode_reader(reader)
}

/// 从内存解码图片
pub fn decode_bytes(bytes: &[u8]) -> Result<Decoded> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PhotoflowError::DecodeError(e.to_string()))?;
    decode_reader(reader)
}

fn decode_reader<R: std::io::BufRead + std::io::Seek>(reader: ImageReader<R>) -> Result<Decoded> {
    let decode_err = |e: image::ImageError| PhotoflowError::DecodeError(e.to_string());

    let mut decoder = reader.into_decoder().map_err(decode_err)?;
    // 色彩配置读取失败不影响像素数据
    let icc_profile = decoder.icc_profile().ok().flatten();
    let image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;

    Ok(Decoded { image, icc_profile })
}

/// 写出渐进式 RGB JPEG，若有 ICC 配置则一并写入
pub fn write_jpeg(
    rgb: &RgbImage,
    icc_profile: Option<Vec<u8>>,
    quality: u8,
    path: &Path,
) -> Result<()> {
    let encode_err = |e: String| PhotoflowError::EncodeError(format!("{}: {}", path.display(), e));

    // JPEG 尺寸上限为 65535
    let (width, height) = match (u16::try_from(rgb.width()), u16::try_from(rgb.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(encode_err(format!(
                "{}x{} exceeds the JPEG size limit",
                rgb.width(),
                rgb.height()
            )))
        }
    };

    let file = File::create(path).map_err(|e| encode_err(e.to_string()))?;
    let mut writer = BufWriter::new(file);

    let mut encoder = Encoder::new(&mut writer, quality);
    encoder.set_progressive(true);
    encoder.set_optimized_huffman_tables(true);
    if let Some(icc) = icc_profile {
        encoder.add_icc_profile(&icc).ok();
    }
    encoder
        .encode(rgb.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| encode_err(e.to_string()))?;

    writer.flush().map_err(|e| encode_err(e.to_string()))?;
    Ok(())
}

/// 以指定格式写出图片
pub fn write_image(image: &DynamicImage, format: ImageFormat, path: &Path) -> Result<()> {
    image
        .save_with_format(path, format)
        .map_err(|e| PhotoflowError::EncodeError(format!("{}: {}", path.display(), e)))
}

//! # 水印叠加
//!
//! 水印图在批次开始时解码一次，之后对每张图片:
//! 1. 按 `scale × 图宽` 缩放水印（四舍五入，保持宽高比）
//! 2. 按不透明度缩放水印 alpha
//! 3. 在锚点位置（距边缘固定边距，居中时几何居中）做 alpha 合成
//!
//! 输出格式与输入一致；JPEG 以 RGB 写出，无法承载合成结果的格式
//! （HEIC/HEIF 等）改写为 JPEG。
//!
//! ## 依赖关系
//! - 实现 `transform::Transform`
//! - 使用 `image::imageops`, `transform/codec.rs`

use super::codec;
use super::{create_parent, into_result, OutputRegistry, Produced, Transform};
use crate::error::{PhotoflowError, Result};
use crate::models::{Anchor, InputItem, ProcessingResult, WatermarkSpec};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::PathBuf;

/// 水印距图片边缘的像素
pub const MARGIN: u32 = 10;

/// 重新编码为 JPEG 时的质量
const JPEG_QUALITY: u8 = 95;

/// 水印在目标图中的位置与尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 计算缩放后的水印尺寸
///
/// 宽度为 `round(scale × 图宽)`，高度按宽高比；高度超过图高时
/// 两个维度同比缩小到恰好放入。
pub fn mark_size(mark: (u32, u32), target: (u32, u32), scale: f32) -> (u32, u32) {
    let (mw, mh) = mark;
    let (tw, th) = target;
    if mw == 0 || mh == 0 {
        return (1, 1);
    }

    let width = ((scale as f64 * tw as f64).round() as u32).max(1);
    let height = (width as f64 * mh as f64 / mw as f64).round();
    if height <= th.max(1) as f64 {
        return (width, (height as u32).max(1));
    }

    let height = th.max(1);
    let width = ((height as f64 * mw as f64 / mh as f64).round() as u32).clamp(1, width);
    (width, height)
}

/// 计算锚点对应的左上角坐标，越界时贴边
pub fn anchor_origin(anchor: Anchor, image: (u32, u32), mark: (u32, u32)) -> (u32, u32) {
    let (w, h) = image;
    let (mw, mh) = mark;
    let right = w.saturating_sub(mw + MARGIN);
    let bottom = h.saturating_sub(mh + MARGIN);
    match anchor {
        Anchor::BottomRight => (right, bottom),
        Anchor::BottomLeft => (MARGIN.min(w.saturating_sub(mw)), bottom),
        Anchor::TopRight => (right, MARGIN.min(h.saturating_sub(mh))),
        Anchor::TopLeft => (
            MARGIN.min(w.saturating_sub(mw)),
            MARGIN.min(h.saturating_sub(mh)),
        ),
        Anchor::Center => (w.saturating_sub(mw) / 2, h.saturating_sub(mh) / 2),
    }
}

/// 将水印合成到图片上，返回 RGBA 结果与放置位置
pub fn apply_watermark(
    base: &DynamicImage,
    mark: &RgbaImage,
    opacity: f32,
    scale: f32,
    anchor: Anchor,
) -> (RgbaImage, Placement) {
    let mut canvas = base.to_rgba8();
    let (width, height) = mark_size(mark.dimensions(), canvas.dimensions(), scale);

    let mut scaled = imageops::resize(mark, width, height, FilterType::Lanczos3);
    for px in scaled.pixels_mut() {
        px[3] = (px[3] as f32 * opacity).round().clamp(0.0, 255.0) as u8;
    }

    let (x, y) = anchor_origin(anchor, canvas.dimensions(), (width, height));
    imageops::overlay(&mut canvas, &scaled, x as i64, y as i64);

    (
        canvas,
        Placement {
            x,
            y,
            width,
            height,
        },
    )
}

/// 输出编码方式
enum Encoding {
    /// 保留 alpha，原格式写出
    Rgba(ImageFormat),
    /// RGB JPEG
    Jpeg,
}

/// 根据输入扩展名决定输出扩展名与编码
fn output_encoding(extension: &str) -> (&'static str, Encoding) {
    match extension {
        "png" => ("png", Encoding::Rgba(ImageFormat::Png)),
        "bmp" => ("bmp", Encoding::Rgba(ImageFormat::Bmp)),
        "webp" => ("webp", Encoding::Rgba(ImageFormat::WebP)),
        "tiff" => ("tiff", Encoding::Rgba(ImageFormat::Tiff)),
        "tif" => ("tif", Encoding::Rgba(ImageFormat::Tiff)),
        "jpeg" => ("jpeg", Encoding::Jpeg),
        _ => ("jpg", Encoding::Jpeg),
    }
}

/// 水印策略
pub struct Watermarker {
    /// 预解码的水印；解码失败时每个条目都记录该错误
    mark: std::result::Result<RgbaImage, String>,
    opacity: f32,
    scale: f32,
    anchor: Anchor,
    outputs: OutputRegistry,
}

impl Watermarker {
    pub fn new(spec: &WatermarkSpec, outputs: OutputRegistry) -> Self {
        let mark = codec::decode_bytes(&spec.image)
            .map(|d| d.image.to_rgba8())
            .map_err(|e| e.to_string());
        Watermarker {
            mark,
            opacity: spec.opacity,
            scale: spec.scale,
            anchor: spec.anchor,
            outputs,
        }
    }

    fn watermark(&mut self, item: &InputItem) -> Result<Produced> {
        let mark = self
            .mark
            .as_ref()
            .map_err(|e| PhotoflowError::DecodeError(format!("watermark image: {}", e)))?;

        let decoded = codec::decode_file(&item.path)?;
        let (composited, _) =
            apply_watermark(&decoded.image, mark, self.opacity, self.scale, self.anchor);

        let (extension, encoding) = output_encoding(&item.extension);
        let wanted: PathBuf = item.relative_path.with_extension(extension);
        let claim = self.outputs.claim(&wanted)?;
        create_parent(&claim.output.path)?;

        match encoding {
            Encoding::Rgba(format) => codec::write_image(
                &DynamicImage::ImageRgba8(composited),
                format,
                &claim.output.path,
            )?,
            Encoding::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(composited).to_rgb8();
                codec::write_jpeg(&rgb, decoded.icc_profile, JPEG_QUALITY, &claim.output.path)?
            }
        }

        Ok(Produced {
            output: claim.output,
            note: claim.renamed.then(|| "name taken, suffix added".to_string()),
        })
    }
}

impl Transform for Watermarker {
    fn transform(&mut self, item: &InputItem) -> ProcessingResult {
        let outcome = self.watermark(item);
        into_result(item, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::test_support;
    use image::{GenericImageView, Rgba};
    use std::fs;
    use std::path::Path;

    fn spec(mark: Vec<u8>, opacity: f32, scale: f32, anchor: Anchor) -> WatermarkSpec {
        WatermarkSpec::new(mark, opacity, scale, anchor).unwrap()
    }

    #[test]
    fn test_mark_size_rounding() {
        assert_eq!(mark_size((40, 20), (200, 100), 0.25), (50, 25));
        assert_eq!(mark_size((100, 30), (333, 200), 0.05), (17, 5));
        assert_eq!(mark_size((10, 10), (1, 1), 0.05), (1, 1));
    }

    #[test]
    fn test_mark_size_clamped_to_image_height() {
        assert_eq!(mark_size((1, 10000), (4000, 3000), 0.25), (1, 3000));
        assert_eq!(mark_size((100, 400), (400, 200), 1.0), (50, 200));
        // 恰好等高时不缩小
        assert_eq!(mark_size((50, 100), (200, 100), 0.25), (50, 100));
    }

    #[test]
    fn test_tall_mark_fits_inside_image() {
        let base = DynamicImage::ImageRgba8(RgbaImage::from_pixel(400, 300, Rgba([0, 0, 0, 255])));
        let mark = RgbaImage::from_pixel(2, 5000, Rgba([255, 255, 255, 255]));
        let (out, placement) = apply_watermark(&base, &mark, 1.0, 0.5, Anchor::TopLeft);
        assert_eq!(out.dimensions(), (400, 300));
        assert_eq!(placement.height, 300);
        assert_eq!(placement.width, 1);
        assert_eq!((placement.x, placement.y), (10, 0));
    }

    #[test]
    fn test_anchor_origins() {
        let img = (200, 100);
        let mark = (50, 20);
        assert_eq!(anchor_origin(Anchor::BottomRight, img, mark), (140, 70));
        assert_eq!(anchor_origin(Anchor::BottomLeft, img, mark), (10, 70));
        assert_eq!(anchor_origin(Anchor::TopRight, img, mark), (140, 10));
        assert_eq!(anchor_origin(Anchor::TopLeft, img, mark), (10, 10));
        assert_eq!(anchor_origin(Anchor::Center, img, mark), (75, 40));
        // 水印比图片大时贴边
        assert_eq!(anchor_origin(Anchor::BottomRight, (20, 20), (30, 30)), (0, 0));
    }

    #[test]
    fn test_apply_watermark_center_half_opacity() {
        let white = RgbaImage::from_pixel(200, 100, Rgba([255, 255, 255, 255]));
        let base = DynamicImage::ImageRgba8(white);
        let mark = RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255]));

        let (out, placement) = apply_watermark(&base, &mark, 0.5, 0.25, Anchor::Center);
        assert_eq!(out.dimensions(), (200, 100));
        assert_eq!(
            placement,
            Placement {
                x: 75,
                y: 37,
                width: 50,
                height: 25
            }
        );

        let center = out.get_pixel(100, 50);
        assert!(center[0] >= 250);
        assert!((115..=140).contains(&center[1]), "{:?}", center);
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(74, 50), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_zero_opacity_leaves_image_untouched() {
        let base = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([9, 9, 9, 255])));
        let mark = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        let (out, _) = apply_watermark(&base, &mark, 0.0, 0.5, Anchor::TopLeft);
        assert!(out
            .pixels()
            .all(|p| p[0].abs_diff(9) <= 1 && p[1].abs_diff(9) <= 1 && p[3] == 255));
    }

    #[test]
    fn test_watermark_png_keeps_format_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("z.png");
        fs::write(&src, test_support::png_bytes(200, 100, [255, 255, 255, 255])).unwrap();
        let item = InputItem::new(Path::new("z.png").to_path_buf(), src, 0);

        let mark = test_support::png_bytes(40, 20, [255, 0, 0, 255]);
        let mut marker = Watermarker::new(
            &spec(mark, 0.5, 0.25, Anchor::Center),
            OutputRegistry::new(&dir.path().join("out")),
        );

        let result = marker.transform(&item);
        assert_eq!(result.status, Status::Success, "{}", result.message);
        let output = result.output.unwrap();
        assert_eq!(output.relative_path, Path::new("z.png"));

        let img = image::open(&output.path).unwrap();
        assert_eq!(img.dimensions(), (200, 100));
        let center = img.get_pixel(100, 50);
        assert!(center[1] < 200);
    }

    #[test]
    fn test_watermark_jpeg_stays_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("p.jpeg");
        fs::write(&src, test_support::jpeg_bytes(32, 32)).unwrap();
        let item = InputItem::new(Path::new("p.jpeg").to_path_buf(), src, 0);

        let mark = test_support::png_bytes(4, 4, [0, 0, 0, 255]);
        let mut marker = Watermarker::new(
            &spec(mark, 1.0, 0.25, Anchor::BottomRight),
            OutputRegistry::new(&dir.path().join("out")),
        );
        let result = marker.transform(&item);
        assert_eq!(result.output_display().as_deref(), Some("p.jpeg"));
        let img = image::open(result.output.unwrap().path).unwrap();
        assert_eq!(img.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_bad_watermark_fails_every_item() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("z.png");
        fs::write(&src, test_support::png_bytes(8, 8, [0, 0, 0, 255])).unwrap();
        let item = InputItem::new(Path::new("z.png").to_path_buf(), src, 0);

        let mut marker = Watermarker::new(
            &spec(b"not an image".to_vec(), 0.5, 0.25, Anchor::Center),
            OutputRegistry::new(&dir.path().join("out")),
        );
        for _ in 0..2 {
            let result = marker.transform(&item);
            assert_eq!(result.status, Status::Error);
            assert!(result.message.contains("watermark image"));
        }
    }
}

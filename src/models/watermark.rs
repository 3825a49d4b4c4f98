//! # 水印参数
//!
//! 一次批处理共享同一份水印配置。
//!
//! ## 依赖关系
//! - 被 `cli/watermark.rs` 和 `transform/watermark.rs` 使用

use crate::error::{PhotoflowError, Result};

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// 水印放置位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Bottom-right corner
    BottomRight,
    /// Bottom-left corner
    BottomLeft,
    /// Top-right corner
    TopRight,
    /// Top-left corner
    TopLeft,
    /// Geometric center
    Center,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::BottomRight => write!(f, "bottom_right"),
            Anchor::BottomLeft => write!(f, "bottom_left"),
            Anchor::TopRight => write!(f, "top_right"),
            Anchor::TopLeft => write!(f, "top_left"),
            Anchor::Center => write!(f, "center"),
        }
    }
}

/// 水印配置
#[derive(Debug, Clone)]
pub struct WatermarkSpec {
    /// 不透明度 [0, 1]
    pub opacity: f32,
    /// 水印宽度占目标图宽度的比例 (0, 1]
    pub scale: f32,
    pub anchor: Anchor,
    /// 水印图片原始字节
    pub image: Vec<u8>,
}

impl WatermarkSpec {
    pub fn new(image: Vec<u8>, opacity: f32, scale: f32, anchor: Anchor) -> Result<Self> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(PhotoflowError::InvalidArgument(format!(
                "opacity must be within [0, 1], got {}",
                opacity
            )));
        }
        if !(scale > 0.0 && scale <= 1.0) {
            return Err(PhotoflowError::InvalidArgument(format!(
                "scale must be within (0, 1], got {}",
                scale
            )));
        }
        Ok(WatermarkSpec {
            opacity,
            scale,
            anchor,
            image,
        })
    }
}

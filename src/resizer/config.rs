//! # 配置模块
//!
//! ## 设计思路
//!
//! 目标尺寸固定为 100×100，不可配置。可调的只有资源上限、重采样滤镜与 PNG 压缩级别。
//! 其中 `ResizeProfile`（quality / balanced / speed）作为高层语义，映射到具体滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供可直接使用的配置。
//! - 通过 `serde` 支持从 JSON 文件加载，缺省字段回落到默认值。
//! - `validate` 在配置生效前做范围检查。
//! - 所有滤镜均不低于双线性，满足画质下限。

use std::path::Path;

use image::codecs::png::CompressionType;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 画布边长（像素）。
pub const TARGET_SIZE: u32 = 100;

/// 下载文件的固定命名。
pub const DOWNLOAD_FILE_NAME: &str = "resized-image-100x100.png";

/// 重采样滤镜。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl ResampleFilter {
    pub(crate) fn to_fast_filter(self) -> fast_image_resize::FilterType {
        match self {
            Self::Bilinear => fast_image_resize::FilterType::Bilinear,
            Self::CatmullRom => fast_image_resize::FilterType::CatmullRom,
            Self::Lanczos3 => fast_image_resize::FilterType::Lanczos3,
        }
    }

    pub(crate) fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Bilinear => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// PNG 压缩级别。PNG 为无损格式，级别只影响体积与耗时。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PngCompression {
    Best,
    Default,
    Fast,
}

impl PngCompression {
    pub(crate) fn to_compression_type(self) -> CompressionType {
        match self {
            Self::Best => CompressionType::Best,
            Self::Default => CompressionType::Default,
            Self::Fast => CompressionType::Fast,
        }
    }
}

/// 缩放配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// 允许输入的最大字节数。
    pub max_input_bytes: u64,
    /// 解码后的像素上限（`width * height`），交给解码器的 `Limits` 执行。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许分配的内存上限（字节）。
    pub max_decoded_bytes: u64,
    /// 缩放滤镜。
    pub resize_filter: ResampleFilter,
    /// 输出 PNG 压缩级别。
    pub png_compression: PngCompression,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            resize_filter: ResampleFilter::CatmullRom,
            png_compression: PngCompression::Best,
        }
    }
}

/// 画质档位（面向用户语义）。
///
/// - `Quality`：Lanczos3
/// - `Balanced`：CatmullRom
/// - `Speed`：双线性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeProfile {
    Quality,
    Balanced,
    Speed,
}

impl ResizeProfile {
    /// 从外部字符串解析档位。
    pub fn from_str(profile: &str) -> Result<Self, AppError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(AppError::Config(format!(
                "未知画质档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl ImageConfig {
    /// 从 JSON 文件加载配置，缺省字段使用默认值。
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AppError::Config(format!("解析配置文件 '{}' 失败: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置范围。
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_input_bytes == 0 {
            return Err(AppError::Config("max_input_bytes 必须大于 0".to_string()));
        }
        let canvas_pixels = u64::from(TARGET_SIZE) * u64::from(TARGET_SIZE);
        if self.max_decoded_pixels == 0 {
            return Err(AppError::Config("max_decoded_pixels 必须大于 0".to_string()));
        }
        if self.max_decoded_bytes < canvas_pixels * 4 {
            return Err(AppError::Config(format!(
                "max_decoded_bytes 不能小于 {} 字节",
                canvas_pixels * 4
            )));
        }
        Ok(())
    }

    /// 基于当前滤镜反推档位。
    pub fn infer_profile(&self) -> ResizeProfile {
        match self.resize_filter {
            ResampleFilter::Lanczos3 => ResizeProfile::Quality,
            ResampleFilter::CatmullRom => ResizeProfile::Balanced,
            ResampleFilter::Bilinear => ResizeProfile::Speed,
        }
    }

    /// 应用指定档位。
    pub fn apply_profile(&mut self, profile: ResizeProfile) {
        self.resize_filter = match profile {
            ResizeProfile::Quality => ResampleFilter::Lanczos3,
            ResizeProfile::Balanced => ResampleFilter::CatmullRom,
            ResizeProfile::Speed => ResampleFilter::Bilinear,
        };
    }

    /// 构建交给解码器的资源上限。
    pub(crate) fn decode_limits(&self) -> image::Limits {
        let mut limits = image::Limits::default();
        let max_side = self.max_decoded_pixels.min(u64::from(u32::MAX)) as u32;
        limits.max_image_width = Some(max_side);
        limits.max_image_height = Some(max_side);
        limits.max_alloc = Some(self.max_decoded_bytes);
        limits
    }
}

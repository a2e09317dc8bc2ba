//! # 媒体类型模块
//!
//! 输入图片的媒体类型允许列表。声明类型按大小写不敏感的精确匹配校验，
//! 不接受参数（如 `image/png; charset=...`）或通配前缀。

use std::fmt;

use image::ImageFormat;

use super::ResizeError;

/// 输出固定为 PNG。
pub const OUTPUT_MEDIA_TYPE: &str = "image/png";

/// 允许的输入媒体类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Jpeg,
    Png,
    Gif,
    WebP,
    Bmp,
}

impl MediaType {
    /// 允许列表中的全部声明字符串（`image/jpg` 是 `image/jpeg` 的别名）。
    pub const ALLOWED: [&'static str; 6] = [
        "image/jpeg",
        "image/jpg",
        "image/png",
        "image/gif",
        "image/webp",
        "image/bmp",
    ];

    /// 解析声明的媒体类型。
    ///
    /// # 示例
    /// ```rust
    /// use image_resizer::resizer::MediaType;
    ///
    /// assert_eq!(MediaType::parse("IMAGE/JPG")?, MediaType::Jpeg);
    /// assert!(MediaType::parse("text/plain").is_err());
    /// # Ok::<(), image_resizer::resizer::ResizeError>(())
    /// ```
    pub fn parse(declared: &str) -> Result<Self, ResizeError> {
        match declared.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/gif" => Ok(Self::Gif),
            "image/webp" => Ok(Self::WebP),
            "image/bmp" => Ok(Self::Bmp),
            _ => Err(ResizeError::InvalidMediaType(format!(
                "{}（可选：{}）",
                declared,
                Self::ALLOWED.join(" / ")
            ))),
        }
    }

    /// 按文件扩展名推断声明类型，相当于浏览器为所选文件填写的 `file.type`。
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// 通过文件签名探测类型，仅识别允许列表内的格式。
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        let kind = infer::get(bytes)?;
        if kind.matcher_type() != infer::MatcherType::Image {
            return None;
        }
        Self::parse(kind.mime_type()).ok()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }

    /// 对应的解码器格式，内容嗅探失败时作为回退。
    pub(crate) fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::WebP => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! 展示用的结果视图：原图与缩放图的 Data URL、尺寸与可读体积。

use serde::Serialize;

use crate::resizer::{ResizeResult, SourceImage};

/// 宽高。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// 一次成功缩放后供界面对比展示的数据。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResizeOutcome {
    pub original_data_url: String,
    pub resized_data_url: String,
    pub original_dimensions: Dimensions,
    pub resized_dimensions: Dimensions,
    pub original_file_size: String,
    pub resized_file_size: String,
}

impl ResizeOutcome {
    pub fn new(source: &SourceImage, result: &ResizeResult) -> Self {
        Self {
            original_data_url: source.to_data_url(),
            resized_data_url: result.to_data_url(),
            original_dimensions: Dimensions {
                width: result.source_width,
                height: result.source_height,
            },
            resized_dimensions: Dimensions {
                width: result.output_width,
                height: result.output_height,
            },
            original_file_size: format_file_size(source.bytes.len() as u64),
            resized_file_size: format_file_size(result.encoded_bytes.len() as u64),
        }
    }
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// 以 1024 为进制格式化字节数，保留至多两位小数并去掉末尾的 0。
///
/// ```rust
/// use image_resizer::session::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

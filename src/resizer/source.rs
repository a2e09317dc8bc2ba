//! # 数据源与结果模型
//!
//! - `SourceImage`：已加载、尚未解码的字节与声明类型
//! - `ResizeResult`：编码后的 PNG 与尺寸信息，由调用方独占持有

use base64::{Engine as _, engine::general_purpose};

use super::{DOWNLOAD_FILE_NAME, OUTPUT_MEDIA_TYPE};

/// 单次缩放调用的输入。
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// 原始图片字节。
    pub bytes: Vec<u8>,
    /// 声明的媒体类型（未经校验的原始字符串）。
    pub media_type: String,
    /// 来源提示（用于日志与诊断）。
    pub source_hint: &'static str,
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            source_hint: "bytes",
        }
    }

    /// 以 Data URL 形式返回原图，供展示对比使用。
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// 缩放结果。`output_width == output_height == 100` 恒成立。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeResult {
    /// PNG 编码字节。
    pub encoded_bytes: Vec<u8>,
    pub output_width: u32,
    pub output_height: u32,
    /// 原图宽度（仅用于展示）。
    pub source_width: u32,
    /// 原图高度（仅用于展示）。
    pub source_height: u32,
}

impl ResizeResult {
    pub fn media_type(&self) -> &'static str {
        OUTPUT_MEDIA_TYPE
    }

    pub fn file_name(&self) -> &'static str {
        DOWNLOAD_FILE_NAME
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            OUTPUT_MEDIA_TYPE,
            general_purpose::STANDARD.encode(&self.encoded_bytes)
        )
    }
}

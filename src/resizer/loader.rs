//! # 加载模块
//!
//! ## 设计思路
//!
//! 统一把不同来源（本地文件 / Data URL / 纯 Base64）转换为 `SourceImage`，
//! 并在“尽可能早”的阶段执行体积限制，减少不必要的内存与 CPU 消耗。
//! 这里只负责取得字节和声明类型，允许列表校验仍由缩放入口完成。
//!
//! ## 实现思路
//!
//! - 文件：存在性 + metadata 体积限制 + 读取；声明类型优先使用调用方给出的值，
//!   其次取自扩展名，扩展名缺失或未知时按文件签名探测。
//! - Data URL：解析头部声明类型，估算解码后体积再解码。
//! - 纯 Base64：必须由调用方给出声明类型。

use base64::{Engine as _, engine::general_purpose};
use std::path::Path;

use super::{ImageConfig, MediaType, ResizeError, SourceImage};

/// 从本地路径加载图片。
pub fn load_from_file(
    path: impl AsRef<Path>,
    declared_media_type: Option<&str>,
    config: &ImageConfig,
) -> Result<SourceImage, ResizeError> {
    let file_path = path.as_ref();
    log::info!("📁 开始读取本地图片 - 路径: {}", file_path.display());

    if !file_path.exists() {
        return Err(ResizeError::FileSystem(format!("文件不存在：{}", file_path.display())));
    }

    let metadata = std::fs::metadata(file_path)
        .map_err(|e| ResizeError::FileSystem(format!("无法读取文件信息：{}", e)))?;

    if metadata.len() > config.max_input_bytes {
        return Err(ResizeError::Decode(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            metadata.len() as f64 / 1024.0 / 1024.0,
            config.max_input_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    let bytes = std::fs::read(file_path)
        .map_err(|e| ResizeError::FileSystem(format!("无法读取图片文件：{}", e)))?;

    let media_type = match declared_media_type {
        Some(declared) => declared.to_string(),
        None => file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaType::from_extension)
            .or_else(|| MediaType::sniff(&bytes))
            .map(|media_type| media_type.as_str().to_string())
            .ok_or_else(|| {
                ResizeError::InvalidMediaType(format!("无法判断文件类型：{}", file_path.display()))
            })?,
    };

    Ok(SourceImage {
        bytes,
        media_type,
        source_hint: "file",
    })
}

/// 从 Data URL 或纯 Base64 字符串加载图片。
///
/// `declared_media_type` 仅在输入不是 Data URL 时使用。
pub fn load_from_base64(
    data: &str,
    declared_media_type: Option<&str>,
    config: &ImageConfig,
) -> Result<SourceImage, ResizeError> {
    log::info!("📝 开始处理 base64 图片");

    let normalized = data.trim();
    let (media_type, payload) = match parse_data_url(normalized)? {
        Some((media_type, payload)) => (media_type.to_string(), payload),
        None => {
            let media_type = declared_media_type.ok_or_else(|| {
                ResizeError::InvalidMediaType("纯 Base64 输入缺少声明类型".to_string())
            })?;
            (media_type.to_string(), normalized)
        }
    };

    let bytes = decode_base64_with_limit(payload, config.max_input_bytes)?;

    Ok(SourceImage {
        bytes,
        media_type,
        source_hint: "base64",
    })
}

/// 拆分 `data:<type>;base64,<payload>`。非 Data URL 返回 `Ok(None)`。
fn parse_data_url(data: &str) -> Result<Option<(&str, &str)>, ResizeError> {
    let Some(rest) = data.strip_prefix("data:") else {
        return Ok(None);
    };

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ResizeError::Decode("Data URL 缺少数据段".to_string()))?;

    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| ResizeError::Decode("缺少 base64 标记".to_string()))?;

    Ok(Some((media_type, payload)))
}

fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, ResizeError> {
    let len = base64_data.trim().len() as u64;
    let groups = len
        .checked_add(3)
        .ok_or_else(|| ResizeError::Decode("Base64 输入长度溢出".to_string()))?
        / 4;

    groups
        .checked_mul(3)
        .ok_or_else(|| ResizeError::Decode("Base64 解码体积估算溢出".to_string()))
}

fn decode_base64_with_limit(payload: &str, max_input_bytes: u64) -> Result<Vec<u8>, ResizeError> {
    let estimated_len = estimate_base64_decoded_upper_bound_len(payload)?;
    if estimated_len > max_input_bytes {
        return Err(ResizeError::Decode(format!(
            "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
            estimated_len as f64 / 1024.0 / 1024.0,
            max_input_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ResizeError::Decode(format!("Base64 解码失败：{}", e)))
}

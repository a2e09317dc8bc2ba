//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载缩放链路中的所有失败，调用侧可按分支匹配，
//! 也可通过 `code()` / `stage()` 获得稳定的机器可读标识。
//! 任何失败都不会附带部分结果。

/// 缩放流程统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ResizeError {
    /// 声明的媒体类型不在允许列表内，在解码前即被拒绝。
    #[error("不支持的媒体类型：{0}")]
    InvalidMediaType(String),

    /// 字节无法解析为有效的栅格图像。
    #[error("解码错误：{0}")]
    Decode(String),

    /// 画布编码为 PNG 失败，视为不可恢复的运行故障。
    #[error("编码错误：{0}")]
    Encode(String),

    /// 加载阶段的文件读取失败（仅由 loader 产生）。
    #[error("文件错误：{0}")]
    FileSystem(String),
}

impl ResizeError {
    /// 稳定的错误码，供前端或脚本区分失败原因。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMediaType(_) => "invalid_media_type",
            Self::Decode(_) => "decode_error",
            Self::Encode(_) => "encode_error",
            Self::FileSystem(_) => "file_system_error",
        }
    }

    /// 出错所在阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidMediaType(_) => "validate",
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::FileSystem(_) => "load",
        }
    }
}

//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 缩放核心只产生 `ResizeError`；会话、配置、下载与 CLI 等调用层统一返回 `AppError`，
//! 替代分散的 `.map_err(|e| e.to_string())` 与 `expect()`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ResizeError`、`std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于 JSON 输出给前端或脚本。

use serde::Serialize;

use crate::resizer::ResizeError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 缩放流水线错误（类型校验 / 解码 / 编码）
    #[error("{0}")]
    Resize(#[from] ResizeError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置无效或无法解析
    #[error("配置错误: {0}")]
    Config(String),

    /// 当前没有可下载的结果
    #[error("没有可下载的缩放结果")]
    NoResult,

    /// 会话状态异常（锁中毒、后台任务失败等）
    #[error("会话错误: {0}")]
    Session(String),
}

impl AppError {
    /// 稳定错误码，缩放错误沿用 `ResizeError::code`。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Resize(err) => err.code(),
            Self::Io(_) => "io_error",
            Self::Config(_) => "config_error",
            Self::NoResult => "no_result",
            Self::Session(_) => "session_error",
        }
    }
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

//! # 图片缩放模块（resizer）
//!
//! ## 设计思路
//!
//! 将“加载 → 类型校验 → 解码 → 等比缩放居中 → 白底合成 → PNG 编码”
//! 按职责拆分为多个子模块：
//!
//! - `handler`：`ImageResizer`，编排整条处理流水线与配置快照
//! - `canvas`：`RasterBackend` 接口与基于 `image` / `fast_image_resize` 的默认实现
//! - `geometry`：缩放比例、居中偏移与栅格化规则
//! - `loader`：文件 / Data URL / Base64 加载与体积限制
//! - `media_type`：输入类型允许列表
//! - `config/error/source`：配置、错误、输入输出模型
//!
//! ## 调用链
//!
//! ```text
//! loader.rs（可选：文件 / Data URL → SourceImage）
//!    ↓
//! handler.rs（配置快照 + 阶段耗时日志）
//!    ├─ media_type.rs（允许列表，解码前拒绝）
//!    ├─ canvas.rs decode
//!    ├─ geometry.rs（scale / offset / PlacedRect）
//!    ├─ canvas.rs composite_on_canvas
//!    └─ canvas.rs encode_png
//!    ↓
//! ResizeResult（100×100 PNG + 原图尺寸）
//! ```

mod canvas;
mod config;
mod error;
mod geometry;
mod handler;
pub mod loader;
mod media_type;
mod source;

pub use canvas::{BACKGROUND, ImageCrateBackend, RasterBackend};
pub use config::{
    DOWNLOAD_FILE_NAME, ImageConfig, PngCompression, ResampleFilter, ResizeProfile, TARGET_SIZE,
};
pub use error::ResizeError;
pub use geometry::{FitTransform, PlacedRect};
pub use handler::ImageResizer;
pub use media_type::{MediaType, OUTPUT_MEDIA_TYPE};
pub use source::{ResizeResult, SourceImage};

/// 使用默认配置与默认后端执行一次缩放。
///
/// # 示例
/// ```rust,no_run
/// # fn demo(bytes: &[u8]) -> Result<(), image_resizer::resizer::ResizeError> {
/// let result = image_resizer::resizer::resize(bytes, "image/png")?;
/// std::fs::write(result.file_name(), &result.encoded_bytes).ok();
/// # Ok(())
/// # }
/// ```
pub fn resize(source_bytes: &[u8], declared_media_type: &str) -> Result<ResizeResult, ResizeError> {
    let config = ImageConfig::default();
    handler::run_with_backend(&ImageCrateBackend, source_bytes, declared_media_type, &config)
}

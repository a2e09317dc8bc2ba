//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageResizer` 只负责流程编排与配置管理，具体栅格能力由 `RasterBackend` 提供。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 校验声明类型（在任何解码之前）
//! 3. 解码并取得原图尺寸
//! 4. 计算等比缩放与居中落点
//! 5. 白底画布合成
//! 6. PNG 编码
//!
//! ## 实现思路
//!
//! - 配置通过 `RwLock<ImageConfig>` 支持运行时切换档位。
//! - 单次请求内使用同一配置快照，避免处理中途配置漂移。
//! - 记录 `decode/composite/encode/total` 阶段耗时，便于性能诊断。
//! - 每次调用彼此独立，不缓存任何输入或结果。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use image::GenericImageView;

use super::canvas::{ImageCrateBackend, RasterBackend};
use super::geometry::FitTransform;
use super::{ImageConfig, MediaType, ResizeError, ResizeProfile, ResizeResult, SourceImage, TARGET_SIZE};
use crate::error::AppError;

/// 缩放处理器。
pub struct ImageResizer {
    config: RwLock<ImageConfig>,
    backend: Arc<dyn RasterBackend>,
}

impl ImageResizer {
    /// 使用默认后端创建处理器。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use image_resizer::resizer::{ImageConfig, ImageResizer};
    ///
    /// let resizer = ImageResizer::new(ImageConfig::default())?;
    /// # Ok::<(), image_resizer::error::AppError>(())
    /// ```
    pub fn new(config: ImageConfig) -> Result<Self, AppError> {
        Self::with_backend(config, Arc::new(ImageCrateBackend))
    }

    /// 注入自定义栅格后端，主要用于测试或其他渲染环境。
    pub fn with_backend(config: ImageConfig, backend: Arc<dyn RasterBackend>) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            config: RwLock::new(config),
            backend,
        })
    }

    /// 获取配置快照。
    pub fn config_snapshot(&self) -> Result<ImageConfig, AppError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| AppError::Session("配置读取锁已中毒".to_string()))
    }

    /// 整体替换配置。
    pub fn set_config(&self, config: ImageConfig) -> Result<(), AppError> {
        config.validate()?;
        let mut guard = self
            .config
            .write()
            .map_err(|_| AppError::Session("配置写入锁已中毒".to_string()))?;
        *guard = config;
        Ok(())
    }

    /// 切换画质档位。
    pub fn set_profile(&self, profile: ResizeProfile) -> Result<(), AppError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| AppError::Session("配置写入锁已中毒".to_string()))?;
        config.apply_profile(profile);

        log::info!(
            "⚙️ 已切换画质档位：{:?}（filter={:?}, png={:?}）",
            profile,
            config.resize_filter,
            config.png_compression
        );

        Ok(())
    }

    /// 获取当前生效档位。
    pub fn profile(&self) -> Result<ResizeProfile, AppError> {
        Ok(self.config_snapshot()?.infer_profile())
    }

    /// 处理已加载的来源。
    pub fn resize_source(&self, source: &SourceImage) -> Result<ResizeResult, AppError> {
        let config = self.config_snapshot()?;
        log::debug!(
            "开始缩放 - 来源: {} 声明类型: {} 大小: {} 字节",
            source.source_hint,
            source.media_type,
            source.bytes.len()
        );
        Ok(self.run(&source.bytes, &source.media_type, &config)?)
    }

    /// 缩放主入口：字节 + 声明类型 → 100×100 PNG。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use image_resizer::resizer::{ImageConfig, ImageResizer};
    ///
    /// # fn demo(bytes: Vec<u8>) -> Result<(), image_resizer::error::AppError> {
    /// let resizer = ImageResizer::new(ImageConfig::default())?;
    /// let result = resizer.resize(&bytes, "image/jpeg")?;
    /// assert_eq!((result.output_width, result.output_height), (100, 100));
    /// # Ok(())
    /// # }
    /// ```
    pub fn resize(&self, source_bytes: &[u8], declared_media_type: &str) -> Result<ResizeResult, AppError> {
        let config = self.config_snapshot()?;
        Ok(self.run(source_bytes, declared_media_type, &config)?)
    }

    pub(crate) fn run(
        &self,
        source_bytes: &[u8],
        declared_media_type: &str,
        config: &ImageConfig,
    ) -> Result<ResizeResult, ResizeError> {
        run_with_backend(self.backend.as_ref(), source_bytes, declared_media_type, config)
    }
}

pub(crate) fn run_with_backend(
    backend: &dyn RasterBackend,
    source_bytes: &[u8],
    declared_media_type: &str,
    config: &ImageConfig,
) -> Result<ResizeResult, ResizeError> {
    let total_start = Instant::now();

    let media_type = MediaType::parse(declared_media_type)?;

    if source_bytes.len() as u64 > config.max_input_bytes {
        return Err(ResizeError::Decode(format!(
            "图片体积过大：{:.2} MB（限制：{:.2} MB）",
            source_bytes.len() as f64 / 1024.0 / 1024.0,
            config.max_input_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    let decode_start = Instant::now();
    let decoded = backend.decode(source_bytes, media_type, config)?;
    let (source_width, source_height) = decoded.dimensions();
    let decode_elapsed = decode_start.elapsed();

    let fit = FitTransform::compute(source_width, source_height, TARGET_SIZE);
    let placement = fit.rasterize(TARGET_SIZE);
    log::debug!(
        "📐 缩放参数：scale={:.4} scaled={:.2}x{:.2} offset=({:.2}, {:.2}) -> {:?}",
        fit.scale,
        fit.scaled_width,
        fit.scaled_height,
        fit.offset_x,
        fit.offset_y,
        placement
    );

    let composite_start = Instant::now();
    let canvas = backend.composite_on_canvas(&decoded, placement, config)?;
    let composite_elapsed = composite_start.elapsed();

    if canvas.dimensions() != (TARGET_SIZE, TARGET_SIZE) {
        return Err(ResizeError::Encode(format!(
            "画布尺寸异常：{}x{}",
            canvas.width(),
            canvas.height()
        )));
    }

    let encode_start = Instant::now();
    let encoded_bytes = backend.encode_png(&canvas, config)?;
    let encode_elapsed = encode_start.elapsed();

    log::info!(
        "✅ 缩放完成 - {} {}x{} -> {}x{} decode={}ms composite={}ms encode={}ms total={}ms",
        media_type,
        source_width,
        source_height,
        TARGET_SIZE,
        TARGET_SIZE,
        decode_elapsed.as_millis(),
        composite_elapsed.as_millis(),
        encode_elapsed.as_millis(),
        total_start.elapsed().as_millis()
    );

    Ok(ResizeResult {
        encoded_bytes,
        output_width: TARGET_SIZE,
        output_height: TARGET_SIZE,
        source_width,
        source_height,
    })
}

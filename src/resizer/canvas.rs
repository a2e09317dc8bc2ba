//! # 栅格后端模块
//!
//! ## 设计思路
//!
//! 把“解码 → 缩放合成 → PNG 编码”三项能力抽象为 `RasterBackend`，
//! 编排层（`handler.rs`）只依赖这个接口，可在其他二维栅格环境中复用。
//!
//! ## 实现思路
//!
//! 默认实现 `ImageCrateBackend`：
//! 1. `image::ImageReader` 嗅探格式（失败时用声明类型）并带 `Limits` 解码
//! 2. `fast_image_resize` 卷积缩放，失败时回退 `image::imageops::resize`
//! 3. 按 source-over 规则逐像素混合到纯白画布，输出恒为不透明
//! 4. 以最高压缩级别编码 PNG

use std::io::Cursor;

use fast_image_resize as fr;
use image::codecs::png::{self, PngEncoder};
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageReader, Rgba, RgbaImage};

use super::geometry::PlacedRect;
use super::{ImageConfig, MediaType, ResizeError, TARGET_SIZE};

/// 画布底色：不透明纯白。
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// 二维栅格能力接口。
pub trait RasterBackend: Send + Sync {
    /// 将字节解码为栅格图像。`hint` 为声明类型，仅在内容嗅探失败时使用。
    fn decode(
        &self,
        bytes: &[u8],
        hint: MediaType,
        config: &ImageConfig,
    ) -> Result<DynamicImage, ResizeError>;

    /// 将图像缩放到 `placement` 的尺寸并合成到白底画布上。
    fn composite_on_canvas(
        &self,
        image: &DynamicImage,
        placement: PlacedRect,
        config: &ImageConfig,
    ) -> Result<RgbaImage, ResizeError>;

    /// 将画布编码为 PNG 字节。
    fn encode_png(&self, canvas: &RgbaImage, config: &ImageConfig) -> Result<Vec<u8>, ResizeError>;
}

/// 快速缩放路径的失败原因，只用于回退前的日志。
#[derive(Debug, thiserror::Error)]
enum ScaleError {
    #[error("构建源图像缓冲失败：{0}")]
    Buffer(#[from] fr::ImageBufferError),

    #[error("缩放执行失败：{0}")]
    Resize(#[from] fr::ResizeError),

    #[error("输出缓冲长度异常")]
    BufferLength,
}

/// 基于 `image` + `fast_image_resize` 的默认实现。
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateBackend;

impl RasterBackend for ImageCrateBackend {
    fn decode(
        &self,
        bytes: &[u8],
        hint: MediaType,
        config: &ImageConfig,
    ) -> Result<DynamicImage, ResizeError> {
        if bytes.is_empty() {
            return Err(ResizeError::Decode("图片内容为空".to_string()));
        }

        let (header_width, header_height) = Self::inspect_dimensions(bytes, hint)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;

        let mut reader = Self::reader_for(bytes, hint)?;
        reader.limits(config.decode_limits());

        let decoded = reader
            .decode()
            .map_err(|e| ResizeError::Decode(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(ResizeError::Decode(format!("图片尺寸无效：{}x{}", width, height)));
        }

        Ok(decoded)
    }

    fn composite_on_canvas(
        &self,
        image: &DynamicImage,
        placement: PlacedRect,
        config: &ImageConfig,
    ) -> Result<RgbaImage, ResizeError> {
        let scaled = match Self::resize_with_fast_image_resize(image, placement, config) {
            Ok(scaled) => scaled,
            Err(err) => {
                log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}", err);
                image::imageops::resize(
                    &image.to_rgba8(),
                    placement.width,
                    placement.height,
                    config.resize_filter.to_image_filter(),
                )
            }
        };

        let mut canvas = ImageBuffer::from_pixel(TARGET_SIZE, TARGET_SIZE, BACKGROUND);
        Self::blend_over_background(&mut canvas, &scaled, placement);

        Ok(canvas)
    }

    fn encode_png(&self, canvas: &RgbaImage, config: &ImageConfig) -> Result<Vec<u8>, ResizeError> {
        let mut buf = Cursor::new(Vec::new());
        let encoder = PngEncoder::new_with_quality(
            &mut buf,
            config.png_compression.to_compression_type(),
            png::FilterType::Adaptive,
        );

        canvas
            .write_with_encoder(encoder)
            .map_err(|e| ResizeError::Encode(format!("PNG 编码失败：{}", e)))?;

        Ok(buf.into_inner())
    }
}

impl ImageCrateBackend {
    /// 优先按内容嗅探格式，嗅探失败时使用声明类型。
    fn reader_for(bytes: &[u8], hint: MediaType) -> Result<ImageReader<Cursor<&[u8]>>, ResizeError> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ResizeError::Decode(format!("无法识别图片格式：{}", e)))?;

        if reader.format().is_none() {
            log::debug!("内容嗅探未识别格式，按声明类型 {} 解码", hint);
            reader.set_format(hint.image_format());
        }

        Ok(reader)
    }

    /// 仅读取头信息中的宽高，用于完整解码前的像素限制检查。
    fn inspect_dimensions(bytes: &[u8], hint: MediaType) -> Result<(u32, u32), ResizeError> {
        Self::reader_for(bytes, hint)?
            .into_dimensions()
            .map_err(|e| ResizeError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    fn validate_pixel_limits(config: &ImageConfig, width: u32, height: u32) -> Result<(), ResizeError> {
        if width == 0 || height == 0 {
            return Err(ResizeError::Decode(format!("图片尺寸无效：{}x{}", width, height)));
        }

        let pixels = u64::from(width) * u64::from(height);
        if pixels > config.max_decoded_pixels {
            return Err(ResizeError::Decode(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    /// `out = src * a + bg * (1 - a)`，结果 alpha 固定为 255。
    fn blend_over_background(canvas: &mut RgbaImage, scaled: &RgbaImage, placement: PlacedRect) {
        for (x, y, src) in scaled.enumerate_pixels() {
            let (cx, cy) = (placement.x + x, placement.y + y);
            if cx >= canvas.width() || cy >= canvas.height() {
                continue;
            }

            let alpha = u32::from(src[3]);
            let mut out = BACKGROUND;
            for channel in 0..3 {
                let fg = u32::from(src[channel]);
                let bg = u32::from(BACKGROUND[channel]);
                out[channel] = ((fg * alpha + bg * (255 - alpha) + 127) / 255) as u8;
            }
            canvas.put_pixel(cx, cy, out);
        }
    }

    fn resize_with_fast_image_resize(
        image: &DynamicImage,
        placement: PlacedRect,
        config: &ImageConfig,
    ) -> Result<RgbaImage, ScaleError> {
        let src = image.to_rgba8();
        let (src_width, src_height) = src.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            src.into_raw(),
            fr::PixelType::U8x4,
        )?;

        let mut dst_image = fr::images::Image::new(placement.width, placement.height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(config.resize_filter.to_fast_filter()));

        resizer.resize(&src_image, &mut dst_image, Some(&options))?;

        ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(placement.width, placement.height, dst_image.into_vec())
            .ok_or(ScaleError::BufferLength)
    }
}

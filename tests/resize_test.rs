// 缩放核心的端到端测试：只通过公开 API 调用
use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use image_resizer::error::AppError;
use image_resizer::resizer::{
    self, FitTransform, ImageConfig, ImageResizer, ResizeError, ResizeProfile, TARGET_SIZE,
};
use proptest::prelude::*;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn encode(img: RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    let dynamic = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
        _ => DynamicImage::ImageRgba8(img),
    };
    dynamic
        .write_to(&mut cursor, format)
        .expect("failed to encode test image");
    cursor.into_inner()
}

fn solid_png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    encode(ImageBuffer::from_pixel(width, height, color), ImageFormat::Png)
}

fn decode_output(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .expect("output must be a valid PNG")
        .to_rgba8()
}

#[test]
fn test_landscape_is_letterboxed_top_and_bottom() {
    let result = resizer::resize(&solid_png(200, 100, RED), "image/png").expect("resize failed");
    assert_eq!((result.output_width, result.output_height), (100, 100));
    assert_eq!((result.source_width, result.source_height), (200, 100));

    let out = decode_output(&result.encoded_bytes);
    assert_eq!(out.dimensions(), (100, 100));
    for x in [0, 50, 99] {
        assert_eq!(*out.get_pixel(x, 0), WHITE);
        assert_eq!(*out.get_pixel(x, 24), WHITE);
        assert_eq!(*out.get_pixel(x, 75), WHITE);
        assert_eq!(*out.get_pixel(x, 99), WHITE);
        assert_eq!(*out.get_pixel(x, 50), RED);
    }
}

#[test]
fn test_portrait_is_letterboxed_left_and_right() {
    let result = resizer::resize(&solid_png(100, 200, RED), "IMAGE/PNG").expect("resize failed");
    let out = decode_output(&result.encoded_bytes);

    for y in [0, 50, 99] {
        assert_eq!(*out.get_pixel(0, y), WHITE);
        assert_eq!(*out.get_pixel(24, y), WHITE);
        assert_eq!(*out.get_pixel(75, y), WHITE);
        assert_eq!(*out.get_pixel(99, y), WHITE);
        assert_eq!(*out.get_pixel(50, y), RED);
    }
}

#[test]
fn test_square_and_tiny_inputs_fill_canvas() {
    for size in [10, 100, 400] {
        let result = resizer::resize(&solid_png(size, size, RED), "image/png").expect("resize failed");
        let out = decode_output(&result.encoded_bytes);

        assert_eq!(*out.get_pixel(0, 0), RED, "size {size}");
        assert_eq!(*out.get_pixel(99, 99), RED, "size {size}");
    }
}

#[test]
fn test_transparent_source_becomes_white() {
    let bytes = solid_png(64, 32, Rgba([0, 0, 0, 0]));
    let result = resizer::resize(&bytes, "image/png").expect("resize failed");
    let out = decode_output(&result.encoded_bytes);

    assert!(out.pixels().all(|p| *p == WHITE));
}

#[test]
fn test_semi_transparent_source_is_flattened_to_opaque() {
    for alpha in [1, 128, 200, 254] {
        let bytes = solid_png(50, 50, Rgba([0, 0, 0, alpha]));
        let result = resizer::resize(&bytes, "image/png").expect("resize failed");
        let out = decode_output(&result.encoded_bytes);

        assert!(out.pixels().all(|p| p[3] == 255), "alpha {alpha} leaked into output");
    }

    let gradient: RgbaImage = ImageBuffer::from_fn(300, 200, |x, y| {
        let alpha = if x % 50 < 10 { 0 } else { ((x + y) % 256) as u8 };
        Rgba([(x % 256) as u8, (y % 256) as u8, 90, alpha])
    });
    let result = resizer::resize(&encode(gradient, ImageFormat::Png), "image/png").expect("resize failed");
    let out = decode_output(&result.encoded_bytes);
    assert!(out.pixels().all(|p| p[3] == 255));
}

#[test]
fn test_other_allowed_formats_are_accepted() {
    let img: RgbaImage = ImageBuffer::from_fn(30, 60, |x, _| {
        if x < 15 { RED } else { Rgba([0, 0, 255, 255]) }
    });

    let cases = [
        (ImageFormat::Jpeg, "image/jpg"),
        (ImageFormat::Jpeg, "image/jpeg"),
        (ImageFormat::Gif, "image/gif"),
        (ImageFormat::Bmp, "image/bmp"),
        (ImageFormat::WebP, "image/webp"),
    ];

    for (format, media_type) in cases {
        let result = resizer::resize(&encode(img.clone(), format), media_type)
            .unwrap_or_else(|e| panic!("{media_type} failed: {e}"));
        assert_eq!((result.source_width, result.source_height), (30, 60));
        assert_eq!(result.media_type(), "image/png");
    }
}

#[test]
fn test_non_image_media_type_is_rejected_before_decode() {
    let err = resizer::resize(&solid_png(10, 10, RED), "text/plain").expect_err("must fail");
    assert!(matches!(err, ResizeError::InvalidMediaType(_)));
    assert_eq!(err.stage(), "validate");

    let err = resizer::resize(b"", "image/svg+xml").expect_err("must fail");
    assert!(matches!(err, ResizeError::InvalidMediaType(_)));
}

#[test]
fn test_truncated_or_empty_input_is_decode_error() {
    let bytes = solid_png(50, 50, RED);

    let err = resizer::resize(&bytes[..bytes.len() / 3], "image/png").expect_err("must fail");
    assert!(matches!(err, ResizeError::Decode(_)));

    let err = resizer::resize(&[], "image/jpeg").expect_err("must fail");
    assert_eq!(err.code(), "decode_error");
}

#[test]
fn test_repeated_calls_are_stable() {
    let bytes = solid_png(123, 45, RED);
    let first = resizer::resize(&bytes, "image/png").expect("resize failed");
    let second = resizer::resize(&bytes, "image/png").expect("resize failed");

    assert_eq!(
        (first.output_width, first.output_height, first.source_width, first.source_height),
        (second.output_width, second.output_height, second.source_width, second.source_height)
    );

    let gradient: RgbaImage = ImageBuffer::from_fn(123, 45, |x, y| {
        Rgba([(x * 2 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let bytes = encode(gradient, ImageFormat::Png);
    let first = resizer::resize(&bytes, "image/png").expect("resize failed");
    let second = resizer::resize(&bytes, "image/png").expect("resize failed");

    assert_eq!(decode_output(&first.encoded_bytes), decode_output(&second.encoded_bytes));
}

#[test]
fn test_content_signature_decides_decoder_for_allowed_type() {
    let handler = ImageResizer::new(ImageConfig::default()).expect("resizer init failed");
    handler.set_profile(ResizeProfile::Speed).expect("set profile failed");

    // 声明类型只做允许列表校验，解码格式按文件签名判断
    let result = handler
        .resize(&solid_png(640, 480, RED), "image/webp")
        .expect("allowed type with png content should decode");
    assert_eq!((result.source_width, result.source_height), (640, 480));
    assert_eq!((result.output_width, result.output_height), (100, 100));

    let err = handler
        .resize(&solid_png(640, 480, RED), "application/octet-stream")
        .expect_err("must fail");
    assert!(matches!(err, AppError::Resize(ResizeError::InvalidMediaType(_))));
}

#[test]
fn test_data_url_round_trip_through_loader() {
    let config = ImageConfig::default();
    let bytes = solid_png(20, 10, RED);
    let original = resizer::SourceImage::new(bytes, "image/png");

    let loaded = resizer::loader::load_from_base64(&original.to_data_url(), None, &config)
        .expect("load failed");
    assert_eq!(loaded.media_type, "image/png");

    let handler = ImageResizer::new(config).expect("resizer init failed");
    let result = handler.resize_source(&loaded).expect("resize failed");
    assert!(result.to_data_url().starts_with("data:image/png;base64,"));
    assert_eq!(result.file_name(), "resized-image-100x100.png");
}

proptest! {
    #[test]
    fn prop_placement_stays_inside_canvas(w in 1u32..=10_000, h in 1u32..=10_000) {
        let fit = FitTransform::compute(w, h, TARGET_SIZE);
        let rect = fit.rasterize(TARGET_SIZE);

        prop_assert!(rect.width >= 1 && rect.height >= 1);
        prop_assert!(rect.x + rect.width <= TARGET_SIZE);
        prop_assert!(rect.y + rect.height <= TARGET_SIZE);
        // 至少一条边贴满画布
        prop_assert!(rect.width == TARGET_SIZE || rect.height == TARGET_SIZE);
    }

    #[test]
    fn prop_scale_is_the_tighter_ratio(w in 1u32..=10_000, h in 1u32..=10_000) {
        let fit = FitTransform::compute(w, h, TARGET_SIZE);
        let expected = (100.0 / w as f64).min(100.0 / h as f64);

        prop_assert!((fit.scale - expected).abs() < 1e-12);
        prop_assert!(fit.scaled_width <= 100.0 + 1e-9);
        prop_assert!(fit.scaled_height <= 100.0 + 1e-9);
        prop_assert!((fit.offset_x - (100.0 - fit.scaled_width) / 2.0).abs() < 1e-9);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_output_is_always_100_square(w in 1u32..=300, h in 1u32..=300) {
        let result = resizer::resize(&solid_png(w, h, RED), "image/png")
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!((result.output_width, result.output_height), (100, 100));
        prop_assert_eq!((result.source_width, result.source_height), (w, h));
        prop_assert_eq!(decode_output(&result.encoded_bytes).dimensions(), (100, 100));
    }
}

//! # 几何计算模块
//!
//! 等比缩放进正方形画布并居中（letterbox）。
//! `FitTransform` 保留连续值，`PlacedRect` 是栅格化后的整数落点。
//!
//! 栅格化规则：缩放后的宽高四舍五入（远离零），并夹在 `[1, target]` 内；
//! 偏移量为 `(target - 边长) / 2` 的整数除法（向下取整）。

/// 连续坐标下的缩放与居中参数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    pub scale: f64,
    pub scaled_width: f64,
    pub scaled_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// 栅格化后的绘制区域，始终完整落在画布内。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FitTransform {
    /// 计算把 `src_w × src_h` 等比放入 `target × target` 画布的参数。
    ///
    /// 允许放大：小图同样铺满较长的一边。
    /// 调用方保证 `src_w`、`src_h`、`target` 均为正数。
    pub fn compute(src_w: u32, src_h: u32, target: u32) -> Self {
        let target = f64::from(target);
        let (w, h) = (f64::from(src_w), f64::from(src_h));

        let scale = (target / w).min(target / h);
        let scaled_width = w * scale;
        let scaled_height = h * scale;

        Self {
            scale,
            scaled_width,
            scaled_height,
            offset_x: (target - scaled_width) / 2.0,
            offset_y: (target - scaled_height) / 2.0,
        }
    }

    /// 栅格化为整数区域。
    pub fn rasterize(&self, target: u32) -> PlacedRect {
        let width = Self::round_clamped(self.scaled_width, target);
        let height = Self::round_clamped(self.scaled_height, target);

        PlacedRect {
            x: (target - width) / 2,
            y: (target - height) / 2,
            width,
            height,
        }
    }

    fn round_clamped(value: f64, target: u32) -> u32 {
        // NaN 时 as 转换得到 0，随后被夹到 1
        (value.round() as u32).clamp(1, target)
    }
}

impl PlacedRect {
    /// 点 `(px, py)` 是否落在绘制区域内。
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_input_fills_canvas_without_offset() {
        let fit = FitTransform::compute(400, 400, 100);
        assert_eq!(fit.scale, 0.25);
        assert_eq!((fit.offset_x, fit.offset_y), (0.0, 0.0));
        assert_eq!(
            fit.rasterize(100),
            PlacedRect { x: 0, y: 0, width: 100, height: 100 }
        );
    }

    #[test]
    fn landscape_is_letterboxed_vertically() {
        let fit = FitTransform::compute(200, 100, 100);
        assert_eq!(fit.scale, 0.5);
        assert_eq!((fit.scaled_width, fit.scaled_height), (100.0, 50.0));
        assert_eq!((fit.offset_x, fit.offset_y), (0.0, 25.0));
        assert_eq!(
            fit.rasterize(100),
            PlacedRect { x: 0, y: 25, width: 100, height: 50 }
        );
    }

    #[test]
    fn portrait_is_letterboxed_horizontally() {
        let fit = FitTransform::compute(100, 200, 100);
        assert_eq!(fit.scale, 0.5);
        assert_eq!((fit.scaled_width, fit.scaled_height), (50.0, 100.0));
        assert_eq!((fit.offset_x, fit.offset_y), (25.0, 0.0));
        assert_eq!(
            fit.rasterize(100),
            PlacedRect { x: 25, y: 0, width: 50, height: 100 }
        );
    }

    #[test]
    fn tiny_input_is_upscaled() {
        let fit = FitTransform::compute(10, 10, 100);
        assert_eq!(fit.scale, 10.0);
        assert_eq!((fit.scaled_width, fit.scaled_height), (100.0, 100.0));
        assert_eq!((fit.offset_x, fit.offset_y), (0.0, 0.0));
    }

    #[test]
    fn fractional_geometry_rounds_then_centers() {
        // 300x200 -> 100 x 66.67
        let rect = FitTransform::compute(300, 200, 100).rasterize(100);
        assert_eq!(rect, PlacedRect { x: 0, y: 16, width: 100, height: 67 });
    }

    #[test]
    fn extreme_aspect_keeps_at_least_one_pixel() {
        let rect = FitTransform::compute(10_000, 1, 100).rasterize(100);
        assert_eq!(rect, PlacedRect { x: 0, y: 49, width: 100, height: 1 });
    }

    #[test]
    fn contains_respects_bounds() {
        let rect = PlacedRect { x: 0, y: 25, width: 100, height: 50 };
        assert!(rect.contains(0, 25));
        assert!(rect.contains(99, 74));
        assert!(!rect.contains(50, 24));
        assert!(!rect.contains(50, 75));
    }
}

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_text_mut,
};
use ndarray::Array2;

use crate::config::{Config, VisualsConfig};
use crate::{Coord2d, Shape2d};

/// 掩码叠加的不透明度.
const MASK_ALPHA: f32 = 0.4;

/// 内置字体.
const FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

fn font() -> Option<FontRef<'static>> {
    match FontRef::try_from_slice(FONT_DATA) {
        Ok(f) => Some(f),
        Err(e) => {
            log::error!("Failed to load embedded font, text skipped: {e}");
            None
        }
    }
}

/// 文字级别.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextStyle {
    /// 正文.
    Body,

    /// 一级标题.
    H1,

    /// 二级标题.
    H2,
}

impl TextStyle {
    /// 相对于正文字号的倍数.
    #[inline]
    pub const fn scale(&self) -> f32 {
        match self {
            TextStyle::Body => 1.0,
            TextStyle::H1 => 2.0,
            TextStyle::H2 => 1.5,
        }
    }
}

/// 一条绘制指令.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// 线段.
    Line {
        /// 起点.
        from: Coord2d,
        /// 终点.
        to: Coord2d,
        /// 颜色.
        color: [u8; 3],
        /// 线宽.
        thickness: u32,
    },

    /// 十字标记.
    Cross {
        /// 中心.
        at: Coord2d,
        /// 半臂长.
        size: u32,
        /// 颜色.
        color: [u8; 3],
    },

    /// 圆.
    Circle {
        /// 圆心.
        center: Coord2d,
        /// 半径.
        radius: u32,
        /// 颜色.
        color: [u8; 3],
        /// 是否填充.
        filled: bool,
    },

    /// 文字.
    Text {
        /// 内容.
        text: String,
        /// 左上角.
        at: Coord2d,
        /// 字号 (像素).
        size: u32,
        /// 颜色.
        color: [u8; 3],
    },

    /// 半透明掩码. 形状须与图像一致, 以 `(h, w)` 索引.
    Mask {
        /// 掩码.
        mask: Array2<u8>,
        /// 颜色.
        color: [u8; 3],
    },
}

/// 绘制图层.
///
/// 钩子可以对图层做任意修改; 失败时图层会被回滚到调用前的拷贝, 因此本类型必须廉价可克隆
/// (掩码除外).
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    shape: Shape2d,
    visuals: VisualsConfig,
    ops: Vec<DrawOp>,
}

impl Overlay {
    /// 为形状为 `(h, w)` 的图像创建空图层.
    pub fn new(shape: Shape2d, config: &Config) -> Self {
        Self {
            shape,
            visuals: config.visuals.clone(),
            ops: vec![],
        }
    }

    /// 图像形状 `(h, w)`.
    #[inline]
    pub fn shape(&self) -> Shape2d {
        self.shape
    }

    /// 绘制指令个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// 是否没有任何指令.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// 全部指令.
    #[inline]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// 所有文字指令的内容, 按绘制顺序.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// 写字. `grafs` 为真时使用 Graf 高亮色.
    pub fn draw_text<S: Into<String>>(&mut self, text: S, x: i32, y: i32, style: TextStyle, grafs: bool) {
        let size = (self.visuals.default_font_size as f32 * style.scale()).round() as u32;
        let color = if grafs {
            self.visuals.graf_color
        } else {
            self.visuals.text_color
        };
        self.ops.push(DrawOp::Text {
            text: text.into(),
            at: (x, y),
            size,
            color,
        });
    }

    /// 以标志点颜色和半径画十字.
    pub fn draw_cross(&mut self, at: Coord2d) {
        self.ops.push(DrawOp::Cross {
            at,
            size: self.visuals.points_radius,
            color: self.visuals.points_color,
        });
    }

    /// 以配置线宽画线段.
    pub fn draw_line(&mut self, from: Coord2d, to: Coord2d, color: [u8; 3]) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            thickness: self.visuals.line_thickness,
        });
    }

    /// 画圆.
    pub fn draw_circle(&mut self, center: Coord2d, radius: u32, color: [u8; 3], filled: bool) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
            filled,
        });
    }

    /// 叠加掩码. 形状与图像不一致时 panic.
    pub fn draw_mask(&mut self, mask: Array2<u8>, color: [u8; 3]) {
        assert_eq!(mask.dim(), self.shape, "掩码形状必须与图像一致");
        self.ops.push(DrawOp::Mask { mask, color });
    }

    /// 把图层按指令顺序栅格化到 `base` 的拷贝上.
    pub fn apply_to_image(&self, base: &RgbImage) -> RgbImage {
        let mut img = base.clone();
        let font = match self.texts().next() {
            Some(_) => font(),
            None => None,
        };
        for op in &self.ops {
            match op {
                DrawOp::Mask { mask, color } => blend_mask(&mut img, mask, *color),
                DrawOp::Line {
                    from,
                    to,
                    color,
                    thickness,
                } => thick_line(&mut img, *from, *to, Rgb(*color), *thickness),
                DrawOp::Cross { at, size, color } => {
                    let s = *size as i32;
                    let (x, y) = *at;
                    thick_line(&mut img, (x - s, y), (x + s, y), Rgb(*color), 1);
                    thick_line(&mut img, (x, y - s), (x, y + s), Rgb(*color), 1);
                }
                DrawOp::Circle {
                    center,
                    radius,
                    color,
                    filled,
                } => {
                    if *filled {
                        draw_filled_circle_mut(&mut img, *center, *radius as i32, Rgb(*color));
                    } else {
                        draw_hollow_circle_mut(&mut img, *center, *radius as i32, Rgb(*color));
                    }
                }
                DrawOp::Text {
                    text,
                    at,
                    size,
                    color,
                } => {
                    if let (Some(font), true) = (&font, *size > 0) {
                        let (x, y) = *at;
                        let scale = PxScale::from(*size as f32);
                        draw_text_mut(&mut img, Rgb(*color), x, y, scale, font, text);
                    }
                }
            }
        }
        img
    }
}

/// 以 1 像素线段叠出粗线. 偏移沿较短的轴方向展开.
fn thick_line(img: &mut RgbImage, (x0, y0): Coord2d, (x1, y1): Coord2d, color: Rgb<u8>, thickness: u32) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let n = thickness.max(1) as i32;
    for o in (0..n).map(|k| k - (n - 1) / 2) {
        let (dx, dy) = if steep { (o, 0) } else { (0, o) };
        draw_line_segment_mut(
            img,
            ((x0 + dx) as f32, (y0 + dy) as f32),
            ((x1 + dx) as f32, (y1 + dy) as f32),
            color,
        );
    }
}

fn blend_mask(img: &mut RgbImage, mask: &Array2<u8>, color: [u8; 3]) {
    let (w, h) = img.dimensions();
    for ((r, c), _) in mask.indexed_iter().filter(|&(_, &m)| m != 0) {
        if r >= h as usize || c >= w as usize {
            continue;
        }
        let px = img.get_pixel_mut(c as u32, r as u32);
        for (ch, &col) in px.0.iter_mut().zip(&color) {
            *ch = (*ch as f32 * (1.0 - MASK_ALPHA) + col as f32 * MASK_ALPHA).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::rgb;

    #[test]
    fn test_ops_are_recorded() {
        let config = Config::test_default_us();
        let mut o = Overlay::new((20, 30), &config);
        o.draw_text("alpha", 1, 2, TextStyle::H1, true);
        o.draw_cross((5, 5));
        assert_eq!(o.len(), 2);
        assert_eq!(o.texts().collect::<Vec<_>>(), vec!["alpha"]);
        match &o.ops()[0] {
            DrawOp::Text { size, color, .. } => {
                assert_eq!(*size, config.visuals.default_font_size * 2);
                assert_eq!(*color, config.visuals.graf_color);
            }
            op => panic!("unexpected {op:?}"),
        }
    }

    #[test]
    fn test_apply_to_image() {
        let config = Config::test_default_us();
        let base = RgbImage::new(30, 20);
        let mut o = Overlay::new((20, 30), &config);

        let mut mask = Array2::<u8>::zeros((20, 30));
        mask[(19, 29)] = 1;
        o.draw_mask(mask, rgb::WHITE);
        o.draw_line((0, 10), (29, 10), rgb::RED);

        let img = o.apply_to_image(&base);
        assert_eq!(img.dimensions(), (30, 20));
        assert_eq!(img.get_pixel(15, 10).0, rgb::RED);
        assert_eq!(img.get_pixel(29, 19).0, [102, 102, 102]);
        assert_eq!(img.get_pixel(0, 0).0, rgb::BLACK);
        // 原图不受影响.
        assert_eq!(base.get_pixel(15, 10).0, rgb::BLACK);
    }

    #[test]
    fn test_text_is_rasterized() {
        let config = Config::test_default_us();
        let base = RgbImage::new(300, 60);
        let mut o = Overlay::new((60, 300), &config);
        o.draw_text("alpha: 63.00", 5, 5, TextStyle::Body, false);

        let img = o.apply_to_image(&base);
        let changed = img
            .pixels()
            .zip(base.pixels())
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed > 0);
        // 文字只占左侧.
        assert_eq!(img.get_pixel(299, 59).0, rgb::BLACK);

        // 字号为 0 时不绘制.
        let mut empty = Overlay::new((60, 300), &config);
        empty.ops.push(DrawOp::Text {
            text: "x".to_owned(),
            at: (5, 5),
            size: 0,
            color: rgb::WHITE,
        });
        assert_eq!(empty.apply_to_image(&base), base);
    }

    #[test]
    #[should_panic]
    fn test_mask_shape_mismatch() {
        let config = Config::test_default_us();
        let mut o = Overlay::new((20, 30), &config);
        o.draw_mask(Array2::zeros((30, 20)), rgb::WHITE);
    }
}

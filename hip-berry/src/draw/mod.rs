//! 绘制.
//!
//! [`Overlay`] 只记录绘制指令, 最后由 [`Overlay::apply_to_image`] 一次性栅格化到原图上.
//! 文字使用内置的 DejaVu Sans 字体绘制.

mod hip_us;
mod overlay;

pub use hip_us::{draw_hips_us, draw_overlays_us};
pub use overlay::{DrawOp, Overlay, TextStyle};

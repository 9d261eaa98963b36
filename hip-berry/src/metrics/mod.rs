//! 基于标志点和网格的几何指标.

pub mod alpha;
pub mod centering;
pub mod coverage;
pub mod ilium;

use num::Float;

use crate::{Coord2d, Coord2dF};

pub use alpha::{bad_alpha, find_alpha_angle};
pub use centering::{centering_available, get_centering_ratio, CenteringPoints};
pub use coverage::{bad_coverage, find_coverage};
pub use ilium::{apex_right_points_too_close, left_apex_line_flat};

/// 整数像素坐标转为浮点坐标.
#[inline]
pub(crate) fn to_f((x, y): Coord2d) -> Coord2dF {
    (x as f64, y as f64)
}

/// 两点之间的欧几里得距离.
#[inline]
pub(crate) fn distance<T: Float>((ax, ay): (T, T), (bx, by): (T, T)) -> T {
    (ax - bx).hypot(ay - by)
}

/// 四舍五入到小数点后 `decimals` 位.
#[inline]
pub(crate) fn round_to<T: Float>(v: T, decimals: i32) -> T {
    let Some(ten) = T::from(10.0) else {
        return v;
    };
    let k = ten.powi(decimals);
    (v * k).round() / k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456_f64, 2), 1.23);
        assert_eq!(round_to(-0.66_f64, 1), -0.7);
        assert_eq!(round_to(2.0_f32, 3), 2.0);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(to_f((0, 0)), to_f((3, 4))), 5.0);
    }
}

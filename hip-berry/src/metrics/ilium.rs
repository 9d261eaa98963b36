//! 髂骨线与 apex 附近的几何合理性检查.

use super::{distance, to_f};
use crate::consts::{APEX_RIGHT_MIN_DIST, ILIUM_FLAT_MAX_DEG};
use crate::data::LandmarksUs;

/// `left -> apex` 线段与水平方向的夹角是否小于 [`ILIUM_FLAT_MAX_DEG`].
///
/// 缺少 `left` 或 `apex` 时视为平坦, 交由后续规则处理.
/// 两点重合或竖直时夹角无定义, 视为不平坦.
pub fn left_apex_line_flat(lm: &LandmarksUs) -> bool {
    let (Some(left), Some(apex)) = (lm.left, lm.apex) else {
        return true;
    };
    let dx = (apex.0 - left.0).abs() as f64;
    let dy = (apex.1 - left.1).abs() as f64;
    if dx == 0.0 {
        return false;
    }
    dy.atan2(dx).to_degrees() < ILIUM_FLAT_MAX_DEG
}

/// `apex` 与 `right` 是否距离过近 (小于 [`APEX_RIGHT_MIN_DIST`] 像素).
///
/// 缺少任一点时视为过近.
pub fn apex_right_points_too_close(lm: &LandmarksUs) -> bool {
    match (lm.apex, lm.right) {
        (Some(apex), Some(right)) => distance(to_f(apex), to_f(right)) < APEX_RIGHT_MIN_DIST,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lm(left: Option<(i32, i32)>, apex: Option<(i32, i32)>, right: Option<(i32, i32)>) -> LandmarksUs {
        LandmarksUs {
            left,
            apex,
            right,
            ..Default::default()
        }
    }

    #[test]
    fn test_flat() {
        assert!(left_apex_line_flat(&lm(Some((0, 100)), Some((100, 105)), None)));
        // atan(20 / 100) 约 11.3 度.
        assert!(!left_apex_line_flat(&lm(Some((0, 100)), Some((100, 120)), None)));
        assert!(!left_apex_line_flat(&lm(Some((100, 0)), Some((100, 50)), None)));
        assert!(!left_apex_line_flat(&lm(Some((7, 7)), Some((7, 7)), None)));
        assert!(left_apex_line_flat(&lm(None, Some((100, 120)), None)));
    }

    #[test]
    fn test_too_close() {
        assert!(apex_right_points_too_close(&lm(None, Some((0, 0)), Some((10, 10)))));
        assert!(!apex_right_points_too_close(&lm(None, Some((0, 0)), Some((30, 0)))));
        assert!(apex_right_points_too_close(&lm(None, Some((0, 0)), None)));
        assert!(apex_right_points_too_close(&lm(None, None, None)));
    }
}

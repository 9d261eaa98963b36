//! alpha 角.

use super::{distance, round_to, to_f};
use crate::consts::ALPHA_SENSIBLE;
use crate::data::{HipDataUs, LandmarksUs, MetricUs};

/// 计算 alpha 角 (角度, 保留两位小数).
///
/// 取 `left`, `apex`, `right` 三点构成的三角形在 `apex` 处的内角 (余弦定理),
/// alpha = 180 - 内角. 结果位于 `[0, 180)`; 缺点, 三角形退化或数值为 NaN 时返回 0.
pub fn find_alpha_angle(landmarks: Option<&LandmarksUs>) -> f64 {
    let Some(lm) = landmarks else {
        return 0.0;
    };
    let (Some(left), Some(apex), Some(right)) = (lm.left, lm.apex, lm.right) else {
        return 0.0;
    };
    let (left, apex, right) = (to_f(left), to_f(apex), to_f(right));

    let a = distance(left, apex);
    let b = distance(right, apex);
    let c = distance(left, right);
    if a == 0.0 || b == 0.0 {
        return 0.0;
    }

    let cos = ((a * a + b * b - c * c) / (2.0 * a * b)).clamp(-1.0, 1.0);
    let alpha = round_to(180.0 - cos.acos().to_degrees(), 2);
    if alpha.is_nan() || !(0.0..180.0).contains(&alpha) {
        0.0
    } else {
        alpha
    }
}

/// alpha 角是否不合理. 没有 alpha 指标时视为合理 (交由后续规则处理).
///
/// 合理区间为 `(0, 90]`: 0 代表无法计算.
pub fn bad_alpha(hip: &HipDataUs) -> bool {
    match hip.get_metric(MetricUs::Alpha.name()) {
        None => false,
        Some(alpha) => !(alpha > *ALPHA_SENSIBLE.start() && alpha <= *ALPHA_SENSIBLE.end()),
    }
}

use itertools::izip;
use ndarray::Array1;

use crate::data::LandmarksUs;
use crate::fitting::polyfit;

/// 以帧序号为自变量, 对 apex 的 `x(t)` 与 `y(t)` 分别做 `degree` 次多项式最小二乘拟合,
/// 把与拟合值欧氏距离超过 `max_pixel_err` 的 apex 替换为四舍五入后的拟合值.
///
/// 只使用存在 apex 的帧, 也不会补全缺失的 apex. 有效帧少于 `max(degree + 1, 3)`,
/// `degree` 为 0, 或者拟合在数值上失败时, 不做任何修改. 返回被替换的帧数.
pub fn polyfit_replace_apex(
    landmarks: &mut [Option<LandmarksUs>],
    degree: u32,
    max_pixel_err: f64,
) -> usize {
    let (idxs, apexes): (Vec<usize>, Vec<(i32, i32)>) = landmarks
        .iter()
        .enumerate()
        .filter_map(|(i, lm)| lm.and_then(|lm| lm.apex).map(|apex| (i, apex)))
        .unzip();

    let need = (degree as usize + 1).max(3);
    if idxs.len() < need {
        log::warn!(
            "Apex smoothing skipped: {} frames with apex, need at least {need}.",
            idxs.len()
        );
        return 0;
    }

    let t: Array1<f64> = idxs.iter().map(|&i| i as f64).collect();
    let xs: Array1<f64> = apexes.iter().map(|p| p.0 as f64).collect();
    let ys: Array1<f64> = apexes.iter().map(|p| p.1 as f64).collect();

    let fitted = polyfit(t.view(), xs.view(), degree)
        .and_then(|px| polyfit(t.view(), ys.view(), degree).map(|py| (px, py)));
    let (px, py) = match fitted {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Apex smoothing skipped: {e}.");
            return 0;
        }
    };

    let mut replaced = 0;
    for (&i, &x_true, &y_true) in izip!(&idxs, &xs, &ys) {
        let (x_fit, y_fit) = (px.eval(i as f64), py.eval(i as f64));
        if (x_true - x_fit).hypot(y_true - y_fit) <= max_pixel_err {
            continue;
        }
        if let Some(lm) = landmarks[i] {
            landmarks[i] = Some(lm.with_apex((x_fit.round() as i32, y_fit.round() as i32)));
            replaced += 1;
        }
    }
    replaced
}

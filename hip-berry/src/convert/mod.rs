//! 标志点 -> 逐帧指标.

mod apex;

use std::time::Instant;

use crate::config::Config;
use crate::data::{HipDataUs, HipDatasUs, LandmarksUs, Metric2D, MetricUs};
use crate::metrics::{find_alpha_angle, find_coverage};
use crate::Shape2d;

pub use apex::polyfit_replace_apex;

/// 把逐帧标志点转换为逐帧指标.
///
/// 输出与输入等长, 每帧只携带 `config.hip.measurements` 中启用的指标 (先 alpha 后 coverage).
/// 若开启了 `use_polyfit_replace_apex`, 会先对 apex 做多项式离群点修正.
pub fn landmarks_to_metrics_us(
    mut landmarks: Vec<Option<LandmarksUs>>,
    shape: Shape2d,
    config: &Config,
) -> HipDatasUs {
    if config.hip.use_polyfit_replace_apex {
        polyfit_replace_apex(
            &mut landmarks,
            crate::consts::POLYFIT_DEGREE,
            crate::consts::POLYFIT_MAX_PIXEL_ERR,
        );
    }

    let mut timings = Vec::with_capacity(landmarks.len());
    let mut hips = Vec::with_capacity(landmarks.len());
    for (frame_no, lm) in landmarks.into_iter().enumerate() {
        let start = Instant::now();

        let metrics = [
            (MetricUs::Alpha, find_alpha_angle(lm.as_ref())),
            (MetricUs::Coverage, find_coverage(lm.as_ref())),
        ]
        .into_iter()
        .filter(|(m, _)| config.hip.measures(*m))
        .map(|(m, v)| Metric2D::new(m.name(), v))
        .collect();

        hips.push(HipDataUs::new(frame_no, lm, metrics));
        timings.push(start.elapsed().as_secs_f64());
    }

    log_timings(&timings, "Landmarks->Metrics Speed:");
    HipDatasUs::new(hips, shape)
}

/// 以 `info` 级别输出各阶段耗时的均值与最大值.
pub(crate) fn log_timings(timings: &[f64], title: &str) {
    if timings.is_empty() {
        return;
    }
    let total: f64 = timings.iter().sum();
    let max = timings.iter().copied().fold(0.0, f64::max);
    log::info!(
        "{title} {} frames, avg {:.4}s/frame, max {:.4}s, total {:.3}s",
        timings.len(),
        total / timings.len() as f64,
        max,
        total
    );
}

//! 股骨头覆盖率.

use super::{distance, round_to, to_f};
use crate::config::Config;
use crate::consts::COVERAGE_SENSIBLE;
use crate::data::{HipDataUs, LandmarksUs, MetricUs};

/// 计算覆盖率 (保留三位小数): `|point_d - mid_cov_point| / |point_D - point_d|`.
///
/// 缺点或股骨头直径为 0 时返回 0.
pub fn find_coverage(landmarks: Option<&LandmarksUs>) -> f64 {
    let Some(lm) = landmarks else {
        return 0.0;
    };
    let (Some(big_d), Some(d), Some(mid)) = (lm.point_big_d, lm.point_d, lm.mid_cov_point) else {
        return 0.0;
    };

    let diameter = distance(to_f(big_d), to_f(d));
    if diameter == 0.0 {
        return 0.0;
    }
    let cov = round_to(distance(to_f(d), to_f(mid)) / diameter, 3);
    if cov.is_finite() {
        cov
    } else {
        0.0
    }
}

/// 覆盖率是否不合理. 配置未启用覆盖率, 或没有覆盖率指标时视为合理.
pub fn bad_coverage(hip: &HipDataUs, config: &Config) -> bool {
    if !config.hip.measures(MetricUs::Coverage) {
        return false;
    }
    match hip.get_metric(MetricUs::Coverage.name()) {
        None => false,
        Some(cov) => !cov.is_finite() || !COVERAGE_SENSIBLE.contains(&cov),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_coverage() {
        let lm = LandmarksUs {
            point_big_d: Some((100, 0)),
            point_d: Some((100, 100)),
            mid_cov_point: Some((100, 60)),
            ..Default::default()
        };
        assert_eq!(find_coverage(Some(&lm)), 0.4);

        let lm = LandmarksUs {
            point_big_d: Some((100, 100)),
            ..lm
        };
        assert_eq!(find_coverage(Some(&lm)), 0.0);
        assert_eq!(find_coverage(None), 0.0);
    }

    #[test]
    fn test_bad_coverage() {
        let config = Config::test_default_us();
        let mut hip = HipDataUs::empty(0);
        assert!(!bad_coverage(&hip, &config));

        hip.push_metric("coverage", 0.55);
        assert!(!bad_coverage(&hip, &config));
        hip.push_metric("coverage", 1.2);
        assert!(bad_coverage(&hip, &config));
        hip.push_metric("coverage", f64::NAN);
        assert!(bad_coverage(&hip, &config));
    }
}

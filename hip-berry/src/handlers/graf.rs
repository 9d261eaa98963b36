//! Graf 标准平面选择.

use std::cmp::Reverse;

use ordered_float::NotNan;

use super::set_side_info;
use crate::config::Config;
use crate::consts::ILIUM_FLAT_MAX_DEG;
use crate::data::{HipDataUs, HipDatasUs, MetricUs, SegFrameObjects};
use crate::metrics::bad_alpha;

/// 逐帧的 Graf 平面置信度评分器. 返回值与帧一一对应, 越大越接近标准平面.
///
/// 只有坏帧过滤后保留下来的帧的分数才有意义.
pub trait GrafScorer {
    /// 为每一帧打分.
    fn score(&self, hip_datas: &HipDatasUs, results: &[SegFrameObjects], config: &Config)
        -> Vec<f64>;
}

impl<F> GrafScorer for F
where
    F: Fn(&HipDatasUs, &[SegFrameObjects], &Config) -> Vec<f64>,
{
    #[inline]
    fn score(
        &self,
        hip_datas: &HipDatasUs,
        results: &[SegFrameObjects],
        config: &Config,
    ) -> Vec<f64> {
        self(hip_datas, results, config)
    }
}

/// 基于标志点几何一致性的内置评分器.
///
/// 分数 = 标志点完整度 × 髂骨线平坦度 × alpha 合理性, 位于 `[0, 1]`.
/// 空帧得 0 分.
#[derive(Copy, Clone, Debug, Default)]
pub struct LandmarkConsistencyScorer;

impl LandmarkConsistencyScorer {
    fn score_one(hip: &HipDataUs) -> f64 {
        let Some(lm) = hip.landmarks.as_ref() else {
            return 0.0;
        };
        if hip.is_empty() {
            return 0.0;
        }

        let completeness = lm.count() as f64 / 6.0;
        let flatness = match (lm.left, lm.apex) {
            (Some(l), Some(a)) if l != a => {
                let deg = ((a.1 - l.1) as f64).atan2((a.0 - l.0) as f64).to_degrees().abs();
                let deg = deg.min(180.0 - deg);
                (1.0 - deg / (3.0 * ILIUM_FLAT_MAX_DEG)).max(0.0)
            }
            _ => 0.5,
        };
        let plausible = match hip.get_metric(MetricUs::Alpha.name()) {
            Some(_) if bad_alpha(hip) => 0.0,
            _ => 1.0,
        };
        completeness * flatness * plausible
    }
}

impl GrafScorer for LandmarkConsistencyScorer {
    fn score(&self, hip_datas: &HipDatasUs, _: &[SegFrameObjects], _: &Config) -> Vec<f64> {
        hip_datas.iter().map(Self::score_one).collect()
    }
}

/// 选择 Graf 平面, 填充 `graf_confs` 与 `graf_frame`, 并给各帧分类.
///
/// 只在保留 (非空) 帧中选最大置信度, 并列时取最早的帧, 非有限分数被忽略.
/// 评分数量与帧数不一致, 或没有任何可选帧时, `graf_frame` 为 `None`.
pub fn find_graf_plane(
    mut hip_datas: HipDatasUs,
    results: &[SegFrameObjects],
    scorer: &dyn GrafScorer,
    config: &Config,
) -> HipDatasUs {
    let confs = scorer.score(&hip_datas, results, config);
    hip_datas.graf_frame = None;

    if confs.len() != hip_datas.len() {
        log::error!(
            "Graf scorer returned {} scores for {} frames, no Graf frame selected.",
            confs.len(),
            hip_datas.len()
        );
        hip_datas.graf_confs.clear();
        set_side_info(&mut hip_datas);
        return hip_datas;
    }

    hip_datas.graf_frame = hip_datas
        .kept_frames()
        .filter_map(|i| {
            NotNan::new(confs[i])
                .ok()
                .filter(|c| c.is_finite())
                .map(|c| (i, c))
        })
        .min_by_key(|&(_, c)| Reverse(c))
        .map(|(i, _)| i);
    hip_datas.graf_confs = confs;

    match hip_datas.graf_frame {
        Some(i) => log::info!("Graf frame: {i} (confidence {:.3}).", hip_datas.graf_confs[i]),
        None => log::error!("No valid frame left, no Graf frame selected."),
    }
    set_side_info(&mut hip_datas);
    hip_datas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LandmarksUs, Side};

    fn study(kept: &[usize], n: usize) -> HipDatasUs {
        let mut hd = HipDatasUs::default();
        for i in 0..n {
            let mut hip = HipDataUs::empty(i);
            if kept.contains(&i) {
                hip.landmarks = Some(LandmarksUs {
                    left: Some((0, 100)),
                    apex: Some((100, 100)),
                    ..Default::default()
                });
                hip.push_metric("alpha", 60.0);
            }
            hd.push(hip);
        }
        hd
    }

    fn fixed(scores: Vec<f64>) -> impl Fn(&HipDatasUs, &[SegFrameObjects], &Config) -> Vec<f64> {
        move |_: &HipDatasUs, _: &[SegFrameObjects], _: &Config| scores.clone()
    }

    #[test]
    fn test_pick_best_kept_frame() {
        let config = Config::test_default_us();
        // 帧 0 分数最高但为空帧; 帧 2 与帧 3 并列, 取 2.
        let scorer = fixed(vec![9.0, 0.1, 0.7, 0.7, f64::NAN]);
        let hd = find_graf_plane(study(&[1, 2, 3, 4], 5), &[], &scorer, &config);

        assert_eq!(hd.graf_frame, Some(2));
        assert_eq!(hd.graf_confs.len(), 5);
        assert_eq!(hd[2].side, Some(Side::Graf));
        assert_eq!(hd[3].side, Some(Side::NotGraf));
        assert_eq!(hd[0].side, None);
        assert_eq!(hd.grafs_hip().map(|h| h.frame_no), Some(2));
    }

    #[test]
    fn test_no_kept_frames() {
        let config = Config::test_default_us();
        let hd = find_graf_plane(study(&[], 4), &[], &LandmarkConsistencyScorer, &config);
        assert_eq!(hd.graf_frame, None);
        assert!(hd.iter().all(|h| h.side.is_none()));
    }

    #[test]
    fn test_length_mismatch() {
        let config = Config::test_default_us();
        let scorer = fixed(vec![1.0]);
        let hd = find_graf_plane(study(&[0, 1], 2), &[], &scorer, &config);
        assert_eq!(hd.graf_frame, None);
        assert!(hd.graf_confs.is_empty());
        assert_eq!(hd[0].side, Some(Side::NotGraf));
    }

    #[test]
    fn test_consistency_scorer_prefers_flat_ilium() {
        let config = Config::test_default_us();
        let mut hd = study(&[0, 1], 2);
        hd[0].landmarks = hd[0].landmarks.map(|lm| LandmarksUs { left: Some((0, 80)), ..lm });
        let scores = LandmarkConsistencyScorer.score(&hd, &[], &config);
        assert!(scores[1] > scores[0]);

        let hd = find_graf_plane(hd, &[], &LandmarkConsistencyScorer, &config);
        assert_eq!(hd.graf_frame, Some(1));
    }
}

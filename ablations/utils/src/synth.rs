//! 合成超声扫查. 在没有真实数据集时用于比较不同的过滤策略.

use hip_berry::convert::landmarks_to_metrics_us;
use hip_berry::prelude::*;
use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 合成图像形状 `(h, w)`.
pub const SHAPE: Shape2d = (100, 120);

/// 合成参数.
#[derive(Clone, Debug)]
pub struct SynthParams {
    /// 帧数.
    pub frames: usize,

    /// 中间帧没有检测结果的概率.
    pub dropout: f64,

    /// 首尾各 10% 的帧没有检测结果的概率. 探头刚接触或离开皮肤时通常更差.
    pub edge_dropout: f64,

    /// 某帧 apex 明显错位的概率.
    pub glitch: f64,

    /// apex 的随机抖动 (像素).
    pub jitter: i32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            frames: 40,
            dropout: 0.1,
            edge_dropout: 0.6,
            glitch: 0.08,
            jitter: 2,
        }
    }
}

/// 一段合成扫查.
#[derive(Clone, Debug)]
pub struct SynthStudy {
    /// 逐帧标志点.
    pub landmarks: Vec<Option<LandmarksUs>>,

    /// 逐帧的上游拒绝原因.
    pub rejection_reasons: Vec<Vec<String>>,

    /// 生成时设定的 Graf 帧. 越远离它, 髂骨线越斜.
    pub true_graf: usize,
}

impl SynthStudy {
    /// 以 `seed` 生成合成扫查. 相同参数和种子总是得到相同结果.
    pub fn generate(params: &SynthParams, seed: u64) -> Self {
        assert!(params.frames > 0, "至少需要一帧");
        assert!(params.jitter >= 0);
        let mut rng = StdRng::seed_from_u64(seed);

        let n = params.frames;
        let true_graf = rng.gen_range(n / 4..=n * 3 / 4);
        let edge = (n / 10).max(1);

        let mut landmarks = Vec::with_capacity(n);
        let mut rejection_reasons = Vec::with_capacity(n);
        for i in 0..n {
            let p = if i < edge || i >= n - edge {
                params.edge_dropout
            } else {
                params.dropout
            };
            if rng.gen_bool(p.clamp(0.0, 1.0)) {
                landmarks.push(None);
                rejection_reasons.push(vec!["Low Confidence".to_owned()]);
                continue;
            }

            let tilt = ((i as i32 - true_graf as i32).abs() / 3).min(8);
            let jx = rng.gen_range(-params.jitter..=params.jitter);
            let jy = rng.gen_range(-params.jitter..=params.jitter);
            let mut lm = LandmarksUs {
                left: Some((10, 50 + tilt)),
                right: Some((100, 20)),
                apex: Some((60 + jx, 50 + jy)),
                point_big_d: Some((60, 90)),
                point_d: Some((60, 60)),
                mid_cov_point: Some((60, 70)),
            };
            if rng.gen_bool(params.glitch.clamp(0.0, 1.0)) {
                lm = lm.with_apex((60 + jx, 90));
            }
            landmarks.push(Some(lm));
            rejection_reasons.push(vec![]);
        }

        Self {
            landmarks,
            rejection_reasons,
            true_graf,
        }
    }

    /// 帧数.
    #[inline]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// 是否没有任何帧.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// 对应的分割结果: 每帧带髂骨和股骨头轮廓.
    pub fn results(&self) -> Vec<SegFrameObjects> {
        let (h, w) = SHAPE;
        self.landmarks
            .iter()
            .zip(self.rejection_reasons.iter())
            .map(|(lm, reasons)| {
                let mut seg = SegFrameObjects::empty(RgbImage::new(w as u32, h as u32));
                if lm.is_some() {
                    seg.objects.push(SegObject::from_points(
                        HipLabel::Ilium,
                        vec![(10, 50), (60, 50)],
                    ));
                    seg.objects
                        .push(SegObject::from_points(HipLabel::FemoralHead, vec![(60, 75)]));
                }
                seg.landmarks = *lm;
                seg.rejection_reasons = reasons.clone();
                seg
            })
            .collect()
    }

    /// 转换为尚未过滤的研究结果.
    pub fn to_hip_datas(&self, config: &Config) -> HipDatasUs {
        let mut hd = landmarks_to_metrics_us(self.landmarks.clone(), SHAPE, config);
        hd.seg_rejection_reasons = self.rejection_reasons.clone();
        hd
    }
}

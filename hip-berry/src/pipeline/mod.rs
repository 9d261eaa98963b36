//! 流程编排: 检测 -> 预处理 -> 标志点转换 -> 过滤 -> Graf 平面 -> 3D 聚合 -> 钩子 -> 绘制.
//!
//! 所有入口都在配置的副本上工作, 调用方的配置不会被改写.
//! 检测失败会被记录并以 `Ok(None)` 返回; 输入类型或操作模式不受支持时返回 `Err`.

mod sweep;
mod us2d;
mod us3d;

use std::time::Instant;

use image::RgbImage;
use serde_json::{json, Value};

use crate::config::{Config, HipMode, OperationType};
use crate::convert::landmarks_to_metrics_us;
use crate::data::{CustomMetric, HipDataUs, HipDatasUs, LandmarksUs, PreEdited, SegFrameObjects};
use crate::error::PipelineError;
use crate::handlers::{GrafScorer, LandmarkConsistencyScorer};
use crate::hooks::apply_seg_preprocess;
use crate::multiframe::{MaskStackReconstructor, Reconstructor, Visual3d};

pub use sweep::{analyse_hip_2dus_sweep, AnalysisSweep};
pub use us2d::{analyse_hip_2dus, Analysis2d};
pub use us3d::{analyse_hip_3dus, Analysis3d};

/// 流程输入.
#[derive(Clone, Debug)]
pub enum AnalysisInput {
    /// 单张图像.
    Image(RgbImage),

    /// 按时间 (或 z 轴) 排列的多帧图像.
    Frames(Vec<RgbImage>),
}

impl AnalysisInput {
    /// 帧数.
    pub fn len(&self) -> usize {
        match self {
            AnalysisInput::Image(_) => 1,
            AnalysisInput::Frames(frames) => frames.len(),
        }
    }

    /// 是否没有任何帧.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 检测 / 分割模型. 对每一帧给出一个 [`SegFrameObjects`].
pub trait Detector {
    /// 运行检测.
    fn detect(
        &self,
        input: &AnalysisInput,
        config: &Config,
    ) -> Result<Vec<SegFrameObjects>, PipelineError>;
}

impl<F> Detector for F
where
    F: Fn(&AnalysisInput, &Config) -> Result<Vec<SegFrameObjects>, PipelineError>,
{
    fn detect(
        &self,
        input: &AnalysisInput,
        config: &Config,
    ) -> Result<Vec<SegFrameObjects>, PipelineError> {
        self(input, config)
    }
}

/// 多帧流程中可替换的黑盒组件.
#[derive(Clone, Copy)]
pub struct Components<'a> {
    /// Graf 平面评分.
    pub scorer: &'a dyn GrafScorer,

    /// 3D 重建.
    pub reconstructor: &'a dyn Reconstructor,
}

impl Default for Components<'static> {
    fn default() -> Self {
        Self {
            scorer: &LandmarkConsistencyScorer,
            reconstructor: &MaskStackReconstructor,
        }
    }
}

/// [`run`] 的统一输出.
#[derive(Clone, Debug, Default)]
pub struct RetuveResult {
    /// 导出的 JSON 指标.
    pub metrics: Value,

    /// 单帧结果 (2D 和扫查模式).
    pub hip: Option<HipDataUs>,

    /// 研究结果 (3D 和扫查模式).
    pub hip_datas: Option<HipDatasUs>,

    /// 绘制后的单张图像.
    pub image: Option<RgbImage>,

    /// 绘制后的视频帧.
    pub video: Vec<RgbImage>,

    /// 视频帧率. 没有视频时为 0.
    pub fps: u32,

    /// 3D 可视化数据.
    pub visual_3d: Option<Visual3d>,
}

/// 按模式分发, 使用内置的 Graf 评分与 3D 重建.
pub fn run(
    mode: HipMode,
    input: &AnalysisInput,
    config: &Config,
    detector: &dyn Detector,
) -> Result<RetuveResult, PipelineError> {
    let components = Components::default();
    let result = match mode {
        HipMode::Us3d => match analyse_hip_3dus(input, config, detector, components)? {
            Some(a) => RetuveResult {
                metrics: a.hip_datas.json_dump(config, None),
                hip_datas: Some(a.hip_datas),
                video: a.video,
                fps: a.fps,
                visual_3d: a.visual,
                ..Default::default()
            },
            None => RetuveResult::empty(),
        },
        HipMode::Us2d => match analyse_hip_2dus(input, config, detector)? {
            Some(a) => RetuveResult {
                metrics: a.hip.json_dump(config, Some(&a.dev_metrics)),
                hip: Some(a.hip),
                image: Some(a.image),
                ..Default::default()
            },
            None => RetuveResult::empty(),
        },
        HipMode::Us2dSweep => {
            match analyse_hip_2dus_sweep(input, config, detector, components.scorer)? {
                Some(a) => RetuveResult {
                    metrics: a.hip.json_dump(config, Some(&a.dev_metrics)),
                    hip: Some(a.hip),
                    hip_datas: Some(a.hip_datas),
                    image: a.image,
                    video: a.video,
                    fps: a.fps,
                    ..Default::default()
                },
                None => RetuveResult::empty(),
            }
        }
        HipMode::Xray => {
            return Err(PipelineError::NotImplemented {
                mode,
                op: config.operation_type,
            })
        }
    };
    Ok(result)
}

impl RetuveResult {
    /// 检测失败时的空结果.
    fn empty() -> Self {
        Self {
            metrics: json!({}),
            ..Default::default()
        }
    }
}

/// 计算视频帧率: 帧数足够时取 `min_fps`, 否则按最短时长折算, 至少为 1.
pub fn get_fps(frames: usize, min_fps: u32, min_vid_length: u32) -> u32 {
    let min_vid_length = min_vid_length.max(1);
    let fps = if frames > (min_fps as usize).saturating_mul(min_vid_length as usize) {
        min_fps
    } else {
        (frames / min_vid_length as usize) as u32
    };
    fps.max(1)
}

/// 检测, 分割预处理, 标志点转换.
///
/// 返回尚未过滤的研究结果和预处理后的分割结果. 开启 `test_data_passthrough` 时,
/// 会在研究结果上保存处理前的深拷贝.
pub fn process_segs_us(
    input: &AnalysisInput,
    config: &Config,
    detector: &dyn Detector,
) -> Result<(HipDatasUs, Vec<SegFrameObjects>), PipelineError> {
    let start = Instant::now();
    let results = detector.detect(input, config)?;
    let Some(first) = results.first() else {
        return Err(PipelineError::detection("detector returned no frames"));
    };
    let shape = first.shape();
    log::info!("Detection took {:.2}s.", start.elapsed().as_secs_f64());

    let results = apply_seg_preprocess(results, config, shape);
    let landmarks: Vec<Option<LandmarksUs>> = results.iter().map(|r| r.landmarks).collect();
    let snapshot = config.test_data_passthrough.then(|| PreEdited {
        results: results.clone(),
        landmarks: landmarks.clone(),
        hip_datas: None,
    });

    let mut hip_datas = landmarks_to_metrics_us(landmarks, shape, config);
    hip_datas.seg_rejection_reasons = results.iter().map(|r| r.rejection_reasons.clone()).collect();

    if let Some(mut snapshot) = snapshot {
        snapshot.hip_datas = Some(Box::new(hip_datas.clone()));
        hip_datas.pre_edited = Some(Box::new(snapshot));
    }
    Ok((hip_datas, results))
}

/// 检查输入, 返回改写了分析模式的配置副本.
fn prepare(input: &AnalysisInput, config: &Config, mode: HipMode) -> Result<Config, PipelineError> {
    if mode != HipMode::Us2d && config.operation_type == OperationType::Landmark {
        return Err(PipelineError::NotImplemented {
            mode,
            op: config.operation_type,
        });
    }
    match (mode, input) {
        (_, input) if input.is_empty() => {
            return Err(PipelineError::UnsupportedInput("no frames given".to_owned()))
        }
        (HipMode::Us2d, AnalysisInput::Frames(frames)) if frames.len() > 1 => {
            return Err(PipelineError::UnsupportedInput(format!(
                "{} frames given in single-frame mode",
                frames.len()
            )))
        }
        (HipMode::Us3d | HipMode::Us2dSweep, AnalysisInput::Image(_)) => {
            return Err(PipelineError::UnsupportedInput(
                "single image given in multi-frame mode".to_owned(),
            ))
        }
        _ => {}
    }

    let mut config = config.clone();
    config.batch.hip_mode = mode;
    Ok(config)
}

/// 把检测错误转为 `None` 并记录.
fn caught<T>(res: Result<T, PipelineError>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            log::error!("Critical Error: {e}");
            None
        }
    }
}

/// 把钩子给出的全局指标以 2D 形式追加到单帧结果上.
fn with_custom_metrics(mut hip: HipDataUs, custom: &[CustomMetric]) -> HipDataUs {
    for m in custom {
        hip.push_metric(m.name(), m.value());
    }
    hip
}

fn warn_if_no_metrics(hip_datas: &HipDatasUs) {
    if hip_datas.iter().all(HipDataUs::is_empty) {
        log::error!("No metrics were found in image.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_detector(input: &AnalysisInput, _: &Config) -> Result<Vec<SegFrameObjects>, PipelineError> {
        let frames = match input {
            AnalysisInput::Image(img) => vec![img.clone()],
            AnalysisInput::Frames(frames) => frames.clone(),
        };
        Ok(frames.into_iter().map(SegFrameObjects::empty).collect())
    }

    #[test]
    fn test_get_fps() {
        assert_eq!(get_fps(100, 30, 3), 30);
        assert_eq!(get_fps(90, 30, 3), 30);
        assert_eq!(get_fps(30, 30, 3), 10);
        assert_eq!(get_fps(2, 30, 3), 1);
        assert_eq!(get_fps(0, 30, 3), 1);
        // 配置值很大时不会溢出.
        assert_eq!(get_fps(10, u32::MAX, u32::MAX), 1);
        assert_eq!(get_fps(usize::MAX, u32::MAX, 2), u32::MAX);
    }

    #[test]
    fn test_prepare_rejects_bad_inputs() {
        let config = Config::default_us();
        let empty = AnalysisInput::Frames(vec![]);
        assert!(matches!(
            prepare(&empty, &config, HipMode::Us3d),
            Err(PipelineError::UnsupportedInput(_))
        ));

        let two = AnalysisInput::Frames(vec![RgbImage::new(4, 4), RgbImage::new(4, 4)]);
        assert!(matches!(
            prepare(&two, &config, HipMode::Us2d),
            Err(PipelineError::UnsupportedInput(_))
        ));

        let one = AnalysisInput::Image(RgbImage::new(4, 4));
        assert!(matches!(
            prepare(&one, &config, HipMode::Us2dSweep),
            Err(PipelineError::UnsupportedInput(_))
        ));

        let prepared = prepare(&two, &config, HipMode::Us2dSweep).unwrap();
        assert_eq!(prepared.batch.hip_mode, HipMode::Us2dSweep);
        assert_eq!(config.batch.hip_mode, HipMode::Us3d);
    }

    #[test]
    fn test_landmark_op_not_implemented_for_3d() {
        let mut config = Config::default_us();
        config.operation_type = OperationType::Landmark;
        let input = AnalysisInput::Frames(vec![RgbImage::new(4, 4)]);
        let err = prepare(&input, &config, HipMode::Us3d).unwrap_err();
        assert_eq!(
            err,
            PipelineError::NotImplemented {
                mode: HipMode::Us3d,
                op: OperationType::Landmark
            }
        );
        assert!(prepare(&AnalysisInput::Image(RgbImage::new(4, 4)), &config, HipMode::Us2d).is_ok());
    }

    #[test]
    fn test_process_segs_passthrough() {
        let mut config = Config::default_us();
        config.test_data_passthrough = true;
        let input = AnalysisInput::Frames(vec![RgbImage::new(6, 4); 3]);
        let (hd, results) = process_segs_us(&input, &config, &blank_detector).unwrap();

        assert_eq!(hd.len(), 3);
        assert_eq!(hd.shape, (4, 6));
        assert_eq!(results.len(), 3);
        assert_eq!(hd.seg_rejection_reasons.len(), 3);
        let pre = hd.pre_edited.as_ref().unwrap();
        assert_eq!(pre.landmarks.len(), 3);
        assert_eq!(pre.hip_datas.as_ref().map(|h| h.len()), Some(3));
    }

    #[test]
    fn test_run_xray_not_implemented() {
        let config = Config::default_us();
        let input = AnalysisInput::Image(RgbImage::new(4, 4));
        assert!(matches!(
            run(HipMode::Xray, &input, &config, &blank_detector),
            Err(PipelineError::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_detector_error_is_caught() {
        let failing = |_: &AnalysisInput, _: &Config| -> Result<Vec<SegFrameObjects>, PipelineError> {
            Err(PipelineError::detection("model crashed"))
        };
        let config = Config::default_us();
        let input = AnalysisInput::Frames(vec![RgbImage::new(4, 4); 2]);
        let res = run(HipMode::Us3d, &input, &config, &failing).unwrap();
        assert_eq!(res.metrics, json!({}));
        assert!(res.hip_datas.is_none());
    }
}

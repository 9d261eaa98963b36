use std::time::Instant;

use image::RgbImage;

use super::{caught, get_fps, prepare, process_segs_us, warn_if_no_metrics, with_custom_metrics};
use super::{AnalysisInput, Detector};
use crate::config::{Config, HipMode};
use crate::consts::SWEEP_GRAF_PAD_RATIO;
use crate::data::{HipDataUs, HipDatasUs};
use crate::dev::{get_dev_metrics, DevMetricsUs};
use crate::draw::draw_hips_us;
use crate::error::PipelineError;
use crate::handlers::{find_graf_plane, handle_bad_frames, GrafScorer};
use crate::hooks::{apply_frame_metrics, apply_full_metrics};

/// 2D 扫查分析结果.
#[derive(Clone, Debug)]
pub struct AnalysisSweep {
    /// Graf 帧的结果, 后接全局钩子指标. 没有 Graf 帧时为第 0 帧, 且只带钩子指标.
    pub hip: HipDataUs,

    /// 研究结果.
    pub hip_datas: HipDatasUs,

    /// Graf 帧的绘制结果.
    pub image: Option<RgbImage>,

    /// 逐帧绘制结果, 首尾各补若干张 Graf 帧图像.
    pub video: Vec<RgbImage>,

    /// 视频帧率.
    pub fps: u32,

    /// 开发者指标.
    pub dev_metrics: DevMetricsUs,
}

/// 分析一段 2D 超声扫查视频.
///
/// 与 3D 流程相比没有 3D 聚合, 全局钩子指标以 2D 形式记录.
pub fn analyse_hip_2dus_sweep(
    input: &AnalysisInput,
    config: &Config,
    detector: &dyn Detector,
    scorer: &dyn GrafScorer,
) -> Result<Option<AnalysisSweep>, PipelineError> {
    let start = Instant::now();
    let config = prepare(input, config, HipMode::Us2dSweep)?;

    let Some((hip_datas, results)) = caught(process_segs_us(input, &config, detector)) else {
        return Ok(None);
    };

    let hip_datas = handle_bad_frames(hip_datas, &config);
    warn_if_no_metrics(&hip_datas);
    let mut hip_datas = find_graf_plane(hip_datas, &results, scorer, &config);

    apply_full_metrics(&mut hip_datas, &results, &config, false);
    apply_frame_metrics(&mut hip_datas, &results, &config);

    let frames = draw_hips_us(&hip_datas, &results, None, &config);
    get_dev_metrics(&mut hip_datas, &results);

    let image = hip_datas.graf_frame.and_then(|i| frames.get(i)).cloned();
    let video = pad_video(frames, image.as_ref());
    let fps = get_fps(
        video.len(),
        config.visuals.min_vid_fps,
        config.visuals.min_vid_length,
    );

    let hip = match hip_datas.grafs_hip() {
        Some(graf) => with_custom_metrics(graf.clone(), &hip_datas.custom_metrics),
        None => with_custom_metrics(HipDataUs::empty(0), &hip_datas.custom_metrics),
    };
    let dev_metrics = hip_datas.dev_metrics.clone().unwrap_or_default();
    log::info!("2DUS sweep analysis took {:.2}s.", start.elapsed().as_secs_f64());

    Ok(Some(AnalysisSweep {
        hip,
        hip_datas,
        image,
        video,
        fps,
        dev_metrics,
    }))
}

/// 在视频首尾各补 `len * 0.1` 张 Graf 帧图像.
fn pad_video(frames: Vec<RgbImage>, graf: Option<&RgbImage>) -> Vec<RgbImage> {
    let Some(graf) = graf else {
        return frames;
    };
    let pad = (frames.len() as f64 * SWEEP_GRAF_PAD_RATIO) as usize;

    let mut video = Vec::with_capacity(frames.len() + 2 * pad);
    video.extend(std::iter::repeat(graf).take(pad).cloned());
    video.extend(frames);
    video.extend(std::iter::repeat(graf).take(pad).cloned());
    video
}

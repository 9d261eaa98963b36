use std::time::Instant;

use image::RgbImage;

use super::{caught, prepare, process_segs_us, warn_if_no_metrics, with_custom_metrics};
use super::{AnalysisInput, Detector};
use crate::config::{Config, HipMode};
use crate::data::HipDataUs;
use crate::dev::{get_dev_metrics, DevMetricsUs};
use crate::draw::draw_hips_us;
use crate::error::PipelineError;
use crate::hooks::{apply_frame_metrics, apply_full_metrics};

/// 2D 单帧分析结果.
#[derive(Clone, Debug)]
pub struct Analysis2d {
    /// 该帧的结果. 指标为逐帧指标后接全局钩子指标.
    pub hip: HipDataUs,

    /// 绘制后的图像.
    pub image: RgbImage,

    /// 开发者指标.
    pub dev_metrics: DevMetricsUs,
}

/// 分析单张 2D 超声图像.
///
/// 单帧没有坏帧过滤和 Graf 平面选择. 检测失败时返回 `Ok(None)`.
pub fn analyse_hip_2dus(
    input: &AnalysisInput,
    config: &Config,
    detector: &dyn Detector,
) -> Result<Option<Analysis2d>, PipelineError> {
    let start = Instant::now();
    let config = prepare(input, config, HipMode::Us2d)?;

    let Some((mut hip_datas, results)) = caught(process_segs_us(input, &config, detector)) else {
        return Ok(None);
    };
    warn_if_no_metrics(&hip_datas);

    apply_full_metrics(&mut hip_datas, &results, &config, false);
    apply_frame_metrics(&mut hip_datas, &results, &config);

    let image = draw_hips_us(&hip_datas, &results, None, &config)
        .into_iter()
        .next()
        .unwrap_or_default();
    get_dev_metrics(&mut hip_datas, &results);

    let hip = with_custom_metrics(hip_datas[0].clone(), &hip_datas.custom_metrics);
    let dev_metrics = hip_datas.dev_metrics.take().unwrap_or_default();
    log::info!("2DUS analysis took {:.2}s.", start.elapsed().as_secs_f64());

    Ok(Some(Analysis2d {
        hip,
        image,
        dev_metrics,
    }))
}

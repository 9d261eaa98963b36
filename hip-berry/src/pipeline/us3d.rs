use std::time::Instant;

use image::RgbImage;

use super::{caught, get_fps, prepare, process_segs_us, warn_if_no_metrics};
use super::{AnalysisInput, Components, Detector};
use crate::config::{Config, HipMode};
use crate::data::HipDatasUs;
use crate::dev::get_dev_metrics;
use crate::draw::draw_hips_us;
use crate::error::PipelineError;
use crate::handlers::{find_graf_plane, handle_bad_frames};
use crate::hooks::{apply_frame_metrics, apply_full_metrics};
use crate::multiframe::{get_3d_metrics, Visual3d};

/// 3D 容积分析结果.
#[derive(Clone, Debug)]
pub struct Analysis3d {
    /// 研究结果. 全研究指标在前, 钩子指标在后.
    pub hip_datas: HipDatasUs,

    /// 逐帧绘制结果.
    pub video: Vec<RgbImage>,

    /// 视频帧率.
    pub fps: u32,

    /// 3D 可视化数据. 重建失败时为 `None`.
    pub visual: Option<Visual3d>,
}

/// 分析一组 3D 超声切片.
///
/// 坏帧过滤 -> Graf 平面 -> 3D 聚合 -> 钩子 -> 绘制 -> 开发者指标.
pub fn analyse_hip_3dus(
    input: &AnalysisInput,
    config: &Config,
    detector: &dyn Detector,
    components: Components<'_>,
) -> Result<Option<Analysis3d>, PipelineError> {
    let start = Instant::now();
    let config = prepare(input, config, HipMode::Us3d)?;

    let Some((hip_datas, results)) = caught(process_segs_us(input, &config, detector)) else {
        return Ok(None);
    };

    let hip_datas = handle_bad_frames(hip_datas, &config);
    warn_if_no_metrics(&hip_datas);
    let hip_datas = find_graf_plane(hip_datas, &results, components.scorer, &config);
    let (mut hip_datas, visual) =
        get_3d_metrics(hip_datas, &results, components.reconstructor, &config);

    apply_full_metrics(&mut hip_datas, &results, &config, true);
    apply_frame_metrics(&mut hip_datas, &results, &config);

    let sphere = visual.as_ref().map(|v| &v.sphere);
    let video = draw_hips_us(&hip_datas, &results, sphere, &config);
    get_dev_metrics(&mut hip_datas, &results);

    let fps = get_fps(
        video.len(),
        config.visuals.min_vid_fps,
        config.visuals.min_vid_length,
    );
    log::info!("3DUS analysis took {:.2}s.", start.elapsed().as_secs_f64());

    Ok(Some(Analysis3d {
        hip_datas,
        video,
        fps,
        visual,
    }))
}

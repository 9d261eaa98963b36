use super::{Reconstructor, Visual3d};
use crate::config::Config;
use crate::data::{HipDatasUs, Metric3D, MetricUs, SegFrameObjects};
use crate::metrics::{centering_available, get_centering_ratio, round_to};

/// 逐帧指标的分区聚合: `graf` 为 Graf 帧的值, `ant` / `post` 分别为 Graf 帧之前 / 之后
/// 的保留帧的均值 (前侧对应较小的帧序号), `full` 与 `graf` 相同.
fn region_metric(hip_datas: &HipDatasUs, metric: MetricUs, decimals: i32) -> Metric3D {
    let name = metric.name();
    let mut out = Metric3D {
        name: name.to_owned(),
        ..Default::default()
    };
    let Some(graf_frame) = hip_datas.graf_frame else {
        return out;
    };

    let mean_of = |pred: &dyn Fn(usize) -> bool| {
        let values: Vec<f64> = hip_datas
            .kept_frames()
            .filter(|&i| pred(i))
            .filter_map(|i| hip_datas[i].get_metric(name))
            .collect();
        (!values.is_empty())
            .then(|| round_to(values.iter().sum::<f64>() / values.len() as f64, decimals))
    };

    out.graf = hip_datas.grafs_hip().and_then(|h| h.get_metric(name));
    out.ant = mean_of(&|i| i < graf_frame);
    out.post = mean_of(&|i| i > graf_frame);
    out.full = out.graf;
    out
}

/// 计算 3D 全研究指标, 追加到 `hip_datas.metrics`, 并返回可视化数据.
///
/// 依次为: 启用的逐帧指标 (alpha, coverage) 的分区聚合, 居中比, 以及重建方给出的覆盖角.
/// 重建失败时只保留分区聚合, 可视化数据为 `None`. 居中比不可用 (例如没有 Graf 帧) 时不记录.
pub fn get_3d_metrics(
    mut hip_datas: HipDatasUs,
    results: &[SegFrameObjects],
    reconstructor: &dyn Reconstructor,
    config: &Config,
) -> (HipDatasUs, Option<Visual3d>) {
    for (metric, decimals) in [(MetricUs::Alpha, 2), (MetricUs::Coverage, 3)] {
        if config.hip.measures(metric) {
            let m = region_metric(&hip_datas, metric, decimals);
            hip_datas.metrics.push(m);
        }
    }

    let Some(recon) = reconstructor.reconstruct(&hip_datas, results, config) else {
        log::error!("3D reconstruction failed, volume metrics unavailable.");
        return (hip_datas, None);
    };

    let (ratio, centering_points) = get_centering_ratio(&recon.mesh, &recon.sphere, &hip_datas);
    if !centering_available(&centering_points) {
        log::error!("Centering ratio unavailable, not recorded.");
    } else if config.hip.measures(MetricUs::CenteringRatio) {
        hip_datas
            .metrics
            .push(Metric3D::full_only(MetricUs::CenteringRatio.name(), ratio));
    }
    if config.hip.measures(MetricUs::Aca) {
        if let Some([post, graf, ant]) = recon.aca {
            hip_datas.metrics.push(Metric3D {
                name: MetricUs::Aca.name().to_owned(),
                post: Some(post),
                graf: Some(graf),
                ant: Some(ant),
                full: Some(round_to((post + graf + ant) / 3.0, 2)),
            });
        }
    }

    let visual = Visual3d {
        mesh: recon.mesh,
        sphere: recon.sphere,
        centering_points,
    };
    (hip_datas, Some(visual))
}

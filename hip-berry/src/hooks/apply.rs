use super::{isolated, FrameContext, HookKind, HookOutput, PreprocessContext, StudyContext};
use crate::config::Config;
use crate::data::{CustomMetric, HipDataUs, HipDatasUs, Metric2D, Metric3D, SegFrameObjects};
use crate::draw::Overlay;
use crate::Shape2d;

/// 依次执行分割预处理钩子.
///
/// 钩子返回 `Some` 时替换结果, 返回 `None` 时保留原列表 (包括钩子的原地修改).
/// 失败的钩子被跳过, 其原地修改也会被回滚.
pub fn apply_seg_preprocess(
    mut results: Vec<SegFrameObjects>,
    config: &Config,
    shape: Shape2d,
) -> Vec<SegFrameObjects> {
    for (name, hook) in config.hip.seg_preprocess_functions.iter() {
        let backup = results.clone();
        let mut ctx = PreprocessContext {
            results: &mut results,
            config,
            shape,
        };
        match isolated(HookKind::SegPreprocess, name, "results", || hook.preprocess(&mut ctx)) {
            Some(Some(updated)) => results = updated,
            Some(None) => {}
            None => results = backup,
        }
    }
    results
}

/// 依次执行全局指标钩子, 把结果追加到 `custom_metrics`, 辅助数据并入 `dev_metrics_custom`.
///
/// `volumetric` 为真时指标以 [`Metric3D`] (仅 `full`) 形式记录, 否则为 [`Metric2D`].
/// 失败的钩子取值 0.
pub fn apply_full_metrics(
    hip_datas: &mut HipDatasUs,
    results: &[SegFrameObjects],
    config: &Config,
    volumetric: bool,
) {
    for (name, hook) in config.hip.full_metric_functions.iter() {
        let ctx = StudyContext {
            hip_datas: &*hip_datas,
            results,
            config,
        };
        let out = isolated(HookKind::FullMetric, name, "study", || hook.compute(&ctx))
            .unwrap_or_default();

        let metric = if volumetric {
            CustomMetric::Volume(Metric3D::full_only(name, out.value))
        } else {
            CustomMetric::Flat(Metric2D::new(name, out.value))
        };
        hip_datas.custom_metrics.push(metric);
        if let Some(aux) = out.aux {
            hip_datas
                .dev_metrics_custom
                .entry(name.to_owned())
                .or_default()
                .extend(aux);
        }
    }
}

/// 对每个未被拒绝的帧依次执行逐帧指标钩子, 结果以注册名追加到该帧的指标中.
///
/// 第 `i` 帧使用 `results[i]` 作为分割上下文. 失败的钩子取值 0.
pub fn apply_frame_metrics(hip_datas: &mut HipDatasUs, results: &[SegFrameObjects], config: &Config) {
    let hooks = &config.hip.per_frame_metric_functions;
    if hooks.is_empty() {
        return;
    }

    for i in 0..hip_datas.len() {
        if hip_datas.bad_frame_reasons.contains_key(&i) {
            continue;
        }
        let target = format!("frame {i}");
        let outputs: Vec<(String, HookOutput)> = hooks
            .iter()
            .map(|(name, hook)| {
                let ctx = FrameContext {
                    hip: &hip_datas[i],
                    seg: results.get(i),
                    config,
                };
                let out = isolated(HookKind::FrameMetric, name, &target, || hook.compute(&ctx))
                    .unwrap_or_default();
                (name.to_owned(), out)
            })
            .collect();

        let hip = &mut hip_datas[i];
        for (name, out) in outputs {
            hip.push_metric(name.as_str(), out.value);
            if let Some(aux) = out.aux {
                hip.dev_aux.entry(name).or_default().extend(aux);
            }
        }
    }
}

/// 在内置绘制之后依次执行绘制后处理钩子. 失败的钩子对图层的修改会被回滚.
pub fn apply_post_draw(hip: &HipDataUs, overlay: &mut Overlay, config: &Config) {
    let target = format!("frame {}", hip.frame_no);
    for (name, hook) in config.hip.post_draw_functions.iter() {
        let backup = overlay.clone();
        if isolated(HookKind::PostDraw, name, &target, || hook.draw(hip, overlay, config)).is_none() {
            *overlay = backup;
        }
    }
}

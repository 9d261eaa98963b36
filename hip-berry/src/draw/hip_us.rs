use image::RgbImage;

use super::{Overlay, TextStyle};
use crate::config::Config;
use crate::data::{FemoralHeadSphere, HipDataUs, HipDatasUs, MetricUs, SegFrameObjects, Side};
use crate::hooks::apply_post_draw;

/// 文字行距 (相对于正文字号).
const LINE_SPACING: f32 = 1.4;

/// 为每一帧生成图层: 分割掩码, 标志点, alpha / 覆盖率线段, 股骨头球心, 指标文字,
/// 最后执行绘制后处理钩子.
pub fn draw_overlays_us(
    hip_datas: &HipDatasUs,
    results: &[SegFrameObjects],
    fem_sph: Option<&FemoralHeadSphere>,
    config: &Config,
) -> Vec<Overlay> {
    hip_datas
        .iter()
        .map(|hip| {
            let seg = results.get(hip.frame_no);
            let shape = seg.map_or(hip_datas.shape, SegFrameObjects::shape);
            let mut overlay = Overlay::new(shape, config);

            if let Some(seg) = seg.filter(|_| config.visuals.display_segs) {
                draw_segs(seg, &mut overlay, config);
            }
            draw_landmarks(hip, &mut overlay, config);
            if let Some(sph) = fem_sph.filter(|_| hip_datas.graf_frame == Some(hip.frame_no)) {
                draw_fem_head(sph, &mut overlay, config);
            }
            draw_metrics_text(hip, &mut overlay, config);

            apply_post_draw(hip, &mut overlay, config);
            overlay
        })
        .collect()
}

/// 绘制每一帧并栅格化. 没有对应分割结果的帧以 `hip_datas.shape` 的黑图为底.
pub fn draw_hips_us(
    hip_datas: &HipDatasUs,
    results: &[SegFrameObjects],
    fem_sph: Option<&FemoralHeadSphere>,
    config: &Config,
) -> Vec<RgbImage> {
    let (h, w) = hip_datas.shape;
    draw_overlays_us(hip_datas, results, fem_sph, config)
        .into_iter()
        .enumerate()
        .map(|(i, overlay)| match results.get(i) {
            Some(seg) => overlay.apply_to_image(&seg.img),
            None => overlay.apply_to_image(&RgbImage::new(w as u32, h as u32)),
        })
        .collect()
}

fn draw_segs(seg: &SegFrameObjects, overlay: &mut Overlay, config: &Config) {
    for obj in &seg.objects {
        if let Some(mask) = obj.mask.as_ref().filter(|m| m.dim() == overlay.shape()) {
            overlay.draw_mask(mask.clone(), config.visuals.seg_color);
        }
    }
}

fn draw_landmarks(hip: &HipDataUs, overlay: &mut Overlay, config: &Config) {
    let Some(lm) = hip.landmarks.as_ref() else {
        return;
    };
    let visuals = &config.visuals;

    if config.hip.measures(MetricUs::Alpha) {
        if let (Some(left), Some(apex)) = (lm.left, lm.apex) {
            overlay.draw_line(left, apex, visuals.alpha_line_color);
        }
        if let (Some(apex), Some(right)) = (lm.apex, lm.right) {
            overlay.draw_line(apex, right, visuals.alpha_line_color);
        }
    }
    if config.hip.measures(MetricUs::Coverage) {
        if let (Some(big_d), Some(d)) = (lm.point_big_d, lm.point_d) {
            overlay.draw_line(big_d, d, visuals.coverage_line_color);
        }
    }
    for p in lm.points().into_iter().flatten() {
        overlay.draw_cross(p);
    }
}

fn draw_fem_head(sph: &FemoralHeadSphere, overlay: &mut Overlay, config: &Config) {
    if let Some([x, y, _]) = sph.center() {
        overlay.draw_circle(
            (x.round() as i32, y.round() as i32),
            config.visuals.points_radius,
            config.visuals.fem_head_color,
            true,
        );
    }
}

fn draw_metrics_text(hip: &HipDataUs, overlay: &mut Overlay, config: &Config) {
    let grafs = hip.side == Some(Side::Graf);
    let step = (config.visuals.default_font_size as f32 * LINE_SPACING).round() as i32;
    let mut y = step / 2;

    if config.hip.display_side {
        if let Some(side) = hip.side {
            overlay.draw_text(side.name().to_uppercase(), 10, y, TextStyle::H1, grafs);
            y += step * 2;
        }
    }
    if hip.is_empty() {
        return;
    }
    for m in hip.metrics.iter().filter(|m| config.hip.exports_metric(&m.name)) {
        overlay.draw_text(format!("{}: {:.2}", m.name, m.value), 10, y, TextStyle::Body, grafs);
        y += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HipLabel, LandmarksUs, SegObject};
    use ndarray::Array2;

    fn study() -> (HipDatasUs, Vec<SegFrameObjects>) {
        let lm = LandmarksUs {
            left: Some((2, 10)),
            apex: Some((10, 10)),
            right: Some((14, 16)),
            ..Default::default()
        };
        let mut hd = HipDatasUs::default();
        hd.shape = (20, 30);
        hd.push(HipDataUs::new(0, Some(lm), vec![]));
        hd[0].push_metric("alpha", 56.31);
        hd.push(HipDataUs::empty(1));

        let mut seg = SegFrameObjects::empty(RgbImage::new(30, 20));
        seg.objects.push(SegObject::from_mask(HipLabel::Ilium, Array2::ones((20, 30))));
        (hd, vec![seg])
    }

    #[test]
    fn test_overlays() {
        let config = Config::test_default_us();
        let (hd, results) = study();
        let overlays = draw_overlays_us(&hd, &results, None, &config);
        assert_eq!(overlays.len(), 2);

        // 掩码 + 两条 alpha 线段 + 三个标志点 + 一行文字.
        assert_eq!(overlays[0].len(), 7);
        assert_eq!(overlays[0].texts().collect::<Vec<_>>(), vec!["alpha: 56.31"]);
        assert!(overlays[1].is_empty());
        assert_eq!(overlays[1].shape(), (20, 30));
    }

    #[test]
    fn test_post_draw_runs_last() {
        let config = Config::test_default_us_custom();
        let (mut hd, results) = study();
        hd[0].push_metric("seg object count", 1.0);

        let overlays = draw_overlays_us(&hd, &results, None, &config);
        let texts: Vec<_> = overlays[0].texts().collect();
        assert_eq!(texts.last(), Some(&"count: 1"));

        let images = draw_hips_us(&hd, &results, None, &config);
        assert_eq!(images.len(), 2);
        assert_eq!(images[1].dimensions(), (30, 20));
    }
}

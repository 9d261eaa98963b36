//! 集成测试共用的合成数据.

#![allow(dead_code)]

use hip_berry::prelude::*;
use image::RgbImage;

/// 合成图像宽.
pub const W: u32 = 120;

/// 合成图像高.
pub const H: u32 = 100;

/// 只输出 warn 以上的日志. 重复初始化的错误直接忽略.
pub fn init_logger() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init();
}

/// 一组合理的标志点. `tilt` 为 left 点在 y 方向上的偏移, 偏移越大髂骨线越斜.
///
/// `tilt == 0` 时 alpha = 36.87, coverage = 0.333.
pub fn good_landmarks(tilt: i32) -> LandmarksUs {
    LandmarksUs {
        left: Some((10, 50 + tilt)),
        right: Some((100, 20)),
        apex: Some((60, 50)),
        point_big_d: Some((60, 90)),
        point_d: Some((60, 60)),
        mid_cov_point: Some((60, 70)),
    }
}

/// apex 与 right 距离过近, 但其余规则都能通过.
pub fn crowded_landmarks(tilt: i32) -> LandmarksUs {
    LandmarksUs {
        right: Some((70, 45)),
        ..good_landmarks(tilt)
    }
}

/// 带有髂骨和股骨头两个分割目标的帧.
pub fn seg_frame(img: RgbImage, landmarks: Option<LandmarksUs>) -> SegFrameObjects {
    let mut seg = SegFrameObjects::empty(img);
    seg.objects.push(SegObject::from_points(
        HipLabel::Ilium,
        vec![(10, 50), (60, 50)],
    ));
    seg.objects
        .push(SegObject::from_points(HipLabel::FemoralHead, vec![(60, 75)]));
    seg.landmarks = landmarks;
    seg
}

/// 按 `plan` 逐帧给出标志点的检测函数. 输入帧数必须与 `plan` 一致.
pub fn planned_detector(
    plan: Vec<Option<LandmarksUs>>,
) -> impl Fn(&AnalysisInput, &Config) -> Result<Vec<SegFrameObjects>, PipelineError> {
    move |input: &AnalysisInput, _: &Config| {
        let frames = match input {
            AnalysisInput::Image(img) => vec![img.clone()],
            AnalysisInput::Frames(frames) => frames.clone(),
        };
        if frames.len() != plan.len() {
            return Err(PipelineError::detection(format!(
                "expected {} frames, got {}",
                plan.len(),
                frames.len()
            )));
        }
        Ok(frames
            .into_iter()
            .zip(plan.iter().copied())
            .map(|(img, lm)| seg_frame(img, lm))
            .collect())
    }
}

/// 12 帧的合成研究:
///
/// - 第 0, 1, 11 帧没有检测结果;
/// - 第 9 帧 apex 与 right 过近;
/// - 其余帧的髂骨线倾斜度随与第 5 帧的距离增加.
pub fn twelve_frame_plan() -> Vec<Option<LandmarksUs>> {
    (0..12)
        .map(|i: i32| match i {
            0 | 1 | 11 => None,
            9 => Some(crowded_landmarks(4)),
            _ => Some(good_landmarks((i - 5).abs().min(6))),
        })
        .collect()
}

/// `n` 张空白帧.
pub fn blank_frames(n: usize) -> AnalysisInput {
    AnalysisInput::Frames(vec![RgbImage::new(W, H); n])
}

/// 浮点近似相等.
pub fn f64_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

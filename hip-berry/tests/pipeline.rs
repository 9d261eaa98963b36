mod common;

use common::*;
use hip_berry::pipeline::{analyse_hip_2dus, analyse_hip_2dus_sweep, analyse_hip_3dus};
use hip_berry::prelude::*;
use image::RgbImage;
use serde_json::json;

fn config_3d() -> Config {
    let mut c = Config::test_default_3dus_custom();
    c.hip.measurements = vec![
        MetricUs::Alpha,
        MetricUs::Coverage,
        MetricUs::CenteringRatio,
        MetricUs::Aca,
    ];
    c
}

#[test]
fn test_3dus_full_flow() {
    init_logger();
    let detector = planned_detector(twelve_frame_plan());
    let config = config_3d();

    let a = analyse_hip_3dus(&blank_frames(12), &config, &detector, Components::default())
        .unwrap()
        .unwrap();
    let hd = &a.hip_datas;

    // 帧序列长度不变.
    assert_eq!(hd.len(), 12);
    assert_eq!(hd.bad_frame_reasons[&0], "Not Enough Data");
    assert_eq!(hd.bad_frame_reasons[&11], "Not Enough Data");
    assert_eq!(hd.bad_frame_reasons[&9], "Apex and Right Too Close");
    assert_eq!(hd.kept_frames().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6, 7, 8, 10]);

    assert_eq!(hd.graf_frame, Some(5));
    assert_eq!(hd[5].side, Some(Side::Graf));
    assert_eq!(hd[4].side, Some(Side::NotGraf));
    assert_eq!(hd[9].side, None);

    // 球心 z = 45 / 8, 网格 z 范围 [2, 10].
    assert_eq!(hd.get_metric("centering_ratio"), Some(0.08));
    let alpha = hd.metrics.iter().find(|m| m.name == "alpha").unwrap();
    assert!(f64_eq(alpha.graf.unwrap(), 36.87));
    assert!(alpha.ant.is_some() && alpha.post.is_some());
    assert_eq!(hd.get_metric("scan quality (graf frame)"), Some(1.0));

    // 逐帧钩子只作用于保留帧.
    assert_eq!(hd[5].get_metric("seg object count"), Some(2.0));
    assert_eq!(hd[9].get_metric("seg object count"), None);

    assert_eq!(a.video.len(), 12);
    assert_eq!(a.fps, 2);
    assert!(a.visual.is_some());
    assert_eq!(hd.dev_metrics.as_ref().map(|d| d.no_of_kept_frames), Some(8));

    let v = hd.json_dump(&config, None);
    let names: Vec<&str> = v["metrics"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m.as_object()?.keys().next().map(String::as_str))
        .collect();
    assert_eq!(
        names,
        vec!["alpha", "coverage", "centering_ratio", "scan quality (graf frame)"]
    );
    assert_eq!(v["graf_frame"], json!(5));
    assert_eq!(v["dev_metrics"]["graf_frame"], json!(5));
}

#[test]
fn test_3dus_passthrough_snapshot() {
    init_logger();
    let detector = planned_detector(twelve_frame_plan());
    let mut config = config_3d();
    config.test_data_passthrough = true;

    let a = analyse_hip_3dus(&blank_frames(12), &config, &detector, Components::default())
        .unwrap()
        .unwrap();
    let pre = a.hip_datas.pre_edited.as_ref().unwrap();
    assert_eq!(pre.results.len(), 12);
    assert_eq!(pre.landmarks[9], Some(crowded_landmarks(4)));

    // 快照取自过滤之前.
    let before = pre.hip_datas.as_ref().unwrap();
    assert!(before.bad_frame_reasons.is_empty());
    assert!(!before[9].is_empty());
    assert!(a.hip_datas[9].is_empty());
}

#[test]
fn test_3dus_with_custom_components() {
    init_logger();
    let detector = planned_detector(twelve_frame_plan());
    let config = config_3d();

    // 最后一个保留帧分数最高.
    let scorer = |hd: &HipDatasUs, _: &[SegFrameObjects], _: &Config| -> Vec<f64> {
        (0..hd.len()).map(|i| i as f64).collect()
    };
    let reconstructor = |_: &HipDatasUs, _: &[SegFrameObjects], _: &Config| -> Option<Reconstruction> {
        None
    };
    let components = Components {
        scorer: &scorer,
        reconstructor: &reconstructor,
    };

    let a = analyse_hip_3dus(&blank_frames(12), &config, &detector, components)
        .unwrap()
        .unwrap();
    assert_eq!(a.hip_datas.graf_frame, Some(10));
    assert!(a.visual.is_none());
    assert_eq!(a.hip_datas.get_metric("centering_ratio"), None);
}

#[test]
fn test_sweep_flow() {
    init_logger();
    let detector = |input: &AnalysisInput,
                    config: &Config|
     -> Result<Vec<SegFrameObjects>, PipelineError> {
        let mut results = planned_detector(twelve_frame_plan())(input, config)?;
        results[0].rejection_reasons = vec!["Blurry".to_owned(), "Cropped".to_owned()];
        Ok(results)
    };
    let config = Config::test_default_us_custom();

    let a = analyse_hip_2dus_sweep(
        &blank_frames(12),
        &config,
        &detector,
        &LandmarkConsistencyScorer,
    )
    .unwrap()
    .unwrap();

    assert_eq!(a.hip_datas.bad_frame_reasons[&0], "Blurry Cropped");
    assert_eq!(a.hip_datas.bad_frame_reasons[&1], "Not Enough Data");
    assert_eq!(a.hip_datas.graf_frame, Some(5));
    assert_eq!(a.hip.frame_no, 5);
    assert_eq!(a.hip.get_metric("seg object count"), Some(2.0));
    assert!(a.image.is_some());
    // 首尾各补 12 * 0.1 = 1 帧.
    assert_eq!(a.video.len(), 14);
    assert!(a.hip_datas.metrics.is_empty());
}

#[test]
fn test_2dus_with_hooks() {
    init_logger();
    let detector = planned_detector(vec![Some(good_landmarks(0))]);
    let mut config = Config::test_default_us_custom();
    config.hip.add_full_metric("explodes", |_: &StudyContext<'_>| -> Result<HookOutput, HookError> {
        panic!("boom")
    });

    let input = AnalysisInput::Image(RgbImage::new(W, H));
    let a = analyse_hip_2dus(&input, &config, &detector).unwrap().unwrap();

    assert!(f64_eq(a.hip.get_metric("alpha").unwrap(), 36.87));
    assert!(f64_eq(a.hip.get_metric("coverage").unwrap(), 0.333));
    assert_eq!(a.hip.get_metric("seg object count"), Some(2.0));
    // panic 的钩子取值 0, 不影响其它结果.
    assert_eq!(a.hip.get_metric("explodes"), Some(0.0));
    assert_eq!(a.image.dimensions(), (W, H));
}

#[test]
fn test_run_2dus_json() {
    init_logger();
    let detector = planned_detector(vec![Some(good_landmarks(0))]);
    let config = Config::test_default_us_custom();
    let input = AnalysisInput::Image(RgbImage::new(W, H));

    let res = run(HipMode::Us2d, &input, &config, &detector).unwrap();
    assert_eq!(
        res.metrics["metrics"],
        json!([{"alpha": 36.87}, {"coverage": 0.333}, {"seg object count": 2.0}])
    );
    assert!(res.image.is_some());
    assert!(res.hip_datas.is_none());
}

#[test]
fn test_run_rejects_bad_input() {
    init_logger();
    let detector = planned_detector(vec![None]);
    let config = Config::default_us();

    let single = AnalysisInput::Image(RgbImage::new(W, H));
    assert!(matches!(
        run(HipMode::Us3d, &single, &config, &detector),
        Err(PipelineError::UnsupportedInput(_))
    ));
    assert!(matches!(
        run(HipMode::Us2dSweep, &blank_frames(0), &config, &detector),
        Err(PipelineError::UnsupportedInput(_))
    ));

    let mut landmark_config = Config::default_us();
    landmark_config.operation_type = OperationType::Landmark;
    assert!(matches!(
        run(HipMode::Us3d, &blank_frames(1), &landmark_config, &detector),
        Err(PipelineError::NotImplemented { .. })
    ));
}

#[test]
fn test_run_all_frames_empty() {
    init_logger();
    let detector = planned_detector(vec![None; 4]);
    let config = Config::test_default_us();

    let res = run(HipMode::Us3d, &blank_frames(4), &config, &detector).unwrap();
    let hd = res.hip_datas.unwrap();
    assert_eq!(hd.len(), 4);
    assert_eq!(hd.graf_frame, None);
    assert_eq!(hd.bad_frame_reasons.len(), 4);
    assert_eq!(hd.get_metric("centering_ratio"), None);
    assert_eq!(res.metrics["graf_frame"], json!(null));
}

#[test]
fn test_3dus_without_graf_frame_has_no_centering_ratio() {
    init_logger();
    let detector = planned_detector(twelve_frame_plan());
    let config = config_3d();

    let scorer = |hd: &HipDatasUs, _: &[SegFrameObjects], _: &Config| -> Vec<f64> {
        vec![f64::NAN; hd.len()]
    };
    let components = Components {
        scorer: &scorer,
        reconstructor: &MaskStackReconstructor,
    };

    let a = analyse_hip_3dus(&blank_frames(12), &config, &detector, components)
        .unwrap()
        .unwrap();
    let hd = &a.hip_datas;
    assert_eq!(hd.graf_frame, None);
    // 重建成功, 但居中比不可用, 不能记为 0.
    assert!(a.visual.is_some());
    assert_eq!(hd.get_metric("centering_ratio"), None);

    let v = hd.json_dump(&config, None);
    let has_ratio = v["metrics"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m.get("centering_ratio").is_some());
    assert!(!has_ratio);
}

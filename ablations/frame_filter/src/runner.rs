//! 程序运行函数.

use crate::profile::Profile;
use crate::result::AblationResult;
use hip_berry::prelude::*;
use std::thread;
use utils::synth::{SynthParams, SynthStudy};

/// 每个策略处理的合成研究数.
const STUDIES: u64 = 200;

/// 过滤策略.
#[derive(Copy, Clone, Debug)]
enum Strategy {
    /// 3D 模式: 滑动窗口 + 合理性规则.
    Windowed,

    /// 扫查模式: 所有有预测的帧都是候选帧.
    Sweep,

    /// 滑动窗口, 并在转换前用多项式修正 apex.
    WindowedPolyfit,
}

impl Strategy {
    fn config(self) -> Config {
        let mut c = Config::default_us();
        match self {
            Strategy::Windowed => c.batch.hip_mode = HipMode::Us3d,
            Strategy::Sweep => c.batch.hip_mode = HipMode::Us2dSweep,
            Strategy::WindowedPolyfit => {
                c.batch.hip_mode = HipMode::Us3d;
                c.hip.use_polyfit_replace_apex = true;
            }
        }
        c
    }
}

/// 对同一批合成研究运行某个策略.
fn profile(strategy: Strategy) -> Profile {
    let config = strategy.config();
    let params = SynthParams::default();
    let mut profile = Profile::new();

    for seed in 0..STUDIES {
        let study = SynthStudy::generate(&params, seed);
        let results = study.results();

        profile.work_start();
        let hd = study.to_hip_datas(&config);
        let hd = handle_bad_frames(hd, &config);
        let hd = find_graf_plane(hd, &results, &LandmarkConsistencyScorer, &config);
        profile.work_elapsed();

        let graf_hit = hd.graf_frame.map(|g| g.abs_diff(study.true_graf) <= 1);
        profile.record(
            hd.len(),
            hd.kept_frames().count(),
            hd.bad_frame_reasons.values(),
            graf_hit,
        );
    }
    profile.finish()
}

/// 实际运行.
pub fn run() -> AblationResult {
    println!("Running ablation studies on {} cores...", utils::cpus());

    let strategies = [
        ("windowed", Strategy::Windowed),
        ("sweep", Strategy::Sweep),
        ("windowed + polyfit", Strategy::WindowedPolyfit),
    ];
    thread::scope(|s| {
        let handles = strategies.map(|(_, t)| s.spawn(move || profile(t)));

        AblationResult::from_iter(
            strategies.into_iter().map(|(name, _)| name).zip(
                handles
                    .into_iter()
                    .map(|th| th.join().expect("Thread joining error")),
            ),
        )
    })
}

//! 坏帧过滤.
//!
//! 先用滑动窗口 (或扫查模式下的 "有预测" 掩码) 选出候选帧, 再对候选帧依次应用合理性规则.
//! 任何被拒绝的帧都会被替换为空占位帧, 并记录一条原因.

use std::ops::Range;

use crate::config::{Config, HipMode};
use crate::consts::reason;
use crate::data::{HipDataUs, HipDatasUs};
use crate::metrics::{apex_right_points_too_close, bad_alpha, bad_coverage, left_apex_line_flat};

/// 宽度为掩码中 `true` 个数 `T` 的滑动窗口中, 包含 `true` 最多的那个窗口.
///
/// 多个窗口并列时取起点最小的. `T == 0` 时返回 `0..0`.
pub fn best_window(mask: &[bool]) -> Range<usize> {
    let total = mask.iter().filter(|&&m| m).count();
    if total == 0 {
        return 0..0;
    }

    let mut current = mask[..total].iter().filter(|&&m| m).count();
    let (mut best, mut best_start) = (current, 0);
    for start in 1..=(mask.len() - total) {
        // 窗口右移一格: 移出 start - 1, 移入 start + total - 1.
        current = current + mask[start + total - 1] as usize - mask[start - 1] as usize;
        if current > best {
            best = current;
            best_start = start;
        }
    }
    best_start..best_start + total
}

/// 只保留 [`best_window`] 窗口内的 `true`.
pub fn remove_outliers(mask: &[bool]) -> Vec<bool> {
    let window = best_window(mask);
    mask.iter()
        .enumerate()
        .map(|(i, &m)| m && window.contains(&i))
        .collect()
}

/// 对候选帧依次检查合理性规则, 返回第一条不满足的规则对应的原因.
fn validity_reason(hip: &HipDataUs, config: &Config) -> Option<&'static str> {
    if hip.is_empty() {
        return Some(reason::NO_METRICS);
    }
    let Some(lm) = hip.landmarks.as_ref() else {
        return Some(reason::NO_LANDMARKS);
    };
    if bad_alpha(hip) {
        return Some(reason::BAD_ALPHA);
    }
    if !config.hip.allow_irregular_illiums && !left_apex_line_flat(lm) {
        return Some(reason::ILIUM_NOT_FLAT);
    }
    if bad_coverage(hip, config) {
        return Some(reason::BAD_COVERAGE);
    }
    if apex_right_points_too_close(lm) {
        return Some(reason::APEX_RIGHT_TOO_CLOSE);
    }
    None
}

/// 非候选帧的原因: 上游分割给出的原因以空格连接, 没有则为 [`reason::NOT_ENOUGH_DATA`].
fn upstream_reason(hip_datas: &HipDatasUs, i: usize) -> String {
    match hip_datas.seg_rejection_reasons.get(i) {
        Some(rs) if !rs.is_empty() => rs.join(" "),
        _ => reason::NOT_ENOUGH_DATA.to_owned(),
    }
}

/// 过滤坏帧. 输出与输入等长, 被拒绝的帧替换为空占位帧, 原因记录在 `bad_frame_reasons`.
///
/// 扫查模式 ([`HipMode::Us2dSweep`]) 下所有有预测的帧都是候选帧; 其它模式使用
/// [`best_window`] 选出的窗口. 窗口在第一次过滤时记录在 `keep_window` 中,
/// 重复过滤时直接复用, 因此本函数是幂等的.
pub fn handle_bad_frames(mut hip_datas: HipDatasUs, config: &Config) -> HipDatasUs {
    let marked: Vec<bool> = hip_datas.iter().map(HipDataUs::marked).collect();
    let keep = if config.batch.hip_mode == HipMode::Us2dSweep {
        marked
    } else {
        let window = match hip_datas.keep_window.clone() {
            Some(w) => w,
            None => best_window(&marked),
        };
        let keep = marked
            .iter()
            .enumerate()
            .map(|(i, &m)| m && window.contains(&i))
            .collect();
        hip_datas.keep_window = Some(window);
        keep
    };

    let previous = std::mem::take(&mut hip_datas.bad_frame_reasons);
    for (i, &candidate) in keep.iter().enumerate() {
        let reason = if candidate {
            validity_reason(&hip_datas[i], config).map(str::to_owned)
        } else {
            Some(match previous.get(&i) {
                Some(r) => r.clone(),
                None => upstream_reason(&hip_datas, i),
            })
        };
        if let Some(r) = reason {
            hip_datas.reject(i, r);
        }
    }

    log::info!(
        "Bad frame filter kept {} of {} frames.",
        hip_datas.kept_frames().count(),
        hip_datas.len()
    );
    hip_datas
}

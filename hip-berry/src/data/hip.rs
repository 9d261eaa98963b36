use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::metric::last_by_name;
use super::{AuxData, LandmarksUs, Metric2D};
use crate::config::Config;
use crate::dev::DevMetricsUs;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 帧相对于 Graf 平面的分类.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// 该帧即 Graf 平面.
    Graf,

    /// 有效帧, 但不是 Graf 平面.
    NotGraf,
}

impl Side {
    /// 名称.
    pub const fn name(&self) -> &'static str {
        match self {
            Side::Graf => "graf",
            Side::NotGraf => "not_graf",
        }
    }
}

/// 单帧的分析结果.
///
/// 没有任何指标, 或者全部指标都为 0 的帧被视为 "空" 帧. 空帧可以被
/// [`HipDataUs::empty`] 占位帧替换, 而不破坏帧序号索引.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HipDataUs {
    /// 帧序号.
    pub frame_no: usize,

    /// 标志点.
    pub landmarks: Option<LandmarksUs>,

    /// 按插入顺序排列的指标. 允许重名, 按名查找时最后一个胜出.
    pub metrics: Vec<Metric2D>,

    /// 分类. `None` 代表尚未分配.
    pub side: Option<Side>,

    /// 逐帧钩子返回的辅助数据, 以指标名分组.
    pub dev_aux: BTreeMap<String, AuxData>,
}

impl HipDataUs {
    /// 构建一帧结果.
    pub fn new(frame_no: usize, landmarks: Option<LandmarksUs>, metrics: Vec<Metric2D>) -> Self {
        Self {
            frame_no,
            landmarks,
            metrics,
            ..Default::default()
        }
    }

    /// 空占位帧: 仅保留帧序号, 没有标志点和指标.
    #[inline]
    pub fn empty(frame_no: usize) -> Self {
        Self {
            frame_no,
            ..Default::default()
        }
    }

    /// 是否为空帧 (没有指标, 或全部指标为 0).
    pub fn is_empty(&self) -> bool {
        self.metrics.iter().all(|m| m.value == 0.0)
    }

    /// 该帧是否有预测结果 (有标志点, 且至少计算出一个指标).
    #[inline]
    pub fn marked(&self) -> bool {
        self.landmarks.is_some() && !self.metrics.is_empty()
    }

    /// 按名称查找指标数值. 重名时返回最后插入的那个.
    pub fn get_metric(&self, name: &str) -> Option<f64> {
        last_by_name(&self.metrics, name, |m| m.name.as_str()).map(|m| m.value)
    }

    /// 追加指标.
    #[inline]
    pub fn push_metric<S: Into<String>>(&mut self, name: S, value: f64) {
        self.metrics.push(Metric2D::new(name, value));
    }

    /// 导出为 JSON: `{"metrics": [{name: value}, ...], "frame_no": .., "side": .., "dev_metrics": ..}`.
    ///
    /// 内置指标只导出 `config` 中启用的那些; 其余 (钩子注册的) 指标全部导出.
    pub fn json_dump(&self, config: &Config, dev_metrics: Option<&DevMetricsUs>) -> Value {
        let metrics: Vec<Value> = self
            .metrics
            .iter()
            .filter(|m| config.hip.exports_metric(&m.name))
            .map(Metric2D::to_json)
            .collect();

        let mut out = json!({
            "metrics": metrics,
            "frame_no": self.frame_no,
            "side": self.side.map(|s| s.name()),
        });
        if let Some(dev) = dev_metrics {
            out["dev_metrics"] = dev.to_json();
        }
        if !self.dev_aux.is_empty() {
            out["custom_dev_metrics"] = json!(self.dev_aux);
        }
        out
    }
}

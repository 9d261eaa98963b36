use serde_json::{json, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 内置的超声指标.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MetricUs {
    /// alpha 角 (Graf 法).
    Alpha,

    /// 股骨头覆盖率.
    Coverage,

    /// 股骨头在前后方向上的居中比 (仅 3D).
    CenteringRatio,

    /// 覆盖角 (angle of coverage, 仅 3D, 由外部重建给出).
    Aca,
}

impl MetricUs {
    /// 指标名称. 同时作为 JSON 导出的键.
    pub const fn name(&self) -> &'static str {
        match self {
            MetricUs::Alpha => "alpha",
            MetricUs::Coverage => "coverage",
            MetricUs::CenteringRatio => "centering_ratio",
            MetricUs::Aca => "aca",
        }
    }

    /// 是否为逐帧计算的指标.
    #[inline]
    pub const fn is_per_frame(&self) -> bool {
        matches!(self, MetricUs::Alpha | MetricUs::Coverage)
    }
}

/// 二维 (单帧) 指标: 名称 + 数值.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metric2D {
    /// 名称.
    pub name: String,

    /// 数值.
    pub value: f64,
}

impl Metric2D {
    /// 构建指标.
    pub fn new<S: Into<String>>(name: S, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// 导出为 `{name: value}`.
    pub fn to_json(&self) -> Value {
        json!({ self.name.as_str(): self.value })
    }
}

/// 三维 (全研究) 指标.
///
/// `post`, `graf`, `ant` 分别对应后侧三分之一, Graf 帧, 前侧三分之一的数值;
/// `full` 是整个研究的数值. 任一项都可能缺失.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metric3D {
    /// 名称.
    pub name: String,

    /// 后侧.
    pub post: Option<f64>,

    /// Graf 帧.
    pub graf: Option<f64>,

    /// 前侧.
    pub ant: Option<f64>,

    /// 全研究数值.
    pub full: Option<f64>,
}

impl Metric3D {
    /// 仅有全研究数值的指标.
    pub fn full_only<S: Into<String>>(name: S, full: f64) -> Self {
        Self {
            name: name.into(),
            full: Some(full),
            ..Default::default()
        }
    }

    /// 导出为 `{name: [post, graf, ant, full]}`, 缺失项为 `null`.
    pub fn to_json(&self) -> Value {
        json!({ self.name.as_str(): [self.post, self.graf, self.ant, self.full] })
    }
}

/// 钩子注册的全局指标. 3D 容积模式下为 [`Metric3D`], 其它模式下为 [`Metric2D`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CustomMetric {
    /// 2D 模式下的全局指标.
    Flat(Metric2D),

    /// 3D 容积模式下的全局指标.
    Volume(Metric3D),
}

impl CustomMetric {
    /// 名称.
    pub fn name(&self) -> &str {
        match self {
            CustomMetric::Flat(m) => &m.name,
            CustomMetric::Volume(m) => &m.name,
        }
    }

    /// 主数值. 3D 指标取 `full`, 缺失时为 0.
    pub fn value(&self) -> f64 {
        match self {
            CustomMetric::Flat(m) => m.value,
            CustomMetric::Volume(m) => m.full.unwrap_or(0.0),
        }
    }

    /// 导出为 JSON.
    pub fn to_json(&self) -> Value {
        match self {
            CustomMetric::Flat(m) => m.to_json(),
            CustomMetric::Volume(m) => m.to_json(),
        }
    }
}

/// 在按插入顺序排列的指标中, 查找名称为 `name` 的 **最后一个** 指标.
pub(crate) fn last_by_name<'a, T, F>(metrics: &'a [T], name: &str, key: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    metrics.iter().rev().find(|m| key(m) == name)
}

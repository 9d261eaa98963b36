use std::collections::BTreeMap;
use std::ops::{Index, IndexMut, Range};

use serde_json::{json, Value};

use super::metric::last_by_name;
use super::{AuxData, CustomMetric, HipDataUs, LandmarksUs, Metric3D, SegFrameObjects};
use crate::config::Config;
use crate::dev::DevMetricsUs;
use crate::Shape2d;

/// 一次研究 (一段视频或一组 3D 切片) 的全部分析结果.
///
/// 下标即帧序号: 帧按输入顺序存放, 永远不会被重排, 也不会被删除.
/// 被拒绝的帧只会被 [`HipDataUs::empty`] 占位帧替换, 因此 `len()` 始终等于输入帧数.
#[derive(Clone, Debug, Default)]
pub struct HipDatasUs {
    hips: Vec<HipDataUs>,

    /// Graf 平面所在帧. 若已设置, 必然指向坏帧过滤后保留的帧.
    pub graf_frame: Option<usize>,

    /// 逐帧的 Graf 平面置信度. 若非空, 长度等于 `len()`.
    pub graf_confs: Vec<f64>,

    /// 被拒绝帧的原因.
    pub bad_frame_reasons: BTreeMap<usize, String>,

    /// 内置的全研究指标.
    pub metrics: Vec<Metric3D>,

    /// 全局指标钩子给出的指标, 按插入顺序排列.
    pub custom_metrics: Vec<CustomMetric>,

    /// 全局指标钩子给出的辅助数据, 以指标名分组.
    pub dev_metrics_custom: BTreeMap<String, AuxData>,

    /// 上游分割给出的逐帧拒绝原因. 若非空, 长度等于 `len()`.
    pub seg_rejection_reasons: Vec<Vec<String>>,

    /// 第一次窗口筛选所选中的帧区间. 再次过滤时直接复用.
    pub keep_window: Option<Range<usize>>,

    /// 原图形状 `(h, w)`.
    pub shape: Shape2d,

    /// 测试快照. 仅在 `config.test_data_passthrough` 开启时保存.
    pub pre_edited: Option<Box<PreEdited>>,

    /// 开发者指标.
    pub dev_metrics: Option<DevMetricsUs>,
}

/// 处理前的深拷贝快照, 用于比较和测试.
#[derive(Clone, Debug, Default)]
pub struct PreEdited {
    /// 分割预处理之后, 标志点转换之前的分割结果.
    pub results: Vec<SegFrameObjects>,

    /// apex 修正之前的标志点.
    pub landmarks: Vec<Option<LandmarksUs>>,

    /// 坏帧过滤之前的分析结果.
    pub hip_datas: Option<Box<HipDatasUs>>,
}

impl HipDatasUs {
    /// 构建研究结果.
    pub fn new(hips: Vec<HipDataUs>, shape: Shape2d) -> Self {
        debug_assert!(hips.iter().enumerate().all(|(i, h)| h.frame_no == i));
        Self {
            hips,
            shape,
            ..Default::default()
        }
    }

    /// 帧数.
    #[inline]
    pub fn len(&self) -> usize {
        self.hips.len()
    }

    /// 是否没有任何帧.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hips.is_empty()
    }

    /// 迭代各帧.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, HipDataUs> {
        self.hips.iter()
    }

    /// 可变迭代各帧.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, HipDataUs> {
        self.hips.iter_mut()
    }

    /// 追加一帧. `hip.frame_no` 会被改写为追加后的下标.
    pub fn push(&mut self, mut hip: HipDataUs) {
        hip.frame_no = self.hips.len();
        self.hips.push(hip);
    }

    /// 替换第 `i` 帧, 返回旧值. 新帧的 `frame_no` 会被强制设为 `i`.
    pub fn replace(&mut self, i: usize, mut hip: HipDataUs) -> HipDataUs {
        hip.frame_no = i;
        std::mem::replace(&mut self.hips[i], hip)
    }

    /// 把第 `i` 帧替换为空占位帧, 并记录原因. 返回旧值.
    pub fn reject<S: Into<String>>(&mut self, i: usize, reason: S) -> HipDataUs {
        self.bad_frame_reasons.insert(i, reason.into());
        self.replace(i, HipDataUs::empty(i))
    }

    /// Graf 平面所在帧的数据.
    pub fn grafs_hip(&self) -> Option<&HipDataUs> {
        self.graf_frame.and_then(|i| self.hips.get(i))
    }

    /// 被保留 (非空) 的帧序号.
    pub fn kept_frames(&self) -> impl Iterator<Item = usize> + '_ {
        self.hips
            .iter()
            .filter(|h| !h.is_empty())
            .map(|h| h.frame_no)
    }

    /// 按名称查找全研究指标. 先找钩子指标, 再找内置指标; 重名时最后一个胜出.
    pub fn get_metric(&self, name: &str) -> Option<f64> {
        if let Some(m) = last_by_name(&self.custom_metrics, name, CustomMetric::name) {
            return Some(m.value());
        }
        last_by_name(&self.metrics, name, |m| m.name.as_str()).and_then(|m| m.full)
    }

    /// 内置指标 (按配置过滤) 与钩子指标合并后的 JSON 列表.
    pub fn merged_metrics(&self, config: &Config) -> Vec<Value> {
        self.metrics
            .iter()
            .filter(|m| config.hip.exports_metric(&m.name))
            .map(Metric3D::to_json)
            .chain(self.custom_metrics.iter().map(CustomMetric::to_json))
            .collect()
    }

    /// 导出为 JSON.
    ///
    /// 键: `metrics`, `graf_frame`, `bad_frame_reasons`, 以及可选的 `dev_metrics`
    /// 和 `custom_dev_metrics`.
    pub fn json_dump(&self, config: &Config, dev_metrics: Option<&DevMetricsUs>) -> Value {
        let reasons: serde_json::Map<String, Value> = self
            .bad_frame_reasons
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(v.as_str())))
            .collect();

        let mut out = json!({
            "metrics": self.merged_metrics(config),
            "graf_frame": self.graf_frame,
            "bad_frame_reasons": reasons,
        });
        if let Some(dev) = dev_metrics.or(self.dev_metrics.as_ref()) {
            out["dev_metrics"] = dev.to_json();
        }
        if !self.dev_metrics_custom.is_empty() {
            out["custom_dev_metrics"] = json!(self.dev_metrics_custom);
        }
        out
    }
}

impl Index<usize> for HipDatasUs {
    type Output = HipDataUs;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.hips[index]
    }
}

impl IndexMut<usize> for HipDatasUs {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.hips[index]
    }
}

impl<'a> IntoIterator for &'a HipDatasUs {
    type Item = &'a HipDataUs;
    type IntoIter = std::slice::Iter<'a, HipDataUs>;

    fn into_iter(self) -> Self::IntoIter {
        self.hips.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Metric2D;

    fn study(n: usize) -> HipDatasUs {
        let hips = (0..n)
            .map(|i| {
                HipDataUs::new(
                    i,
                    Some(LandmarksUs::default()),
                    vec![Metric2D::new("alpha", 60.0 + i as f64)],
                )
            })
            .collect();
        HipDatasUs::new(hips, (100, 100))
    }

    #[test]
    fn test_reject_keeps_length() {
        let mut hd = study(5);
        let old = hd.reject(2, "No Metrics");
        assert_eq!(old.frame_no, 2);
        assert_eq!(hd.len(), 5);
        assert!(hd[2].is_empty());
        assert_eq!(hd[2].frame_no, 2);
        assert_eq!(hd.bad_frame_reasons[&2], "No Metrics");
        assert_eq!(hd.kept_frames().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_grafs_hip() {
        let mut hd = study(3);
        assert!(hd.grafs_hip().is_none());
        hd.graf_frame = Some(1);
        assert_eq!(hd.grafs_hip().and_then(|h| h.get_metric("alpha")), Some(61.0));
    }

    #[test]
    fn test_json_dump_keys() {
        let mut hd = study(2);
        hd.metrics.push(Metric3D::full_only("alpha", 61.0));
        hd.custom_metrics
            .push(CustomMetric::Volume(Metric3D::full_only("custom", 42.0)));
        hd.reject(0, "No Landmarks");
        hd.graf_frame = Some(1);

        let v = hd.json_dump(&Config::test_default_us(), None);
        assert_eq!(v["graf_frame"], json!(1));
        assert_eq!(v["bad_frame_reasons"]["0"], json!("No Landmarks"));
        assert_eq!(v["metrics"][0], json!({"alpha": [null, null, null, 61.0]}));
        assert_eq!(v["metrics"][1], json!({"custom": [null, null, null, 42.0]}));
        assert!(v.get("dev_metrics").is_none());
        assert_eq!(hd.get_metric("custom"), Some(42.0));
    }
}

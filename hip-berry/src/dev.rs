//! 开发者指标: 描述一次分析过程本身, 而非临床结论.

use serde_json::{json, Value};

use crate::data::{HipDatasUs, HipLabel, SegFrameObjects};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 超声分析的开发者指标.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DevMetricsUs {
    /// Graf 帧.
    pub graf_frame: Option<usize>,

    /// 总帧数.
    pub no_of_frames: usize,

    /// 坏帧过滤后保留的帧数.
    pub no_of_kept_frames: usize,

    /// Graf 帧的置信度.
    pub graf_confidence: Option<f64>,

    /// Graf 帧 (没有 Graf 帧时为任意帧) 上是否检测到坐骨.
    pub os_ichium_detected: bool,
}

impl DevMetricsUs {
    /// 导出为 JSON.
    pub fn to_json(&self) -> Value {
        json!({
            "graf_frame": self.graf_frame,
            "no_of_frames": self.no_of_frames,
            "no_of_kept_frames": self.no_of_kept_frames,
            "graf_confidence": self.graf_confidence,
            "os_ichium_detected": self.os_ichium_detected,
        })
    }
}

/// 计算开发者指标并保存在 `hip_datas.dev_metrics` 中.
pub fn get_dev_metrics(hip_datas: &mut HipDatasUs, results: &[SegFrameObjects]) {
    let has_ichium = |seg: &SegFrameObjects| seg.of_class(HipLabel::OsIchium).next().is_some();
    let os_ichium_detected = match hip_datas.graf_frame {
        Some(i) => results.get(i).is_some_and(has_ichium),
        None => results.iter().any(has_ichium),
    };

    hip_datas.dev_metrics = Some(DevMetricsUs {
        graf_frame: hip_datas.graf_frame,
        no_of_frames: hip_datas.len(),
        no_of_kept_frames: hip_datas.kept_frames().count(),
        graf_confidence: hip_datas
            .graf_frame
            .and_then(|i| hip_datas.graf_confs.get(i))
            .copied(),
        os_ichium_detected,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HipDataUs, SegObject};
    use image::RgbImage;

    #[test]
    fn test_dev_metrics() {
        let mut hd = HipDatasUs::default();
        hd.push(HipDataUs::empty(0));
        let mut hip = HipDataUs::empty(1);
        hip.push_metric("alpha", 61.0);
        hd.push(hip);
        hd.graf_frame = Some(1);
        hd.graf_confs = vec![0.0, 0.8];

        let mut seg = SegFrameObjects::empty(RgbImage::new(2, 2));
        seg.objects.push(SegObject::from_points(HipLabel::OsIchium, vec![]));
        let results = vec![SegFrameObjects::empty(RgbImage::new(2, 2)), seg];

        get_dev_metrics(&mut hd, &results);
        let dev = hd.dev_metrics.clone().unwrap();
        assert_eq!(dev.no_of_frames, 2);
        assert_eq!(dev.no_of_kept_frames, 1);
        assert_eq!(dev.graf_confidence, Some(0.8));
        assert!(dev.os_ichium_detected);
        assert_eq!(dev.to_json()["graf_frame"], json!(1));
    }
}

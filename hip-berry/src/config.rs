//! 运行配置.
//!
//! 配置是普通的 `Clone` 结构体, 由工厂函数 ([`Config::default_us`] 等) 每次返回一个新值,
//! 不存在进程级的全局默认配置. 流程只读取配置; 钩子列表由调用方在调用流程之前填充.

use std::sync::Arc;

use crate::consts::{rgb, MIN_VID_FPS, MIN_VID_LENGTH};
use crate::data::{HipDataUs, MetricUs, SegFrameObjects, Side};
use crate::draw::{Overlay, TextStyle};
use crate::error::HookError;
use crate::hooks::{
    FrameContext, FrameMetricHook, FullMetricHook, HookList, HookOutput, PostDrawHook,
    PreprocessContext, SegPreprocessHook, StudyContext,
};
use crate::metrics::round_to;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 分析模式.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HipMode {
    /// 3D 超声容积.
    Us3d,

    /// 2D 超声单帧.
    Us2d,

    /// 2D 超声连续扫查.
    Us2dSweep,

    /// X 光. 本 crate 不实现其指标.
    Xray,
}

/// 检测函数给出的结果类型.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OperationType {
    /// 分割结果 (附带由分割得出的标志点).
    Seg,

    /// 直接给出标志点. 多帧模式下尚不支持.
    Landmark,
}

/// 髋关节相关配置.
#[derive(Clone, Debug)]
pub struct HipConfig {
    /// 启用的内置指标.
    pub measurements: Vec<MetricUs>,

    /// 是否允许不平坦的髂骨线.
    pub allow_irregular_illiums: bool,

    /// 是否用多项式拟合修正 apex 离群点.
    pub use_polyfit_replace_apex: bool,

    /// 是否在图像上标注帧分类.
    pub display_side: bool,

    /// 逐帧指标钩子.
    pub per_frame_metric_functions: HookList<dyn FrameMetricHook>,

    /// 全局指标钩子.
    pub full_metric_functions: HookList<dyn FullMetricHook>,

    /// 绘制后处理钩子.
    pub post_draw_functions: HookList<dyn PostDrawHook>,

    /// 分割预处理钩子.
    pub seg_preprocess_functions: HookList<dyn SegPreprocessHook>,
}

impl Default for HipConfig {
    fn default() -> Self {
        Self {
            measurements: vec![MetricUs::Alpha, MetricUs::Coverage],
            allow_irregular_illiums: false,
            use_polyfit_replace_apex: false,
            display_side: true,
            per_frame_metric_functions: HookList::new(),
            full_metric_functions: HookList::new(),
            post_draw_functions: HookList::new(),
            seg_preprocess_functions: HookList::new(),
        }
    }
}

impl HipConfig {
    /// 是否启用了内置指标 `metric`.
    #[inline]
    pub fn measures(&self, metric: MetricUs) -> bool {
        self.measurements.contains(&metric)
    }

    /// 名为 `name` 的指标是否应当导出: 内置指标须已启用, 其它指标总是导出.
    pub fn exports_metric(&self, name: &str) -> bool {
        const BUILTIN: [MetricUs; 4] = [
            MetricUs::Alpha,
            MetricUs::Coverage,
            MetricUs::CenteringRatio,
            MetricUs::Aca,
        ];
        match BUILTIN.into_iter().find(|m| m.name() == name) {
            Some(m) => self.measures(m),
            None => true,
        }
    }

    /// 注册逐帧指标钩子.
    pub fn add_frame_metric<S, F>(&mut self, name: S, hook: F)
    where
        S: Into<String>,
        F: Fn(&FrameContext<'_>) -> Result<HookOutput, HookError> + Send + Sync + 'static,
    {
        self.per_frame_metric_functions.push(name, Arc::new(hook));
    }

    /// 注册全局指标钩子.
    pub fn add_full_metric<S, F>(&mut self, name: S, hook: F)
    where
        S: Into<String>,
        F: Fn(&StudyContext<'_>) -> Result<HookOutput, HookError> + Send + Sync + 'static,
    {
        self.full_metric_functions.push(name, Arc::new(hook));
    }

    /// 注册绘制后处理钩子.
    pub fn add_post_draw<S, F>(&mut self, name: S, hook: F)
    where
        S: Into<String>,
        F: Fn(&HipDataUs, &mut Overlay, &Config) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.post_draw_functions.push(name, Arc::new(hook));
    }

    /// 注册分割预处理钩子.
    pub fn add_seg_preprocess<S, F>(&mut self, name: S, hook: F)
    where
        S: Into<String>,
        F: Fn(&mut PreprocessContext<'_>) -> Result<Option<Vec<SegFrameObjects>>, HookError>
            + Send
            + Sync
            + 'static,
    {
        self.seg_preprocess_functions.push(name, Arc::new(hook));
    }
}

/// 绘制相关配置.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisualsConfig {
    /// 正文字号 (像素). 标题按比例放大.
    pub default_font_size: u32,

    /// 标志点半径.
    pub points_radius: u32,

    /// 线宽.
    pub line_thickness: u32,

    /// 是否绘制分割掩码.
    pub display_segs: bool,

    /// 视频最小帧率.
    pub min_vid_fps: u32,

    /// 视频最短时长 (秒).
    pub min_vid_length: u32,

    /// 标志点颜色.
    pub points_color: [u8; 3],

    /// alpha 角线段颜色.
    pub alpha_line_color: [u8; 3],

    /// 覆盖率线段颜色.
    pub coverage_line_color: [u8; 3],

    /// 文字颜色.
    pub text_color: [u8; 3],

    /// Graf 帧高亮颜色.
    pub graf_color: [u8; 3],

    /// 分割掩码颜色.
    pub seg_color: [u8; 3],

    /// 股骨头球心颜色.
    pub fem_head_color: [u8; 3],
}

impl Default for VisualsConfig {
    fn default() -> Self {
        Self {
            default_font_size: 12,
            points_radius: 5,
            line_thickness: 2,
            display_segs: false,
            min_vid_fps: MIN_VID_FPS,
            min_vid_length: MIN_VID_LENGTH,
            points_color: rgb::YELLOW,
            alpha_line_color: rgb::RED,
            coverage_line_color: rgb::BLUE,
            text_color: rgb::WHITE,
            graf_color: rgb::GREEN,
            seg_color: rgb::CYAN,
            fem_head_color: rgb::MAGENTA,
        }
    }
}

/// 批处理相关配置.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchConfig {
    /// 分析模式. 各入口函数会在自己的配置副本上改写它.
    pub hip_mode: HipMode,

    /// 接受的输入文件后缀.
    pub input_types: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            hip_mode: HipMode::Us3d,
            input_types: vec![".dcm".to_owned()],
        }
    }
}

/// 完整配置.
#[derive(Clone, Debug)]
pub struct Config {
    /// 配置名.
    pub name: String,

    /// 检测函数的结果类型.
    pub operation_type: OperationType,

    /// 髋关节配置.
    pub hip: HipConfig,

    /// 绘制配置.
    pub visuals: VisualsConfig,

    /// 批处理配置.
    pub batch: BatchConfig,

    /// 是否在结果中保留处理前的深拷贝快照.
    pub test_data_passthrough: bool,
}

impl Config {
    /// 基础配置.
    pub fn base() -> Self {
        Self {
            name: "base".to_owned(),
            operation_type: OperationType::Seg,
            hip: HipConfig::default(),
            visuals: VisualsConfig::default(),
            batch: BatchConfig::default(),
            test_data_passthrough: false,
        }
    }

    /// 超声默认配置.
    pub fn default_us() -> Self {
        let mut c = Self::base();
        c.name = "default_US".to_owned();
        c.visuals.default_font_size = 20;
        c.visuals.points_radius = 10;
        c.visuals.line_thickness = 3;
        c.visuals.display_segs = true;
        c.hip.display_side = false;
        c.batch.input_types = [".dcm", ".jpg", ".png"].map(str::to_owned).to_vec();
        c
    }

    /// 测试用配置: 启用全部内置超声指标.
    pub fn test_default_us() -> Self {
        let mut c = Self::default_us();
        c.name = "test_default_US".to_owned();
        c.hip.measurements = vec![
            MetricUs::Alpha,
            MetricUs::Coverage,
            MetricUs::CenteringRatio,
            MetricUs::Aca,
        ];
        c
    }

    /// 测试用配置: 注册了 "seg object count" 逐帧指标, 并把它画在图上.
    pub fn test_default_us_custom() -> Self {
        let mut c = Self::test_default_us();
        c.name = "test_default_US_custom".to_owned();
        c.hip.add_frame_metric("seg object count", seg_object_count);
        c.hip.add_post_draw("us seg count", |hip, overlay, _| {
            let count = hip.get_metric("seg object count").unwrap_or(0.0);
            overlay.draw_text(format!("count: {count}"), 50, 50, TextStyle::H2, false);
            Ok(())
        });
        c
    }

    /// 测试用 3D 配置: Graf 帧置信度作为全局指标, 并只在 Graf 帧上标注分割目标个数.
    pub fn test_default_3dus_custom() -> Self {
        let mut c = Self::default_us();
        c.name = "test_default_3DUS_custom".to_owned();
        c.hip.add_full_metric("scan quality (graf frame)", |ctx| {
            let hd = ctx.hip_datas;
            let conf = hd.graf_frame.and_then(|i| hd.graf_confs.get(i)).copied();
            Ok(HookOutput::value(conf.map_or(0.0, |v| round_to(v, 2))))
        });
        c.hip.add_frame_metric("seg object count", seg_object_count);
        c.hip.add_post_draw("us seg count on graf", |hip, overlay, _| {
            if hip.side != Some(Side::Graf) {
                return Ok(());
            }
            let count = hip.get_metric("seg object count").unwrap_or(0.0);
            overlay.draw_text(format!("count: {count}"), 20, 20, TextStyle::H2, true);
            Ok(())
        });
        c
    }
}

fn seg_object_count(ctx: &FrameContext<'_>) -> Result<HookOutput, HookError> {
    let seg = ctx.seg.ok_or(HookError::MissingInput("segmentation"))?;
    Ok(HookOutput::value(seg.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factories_are_fresh() {
        let mut a = Config::test_default_us();
        a.hip.add_frame_metric("x", |_| Ok(HookOutput::value(1.0)));
        a.visuals.points_radius = 99;

        let b = Config::test_default_us();
        assert!(b.hip.per_frame_metric_functions.is_empty());
        assert_eq!(b.visuals.points_radius, 10);
    }

    #[test]
    fn test_exports_metric() {
        let mut c = Config::default_us();
        assert!(c.hip.exports_metric("alpha"));
        assert!(!c.hip.exports_metric("centering_ratio"));
        assert!(c.hip.exports_metric("seg object count"));

        c.hip.measurements.retain(|&m| m != MetricUs::Alpha);
        assert!(!c.hip.exports_metric("alpha"));
    }

    #[test]
    fn test_clone_shares_hooks() {
        let c = Config::test_default_us_custom();
        let d = c.clone();
        assert_eq!(d.hip.per_frame_metric_functions.len(), 1);
        assert_eq!(format!("{:?}", d.hip.post_draw_functions), r#"["us seg count"]"#);
    }
}

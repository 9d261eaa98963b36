//! 用户钩子.
//!
//! 调用方可以在 [`crate::HipConfig`] 上注册四类钩子: 逐帧指标, 全局指标, 绘制后处理, 分割预处理.
//! 每个钩子只接收一个固定形状的上下文结构, 不需要的字段直接忽略即可; 返回值统一为
//! [`HookOutput`].
//!
//! 钩子的错误 (`Err`) 和 panic 都会在 [`isolated`] 边界内被捕获并以 `warn` 级别记录,
//! 指标钩子失败时取值 0, 绘制钩子失败时图层回滚, 预处理钩子失败时结果回滚.
//! 失败的钩子不会被重试.

mod apply;
mod isolate;
mod kinds;

use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::data::{AuxData, HipDataUs, HipDatasUs, SegFrameObjects};
use crate::Shape2d;

pub use apply::{apply_frame_metrics, apply_full_metrics, apply_post_draw, apply_seg_preprocess};
pub use isolate::{isolated, HookKind};
pub use kinds::{FrameMetricHook, FullMetricHook, PostDrawHook, SegPreprocessHook};

/// 指标钩子的返回值: 数值, 以及可选的辅助数据.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HookOutput {
    /// 指标值.
    pub value: f64,

    /// 辅助数据. 会以指标名分组并入开发者指标.
    pub aux: Option<AuxData>,
}

impl HookOutput {
    /// 仅有数值.
    #[inline]
    pub fn value(value: f64) -> Self {
        Self { value, aux: None }
    }

    /// 数值 + 辅助数据.
    #[inline]
    pub fn with_aux(value: f64, aux: AuxData) -> Self {
        Self {
            value,
            aux: Some(aux),
        }
    }

    /// 仅有辅助数据, 数值记为 0.
    #[inline]
    pub fn aux_only(aux: AuxData) -> Self {
        Self::with_aux(0.0, aux)
    }
}

impl From<f64> for HookOutput {
    #[inline]
    fn from(value: f64) -> Self {
        Self::value(value)
    }
}

/// 逐帧指标钩子的上下文.
#[derive(Copy, Clone, Debug)]
pub struct FrameContext<'a> {
    /// 当前帧的分析结果.
    pub hip: &'a HipDataUs,

    /// 当前帧的分割结果. 帧数与分割结果不一致时可能缺失.
    pub seg: Option<&'a SegFrameObjects>,

    /// 配置.
    pub config: &'a Config,
}

/// 全局指标钩子的上下文.
#[derive(Copy, Clone, Debug)]
pub struct StudyContext<'a> {
    /// 整个研究的分析结果.
    pub hip_datas: &'a HipDatasUs,

    /// 逐帧的分割结果.
    pub results: &'a [SegFrameObjects],

    /// 配置.
    pub config: &'a Config,
}

/// 分割预处理钩子的上下文. 钩子可以原地修改 `results`.
#[derive(Debug)]
pub struct PreprocessContext<'a> {
    /// 逐帧的分割结果.
    pub results: &'a mut Vec<SegFrameObjects>,

    /// 配置.
    pub config: &'a Config,

    /// 原图形状 `(h, w)`.
    pub shape: Shape2d,
}

/// 有序的 `(显示名, 钩子)` 列表.
pub struct HookList<H: ?Sized>(Vec<(String, Arc<H>)>);

impl<H: ?Sized> HookList<H> {
    /// 空列表.
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 追加一个钩子.
    pub fn push<S: Into<String>>(&mut self, name: S, hook: Arc<H>) {
        self.0.push((name.into(), hook));
    }

    /// 按注册顺序迭代.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &H)> + '_ {
        self.0.iter().map(|(n, h)| (n.as_str(), h.as_ref()))
    }

    /// 钩子个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<H: ?Sized> Default for HookList<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> Clone for HookList<H> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<H: ?Sized> fmt::Debug for HookList<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(|(n, _)| n)).finish()
    }
}

use super::{FrameContext, HookOutput, PreprocessContext, StudyContext};
use crate::config::Config;
use crate::data::{HipDataUs, SegFrameObjects};
use crate::draw::Overlay;
use crate::error::HookError;

/// 逐帧指标钩子. 结果以注册名追加到该帧的指标中.
pub trait FrameMetricHook: Send + Sync {
    /// 计算指标.
    fn compute(&self, ctx: &FrameContext<'_>) -> Result<HookOutput, HookError>;
}

impl<F> FrameMetricHook for F
where
    F: Fn(&FrameContext<'_>) -> Result<HookOutput, HookError> + Send + Sync,
{
    #[inline]
    fn compute(&self, ctx: &FrameContext<'_>) -> Result<HookOutput, HookError> {
        self(ctx)
    }
}

/// 全局指标钩子. 只关心 `hip_datas` 的钩子忽略上下文中的其它字段即可.
pub trait FullMetricHook: Send + Sync {
    /// 计算指标.
    fn compute(&self, ctx: &StudyContext<'_>) -> Result<HookOutput, HookError>;
}

impl<F> FullMetricHook for F
where
    F: Fn(&StudyContext<'_>) -> Result<HookOutput, HookError> + Send + Sync,
{
    #[inline]
    fn compute(&self, ctx: &StudyContext<'_>) -> Result<HookOutput, HookError> {
        self(ctx)
    }
}

/// 绘制后处理钩子. 在所有内置绘制完成之后调用.
pub trait PostDrawHook: Send + Sync {
    /// 在图层上绘制.
    fn draw(&self, hip: &HipDataUs, overlay: &mut Overlay, config: &Config)
        -> Result<(), HookError>;
}

impl<F> PostDrawHook for F
where
    F: Fn(&HipDataUs, &mut Overlay, &Config) -> Result<(), HookError> + Send + Sync,
{
    #[inline]
    fn draw(&self, hip: &HipDataUs, overlay: &mut Overlay, config: &Config) -> Result<(), HookError> {
        self(hip, overlay, config)
    }
}

/// 分割预处理钩子.
///
/// 返回 `Some` 时分割结果被整体替换; 返回 `None` 时保留 (可能已被原地修改的) 原列表.
pub trait SegPreprocessHook: Send + Sync {
    /// 预处理.
    fn preprocess(
        &self,
        ctx: &mut PreprocessContext<'_>,
    ) -> Result<Option<Vec<SegFrameObjects>>, HookError>;
}

impl<F> SegPreprocessHook for F
where
    F: Fn(&mut PreprocessContext<'_>) -> Result<Option<Vec<SegFrameObjects>>, HookError>
        + Send
        + Sync,
{
    #[inline]
    fn preprocess(
        &self,
        ctx: &mut PreprocessContext<'_>,
    ) -> Result<Option<Vec<SegFrameObjects>>, HookError> {
        self(ctx)
    }
}

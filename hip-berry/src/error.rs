//! 运行时错误.

use crate::config::{HipMode, OperationType};

/// 流程编排中不可恢复的错误. 这类错误会直接返回给调用方, 不会重试.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// 输入类型不受支持 (例如对单帧模式传入多帧, 或传入空帧序列).
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// 当前配置下尚未实现的操作模式.
    #[error("operation type {op:?} is not implemented for {mode:?}")]
    NotImplemented {
        /// 分析模式.
        mode: HipMode,
        /// 操作类型.
        op: OperationType,
    },

    /// 检测函数或标志点转换失败. 流程会在顶层捕获该错误, 记录后返回 `None`.
    #[error("detection failed: {0}")]
    Detection(String),
}

impl PipelineError {
    /// 以任意可显示对象构建检测错误.
    pub fn detection<D: std::fmt::Display>(msg: D) -> Self {
        Self::Detection(msg.to_string())
    }
}

/// 用户钩子运行时错误. 这类错误总是在隔离边界内被捕获并记录.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HookError {
    /// 钩子自行报告的失败.
    #[error("{0}")]
    Failed(String),

    /// 钩子需要的输入在上下文中缺失.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// 钩子 panic. 参数为 panic 信息.
    #[error("hook panicked: {0}")]
    Panicked(String),
}

impl HookError {
    /// 以任意可显示对象构建失败信息.
    pub fn msg<D: std::fmt::Display>(msg: D) -> Self {
        Self::Failed(msg.to_string())
    }
}

/// 多项式拟合错误.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// 采样点不足以做实际拟合工作.
    ///
    /// 第一个参数代表目前已有的点, 第二个参数代表实际拟合需要的最少点数.
    #[error("too few samples: got {0}, need at least {1}")]
    TooFewSamples(usize, usize),

    /// 多项式次数为 0.
    #[error("polynomial degree must be at least 1")]
    ZeroDegree,

    /// 法方程矩阵不可逆.
    #[error("normal matrix is singular")]
    Singular,

    /// 拟合系数中出现了 inf 或 NaN.
    #[error("fitted coefficients are not finite")]
    NotFinite,
}

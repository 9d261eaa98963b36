#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 对婴儿髋关节超声 (2D 单帧, 2D 扫查, 3D 容积) 的逐帧标志点进行指标计算,
//! 过滤坏帧, 选出 Graf 标准平面, 并将 2D 结果聚合为 3D 全局指标.
//!
//! 检测 / 分割模型, DICOM 编解码, 视频编码和 3D 网页渲染都不在本 crate 中.
//! 它们通过 [`pipeline::Detector`], [`handlers::GrafScorer`] 和
//! [`multiframe::Reconstructor`] 等窄接口由调用方注入.
//!
//! # 注意
//!
//! 1. 所有坐标均为 **图像坐标** `(x, y)`: `x` 为列 (水平方向), `y` 为行 (垂直方向).
//!    ndarray 掩码依旧以 `(h, w)` 行优先方式索引, 两者互转时请留意顺序.
//! 2. 3D 模式下, 帧序号即 z 轴坐标. 我们假设 z 较小的一端为前侧 (anterior),
//!    较大的一端为后侧 (posterior). 翻转该假设会无声地颠倒临床含义.
//! 3. 在非期望情况下 (例如构造函数参数非法), 程序会直接 panic.
//!    用户钩子的失败则不会中断流程, 参见 [`hooks`].
//!
//! # 模块概览
//!
//! ### 标志点 -> 指标 ✅
//!
//! alpha 角, 覆盖率, 以及基于多项式拟合的 apex 离群点修正.
//!
//! 实现位于 `hip-berry/src/convert` 和 `hip-berry/src/metrics`.
//!
//! ### 坏帧过滤 ✅
//!
//! 滑动窗口多数筛选 + 逐帧合理性规则. 被拒绝的帧会被替换为空占位帧,
//! 帧序列长度始终不变.
//!
//! 实现位于 `hip-berry/src/handlers/bad_data.rs`.
//!
//! ### Graf 平面选择 ✅
//!
//! 实现位于 `hip-berry/src/handlers/graf.rs`.
//!
//! ### 3D 聚合 ✅
//!
//! 髂骨网格 + 股骨头球面 -> centering ratio 等全局指标.
//!
//! 实现位于 `hip-berry/src/multiframe`.
//!
//! ### 钩子注册 ✅
//!
//! 逐帧指标, 全局指标, 绘制后处理, 分割预处理四类钩子. 每次调用都在隔离边界内执行.
//!
//! 实现位于 `hip-berry/src/hooks`.
//!
//! ### 流程编排 ✅
//!
//! 实现位于 `hip-berry/src/pipeline`.

/// 图像上的整数像素坐标 `(x, y)`.
pub type Coord2d = (i32, i32);

/// 三维空间坐标 `[x, y, z]`. 其中 z 为帧序号方向.
pub type Coord3d = [f64; 3];

/// 图像形状 `(h, w)`.
pub type Shape2d = (usize, usize);

/// 高精度二维坐标 `(x, y)`.
type Coord2dF = (f64, f64);

pub mod config;
pub mod consts;
pub mod convert;
pub mod data;
pub mod dev;
pub mod draw;
pub mod error;
pub mod fitting;
pub mod handlers;
pub mod hooks;
pub mod metrics;
pub mod multiframe;
pub mod pipeline;
pub mod prelude;

pub use config::{BatchConfig, Config, HipConfig, HipMode, OperationType, VisualsConfig};
pub use data::{
    CustomMetric, FemoralHeadSphere, HipDataUs, HipDatasUs, HipLabel, IliumMesh, LandmarksUs,
    Metric2D, Metric3D, MetricUs, SegFrameObjects, SegObject, Side,
};
pub use draw::Overlay;
pub use error::{HookError, PipelineError};

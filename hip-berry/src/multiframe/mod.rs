//! 多帧 (3D) 聚合.
//!
//! 由逐帧的分割结果重建髂骨网格与股骨头球面, 再计算全研究指标.
//! 重建本身通过 [`Reconstructor`] 注入; [`MaskStackReconstructor`] 是不依赖外部几何库的内置实现.

mod metrics_3d;
mod reconstruct;

use crate::data::{FemoralHeadSphere, IliumMesh};
use crate::metrics::CenteringPoints;

pub use metrics_3d::get_3d_metrics;
pub use reconstruct::{MaskStackReconstructor, Reconstruction, Reconstructor};

/// 交给外部 3D 渲染器的可视化数据.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual3d {
    /// 髂骨网格.
    pub mesh: IliumMesh,

    /// 股骨头球面.
    pub sphere: FemoralHeadSphere,

    /// 居中比参考点.
    pub centering_points: CenteringPoints,
}

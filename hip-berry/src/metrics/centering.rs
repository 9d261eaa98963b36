//! 股骨头居中比 (centering ratio).

use super::round_to;
use crate::data::{FemoralHeadSphere, HipDatasUs, IliumMesh};
use crate::Coord3d;

/// 居中比的三个参考点: `(股骨头球心, 最大 z 点, 最小 z 点)`.
///
/// 最大 / 最小 z 点与球心共享 `x, y`, 只在 z 上取网格顶点的极值.
pub type CenteringPoints = (Option<Coord3d>, Option<Coord3d>, Option<Coord3d>);

const NO_POINTS: CenteringPoints = (None, None, None);

/// 计算居中比: `(球心 z - graf_frame) / (max_z - min_z)`, 保留两位小数.
///
/// 约定 min-z 为前侧, max-z 为后侧.
/// 没有 Graf 帧时返回 `(0, (None, None, None))`, 调用方应视为 "指标不可用".
/// 网格为空, 球面没有采样点, 或网格 z 范围为 0 时同样返回哨兵值.
/// 可用 [`centering_available`] 区分哨兵值与真实的 0.
pub fn get_centering_ratio(
    mesh: &IliumMesh,
    sphere: &FemoralHeadSphere,
    hip_datas: &HipDatasUs,
) -> (f64, CenteringPoints) {
    let Some(graf_frame) = hip_datas.graf_frame else {
        return (0.0, NO_POINTS);
    };
    let Some((min_z, max_z)) = mesh.z_range() else {
        log::error!("Ilium mesh has no vertices, centering ratio unavailable.");
        return (0.0, NO_POINTS);
    };
    let Some(center) = sphere.center() else {
        log::error!("Femoral head sphere is empty, centering ratio unavailable.");
        return (0.0, NO_POINTS);
    };

    let extent = max_z - min_z;
    if extent == 0.0 {
        log::error!("Ilium mesh is flat along z, centering ratio unavailable.");
        return (0.0, NO_POINTS);
    }

    let max_z_vert = [center[0], center[1], max_z];
    let min_z_vert = [center[0], center[1], min_z];
    let points = (Some(center), Some(max_z_vert), Some(min_z_vert));
    let ratio = round_to((center[2] - graf_frame as f64) / extent, 2);
    (ratio, points)
}

/// `get_centering_ratio` 的结果是否为真实的居中比. 哨兵值不带任何参考点.
#[inline]
pub fn centering_available(points: &CenteringPoints) -> bool {
    points.0.is_some()
}

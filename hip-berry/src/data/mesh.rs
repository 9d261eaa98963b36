use ndarray::{Array2, Axis};

use crate::Coord3d;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 髂骨表面网格. 顶点形状为 `(n, 3)`, 列依次为 `x, y, z`; z 即帧序号方向.
///
/// `triangles` 可以为空, 此时网格退化为点云, 不影响 z 范围相关的计算.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IliumMesh {
    vertices: Array2<f64>,
    triangles: Vec<[usize; 3]>,
}

impl IliumMesh {
    /// 构建网格. `vertices` 必须为 `(n, 3)`, 三角形索引必须在顶点范围内, 否则 panic.
    pub fn new(vertices: Array2<f64>, triangles: Vec<[usize; 3]>) -> Self {
        assert_eq!(vertices.ncols(), 3, "顶点必须是 (n, 3) 形状");
        let n = vertices.nrows();
        assert!(
            triangles.iter().flatten().all(|&i| i < n),
            "三角形索引越界"
        );
        Self {
            vertices,
            triangles,
        }
    }

    /// 由顶点列表构建点云网格.
    pub fn from_points(points: &[Coord3d]) -> Self {
        let vertices = Array2::from_shape_fn((points.len(), 3), |(r, c)| points[r][c]);
        Self::new(vertices, vec![])
    }

    /// 顶点.
    #[inline]
    pub fn vertices(&self) -> &Array2<f64> {
        &self.vertices
    }

    /// 三角形.
    #[inline]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// 顶点个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.nrows()
    }

    /// 是否没有任何顶点.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 顶点 z 坐标的 `(min, max)`. 没有顶点时返回 `None`.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let zs = self.vertices.index_axis(Axis(1), 2);
        zs.iter().copied().fold(None, |acc, z| match acc {
            None => Some((z, z)),
            Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
        })
    }
}

/// 股骨头球面拟合结果: 三组平行的表面采样点坐标 `(xs, ys, zs)`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FemoralHeadSphere {
    /// x 坐标.
    pub xs: Vec<f64>,

    /// y 坐标.
    pub ys: Vec<f64>,

    /// z 坐标.
    pub zs: Vec<f64>,
}

impl FemoralHeadSphere {
    /// 构建球面采样. 三组坐标长度必须一致, 否则 panic.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, zs: Vec<f64>) -> Self {
        assert!(xs.len() == ys.len() && ys.len() == zs.len(), "坐标长度必须一致");
        Self { xs, ys, zs }
    }

    /// 采样点个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// 是否没有采样点.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// 各轴均值, 即球心估计. 没有采样点时返回 `None`.
    pub fn center(&self) -> Option<Coord3d> {
        if self.is_empty() {
            return None;
        }
        let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        Some([mean(&self.xs), mean(&self.ys), mean(&self.zs)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_z_range() {
        let mesh = IliumMesh::from_points(&[[0.0, 0.0, 3.0], [1.0, 2.0, -1.0], [5.0, 5.0, 7.5]]);
        assert_eq!(mesh.len(), 3);
        assert_eq!(mesh.z_range(), Some((-1.0, 7.5)));

        let empty = IliumMesh::from_points(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.z_range(), None);
    }

    #[test]
    #[should_panic]
    fn test_mesh_bad_triangle() {
        let v = Array2::zeros((2, 3));
        IliumMesh::new(v, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_sphere_center() {
        let s = FemoralHeadSphere::new(vec![0.0, 2.0], vec![1.0, 3.0], vec![4.0, 6.0]);
        assert_eq!(s.center(), Some([1.0, 2.0, 5.0]));
        assert_eq!(FemoralHeadSphere::default().center(), None);
    }
}

use crate::config::Config;
use crate::data::{FemoralHeadSphere, HipDatasUs, HipLabel, IliumMesh, SegFrameObjects};
use crate::Coord3d;

/// 3D 重建结果.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconstruction {
    /// 髂骨网格.
    pub mesh: IliumMesh,

    /// 股骨头球面.
    pub sphere: FemoralHeadSphere,

    /// 可选的覆盖角 `[post, graf, ant]`. 由重建方预先计算.
    pub aca: Option<[f64; 3]>,
}

/// 由分割结果重建 3D 几何. 无法重建时返回 `None`.
pub trait Reconstructor {
    /// 重建.
    fn reconstruct(
        &self,
        hip_datas: &HipDatasUs,
        results: &[SegFrameObjects],
        config: &Config,
    ) -> Option<Reconstruction>;
}

impl<F> Reconstructor for F
where
    F: Fn(&HipDatasUs, &[SegFrameObjects], &Config) -> Option<Reconstruction>,
{
    #[inline]
    fn reconstruct(
        &self,
        hip_datas: &HipDatasUs,
        results: &[SegFrameObjects],
        config: &Config,
    ) -> Option<Reconstruction> {
        self(hip_datas, results, config)
    }
}

/// 把保留帧的分割轮廓按帧序号 (z) 堆叠起来.
///
/// 髂骨轮廓点成为网格顶点 (不做三角化), 股骨头轮廓点成为球面采样点.
/// 没有任何髂骨轮廓时返回 `None`.
#[derive(Copy, Clone, Debug, Default)]
pub struct MaskStackReconstructor;

impl Reconstructor for MaskStackReconstructor {
    fn reconstruct(
        &self,
        hip_datas: &HipDatasUs,
        results: &[SegFrameObjects],
        _: &Config,
    ) -> Option<Reconstruction> {
        let mut ilium: Vec<Coord3d> = vec![];
        let mut sphere = FemoralHeadSphere::default();

        for z in hip_datas.kept_frames() {
            let Some(seg) = results.get(z) else {
                continue;
            };
            for (x, y) in seg.of_class(HipLabel::Ilium).flat_map(|o| o.boundary()) {
                ilium.push([x as f64, y as f64, z as f64]);
            }
            for (x, y) in seg.of_class(HipLabel::FemoralHead).flat_map(|o| o.boundary()) {
                sphere.xs.push(x as f64);
                sphere.ys.push(y as f64);
                sphere.zs.push(z as f64);
            }
        }

        if ilium.is_empty() {
            log::error!("No ilium contour in kept frames, 3D reconstruction skipped.");
            return None;
        }
        Some(Reconstruction {
            mesh: IliumMesh::from_points(&ilium),
            sphere,
            aca: None,
        })
    }
}

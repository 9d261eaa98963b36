use crate::Coord2d;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 单帧超声图像上的六个解剖标志点. 任一点都可能缺失.
///
/// 该结构一旦为某帧计算完成就不再逐字段修改. 离群点修正时整体替换
/// (参见 [`LandmarksUs::with_apex`]).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LandmarksUs {
    /// 髂骨线左端点.
    pub left: Option<Coord2d>,

    /// 骨性髋臼顶外侧端点.
    pub right: Option<Coord2d>,

    /// 骨缘转折点 (apex). 髂骨线与骨顶线在此相交.
    pub apex: Option<Coord2d>,

    /// 股骨头直径的远端点 (原始标注中的 `D`).
    pub point_big_d: Option<Coord2d>,

    /// 股骨头直径的近端点 (原始标注中的 `d`).
    pub point_d: Option<Coord2d>,

    /// 髂骨线延长线与股骨头直径的交点.
    pub mid_cov_point: Option<Coord2d>,
}

impl LandmarksUs {
    /// 返回 apex 被替换为 `apex` 的新标志点集, 其余点保持不变.
    #[inline]
    pub fn with_apex(self, apex: Coord2d) -> Self {
        Self {
            apex: Some(apex),
            ..self
        }
    }

    /// 已存在的标志点个数 (0 ~ 6).
    pub fn count(&self) -> usize {
        self.points().iter().filter(|p| p.is_some()).count()
    }

    /// 按固定顺序 `left, right, apex, D, d, mid_cov_point` 列出全部标志点.
    #[inline]
    pub fn points(&self) -> [Option<Coord2d>; 6] {
        [
            self.left,
            self.right,
            self.apex,
            self.point_big_d,
            self.point_d,
            self.mid_cov_point,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::LandmarksUs;

    #[test]
    fn test_with_apex_replaces_only_apex() {
        let lm = LandmarksUs {
            left: Some((1, 2)),
            right: Some((3, 4)),
            apex: Some((5, 6)),
            ..Default::default()
        };
        let new = lm.with_apex((7, 8));
        assert_eq!(new.apex, Some((7, 8)));
        assert_eq!(new.left, lm.left);
        assert_eq!(new.right, lm.right);
        assert_eq!(new.count(), 3);
        // 原值不受影响.
        assert_eq!(lm.apex, Some((5, 6)));
    }
}

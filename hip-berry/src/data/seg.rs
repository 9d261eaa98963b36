use image::RgbImage;
use ndarray::Array2;

use super::LandmarksUs;
use crate::{Coord2d, Shape2d};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 分割目标的解剖类别.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HipLabel {
    /// 髂骨.
    Ilium,

    /// 股骨头.
    FemoralHead,

    /// 坐骨.
    OsIchium,

    /// 盂唇.
    Labrum,
}

impl HipLabel {
    /// 类别名称.
    pub const fn name(&self) -> &'static str {
        match self {
            HipLabel::Ilium => "ilium",
            HipLabel::FemoralHead => "femoral_head",
            HipLabel::OsIchium => "os_ichium",
            HipLabel::Labrum => "labrum",
        }
    }
}

/// 单个分割目标.
///
/// `mask` 以 `(h, w)` 行优先索引, 非 0 即前景. `points` 是可选的轮廓点 `(x, y)`,
/// 当没有掩码时, 下游会退而使用这些点.
#[derive(Clone, Debug, PartialEq)]
pub struct SegObject {
    /// 类别.
    pub class: HipLabel,

    /// 掩码.
    pub mask: Option<Array2<u8>>,

    /// 轮廓点.
    pub points: Vec<Coord2d>,

    /// 检测置信度.
    pub confidence: f32,
}

impl SegObject {
    /// 以掩码构建分割目标.
    pub fn from_mask(class: HipLabel, mask: Array2<u8>) -> Self {
        Self {
            class,
            mask: Some(mask),
            points: vec![],
            confidence: 1.0,
        }
    }

    /// 以轮廓点构建分割目标.
    pub fn from_points(class: HipLabel, points: Vec<Coord2d>) -> Self {
        Self {
            class,
            mask: None,
            points,
            confidence: 1.0,
        }
    }

    /// 掩码的前景像素个数. 没有掩码时返回 0.
    pub fn area(&self) -> usize {
        self.mask
            .as_ref()
            .map_or(0, |m| m.iter().filter(|&&p| p != 0).count())
    }

    /// 掩码边缘像素 (4-邻域中存在背景或越界) 的 `(x, y)` 坐标;
    /// 没有掩码时返回 `self.points` 的拷贝.
    pub fn boundary(&self) -> Vec<Coord2d> {
        let Some(mask) = self.mask.as_ref() else {
            return self.points.clone();
        };
        let (h, w) = mask.dim();
        let is_fg = |r: usize, c: usize| r < h && c < w && mask[(r, c)] != 0;

        mask.indexed_iter()
            .filter(|&(_, &p)| p != 0)
            .filter(|&((r, c), _)| {
                neighbour4((r, c))
                    .into_iter()
                    .any(|(nr, nc)| !is_fg(nr, nc))
            })
            .map(|((r, c), _)| (c as i32, r as i32))
            .collect()
    }
}

/// 获得 `(h, w)` 的 4-邻居索引. 不检查越界 (越界索引会被 `wrapping_sub` 推到极大值).
#[inline]
fn neighbour4((h, w): (usize, usize)) -> [(usize, usize); 4] {
    [
        (h.wrapping_sub(1), w),
        (h.saturating_add(1), w),
        (h, w.wrapping_sub(1)),
        (h, w.saturating_add(1)),
    ]
}

/// 单帧的分割结果: 原图, 分割目标, 以及上游给出的标志点和拒绝原因.
///
/// 这是检测函数 ([`crate::pipeline::Detector`]) 的输出单元.
#[derive(Clone, Debug)]
pub struct SegFrameObjects {
    /// 原始帧图像.
    pub img: RgbImage,

    /// 分割目标.
    pub objects: Vec<SegObject>,

    /// 上游从分割结果中提取出的标志点. 没有检测到任何东西时为 `None`.
    pub landmarks: Option<LandmarksUs>,

    /// 上游给出的拒绝原因. 为空代表上游没有异议.
    pub rejection_reasons: Vec<String>,
}

impl SegFrameObjects {
    /// 没有任何分割目标的帧.
    pub fn empty(img: RgbImage) -> Self {
        Self {
            img,
            objects: vec![],
            landmarks: None,
            rejection_reasons: vec![],
        }
    }

    /// 分割目标个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// 是否没有分割目标.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// 图像形状 `(h, w)`.
    #[inline]
    pub fn shape(&self) -> Shape2d {
        (self.img.height() as usize, self.img.width() as usize)
    }

    /// 迭代指定类别的分割目标.
    pub fn of_class(&self, class: HipLabel) -> impl Iterator<Item = &SegObject> + '_ {
        self.objects.iter().filter(move |o| o.class == class)
    }
}

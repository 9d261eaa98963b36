//! 多项式曲线.

// ref: https://blog.csdn.net/u012494154/article/details/112519550

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1};

use crate::error::FitError;

/// 拟合得到的多项式.
///
/// 内部以归一化后的自变量 `u = (t - shift) / scale` 表示, 以避免帧序号较大时
/// Vandermonde 矩阵病态. 对调用方而言这是透明的, 直接用原始 `t` 求值即可.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    coeffs: Array1<f64>,
    shift: f64,
    scale: f64,
}

impl Polynomial {
    /// 在 `t` 处求值 (Horner 法).
    pub fn eval(&self, t: f64) -> f64 {
        let u = (t - self.shift) / self.scale;
        self.coeffs.iter().rev().fold(0.0, |acc, &cur| acc * u + cur)
    }

    /// 多项式次数.
    #[inline]
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }
}

pub(crate) struct PolyImp<'a> {
    x: ArrayView1<'a, f64>,
    y: ArrayView1<'a, f64>,
    degree: u32,
}

impl<'a> PolyImp<'a> {
    /// `degree` 是多项式次数.
    pub fn new(x: ArrayView1<'a, f64>, y: ArrayView1<'a, f64>, degree: u32) -> Self {
        assert_eq!(x.len(), y.len(), "x 值和 y 值必须一一对应");
        Self { x, y, degree }
    }

    /// 解法方程 `(V^T V) theta = V^T y`.
    pub fn fit(&self) -> Result<Polynomial, FitError> {
        if self.degree == 0 {
            return Err(FitError::ZeroDegree);
        }
        let n = self.degree as usize + 1;
        if self.x.len() < n {
            return Err(FitError::TooFewSamples(self.x.len(), n));
        }

        let (shift, scale) = self.normalization();
        let v_mat = self.vandermonde(shift, scale);
        let normal = v_mat.t().dot(&v_mat);
        let rhs = v_mat.t().dot(&self.y);

        let normal = DMatrix::from_fn(n, n, |r, c| normal[(r, c)]);
        let rhs = DVector::from_fn(n, |r, _| rhs[r]);
        let theta = normal.try_inverse().ok_or(FitError::Singular)? * rhs;

        if !theta.iter().all(|c| c.is_finite()) {
            return Err(FitError::NotFinite);
        }
        debug_assert_eq!(theta.len(), n);

        Ok(Polynomial {
            coeffs: theta.iter().copied().collect(),
            shift,
            scale,
        })
    }

    fn vandermonde(&self, shift: f64, scale: f64) -> Array2<f64> {
        // shape: (m, n); m = x.len(), n = self.degree + 1
        Array2::<f64>::from_shape_fn((self.x.len(), self.degree as usize + 1), |(m, n)| {
            ((self.x[m] - shift) / scale).powi(n as i32)
        })
    }

    /// 把自变量平移缩放到 `[-1, 1]`.
    fn normalization(&self) -> (f64, f64) {
        let (min_val, max_val) = Self::min_max(self.x);
        let half = (max_val - min_val) / 2.0;
        let scale = if half > 0.0 { half } else { 1.0 };
        ((min_val + max_val) / 2.0, scale)
    }

    fn min_max(arr: ArrayView1<f64>) -> (f64, f64) {
        // !arr.is_empty()
        let (mut min_val, mut max_val) = (f64::MAX, f64::MIN);
        for v in arr.iter().copied() {
            if v < min_val {
                min_val = v;
            }
            if v > max_val {
                max_val = v;
            }
        }
        (min_val, max_val)
    }
}

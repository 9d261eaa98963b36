//! 曲线拟合.
//!
//! 给定一系列点 `(t, v)`, 该模块可以拟合出一条多项式曲线 `v = p(t)`.
//! apex 时间序列的离群点修正依赖于此.

use ndarray::ArrayView1;

use crate::error::FitError;

mod polynomial;

pub use polynomial::Polynomial;

/// 基于最小二乘法拟合 `degree` 次多项式.
///
/// `x` 是自变量数组, `y` 是对应函数值, `degree` 是多项式次数, 为 0 时返回 [`FitError::ZeroDegree`].
/// 至少需要 `degree + 1` 个点. 法方程矩阵奇异或结果非有限值时返回错误, 不会 panic.
pub fn polyfit<'a>(
    x: ArrayView1<'a, f64>,
    y: ArrayView1<'a, f64>,
    degree: u32,
) -> Result<Polynomial, FitError> {
    polynomial::PolyImp::new(x, y, degree).fit()
}

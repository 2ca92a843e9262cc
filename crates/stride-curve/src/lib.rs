//! # Stride Curve - 曲线拟合适配层
//!
//! 为运动轨迹提供"给定 (时间, 值) 采样 → 可在任意时刻求值的连续曲线"能力。
//!
//! ## 包含模块
//!
//! - `spline` - 标量三次 Hermite 样条（每个关节通道一条）
//! - `pose` - 位姿样条（位置三次样条 + 姿态球面插值）
//! - `error` - 拟合错误类型
//!
//! ## 约定
//!
//! - 至少需要 1 个采样点；单采样点得到"保持常值"的退化曲线
//! - 采样时间必须非递减且有限
//! - 超出首末采样时间的求值保持端点值（不外推）
//!
//! ```rust
//! use stride_curve::{Curve, ScalarSpline};
//!
//! let spline = ScalarSpline::fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.5]).unwrap();
//! assert_eq!(spline.evaluate(1.0), 1.0);
//! assert_eq!(spline.evaluate(5.0), 0.5);
//! ```

mod error;
pub mod pose;
pub mod spline;

pub use error::CurveError;
pub use pose::{Pose, PoseSpline};
pub use spline::ScalarSpline;

/// 曲线适配器
///
/// 运动轨迹只通过此 trait 使用曲线，具体插值算法可替换。
/// 实现必须是确定性的：相同输入得到相同曲线。
pub trait Curve: Clone + Send + Sync + 'static {
    /// 曲线值类型（标量、位姿等）
    type Value: Clone + Send + Sync + 'static;

    /// 从采样点拟合曲线
    ///
    /// # 错误
    ///
    /// 采样为空、长度不一致、时间递减或出现非有限数时返回 [`CurveError`]。
    fn fit(times: &[f64], values: &[Self::Value]) -> Result<Self, CurveError>;

    /// 在时刻 `time` 求值
    fn evaluate(&self, time: f64) -> Self::Value;
}

/// 校验采样时间序列
///
/// 检查非空、长度一致、有限且非递减。各 `Curve` 实现在拟合前调用。
pub fn validate_samples(times: &[f64], value_count: usize) -> Result<(), CurveError> {
    if times.is_empty() {
        return Err(CurveError::Empty);
    }
    if times.len() != value_count {
        return Err(CurveError::LengthMismatch {
            times: times.len(),
            values: value_count,
        });
    }
    if let Some(index) = times.iter().position(|t| !t.is_finite()) {
        return Err(CurveError::NonFinite { index });
    }
    if let Some(index) = times.windows(2).position(|w| w[1] < w[0]) {
        return Err(CurveError::NonMonotonicTime { index: index + 1 });
    }
    Ok(())
}

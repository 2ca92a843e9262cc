//! 标量三次 Hermite 样条
//!
//! 每段使用三次多项式插值（归一化时间 `s ∈ [0, 1]`）：
//! ```text
//! p(s) = a0 + a1*s + a2*s² + a3*s³
//! ```
//!
//! # 切线选择
//!
//! - 内部节点：相邻两段斜率的平均（非均匀 Catmull-Rom）
//! - 首末节点：速度为 0（从静止开始、到静止结束）
//! - 零时长段（重复时间）：视为瞬时跳变，斜率记为 0
//!
//! # 特性
//!
//! - **插值**: 曲线精确经过每个采样点
//! - **C¹ 连续**: 节点处速度连续
//! - **退化情况**: 单个采样点得到常值曲线

use crate::{Curve, CurveError, validate_samples};

/// 小于此时长的段视为瞬时跳变
const MIN_SEGMENT_DURATION: f64 = 1e-12;

/// 三次样条系数
///
/// 表示 `p(s) = a0 + a1*s + a2*s² + a3*s³`
#[derive(Debug, Clone, Copy, PartialEq)]
struct CubicCoeffs {
    a0: f64,
    a1: f64,
    a2: f64,
    a3: f64,
}

impl CubicCoeffs {
    /// 给定边界条件 `p(0) = p0`, `v(0) = v0`, `p(1) = p1`, `v(1) = v1` 求系数
    ///
    /// 速度是对归一化时间的导数（物理速度乘以段时长）。
    fn hermite(p0: f64, v0: f64, p1: f64, v1: f64) -> Self {
        // a2 + a3 = p1 - p0 - v0
        // 2*a2 + 3*a3 = v1 - v0
        CubicCoeffs {
            a0: p0,
            a1: v0,
            a2: 3.0 * (p1 - p0) - 2.0 * v0 - v1,
            a3: -2.0 * (p1 - p0) + v0 + v1,
        }
    }

    /// 在归一化时间 s ∈ [0, 1] 处计算位置
    fn position(&self, s: f64) -> f64 {
        self.a0 + s * (self.a1 + s * (self.a2 + s * self.a3))
    }
}

/// 标量三次样条
///
/// 每个关节、每个控制层级各一条。
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSpline {
    /// 节点时间
    knots: Vec<f64>,

    /// 节点值（用于端点保持和零时长段）
    values: Vec<f64>,

    /// 每段系数，长度为 `knots.len() - 1`
    segments: Vec<CubicCoeffs>,
}

impl ScalarSpline {
    /// 采样点数
    pub fn len(&self) -> usize {
        self.knots.len()
    }

    /// 是否没有采样点（拟合成功的样条总是非空）
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// 节点切线（物理速度）
    fn tangents(knots: &[f64], values: &[f64]) -> Vec<f64> {
        let n = knots.len();
        let slopes: Vec<f64> = (0..n.saturating_sub(1))
            .map(|k| {
                let h = knots[k + 1] - knots[k];
                if h > MIN_SEGMENT_DURATION {
                    (values[k + 1] - values[k]) / h
                } else {
                    0.0
                }
            })
            .collect();

        let mut tangents = vec![0.0; n];
        for i in 1..n.saturating_sub(1) {
            tangents[i] = 0.5 * (slopes[i - 1] + slopes[i]);
        }
        tangents
    }
}

impl Curve for ScalarSpline {
    type Value = f64;

    fn fit(times: &[f64], values: &[f64]) -> Result<Self, CurveError> {
        validate_samples(times, values.len())?;
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(CurveError::NonFinite { index });
        }

        let tangents = Self::tangents(times, values);
        let segments = times
            .windows(2)
            .enumerate()
            .map(|(k, w)| {
                let h = w[1] - w[0];
                CubicCoeffs::hermite(values[k], tangents[k] * h, values[k + 1], tangents[k + 1] * h)
            })
            .collect();

        Ok(ScalarSpline {
            knots: times.to_vec(),
            values: values.to_vec(),
            segments,
        })
    }

    /// NaN 时刻得到 NaN
    fn evaluate(&self, time: f64) -> f64 {
        if time.is_nan() {
            return f64::NAN;
        }
        let last = self.knots.len() - 1;
        if time <= self.knots[0] {
            return self.values[0];
        }
        if time >= self.knots[last] {
            return self.values[last];
        }

        // 找到满足 knots[k] <= time < knots[k+1] 的段
        let k = self.knots.partition_point(|&t| t <= time).saturating_sub(1);
        let h = self.knots[k + 1] - self.knots[k];
        if h <= MIN_SEGMENT_DURATION {
            return self.values[k + 1];
        }
        self.segments[k].position((time - self.knots[k]) / h)
    }
}

//! 位姿样条
//!
//! 平移三个分量各用一条 [`ScalarSpline`]，姿态在相邻节点间做球面线性插值（slerp）。

use crate::{Curve, CurveError, ScalarSpline, validate_samples};
use nalgebra::{Isometry3, Translation3, UnitQuaternion};

/// 刚体位姿（位置 + 姿态）
pub type Pose = Isometry3<f64>;

/// 位姿样条
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSpline {
    knots: Vec<f64>,
    x: ScalarSpline,
    y: ScalarSpline,
    z: ScalarSpline,
    orientations: Vec<UnitQuaternion<f64>>,
}

impl PoseSpline {
    /// 在 `time` 处插值姿态
    fn orientation_at(&self, time: f64) -> UnitQuaternion<f64> {
        let last = self.knots.len() - 1;
        // NaN 时刻保持首个姿态，位置分量为 NaN
        if time.is_nan() || time <= self.knots[0] {
            return self.orientations[0];
        }
        if time >= self.knots[last] {
            return self.orientations[last];
        }

        let k = self.knots.partition_point(|&t| t <= time).saturating_sub(1);
        let h = self.knots[k + 1] - self.knots[k];
        if h <= 0.0 {
            return self.orientations[k + 1];
        }
        let s = (time - self.knots[k]) / h;
        let (q0, q1) = (&self.orientations[k], &self.orientations[k + 1]);
        // 两姿态几乎重合时 try_slerp 返回 None
        q0.try_slerp(q1, s, f64::EPSILON).unwrap_or(*q1)
    }
}

impl Curve for PoseSpline {
    type Value = Pose;

    fn fit(times: &[f64], values: &[Pose]) -> Result<Self, CurveError> {
        validate_samples(times, values.len())?;

        let axis = |i: usize| -> Vec<f64> {
            values.iter().map(|p| p.translation.vector[i]).collect()
        };
        let x = ScalarSpline::fit(times, &axis(0))?;
        let y = ScalarSpline::fit(times, &axis(1))?;
        let z = ScalarSpline::fit(times, &axis(2))?;

        let orientations: Vec<UnitQuaternion<f64>> = values.iter().map(|p| p.rotation).collect();
        if let Some(index) = orientations
            .iter()
            .position(|q| q.coords.iter().any(|c| !c.is_finite()))
        {
            return Err(CurveError::NonFinite { index });
        }

        Ok(PoseSpline {
            knots: times.to_vec(),
            x,
            y,
            z,
            orientations,
        })
    }

    fn evaluate(&self, time: f64) -> Pose {
        Isometry3::from_parts(
            Translation3::new(
                self.x.evaluate(time),
                self.y.evaluate(time),
                self.z.evaluate(time),
            ),
            self.orientation_at(time),
        )
    }
}

//! 集成测试公共工具
//!
//! 提供可控的曲线适配器，用于构造"拟合很慢"和"拟合失败"的场景。

#![allow(dead_code)]

use std::thread;
use std::time::Duration;
use stride_curve::{Curve, CurveError, ScalarSpline};
use stride_motion::{JointTrajectory, Limb};

/// 单个通道的模拟拟合耗时
pub const SLOW_FIT_DELAY: Duration = Duration::from_millis(150);

/// 足够长的等待上限
pub const WAIT: Duration = Duration::from_secs(5);

/// 每个通道拟合前睡眠的样条
#[derive(Debug, Clone)]
pub struct SlowSpline(ScalarSpline);

impl Curve for SlowSpline {
    type Value = f64;

    fn fit(times: &[f64], values: &[f64]) -> Result<Self, CurveError> {
        thread::sleep(SLOW_FIT_DELAY);
        ScalarSpline::fit(times, values).map(SlowSpline)
    }

    fn evaluate(&self, time: f64) -> f64 {
        self.0.evaluate(time)
    }
}

/// 总是拟合失败的曲线
#[derive(Debug, Clone)]
pub struct FailingCurve;

impl Curve for FailingCurve {
    type Value = f64;

    fn fit(_times: &[f64], _values: &[f64]) -> Result<Self, CurveError> {
        Err(CurveError::NonMonotonicTime { index: 1 })
    }

    fn evaluate(&self, _time: f64) -> f64 {
        0.0
    }
}

/// 三关节位置航点 (times, joints)
pub fn three_joint_waypoints() -> (Vec<f64>, Vec<Vec<f64>>) {
    (
        vec![0.0, 1.0, 2.0],
        vec![
            vec![0.0, 0.4, 0.8],
            vec![1.2, 1.0, 0.9],
            vec![-1.6, -1.3, -1.6],
        ],
    )
}

/// 三关节位置轨迹，使用默认样条
pub fn three_joint_trajectory(limb: Limb) -> JointTrajectory {
    let (times, joints) = three_joint_waypoints();
    JointTrajectory::builder(limb)
        .position(times, joints)
        .build()
        .unwrap()
}

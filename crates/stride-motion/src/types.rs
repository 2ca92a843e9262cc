//! 基础类型：腿、位姿、关节向量

use nalgebra::{DVector, Vector6};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use stride_curve::Pose;

/// 机身速度（线速度 + 角速度）
pub type Twist = Vector6<f64>;

/// 关节位置（弧度），长度为该腿关节数
pub type JointPositions = DVector<f64>;
/// 关节速度
pub type JointVelocities = DVector<f64>;
/// 关节加速度
pub type JointAccelerations = DVector<f64>;
/// 关节力矩
pub type JointEfforts = DVector<f64>;

/// 腿（四足机器人）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limb {
    /// 左前腿
    LeftFore = 0,
    /// 右前腿
    RightFore = 1,
    /// 左后腿
    LeftHind = 2,
    /// 右后腿
    RightHind = 3,
}

impl Limb {
    /// 所有腿
    pub const ALL: [Limb; 4] = [
        Limb::LeftFore,
        Limb::RightFore,
        Limb::LeftHind,
        Limb::RightHind,
    ];

    /// 获取腿索引（0-3）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 获取腿名称
    pub const fn name(self) -> &'static str {
        match self {
            Limb::LeftFore => "left_fore",
            Limb::RightFore => "right_fore",
            Limb::LeftHind => "left_hind",
            Limb::RightHind => "right_hind",
        }
    }
}

impl fmt::Display for Limb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

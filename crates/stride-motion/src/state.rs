//! 机器人状态适配器
//!
//! 起点拼接需要机器人"此刻"的状态。状态的来源（仿真、硬件驱动、日志回放）
//! 不在本 crate 范围内，只通过 [`RobotStateAdapter`] 接口获取。

use crate::types::{JointEfforts, JointPositions, Limb, Pose};

/// 机器人状态适配器
pub trait RobotStateAdapter {
    /// 当前机身位姿（不可用时返回 None）
    fn base_pose(&self) -> Option<Pose>;

    /// 某条腿的当前关节位置（不可用时返回 None）
    fn joint_positions(&self, limb: Limb) -> Option<JointPositions>;

    /// 某条腿的当前关节力矩（不可用时返回 None）
    fn joint_efforts(&self, limb: Limb) -> Option<JointEfforts>;
}

/// 内存中的机器人状态快照
///
/// `Default` 为空快照：机身位姿与所有关节状态均未知。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotState {
    base_pose: Option<Pose>,
    positions: [Option<JointPositions>; 4],
    efforts: [Option<JointEfforts>; 4],
}

impl RobotState {
    /// 创建状态快照（所有腿的关节状态均未知）
    pub fn new(base_pose: Pose) -> Self {
        Self {
            base_pose: Some(base_pose),
            ..Default::default()
        }
    }

    /// 设置机身位姿
    pub fn set_base_pose(&mut self, pose: Pose) {
        self.base_pose = Some(pose);
    }

    /// 设置某条腿的关节位置
    pub fn set_joint_positions(&mut self, limb: Limb, positions: JointPositions) {
        self.positions[limb.index()] = Some(positions);
    }

    /// 设置某条腿的关节力矩
    pub fn set_joint_efforts(&mut self, limb: Limb, efforts: JointEfforts) {
        self.efforts[limb.index()] = Some(efforts);
    }
}

impl RobotStateAdapter for RobotState {
    fn base_pose(&self) -> Option<Pose> {
        self.base_pose
    }

    fn joint_positions(&self, limb: Limb) -> Option<JointPositions> {
        self.positions[limb.index()].clone()
    }

    fn joint_efforts(&self, limb: Limb) -> Option<JointEfforts> {
        self.efforts[limb.index()].clone()
    }
}

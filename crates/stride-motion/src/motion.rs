//! 运动基元接口
//!
//! 步态序列层只通过两个能力接口使用运动：
//!
//! - [`BaseMotion`] - 机身运动
//! - [`LegMotion`] - 腿部运动
//!
//! 具体实现是扁平的一组类型（目前为 `BaseTrajectory` / `JointTrajectory`），
//! 通过 `clone_boxed()` 得到完全独立的副本。
//!
//! # 能力矩阵
//!
//! | 运动类型         | 起点拼接          | 求值              |
//! |------------------|-------------------|-------------------|
//! | BaseTrajectory   | Position          | Position          |
//! | JointTrajectory  | Position, Effort  | Position, Effort  |
//!
//! 关节轨迹的 Velocity / Acceleration 拼接和求值、机身轨迹的速度和加速度求值
//! 始终返回 `NotImplemented`。
//!
//! # 错误优先级
//!
//! `NotImplemented` > `LevelNotConfigured` > `NotComputed`
//!
//! # 调用顺序
//!
//! ```text
//! 构造 → update_start_*() → compute() → wait_until_computed() / is_computed()
//!      → evaluate_*(t)，t ∈ [0, duration]
//! ```

use crate::control::{ControlLevel, ControlSetup};
use crate::error::MotionError;
use crate::state::RobotStateAdapter;
use crate::types::{
    JointAccelerations, JointEfforts, JointPositions, JointVelocities, Limb, Pose, Twist,
};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// 机身运动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseMotionType {
    /// 航点轨迹
    Trajectory,
}

/// 腿部运动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegMotionType {
    /// 关节空间航点轨迹
    JointTrajectory,
}

impl fmt::Display for BaseMotionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseMotionType::Trajectory => write!(f, "BaseTrajectory"),
        }
    }
}

impl fmt::Display for LegMotionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LegMotionType::JointTrajectory => write!(f, "JointTrajectory"),
        }
    }
}

/// 机身运动
pub trait BaseMotion: Send + Sync {
    /// 运动类型
    fn motion_type(&self) -> BaseMotionType;

    /// 控制设置
    fn control_setup(&self) -> ControlSetup;

    /// 用当前机身位姿拼接起点
    ///
    /// 总是使已有的拟合结果失效。
    fn update_start_pose(&mut self, start_pose: &Pose) -> Result<(), MotionError>;

    /// 拟合曲线并确定时长
    fn compute(&mut self) -> Result<(), MotionError>;

    /// 是否可以求值
    fn is_computed(&self) -> bool;

    /// 轨迹时长（秒）
    fn duration(&self) -> f64;

    /// 某控制层级的参考坐标系
    fn frame_id(&self, level: ControlLevel) -> Result<&str, MotionError>;

    /// 在时刻 `time` 求机身位姿
    fn evaluate_pose(&self, time: f64) -> Result<Pose, MotionError>;

    /// 在时刻 `time` 求机身速度
    fn evaluate_twist(&self, _time: f64) -> Result<Twist, MotionError> {
        Err(MotionError::NotImplemented {
            motion: self.name(),
            operation: "evaluate_twist",
        })
    }

    /// 在时刻 `time` 求机身加速度
    fn evaluate_acceleration(&self, _time: f64) -> Result<Twist, MotionError> {
        Err(MotionError::NotImplemented {
            motion: self.name(),
            operation: "evaluate_acceleration",
        })
    }

    /// 完全独立的副本
    fn clone_boxed(&self) -> Box<dyn BaseMotion>;

    /// 阻塞等待计算完成
    ///
    /// 同步拟合的机身运动没有后台任务：已计算返回 Ok，否则返回 `NotComputed`。
    fn wait_until_computed(&self, _timeout: Duration) -> Result<(), MotionError> {
        if self.is_computed() {
            Ok(())
        } else {
            Err(MotionError::NotComputed {
                motion: self.name(),
            })
        }
    }

    /// 用机器人当前状态拼接所有支持的层级
    ///
    /// 状态缺少机身位姿时返回 `StateUnavailable`，航点保持不变。
    fn update_start_from(&mut self, state: &dyn RobotStateAdapter) -> Result<(), MotionError> {
        if self.control_setup().is_active(ControlLevel::Position) {
            let pose = state
                .base_pose()
                .ok_or_else(|| MotionError::StateUnavailable("base pose".into()))?;
            debug!("{}: splicing start pose from robot state", self.name());
            self.update_start_pose(&pose)?;
        }
        Ok(())
    }

    /// 用于错误和日志的名称
    fn name(&self) -> &'static str {
        match self.motion_type() {
            BaseMotionType::Trajectory => "BaseTrajectory",
        }
    }
}

impl Clone for Box<dyn BaseMotion> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// 腿部运动
pub trait LegMotion: Send + Sync {
    /// 运动类型
    fn motion_type(&self) -> LegMotionType;

    /// 所属的腿
    fn limb(&self) -> Limb;

    /// 控制设置
    fn control_setup(&self) -> ControlSetup;

    /// 用当前关节位置拼接起点
    fn update_start_position(&mut self, start_position: &JointPositions)
    -> Result<(), MotionError>;

    /// 用当前关节速度拼接起点
    fn update_start_velocity(
        &mut self,
        start_velocity: &JointVelocities,
    ) -> Result<(), MotionError>;

    /// 用当前关节加速度拼接起点
    fn update_start_acceleration(
        &mut self,
        start_acceleration: &JointAccelerations,
    ) -> Result<(), MotionError>;

    /// 用当前关节力矩拼接起点
    fn update_start_effort(&mut self, start_effort: &JointEfforts) -> Result<(), MotionError>;

    /// 开始拟合
    ///
    /// 可能异步完成：返回后需通过 `is_computed()` 或 `wait_until_computed()` 确认。
    /// 时长在返回时即已确定。
    fn compute(&mut self) -> Result<(), MotionError>;

    /// 是否可以求值
    fn is_computed(&self) -> bool;

    /// 阻塞等待计算完成
    fn wait_until_computed(&self, timeout: Duration) -> Result<(), MotionError>;

    /// 轨迹时长（秒）
    fn duration(&self) -> f64;

    /// 在时刻 `time` 求关节位置
    fn evaluate_position(&self, time: f64) -> Result<JointPositions, MotionError>;

    /// 在时刻 `time` 求关节速度
    fn evaluate_velocity(&self, time: f64) -> Result<JointVelocities, MotionError>;

    /// 在时刻 `time` 求关节加速度
    fn evaluate_acceleration(&self, time: f64) -> Result<JointAccelerations, MotionError>;

    /// 在时刻 `time` 求关节力矩
    fn evaluate_effort(&self, time: f64) -> Result<JointEfforts, MotionError>;

    /// 执行时是否忽略足端接触状态
    fn is_ignore_contact(&self) -> bool;

    /// 完全独立的副本
    fn clone_boxed(&self) -> Box<dyn LegMotion>;

    /// 用机器人当前状态拼接所有支持的层级（Position、Effort）
    ///
    /// 先取齐所有激活层级的状态再拼接：任一层级缺失时返回 `StateUnavailable`，
    /// 航点保持不变。
    fn update_start_from(&mut self, state: &dyn RobotStateAdapter) -> Result<(), MotionError> {
        let limb = self.limb();
        let setup = self.control_setup();

        let positions = if setup.is_active(ControlLevel::Position) {
            Some(state.joint_positions(limb).ok_or_else(|| {
                MotionError::StateUnavailable(format!("joint positions of {limb}"))
            })?)
        } else {
            None
        };
        let efforts = if setup.is_active(ControlLevel::Effort) {
            Some(state.joint_efforts(limb).ok_or_else(|| {
                MotionError::StateUnavailable(format!("joint efforts of {limb}"))
            })?)
        } else {
            None
        };

        if let Some(positions) = positions {
            debug!("{limb}: splicing start joint positions from robot state");
            self.update_start_position(&positions)?;
        }
        if let Some(efforts) = efforts {
            debug!("{limb}: splicing start joint efforts from robot state");
            self.update_start_effort(&efforts)?;
        }
        Ok(())
    }
}

impl Clone for Box<dyn LegMotion> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

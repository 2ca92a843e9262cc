//! # Stride Motion - 运动基元层
//!
//! 步态序列层使用的航点轨迹：机身位姿轨迹与每条腿的关节空间轨迹。
//!
//! ## 包含模块
//!
//! - `control` - 控制层级（Position / Velocity / Acceleration / Effort）与 `ControlSetup`
//! - `motion` - `BaseMotion` / `LegMotion` 能力接口
//! - `base_trajectory` - 机身轨迹（同步拟合）
//! - `joint_trajectory` - 关节轨迹（后台线程拟合）
//! - `waypoints` - 航点集合与起点拼接
//! - `state` - 机器人状态适配器
//! - `config` - 拟合配置
//!
//! ## 使用流程
//!
//! 1. 从航点构造轨迹
//! 2. 用机器人当前状态拼接起点（`update_start_*` / `update_start_from`）
//! 3. `compute()`，随后 `wait_until_computed()` 或轮询 `is_computed()`
//! 4. 在 `[0, duration]` 内按时刻求值
//!
//! ```rust
//! use stride_motion::{BaseMotion, BaseTrajectory, LegMotion, JointTrajectory, Limb, Pose, RobotState};
//! use nalgebra::DVector;
//! use std::time::Duration;
//!
//! let mut base = BaseTrajectory::new(
//!     "odom",
//!     vec![0.0, 1.0],
//!     vec![Pose::translation(0.0, 0.0, 0.5), Pose::translation(0.3, 0.0, 0.5)],
//! )?;
//! let mut leg = JointTrajectory::builder(Limb::LeftHind)
//!     .position(vec![0.5, 1.0], vec![vec![0.2, 0.0], vec![1.1, 0.9]])
//!     .build()?;
//!
//! let mut state = RobotState::new(Pose::translation(0.0, 0.0, 0.48));
//! state.set_joint_positions(Limb::LeftHind, DVector::from_vec(vec![0.0, 1.0]));
//!
//! base.update_start_from(&state)?;
//! leg.update_start_from(&state)?;
//! base.compute()?;
//! leg.compute()?;
//! leg.wait_until_computed(Duration::from_secs(1))?;
//!
//! assert_eq!(leg.evaluate_position(0.0)?[1], 1.0);
//! # Ok::<(), stride_motion::MotionError>(())
//! ```

pub mod base_trajectory;
pub mod config;
pub mod control;
mod error;
pub(crate) mod fit_worker;
pub mod joint_trajectory;
pub mod motion;
pub mod state;
pub mod types;
pub mod waypoints;

// 重新导出常用类型
pub use base_trajectory::BaseTrajectory;
pub use config::{ComputePolicy, ConfigError, FitConfig};
pub use control::{ControlLevel, ControlSetup, LevelMap};
pub use error::MotionError;
pub use joint_trajectory::{JointTrajectory, JointTrajectoryBuilder};
pub use motion::{BaseMotion, BaseMotionType, LegMotion, LegMotionType};
pub use state::{RobotState, RobotStateAdapter};
pub use types::*;
pub use waypoints::{SpliceOutcome, WaypointSet};

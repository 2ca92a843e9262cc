//! 运动文件
//!
//! TOML 格式，描述一组机身轨迹和腿部轨迹，以及可选的起始状态：
//!
//! ```toml
//! [[base]]
//! frame_id = "odom"
//! times = [0.0, 1.0]
//! poses = [
//!     { position = [0.0, 0.0, 0.5], orientation = [1.0, 0.0, 0.0, 0.0] },
//!     { position = [0.2, 0.0, 0.5], orientation = [1.0, 0.0, 0.0, 0.0] },
//! ]
//!
//! [[legs]]
//! limb = "left_fore"
//! ignore_contact = false
//! position = { times = [0.5, 1.0], joints = [[0.1, 0.0], [0.9, 1.1]] }
//!
//! [start.base]
//! position = [0.0, 0.0, 0.48]
//! orientation = [1.0, 0.0, 0.0, 0.0]
//!
//! [[start.legs]]
//! limb = "left_fore"
//! position = [0.0, 1.0]
//! ```

use anyhow::{Context, Result, bail};
use nalgebra::{DVector, Quaternion, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use stride_motion::{BaseTrajectory, FitConfig, JointTrajectory, Limb, Pose, RobotState};

/// 运动文件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MotionFile {
    /// 机身轨迹
    #[serde(default)]
    pub base: Vec<BaseEntry>,

    /// 腿部轨迹
    #[serde(default)]
    pub legs: Vec<LegEntry>,

    /// 起始状态（用于起点拼接）
    #[serde(default)]
    pub start: Option<StartState>,
}

/// 位姿：位置 + 四元数（w, x, y, z）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseEntry {
    pub position: [f64; 3],
    #[serde(default = "identity_orientation")]
    pub orientation: [f64; 4],
}

fn identity_orientation() -> [f64; 4] {
    [1.0, 0.0, 0.0, 0.0]
}

impl PoseEntry {
    /// 转换为位姿（四元数会被归一化）
    pub fn to_pose(&self) -> Result<Pose> {
        let [w, x, y, z] = self.orientation;
        let quaternion = Quaternion::new(w, x, y, z);
        if quaternion.norm() < 1e-9 {
            bail!("Orientation quaternion must not be zero");
        }
        let [px, py, pz] = self.position;
        Ok(Pose::from_parts(
            Translation3::new(px, py, pz),
            UnitQuaternion::from_quaternion(quaternion),
        ))
    }
}

/// 机身轨迹条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseEntry {
    pub frame_id: String,
    pub times: Vec<f64>,
    pub poses: Vec<PoseEntry>,
}

/// 单个控制层级的关节航点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointWaypoints {
    pub times: Vec<f64>,
    /// `joints[i]` 为第 i 个关节的采样序列
    pub joints: Vec<Vec<f64>>,
}

/// 腿部轨迹条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegEntry {
    pub limb: Limb,
    #[serde(default)]
    pub ignore_contact: bool,
    pub position: Option<JointWaypoints>,
    pub effort: Option<JointWaypoints>,
}

/// 起始状态
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartState {
    pub base: Option<PoseEntry>,
    #[serde(default)]
    pub legs: Vec<LegStart>,
}

/// 某条腿的起始关节状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegStart {
    pub limb: Limb,
    pub position: Option<Vec<f64>>,
    pub effort: Option<Vec<f64>>,
}

/// 由运动文件构建的轨迹
#[derive(Debug)]
pub struct Motions {
    pub base: Vec<BaseTrajectory>,
    pub legs: Vec<JointTrajectory>,
}

impl MotionFile {
    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse motion file")
    }

    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read motion file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// 构建所有轨迹
    pub fn build(&self, config: &FitConfig) -> Result<Motions> {
        let base = self
            .base
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let poses = entry
                    .poses
                    .iter()
                    .map(PoseEntry::to_pose)
                    .collect::<Result<Vec<_>>>()?;
                BaseTrajectory::new(entry.frame_id.clone(), entry.times.clone(), poses)
                    .with_context(|| format!("Invalid base motion #{i}"))
            })
            .collect::<Result<Vec<_>>>()?;

        let legs = self
            .legs
            .iter()
            .map(|entry| {
                let mut builder = JointTrajectory::builder(entry.limb)
                    .ignore_contact(entry.ignore_contact)
                    .config(config.clone());
                if let Some(waypoints) = &entry.position {
                    builder = builder.position(waypoints.times.clone(), waypoints.joints.clone());
                }
                if let Some(waypoints) = &entry.effort {
                    builder = builder.effort(waypoints.times.clone(), waypoints.joints.clone());
                }
                builder
                    .build()
                    .with_context(|| format!("Invalid leg motion for {}", entry.limb))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Motions { base, legs })
    }

    /// 起始状态（文件中未给出时返回 None）
    pub fn start_state(&self) -> Result<Option<RobotState>> {
        let Some(start) = &self.start else {
            return Ok(None);
        };

        let mut state = match &start.base {
            Some(pose) => RobotState::new(pose.to_pose()?),
            None => RobotState::default(),
        };
        for leg in &start.legs {
            if let Some(position) = &leg.position {
                state.set_joint_positions(leg.limb, DVector::from_vec(position.clone()));
            }
            if let Some(effort) = &leg.effort {
                state.set_joint_efforts(leg.limb, DVector::from_vec(effort.clone()));
            }
        }
        Ok(Some(state))
    }
}

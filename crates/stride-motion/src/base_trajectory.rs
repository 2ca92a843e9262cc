//! 机身航点轨迹
//!
//! 一条位姿曲线（位置 + 姿态），`compute()` 同步拟合，返回时即可求值。

use crate::control::{ControlLevel, ControlSetup, LevelMap};
use crate::error::MotionError;
use crate::motion::{BaseMotion, BaseMotionType};
use crate::types::Pose;
use crate::waypoints::WaypointSet;
use std::fmt;
use stride_curve::{Curve, PoseSpline};
use tracing::debug;

const NAME: &str = "BaseTrajectory";

/// 机身航点轨迹
///
/// 仅使用 Position 层级。拟合曲线只在计算完成时存在，
/// 任何航点修改都会同时丢弃曲线。
///
/// # 示例
///
/// ```rust
/// use stride_motion::{BaseMotion, BaseTrajectory, Pose};
///
/// let mut motion = BaseTrajectory::new(
///     "odom",
///     vec![0.0, 1.0, 2.0],
///     vec![
///         Pose::translation(0.0, 0.0, 0.5),
///         Pose::translation(0.1, 0.0, 0.5),
///         Pose::translation(0.2, 0.0, 0.5),
///     ],
/// )?;
///
/// motion.update_start_pose(&Pose::translation(0.01, 0.0, 0.48))?;
/// motion.compute()?;
/// assert_eq!(motion.duration(), 2.0);
/// let pose = motion.evaluate_pose(1.0)?;
/// # let _ = pose;
/// # Ok::<(), stride_motion::MotionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BaseTrajectory<C = PoseSpline>
where
    C: Curve<Value = Pose>,
{
    control_setup: ControlSetup,
    frame_ids: LevelMap<Option<String>>,
    waypoints: WaypointSet<Pose>,
    duration: f64,
    /// 仅在计算完成时为 Some
    curve: Option<C>,
}

impl BaseTrajectory<PoseSpline> {
    /// 使用默认位姿样条创建
    pub fn new(
        frame_id: impl Into<String>,
        times: Vec<f64>,
        poses: Vec<Pose>,
    ) -> Result<Self, MotionError> {
        Self::with_curve(frame_id, times, poses)
    }
}

impl<C> BaseTrajectory<C>
where
    C: Curve<Value = Pose>,
{
    /// 使用指定曲线适配器创建
    pub fn with_curve(
        frame_id: impl Into<String>,
        times: Vec<f64>,
        poses: Vec<Pose>,
    ) -> Result<Self, MotionError> {
        if let Some(index) = poses.iter().position(|pose| !is_finite_pose(pose)) {
            return Err(MotionError::InvalidWaypoints(format!(
                "{NAME}: non-finite pose at waypoint {index}"
            )));
        }
        let waypoints = WaypointSet::single(times, poses)?;
        let mut frame_ids = LevelMap::default();
        frame_ids[ControlLevel::Position] = Some(frame_id.into());

        Ok(Self {
            control_setup: ControlSetup::position_only(),
            frame_ids,
            waypoints,
            duration: 0.0,
            curve: None,
        })
    }

    /// Position 层级航点
    pub fn waypoints(&self) -> &WaypointSet<Pose> {
        &self.waypoints
    }
}

fn is_finite_pose(pose: &Pose) -> bool {
    pose.translation.vector.iter().all(|v| v.is_finite())
        && pose.rotation.coords.iter().all(|v| v.is_finite())
}

impl<C> BaseMotion for BaseTrajectory<C>
where
    C: Curve<Value = Pose>,
{
    fn motion_type(&self) -> BaseMotionType {
        BaseMotionType::Trajectory
    }

    fn control_setup(&self) -> ControlSetup {
        self.control_setup
    }

    fn update_start_pose(&mut self, start_pose: &Pose) -> Result<(), MotionError> {
        self.curve = None;
        let outcome = self
            .waypoints
            .splice_start(std::slice::from_ref(start_pose))?;
        debug!("{NAME}: start pose spliced ({outcome:?})");
        Ok(())
    }

    fn compute(&mut self) -> Result<(), MotionError> {
        self.curve = None;
        self.duration = self.waypoints.final_time();

        let poses = self.waypoints.channel(0).unwrap_or_default();
        let curve = C::fit(self.waypoints.times(), poses)?;
        self.curve = Some(curve);

        debug!(
            "{NAME}: computed {} samples, duration {:.3}s",
            self.waypoints.len(),
            self.duration
        );
        Ok(())
    }

    fn is_computed(&self) -> bool {
        self.curve.is_some()
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn frame_id(&self, level: ControlLevel) -> Result<&str, MotionError> {
        self.frame_ids[level]
            .as_deref()
            .ok_or(MotionError::LevelNotConfigured { motion: NAME, level })
    }

    fn evaluate_pose(&self, time: f64) -> Result<Pose, MotionError> {
        if !time.is_finite() {
            return Err(MotionError::InvalidTime { motion: NAME, time });
        }
        self.curve
            .as_ref()
            .map(|curve| curve.evaluate(time))
            .ok_or(MotionError::NotComputed { motion: NAME })
    }

    fn clone_boxed(&self) -> Box<dyn BaseMotion> {
        Box::new(self.clone())
    }
}

impl<C> fmt::Display for BaseTrajectory<C>
where
    C: Curve<Value = Pose>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_computed() {
            return writeln!(f, "{NAME} (not computed)");
        }
        writeln!(f, "Duration: {}", self.duration)?;
        for level in self.control_setup.active_levels() {
            let frame = self.frame_ids[level].as_deref().unwrap_or("-");
            write!(f, "Times ({level}, frame {frame}): ")?;
            for time in self.waypoints.times() {
                write!(f, "{time}, ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Quaternion, UnitQuaternion};

    fn poses() -> Vec<Pose> {
        vec![
            Pose::translation(0.0, 0.0, 0.5),
            Pose::translation(0.2, 0.0, 0.5),
            Pose::translation(0.4, 0.1, 0.45),
        ]
    }

    fn trajectory() -> BaseTrajectory {
        BaseTrajectory::new("odom", vec![0.0, 1.0, 2.0], poses()).unwrap()
    }

    #[test]
    fn test_compute_and_evaluate() {
        let mut motion = trajectory();
        assert!(!motion.is_computed());

        motion.compute().unwrap();

        assert!(motion.is_computed());
        assert_eq!(motion.duration(), 2.0);
        let p = poses();
        assert_relative_eq!(motion.evaluate_pose(0.0).unwrap(), p[0], epsilon = 1e-12);
        assert_relative_eq!(motion.evaluate_pose(2.0).unwrap(), p[2], epsilon = 1e-12);
    }

    #[test]
    fn test_evaluate_before_compute() {
        let motion = trajectory();
        assert_eq!(
            motion.evaluate_pose(0.5),
            Err(MotionError::NotComputed { motion: NAME })
        );
        assert!(matches!(
            motion.wait_until_computed(std::time::Duration::from_millis(1)),
            Err(MotionError::NotComputed { .. })
        ));
    }

    #[test]
    fn test_splice_overwrites_first_sample() {
        let mut motion = trajectory();
        motion.compute().unwrap();

        let start = Pose::translation(-0.05, 0.0, 0.48);
        motion.update_start_pose(&start).unwrap();

        assert!(!motion.is_computed());
        assert_eq!(motion.waypoints().times(), &[0.0, 1.0, 2.0]);
        assert_eq!(motion.waypoints().channel(0).unwrap()[0], start);
    }

    #[test]
    fn test_splice_inserts_when_first_time_positive() {
        let mut motion = BaseTrajectory::new("odom", vec![0.5, 1.5], poses()[1..].to_vec()).unwrap();
        let start = Pose::identity();
        motion.update_start_pose(&start).unwrap();

        assert_eq!(motion.waypoints().times(), &[0.0, 0.5, 1.5]);
        assert_eq!(motion.waypoints().channel(0).unwrap()[0], start);

        motion.compute().unwrap();
        assert_relative_eq!(motion.evaluate_pose(0.0).unwrap(), start, epsilon = 1e-12);
        assert_eq!(motion.duration(), 1.5);
    }

    #[test]
    fn test_new_rejects_non_finite_pose() {
        let mut bad = poses();
        bad[1] = Pose::translation(f64::NAN, 0.0, 0.5);
        assert!(matches!(
            BaseTrajectory::new("odom", vec![0.0, 1.0, 2.0], bad),
            Err(MotionError::InvalidWaypoints(_))
        ));

        let mut bad = poses();
        bad[2].rotation = UnitQuaternion::new_unchecked(Quaternion::new(f64::INFINITY, 0.0, 0.0, 0.0));
        assert!(matches!(
            BaseTrajectory::new("odom", vec![0.0, 1.0, 2.0], bad),
            Err(MotionError::InvalidWaypoints(_))
        ));
    }

    #[test]
    fn test_evaluate_non_finite_time() {
        let mut motion = trajectory();
        motion.compute().unwrap();

        assert!(matches!(
            motion.evaluate_pose(f64::NAN),
            Err(MotionError::InvalidTime { motion: NAME, .. })
        ));
        assert!(matches!(
            motion.evaluate_pose(f64::NEG_INFINITY),
            Err(MotionError::InvalidTime { .. })
        ));
        assert!(motion.evaluate_pose(1.0).is_ok());
    }

    #[test]
    fn test_update_start_from_missing_base_pose() {
        use crate::state::RobotState;

        let mut motion = trajectory();
        motion.compute().unwrap();

        let state = RobotState::default();
        assert!(matches!(
            motion.update_start_from(&state),
            Err(MotionError::StateUnavailable(_))
        ));
        assert!(motion.is_computed());
        assert_eq!(motion.waypoints().channel(0).unwrap(), poses().as_slice());

        let state = RobotState::new(Pose::translation(0.0, 0.0, 0.48));
        motion.update_start_from(&state).unwrap();
        assert_eq!(
            motion.waypoints().channel(0).unwrap()[0],
            Pose::translation(0.0, 0.0, 0.48)
        );
    }

    #[test]
    fn test_unsupported_levels() {
        let mut motion = trajectory();
        motion.compute().unwrap();

        assert_eq!(
            motion.evaluate_twist(0.0),
            Err(MotionError::NotImplemented {
                motion: NAME,
                operation: "evaluate_twist"
            })
        );
        assert!(matches!(
            motion.evaluate_acceleration(0.0),
            Err(MotionError::NotImplemented { .. })
        ));
        assert_eq!(motion.frame_id(ControlLevel::Position).unwrap(), "odom");
        assert!(motion.frame_id(ControlLevel::Effort).is_err());
    }

    #[test]
    fn test_single_sample_holds() {
        let hold = Pose::translation(0.0, 0.0, 0.4);
        let mut motion = BaseTrajectory::new("odom", vec![0.0], vec![hold]).unwrap();
        motion.compute().unwrap();

        assert_eq!(motion.duration(), 0.0);
        assert_relative_eq!(motion.evaluate_pose(1.0).unwrap(), hold);
    }

    #[test]
    fn test_clone_boxed_is_independent() {
        let mut motion = trajectory();
        motion.compute().unwrap();

        let mut copy: Box<dyn BaseMotion> = motion.clone_boxed();
        assert!(copy.is_computed());
        for t in [0.0, 0.3, 1.0, 1.7, 2.0] {
            assert_eq!(copy.evaluate_pose(t).unwrap(), motion.evaluate_pose(t).unwrap());
        }

        copy.update_start_pose(&Pose::identity()).unwrap();
        assert!(!copy.is_computed());
        assert!(motion.is_computed());
        assert_eq!(motion.waypoints().channel(0).unwrap()[0], poses()[0]);
    }

    #[test]
    fn test_display() {
        let mut motion = trajectory();
        assert!(motion.to_string().contains("not computed"));

        motion.compute().unwrap();
        let text = motion.to_string();
        assert!(text.contains("Duration: 2"));
        assert!(text.contains("Times (position, frame odom): 0, 1, 2,"));
    }
}

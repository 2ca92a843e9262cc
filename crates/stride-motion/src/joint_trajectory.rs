//! 关节空间航点轨迹
//!
//! 每个激活层级、每个关节一条独立曲线。`compute()` 把拟合交给后台
//! [`FitWorker`](crate::fit_worker) 并立即返回；`is_computed()` 是唯一的就绪信号。
//!
//! # 重入 compute
//!
//! 由 [`FitConfig::policy`] 决定：
//!
//! - `CancelAndRestart`：取消旧拟合、等待其退出后重新开始
//! - `Reject`：返回 `ConcurrentComputeConflict`
//!
//! # 线程安全
//!
//! 拟合线程只读取航点快照，只通过 `FitSlot` 发布结果。
//! 起点拼接会取消进行中的拟合，并让其结果作废（代数递增）。

use crate::config::{ComputePolicy, FitConfig};
use crate::control::{ControlLevel, ControlSetup, LevelMap};
use crate::error::MotionError;
use crate::fit_worker::{FitJob, FitSlot, FitStatus, FitWorker};
use crate::motion::{LegMotion, LegMotionType};
use crate::types::{
    JointAccelerations, JointEfforts, JointPositions, JointVelocities, Limb,
};
use crate::waypoints::WaypointSet;
use nalgebra::DVector;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use stride_curve::{Curve, ScalarSpline};
use tracing::{debug, warn};

const NAME: &str = "JointTrajectory";

/// 每个层级、每个关节的拟合曲线
type JointCurves<C> = LevelMap<Vec<C>>;

/// 关节空间航点轨迹
///
/// # 示例
///
/// ```rust
/// use stride_motion::{JointTrajectory, LegMotion, Limb};
/// use nalgebra::DVector;
/// use std::time::Duration;
///
/// let mut motion = JointTrajectory::builder(Limb::LeftFore)
///     .position(
///         vec![0.0, 1.0, 2.0],
///         vec![
///             vec![0.0, 0.3, 0.1],    // 关节 1
///             vec![0.8, 1.0, 0.8],    // 关节 2
///             vec![-1.5, -1.2, -1.5], // 关节 3
///         ],
///     )
///     .build()?;
///
/// motion.update_start_position(&DVector::from_vec(vec![0.05, 0.75, -1.45]))?;
/// motion.compute()?;
/// assert_eq!(motion.duration(), 2.0);
///
/// motion.wait_until_computed(Duration::from_secs(1))?;
/// let q = motion.evaluate_position(0.0)?;
/// assert_eq!(q[1], 0.75);
/// # Ok::<(), stride_motion::MotionError>(())
/// ```
pub struct JointTrajectory<C = ScalarSpline>
where
    C: Curve<Value = f64>,
{
    limb: Limb,
    ignore_contact: bool,
    control_setup: ControlSetup,
    /// 仅激活层级为 Some
    waypoints: LevelMap<Option<WaypointSet<f64>>>,
    duration: f64,
    config: FitConfig,
    slot: Arc<FitSlot<JointCurves<C>>>,
    worker: Option<FitWorker>,
}

/// [`JointTrajectory`] 构建器
#[derive(Debug, Clone)]
pub struct JointTrajectoryBuilder {
    limb: Limb,
    ignore_contact: bool,
    config: FitConfig,
    position: Option<(Vec<f64>, Vec<Vec<f64>>)>,
    effort: Option<(Vec<f64>, Vec<Vec<f64>>)>,
}

impl JointTrajectoryBuilder {
    /// 位置航点：`joints[i]` 为第 i 个关节的采样序列
    pub fn position(mut self, times: Vec<f64>, joints: Vec<Vec<f64>>) -> Self {
        self.position = Some((times, joints));
        self
    }

    /// 力矩航点：`joints[i]` 为第 i 个关节的采样序列
    pub fn effort(mut self, times: Vec<f64>, joints: Vec<Vec<f64>>) -> Self {
        self.effort = Some((times, joints));
        self
    }

    /// 执行时忽略足端接触
    pub fn ignore_contact(mut self, ignore: bool) -> Self {
        self.ignore_contact = ignore;
        self
    }

    /// 拟合配置
    pub fn config(mut self, config: FitConfig) -> Self {
        self.config = config;
        self
    }

    /// 使用默认标量样条构建
    pub fn build(self) -> Result<JointTrajectory, MotionError> {
        self.build_with_curve()
    }

    /// 使用指定曲线适配器构建
    ///
    /// # 错误
    ///
    /// - 没有任何层级的航点
    /// - 某层级航点非法
    /// - 各层级关节数不一致
    pub fn build_with_curve<C>(self) -> Result<JointTrajectory<C>, MotionError>
    where
        C: Curve<Value = f64>,
    {
        let mut waypoints: LevelMap<Option<WaypointSet<f64>>> = LevelMap::default();
        let mut levels = Vec::new();

        for (level, data) in [
            (ControlLevel::Position, self.position),
            (ControlLevel::Effort, self.effort),
        ] {
            if let Some((times, joints)) = data {
                if let Some(joint) = joints.iter().position(|v| v.iter().any(|x| !x.is_finite())) {
                    return Err(MotionError::InvalidWaypoints(format!(
                        "{}: non-finite {level} value for joint {joint}",
                        self.limb
                    )));
                }
                waypoints[level] = Some(WaypointSet::new(times, joints)?);
                levels.push(level);
            }
        }

        if levels.is_empty() {
            return Err(MotionError::InvalidWaypoints(format!(
                "{} has no waypoints for any control level",
                self.limb
            )));
        }

        let joint_counts: Vec<usize> = waypoints
            .iter()
            .filter_map(|(_, set)| set.as_ref().map(WaypointSet::channel_count))
            .collect();
        if let Some((first, rest)) = joint_counts.split_first()
            && let Some(other) = rest.iter().find(|count| *count != first)
        {
            return Err(MotionError::InvalidWaypoints(format!(
                "{}: control levels disagree on joint count ({first} vs {other})",
                self.limb
            )));
        }

        Ok(JointTrajectory {
            limb: self.limb,
            ignore_contact: self.ignore_contact,
            control_setup: ControlSetup::from_levels(&levels),
            waypoints,
            duration: 0.0,
            config: self.config,
            slot: Arc::new(FitSlot::new()),
            worker: None,
        })
    }
}

impl JointTrajectory<ScalarSpline> {
    /// 创建构建器
    pub fn builder(limb: Limb) -> JointTrajectoryBuilder {
        JointTrajectoryBuilder {
            limb,
            ignore_contact: false,
            config: FitConfig::default(),
            position: None,
            effort: None,
        }
    }
}

impl<C> JointTrajectory<C>
where
    C: Curve<Value = f64>,
{
    /// 某层级的航点（未激活时为 None）
    pub fn waypoints(&self, level: ControlLevel) -> Option<&WaypointSet<f64>> {
        self.waypoints[level].as_ref()
    }

    /// 关节数
    pub fn joint_count(&self) -> usize {
        self.waypoints
            .iter()
            .find_map(|(_, set)| set.as_ref().map(WaypointSet::channel_count))
            .unwrap_or(0)
    }

    /// 拟合配置
    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// 最近一次拟合的错误（拟合失败时）
    ///
    /// 起点拼接或重新计算之后，旧拟合的错误不再报告。
    pub fn fit_error(&self) -> Option<MotionError> {
        let worker = self.worker.as_ref()?;
        if worker.generation() != self.slot.generation() {
            return None;
        }
        match worker.status() {
            FitStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    fn ensure_level(&self, level: ControlLevel) -> Result<(), MotionError> {
        if self.control_setup.is_active(level) {
            Ok(())
        } else {
            Err(MotionError::LevelNotConfigured {
                motion: NAME,
                level,
            })
        }
    }

    /// 取消进行中的拟合并使当前曲线失效（不阻塞）
    fn invalidate(&mut self) {
        if let Some(worker) = &self.worker {
            worker.cancel();
        }
        self.slot.invalidate();
    }

    fn splice(&mut self, level: ControlLevel, start: &DVector<f64>) -> Result<(), MotionError> {
        self.ensure_level(level)?;
        let channel_count = self.waypoints[level]
            .as_ref()
            .map(WaypointSet::channel_count)
            .ok_or(MotionError::LevelNotConfigured {
                motion: NAME,
                level,
            })?;
        // 维度不符时保留已有的拟合结果
        if start.len() != channel_count {
            return Err(MotionError::InvalidWaypoints(format!(
                "{}: start {level} has {} joints, expected {channel_count}",
                self.limb,
                start.len()
            )));
        }
        self.invalidate();

        let set = self.waypoints[level]
            .as_mut()
            .ok_or(MotionError::LevelNotConfigured {
                motion: NAME,
                level,
            })?;
        let outcome = set.splice_start(start.as_slice())?;
        debug!("{}: start {} spliced ({:?})", self.limb, level, outcome);
        Ok(())
    }

    fn evaluate_level(&self, level: ControlLevel, time: f64) -> Result<DVector<f64>, MotionError> {
        self.ensure_level(level)?;
        if !time.is_finite() {
            return Err(MotionError::InvalidTime { motion: NAME, time });
        }
        let curves = self
            .slot
            .load()
            .ok_or(MotionError::NotComputed { motion: NAME })?;
        let channels = &curves[level];
        Ok(DVector::from_iterator(
            channels.len(),
            channels.iter().map(|curve| curve.evaluate(time)),
        ))
    }
}

/// 拟合一个层级的所有关节通道
fn fit_channels<C>(
    set: &WaypointSet<f64>,
    parallel: bool,
    job: &FitJob,
) -> Result<Vec<C>, MotionError>
where
    C: Curve<Value = f64>,
{
    let times = set.times();

    if !parallel || set.channel_count() < 2 {
        return set
            .channels()
            .iter()
            .map(|values| -> Result<C, MotionError> {
                job.check_cancelled()?;
                Ok(C::fit(times, values)?)
            })
            .collect();
    }

    thread::scope(|scope| {
        let handles: Vec<_> = set
            .channels()
            .iter()
            .map(|values| {
                scope.spawn(move || -> Result<C, MotionError> {
                    job.check_cancelled()?;
                    Ok(C::fit(times, values)?)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| MotionError::Worker("channel fit panicked".into()))
                    .and_then(|result| result)
            })
            .collect()
    })
}

/// 拟合所有激活层级
fn fit_levels<C>(
    waypoints: &LevelMap<Option<WaypointSet<f64>>>,
    parallel: bool,
    job: &FitJob,
) -> Result<JointCurves<C>, MotionError>
where
    C: Curve<Value = f64>,
{
    let mut curves: JointCurves<C> = LevelMap::default();
    for (level, set) in waypoints.iter() {
        if let Some(set) = set {
            curves[level] = fit_channels(set, parallel, job)?;
        }
    }
    Ok(curves)
}

impl<C> LegMotion for JointTrajectory<C>
where
    C: Curve<Value = f64>,
{
    fn motion_type(&self) -> LegMotionType {
        LegMotionType::JointTrajectory
    }

    fn limb(&self) -> Limb {
        self.limb
    }

    fn control_setup(&self) -> ControlSetup {
        self.control_setup
    }

    fn update_start_position(
        &mut self,
        start_position: &JointPositions,
    ) -> Result<(), MotionError> {
        self.splice(ControlLevel::Position, start_position)
    }

    fn update_start_velocity(
        &mut self,
        _start_velocity: &JointVelocities,
    ) -> Result<(), MotionError> {
        Err(MotionError::NotImplemented {
            motion: NAME,
            operation: "update_start_velocity",
        })
    }

    fn update_start_acceleration(
        &mut self,
        _start_acceleration: &JointAccelerations,
    ) -> Result<(), MotionError> {
        Err(MotionError::NotImplemented {
            motion: NAME,
            operation: "update_start_acceleration",
        })
    }

    fn update_start_effort(&mut self, start_effort: &JointEfforts) -> Result<(), MotionError> {
        self.splice(ControlLevel::Effort, start_effort)
    }

    fn compute(&mut self) -> Result<(), MotionError> {
        if let Some(worker) = &self.worker
            && worker.is_running()
        {
            match self.config.policy {
                ComputePolicy::Reject => {
                    return Err(MotionError::ConcurrentComputeConflict { motion: NAME });
                },
                ComputePolicy::CancelAndRestart => {
                    warn!("{}: cancelling in-flight fit before recompute", self.limb);
                },
            }
        }
        if let Some(worker) = self.worker.take() {
            worker.shutdown();
        }

        let generation = self.slot.invalidate();
        self.duration = self
            .waypoints
            .iter()
            .filter_map(|(_, set)| set.as_ref().map(WaypointSet::final_time))
            .fold(0.0, f64::max);

        let snapshot = self.waypoints.clone();
        let parallel = self.config.parallel;
        self.worker = Some(FitWorker::spawn(
            self.limb.name(),
            self.slot.clone(),
            generation,
            self.config.join_timeout(),
            move |job| fit_levels::<C>(&snapshot, parallel, job),
        )?);

        debug!(
            "{}: fit started for {} joints, duration {:.3}s",
            self.limb,
            self.joint_count(),
            self.duration
        );
        Ok(())
    }

    fn is_computed(&self) -> bool {
        self.slot.is_computed()
    }

    fn wait_until_computed(&self, timeout: Duration) -> Result<(), MotionError> {
        if self.slot.is_computed() {
            return Ok(());
        }
        let Some(worker) = &self.worker else {
            return Err(MotionError::NotComputed { motion: NAME });
        };

        let current = worker.generation() == self.slot.generation();
        match worker.wait(timeout) {
            Some(FitStatus::Done) if self.slot.is_computed() => Ok(()),
            Some(FitStatus::Done) => Err(MotionError::NotComputed { motion: NAME }),
            Some(FitStatus::Failed(e)) if current => Err(e),
            Some(FitStatus::Failed(_)) => Err(MotionError::NotComputed { motion: NAME }),
            Some(FitStatus::Cancelled) => Err(MotionError::FitCancelled),
            Some(FitStatus::Running) | None => Err(MotionError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn evaluate_position(&self, time: f64) -> Result<JointPositions, MotionError> {
        self.evaluate_level(ControlLevel::Position, time)
    }

    fn evaluate_velocity(&self, _time: f64) -> Result<JointVelocities, MotionError> {
        Err(MotionError::NotImplemented {
            motion: NAME,
            operation: "evaluate_velocity",
        })
    }

    fn evaluate_acceleration(&self, _time: f64) -> Result<JointAccelerations, MotionError> {
        Err(MotionError::NotImplemented {
            motion: NAME,
            operation: "evaluate_acceleration",
        })
    }

    fn evaluate_effort(&self, time: f64) -> Result<JointEfforts, MotionError> {
        self.evaluate_level(ControlLevel::Effort, time)
    }

    fn is_ignore_contact(&self) -> bool {
        self.ignore_contact
    }

    fn clone_boxed(&self) -> Box<dyn LegMotion> {
        Box::new(self.clone())
    }
}

impl<C> Clone for JointTrajectory<C>
where
    C: Curve<Value = f64>,
{
    /// 深拷贝航点和已发布的曲线
    ///
    /// 进行中的拟合不会被复制：源对象尚未计算完成时，副本同样处于未计算状态。
    fn clone(&self) -> Self {
        let curves = self.slot.load().map(|curves| (*curves).clone());
        Self {
            limb: self.limb,
            ignore_contact: self.ignore_contact,
            control_setup: self.control_setup,
            waypoints: self.waypoints.clone(),
            duration: self.duration,
            config: self.config.clone(),
            slot: Arc::new(FitSlot::with_curves(curves)),
            worker: None,
        }
    }
}

impl<C> fmt::Debug for JointTrajectory<C>
where
    C: Curve<Value = f64>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(NAME)
            .field("limb", &self.limb)
            .field("ignore_contact", &self.ignore_contact)
            .field("control_setup", &self.control_setup)
            .field("joint_count", &self.joint_count())
            .field("duration", &self.duration)
            .field("is_computed", &self.is_computed())
            .finish()
    }
}

impl<C> fmt::Display for JointTrajectory<C>
where
    C: Curve<Value = f64>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_computed() {
            return writeln!(f, "{NAME} {} (not computed)", self.limb);
        }
        writeln!(f, "Duration: {}", self.duration)?;
        writeln!(
            f,
            "Ignore contact: {}",
            if self.ignore_contact { "True" } else { "False" }
        )?;
        for (level, set) in self.waypoints.iter() {
            if let Some(set) = set {
                write!(f, "Times ({level}): ")?;
                for time in set.times() {
                    write!(f, "{time}, ")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RobotState;

    const WAIT: Duration = Duration::from_secs(5);

    fn three_joint() -> JointTrajectory {
        JointTrajectory::builder(Limb::RightFore)
            .position(
                vec![0.0, 1.0, 2.0],
                vec![
                    vec![0.0, 0.5, 1.0],
                    vec![1.0, 0.5, 0.0],
                    vec![-0.2, 0.2, -0.2],
                ],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_a_level() {
        let result = JointTrajectory::builder(Limb::LeftFore).build();
        assert!(matches!(result, Err(MotionError::InvalidWaypoints(_))));
    }

    #[test]
    fn test_builder_rejects_joint_count_mismatch() {
        let result = JointTrajectory::builder(Limb::LeftFore)
            .position(vec![0.0], vec![vec![0.0], vec![0.0]])
            .effort(vec![0.0], vec![vec![0.0]])
            .build();
        assert!(matches!(result, Err(MotionError::InvalidWaypoints(_))));
    }

    #[test]
    fn test_builder_rejects_non_finite_values() {
        let result = JointTrajectory::builder(Limb::RightHind)
            .position(vec![0.0, 1.0], vec![vec![0.0, f64::NAN]])
            .build();
        assert!(matches!(result, Err(MotionError::InvalidWaypoints(_))));
    }

    #[test]
    fn test_control_setup_from_levels() {
        let motion = JointTrajectory::builder(Limb::LeftHind)
            .effort(vec![0.0, 1.0], vec![vec![1.0, 2.0]])
            .build()
            .unwrap();

        let setup = motion.control_setup();
        assert!(setup.is_active(ControlLevel::Effort));
        assert!(!setup.is_active(ControlLevel::Position));
        assert_eq!(motion.joint_count(), 1);
    }

    #[test]
    fn test_compute_then_evaluate() {
        let mut motion = three_joint();
        motion.compute().unwrap();
        assert_eq!(motion.duration(), 2.0);

        motion.wait_until_computed(WAIT).unwrap();
        assert!(motion.is_computed());

        let q = motion.evaluate_position(1.0).unwrap();
        assert_eq!(q.as_slice(), &[0.5, 0.5, 0.2]);
        let q = motion.evaluate_position(2.0).unwrap();
        assert_eq!(q.as_slice(), &[1.0, 0.0, -0.2]);
    }

    #[test]
    fn test_evaluate_before_compute() {
        let motion = three_joint();
        assert_eq!(
            motion.evaluate_position(0.0),
            Err(MotionError::NotComputed { motion: NAME })
        );
        assert_eq!(
            motion.wait_until_computed(Duration::from_millis(1)),
            Err(MotionError::NotComputed { motion: NAME })
        );
    }

    #[test]
    fn test_velocity_and_acceleration_not_implemented() {
        let mut motion = three_joint();
        let v = DVector::zeros(3);

        assert!(matches!(
            motion.evaluate_velocity(0.0),
            Err(MotionError::NotImplemented { .. })
        ));
        assert!(matches!(
            motion.update_start_velocity(&v),
            Err(MotionError::NotImplemented { .. })
        ));
        assert!(matches!(
            motion.update_start_acceleration(&v),
            Err(MotionError::NotImplemented { .. })
        ));

        motion.compute().unwrap();
        motion.wait_until_computed(WAIT).unwrap();
        assert!(matches!(
            motion.evaluate_acceleration(0.0),
            Err(MotionError::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_inactive_level_not_configured() {
        let mut motion = three_joint();
        motion.compute().unwrap();
        motion.wait_until_computed(WAIT).unwrap();

        assert_eq!(
            motion.evaluate_effort(0.0),
            Err(MotionError::LevelNotConfigured {
                motion: NAME,
                level: ControlLevel::Effort
            })
        );
        assert!(matches!(
            motion.update_start_effort(&DVector::zeros(3)),
            Err(MotionError::LevelNotConfigured { .. })
        ));
    }

    #[test]
    fn test_splice_wrong_dimension() {
        let mut motion = three_joint();
        let result = motion.update_start_position(&DVector::zeros(2));
        assert!(matches!(result, Err(MotionError::InvalidWaypoints(_))));
    }

    #[test]
    fn test_splice_wrong_dimension_keeps_fit() {
        let mut motion = three_joint();
        motion.compute().unwrap();
        motion.wait_until_computed(WAIT).unwrap();

        let result = motion.update_start_position(&DVector::zeros(4));
        assert!(matches!(result, Err(MotionError::InvalidWaypoints(_))));
        assert!(motion.is_computed());
        assert_eq!(
            motion.evaluate_position(1.0).unwrap().as_slice(),
            &[0.5, 0.5, 0.2]
        );
        assert_eq!(motion.waypoints(ControlLevel::Position).unwrap().len(), 3);
    }

    #[test]
    fn test_evaluate_non_finite_time() {
        let mut motion = three_joint();
        motion.compute().unwrap();
        motion.wait_until_computed(WAIT).unwrap();

        for time in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                motion.evaluate_position(time),
                Err(MotionError::InvalidTime { motion: NAME, .. })
            ));
        }
        // 层级未激活优先于时刻非法
        assert!(matches!(
            motion.evaluate_effort(f64::NAN),
            Err(MotionError::LevelNotConfigured { .. })
        ));
    }

    #[test]
    fn test_update_start_from_partial_state_leaves_waypoints() {
        let mut motion = JointTrajectory::builder(Limb::LeftFore)
            .position(vec![0.5, 1.0], vec![vec![0.0, 1.0]])
            .effort(vec![0.0, 1.0], vec![vec![5.0, 6.0]])
            .build()
            .unwrap();

        let mut state = RobotState::default();
        state.set_joint_positions(Limb::LeftFore, DVector::from_vec(vec![0.25]));
        assert!(matches!(
            motion.update_start_from(&state),
            Err(MotionError::StateUnavailable(_))
        ));

        let position = motion.waypoints(ControlLevel::Position).unwrap();
        assert_eq!(position.times(), &[0.5, 1.0]);
        assert_eq!(position.channel(0).unwrap(), &[0.0, 1.0]);
    }

    #[test]
    fn test_update_start_from_state() {
        let mut motion = JointTrajectory::builder(Limb::LeftFore)
            .position(vec![0.5, 1.0], vec![vec![0.0, 1.0]])
            .effort(vec![0.0, 1.0], vec![vec![5.0, 6.0]])
            .build()
            .unwrap();

        let mut state = RobotState::default();
        assert!(matches!(
            motion.update_start_from(&state),
            Err(MotionError::StateUnavailable(_))
        ));

        state.set_joint_positions(Limb::LeftFore, DVector::from_vec(vec![0.25]));
        state.set_joint_efforts(Limb::LeftFore, DVector::from_vec(vec![4.0]));
        motion.update_start_from(&state).unwrap();

        let position = motion.waypoints(ControlLevel::Position).unwrap();
        assert_eq!(position.times(), &[0.0, 0.5, 1.0]);
        assert_eq!(position.channel(0).unwrap(), &[0.25, 0.0, 1.0]);
        let effort = motion.waypoints(ControlLevel::Effort).unwrap();
        assert_eq!(effort.times(), &[0.0, 1.0]);
        assert_eq!(effort.channel(0).unwrap(), &[4.0, 6.0]);
    }

    #[test]
    fn test_serial_fit_matches_parallel() {
        let mut parallel = three_joint();
        let mut serial = JointTrajectory::builder(Limb::RightFore)
            .position(
                vec![0.0, 1.0, 2.0],
                vec![
                    vec![0.0, 0.5, 1.0],
                    vec![1.0, 0.5, 0.0],
                    vec![-0.2, 0.2, -0.2],
                ],
            )
            .config(FitConfig {
                parallel: false,
                ..FitConfig::default()
            })
            .build()
            .unwrap();

        parallel.compute().unwrap();
        serial.compute().unwrap();
        parallel.wait_until_computed(WAIT).unwrap();
        serial.wait_until_computed(WAIT).unwrap();

        for t in [0.0, 0.25, 0.9, 1.6, 2.0] {
            assert_eq!(
                parallel.evaluate_position(t).unwrap(),
                serial.evaluate_position(t).unwrap()
            );
        }
    }

    #[test]
    fn test_display() {
        let mut motion = three_joint();
        assert!(motion.to_string().contains("not computed"));

        motion.compute().unwrap();
        motion.wait_until_computed(WAIT).unwrap();
        let text = motion.to_string();
        assert!(text.contains("Duration: 2"));
        assert!(text.contains("Ignore contact: False"));
        assert!(text.contains("Times (position): 0, 1, 2,"));
    }
}

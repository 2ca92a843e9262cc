//! 运动层错误类型定义

use crate::control::ControlLevel;
use stride_curve::CurveError;
use thiserror::Error;

/// 运动层错误类型
///
/// 所有错误都直接返回给调用方（步态序列层），本层不做重试，
/// 也不会用默认值掩盖非法调用。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// 轨迹尚未计算完成就被求值
    #[error("{motion} is not computed")]
    NotComputed { motion: &'static str },

    /// 有意不支持的能力（如关节轨迹的速度/加速度）
    #[error("{motion}: {operation} is not implemented")]
    NotImplemented {
        motion: &'static str,
        operation: &'static str,
    },

    /// 请求的控制层级不在 ControlSetup 中
    #[error("{motion}: control level '{level}' is not configured")]
    LevelNotConfigured {
        motion: &'static str,
        level: ControlLevel,
    },

    /// 求值时刻不是有限数
    #[error("{motion}: cannot evaluate at non-finite time {time}")]
    InvalidTime { motion: &'static str, time: f64 },

    /// 上一次拟合仍在进行中（Reject 策略）
    #[error("{motion}: compute requested while a fit is still in flight")]
    ConcurrentComputeConflict { motion: &'static str },

    /// 非法航点（空、长度不一致、时间递减、关节数不一致等）
    #[error("Invalid waypoints: {0}")]
    InvalidWaypoints(String),

    /// 曲线拟合失败
    #[error("Curve fit failed: {0}")]
    Fit(#[from] CurveError),

    /// 拟合被取消（被新的 compute 或起点拼接取代）
    #[error("Fit was cancelled")]
    FitCancelled,

    /// 等待拟合完成超时
    #[error("Operation timeout: {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// 机器人状态适配器无法提供所需状态
    #[error("Robot state unavailable: {0}")]
    StateUnavailable(String),

    /// 拟合线程错误（启动失败或 panic）
    #[error("Fit worker error: {0}")]
    Worker(String),
}

//! 航点集合与起点拼接
//!
//! 一个控制层级的航点集合：一条共享的时间序列 + 若干条等长的值通道。
//!
//! - 机身轨迹：1 个通道，值类型为 [`Pose`](crate::types::Pose)
//! - 关节轨迹：每个关节 1 个通道，值类型为 `f64`
//!
//! # 起点拼接
//!
//! [`WaypointSet::splice_start`] 让轨迹从机器人当前状态开始：
//!
//! - `times[0] == 0`：原地覆盖第一个采样值（不改变长度）
//! - 否则：在最前面插入 `(0, start)`，原有采样整体后移一位

use crate::error::MotionError;

/// 起点拼接结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOutcome {
    /// 覆盖了 t=0 处已有的采样
    Overwritten,
    /// 在 t=0 处插入了新采样
    Inserted,
}

/// 航点集合
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointSet<V> {
    times: Vec<f64>,
    channels: Vec<Vec<V>>,
}

impl<V: Clone> WaypointSet<V> {
    /// 创建多通道航点集合
    ///
    /// # 错误
    ///
    /// - 时间序列为空、含非有限值或递减
    /// - 没有通道，或某个通道长度与时间序列不一致
    pub fn new(times: Vec<f64>, channels: Vec<Vec<V>>) -> Result<Self, MotionError> {
        if times.is_empty() {
            return Err(MotionError::InvalidWaypoints("empty time sequence".into()));
        }
        if channels.is_empty() {
            return Err(MotionError::InvalidWaypoints("no value channels".into()));
        }
        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(MotionError::InvalidWaypoints(format!(
                "non-finite time at index {index}"
            )));
        }
        // 起点拼接会在最前面插入 t=0
        if times[0] < 0.0 {
            return Err(MotionError::InvalidWaypoints(format!(
                "negative start time {}",
                times[0]
            )));
        }
        if let Some(index) = times.windows(2).position(|w| w[1] < w[0]) {
            return Err(MotionError::InvalidWaypoints(format!(
                "time sequence decreases at index {}",
                index + 1
            )));
        }
        if let Some((channel, values)) = channels
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != times.len())
        {
            return Err(MotionError::InvalidWaypoints(format!(
                "channel {channel} has {} values for {} times",
                values.len(),
                times.len()
            )));
        }

        Ok(WaypointSet { times, channels })
    }

    /// 创建单通道航点集合
    pub fn single(times: Vec<f64>, values: Vec<V>) -> Result<Self, MotionError> {
        Self::new(times, vec![values])
    }

    /// 采样时间
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// 所有值通道
    pub fn channels(&self) -> &[Vec<V>] {
        &self.channels
    }

    /// 第 `index` 个通道
    pub fn channel(&self, index: usize) -> Option<&[V]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// 通道数（关节数）
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// 采样点数
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// 是否为空（构造成功的集合总是非空）
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// 最后一个采样时间
    pub fn final_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// 用机器人当前状态拼接起点
    ///
    /// `start` 每个通道一个值。长度不匹配时不做任何修改。
    pub fn splice_start(&mut self, start: &[V]) -> Result<SpliceOutcome, MotionError> {
        if start.len() != self.channels.len() {
            return Err(MotionError::InvalidWaypoints(format!(
                "start state has {} channels, waypoints have {}",
                start.len(),
                self.channels.len()
            )));
        }

        if self.times[0] == 0.0 {
            for (values, value) in self.channels.iter_mut().zip(start) {
                values[0] = value.clone();
            }
            Ok(SpliceOutcome::Overwritten)
        } else {
            self.times.insert(0, 0.0);
            for (values, value) in self.channels.iter_mut().zip(start) {
                values.insert(0, value.clone());
            }
            Ok(SpliceOutcome::Inserted)
        }
    }
}

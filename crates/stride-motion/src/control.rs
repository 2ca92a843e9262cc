//! 控制层级与按层级索引的容器
//!
//! 所有"每个控制层级一份"的数据（航点时间、航点值、拟合曲线、激活标志）
//! 都用 [`LevelMap`] 存放，使用 [`ControlLevel`] 做类型安全的索引。
//!
//! # 示例
//!
//! ```rust
//! use stride_motion::control::{ControlLevel, ControlSetup, LevelMap};
//!
//! let setup = ControlSetup::from_levels(&[ControlLevel::Position, ControlLevel::Effort]);
//! assert!(setup.is_active(ControlLevel::Position));
//! assert!(!setup.is_active(ControlLevel::Velocity));
//!
//! let mut times: LevelMap<Vec<f64>> = LevelMap::default();
//! times[ControlLevel::Position].push(0.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// 控制层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlLevel {
    /// 位置（关节角 / 机身位姿）
    Position = 0,
    /// 速度
    Velocity = 1,
    /// 加速度
    Acceleration = 2,
    /// 力矩 / 力
    Effort = 3,
}

impl ControlLevel {
    /// 所有控制层级
    pub const ALL: [ControlLevel; 4] = [
        ControlLevel::Position,
        ControlLevel::Velocity,
        ControlLevel::Acceleration,
        ControlLevel::Effort,
    ];

    /// 获取层级索引（0-3）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 获取层级名称
    pub const fn name(self) -> &'static str {
        match self {
            ControlLevel::Position => "position",
            ControlLevel::Velocity => "velocity",
            ControlLevel::Acceleration => "acceleration",
            ControlLevel::Effort => "effort",
        }
    }
}

impl fmt::Display for ControlLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 按控制层级索引的定长容器
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelMap<T> {
    data: [T; 4],
}

impl<T> LevelMap<T> {
    /// 创建新的层级容器
    #[inline]
    pub const fn new(data: [T; 4]) -> Self {
        LevelMap { data }
    }

    /// 按 (层级, 值) 迭代
    pub fn iter(&self) -> impl Iterator<Item = (ControlLevel, &T)> {
        ControlLevel::ALL.into_iter().zip(self.data.iter())
    }

    /// 按 (层级, 可变值) 迭代
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ControlLevel, &mut T)> {
        ControlLevel::ALL.into_iter().zip(self.data.iter_mut())
    }

    /// 映射每个层级的值
    pub fn map<U, F>(&self, mut f: F) -> LevelMap<U>
    where
        F: FnMut(ControlLevel, &T) -> U,
    {
        LevelMap {
            data: ControlLevel::ALL.map(|level| f(level, &self.data[level.index()])),
        }
    }
}

impl<T> Index<ControlLevel> for LevelMap<T> {
    type Output = T;

    #[inline]
    fn index(&self, level: ControlLevel) -> &T {
        &self.data[level.index()]
    }
}

impl<T> IndexMut<ControlLevel> for LevelMap<T> {
    #[inline]
    fn index_mut(&mut self, level: ControlLevel) -> &mut T {
        &mut self.data[level.index()]
    }
}

/// 控制设置：运动基元实际填充/下发哪些控制层级
///
/// 构造后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlSetup {
    active: [bool; 4],
}

impl ControlSetup {
    /// 从激活层级列表创建
    pub fn from_levels(levels: &[ControlLevel]) -> Self {
        let mut active = [false; 4];
        for level in levels {
            active[level.index()] = true;
        }
        ControlSetup { active }
    }

    /// 仅位置层级
    pub fn position_only() -> Self {
        Self::from_levels(&[ControlLevel::Position])
    }

    /// 层级是否激活
    #[inline]
    pub fn is_active(&self, level: ControlLevel) -> bool {
        self.active[level.index()]
    }

    /// 所有激活的层级（按 Position → Effort 顺序）
    pub fn active_levels(&self) -> impl Iterator<Item = ControlLevel> + '_ {
        ControlLevel::ALL
            .into_iter()
            .filter(|level| self.is_active(*level))
    }

    /// 是否没有任何激活层级
    pub fn is_empty(&self) -> bool {
        !self.active.iter().any(|a| *a)
    }
}

impl fmt::Display for ControlSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.active_levels().map(ControlLevel::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

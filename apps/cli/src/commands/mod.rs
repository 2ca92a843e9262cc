//! 命令定义和实现

pub mod inspect;
pub mod sample;

pub use inspect::InspectCommand;
pub use sample::SampleCommand;

use crate::motion_file::{MotionFile, Motions};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use stride_motion::{BaseMotion, FitConfig, LegMotion, MotionError};
use tracing::{info, warn};

/// 加载运动文件的公共参数
#[derive(Args, Debug, Clone)]
pub struct MotionArgs {
    /// 运动文件（TOML）
    pub file: PathBuf,

    /// 拟合配置文件（TOML）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 等待拟合完成的超时（毫秒）
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// 不使用文件中的起始状态拼接起点
    #[arg(long)]
    pub no_splice: bool,
}

impl MotionArgs {
    /// 加载拟合配置（未指定时使用默认值）
    pub fn fit_config(&self) -> Result<FitConfig> {
        match &self.config {
            Some(path) => FitConfig::load_from_file(path)
                .with_context(|| format!("Failed to load fit config: {}", path.display())),
            None => Ok(FitConfig::default()),
        }
    }

    /// 加载运动文件、拼接起点、计算并等待完成
    pub fn load_and_compute(&self) -> Result<Motions> {
        let config = self.fit_config()?;
        let file = MotionFile::load(&self.file)?;
        let mut motions = file.build(&config)?;

        if !self.no_splice {
            match file.start_state()? {
                Some(state) => {
                    for (i, base) in motions.base.iter_mut().enumerate() {
                        match base.update_start_from(&state) {
                            Ok(()) => {},
                            Err(MotionError::StateUnavailable(what)) => {
                                warn!("base{}: start state lacks {}, keeping waypoints", i, what)
                            },
                            Err(e) => {
                                return Err(e)
                                    .with_context(|| format!("Failed to splice start of base{i}"));
                            },
                        }
                    }
                    for leg in motions.legs.iter_mut() {
                        match leg.update_start_from(&state) {
                            Ok(()) => {},
                            Err(MotionError::StateUnavailable(what)) => {
                                warn!("{}: start state lacks {}, keeping waypoints", leg.limb(), what)
                            },
                            Err(e) => {
                                return Err(e)
                                    .with_context(|| format!("Failed to splice start of {}", leg.limb()));
                            },
                        }
                    }
                },
                None => warn!("Motion file has no start state, skipping splice"),
            }
        }

        for base in motions.base.iter_mut() {
            base.compute()?;
        }
        for leg in motions.legs.iter_mut() {
            leg.compute()?;
        }

        let timeout = Duration::from_millis(self.timeout_ms);
        for leg in &motions.legs {
            leg.wait_until_computed(timeout)
                .with_context(|| format!("Fit of {} did not complete", leg.limb()))?;
        }

        info!(
            "Computed {} base and {} leg motions from {}",
            motions.base.len(),
            motions.legs.len(),
            self.file.display()
        );
        Ok(motions)
    }
}

//! 检查命令
//!
//! 计算运动文件中的所有轨迹并打印概要。

use super::MotionArgs;
use anyhow::Result;
use clap::Args;
use stride_motion::{BaseMotion, LegMotion};

/// 检查命令参数
#[derive(Args, Debug)]
pub struct InspectCommand {
    #[command(flatten)]
    pub motion: MotionArgs,
}

impl InspectCommand {
    /// 执行检查
    pub fn execute(&self) -> Result<()> {
        let motions = self.motion.load_and_compute()?;

        for (i, base) in motions.base.iter().enumerate() {
            println!("📐 base{} ({}, levels {})", i, base.motion_type(), base.control_setup());
            print!("{base}");
        }
        for leg in &motions.legs {
            println!(
                "🦿 {} ({}, levels {}, {} joints)",
                leg.limb(),
                leg.motion_type(),
                leg.control_setup(),
                leg.joint_count()
            );
            print!("{leg}");
        }
        Ok(())
    }
}

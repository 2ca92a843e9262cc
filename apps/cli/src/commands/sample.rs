//! 采样命令
//!
//! 按固定频率在 `[0, duration]` 内对所有轨迹求值，输出 CSV 或 JSON。

use super::MotionArgs;
use crate::motion_file::Motions;
use anyhow::{Context, Result, bail};
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use stride_motion::{BaseMotion, ControlLevel, LegMotion, Pose};

/// 采样命令参数
#[derive(Args, Debug)]
pub struct SampleCommand {
    #[command(flatten)]
    pub motion: MotionArgs,

    /// 采样频率（Hz）
    #[arg(short, long, default_value_t = 100.0)]
    pub rate: f64,

    /// 输出格式（csv / json）
    #[arg(short, long, default_value = "csv")]
    pub format: String,

    /// 输出文件（默认标准输出）
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 单个采样
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64,
    pub motion: String,
    pub level: ControlLevel,
    pub values: Vec<f64>,
}

impl SampleCommand {
    /// 执行采样
    pub fn execute(&self) -> Result<()> {
        if !(self.rate.is_finite() && self.rate > 0.0) {
            bail!("Sample rate must be positive, got {}", self.rate);
        }
        if !matches!(self.format.as_str(), "csv" | "json") {
            bail!("Unknown output format '{}' (expected csv or json)", self.format);
        }

        let motions = self.motion.load_and_compute()?;
        let samples = sample_motions(&motions, self.rate)?;

        let mut writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?,
            )),
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };

        match self.format.as_str() {
            "json" => {
                serde_json::to_writer_pretty(&mut writer, &samples)
                    .context("Failed to serialize samples")?;
                writeln!(writer)?;
            },
            _ => write_csv(&mut writer, &samples)?,
        }
        writer.flush()?;
        Ok(())
    }
}

/// 采样时刻：`0, 1/rate, 2/rate, ...`，最后一个时刻总是 `duration`
pub fn sample_times(duration: f64, rate: f64) -> Vec<f64> {
    let steps = (duration * rate).floor() as usize;
    let mut times: Vec<f64> = (0..=steps).map(|k| k as f64 / rate).collect();
    if times.last().is_some_and(|last| duration - last > 1e-9) {
        times.push(duration);
    }
    times
}

fn pose_values(pose: &Pose) -> Vec<f64> {
    let t = &pose.translation.vector;
    let q = &pose.rotation;
    vec![t.x, t.y, t.z, q.w, q.i, q.j, q.k]
}

/// 在公共时间网格上对所有轨迹求值
pub fn sample_motions(motions: &Motions, rate: f64) -> Result<Vec<Sample>> {
    let duration = motions
        .base
        .iter()
        .map(|m| m.duration())
        .chain(motions.legs.iter().map(|m| m.duration()))
        .fold(0.0, f64::max);

    let mut samples = Vec::new();
    for time in sample_times(duration, rate) {
        for (i, base) in motions.base.iter().enumerate() {
            samples.push(Sample {
                time,
                motion: format!("base{i}"),
                level: ControlLevel::Position,
                values: pose_values(&base.evaluate_pose(time)?),
            });
        }
        for leg in &motions.legs {
            for level in leg.control_setup().active_levels() {
                let values = match level {
                    ControlLevel::Position => leg.evaluate_position(time)?,
                    ControlLevel::Velocity => leg.evaluate_velocity(time)?,
                    ControlLevel::Acceleration => leg.evaluate_acceleration(time)?,
                    ControlLevel::Effort => leg.evaluate_effort(time)?,
                };
                samples.push(Sample {
                    time,
                    motion: leg.limb().to_string(),
                    level,
                    values: values.iter().copied().collect(),
                });
            }
        }
    }
    Ok(samples)
}

/// CSV：`time,motion,level,v0,v1,...`
pub fn write_csv<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    writeln!(writer, "time,motion,level,values")?;
    for sample in samples {
        write!(writer, "{:.6},{},{}", sample.time, sample.motion, sample.level)?;
        for value in &sample.values {
            write!(writer, ",{value:.9}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

//! FitWorker - 后台曲线拟合线程
//!
//! 关节轨迹的拟合在独立线程中完成，`compute()` 立即返回。
//!
//! # 同步机制
//!
//! - **FitSlot**: 拟合结果槽（ArcSwapOption）+ `computed` 原子标志
//!   - 拟合线程先写入曲线，再以 Release 语义置位 `computed`
//!   - 读取方以 Acquire 语义读取 `computed`，看到 true 即可见全部曲线
//! - **代数（generation）**: 每次失效（重新计算、起点拼接）代数加一，
//!   过期拟合线程的结果不会被发布
//! - **FitJob**: 单次拟合的取消标志 + 完成信号（Mutex + Condvar），
//!   提供阻塞式 `wait`，调用方无需忙轮询
//!
//! # 生命周期
//!
//! - 取消：设置取消标志，拟合线程在每个通道拟合前检查
//! - Drop：取消并等待线程退出（有超时上限）
//!
//! 取消只在通道之间生效。单个通道拟合超过 `join_timeout` 时，Drop 记录错误后
//! 不再等待，线程分离并继续运行到该通道结束：它只持有结果槽的 `Arc`，
//! 其结果因代数已过期而被丢弃。

use crate::error::MotionError;
use arc_swap::ArcSwapOption;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// 拟合结果槽
///
/// 由轨迹对象持有，并与当前拟合线程共享。
pub(crate) struct FitSlot<T> {
    /// 当前代数（同时作为发布锁）
    generation: Mutex<u64>,
    /// 已发布的曲线
    curves: ArcSwapOption<T>,
    /// 是否计算完成
    computed: AtomicBool,
}

impl<T> FitSlot<T> {
    /// 创建空槽（未计算）
    pub(crate) fn new() -> Self {
        Self {
            generation: Mutex::new(0),
            curves: ArcSwapOption::empty(),
            computed: AtomicBool::new(false),
        }
    }

    /// 创建已带曲线的槽（用于 clone）
    pub(crate) fn with_curves(curves: Option<T>) -> Self {
        let computed = curves.is_some();
        Self {
            generation: Mutex::new(0),
            curves: ArcSwapOption::new(curves.map(Arc::new)),
            computed: AtomicBool::new(computed),
        }
    }

    /// 使当前曲线失效，返回新的代数
    pub(crate) fn invalidate(&self) -> u64 {
        let mut generation = self.generation.lock();
        *generation += 1;
        self.computed.store(false, Ordering::Release);
        self.curves.store(None);
        *generation
    }

    /// 发布拟合结果
    ///
    /// 仅当 `generation` 仍是当前代数时发布，返回是否发布成功。
    pub(crate) fn publish(&self, generation: u64, curves: T) -> bool {
        let current = self.generation.lock();
        if *current != generation {
            return false;
        }
        self.curves.store(Some(Arc::new(curves)));
        self.computed.store(true, Ordering::Release);
        true
    }

    /// 当前代数
    pub(crate) fn generation(&self) -> u64 {
        *self.generation.lock()
    }

    /// 是否计算完成
    #[inline]
    pub(crate) fn is_computed(&self) -> bool {
        self.computed.load(Ordering::Acquire)
    }

    /// 读取已发布的曲线（未计算时返回 None）
    pub(crate) fn load(&self) -> Option<Arc<T>> {
        if !self.is_computed() {
            return None;
        }
        self.curves.load_full()
    }
}

/// 单次拟合的状态
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FitStatus {
    /// 进行中
    Running,
    /// 已完成并发布
    Done,
    /// 失败
    Failed(MotionError),
    /// 被取消或被新拟合取代
    Cancelled,
}

/// 单次拟合任务的共享状态
pub(crate) struct FitJob {
    cancelled: AtomicBool,
    status: Mutex<FitStatus>,
    finished: Condvar,
}

impl FitJob {
    fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            status: Mutex::new(FitStatus::Running),
            finished: Condvar::new(),
        }
    }

    /// 是否已请求取消
    #[inline]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// 已请求取消时返回 `FitCancelled`
    pub(crate) fn check_cancelled(&self) -> Result<(), MotionError> {
        if self.is_cancelled() {
            Err(MotionError::FitCancelled)
        } else {
            Ok(())
        }
    }

    fn finish(&self, status: FitStatus) {
        let mut current = self.status.lock();
        *current = status;
        self.finished.notify_all();
    }
}

/// 保证拟合线程退出时（包括 panic）完成信号一定被设置
struct CompletionGuard<'a> {
    job: &'a FitJob,
    status: Option<FitStatus>,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        let status = self
            .status
            .take()
            .unwrap_or_else(|| FitStatus::Failed(MotionError::Worker("fit panicked".into())));
        self.job.finish(status);
    }
}

/// 后台拟合线程句柄
pub(crate) struct FitWorker {
    handle: Option<JoinHandle<()>>,
    job: Arc<FitJob>,
    generation: u64,
    join_timeout: Duration,
}

impl FitWorker {
    /// 启动拟合线程
    ///
    /// # 参数
    ///
    /// - `name`: 线程名后缀（用于日志）
    /// - `slot`: 结果槽
    /// - `generation`: 本次拟合对应的代数
    /// - `join_timeout`: Drop / shutdown 时等待线程退出的上限
    /// - `fit`: 拟合函数，应在每个通道前调用 `FitJob::check_cancelled`
    pub(crate) fn spawn<T, F>(
        name: &str,
        slot: Arc<FitSlot<T>>,
        generation: u64,
        join_timeout: Duration,
        fit: F,
    ) -> Result<Self, MotionError>
    where
        T: Send + Sync + 'static,
        F: FnOnce(&FitJob) -> Result<T, MotionError> + Send + 'static,
    {
        let job = Arc::new(FitJob::new());
        let job_clone = job.clone();
        let thread_name = format!("stride-fit-{name}");
        let log_name = thread_name.clone();

        let handle = thread::Builder::new()
            .name(thread_name)
            .spawn(move || {
                let mut guard = CompletionGuard {
                    job: &job_clone,
                    status: None,
                };
                let started = Instant::now();

                let status = match fit(&job_clone) {
                    Ok(_) if job_clone.is_cancelled() => FitStatus::Cancelled,
                    Ok(curves) => {
                        if slot.publish(generation, curves) {
                            info!("{}: fit completed in {:?}", log_name, started.elapsed());
                            FitStatus::Done
                        } else {
                            warn!("{}: fit superseded, result discarded", log_name);
                            FitStatus::Cancelled
                        }
                    },
                    Err(MotionError::FitCancelled) => {
                        warn!("{}: fit cancelled", log_name);
                        FitStatus::Cancelled
                    },
                    Err(e) => {
                        error!("{}: fit failed: {}", log_name, e);
                        FitStatus::Failed(e)
                    },
                };
                guard.status = Some(status);
            })
            .map_err(|e| MotionError::Worker(format!("failed to spawn fit thread: {e}")))?;

        Ok(Self {
            handle: Some(handle),
            job,
            generation,
            join_timeout,
        })
    }

    /// 请求取消（不阻塞）
    pub(crate) fn cancel(&self) {
        self.job.cancelled.store(true, Ordering::Release);
    }

    /// 拟合是否仍在进行且未被取消
    pub(crate) fn is_running(&self) -> bool {
        !self.job.is_cancelled() && *self.job.status.lock() == FitStatus::Running
    }

    /// 本次拟合对应的代数
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// 当前状态
    pub(crate) fn status(&self) -> FitStatus {
        self.job.status.lock().clone()
    }

    /// 阻塞等待拟合结束
    ///
    /// 超时返回 `None`。`timeout` 大到无法表示截止时刻时（如 `Duration::MAX`）无限等待。
    pub(crate) fn wait(&self, timeout: Duration) -> Option<FitStatus> {
        let mut status = self.job.status.lock();
        match Instant::now().checked_add(timeout) {
            Some(deadline) => {
                while *status == FitStatus::Running {
                    if self.job.finished.wait_until(&mut status, deadline).timed_out() {
                        break;
                    }
                }
            },
            None => {
                while *status == FitStatus::Running {
                    self.job.finished.wait(&mut status);
                }
            },
        }
        match &*status {
            FitStatus::Running => None,
            other => Some(other.clone()),
        }
    }

    /// 取消并等待线程退出
    ///
    /// 最多等待 `join_timeout`，超时后线程分离（见模块文档）。
    pub(crate) fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.cancel();
        let Some(handle) = self.handle.take() else {
            return;
        };

        // 完成信号在线程退出前设置，之后 join 只需等待线程收尾
        if self.wait(self.join_timeout).is_none() {
            error!(
                "Fit thread failed to shut down within {:?}, detaching",
                self.join_timeout
            );
            return;
        }
        if handle.join().is_err() {
            error!("Fit thread panicked");
        }
    }
}

impl Drop for FitWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_publish_and_invalidate() {
        let slot: FitSlot<u32> = FitSlot::new();
        assert!(!slot.is_computed());
        assert!(slot.load().is_none());

        let generation = slot.invalidate();
        assert!(slot.publish(generation, 42));
        assert!(slot.is_computed());
        assert_eq!(*slot.load().unwrap(), 42);

        slot.invalidate();
        assert!(!slot.is_computed());
        assert!(slot.load().is_none());
    }

    #[test]
    fn test_slot_rejects_stale_generation() {
        let slot: FitSlot<u32> = FitSlot::new();
        let stale = slot.invalidate();
        slot.invalidate();

        assert!(!slot.publish(stale, 1));
        assert!(!slot.is_computed());
    }

    #[test]
    fn test_worker_publishes_result() {
        let slot = Arc::new(FitSlot::new());
        let generation = slot.invalidate();

        let worker = FitWorker::spawn("test", slot.clone(), generation, Duration::from_secs(1), |_| {
            Ok(7u32)
        })
        .unwrap();

        assert_eq!(worker.wait(Duration::from_secs(1)), Some(FitStatus::Done));
        assert_eq!(*slot.load().unwrap(), 7);
        worker.shutdown();
    }

    #[test]
    fn test_worker_wait_without_deadline() {
        let slot = Arc::new(FitSlot::new());
        let generation = slot.invalidate();

        let worker = FitWorker::spawn("test", slot.clone(), generation, Duration::from_secs(1), |_| {
            thread::sleep(Duration::from_millis(20));
            Ok(3u32)
        })
        .unwrap();

        assert_eq!(worker.generation(), generation);
        assert_eq!(worker.wait(Duration::MAX), Some(FitStatus::Done));
        assert_eq!(*slot.load().unwrap(), 3);
    }

    #[test]
    fn test_worker_detaches_after_join_timeout() {
        let slot: Arc<FitSlot<u32>> = Arc::new(FitSlot::new());
        let generation = slot.invalidate();

        // 忽略取消标志的长时间拟合
        let worker = FitWorker::spawn("test", slot.clone(), generation, Duration::from_millis(20), |_| {
            thread::sleep(Duration::from_millis(300));
            Ok(5u32)
        })
        .unwrap();

        let start = Instant::now();
        drop(worker);
        assert!(start.elapsed() < Duration::from_millis(250));

        // 分离的线程结束后结果不会被发布
        thread::sleep(Duration::from_millis(400));
        assert!(!slot.is_computed());
    }

    #[test]
    fn test_worker_reports_failure() {
        let slot: Arc<FitSlot<u32>> = Arc::new(FitSlot::new());
        let generation = slot.invalidate();

        let worker = FitWorker::spawn("test", slot.clone(), generation, Duration::from_secs(1), |_| {
            Err(MotionError::InvalidWaypoints("bad".into()))
        })
        .unwrap();

        assert_eq!(
            worker.wait(Duration::from_secs(1)),
            Some(FitStatus::Failed(MotionError::InvalidWaypoints(
                "bad".into()
            )))
        );
        assert!(!slot.is_computed());
    }

    #[test]
    fn test_worker_panic_sets_failed() {
        let slot: Arc<FitSlot<u32>> = Arc::new(FitSlot::new());
        let generation = slot.invalidate();

        let worker = FitWorker::spawn("test", slot.clone(), generation, Duration::from_secs(1), |_| {
            panic!("boom")
        })
        .unwrap();

        assert!(matches!(
            worker.wait(Duration::from_secs(1)),
            Some(FitStatus::Failed(MotionError::Worker(_)))
        ));
        // Drop 时 join 到 panic 的线程只记录日志
        drop(worker);
    }

    #[test]
    fn test_worker_cancel() {
        let slot: Arc<FitSlot<u32>> = Arc::new(FitSlot::new());
        let generation = slot.invalidate();

        let worker = FitWorker::spawn("test", slot.clone(), generation, Duration::from_secs(1), |job| {
            while !job.is_cancelled() {
                thread::sleep(Duration::from_millis(1));
            }
            job.check_cancelled()?;
            Ok(1u32)
        })
        .unwrap();

        assert!(worker.is_running());
        assert_eq!(worker.wait(Duration::from_millis(20)), None);

        worker.cancel();
        assert!(!worker.is_running());
        assert_eq!(
            worker.wait(Duration::from_secs(1)),
            Some(FitStatus::Cancelled)
        );
        assert_eq!(worker.status(), FitStatus::Cancelled);
        assert!(!slot.is_computed());
    }

    #[test]
    fn test_worker_drop_joins() {
        let slot: Arc<FitSlot<u32>> = Arc::new(FitSlot::new());
        let generation = slot.invalidate();

        let worker = FitWorker::spawn("test", slot, generation, Duration::from_secs(1), |job| {
            while !job.is_cancelled() {
                thread::sleep(Duration::from_millis(1));
            }
            Err(MotionError::FitCancelled)
        })
        .unwrap();

        let start = Instant::now();
        drop(worker);
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}

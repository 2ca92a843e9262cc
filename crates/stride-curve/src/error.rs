//! 曲线拟合错误类型定义

use thiserror::Error;

/// 曲线拟合错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// 没有任何采样点
    #[error("Cannot fit a curve without samples")]
    Empty,

    /// 时间序列与值序列长度不一致
    #[error("Sample length mismatch: {times} times, {values} values")]
    LengthMismatch { times: usize, values: usize },

    /// 时间序列递减
    #[error("Sample times must be non-decreasing (violated at index {index})")]
    NonMonotonicTime { index: usize },

    /// 出现 NaN 或无穷大
    #[error("Non-finite sample at index {index}")]
    NonFinite { index: usize },
}

#[cfg(test)]
mod tests {
    use super::CurveError;

    #[test]
    fn test_curve_error_display() {
        assert_eq!(
            format!("{}", CurveError::Empty),
            "Cannot fit a curve without samples"
        );

        let msg = format!(
            "{}",
            CurveError::LengthMismatch {
                times: 3,
                values: 2
            }
        );
        assert!(msg.contains("3 times") && msg.contains("2 values"));

        let msg = format!("{}", CurveError::NonMonotonicTime { index: 4 });
        assert!(msg.contains("non-decreasing") && msg.contains('4'));

        let msg = format!("{}", CurveError::NonFinite { index: 1 });
        assert!(msg.contains("Non-finite"));
    }
}

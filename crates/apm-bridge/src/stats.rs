//! Audio processing statistics.

/// Statistics as reported by the engine.
///
/// All fields are `Option`. `None` indicates the statistic is unavailable
/// (e.g. because the relevant component is disabled or has not converged).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineStats {
    /// Echo Return Loss in dB: `ERL = 10 log10(P_far / P_echo)`.
    pub echo_return_loss: Option<f64>,
    /// Echo Return Loss Enhancement in dB: `ERLE = 10 log10(P_echo / P_out)`.
    pub echo_return_loss_enhancement: Option<f64>,
    /// Fraction of time that the linear echo filter is divergent, in a
    /// 1-second non-overlapping aggregation window.
    pub divergent_filter_fraction: Option<f64>,
    /// Median delay estimate in milliseconds.
    pub delay_median_ms: Option<i32>,
    /// Standard deviation of the delay estimate in milliseconds.
    pub delay_standard_deviation_ms: Option<i32>,
    /// Residual echo detector likelihood in `[0.0, 1.0]`.
    pub residual_echo_likelihood: Option<f64>,
    /// Maximum residual echo likelihood from the last time period.
    pub residual_echo_likelihood_recent_max: Option<f64>,
    /// Instantaneous delay estimate in milliseconds.
    pub delay_ms: Option<i32>,
}

/// Snapshot of the engine statistics taken after the latest capture frame.
///
/// Every field is zero when the engine has not produced a value for it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Statistics {
    /// Echo Return Loss in dB.
    pub echo_return_loss: f64,
    /// Echo Return Loss Enhancement in dB.
    pub echo_return_loss_enhancement: f64,
    /// Fraction of time the linear echo filter was divergent.
    pub divergent_filter_fraction: f64,
    /// Residual echo likelihood in `[0.0, 1.0]`.
    pub residual_echo_likelihood: f64,
    /// Median delay estimate in milliseconds.
    pub delay_median_ms: i32,
    /// Standard deviation of the delay estimate in milliseconds.
    pub delay_std_ms: i32,
    /// Instantaneous delay estimate in milliseconds.
    pub delay_ms: i32,
}

impl From<&EngineStats> for Statistics {
    fn from(stats: &EngineStats) -> Self {
        Self {
            echo_return_loss: stats.echo_return_loss.unwrap_or(0.0),
            echo_return_loss_enhancement: stats.echo_return_loss_enhancement.unwrap_or(0.0),
            divergent_filter_fraction: stats.divergent_filter_fraction.unwrap_or(0.0),
            residual_echo_likelihood: stats.residual_echo_likelihood.unwrap_or(0.0),
            delay_median_ms: stats.delay_median_ms.unwrap_or(0),
            delay_std_ms: stats.delay_standard_deviation_ms.unwrap_or(0),
            delay_ms: stats.delay_ms.unwrap_or(0),
        }
    }
}

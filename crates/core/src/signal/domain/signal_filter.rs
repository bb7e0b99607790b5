/// Domain interface for whole-signal filtering.
///
/// Implementations receive the complete series at once so they may run
/// non-causally (e.g. forward and backward for zero phase).
pub trait SignalFilter: Send + Sync {
    fn apply(&self, signal: &[f64]) -> Vec<f64>;
}

/// Returns the input unchanged. Stands in when a real filter cannot be
/// designed for the configured sampling rate.
pub struct PassthroughFilter;

impl SignalFilter for PassthroughFilter {
    fn apply(&self, signal: &[f64]) -> Vec<f64> {
        signal.to_vec()
    }
}

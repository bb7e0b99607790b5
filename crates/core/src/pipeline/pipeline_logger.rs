use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for estimation pipeline events.
///
/// Keeps use cases free of any particular output: the CLI routes events
/// through `log`, tests discard them.
pub trait PipelineLogger: Send {
    /// Frames consumed so far out of the capture limit.
    fn progress(&mut self, current: usize, total: usize);

    /// Duration of one named stage, in milliseconds.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Point-in-time measurement (e.g. ROI mean intensity).
    fn metric(&mut self, name: &str, value: f64);

    /// A frame was dropped before estimation.
    fn rejection(&mut self, frame_index: usize, reason: &str);

    fn info(&mut self, message: &str);

    /// End-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards every event.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn rejection(&mut self, _frame_index: usize, _reason: &str) {}
    fn info(&mut self, _message: &str) {}
}

/// Forwards events to the `log` facade and keeps aggregates for a closing
/// summary.
///
/// Progress lines are emitted every `throttle_frames` frames.
pub struct LogPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, Vec<f64>>,
    metrics: BTreeMap<String, Vec<f64>>,
    rejections: BTreeMap<String, usize>,
    frames_seen: usize,
    start_time: Instant,
}

impl LogPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            rejections: BTreeMap::new(),
            frames_seen: 0,
            start_time: Instant::now(),
        }
    }

    /// Formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() && self.rejections.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Estimation summary ({} frames, {elapsed_s:.2}s):",
            self.frames_seen
        )];

        for (stage, durations) in &self.timings {
            let total_ms: f64 = durations.iter().sum();
            lines.push(format!(
                "  {stage:10}: avg {:6.2}ms  total {total_ms:8.1}ms",
                mean(durations)
            ));
        }
        for (name, values) in &self.metrics {
            lines.push(format!("  {name}: avg {:.1}", mean(values)));
        }
        let rejected: usize = self.rejections.values().sum();
        if rejected > 0 {
            let detail: Vec<String> = self
                .rejections
                .iter()
                .map(|(reason, count)| format!("{reason} x{count}"))
                .collect();
            lines.push(format!("  rejected {rejected} frames: {}", detail.join(", ")));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }

    pub fn rejections_for(&self, reason: &str) -> usize {
        self.rejections.get(reason).copied().unwrap_or(0)
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = current;
        if total > 0 && (current % self.throttle_frames == 0 || current == total) {
            log::info!("Reading frames: {current}/{total}");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn rejection(&mut self, frame_index: usize, reason: &str) {
        *self.rejections.entry(reason.to_string()).or_default() += 1;
        log::debug!("Frame {frame_index} rejected: {reason}");
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_accepts_everything() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("extract", 5.0);
        logger.metric("roi_mean", 3.0);
        logger.rejection(4, "no face");
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_and_metric_recorded() {
        let mut logger = LogPipelineLogger::new(10);
        logger.timing("extract", 2.0);
        logger.timing("extract", 4.0);
        logger.metric("roi_mean", 100.0);

        assert_eq!(logger.timings_for("extract"), Some(&[2.0, 4.0][..]));
        assert_eq!(logger.metrics_for("roi_mean"), Some(&[100.0][..]));
        assert!(logger.timings_for("estimate").is_none());
    }

    #[test]
    fn test_rejections_counted_by_reason() {
        let mut logger = LogPipelineLogger::new(10);
        logger.rejection(0, "no face");
        logger.rejection(3, "no face");
        logger.rejection(5, "empty crop");
        assert_eq!(logger.rejections_for("no face"), 2);
        assert_eq!(logger.rejections_for("empty crop"), 1);
        assert_eq!(logger.rejections_for("degenerate"), 0);
    }

    #[test]
    fn test_summary_contents() {
        let mut logger = LogPipelineLogger::new(10);
        logger.progress(40, 100);
        logger.timing("estimate", 1.5);
        logger.metric("roi_mean", 90.0);
        logger.metric("roi_mean", 110.0);
        logger.rejection(2, "no face");

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Estimation summary (40 frames"));
        assert!(summary.contains("estimate"));
        assert!(summary.contains("roi_mean: avg 100.0"));
        assert!(summary.contains("rejected 1 frames: no face x1"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogPipelineLogger::default().summary_string().is_none());
    }

    #[test]
    fn test_default_throttle() {
        assert_eq!(LogPipelineLogger::default().throttle_frames, 10);
    }
}

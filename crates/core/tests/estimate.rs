use std::f64::consts::PI;
use std::path::Path;

use approx::assert_relative_eq;
use ndarray::Array2;
use rstest::rstest;

use pulsecheck_core::detection::infrastructure::fixed_region_detector::FixedRegionDetector;
use pulsecheck_core::detection::infrastructure::region_file_detector::RegionFileDetector;
use pulsecheck_core::pipeline::estimate_vitals_use_case::{EstimateVitalsUseCase, VitalsError};
use pulsecheck_core::pipeline::pipeline_logger::NullPipelineLogger;
use pulsecheck_core::shared::region::FaceRegion;
use pulsecheck_core::video::infrastructure::image_sequence_reader::ImageSequenceReader;
use pulsecheck_core::{estimate, EstimatorParameters, HeartMetricsEstimator, MetricsResult};

fn pulse(freq_hz: f64, fps: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 10.0 * (2.0 * PI * freq_hz * i as f64 / fps).sin())
        .collect()
}

fn rois_from(values: &[f64]) -> Vec<Array2<u8>> {
    values
        .iter()
        .map(|&v| Array2::from_elem((3, 5), v.round() as u8))
        .collect()
}

/// 20x20 RGB frames whose green channel carries the pulse.
fn write_capture(dir: &Path, greens: &[f64]) {
    for (i, &g) in greens.iter().enumerate() {
        let img = image::RgbImage::from_pixel(20, 20, image::Rgb([180, g.round() as u8, 90]));
        img.save(dir.join(format!("frame_{i:04}.png"))).unwrap();
    }
}

#[test]
fn constant_forehead_gives_all_zero() {
    let rois = vec![Array2::from_elem((4, 4), 100u8); 40];
    assert_eq!(estimate(&rois, 10.0), MetricsResult::default());
}

#[rstest]
#[case::empty(0)]
#[case::one(1)]
#[case::two(2)]
fn too_short_capture_gives_all_zero(#[case] n: usize) {
    assert!(estimate(&rois_from(&pulse(1.2, 10.0, n)), 10.0).is_all_zero());
}

#[rstest]
#[case(10)]
#[case(64)]
#[case(301)]
fn black_forehead_gives_all_zero(#[case] n: usize) {
    let rois = vec![Array2::<u8>::zeros((4, 4)); n];
    assert!(estimate(&rois, 10.0).is_all_zero());
}

#[test]
fn resting_pulse_at_capture_rate() {
    let result = estimate(&rois_from(&pulse(1.2, 10.0, 80)), 10.0);
    assert_relative_eq!(result.avg_heart_rate, 72.0, max_relative = 0.05);
    assert!(result.sdnn > 0.0);
    assert!(result.rmssd > 0.0);
    assert!(result.bsi > 0.0);
    assert!(result.lf_hf_ratio.is_finite() && result.lf_hf_ratio > 0.0);
}

#[rstest]
#[case(0.8)]
#[case(1.0)]
#[case(1.5)]
#[case(2.5)]
fn pulse_frequency_is_recovered(#[case] freq_hz: f64) {
    let estimator = HeartMetricsEstimator::new(EstimatorParameters::new(30.0));
    let report = estimator.estimate_signal(&pulse(freq_hz, 30.0, 600));
    assert_relative_eq!(
        report.avg_heart_rate.value().unwrap(),
        60.0 * freq_hz,
        max_relative = 0.05
    );
}

#[test]
fn estimator_is_shareable_across_threads() {
    let estimator = std::sync::Arc::new(HeartMetricsEstimator::new(EstimatorParameters::new(10.0)));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let estimator = estimator.clone();
            std::thread::spawn(move || estimator.estimate_signal(&pulse(1.2, 10.0, 80)).to_result())
        })
        .collect();
    let results: Vec<MetricsResult> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn image_sequence_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path(), &pulse(1.2, 10.0, 80));

    let mut use_case = EstimateVitalsUseCase::new(
        Box::new(ImageSequenceReader::new(10.0)),
        Box::new(FixedRegionDetector::new(FaceRegion::new(2, 0, 15, 20))),
        HeartMetricsEstimator::new(EstimatorParameters::new(10.0)),
        Box::new(NullPipelineLogger),
    );
    let vitals = use_case.execute(dir.path()).unwrap();

    assert_eq!(vitals.frames_read, 80);
    assert_eq!(vitals.extraction.accepted, 80);
    assert_eq!(vitals.metadata.width, 20);
    assert_relative_eq!(vitals.result().avg_heart_rate, 72.0, max_relative = 0.05);
}

#[test]
fn corrupt_frame_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path(), &pulse(1.2, 10.0, 80));
    std::fs::write(dir.path().join("frame_0040.png"), b"not a png").unwrap();

    let mut use_case = EstimateVitalsUseCase::new(
        Box::new(ImageSequenceReader::new(10.0)),
        Box::new(FixedRegionDetector::new(FaceRegion::new(2, 0, 15, 20))),
        HeartMetricsEstimator::new(EstimatorParameters::new(10.0)),
        Box::new(NullPipelineLogger),
    );
    let vitals = use_case.execute(dir.path()).unwrap();

    assert_eq!(vitals.frames_read, 80);
    assert_eq!(vitals.extraction.accepted, 79);
    assert_eq!(vitals.extraction.unreadable, 1);
    assert_eq!(vitals.estimation.sample_count, 79);
    assert_relative_eq!(vitals.result().avg_heart_rate, 72.0, max_relative = 0.05);
}

#[test]
fn region_file_with_gaps_rejects_missing_frames() {
    let dir = tempfile::tempdir().unwrap();
    write_capture(dir.path(), &pulse(1.2, 10.0, 40));

    // Boxes for the first 25 frames only.
    let entries: Vec<String> = (0..25)
        .map(|i| format!(r#"{{"frame": {i}, "x": 0, "y": 0, "w": 20, "h": 20}}"#))
        .collect();
    let detector = RegionFileDetector::from_json(&format!("[{}]", entries.join(","))).unwrap();

    let mut use_case = EstimateVitalsUseCase::new(
        Box::new(ImageSequenceReader::new(10.0)),
        Box::new(detector),
        HeartMetricsEstimator::new(EstimatorParameters::new(10.0)),
        Box::new(NullPipelineLogger),
    );
    match use_case.execute(dir.path()) {
        Err(VitalsError::InsufficientFrames {
            collected,
            required,
        }) => {
            assert_eq!(collected, 25);
            assert_eq!(required, 30);
        }
        other => panic!("expected InsufficientFrames, got {other:?}"),
    }
}

//! Remote photoplethysmography: heart rate and heart-rate variability from
//! the colour of a face's forehead across a sequence of camera frames.

pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod metrics;
    pub mod parameters;
    pub mod region;
    pub mod video_metadata;
}

pub mod roi {
    pub mod domain {
        pub mod forehead_extractor;
    }
}

pub mod signal {
    pub mod domain {
        pub mod peak_detector;
        pub mod preprocessor;
        pub mod signal_assembler;
        pub mod signal_filter;
    }
    pub mod infrastructure;
}

pub mod heart_rate {
    pub mod domain {
        pub mod windowed_estimator;
    }
}

pub mod hrv {
    pub mod domain {
        pub mod frequency_domain;
        pub mod ibi;
        pub mod time_domain;
    }
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod video {
    pub mod domain {
        pub mod frame_reader;
    }
    pub mod infrastructure {
        pub mod image_sequence_reader;
    }
}

pub mod pipeline {
    pub mod estimate_vitals_use_case;
    pub mod heart_metrics_estimator;
    pub mod pipeline_logger;
}

pub use pipeline::heart_metrics_estimator::{estimate, HeartMetricsEstimator};
pub use shared::metrics::{EstimationReport, Metric, MetricsResult, Undetermined};
pub use shared::parameters::EstimatorParameters;

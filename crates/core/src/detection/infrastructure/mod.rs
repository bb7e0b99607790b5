pub mod fixed_region_detector;
pub mod region_file_detector;

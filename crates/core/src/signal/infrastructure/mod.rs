pub mod butterworth_bandpass;
pub mod filter_factory;

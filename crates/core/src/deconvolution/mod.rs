//! Deconvolution runner.
//!
//! Invokes DIA-Umpire SE on each converted spectrum:
//!
//! ```text
//! java -jar -Xmx8G DIA_Umpire_SE.jar raw/<x>.mzML umpire-se.params
//! ```
//!
//! DIA-Umpire writes its quality-tier outputs (`<x>_Q1.mgf`, ...) and a pile
//! of intermediates next to the input; the cleaner and mover stages sort those
//! out afterwards.

mod runner;

pub use runner::{
    dedupe, sample_log_path, DeconvolutionOutcome, DeconvolutionRunner, SAMPLE_LOG_SUFFIX,
};

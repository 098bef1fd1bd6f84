//! Search orchestrator.
//!
//! Rebuilds the set of searchable quality-tier fragments from `processed/`
//! and hands them to SearchGUI in a single batch:
//!
//! ```text
//! java -cp SearchGUI.jar eu.isas.searchgui.cmd.SearchCLI
//!     -spectrum_files a_Q1.mgf,b_Q1.mgf -fasta_file database.fasta
//!     -output_folder searched -id_params search.par -xtandem 1
//!     -output_default_name <ref> -output_data 1
//! ```
//!
//! Selection works on a single directory snapshot. Stems ending in
//! `_PeakCluster`, `.cms` or `.mzML` are never searched; zero-byte or missing
//! fragments are excluded with their reason.

mod error;
mod orchestrator;
mod selection;

pub use error::SearchError;
pub use orchestrator::{
    join_paths, SearchOrchestrator, SearchResult, SEARCH_CLI_CLASS, SEARCH_LOG_FILE,
};
pub use selection::{
    refresh_inputs, select_from_entries, select_searchable, Exclusion, ExclusionReason,
    Selection, DISQUALIFYING_MARKERS,
};

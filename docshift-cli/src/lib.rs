// Docshift CLI Library
//
// Batch-driver utilities shared by the docshift binary.

pub mod batch;
pub mod report;

pub use batch::convert_path;
pub use report::{BatchReport, DocumentOutcome, OutcomeStatus};

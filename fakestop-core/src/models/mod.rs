pub mod analysis;
pub mod verdict;

pub use analysis::{AnalysisDocuments, AnalysisRecord, NewAnalysis};
pub use verdict::Verdict;

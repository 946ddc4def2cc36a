// Modules
pub mod binning;
pub mod config;
pub mod data;
pub mod ensemble;
pub mod errors;
pub mod evaluator;
pub mod objective;
pub mod propagator;
pub mod ranking;
pub mod statistics;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use config::{ImportanceConfig, ModelIO};
pub use data::{Matrix, Pool};
pub use ensemble::Ensemble;
pub use evaluator::{get_document_importances, DocumentImportanceEvaluator, DocumentImportances};
pub use propagator::UpdateMethod;
pub use ranking::{DocumentImportanceRanking, DocumentStrength, ImportanceValuesSign};
pub use statistics::{TreeStatistics, TreeStatisticsStore};

//! Errors
//!
//! Custom error types used throughout the `leaf-influence` crate.
use thiserror::Error;

/// Errors that can occur while evaluating document importances.
#[derive(Debug, Error)]
pub enum InfluenceError {
    /// Unable to write model or config to file.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
    /// Unable to read model or config from file.
    #[error("Unable to read from a file {0}")]
    UnableToRead(String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// The number of leaves of a tree does not match its depth.
    #[error("Tree {tree} has depth {depth}, so it must have {expected} leaves, but {found} were provided.")]
    InvalidTreeShape {
        tree: usize,
        depth: usize,
        expected: usize,
        found: usize,
    },
    /// A tree is too deep for its leaf ids to fit in a `u32`.
    #[error("Tree {tree} has depth {depth}, but at most {max_depth} is supported.")]
    TreeTooDeep { tree: usize, depth: usize, max_depth: usize },
    /// A leaf id does not fit in the tree it belongs to.
    #[error("Leaf index {leaf} of document {doc} is out of range for tree {tree} with {leaf_count} leaves.")]
    LeafIndexOutOfRange {
        tree: usize,
        doc: usize,
        leaf: u32,
        leaf_count: usize,
    },
    /// A split references a feature the data does not have.
    #[error("Split references feature {feature}, but the data only has {n_features} columns.")]
    FeatureOutOfRange { feature: usize, n_features: usize },
    /// Two collections that must agree in length do not.
    #[error("Dimension mismatch for {0}: expected {1}, found {2}.")]
    DimensionMismatch(String, usize, usize),
    /// A leaf value update formula would divide by zero.
    #[error("Formula denominator is zero for tree {tree}, iteration {iteration}, leaf {leaf}.")]
    ZeroDenominator { tree: usize, iteration: usize, leaf: usize },
    /// The worker pool could not be created.
    #[error("Unable to build thread pool: {0}")]
    ThreadPool(String),
}

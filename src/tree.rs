//! Oblivious trees
//!
//! Every level of an oblivious tree applies the same split to all documents,
//! so a tree of depth `d` is fully described by `d` splits and `2^d` leaf values.
use crate::data::Matrix;
use crate::errors::InfluenceError;
use serde::{Deserialize, Serialize};

/// Deepest tree whose leaf ids fit in a `u32`.
pub const MAX_DEPTH: usize = 31;

/// A binary split condition, `value > border` sends a document right.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Split {
    pub feature: usize,
    pub border: f64,
}

impl Split {
    pub fn new(feature: usize, border: f64) -> Self {
        Split { feature, border }
    }

    #[inline]
    pub fn is_true(&self, value: f64) -> bool {
        value > self.border
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ObliviousTree {
    /// Split of level `k` decides bit `k` of the leaf id.
    pub splits: Vec<Split>,
    pub leaf_values: Vec<f64>,
}

impl ObliviousTree {
    pub fn new(splits: Vec<Split>, leaf_values: Vec<f64>) -> Self {
        ObliviousTree { splits, leaf_values }
    }

    pub fn depth(&self) -> usize {
        self.splits.len()
    }

    pub fn leaf_count(&self) -> usize {
        1 << self.splits.len()
    }

    /// Check the depth is supported and the number of leaf values matches it.
    ///
    /// * `tree_id` - Position of the tree in the ensemble, used for reporting.
    pub fn validate(&self, tree_id: usize) -> Result<(), InfluenceError> {
        if self.depth() > MAX_DEPTH {
            return Err(InfluenceError::TreeTooDeep {
                tree: tree_id,
                depth: self.depth(),
                max_depth: MAX_DEPTH,
            });
        }
        if self.leaf_values.len() != self.leaf_count() {
            return Err(InfluenceError::InvalidTreeShape {
                tree: tree_id,
                depth: self.depth(),
                expected: self.leaf_count(),
                found: self.leaf_values.len(),
            });
        }
        Ok(())
    }

    /// Leaf id of a single row of raw feature values.
    pub fn leaf_index_from_row(&self, row: &[f64]) -> u32 {
        self.splits
            .iter()
            .enumerate()
            .fold(0_u32, |idx, (level, split)| {
                idx | (u32::from(split.is_true(row[split.feature])) << level)
            })
    }

    fn leaf_index(&self, data: &Matrix<f64>, row: usize) -> u32 {
        self.splits
            .iter()
            .enumerate()
            .fold(0_u32, |idx, (level, split)| {
                idx | (u32::from(split.is_true(*data.get(row, split.feature))) << level)
            })
    }

    /// Predict the leaf value of every row of the data.
    pub fn predict(&self, data: &Matrix<f64>) -> Vec<f64> {
        (0..data.rows)
            .map(|row| self.leaf_values[self.leaf_index(data, row) as usize])
            .collect()
    }
}

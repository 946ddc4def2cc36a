//! Binarization and leaf index calculation.
//!
//! Every distinct split used anywhere in the ensemble becomes one binary
//! column. A document's leaf id in a tree is then assembled from the columns
//! of that tree's splits, without looking at raw feature values again.
use crate::data::Matrix;
use crate::ensemble::Ensemble;
use crate::errors::InfluenceError;
use hashbrown::HashMap;
use rayon::prelude::*;

#[derive(Debug)]
pub struct BinarizedFeatures {
    /// One column per unique split, 1 when `value > border`.
    pub columns: Vec<Vec<u8>>,
    /// For every tree, the column of the split at each level.
    pub tree_columns: Vec<Vec<usize>>,
    pub doc_count: usize,
}

impl BinarizedFeatures {
    /// Binarize the data against all splits of the ensemble.
    ///
    /// * `ensemble` - Ensemble providing the splits.
    /// * `data` - Column major feature matrix, one row per document.
    pub fn new(ensemble: &Ensemble, data: &Matrix<f64>) -> Result<Self, InfluenceError> {
        data.validate()?;
        // (feature, border bits) -> column
        let mut unique: HashMap<(usize, u64), usize> = HashMap::new();
        let mut splits = Vec::new();
        let mut tree_columns = Vec::with_capacity(ensemble.tree_count());
        for (tree_id, tree) in ensemble.trees.iter().enumerate() {
            tree.validate(tree_id)?;
            let mut columns = Vec::with_capacity(tree.depth());
            for split in &tree.splits {
                if split.feature >= data.cols {
                    return Err(InfluenceError::FeatureOutOfRange {
                        feature: split.feature,
                        n_features: data.cols,
                    });
                }
                let col = *unique.entry((split.feature, split.border.to_bits())).or_insert_with(|| {
                    splits.push(*split);
                    splits.len() - 1
                });
                columns.push(col);
            }
            tree_columns.push(columns);
        }

        let columns: Vec<Vec<u8>> = splits
            .par_iter()
            .map(|split| {
                data.get_col(split.feature)
                    .iter()
                    .map(|v| u8::from(split.is_true(*v)))
                    .collect::<Vec<u8>>()
            })
            .collect();

        Ok(BinarizedFeatures {
            columns,
            tree_columns,
            doc_count: data.rows,
        })
    }

    pub fn unique_split_count(&self) -> usize {
        self.columns.len()
    }
}

/// Leaf id of every document for one tree.
///
/// * `binarized` - Binarized features of the documents.
/// * `tree_id` - Tree to compute leaf ids for.
pub fn build_leaf_indices(binarized: &BinarizedFeatures, tree_id: usize) -> Vec<u32> {
    let mut indices = vec![0_u32; binarized.doc_count];
    for (level, &col) in binarized.tree_columns[tree_id].iter().enumerate() {
        for (idx, bit) in indices.iter_mut().zip(binarized.columns[col].iter()) {
            *idx |= u32::from(*bit) << level;
        }
    }
    indices
}

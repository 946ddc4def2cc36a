//! Tree statistics
//!
//! Per-tree tables recorded while replaying leaf estimation on the training
//! pool. Leaf values of a tree are fit with
//!
//! `value[leaf] = -sum(w * g) / (sum(w * h) + l2)`
//!
//! and the tables below hold the pieces of the derivative of that formula with
//! respect to the weight of a single training document.
use crate::binning::{build_leaf_indices, BinarizedFeatures};
use crate::data::Pool;
use crate::ensemble::Ensemble;
use crate::errors::InfluenceError;
use crate::objective::evaluate_derivatives;
use crate::utils::{validate_len, validate_positive_int_parameter};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeStatistics {
    pub leaf_count: usize,
    /// `[iteration][leaf]`, already scaled by the learning rate.
    pub leaf_values: Vec<Vec<f64>>,
    /// `[doc]`
    pub leaf_indices: Vec<u32>,
    /// `[leaf]`, the documents of every leaf in ascending order.
    pub leaves_doc_id: Vec<Vec<u32>>,
    /// `[iteration][doc]`
    pub formula_numerator_multiplier: Vec<Vec<f64>>,
    /// `[iteration][doc]`
    pub formula_numerator_adding: Vec<Vec<f64>>,
    /// `[iteration][leaf]`
    pub formula_denominators: Vec<Vec<f64>>,
}

/// Group documents by the leaf they fall into.
pub fn leaves_doc_id(leaf_indices: &[u32], leaf_count: usize) -> Vec<Vec<u32>> {
    let mut leaves = vec![Vec::new(); leaf_count];
    for (doc, &leaf) in leaf_indices.iter().enumerate() {
        leaves[leaf as usize].push(doc as u32);
    }
    leaves
}

impl TreeStatistics {
    /// Build statistics from precomputed tables.
    ///
    /// * `leaf_count` - Number of leaves, a power of two.
    /// * `leaf_indices` - Leaf of every training document.
    /// * `leaf_values` - `[iteration][leaf]` leaf values.
    /// * `formula_numerator_multiplier` - `[iteration][doc]`.
    /// * `formula_numerator_adding` - `[iteration][doc]`.
    /// * `formula_denominators` - `[iteration][leaf]`, all non zero.
    pub fn new(
        leaf_count: usize,
        leaf_indices: Vec<u32>,
        leaf_values: Vec<Vec<f64>>,
        formula_numerator_multiplier: Vec<Vec<f64>>,
        formula_numerator_adding: Vec<Vec<f64>>,
        formula_denominators: Vec<Vec<f64>>,
    ) -> Result<Self, InfluenceError> {
        validate_positive_int_parameter(leaf_count, "leaf_count")?;
        if !leaf_count.is_power_of_two() {
            return Err(InfluenceError::InvalidParameter(
                "leaf_count".to_string(),
                "a power of two".to_string(),
                leaf_count.to_string(),
            ));
        }
        if let Some((doc, &leaf)) = leaf_indices
            .iter()
            .enumerate()
            .find(|&(_, &leaf)| leaf as usize >= leaf_count)
        {
            return Err(InfluenceError::LeafIndexOutOfRange {
                tree: 0,
                doc,
                leaf,
                leaf_count,
            });
        }
        let leaves_doc_id = leaves_doc_id(&leaf_indices, leaf_count);
        let stats = TreeStatistics {
            leaf_count,
            leaf_values,
            leaf_indices,
            leaves_doc_id,
            formula_numerator_multiplier,
            formula_numerator_adding,
            formula_denominators,
        };
        stats.validate(0)?;
        Ok(stats)
    }

    pub fn doc_count(&self) -> usize {
        self.leaf_indices.len()
    }

    pub fn leaves_estimation_iterations(&self) -> usize {
        self.leaf_values.len()
    }

    /// Sum of the leaf values over all leaf estimation iterations.
    pub fn total_leaf_values(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.leaf_count];
        for values in &self.leaf_values {
            for (t, v) in total.iter_mut().zip(values) {
                *t += v;
            }
        }
        total
    }

    /// Check every table against the leaf and document counts.
    ///
    /// * `tree_id` - Position of the tree, used for reporting.
    pub fn validate(&self, tree_id: usize) -> Result<(), InfluenceError> {
        let iterations = self.leaves_estimation_iterations();
        let doc_count = self.doc_count();
        validate_len("leaves_doc_id", self.leaf_count, self.leaves_doc_id.len())?;
        validate_len(
            "formula_numerator_multiplier iterations",
            iterations,
            self.formula_numerator_multiplier.len(),
        )?;
        validate_len(
            "formula_numerator_adding iterations",
            iterations,
            self.formula_numerator_adding.len(),
        )?;
        validate_len(
            "formula_denominators iterations",
            iterations,
            self.formula_denominators.len(),
        )?;
        for (doc, &leaf) in self.leaf_indices.iter().enumerate() {
            if leaf as usize >= self.leaf_count {
                return Err(InfluenceError::LeafIndexOutOfRange {
                    tree: tree_id,
                    doc,
                    leaf,
                    leaf_count: self.leaf_count,
                });
            }
        }
        let bucketed: usize = self.leaves_doc_id.iter().map(|docs| docs.len()).sum();
        validate_len("documents in leaves_doc_id", doc_count, bucketed)?;
        for it in 0..iterations {
            validate_len("leaf_values", self.leaf_count, self.leaf_values[it].len())?;
            validate_len(
                "formula_numerator_multiplier",
                doc_count,
                self.formula_numerator_multiplier[it].len(),
            )?;
            validate_len(
                "formula_numerator_adding",
                doc_count,
                self.formula_numerator_adding[it].len(),
            )?;
            validate_len(
                "formula_denominators",
                self.leaf_count,
                self.formula_denominators[it].len(),
            )?;
            if let Some(leaf) = self.formula_denominators[it].iter().position(|d| *d == 0.0) {
                return Err(InfluenceError::ZeroDenominator {
                    tree: tree_id,
                    iteration: it,
                    leaf,
                });
            }
        }
        Ok(())
    }
}

/// Read-only statistics of every tree in an ensemble.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeStatisticsStore {
    pub trees: Vec<TreeStatistics>,
    /// Training documents, also when the ensemble has no trees.
    pub doc_count: usize,
}

impl TreeStatisticsStore {
    /// Wrap precomputed statistics, checking they describe the same training
    /// documents and the same number of leaf estimation iterations.
    ///
    /// * `trees` - Statistics of every tree.
    /// * `doc_count` - Number of training documents.
    pub fn new(trees: Vec<TreeStatistics>, doc_count: usize) -> Result<Self, InfluenceError> {
        let store = TreeStatisticsStore { trees, doc_count };
        store.validate()?;
        Ok(store)
    }

    /// Check every tree, and that all trees agree on the training documents
    /// and the leaf estimation iterations.
    pub fn validate(&self) -> Result<(), InfluenceError> {
        let iterations = self.leaves_estimation_iterations();
        for (tree_id, stats) in self.trees.iter().enumerate() {
            stats.validate(tree_id)?;
            validate_len("training documents", self.doc_count, stats.doc_count())?;
            validate_len(
                "leaves_estimation_iterations",
                iterations,
                stats.leaves_estimation_iterations(),
            )?;
        }
        Ok(())
    }

    /// Replay leaf estimation of the ensemble on its training pool.
    ///
    /// * `ensemble` - Trained ensemble, only tree structures and training
    ///   parameters are used.
    /// * `pool` - The pool the ensemble was trained on.
    pub fn evaluate(ensemble: &Ensemble, pool: &Pool) -> Result<Self, InfluenceError> {
        ensemble.validate()?;
        let doc_count = pool.doc_count();
        let iterations = ensemble.leaves_estimation_iterations;
        info!(
            "Evaluating statistics of {} trees on {} training documents.",
            ensemble.tree_count(),
            doc_count
        );

        let binarized = BinarizedFeatures::new(ensemble, &pool.data)?;
        let all_leaf_indices: Vec<Vec<u32>> = (0..ensemble.tree_count())
            .into_par_iter()
            .map(|tree_id| build_leaf_indices(&binarized, tree_id))
            .collect();

        let mut approxes = vec![ensemble.base_score; doc_count];
        let mut trees = Vec::with_capacity(ensemble.tree_count());
        for (tree_id, (tree, leaf_indices)) in ensemble.trees.iter().zip(all_leaf_indices).enumerate() {
            let leaf_count = tree.leaf_count();
            let mut leaf_values = Vec::with_capacity(iterations);
            let mut multipliers = Vec::with_capacity(iterations);
            let mut addings = Vec::with_capacity(iterations);
            let mut denominators = Vec::with_capacity(iterations);

            for _ in 0..iterations {
                let ders = evaluate_derivatives(
                    ensemble.loss_function,
                    ensemble.leaf_estimation_method,
                    &approxes,
                    pool.target,
                    true,
                );
                let (first, second, third) = (ders.first, ders.second, ders.third);

                let mut numerators = vec![0.0; leaf_count];
                let mut leaf_denominators = vec![ensemble.l2_leaf_reg; leaf_count];
                for (doc, &leaf) in leaf_indices.iter().enumerate() {
                    let w = pool.doc_weight(doc);
                    numerators[leaf as usize] += w * first[doc];
                    leaf_denominators[leaf as usize] += w * second[doc];
                }
                if let Some(leaf) = leaf_denominators.iter().position(|d| *d == 0.0) {
                    return Err(InfluenceError::ZeroDenominator {
                        tree: tree_id,
                        iteration: leaf_values.len(),
                        leaf,
                    });
                }
                let mut values: Vec<f64> = numerators
                    .iter()
                    .zip(leaf_denominators.iter())
                    .map(|(n, d)| -n / d)
                    .collect();

                let adding: Vec<f64> = leaf_indices
                    .iter()
                    .enumerate()
                    .map(|(doc, &leaf)| values[leaf as usize] * second[doc] + first[doc])
                    .collect();
                let multiplier: Vec<f64> = leaf_indices
                    .iter()
                    .enumerate()
                    .map(|(doc, &leaf)| pool.doc_weight(doc) * (third[doc] * values[leaf as usize] + second[doc]))
                    .collect();

                values.iter_mut().for_each(|v| *v *= ensemble.learning_rate);
                for (approx, &leaf) in approxes.iter_mut().zip(leaf_indices.iter()) {
                    *approx += values[leaf as usize];
                }

                leaf_values.push(values);
                multipliers.push(multiplier);
                addings.push(adding);
                denominators.push(leaf_denominators);
            }
            debug!("Tree {} statistics evaluated over {} leaves.", tree_id, leaf_count);

            trees.push(TreeStatistics {
                leaf_count,
                leaf_values,
                leaves_doc_id: leaves_doc_id(&leaf_indices, leaf_count),
                leaf_indices,
                formula_numerator_multiplier: multipliers,
                formula_numerator_adding: addings,
                formula_denominators: denominators,
            });
        }

        TreeStatisticsStore::new(trees, doc_count)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    pub fn leaves_estimation_iterations(&self) -> usize {
        self.trees.first().map_or(0, |t| t.leaves_estimation_iterations())
    }

    /// Final predictions for the training documents implied by the replay.
    pub fn final_approxes(&self, base_score: f64) -> Vec<f64> {
        let mut approxes = vec![base_score; self.doc_count];
        for stats in &self.trees {
            for values in &stats.leaf_values {
                for (approx, &leaf) in approxes.iter_mut().zip(stats.leaf_indices.iter()) {
                    *approx += values[leaf as usize];
                }
            }
        }
        approxes
    }
}

//! Leaf derivative propagation
//!
//! For one removed training document, replay every tree and every leaf
//! estimation iteration, tracking how each leaf value would shift. The
//! jacobian carries the accumulated shift of every training document's
//! prediction from one iteration to the next, so the replay is strictly
//! sequential within a removed document.
use crate::errors::InfluenceError;
use crate::statistics::{TreeStatistics, TreeStatisticsStore};
use crate::utils::items_to_strings;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Top size used when `TopKLeaves` is parsed without an explicit size.
pub const DEFAULT_TOP_SIZE: usize = 2;

/// Which leaves are recomputed at every iteration.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum UpdateMethod {
    /// Only the leaf of the removed document.
    SinglePoint,
    /// The `top_size` leaves with the largest jacobian mass, plus the leaf of
    /// the removed document.
    TopKLeaves { top_size: usize },
    /// Every leaf.
    AllPoints,
}

impl FromStr for UpdateMethod {
    type Err = InfluenceError;

    /// Parse `SinglePoint`, `AllPoints`, `TopKLeaves` or `TopKLeaves:top=N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || {
            InfluenceError::ParseString(
                s.to_string(),
                "UpdateMethod".to_string(),
                items_to_strings(vec!["SinglePoint", "AllPoints", "TopKLeaves", "TopKLeaves:top=N"]),
            )
        };
        match s.split_once(':') {
            None => match s {
                "SinglePoint" => Ok(UpdateMethod::SinglePoint),
                "AllPoints" => Ok(UpdateMethod::AllPoints),
                "TopKLeaves" => Ok(UpdateMethod::TopKLeaves {
                    top_size: DEFAULT_TOP_SIZE,
                }),
                _ => Err(parse_err()),
            },
            Some(("TopKLeaves", params)) => {
                let top_size = params
                    .strip_prefix("top=")
                    .and_then(|v| v.parse::<usize>().ok())
                    .filter(|v| *v > 0)
                    .ok_or_else(parse_err)?;
                Ok(UpdateMethod::TopKLeaves { top_size })
            }
            Some(_) => Err(parse_err()),
        }
    }
}

impl Display for UpdateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMethod::SinglePoint => write!(f, "SinglePoint"),
            UpdateMethod::TopKLeaves { top_size } => write!(f, "TopKLeaves:top={}", top_size),
            UpdateMethod::AllPoints => write!(f, "AllPoints"),
        }
    }
}

/// `[tree][iteration][leaf]` shift of every leaf value.
pub type LeafDerivatives = Vec<Vec<Vec<f64>>>;

pub struct LeafDerivativePropagator<'a> {
    statistics: &'a TreeStatisticsStore,
    update_method: UpdateMethod,
    learning_rate: f64,
}

impl<'a> LeafDerivativePropagator<'a> {
    pub fn new(statistics: &'a TreeStatisticsStore, update_method: UpdateMethod, learning_rate: f64) -> Self {
        LeafDerivativePropagator {
            statistics,
            update_method,
            learning_rate,
        }
    }

    /// Leaves to recompute for a tree given the current jacobian.
    ///
    /// `TopKLeaves` ranks leaves by the summed absolute jacobian of their
    /// documents, largest first, ties going to the smaller leaf id.
    pub fn leaf_ids_to_update(&self, stats: &TreeStatistics, jacobian: &[f64]) -> Vec<usize> {
        let leaf_count = stats.leaf_count;
        match self.update_method {
            UpdateMethod::AllPoints => (0..leaf_count).collect(),
            UpdateMethod::SinglePoint => Vec::new(),
            UpdateMethod::TopKLeaves { top_size } => {
                let mut leaf_jacobians = vec![0.0; leaf_count];
                for (doc, &leaf) in stats.leaf_indices.iter().enumerate() {
                    leaf_jacobians[leaf as usize] += jacobian[doc].abs();
                }
                let mut ordered: Vec<usize> = (0..leaf_count).collect();
                ordered.sort_by(|&a, &b| leaf_jacobians[b].total_cmp(&leaf_jacobians[a]).then(a.cmp(&b)));
                ordered.truncate(top_size.min(leaf_count));
                ordered
            }
        }
    }

    /// Leaf value shifts of every tree and iteration caused by removing one
    /// training document.
    ///
    /// * `removed_doc` - Id of the training document to remove.
    pub fn leaf_derivatives(&self, removed_doc: usize) -> LeafDerivatives {
        let mut jacobian = vec![0.0; self.statistics.doc_count()];
        let mut leaf_derivatives = Vec::with_capacity(self.statistics.tree_count());
        for stats in &self.statistics.trees {
            let removed_leaf = stats.leaf_indices[removed_doc] as usize;
            let mut tree_derivatives = Vec::with_capacity(stats.leaves_estimation_iterations());
            for it in 0..stats.leaves_estimation_iterations() {
                let leaf_ids = self.leaf_ids_to_update(stats, &jacobian);
                let derivatives = self.leaf_derivatives_for_tree(&leaf_ids, removed_doc, &jacobian, stats, it);

                let mut is_removed_doc_updated = false;
                for &leaf in &leaf_ids {
                    for &doc in &stats.leaves_doc_id[leaf] {
                        jacobian[doc as usize] += derivatives[leaf];
                    }
                    is_removed_doc_updated |= leaf == removed_leaf;
                }
                if !is_removed_doc_updated {
                    jacobian[removed_doc] += derivatives[removed_leaf];
                }
                tree_derivatives.push(derivatives);
            }
            leaf_derivatives.push(tree_derivatives);
        }
        leaf_derivatives
    }

    fn leaf_derivatives_for_tree(
        &self,
        leaf_ids: &[usize],
        removed_doc: usize,
        jacobian: &[f64],
        stats: &TreeStatistics,
        it: usize,
    ) -> Vec<f64> {
        let multiplier = &stats.formula_numerator_multiplier[it];
        let adding = &stats.formula_numerator_adding[it];
        let denominators = &stats.formula_denominators[it];
        let removed_leaf = stats.leaf_indices[removed_doc] as usize;

        let mut derivatives = vec![0.0; stats.leaf_count];
        let mut is_removed_doc_updated = false;
        for &leaf in leaf_ids {
            let mut derivative: f64 = stats.leaves_doc_id[leaf]
                .iter()
                .map(|&doc| multiplier[doc as usize] * jacobian[doc as usize])
                .sum();
            if leaf == removed_leaf {
                derivative += adding[removed_doc];
                is_removed_doc_updated = true;
            }
            derivatives[leaf] = derivative * (-self.learning_rate / denominators[leaf]);
        }
        // The removed document always shifts its own leaf, pruned or not.
        if !is_removed_doc_updated {
            let derivative = jacobian[removed_doc] * multiplier[removed_doc] + adding[removed_doc];
            derivatives[removed_leaf] = derivative * (-self.learning_rate / denominators[removed_leaf]);
        }
        derivatives
    }
}

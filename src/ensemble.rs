//! Ensemble
//!
//! An ordered sequence of oblivious trees together with the training
//! parameters the leaf estimation replay has to match.
use crate::config::ModelIO;
use crate::data::{Matrix, Pool};
use crate::errors::InfluenceError;
use crate::objective::{LeafEstimationMethod, LossFunction};
use crate::statistics::TreeStatisticsStore;
use crate::tree::ObliviousTree;
use crate::utils::{validate_float_parameter, validate_positive_float_parameter};
use serde::{Deserialize, Serialize};

fn default_learning_rate() -> f64 {
    0.03
}
fn default_l2_leaf_reg() -> f64 {
    3.0
}
fn default_leaves_estimation_iterations() -> usize {
    1
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Ensemble {
    pub trees: Vec<ObliviousTree>,
    /// Starting prediction every tree is added to.
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_l2_leaf_reg")]
    pub l2_leaf_reg: f64,
    /// Leaf refitting steps per boosting iteration.
    #[serde(default = "default_leaves_estimation_iterations")]
    pub leaves_estimation_iterations: usize,
    pub loss_function: LossFunction,
    pub leaf_estimation_method: LeafEstimationMethod,
}

impl Default for Ensemble {
    fn default() -> Self {
        Ensemble {
            trees: Vec::new(),
            base_score: 0.0,
            learning_rate: default_learning_rate(),
            l2_leaf_reg: default_l2_leaf_reg(),
            leaves_estimation_iterations: default_leaves_estimation_iterations(),
            loss_function: LossFunction::SquaredLoss,
            leaf_estimation_method: LeafEstimationMethod::Newton,
        }
    }
}

impl ModelIO for Ensemble {}

impl Ensemble {
    pub fn new(trees: Vec<ObliviousTree>) -> Self {
        Ensemble {
            trees,
            ..Default::default()
        }
    }

    /// Set the base score of the ensemble.
    pub fn set_base_score(mut self, base_score: f64) -> Self {
        self.base_score = base_score;
        self
    }

    /// Set the learning rate used at training time.
    pub fn set_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the l2 regularization added to every leaf denominator.
    pub fn set_l2_leaf_reg(mut self, l2_leaf_reg: f64) -> Self {
        self.l2_leaf_reg = l2_leaf_reg;
        self
    }

    /// Set the number of leaf estimation iterations per tree.
    pub fn set_leaves_estimation_iterations(mut self, leaves_estimation_iterations: usize) -> Self {
        self.leaves_estimation_iterations = leaves_estimation_iterations;
        self
    }

    /// Set the loss function.
    pub fn set_loss_function(mut self, loss_function: LossFunction) -> Self {
        self.loss_function = loss_function;
        self
    }

    /// Set the leaf estimation method.
    pub fn set_leaf_estimation_method(mut self, leaf_estimation_method: LeafEstimationMethod) -> Self {
        self.leaf_estimation_method = leaf_estimation_method;
        self
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn validate(&self) -> Result<(), InfluenceError> {
        validate_positive_float_parameter(self.learning_rate, "learning_rate")?;
        validate_float_parameter(self.l2_leaf_reg, 0.0, f64::INFINITY, "l2_leaf_reg")?;
        for (tree_id, tree) in self.trees.iter().enumerate() {
            tree.validate(tree_id)?;
        }
        Ok(())
    }

    /// Raw predictions for every row of the data.
    pub fn predict(&self, data: &Matrix<f64>) -> Vec<f64> {
        let mut preds = vec![self.base_score; data.rows];
        for tree in &self.trees {
            for (p_, val) in preds.iter_mut().zip(tree.predict(data)) {
                *p_ += val;
            }
        }
        preds
    }

    /// Re-estimate the leaf values of every tree on the training pool, keeping
    /// the tree structures. Returns the statistics gathered by the replay.
    pub fn fit_leaves(&mut self, pool: &Pool) -> Result<TreeStatisticsStore, InfluenceError> {
        let store = TreeStatisticsStore::evaluate(self, pool)?;
        for (tree, stats) in self.trees.iter_mut().zip(store.trees.iter()) {
            tree.leaf_values = stats.total_leaf_values();
        }
        Ok(store)
    }
}

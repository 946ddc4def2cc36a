//! Document importance evaluator
//!
//! Scores how much every training document shifted the loss on every
//! evaluation document. Phase one computes leaf ids of the evaluation pool and
//! the loss derivatives at its final predictions. Phase two replays leaf
//! estimation with one training document removed at a time, one matrix row per
//! removed document.
use crate::binning::{build_leaf_indices, BinarizedFeatures};
use crate::config::ImportanceConfig;
use crate::data::Pool;
use crate::ensemble::Ensemble;
use crate::errors::InfluenceError;
use crate::objective::evaluate_derivatives;
use crate::propagator::{LeafDerivativePropagator, LeafDerivatives};
use crate::ranking::{rank_document_importances, DocumentImportanceRanking};
use crate::statistics::TreeStatisticsStore;
use crate::utils::{build_thread_pool, validate_len, validate_positive_float_parameter};
use log::info;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Dense `[train][eval]` importance matrix, stored row major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentImportances {
    pub values: Vec<f64>,
    pub train_doc_count: usize,
    pub eval_doc_count: usize,
}

impl DocumentImportances {
    pub fn new(values: Vec<f64>, train_doc_count: usize, eval_doc_count: usize) -> Self {
        DocumentImportances {
            values,
            train_doc_count,
            eval_doc_count,
        }
    }

    /// Importance of training document `train` for evaluation document `eval`.
    pub fn get(&self, train: usize, eval: usize) -> f64 {
        self.values[train * self.eval_doc_count + eval]
    }

    /// Importances of one training document for every evaluation document.
    pub fn row(&self, train: usize) -> &[f64] {
        let start = train * self.eval_doc_count;
        &self.values[start..start + self.eval_doc_count]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.train_doc_count).map(move |train| self.row(train))
    }
}

pub struct DocumentImportanceEvaluator {
    statistics: TreeStatisticsStore,
    learning_rate: f64,
    config: ImportanceConfig,
}

impl DocumentImportanceEvaluator {
    /// Create an evaluator over precomputed tree statistics.
    ///
    /// * `statistics` - Statistics of every tree on the training pool.
    /// * `learning_rate` - Boosting step size used at training time.
    /// * `config` - Update method, threads and logging.
    pub fn new(
        statistics: TreeStatisticsStore,
        learning_rate: f64,
        config: &ImportanceConfig,
    ) -> Result<Self, InfluenceError> {
        validate_positive_float_parameter(learning_rate, "learning_rate")?;
        config.validate()?;
        statistics.validate()?;
        Ok(DocumentImportanceEvaluator {
            statistics,
            learning_rate,
            config: config.clone(),
        })
    }

    /// Replay leaf estimation of the ensemble on its training pool and
    /// create an evaluator over the resulting statistics.
    pub fn from_ensemble(ensemble: &Ensemble, train_pool: &Pool, config: &ImportanceConfig) -> Result<Self, InfluenceError> {
        let statistics = TreeStatisticsStore::evaluate(ensemble, train_pool)?;
        DocumentImportanceEvaluator::new(statistics, ensemble.learning_rate, config)
    }

    pub fn statistics(&self) -> &TreeStatisticsStore {
        &self.statistics
    }

    /// Leaf value shifts caused by removing one training document.
    ///
    /// * `removed_doc` - Id of the training document.
    pub fn leaf_derivatives(&self, removed_doc: usize) -> Result<LeafDerivatives, InfluenceError> {
        let doc_count = self.statistics.doc_count();
        if removed_doc >= doc_count {
            return Err(InfluenceError::InvalidParameter(
                "removed_doc".to_string(),
                format!("less than {}", doc_count),
                removed_doc.to_string(),
            ));
        }
        let propagator = LeafDerivativePropagator::new(&self.statistics, self.config.update_method, self.learning_rate);
        Ok(propagator.leaf_derivatives(removed_doc))
    }

    /// Importance matrix from precomputed evaluation leaf ids and final first
    /// derivatives.
    ///
    /// * `eval_leaf_indices` - `[tree][eval doc]` leaf ids.
    /// * `final_first_derivatives` - Loss derivative at the final prediction of
    ///   every evaluation document.
    pub fn evaluate(
        &self,
        eval_leaf_indices: &[Vec<u32>],
        final_first_derivatives: &[f64],
    ) -> Result<DocumentImportances, InfluenceError> {
        let pool = build_thread_pool(self.config.num_threads)?;
        self.evaluate_with_pool(&pool, eval_leaf_indices, final_first_derivatives)
    }

    /// Run both phases for an evaluation pool.
    ///
    /// * `ensemble` - The ensemble the statistics were evaluated for.
    /// * `eval_pool` - Documents to explain; the target is used for the final
    ///   loss derivatives.
    pub fn get_document_importances(
        &self,
        ensemble: &Ensemble,
        eval_pool: &Pool,
    ) -> Result<DocumentImportances, InfluenceError> {
        ensemble.validate()?;
        self.validate_ensemble(ensemble)?;
        let pool = build_thread_pool(self.config.num_threads)?;
        info!(
            "Building leaf indices of {} trees for {} evaluation documents.",
            ensemble.tree_count(),
            eval_pool.doc_count()
        );

        let binarized = BinarizedFeatures::new(ensemble, &eval_pool.data)?;
        let mut eval_leaf_indices: Vec<Vec<u32>> = vec![Vec::new(); ensemble.tree_count()];
        pool.install(|| {
            eval_leaf_indices
                .par_iter_mut()
                .enumerate()
                .for_each(|(tree_id, slot)| *slot = build_leaf_indices(&binarized, tree_id));
        });

        let mut approxes = vec![ensemble.base_score; eval_pool.doc_count()];
        for (stats, leaf_indices) in self.statistics.trees.iter().zip(eval_leaf_indices.iter()) {
            let totals = stats.total_leaf_values();
            for (approx, &leaf) in approxes.iter_mut().zip(leaf_indices) {
                *approx += totals[leaf as usize];
            }
        }
        let final_first_derivatives = evaluate_derivatives(
            ensemble.loss_function,
            ensemble.leaf_estimation_method,
            &approxes,
            eval_pool.target,
            false,
        )
        .first;

        self.evaluate_with_pool(&pool, &eval_leaf_indices, &final_first_derivatives)
    }

    fn validate_ensemble(&self, ensemble: &Ensemble) -> Result<(), InfluenceError> {
        validate_len("trees", self.statistics.tree_count(), ensemble.tree_count())?;
        for (tree, stats) in ensemble.trees.iter().zip(self.statistics.trees.iter()) {
            validate_len("leaf_count", stats.leaf_count, tree.leaf_count())?;
        }
        if self.statistics.tree_count() > 0 {
            validate_len(
                "leaves_estimation_iterations",
                ensemble.leaves_estimation_iterations,
                self.statistics.leaves_estimation_iterations(),
            )?;
        }
        Ok(())
    }

    fn validate_eval_inputs(
        &self,
        eval_leaf_indices: &[Vec<u32>],
        final_first_derivatives: &[f64],
    ) -> Result<(), InfluenceError> {
        validate_len("trees", self.statistics.tree_count(), eval_leaf_indices.len())?;
        for (tree_id, (stats, leaf_indices)) in self.statistics.trees.iter().zip(eval_leaf_indices).enumerate() {
            validate_len("evaluation documents", final_first_derivatives.len(), leaf_indices.len())?;
            if let Some((doc, &leaf)) = leaf_indices
                .iter()
                .enumerate()
                .find(|&(_, &leaf)| leaf as usize >= stats.leaf_count)
            {
                return Err(InfluenceError::LeafIndexOutOfRange {
                    tree: tree_id,
                    doc,
                    leaf,
                    leaf_count: stats.leaf_count,
                });
            }
        }
        Ok(())
    }

    fn evaluate_with_pool(
        &self,
        pool: &ThreadPool,
        eval_leaf_indices: &[Vec<u32>],
        final_first_derivatives: &[f64],
    ) -> Result<DocumentImportances, InfluenceError> {
        self.validate_eval_inputs(eval_leaf_indices, final_first_derivatives)?;
        let train_doc_count = self.statistics.doc_count();
        let eval_doc_count = final_first_derivatives.len();
        let mut values = vec![0.0; train_doc_count * eval_doc_count];
        if values.is_empty() {
            return Ok(DocumentImportances::new(values, train_doc_count, eval_doc_count));
        }

        info!(
            "Evaluating importances of {} training documents for {} evaluation documents with {}.",
            train_doc_count, eval_doc_count, self.config.update_method
        );
        let propagator = LeafDerivativePropagator::new(&self.statistics, self.config.update_method, self.learning_rate);
        let log_period = self.config.log_period;
        let processed = AtomicUsize::new(0);

        pool.install(|| {
            values
                .par_chunks_mut(eval_doc_count)
                .enumerate()
                .for_each(|(train_doc, row)| {
                    let leaf_derivatives = propagator.leaf_derivatives(train_doc);
                    for (tree_derivatives, leaf_indices) in leaf_derivatives.iter().zip(eval_leaf_indices) {
                        for derivatives in tree_derivatives {
                            for (predicted, &leaf) in row.iter_mut().zip(leaf_indices) {
                                *predicted += derivatives[leaf as usize];
                            }
                        }
                    }
                    for (predicted, der) in row.iter_mut().zip(final_first_derivatives) {
                        *predicted *= der;
                    }

                    if log_period > 0 {
                        let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                        if done % log_period == 0 {
                            info!("Processed {} of {} training documents.", done, train_doc_count);
                        }
                    }
                });
        });

        info!("Document importances evaluated.");
        Ok(DocumentImportances::new(values, train_doc_count, eval_doc_count))
    }
}

/// Evaluate and rank training documents by their influence on an evaluation
/// pool.
///
/// * `ensemble` - Trained ensemble.
/// * `train_pool` - The pool the ensemble was trained on.
/// * `eval_pool` - Documents to explain.
/// * `config` - Update method, threads, logging and ranking options.
pub fn get_document_importances(
    ensemble: &Ensemble,
    train_pool: &Pool,
    eval_pool: &Pool,
    config: &ImportanceConfig,
) -> Result<DocumentImportanceRanking, InfluenceError> {
    let evaluator = DocumentImportanceEvaluator::from_ensemble(ensemble, train_pool, config)?;
    let importances = evaluator.get_document_importances(ensemble, eval_pool)?;
    Ok(rank_document_importances(
        &importances,
        config.document_strength,
        config.importance_values_sign,
        config.top_size,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Matrix;
    use crate::propagator::UpdateMethod;
    use crate::ranking::{DocumentStrength, ImportanceValuesSign};
    use crate::statistics::TreeStatistics;
    use crate::tree::{ObliviousTree, Split};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
    }

    // 2 trees of depth 1, 3 training documents, 1 iteration.
    fn two_tree_statistics() -> TreeStatisticsStore {
        let tree0 = TreeStatistics::new(
            2,
            vec![0, 0, 1],
            vec![vec![0.1, -0.2]],
            vec![vec![1.0, 2.0, 0.5]],
            vec![vec![0.4, -0.2, 1.0]],
            vec![vec![2.0, 4.0]],
        )
        .unwrap();
        let tree1 = TreeStatistics::new(
            2,
            vec![1, 0, 1],
            vec![vec![0.05, 0.3]],
            vec![vec![1.0, 1.0, 2.0]],
            vec![vec![0.3, 0.1, -0.5]],
            vec![vec![5.0, 2.0]],
        )
        .unwrap();
        TreeStatisticsStore::new(vec![tree0, tree1], 3).unwrap()
    }

    fn all_points() -> ImportanceConfig {
        ImportanceConfig::default().set_update_method(UpdateMethod::AllPoints)
    }

    #[test]
    fn test_two_tree_importance_matrix() {
        let evaluator = DocumentImportanceEvaluator::new(two_tree_statistics(), 0.1, &all_points()).unwrap();
        let eval_leaf_indices = vec![vec![0, 1], vec![1, 0]];
        let importances = evaluator.evaluate(&eval_leaf_indices, &[0.5, -1.0]).unwrap();
        assert_eq!(importances.train_doc_count, 3);
        assert_eq!(importances.eval_doc_count, 2);

        // Leaf derivatives written out in the order they are accumulated.
        let step = |denominator: f64| -0.1 / denominator;
        let mut expected = Vec::new();
        // Removing document 0: leaf 0 of the first tree, leaf 1 of the second.
        let d00 = 0.4 * step(2.0);
        let d10 = d00 * step(5.0);
        let d11 = (d00 + 0.3) * step(2.0);
        expected.push([(d00 + d11) * 0.5, d10 * -1.0]);
        // Removing document 1: leaf 0 of both trees.
        let d00 = -0.2 * step(2.0);
        let d10 = (d00 + 0.1) * step(5.0);
        let d11 = d00 * step(2.0);
        expected.push([(d00 + d11) * 0.5, d10 * -1.0]);
        // Removing document 2: leaf 1 of both trees.
        let d01 = 1.0 * step(4.0);
        let d11 = (2.0 * d01 - 0.5) * step(2.0);
        expected.push([d11 * 0.5, d01 * -1.0]);

        let by_hand = [[-0.017, -0.0004], [0.00475, 0.0022], [0.01375, 0.025]];
        for train in 0..3 {
            assert_eq!(importances.row(train), &expected[train][..]);
            for eval in 0..2 {
                assert_close(importances.get(train, eval), by_hand[train][eval]);
            }
        }
    }

    #[test]
    fn test_no_iterations_gives_zero_matrix() {
        let stats = TreeStatistics::new(2, vec![0, 1, 1], vec![], vec![], vec![], vec![]).unwrap();
        let store = TreeStatisticsStore::new(vec![stats], 3).unwrap();
        let evaluator = DocumentImportanceEvaluator::new(store, 0.1, &all_points()).unwrap();
        let importances = evaluator.evaluate(&[vec![0, 1]], &[1.0, -2.0]).unwrap();
        assert_eq!(importances.values, vec![0.0; 6]);
    }

    #[test]
    fn test_top_k_full_width_equals_all_points() {
        let eval_leaf_indices = vec![vec![0, 1], vec![1, 0]];
        let all = DocumentImportanceEvaluator::new(two_tree_statistics(), 0.1, &all_points())
            .unwrap()
            .evaluate(&eval_leaf_indices, &[0.5, -1.0])
            .unwrap();
        let config = ImportanceConfig::default().set_update_method(UpdateMethod::TopKLeaves { top_size: 2 });
        let top = DocumentImportanceEvaluator::new(two_tree_statistics(), 0.1, &config)
            .unwrap()
            .evaluate(&eval_leaf_indices, &[0.5, -1.0])
            .unwrap();
        assert_eq!(all, top);
    }

    fn random_statistics(rng: &mut StdRng, trees: usize, docs: usize, iterations: usize) -> TreeStatisticsStore {
        let leaf_count = 4;
        let stats: Vec<TreeStatistics> = (0..trees)
            .map(|_| {
                let leaf_indices: Vec<u32> = (0..docs).map(|_| rng.gen_range(0..leaf_count as u32)).collect();
                let mut per_doc = || -> Vec<Vec<f64>> {
                    (0..iterations)
                        .map(|_| (0..docs).map(|_| rng.gen_range(-1.0..1.0)).collect::<Vec<f64>>())
                        .collect()
                };
                let multiplier = per_doc();
                let adding = per_doc();
                let leaf_values: Vec<Vec<f64>> = (0..iterations)
                    .map(|_| (0..leaf_count).map(|_| rng.gen_range(-0.1..0.1)).collect::<Vec<f64>>())
                    .collect();
                let denominators: Vec<Vec<f64>> = (0..iterations)
                    .map(|_| (0..leaf_count).map(|_| rng.gen_range(0.5..2.0)).collect::<Vec<f64>>())
                    .collect();
                TreeStatistics::new(leaf_count, leaf_indices, leaf_values, multiplier, adding, denominators).unwrap()
            })
            .collect();
        TreeStatisticsStore::new(stats, docs).unwrap()
    }

    #[test]
    fn test_deterministic_across_thread_counts() {
        let mut rng = StdRng::seed_from_u64(0);
        let store = random_statistics(&mut rng, 5, 40, 2);
        let eval_leaf_indices: Vec<Vec<u32>> = (0..5)
            .map(|_| (0..9).map(|_| rng.gen_range(0..4_u32)).collect::<Vec<u32>>())
            .collect();
        let ffd: Vec<f64> = (0..9).map(|_| rng.gen_range(-1.0..1.0)).collect();

        let config = ImportanceConfig::default()
            .set_update_method(UpdateMethod::TopKLeaves { top_size: 2 })
            .set_log_period(7);
        let single = DocumentImportanceEvaluator::new(store.clone(), 0.3, &config.clone().set_num_threads(Some(1)))
            .unwrap()
            .evaluate(&eval_leaf_indices, &ffd)
            .unwrap();
        let many = DocumentImportanceEvaluator::new(store, 0.3, &config.set_num_threads(Some(4)))
            .unwrap()
            .evaluate(&eval_leaf_indices, &ffd)
            .unwrap();
        assert_eq!(single, many);
        assert!(single.values.iter().any(|v| *v != 0.0));
    }

    #[test]
    fn test_invalid_inputs() {
        let evaluator = DocumentImportanceEvaluator::new(two_tree_statistics(), 0.1, &all_points()).unwrap();
        assert!(matches!(
            evaluator.evaluate(&[vec![0, 1]], &[0.5, -1.0]),
            Err(InfluenceError::DimensionMismatch(..))
        ));
        assert!(matches!(
            evaluator.evaluate(&[vec![0, 1], vec![1]], &[0.5, -1.0]),
            Err(InfluenceError::DimensionMismatch(..))
        ));
        assert!(matches!(
            evaluator.evaluate(&[vec![0, 1], vec![1, 2]], &[0.5, -1.0]),
            Err(InfluenceError::LeafIndexOutOfRange { tree: 1, doc: 1, .. })
        ));
        assert!(matches!(
            evaluator.leaf_derivatives(3),
            Err(InfluenceError::InvalidParameter(..))
        ));
        assert!(DocumentImportanceEvaluator::new(two_tree_statistics(), 0.0, &all_points()).is_err());
    }

    #[test]
    fn test_rejects_inconsistent_statistics() {
        let a = TreeStatistics::new(1, vec![0, 0], vec![], vec![], vec![], vec![]).unwrap();
        let b = TreeStatistics::new(1, vec![0, 0, 0], vec![], vec![], vec![], vec![]).unwrap();
        let store = TreeStatisticsStore {
            trees: vec![a.clone(), b],
            doc_count: 2,
        };
        assert!(matches!(
            DocumentImportanceEvaluator::new(store, 0.1, &all_points()),
            Err(InfluenceError::DimensionMismatch(..))
        ));
        let store = TreeStatisticsStore {
            trees: vec![a],
            doc_count: 5,
        };
        assert!(DocumentImportanceEvaluator::new(store, 0.1, &all_points()).is_err());
    }

    #[test]
    fn test_empty_eval_pool() {
        let evaluator = DocumentImportanceEvaluator::new(two_tree_statistics(), 0.1, &all_points()).unwrap();
        let importances = evaluator.evaluate(&[vec![], vec![]], &[]).unwrap();
        assert!(importances.values.is_empty());
        assert_eq!(importances.rows().count(), 3);
    }

    // Two features, 6 training documents.
    const TRAIN: [f64; 12] = [0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
    const TRAIN_Y: [f64; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    const EVAL: [f64; 4] = [0.0, 2.0, 0.0, 1.0];
    const EVAL_Y: [f64; 2] = [1.0, 6.0];

    fn ensemble() -> Ensemble {
        Ensemble::new(vec![
            ObliviousTree::new(vec![Split::new(0, 0.5)], vec![0.0; 2]),
            ObliviousTree::new(vec![Split::new(1, 0.5)], vec![0.0; 2]),
            ObliviousTree::new(vec![Split::new(0, 1.5), Split::new(1, 0.5)], vec![0.0; 4]),
        ])
        .set_learning_rate(0.5)
        .set_l2_leaf_reg(1.0)
        .set_leaves_estimation_iterations(2)
    }

    #[test]
    fn test_pool_evaluation_matches_precomputed_inputs() {
        let train_pool = Pool::new(Matrix::new(&TRAIN, 6, 2), &TRAIN_Y, None).unwrap();
        let eval_pool = Pool::new(Matrix::new(&EVAL, 2, 2), &EVAL_Y, None).unwrap();
        let mut ensemble = ensemble();
        ensemble.fit_leaves(&train_pool).unwrap();

        let evaluator = DocumentImportanceEvaluator::from_ensemble(&ensemble, &train_pool, &all_points()).unwrap();
        let importances = evaluator.get_document_importances(&ensemble, &eval_pool).unwrap();
        assert_eq!(importances.train_doc_count, 6);
        assert_eq!(importances.eval_doc_count, 2);
        assert!(importances.values.iter().all(|v| v.is_finite()));

        let rows = [[0.0, 0.0], [2.0, 1.0]];
        let eval_leaf_indices: Vec<Vec<u32>> = ensemble
            .trees
            .iter()
            .map(|tree| rows.iter().map(|row| tree.leaf_index_from_row(row)).collect())
            .collect();
        let ffd: Vec<f64> = ensemble
            .predict(&eval_pool.data)
            .iter()
            .zip(EVAL_Y.iter())
            .map(|(yhat, y)| yhat - y)
            .collect();
        let expected = evaluator.evaluate(&eval_leaf_indices, &ffd).unwrap();
        for (a, b) in importances.values.iter().zip(expected.values.iter()) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn test_ensemble_mismatch() {
        let train_pool = Pool::new(Matrix::new(&TRAIN, 6, 2), &TRAIN_Y, None).unwrap();
        let eval_pool = Pool::new(Matrix::new(&EVAL, 2, 2), &EVAL_Y, None).unwrap();
        let evaluator = DocumentImportanceEvaluator::from_ensemble(&ensemble(), &train_pool, &all_points()).unwrap();
        let other = ensemble().set_leaves_estimation_iterations(1);
        assert!(matches!(
            evaluator.get_document_importances(&other, &eval_pool),
            Err(InfluenceError::DimensionMismatch(..))
        ));
        let fewer = Ensemble::new(vec![ObliviousTree::new(vec![Split::new(0, 0.5)], vec![0.0; 2])]);
        assert!(evaluator.get_document_importances(&fewer, &eval_pool).is_err());
    }

    #[test]
    fn test_ensemble_without_trees() {
        let train_pool = Pool::new(Matrix::new(&TRAIN, 6, 2), &TRAIN_Y, None).unwrap();
        let eval_pool = Pool::new(Matrix::new(&EVAL, 2, 2), &EVAL_Y, None).unwrap();
        let empty = Ensemble::new(Vec::new());
        let evaluator = DocumentImportanceEvaluator::from_ensemble(&empty, &train_pool, &all_points()).unwrap();
        let importances = evaluator.get_document_importances(&empty, &eval_pool).unwrap();
        assert_eq!(importances.train_doc_count, 6);
        assert_eq!(importances.eval_doc_count, 2);
        assert_eq!(importances.values, vec![0.0; 12]);

        let config = all_points().set_document_strength(DocumentStrength::Average);
        let ranking = get_document_importances(&empty, &train_pool, &eval_pool, &config).unwrap();
        assert_eq!(ranking.indices, vec![vec![0, 1, 2, 3, 4, 5]]);
    }

    #[test]
    fn test_get_document_importances_ranking() {
        let train_pool = Pool::new(Matrix::new(&TRAIN, 6, 2), &TRAIN_Y, None).unwrap();
        let eval_pool = Pool::new(Matrix::new(&EVAL, 2, 2), &EVAL_Y, None).unwrap();
        let config = all_points()
            .set_num_threads(Some(2))
            .set_document_strength(DocumentStrength::Raw)
            .set_importance_values_sign(ImportanceValuesSign::All)
            .set_top_size(Some(4));
        let ranking = get_document_importances(&ensemble(), &train_pool, &eval_pool, &config).unwrap();
        assert_eq!(ranking.indices.len(), 2);
        for (indices, scores) in ranking.indices.iter().zip(ranking.scores.iter()) {
            assert_eq!(indices.len(), 4);
            assert!(scores.windows(2).all(|w| w[0].abs() >= w[1].abs()));
        }

        let average = get_document_importances(
            &ensemble(),
            &train_pool,
            &eval_pool,
            &config.set_document_strength(DocumentStrength::Average).set_top_size(None),
        )
        .unwrap();
        assert_eq!(average.indices.len(), 1);
        assert_eq!(average.indices[0].len(), 6);
    }
}

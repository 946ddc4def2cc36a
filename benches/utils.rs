#![allow(dead_code)]
use leaf_influence::tree::{ObliviousTree, Split};
use leaf_influence::Ensemble;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Column major features in `[0, 1)` and a noisy linear target.
pub(crate) fn create_data(n_samples: usize, n_features: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let feature_distribution = Uniform::new(0.0, 1.0);
    let noise_distribution = Uniform::new(-0.1, 0.1);
    let weights: Vec<f64> = (0..n_features).map(|_| rng.sample(Uniform::new(-1.0, 1.0))).collect();

    let mut data = vec![0.0; n_samples * n_features];
    let mut y = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let mut linear = 0.0;
        for (j, w) in weights.iter().enumerate() {
            let v = rng.sample(feature_distribution);
            data[j * n_samples + i] = v;
            linear += v * w;
        }
        y.push(linear + rng.sample(noise_distribution));
    }
    (data, y)
}

/// Ensemble of random oblivious trees over features in `[0, 1)`.
pub(crate) fn create_ensemble(n_trees: usize, depth: usize, n_features: usize, seed: u64) -> Ensemble {
    let mut rng = StdRng::seed_from_u64(seed);
    let trees = (0..n_trees)
        .map(|_| {
            let splits = (0..depth)
                .map(|_| Split::new(rng.gen_range(0..n_features), rng.gen_range(0.2..0.8)))
                .collect();
            ObliviousTree::new(splits, vec![0.0; 1 << depth])
        })
        .collect();
    Ensemble::new(trees)
}

use rand::Rng;
use rand::rngs::StdRng;

use crate::problem::Instance;

/// Small random instance with capacities at roughly a third to all of each row total
pub(crate) fn random_instance(rng: &mut StdRng) -> Instance {
    let n = rng.gen_range(1..25);
    let m = rng.gen_range(1..5);
    let profits = (0..n).map(|_| rng.gen_range(0..50) as f64).collect();
    let weights: Vec<Vec<u64>> = (0..m)
        .map(|_| (0..n).map(|_| rng.gen_range(0..20)).collect())
        .collect();
    let capacities = weights
        .iter()
        .map(|row| row.iter().sum::<u64>() / rng.gen_range(1..4))
        .collect();
    Instance::new(n, m, 0.0, profits, weights, capacities).unwrap()
}

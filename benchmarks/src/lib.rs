//! Shared helpers for metronome benchmark suites.

use metronome_harness::regimes::Regime;
use metronome_search::{
    explicit_estimation_search, potential_search, PlanV1, SearchDomainV1, Unbounded,
};

/// Search algorithm under measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Ees,
    Potential,
}

impl Algorithm {
    pub const ALL: [Self; 2] = [Self::Ees, Self::Potential];

    /// Short label used in benchmark ids.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ees => "ees",
            Self::Potential => "potential",
        }
    }
}

/// Run `algorithm` on `regime` without a budget. Returns the plan.
///
/// # Panics
///
/// Panics if the search fails. Benchmark regimes are expected to be
/// solvable.
pub fn solve<D>(algorithm: Algorithm, regime: &Regime<D, D::State>) -> PlanV1<D::Action>
where
    D: SearchDomainV1,
{
    let root = regime.root.clone();
    let result = match algorithm {
        Algorithm::Ees => explicit_estimation_search(&regime.world, root, &regime.policy, Unbounded),
        Algorithm::Potential => potential_search(&regime.world, root, &regime.policy, Unbounded),
    };
    result.expect("benchmark regime should be solvable")
}

/// Pick the first terrain seed in `seeds` whose map is solvable, so
/// benchmarks never time an exhausted search.
///
/// # Panics
///
/// Panics if none of the seeds is solvable.
#[must_use]
pub fn solvable_terrain_seed(seeds: std::ops::Range<u64>) -> u64 {
    use metronome_harness::oracle::optimal_cost;
    use metronome_harness::regimes::regime_grid_terrain;

    seeds
        .into_iter()
        .find(|&seed| {
            let regime = regime_grid_terrain(seed, 1.0);
            optimal_cost(&regime.world, &regime.root, 10_000).is_some()
        })
        .expect("at least one solvable terrain seed")
}

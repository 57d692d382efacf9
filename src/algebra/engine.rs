//! Round execution.
//!
//! One round applies one [`Calculation`] to every key of the current
//! generation and builds the next generation from the outcomes. The
//! parallel path splits a round in two phases:
//!
//! 1. **Map** (work stealing over the key list, read-only): each key yields
//!    zero, one or two intents, i.e. pending `(dest, batch, source)`
//!    merges.
//! 2. **Reduce**: intents are grouped by destination key in a [`DashMap`],
//!    then every group is folded by exactly one worker. Groups are disjoint,
//!    so distinct destination keys reduce with no cross-key locking.
//!
//! Each intent carries the ordinal of the key that produced it and its slot
//! (`0` = retained original, `1` = derived fork). Folding a group in
//! `(ordinal, slot)` order replays the merges in the order the sequential
//! algorithm issues them, so the next generation is identical entry for
//! entry, not only as a set.
//!
//! Rounds never run ahead of each other: round `n + 1` maps over the fully
//! reduced output of round `n`.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::hash::BuildHasherDefault;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use log::{debug, error};
use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxHasher;
use smallvec::SmallVec;

use super::calculation::{Calculation, CalculationError};
use super::error::{ProjectionError, Result};
use super::script::{merge_entries, Script};
use super::spelling::{Spelling, SpellingProperties};

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Default threshold below which a round runs on the calling thread.
pub const DEFAULT_MIN_PARALLEL_KEYS: usize = 64;

/// How rounds are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    /// Strict sequential fold on the calling thread.
    Sequential,
    /// Map/reduce on a dedicated worker pool.
    #[default]
    Parallel,
}

/// Engine tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Execution strategy
    pub strategy: ExecutionStrategy,
    /// Worker pool size for the parallel strategy
    pub workers: usize,
    /// Rounds over fewer keys than this run sequentially
    pub min_parallel_keys: usize,
}

impl EngineConfig {
    /// Strict sequential execution.
    pub fn sequential() -> Self {
        Self {
            strategy: ExecutionStrategy::Sequential,
            workers: 1,
            min_parallel_keys: 0,
        }
    }

    /// Parallel execution on `workers` threads, for every round regardless
    /// of size.
    pub fn parallel(workers: usize) -> Self {
        Self {
            strategy: ExecutionStrategy::Parallel,
            workers: workers.max(1),
            min_parallel_keys: 0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: ExecutionStrategy::Parallel,
            workers: default_workers(),
            min_parallel_keys: DEFAULT_MIN_PARALLEL_KEYS,
        }
    }
}

/// Available hardware parallelism, falling back to one worker.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// A pending merge produced by the map phase.
#[derive(Debug)]
struct Intent<'a> {
    dest: Cow<'a, str>,
    pending: Pending<'a>,
}

#[derive(Debug)]
struct Pending<'a> {
    batch: SpellingProperties,
    source: &'a [Spelling],
    ordinal: usize,
    slot: u8,
}

impl<'a> Intent<'a> {
    fn retain(key: &'a str, source: &'a [Spelling], ordinal: usize) -> Self {
        Self {
            dest: Cow::Borrowed(key),
            pending: Pending {
                batch: SpellingProperties::default(),
                source,
                ordinal,
                slot: 0,
            },
        }
    }

    fn derive(probe: Spelling, source: &'a [Spelling], ordinal: usize) -> Self {
        Self {
            dest: Cow::Owned(probe.text),
            pending: Pending {
                batch: probe.properties,
                source,
                ordinal,
                slot: 1,
            },
        }
    }
}

/// Outcome of the map phase for one key.
struct Mapped<'a> {
    applied: bool,
    intents: SmallVec<[Intent<'a>; 2]>,
}

/// Outcome of one round.
#[derive(Debug)]
pub struct RoundOutcome {
    /// The next generation
    pub script: Script,
    /// Whether the calculation applied to any key
    pub applied: bool,
}

/// Runs rounds of calculations over a [`Script`].
///
/// The engine owns its worker pool; build it once and reuse it across
/// [`run`](Self::run) calls.
#[derive(Debug)]
pub struct TransformEngine {
    config: EngineConfig,
    pool: Option<rayon::ThreadPool>,
}

impl TransformEngine {
    /// Build an engine, spawning the worker pool for the parallel strategy.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let pool = match config.strategy {
            ExecutionStrategy::Sequential => None,
            ExecutionStrategy::Parallel => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.workers.max(1))
                    .thread_name(|i| format!("spelling-algebra-{i}"))
                    .build()?,
            ),
        };
        Ok(Self { config, pool })
    }

    /// An engine that never spawns threads.
    pub fn sequential() -> Self {
        Self {
            config: EngineConfig::sequential(),
            pool: None,
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply `calculations` in order, one round each.
    ///
    /// Returns `Ok(None)` when no calculation applied to any key, otherwise
    /// the final generation. `script` is never modified; on error no partial
    /// generation escapes.
    pub fn run<C>(&self, calculations: &[C], script: &Script) -> Result<Option<Script>>
    where
        C: Calculation,
    {
        if script.is_empty() || calculations.is_empty() {
            return Ok(None);
        }

        let mut current: Option<Script> = None;
        let mut modified = false;
        for (i, calculation) in calculations.iter().enumerate() {
            let round = i + 1;
            let source = current.as_ref().unwrap_or(script);
            debug!("round #{} over {} keys", round, source.len());

            let outcome = self.round(round, calculation, source)?;
            modified |= outcome.applied;
            current = Some(outcome.script);
        }

        Ok(if modified { current } else { None })
    }

    /// Execute a single round.
    ///
    /// `round` is the 1-based rule position, used for error reporting.
    pub fn round<C>(&self, round: usize, calculation: &C, current: &Script) -> Result<RoundOutcome>
    where
        C: Calculation + ?Sized,
    {
        match &self.pool {
            Some(pool) if current.len() >= self.config.min_parallel_keys => {
                pool.install(|| parallel_round(round, calculation, current))
            }
            _ => sequential_round(round, calculation, current),
        }
    }
}

/// Rule outcome for a single key: which merges it asks for.
fn map_key<'a, C>(
    calculation: &C,
    ordinal: usize,
    key: &'a str,
    source: &'a [Spelling],
) -> std::result::Result<Mapped<'a>, CalculationError>
where
    C: Calculation + ?Sized,
{
    let mut probe = Spelling::new(key);
    let applied = calculation.apply(&mut probe)?;

    let mut intents = SmallVec::new();
    if applied {
        if !calculation.deletion() {
            intents.push(Intent::retain(key, source, ordinal));
        }
        if calculation.addition() && !probe.text.is_empty() {
            intents.push(Intent::derive(probe, source, ordinal));
        }
    } else {
        intents.push(Intent::retain(key, source, ordinal));
    }

    Ok(Mapped { applied, intents })
}

fn round_failure(round: usize, key: &str, source: CalculationError) -> ProjectionError {
    error!("Error applying calculation #{} to '{}': {}", round, key, source);
    ProjectionError::Calculation {
        round,
        key: key.to_string(),
        source,
    }
}

/// Reference semantics: merge every intent as soon as it is produced.
fn sequential_round<C>(round: usize, calculation: &C, current: &Script) -> Result<RoundOutcome>
where
    C: Calculation + ?Sized,
{
    let mut next = Script::new();
    let mut applied = false;

    for (ordinal, (key, source)) in current.iter().enumerate() {
        let mapped = map_key(calculation, ordinal, key, source)
            .map_err(|e| round_failure(round, key, e))?;
        applied |= mapped.applied;
        for intent in mapped.intents {
            next.merge(&intent.dest, &intent.pending.batch, intent.pending.source);
        }
    }

    Ok(RoundOutcome {
        script: next,
        applied,
    })
}

/// Map/reduce round. Must be called inside the engine's pool.
fn parallel_round<C>(round: usize, calculation: &C, current: &Script) -> Result<RoundOutcome>
where
    C: Calculation + ?Sized,
{
    let keys: Vec<(&String, &Vec<Spelling>)> = current.iter().collect();
    let abort = AtomicBool::new(false);
    let failure: Mutex<Option<ProjectionError>> = Mutex::new(None);

    // Map: read-only over `current`.
    let mapped: Vec<Mapped<'_>> = keys
        .par_iter()
        .enumerate()
        .filter_map(|(ordinal, &(key, source))| {
            if abort.load(Ordering::Relaxed) {
                return None;
            }
            match map_key(calculation, ordinal, key, source) {
                Ok(mapped) => Some(mapped),
                Err(e) => {
                    abort.store(true, Ordering::Relaxed);
                    let mut slot = failure.lock();
                    if slot.is_none() {
                        *slot = Some(round_failure(round, key, e));
                    }
                    None
                }
            }
        })
        .collect();

    if let Some(e) = failure.into_inner() {
        return Err(e);
    }

    let applied = mapped.par_iter().any(|m| m.applied);

    // Reduce, step 1: group by destination key.
    let groups: DashMap<Cow<'_, str>, Vec<Pending<'_>>, FxBuildHasher> =
        DashMap::with_capacity_and_hasher(keys.len(), FxBuildHasher::default());
    mapped
        .into_par_iter()
        .flat_map_iter(|m| m.intents)
        .for_each(|intent| {
            groups.entry(intent.dest).or_default().push(intent.pending);
        });

    // Reduce, step 2: one worker folds each destination key.
    let next: BTreeMap<String, Vec<Spelling>> = groups
        .into_par_iter()
        .map(|(dest, mut pending)| {
            pending.sort_unstable_by_key(|p| (p.ordinal, p.slot));
            let mut entries = Vec::new();
            for p in &pending {
                merge_entries(&mut entries, &p.batch, p.source);
            }
            (dest.into_owned(), entries)
        })
        .collect();

    Ok(RoundOutcome {
        script: Script::from_map(next),
        applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::spelling::SpellingType;

    /// Appends `suffix` to keys ending in `ending`.
    struct Suffix {
        ending: char,
        suffix: &'static str,
        addition: bool,
        deletion: bool,
    }

    impl Calculation for Suffix {
        fn apply(&self, spelling: &mut Spelling) -> std::result::Result<bool, CalculationError> {
            if !spelling.text.ends_with(self.ending) {
                return Ok(false);
            }
            spelling.text.push_str(self.suffix);
            spelling.properties.kind = SpellingType::Completion;
            Ok(true)
        }

        fn addition(&self) -> bool {
            self.addition
        }

        fn deletion(&self) -> bool {
            self.deletion
        }
    }

    struct FailOn(&'static str);

    impl Calculation for FailOn {
        fn apply(&self, spelling: &mut Spelling) -> std::result::Result<bool, CalculationError> {
            if spelling.text == self.0 {
                return Err(CalculationError::Malformed(spelling.text.clone()));
            }
            Ok(false)
        }
    }

    fn sample(n: usize) -> Script {
        Script::from_syllables((0..n).map(|i| format!("k{}{}", i, if i % 3 == 0 { "a" } else { "b" })))
    }

    #[test]
    fn test_empty_inputs_are_noop() {
        let engine = TransformEngine::sequential();
        let rules: Vec<Suffix> = Vec::new();
        assert!(engine.run(&rules, &sample(3)).unwrap().is_none());

        let rule = [Suffix { ending: 'a', suffix: "x", addition: true, deletion: false }];
        assert!(engine.run(&rule, &Script::new()).unwrap().is_none());
    }

    #[test]
    fn test_parallel_round_matches_sequential() {
        let script = sample(200);
        let rules = [
            Suffix { ending: 'a', suffix: "x", addition: true, deletion: false },
            Suffix { ending: 'x', suffix: "", addition: true, deletion: true },
            Suffix { ending: 'b', suffix: "a", addition: true, deletion: true },
        ];

        let expected = TransformEngine::sequential().run(&rules, &script).unwrap().unwrap();
        for workers in [1, 2, 8] {
            let engine = TransformEngine::new(EngineConfig::parallel(workers)).unwrap();
            let actual = engine.run(&rules, &script).unwrap().unwrap();
            assert!(actual.same_as(&expected), "workers = {}", workers);
        }
    }

    #[test]
    fn test_failure_aborts_round() {
        let script = sample(100);
        let rules = [FailOn("k42b")];
        let engine = TransformEngine::new(EngineConfig::parallel(4)).unwrap();
        match engine.run(&rules, &script) {
            Err(ProjectionError::Calculation { round, key, .. }) => {
                assert_eq!(round, 1);
                assert_eq!(key, "k42b");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_small_round_runs_sequential_path() {
        let config = EngineConfig {
            strategy: ExecutionStrategy::Parallel,
            workers: 2,
            min_parallel_keys: 1000,
        };
        let engine = TransformEngine::new(config).unwrap();
        let rules = [Suffix { ending: 'a', suffix: "x", addition: true, deletion: false }];
        let result = engine.run(&rules, &sample(10)).unwrap().unwrap();
        assert!(result.contains_key("k0ax"));
    }
}

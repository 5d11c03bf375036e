//! Waypoint sequencing strategies.
//!
//! Both implementations are exact: they evaluate every ordering of the
//! waypoints and agree on the winner, including ties. [`ParallelSequencer`]
//! only spreads the enumeration across the rayon pool.

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::matrix::{DistanceMatrix, StopKey};

/// Supported sequencing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SequencerKind {
    /// Single-threaded lexicographic enumeration.
    #[default]
    Exhaustive,
    /// Enumeration partitioned by first waypoint across worker threads.
    Parallel,
}

impl fmt::Display for SequencerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SequencerKind::Exhaustive => "exhaustive",
            SequencerKind::Parallel => "parallel",
        };
        f.write_str(value)
    }
}

/// Best stop ordering found by a sequencer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sequence {
    /// `Start`, the waypoints in visiting order, then `End`.
    pub order: Vec<StopKey>,
    pub total: f64,
    /// Number of orderings examined.
    pub evaluated: u64,
    /// Orderings abandoned at their first unreachable leg.
    pub pruned: u64,
}

/// Strategy for picking the cheapest waypoint ordering from a complete
/// distance matrix.
pub trait Sequencer: Send + Sync {
    fn kind(&self) -> SequencerKind;

    fn sequence(
        &self,
        matrix: &DistanceMatrix,
        waypoint_count: usize,
        cancel: &CancellationToken,
    ) -> Result<Sequence>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveSequencer;

impl Sequencer for ExhaustiveSequencer {
    fn kind(&self) -> SequencerKind {
        SequencerKind::Exhaustive
    }

    fn sequence(
        &self,
        matrix: &DistanceMatrix,
        waypoint_count: usize,
        cancel: &CancellationToken,
    ) -> Result<Sequence> {
        if waypoint_count == 0 {
            return direct_leg(matrix);
        }
        let search = search_partition(matrix, &[], (0..waypoint_count).collect(), cancel)?;
        finish(search)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelSequencer;

impl Sequencer for ParallelSequencer {
    fn kind(&self) -> SequencerKind {
        SequencerKind::Parallel
    }

    fn sequence(
        &self,
        matrix: &DistanceMatrix,
        waypoint_count: usize,
        cancel: &CancellationToken,
    ) -> Result<Sequence> {
        if waypoint_count == 0 {
            return direct_leg(matrix);
        }

        // Collected in partition order, so the fold below sees orderings in
        // the same sequence as the single-threaded enumeration.
        let partitions = (0..waypoint_count)
            .into_par_iter()
            .map(|first| {
                let rest = (0..waypoint_count).filter(|&i| i != first).collect();
                search_partition(matrix, &[first], rest, cancel)
            })
            .collect::<Result<Vec<_>>>()?;

        let merged = partitions
            .into_iter()
            .fold(Search::default(), |mut acc, part| {
                acc.evaluated += part.evaluated;
                acc.pruned += part.pruned;
                if let Some((order, total)) = part.best {
                    acc.offer(order, total);
                }
                acc
            });
        finish(merged)
    }
}

/// Pick the sequencer implementation for a strategy.
pub fn select_sequencer(kind: SequencerKind) -> Box<dyn Sequencer> {
    match kind {
        SequencerKind::Exhaustive => Box::new(ExhaustiveSequencer),
        SequencerKind::Parallel => Box::new(ParallelSequencer),
    }
}

#[derive(Debug, Default)]
struct Search {
    best: Option<(Vec<usize>, f64)>,
    evaluated: u64,
    pruned: u64,
}

impl Search {
    fn offer(&mut self, order: Vec<usize>, total: f64) {
        let improves = match &self.best {
            Some((_, best)) => total < *best,
            None => true,
        };
        if improves {
            self.best = Some((order, total));
        }
    }
}

/// Enumerate `prefix` followed by every permutation of `rest`, in
/// lexicographic order of `rest`.
fn search_partition(
    matrix: &DistanceMatrix,
    prefix: &[usize],
    mut rest: Vec<usize>,
    cancel: &CancellationToken,
) -> Result<Search> {
    rest.sort_unstable();
    let mut search = Search::default();
    let mut candidate = Vec::with_capacity(prefix.len() + rest.len());

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        candidate.clear();
        candidate.extend_from_slice(prefix);
        candidate.extend_from_slice(&rest);

        search.evaluated += 1;
        match ordering_cost(matrix, &candidate) {
            Some(total) => search.offer(candidate.clone(), total),
            None => search.pruned += 1,
        }

        if !next_permutation(&mut rest) {
            break;
        }
    }

    Ok(search)
}

/// Total length of `Start, waypoints…, End`, or `None` as soon as a leg is
/// unreachable.
fn ordering_cost(matrix: &DistanceMatrix, waypoints: &[usize]) -> Option<f64> {
    let mut total = 0.0;
    let mut previous = StopKey::Start;
    for &index in waypoints {
        let next = StopKey::Waypoint(index);
        total += matrix.distance(previous, next)?;
        previous = next;
    }
    total += matrix.distance(previous, StopKey::End)?;
    Some(total)
}

fn direct_leg(matrix: &DistanceMatrix) -> Result<Sequence> {
    let total = matrix
        .distance(StopKey::Start, StopKey::End)
        .ok_or_else(|| Error::NoRouteFound {
            reason: "end is not reachable from start".to_string(),
        })?;
    Ok(Sequence {
        order: vec![StopKey::Start, StopKey::End],
        total,
        evaluated: 1,
        pruned: 0,
    })
}

fn finish(search: Search) -> Result<Sequence> {
    let (waypoints, total) = search.best.ok_or_else(|| Error::NoRouteFound {
        reason: format!(
            "none of the {} waypoint orderings connects start to end",
            search.evaluated
        ),
    })?;

    let mut order = Vec::with_capacity(waypoints.len() + 2);
    order.push(StopKey::Start);
    order.extend(waypoints.into_iter().map(StopKey::Waypoint));
    order.push(StopKey::End);

    tracing::debug!(
        evaluated = search.evaluated,
        pruned = search.pruned,
        total,
        "selected waypoint ordering"
    );

    Ok(Sequence {
        order,
        total,
        evaluated: search.evaluated,
        pruned: search.pruned,
    })
}

/// Advance `items` to the next lexicographic permutation. Returns `false`
/// once the last permutation has been reached.
fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let Some(pivot) = (0..items.len() - 1).rev().find(|&i| items[i] < items[i + 1]) else {
        return false;
    };
    let Some(successor) = (pivot + 1..items.len()).rev().find(|&j| items[j] > items[pivot]) else {
        return false;
    };
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}

//! Best-first search driven by the state priority queue.
//!
//! Nodes are ranked by `g + h` (cost so far plus heuristic estimate). The
//! frontier may hold several entries for one state; entries whose cost is
//! worse than the best known cost for that state are skipped when popped.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::config::SearchConfig;
use crate::queue::{QueueError, StateQueue};
use crate::{log_changes, log_checks};

/// Errors that can occur during search.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Frontier queue error: {0}")]
    Queue(#[from] QueueError),
    #[error("Expansion limit of {0} reached without finding a goal")]
    ExpansionLimit(usize),
    #[error("Negative step cost {0}: step costs must be non-negative")]
    NegativeStepCost(i32),
}

/// A search space explored from a single start state.
pub trait SearchProblem {
    type State: Clone + Eq + Hash;

    fn start(&self) -> &Self::State;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Neighbouring states with the cost of the step to reach each.
    /// Step costs must be non-negative.
    fn successors(&self, state: &Self::State) -> Vec<(Self::State, i32)>;

    /// Estimated remaining cost to a goal. Must not overestimate for the
    /// returned path to be optimal.
    fn heuristic(&self, state: &Self::State) -> i32;
}

/// Result of a successful search.
#[derive(Debug, Clone)]
pub struct SearchOutcome<S> {
    /// States from start to goal, inclusive.
    pub path: Vec<S>,
    /// Total cost of `path`.
    pub cost: i32,
    /// Number of states expanded.
    pub expanded: usize,
    /// Largest frontier size observed.
    pub peak_frontier: usize,
}

struct Node<S> {
    state: S,
    cost: i32,
}

/// Run best-first search from `problem.start()`.
///
/// Returns `Ok(None)` if the reachable space is exhausted without a goal.
pub fn best_first_search<P: SearchProblem>(
    problem: &P,
    config: &SearchConfig,
) -> Result<Option<SearchOutcome<P::State>>, SearchError> {
    let verbosity = config.verbosity;
    let mut frontier: StateQueue<Node<P::State>> = StateQueue::with_config(&config.queue_config())?;
    let mut best_cost: FxHashMap<P::State, i32> = FxHashMap::default();
    let mut parents: FxHashMap<P::State, P::State> = FxHashMap::default();

    let start = problem.start().clone();
    let start_priority = problem.heuristic(&start);
    best_cost.insert(start.clone(), 0);
    frontier.push_owned(
        Node {
            state: start,
            cost: 0,
        },
        start_priority,
    )?;

    let mut expanded = 0usize;
    let mut peak_frontier = frontier.len();

    while let Some((node, priority)) = frontier.pop_with_priority() {
        if best_cost
            .get(&node.state)
            .is_some_and(|&best| best < node.cost)
        {
            log_checks!(verbosity, "  skip stale entry (g={})", node.cost);
            continue;
        }

        if problem.is_goal(&node.state) {
            let path = reconstruct_path(&parents, node.state);
            log_changes!(
                verbosity,
                "Goal reached: cost={}, expanded={}, peak_frontier={}",
                node.cost,
                expanded,
                peak_frontier
            );
            return Ok(Some(SearchOutcome {
                path,
                cost: node.cost,
                expanded,
                peak_frontier,
            }));
        }

        if let Some(limit) = config.max_expansions {
            if expanded >= limit {
                log_changes!(verbosity, "Expansion limit {} reached", limit);
                return Err(SearchError::ExpansionLimit(limit));
            }
        }
        expanded += 1;
        log_checks!(
            verbosity,
            "Expand #{}: f={}, g={}, frontier={}",
            expanded,
            priority,
            node.cost,
            frontier.len()
        );

        for (next, step) in problem.successors(&node.state) {
            if step < 0 {
                return Err(SearchError::NegativeStepCost(step));
            }
            let cost = node.cost.saturating_add(step);
            if best_cost.get(&next).is_some_and(|&best| best <= cost) {
                continue;
            }
            best_cost.insert(next.clone(), cost);
            parents.insert(next.clone(), node.state.clone());
            let estimate = cost.saturating_add(problem.heuristic(&next));
            frontier.push_owned(Node { state: next, cost }, estimate)?;
        }
        peak_frontier = peak_frontier.max(frontier.len());
    }

    log_changes!(verbosity, "Search space exhausted after {} expansions", expanded);
    Ok(None)
}

fn reconstruct_path<S: Clone + Eq + Hash>(parents: &FxHashMap<S, S>, goal: S) -> Vec<S> {
    let mut path = vec![goal];
    while let Some(parent) = path.last().and_then(|s| parents.get(s)) {
        path.push(parent.clone());
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk on the integer line from `start` to `goal`, steps of +1 (cost 1)
    /// or +3 (cost 2), bounded by `limit`.
    struct LineWalk {
        start: i32,
        goal: i32,
        limit: i32,
    }

    impl SearchProblem for LineWalk {
        type State = i32;

        fn start(&self) -> &i32 {
            &self.start
        }

        fn is_goal(&self, state: &i32) -> bool {
            *state == self.goal
        }

        fn successors(&self, state: &i32) -> Vec<(i32, i32)> {
            [(state + 1, 1), (state + 3, 2)]
                .into_iter()
                .filter(|(s, _)| *s <= self.limit)
                .collect()
        }

        fn heuristic(&self, _state: &i32) -> i32 {
            0
        }
    }

    #[test]
    fn test_finds_cheapest_path() {
        let problem = LineWalk {
            start: 0,
            goal: 6,
            limit: 10,
        };
        let outcome = best_first_search(&problem, &SearchConfig::default())
            .unwrap()
            .unwrap();
        // Two +3 jumps cost 4; six +1 steps cost 6.
        assert_eq!(outcome.cost, 4);
        assert_eq!(outcome.path, vec![0, 3, 6]);
        assert!(outcome.expanded > 0);
        assert!(outcome.peak_frontier >= 1);
    }

    #[test]
    fn test_start_is_goal() {
        let problem = LineWalk {
            start: 5,
            goal: 5,
            limit: 10,
        };
        let outcome = best_first_search(&problem, &SearchConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(outcome.cost, 0);
        assert_eq!(outcome.path, vec![5]);
        assert_eq!(outcome.expanded, 0);
    }

    #[test]
    fn test_unreachable_goal_exhausts() {
        let problem = LineWalk {
            start: 0,
            goal: -1,
            limit: 20,
        };
        let result = best_first_search(&problem, &SearchConfig::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_expansion_limit() {
        let problem = LineWalk {
            start: 0,
            goal: 1000,
            limit: 2000,
        };
        let config = SearchConfig {
            max_expansions: Some(5),
            ..SearchConfig::default()
        };
        let result = best_first_search(&problem, &config);
        assert!(matches!(result, Err(SearchError::ExpansionLimit(5))));
    }

    /// Two states joined by a negative-cost cycle, with the goal behind it.
    struct NegativeCycle;

    impl SearchProblem for NegativeCycle {
        type State = u8;

        fn start(&self) -> &u8 {
            &0
        }

        fn is_goal(&self, state: &u8) -> bool {
            *state == 2
        }

        fn successors(&self, state: &u8) -> Vec<(u8, i32)> {
            match state {
                0 => vec![(1, -1_000_000_000)],
                1 => vec![(0, -1_000_000_000), (2, 100)],
                _ => Vec::new(),
            }
        }

        fn heuristic(&self, _state: &u8) -> i32 {
            0
        }
    }

    #[test]
    fn test_negative_step_cost_rejected() {
        let result = best_first_search(&NegativeCycle, &SearchConfig::default());
        assert!(matches!(
            result,
            Err(SearchError::NegativeStepCost(-1_000_000_000))
        ));
    }

    #[test]
    fn test_invalid_frontier_hint_surfaces_queue_error() {
        let problem = LineWalk {
            start: 0,
            goal: 1,
            limit: 2,
        };
        let config = SearchConfig {
            frontier_size_hint: 0,
            ..SearchConfig::default()
        };
        let result = best_first_search(&problem, &config);
        assert!(matches!(
            result,
            Err(SearchError::Queue(QueueError::InvalidSizeHint))
        ));
    }
}

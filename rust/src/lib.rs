//! Rust implementation of a bounded-growth state priority queue and the
//! best-first search that drives it.
//!
//! The queue is usable directly from Rust or, through PyO3, from Python.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::exceptions::{PyMemoryError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

mod config;
pub mod logging;
pub mod puzzle;
pub mod queue;
pub mod search;

pub use config::{QueueConfig, SearchConfig};
pub use puzzle::{scramble, Board, Direction, PuzzleError, SlidingPuzzle};
pub use queue::{QueueError, StateQueue};
pub use search::{best_first_search, SearchError, SearchOutcome, SearchProblem};

fn queue_error_to_py(err: QueueError) -> PyErr {
    match err {
        QueueError::AllocationFailed { .. } => PyMemoryError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Priority queue of Python objects (PyO3 wrapper).
///
/// `put` stores a `copy.deepcopy` of the state, so later mutation of the
/// caller's object does not affect the queued copy.
#[pyclass(name = "PriorityQueue")]
pub struct PyPriorityQueue {
    inner: StateQueue<PyObject>,
}

#[pymethods]
impl PyPriorityQueue {
    #[new]
    #[pyo3(signature = (size_hint=1, verbosity=0))]
    fn new(size_hint: usize, verbosity: u8) -> PyResult<Self> {
        Self::from_config(QueueConfig {
            size_hint,
            verbosity,
        })
    }

    #[staticmethod]
    fn from_config(config: QueueConfig) -> PyResult<Self> {
        let inner = StateQueue::with_config(&config).map_err(queue_error_to_py)?;
        Ok(Self { inner })
    }

    /// Insert a deep copy of `state` with the given priority.
    fn put(&mut self, state: &Bound<'_, PyAny>, priority: i32) -> PyResult<()> {
        let copy = state
            .py()
            .import_bound("copy")?
            .call_method1("deepcopy", (state,))?;
        self.inner
            .push_owned(copy.unbind(), priority)
            .map_err(queue_error_to_py)
    }

    /// Remove and return the lowest-priority state, or None when empty.
    fn pop(&mut self) -> Option<PyObject> {
        self.inner.pop()
    }

    fn pop_with_priority(&mut self) -> Option<(PyObject, i32)> {
        self.inner.pop_with_priority()
    }

    fn peek_priority(&self) -> Option<i32> {
        self.inner.peek_priority()
    }

    #[getter]
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn dump(&self) -> String {
        self.inner.dump_string()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "PriorityQueue(len={}, capacity={})",
            self.inner.len(),
            self.inner.capacity()
        )
    }
}

/// Solve a sliding-tile puzzle with best-first search.
///
/// # Arguments
/// * `tiles` - Row-major tile layout, 0 is the blank
/// * `width` - Board width (the board is width x width)
/// * `config` - Search configuration (frontier size hint, expansion limit, verbosity)
///
/// # Returns
/// * Layouts from start to goal, or None if the puzzle is unsolvable
///
/// # Raises
/// * ValueError if the layout is invalid
/// * RuntimeError if the expansion limit is reached
#[pyfunction]
#[pyo3(signature = (tiles, width, config=None))]
fn solve_puzzle(
    tiles: Vec<u8>,
    width: usize,
    config: Option<SearchConfig>,
) -> PyResult<Option<Vec<Vec<u8>>>> {
    let puzzle =
        SlidingPuzzle::new(width, tiles).map_err(|e| PyValueError::new_err(e.to_string()))?;
    if !puzzle.is_solvable() {
        return Ok(None);
    }

    let config = config.unwrap_or_default();
    match best_first_search(&puzzle, &config) {
        Ok(outcome) => Ok(outcome.map(|o| o.path.iter().map(|b| b.tiles().to_vec()).collect())),
        Err(SearchError::Queue(e)) => Err(queue_error_to_py(e)),
        Err(e @ SearchError::ExpansionLimit(_)) => Err(PyRuntimeError::new_err(e.to_string())),
        Err(e @ SearchError::NegativeStepCost(_)) => Err(PyValueError::new_err(e.to_string())),
    }
}

/// Generate a solvable puzzle layout by random blank moves from the goal.
#[pyfunction]
#[pyo3(signature = (width, moves, seed=0))]
fn scramble_puzzle(width: usize, moves: usize, seed: u64) -> PyResult<Vec<u8>> {
    match scramble(width, moves, seed) {
        Ok(puzzle) => Ok(puzzle.start().tiles().to_vec()),
        Err(e) => Err(PyValueError::new_err(e.to_string())),
    }
}

/// The statepq.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core types
    m.add_class::<PyPriorityQueue>()?;

    // Config types
    m.add_class::<QueueConfig>()?;
    m.add_class::<SearchConfig>()?;

    // Search
    m.add_function(wrap_pyfunction!(solve_puzzle, m)?)?;
    m.add_function(wrap_pyfunction!(scramble_puzzle, m)?)?;

    Ok(())
}

//! Configuration types for the queue and the search driver.

use pyo3::prelude::*;

/// Configuration for a state priority queue.
#[pyclass]
#[derive(Clone, Debug)]
pub struct QueueConfig {
    /// Expected number of resident states; must be positive
    #[pyo3(get, set)]
    pub size_hint: usize,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            size_hint: 1,
            verbosity: 0,
        }
    }
}

#[pymethods]
impl QueueConfig {
    #[new]
    #[pyo3(signature = (size_hint=None, verbosity=None))]
    fn new(size_hint: Option<usize>, verbosity: Option<u8>) -> Self {
        let defaults = Self::default();
        Self {
            size_hint: size_hint.unwrap_or(defaults.size_hint),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "QueueConfig(size_hint={}, verbosity={})",
            self.size_hint, self.verbosity
        )
    }
}

/// Configuration for best-first search.
#[pyclass]
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Size hint for the frontier queue
    #[pyo3(get, set)]
    pub frontier_size_hint: usize,
    /// Abort after this many expansions (None = unlimited)
    #[pyo3(get, set)]
    pub max_expansions: Option<usize>,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            frontier_size_hint: 1024,
            max_expansions: None,
            verbosity: 0,
        }
    }
}

impl SearchConfig {
    /// Queue configuration for the search frontier.
    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            size_hint: self.frontier_size_hint,
            verbosity: self.verbosity,
        }
    }
}

#[pymethods]
impl SearchConfig {
    #[new]
    #[pyo3(signature = (frontier_size_hint=None, max_expansions=None, verbosity=None))]
    fn new(
        frontier_size_hint: Option<usize>,
        max_expansions: Option<usize>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            frontier_size_hint: frontier_size_hint.unwrap_or(defaults.frontier_size_hint),
            max_expansions,
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SearchConfig(frontier_size_hint={}, max_expansions={:?})",
            self.frontier_size_hint, self.max_expansions
        )
    }
}

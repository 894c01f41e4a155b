// SPDX-License-Identifier: MIT OR Apache-2.0
//! Lock-guarded graph handle for hosts that touch the graph from more than
//! one thread.
//!
//! Every mutation runs to completion under the write lock, so readers never
//! observe a half-applied wiring change.

use crate::graph::Graph;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared, single-writer graph handle
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<Graph>>,
}

impl SharedGraph {
    /// Wrap a graph
    pub fn new(graph: Graph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Run `f` with shared read access
    pub fn read<R>(&self, f: impl FnOnce(&Graph) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive write access
    pub fn write<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl From<Graph> for SharedGraph {
    fn from(graph: Graph) -> Self {
        Self::new(graph)
    }
}

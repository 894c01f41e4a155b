// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compute strategies that derive an output socket's value.
//!
//! A strategy sees the owning node's input values in socket index order and
//! returns the new value of the output it is attached to. Strategies are
//! attached when a node kind is declared (see [`crate::templates`]), not
//! captured ad hoc, so they never need to look anything up in the graph.

use crate::socket::SocketValue;
use std::fmt;
use std::sync::Arc;

/// Derives an output value from a node's input values
pub trait ComputeStrategy: fmt::Debug + Send + Sync {
    /// Compute the output value. `inputs` is ordered by input socket index.
    fn compute(&self, inputs: &[SocketValue]) -> SocketValue;
}

/// Shared handle to a compute strategy
pub type Compute = Arc<dyn ComputeStrategy>;

/// Strategy backed by a plain function pointer
#[derive(Clone, Copy)]
pub struct FnStrategy {
    name: &'static str,
    func: fn(&[SocketValue]) -> SocketValue,
}

impl FnStrategy {
    /// Wrap a function
    pub fn new(name: &'static str, func: fn(&[SocketValue]) -> SocketValue) -> Self {
        Self { name, func }
    }
}

impl fmt::Debug for FnStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnStrategy").field(&self.name).finish()
    }
}

impl ComputeStrategy for FnStrategy {
    fn compute(&self, inputs: &[SocketValue]) -> SocketValue {
        (self.func)(inputs)
    }
}

/// Numeric folds over all inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    /// `x0 + x1 + ...`
    Sum,
    /// `x0 * x1 * ...`
    Product,
    /// `x0 - x1 - ...`
    Difference,
    /// `x0 / x1 / ...`
    Quotient,
}

impl ComputeStrategy for Arithmetic {
    fn compute(&self, inputs: &[SocketValue]) -> SocketValue {
        let mut numbers = inputs.iter().map(|v| v.as_f64().unwrap_or(f64::NAN));
        let Some(first) = numbers.next() else {
            return SocketValue::Float(match self {
                Self::Product | Self::Quotient => 1.0,
                Self::Sum | Self::Difference => 0.0,
            });
        };
        let result = match self {
            Self::Sum => numbers.fold(first, |acc, v| acc + v),
            Self::Product => numbers.fold(first, |acc, v| acc * v),
            Self::Difference => numbers.fold(first, |acc, v| acc - v),
            Self::Quotient => numbers.fold(first, |acc, v| acc / v),
        };
        SocketValue::Float(result)
    }
}

/// Copies one input through unchanged, or holds a constant when the input
/// does not exist
#[derive(Debug, Clone, PartialEq)]
pub struct Passthrough {
    /// Input index to forward
    pub index: usize,
    /// Value used when the input is missing
    pub fallback: SocketValue,
}

impl ComputeStrategy for Passthrough {
    fn compute(&self, inputs: &[SocketValue]) -> SocketValue {
        inputs
            .get(self.index)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Constructors for the built-in strategies
pub mod builtin {
    use super::{Arithmetic, Compute, FnStrategy, Passthrough};
    use crate::socket::SocketValue;
    use std::sync::Arc;

    /// Sum of all inputs
    pub fn sum() -> Compute {
        Arc::new(Arithmetic::Sum)
    }

    /// Product of all inputs
    pub fn product() -> Compute {
        Arc::new(Arithmetic::Product)
    }

    /// First input minus the rest
    pub fn difference() -> Compute {
        Arc::new(Arithmetic::Difference)
    }

    /// First input divided by the rest
    pub fn quotient() -> Compute {
        Arc::new(Arithmetic::Quotient)
    }

    /// Forward input `index`, or `fallback` if the node has no such input
    pub fn passthrough(index: usize, fallback: impl Into<SocketValue>) -> Compute {
        Arc::new(Passthrough {
            index,
            fallback: fallback.into(),
        })
    }

    /// Wrap a plain function
    pub fn from_fn(name: &'static str, func: fn(&[SocketValue]) -> SocketValue) -> Compute {
        Arc::new(FnStrategy::new(name, func))
    }
}

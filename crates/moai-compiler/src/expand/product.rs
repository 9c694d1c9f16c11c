//! Cartesian product enumeration.

use moai_core::{IndexTuple, IndexValue};

/// Odometer over the product of ordered axes.
///
/// The first axis is outermost and the last axis varies fastest. With no
/// axes the product holds exactly one empty combination; if any axis is
/// empty it holds none.
#[derive(Debug, Clone)]
pub struct CartesianProduct<'a> {
    axes: Vec<&'a [IndexValue]>,
    cursor: Vec<usize>,
    done: bool,
}

impl<'a> CartesianProduct<'a> {
    pub fn new(axes: Vec<&'a [IndexValue]>) -> Self {
        let done = axes.iter().any(|axis| axis.is_empty());
        let cursor = vec![0; axes.len()];
        Self { axes, cursor, done }
    }

    /// Total number of combinations, saturating at `u64::MAX`.
    pub fn size(&self) -> u64 {
        self.axes
            .iter()
            .fold(1u64, |acc, axis| acc.saturating_mul(axis.len() as u64))
    }

    fn advance(&mut self) {
        for pos in (0..self.axes.len()).rev() {
            self.cursor[pos] += 1;
            if self.cursor[pos] < self.axes[pos].len() {
                return;
            }
            self.cursor[pos] = 0;
        }
        // Carried out of the outermost axis (or there were no axes).
        self.done = true;
    }
}

impl<'a> Iterator for CartesianProduct<'a> {
    type Item = IndexTuple;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let tuple = self
            .cursor
            .iter()
            .zip(&self.axes)
            .map(|(&i, axis)| axis[i].clone())
            .collect();
        self.advance();
        Some(tuple)
    }
}

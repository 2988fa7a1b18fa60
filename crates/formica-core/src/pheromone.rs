//! Pheromone — learned preference weights between node pairs.
//!
//! Like signal decay on a substrate, trails evaporate once per iteration
//! and are reinforced along the edges of completed solutions. The matrix
//! is dense and indexed by node id, so its dimension is
//! `max node id + 1` even when ids are sparse.
//!
//! Every cell stays finite and non-negative: reads never mutate, and the
//! only writers are [`PheromoneMatrix::evaporate`] and
//! [`PheromoneMatrix::deposit`], which reject values that would break
//! that invariant.

use crate::directory::NodeDirectory;
use crate::error::{FormicaError, Result};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// Whether trail updates are mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symmetry {
    /// `[i][j]` and `[j][i]` are always written together (routing).
    Undirected,
    /// Traversal order matters; `[i][j]` is independent of `[j][i]` (placement).
    Directed,
}

/// Dense `dim × dim` pheromone table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PheromoneMatrix {
    dim: usize,
    symmetry: Symmetry,
    cells: Vec<f64>,
}

impl PheromoneMatrix {
    /// All-zero matrix.
    pub fn new(dim: usize, symmetry: Symmetry) -> Self {
        Self::filled(dim, symmetry, 0.0)
    }

    /// Matrix with every cell set to `value`.
    pub fn filled(dim: usize, symmetry: Symmetry, value: f64) -> Self {
        Self {
            dim,
            symmetry,
            cells: vec![value; dim * dim],
        }
    }

    /// Matrix sized `(max node id + 1)²` for the given directory.
    pub fn for_directory(directory: &dyn NodeDirectory, symmetry: Symmetry) -> Result<Self> {
        let max_id = directory.max_node_id().ok_or_else(|| {
            FormicaError::invalid_input("cannot size a pheromone matrix for an empty node list")
        })?;
        Ok(Self::new(max_id.index() + 1, symmetry))
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    fn offset(&self, from: NodeId, to: NodeId) -> Option<usize> {
        if from.index() < self.dim && to.index() < self.dim {
            Some(from.index() * self.dim + to.index())
        } else {
            None
        }
    }

    /// Trail value on `from → to`. Ids outside the matrix read as 0.
    pub fn get(&self, from: NodeId, to: NodeId) -> f64 {
        self.offset(from, to).map_or(0.0, |o| self.cells[o])
    }

    /// Overwrite a cell (and its mirror when undirected).
    pub fn set(&mut self, from: NodeId, to: NodeId, value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(FormicaError::configuration(format!(
                "pheromone value {} for {} -> {} must be finite and non-negative",
                value, from, to
            )));
        }
        let forward = self.offset(from, to).ok_or_else(|| {
            FormicaError::invalid_input(format!(
                "{} -> {} lies outside the {}x{} pheromone matrix",
                from, to, self.dim, self.dim
            ))
        })?;
        self.cells[forward] = value;
        if self.symmetry == Symmetry::Undirected {
            if let Some(mirror) = self.offset(to, from) {
                self.cells[mirror] = value;
            }
        }
        Ok(())
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: f64) {
        self.cells.iter_mut().for_each(|c| *c = value);
    }

    /// Multiply every cell by `1 - ratio`.
    pub fn evaporate(&mut self, ratio: f64) {
        let keep = 1.0 - ratio;
        self.cells.iter_mut().for_each(|c| *c *= keep);
    }

    /// Add `amount` to `from → to` (and its mirror when undirected).
    ///
    /// Non-finite or negative amounts and out-of-range ids are ignored;
    /// returns whether anything was written.
    pub fn deposit(&mut self, from: NodeId, to: NodeId, amount: f64) -> bool {
        if !amount.is_finite() || amount < 0.0 {
            return false;
        }
        let Some(forward) = self.offset(from, to) else {
            return false;
        };
        self.cells[forward] += amount;
        if self.symmetry == Symmetry::Undirected && from != to {
            if let Some(mirror) = self.offset(to, from) {
                self.cells[mirror] += amount;
            }
        }
        true
    }

    /// Whether `[i][j] == [j][i]` for every pair.
    pub fn is_symmetric(&self) -> bool {
        (0..self.dim).all(|i| {
            (i + 1..self.dim).all(|j| self.cells[i * self.dim + j] == self.cells[j * self.dim + i])
        })
    }

    /// Whether every cell is finite and non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.cells.iter().all(|c| c.is_finite() && *c >= 0.0)
    }

    /// Sum of all cells.
    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Row `from` as a slice.
    pub fn row(&self, from: NodeId) -> &[f64] {
        if from.index() < self.dim {
            let start = from.index() * self.dim;
            &self.cells[start..start + self.dim]
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeProfile;

    #[test]
    fn undirected_deposit_mirrors() {
        let mut m = PheromoneMatrix::new(4, Symmetry::Undirected);
        assert!(m.deposit(NodeId(1), NodeId(3), 0.25));
        assert_eq!(m.get(NodeId(1), NodeId(3)), 0.25);
        assert_eq!(m.get(NodeId(3), NodeId(1)), 0.25);
        assert!(m.is_symmetric());
    }

    #[test]
    fn directed_deposit_is_one_way() {
        let mut m = PheromoneMatrix::new(4, Symmetry::Directed);
        m.deposit(NodeId(1), NodeId(3), 0.25);
        assert_eq!(m.get(NodeId(1), NodeId(3)), 0.25);
        assert_eq!(m.get(NodeId(3), NodeId(1)), 0.0);
        assert!(!m.is_symmetric());
    }

    #[test]
    fn evaporation_scales_every_cell() {
        let mut m = PheromoneMatrix::filled(3, Symmetry::Undirected, 2.0);
        m.evaporate(0.25);
        assert!(m.row(NodeId(1)).iter().all(|&c| (c - 1.5).abs() < 1e-12));
    }

    #[test]
    fn full_evaporation_leaves_only_new_deposits() {
        let mut m = PheromoneMatrix::filled(3, Symmetry::Undirected, 7.0);
        m.evaporate(1.0);
        m.deposit(NodeId(0), NodeId(1), 0.5);
        assert_eq!(m.get(NodeId(0), NodeId(1)), 0.5);
        assert_eq!(m.get(NodeId(2), NodeId(2)), 0.0);
        assert!((m.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_deposits_are_rejected() {
        let mut m = PheromoneMatrix::new(2, Symmetry::Directed);
        assert!(!m.deposit(NodeId(0), NodeId(1), f64::INFINITY));
        assert!(!m.deposit(NodeId(0), NodeId(1), -1.0));
        assert!(!m.deposit(NodeId(0), NodeId(5), 1.0));
        assert!(m.is_well_formed());
        assert_eq!(m.total(), 0.0);
    }

    #[test]
    fn set_rejects_nan() {
        let mut m = PheromoneMatrix::new(2, Symmetry::Directed);
        assert!(m.set(NodeId(0), NodeId(1), f64::NAN).is_err());
        assert!(m.set(NodeId(0), NodeId(9), 1.0).unwrap_err().is_invalid_input());
    }

    struct Sparse(Vec<NodeProfile>);

    impl NodeDirectory for Sparse {
        fn nodes(&self) -> &[NodeProfile] {
            &self.0
        }

        fn node(&self, id: NodeId) -> Option<&NodeProfile> {
            self.0.iter().find(|n| n.id == id)
        }

        fn latency(&self, _: NodeId, _: NodeId) -> Option<f64> {
            None
        }
    }

    #[test]
    fn directory_sizing_follows_largest_id() {
        let nodes = Sparse(vec![NodeProfile::new(2, 1.0), NodeProfile::new(6, 1.0)]);
        let mut m = PheromoneMatrix::for_directory(&nodes, Symmetry::Undirected).unwrap();
        assert_eq!(m.dimension(), 7);
        assert_eq!(m.total(), 0.0);

        m.fill(0.5);
        assert_eq!(m.get(NodeId(0), NodeId(6)), 0.5);
        assert!((m.total() - 49.0 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_directory_cannot_size_a_matrix() {
        let err = PheromoneMatrix::for_directory(&Sparse(Vec::new()), Symmetry::Directed).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn out_of_range_reads_are_zero() {
        let m = PheromoneMatrix::filled(2, Symmetry::Directed, 1.0);
        assert_eq!(m.get(NodeId(5), NodeId(0)), 0.0);
        assert!(m.row(NodeId(5)).is_empty());
    }
}

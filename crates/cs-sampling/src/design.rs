//! Tagged parameter designs.

use cs_core::GroupId;

/// Sampling scheme a design was generated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    /// Saltelli radial groups of `[A, AB_1..AB_k, (BA_1..BA_k,) B]`.
    Saltelli {
        base_samples: usize,
        second_order: bool,
    },
    /// Morris trajectories of `k + 1` rows.
    Morris {
        num_trajectories: usize,
        num_levels: usize,
    },
}

impl Scheme {
    /// Rows per group (Saltelli) or per trajectory (Morris) for `k` variables.
    pub fn group_size(&self, k: usize) -> usize {
        match self {
            Scheme::Saltelli {
                second_order: true, ..
            } => 2 * k + 2,
            Scheme::Saltelli {
                second_order: false,
                ..
            } => k + 2,
            Scheme::Morris { .. } => k + 1,
        }
    }

    pub fn num_groups(&self) -> usize {
        match self {
            Scheme::Saltelli { base_samples, .. } => *base_samples,
            Scheme::Morris {
                num_trajectories, ..
            } => *num_trajectories,
        }
    }
}

/// One parameter vector of a design.
#[derive(Clone, Debug, PartialEq)]
pub struct DesignRow {
    /// Radial group or trajectory this row belongs to.
    pub group: GroupId,
    /// Parameter values, mapped into the space's bounds.
    pub values: Vec<f64>,
    /// The same point in the unit hypercube.
    pub unit: Vec<f64>,
}

/// Ordered parameter vectors whose grouping analyzers rely on.
///
/// Rows are stored group by group; every group has exactly
/// `scheme.group_size(num_vars)` consecutive rows and each row records its
/// group id.
#[derive(Clone, Debug, PartialEq)]
pub struct Design {
    scheme: Scheme,
    num_vars: usize,
    rows: Vec<DesignRow>,
}

impl Design {
    pub(crate) fn new(scheme: Scheme, num_vars: usize, rows: Vec<DesignRow>) -> Self {
        debug_assert_eq!(rows.len(), scheme.num_groups() * scheme.group_size(num_vars));
        Self {
            scheme,
            num_vars,
            rows,
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn group_size(&self) -> usize {
        self.scheme.group_size(self.num_vars)
    }

    pub fn num_groups(&self) -> usize {
        self.rows.len() / self.group_size()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DesignRow] {
        &self.rows
    }

    /// Rows of each group, in order.
    pub fn groups(&self) -> impl Iterator<Item = &[DesignRow]> {
        self.rows.chunks_exact(self.group_size())
    }

    /// Parameter values as a plain matrix, one row per sample.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.values.clone()).collect()
    }
}

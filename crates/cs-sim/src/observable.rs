//! Scalar observables extracted from a trajectory.

use crate::error::{SimError, SimResult};
use crate::solve::Trajectory;

/// Which output time an observable reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ObservationTime {
    /// The last grid point (end of the time span).
    #[default]
    Final,
    /// A specific grid index.
    Index(usize),
}

/// Scalar model output: one state component at one output time.
///
/// The default, component 0 at the final time, is the historical choice for
/// Lorenz-family studies. Whatever is chosen must be applied to every row of
/// a design.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Observable {
    pub component: usize,
    pub time: ObservationTime,
}

impl Observable {
    pub fn final_component(component: usize) -> Self {
        Self {
            component,
            time: ObservationTime::Final,
        }
    }

    pub fn extract(&self, traj: &Trajectory) -> SimResult<f64> {
        let index = match self.time {
            ObservationTime::Final => traj.len().checked_sub(1).ok_or(
                SimError::ObservableOutOfRange {
                    what: "time index",
                    index: 0,
                    len: 0,
                },
            )?,
            ObservationTime::Index(i) => i,
        };
        let state = traj.x.get(index).ok_or(SimError::ObservableOutOfRange {
            what: "time index",
            index,
            len: traj.len(),
        })?;
        state
            .get(self.component)
            .copied()
            .ok_or(SimError::ObservableOutOfRange {
                what: "state component",
                index: self.component,
                len: state.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn traj() -> Trajectory {
        Trajectory {
            t: vec![0.0, 1.0, 2.0],
            x: vec![dvector![1.0, 10.0], dvector![2.0, 20.0], dvector![3.0, 30.0]],
            accepted_steps: 2,
            rejected_steps: 0,
        }
    }

    #[test]
    fn default_reads_first_component_at_final_time() {
        assert_eq!(Observable::default().extract(&traj()).unwrap(), 3.0);
    }

    #[test]
    fn configurable_component_and_time() {
        let obs = Observable {
            component: 1,
            time: ObservationTime::Index(1),
        };
        assert_eq!(obs.extract(&traj()).unwrap(), 20.0);
        assert_eq!(Observable::final_component(1).extract(&traj()).unwrap(), 30.0);
    }

    #[test]
    fn out_of_range_is_an_error() {
        let obs = Observable::final_component(2);
        assert!(matches!(
            obs.extract(&traj()),
            Err(SimError::ObservableOutOfRange { what: "state component", .. })
        ));
        let obs = Observable {
            component: 0,
            time: ObservationTime::Index(3),
        };
        assert!(matches!(
            obs.extract(&traj()),
            Err(SimError::ObservableOutOfRange { what: "time index", .. })
        ));
    }
}

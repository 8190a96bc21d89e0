//! Outcome of bounded fixed-point iterations.

/// Result of a loop that stops either on its tolerance or on its iteration cap.
///
/// Reaching the cap is not an error: the state reached so far is still returned,
/// tagged so the caller can decide whether to accept it.
#[derive(Debug, Clone, PartialEq)]
pub enum IterationOutcome<S> {
    Converged { state: S, iterations: usize },
    MaxIterationsReached { state: S, iterations: usize },
}

impl<S> IterationOutcome<S> {
    /// Tag `state` according to whether the tolerance was met.
    pub fn from_flag(converged: bool, state: S, iterations: usize) -> Self {
        if converged {
            Self::Converged { state, iterations }
        } else {
            Self::MaxIterationsReached { state, iterations }
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    pub fn iterations(&self) -> usize {
        match self {
            Self::Converged { iterations, .. } | Self::MaxIterationsReached { iterations, .. } => {
                *iterations
            }
        }
    }

    pub fn state(&self) -> &S {
        match self {
            Self::Converged { state, .. } | Self::MaxIterationsReached { state, .. } => state,
        }
    }

    pub fn into_state(self) -> S {
        match self {
            Self::Converged { state, .. } | Self::MaxIterationsReached { state, .. } => state,
        }
    }

    /// Transform the carried state, keeping the tag and iteration count.
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> IterationOutcome<T> {
        match self {
            Self::Converged { state, iterations } => IterationOutcome::Converged {
                state: f(state),
                iterations,
            },
            Self::MaxIterationsReached { state, iterations } => {
                IterationOutcome::MaxIterationsReached {
                    state: f(state),
                    iterations,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_follows_flag() {
        let ok = IterationOutcome::from_flag(true, 1.5, 12);
        assert!(ok.is_converged());
        assert_eq!(ok.iterations(), 12);
        assert_eq!(*ok.state(), 1.5);

        let capped = IterationOutcome::from_flag(false, 2.5, 500);
        assert!(!capped.is_converged());
        assert_eq!(capped.into_state(), 2.5);
    }

    #[test]
    fn map_keeps_tag() {
        let capped = IterationOutcome::from_flag(false, 2, 7).map(|v| v * 10);
        assert_eq!(
            capped,
            IterationOutcome::MaxIterationsReached {
                state: 20,
                iterations: 7
            }
        );
    }
}

//! Population outcomes recorded on containers
//!
//! Population never aborts on a missing definition or a failed refinement
//! lookup. The container is left empty and the problem is recorded here so
//! the rendering layer can flag it.

use idm_schema::{DefinitionError, RefinementError};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Overall result of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Completed without problems
    Success,
    /// Completed with a degraded result
    PartialError,
    /// Could not produce a result
    FatalError,
}

/// One problem encountered while populating a container
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PopulationProblem {
    /// Definition could not be resolved
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Refinement service failed
    #[error(transparent)]
    Refinement(#[from] RefinementError),
}

/// Result of one population run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    operation: &'static str,
    status: OutcomeStatus,
    problems: Vec<PopulationProblem>,
}

impl OperationOutcome {
    /// Successful outcome of an operation
    #[inline]
    #[must_use]
    pub fn success(operation: &'static str) -> Self {
        Self {
            operation,
            status: OutcomeStatus::Success,
            problems: Vec::new(),
        }
    }

    /// Record a problem that leaves a usable, degraded result
    pub fn record_partial(&mut self, problem: impl Into<PopulationProblem>) {
        self.record(OutcomeStatus::PartialError, problem.into());
    }

    /// Record a problem that leaves no result
    pub fn record_fatal(&mut self, problem: impl Into<PopulationProblem>) {
        self.record(OutcomeStatus::FatalError, problem.into());
    }

    fn record(&mut self, status: OutcomeStatus, problem: PopulationProblem) {
        self.status = self.status.max(status);
        self.problems.push(problem);
    }

    /// Operation name
    #[inline]
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Worst status recorded
    #[inline]
    #[must_use]
    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    /// Recorded problems
    #[inline]
    #[must_use]
    pub fn problems(&self) -> &[PopulationProblem] {
        &self.problems
    }

    /// Check if no problem was recorded
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

impl Display for OperationOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.operation, self.status)?;
        for problem in &self.problems {
            write!(f, "; {problem}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idm_schema::ObjectType;

    #[test]
    fn status_escalates_and_never_downgrades() {
        let mut outcome = OperationOutcome::success("populate");
        assert!(outcome.is_success());

        outcome.record_fatal(RefinementError::MissingResourceRef);
        outcome.record_partial(DefinitionError::MissingObjectDefinition(ObjectType::Role));

        assert_eq!(outcome.status(), OutcomeStatus::FatalError);
        assert_eq!(outcome.problems().len(), 2);
        assert!(outcome.to_string().starts_with("populate: FatalError"));
    }
}

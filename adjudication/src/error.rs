//! Error taxonomy for a scoring pass.
//!
//! Every variant means the extraction layer handed over malformed input (or,
//! for [`AdjudicationError::InconsistentStatus`], that an internal invariant
//! broke). None of them are recoverable inside the engine.

use crate::argument::ArgumentId;
use crate::side::Side;

/// Error type for adjudication operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdjudicationError {
    #[error("Invalid clash {clash_id}: attacker is {attacker_side}, defender is {defender_side}")]
    InvalidClash {
        clash_id: String,
        attacker_side: Side,
        defender_side: Side,
    },

    #[error("Argument {0} is not assigned to any issue")]
    UnassignedArgument(ArgumentId),

    #[error("No contestable issues: the issue set is empty")]
    NoContestableIssues,

    #[error("No status derived for argument {0}")]
    InconsistentStatus(ArgumentId),

    #[error("Unknown argument {argument_id} referenced by {referenced_by}")]
    UnknownArgument {
        argument_id: ArgumentId,
        referenced_by: String,
    },

    #[error("Duplicate argument id: {0}")]
    DuplicateArgument(ArgumentId),

    #[error("Duplicate clash id: {0}")]
    DuplicateClash(String),

    #[error("Argument {argument_id} assigned to both {first_issue} and {second_issue}")]
    DuplicateAssignment {
        argument_id: ArgumentId,
        first_issue: String,
        second_issue: String,
    },

    #[error("Argument {argument_id}: {field} {value} outside [0, 10]")]
    InvalidScore {
        argument_id: ArgumentId,
        field: &'static str,
        value: f64,
    },

    #[error("Scoring worker failed: {0}")]
    WorkerFailed(String),
}

/// Result type for adjudication operations
pub type AdjudicationResult<T> = Result<T, AdjudicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_clash_message() {
        let err = AdjudicationError::InvalidClash {
            clash_id: "c1".to_string(),
            attacker_side: Side::Pro,
            defender_side: Side::Pro,
        };
        assert_eq!(
            err.to_string(),
            "Invalid clash c1: attacker is pro, defender is pro"
        );
    }

    #[test]
    fn test_unassigned_message() {
        let err = AdjudicationError::UnassignedArgument("a7".to_string());
        assert_eq!(err.to_string(), "Argument a7 is not assigned to any issue");
    }
}

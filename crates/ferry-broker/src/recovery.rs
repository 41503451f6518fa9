//! Failure triage and retry budgeting for the recovery loop.

use ferry_core::StatusCode;

use crate::classify::classify;
use crate::proto::ItemOutcome;

/// The failure categories the recovery loop acts on, in triage priority
/// order. Anything else is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// Privilege failure; recover by elevating and replaying the batch.
    Unauthorized,
    /// Another process holds the item; recover by prompting, then retrying
    /// the failed subset.
    InUse,
    /// Path exceeds the worker's length limit; recover locally (or abort
    /// for deletes).
    NameTooLong,
    /// Source vanished; notify, no retry.
    NotFound,
    /// Destination collided outside policy control; notify, no retry.
    AlreadyExists,
}

impl FailureReason {
    fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::Unauthorized => Some(Self::Unauthorized),
            StatusCode::InUse => Some(Self::InUse),
            StatusCode::NameTooLong => Some(Self::NameTooLong),
            StatusCode::NotFound => Some(Self::NotFound),
            StatusCode::AlreadyExists => Some(Self::AlreadyExists),
            _ => None,
        }
    }

    /// The status code reported when this reason ends the call.
    pub fn status(self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::Unauthorized,
            Self::InUse => StatusCode::InUse,
            Self::NameTooLong => StatusCode::NameTooLong,
            Self::NotFound => StatusCode::NotFound,
            Self::AlreadyExists => StatusCode::AlreadyExists,
        }
    }
}

/// Pick the reason the recovery loop should handle for this round.
///
/// Privilege failures outrank everything else because elevation replays the
/// whole batch, which also covers any co-occurring failures.
pub fn dominant_failure(items: &[ItemOutcome]) -> Option<FailureReason> {
    let reasons: Vec<FailureReason> = items
        .iter()
        .filter(|i| !i.succeeded)
        .filter_map(|i| FailureReason::from_status(classify(i.native_code)))
        .collect();

    const PRIORITY: [FailureReason; 5] = [
        FailureReason::Unauthorized,
        FailureReason::InUse,
        FailureReason::NameTooLong,
        FailureReason::NotFound,
        FailureReason::AlreadyExists,
    ];
    PRIORITY.into_iter().find(|r| reasons.contains(r))
}

/// Caps how often each failure reason may drive a retry within one
/// top-level call. Without a cap, a worker that keeps reporting the same
/// recoverable code would loop forever.
#[derive(Debug)]
pub struct RetryBudget {
    limit: u8,
    spent: [u8; 5],
}

impl RetryBudget {
    pub const DEFAULT_LIMIT: u8 = 3;

    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    pub fn with_limit(limit: u8) -> Self {
        Self {
            limit,
            spent: [0; 5],
        }
    }

    /// Spend one retry for `reason`; false once the budget is exhausted.
    pub fn try_spend(&mut self, reason: FailureReason) -> bool {
        let slot = &mut self.spent[reason as usize];
        if *slot >= self.limit {
            return false;
        }
        *slot += 1;
        true
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_DENIED: i32 = 5;
    const SHARING_VIOLATION: i32 = 32;
    const NOT_FOUND: i32 = 2;

    #[test]
    fn test_unauthorized_dominates() {
        let items = vec![
            ItemOutcome::failed("/a", SHARING_VIOLATION),
            ItemOutcome::failed("/b", ACCESS_DENIED),
            ItemOutcome::failed("/c", NOT_FOUND),
        ];
        assert_eq!(dominant_failure(&items), Some(FailureReason::Unauthorized));
    }

    #[test]
    fn test_unrecognised_codes_have_no_reason() {
        let items = vec![ItemOutcome::failed("/a", 0x0BAD_F00D)];
        assert_eq!(dominant_failure(&items), None);
        assert_eq!(dominant_failure(&[]), None);
    }

    #[test]
    fn test_budget_is_per_reason() {
        let mut budget = RetryBudget::with_limit(2);
        assert!(budget.try_spend(FailureReason::InUse));
        assert!(budget.try_spend(FailureReason::InUse));
        assert!(!budget.try_spend(FailureReason::InUse));
        // A different reason still has its own budget.
        assert!(budget.try_spend(FailureReason::Unauthorized));
    }
}

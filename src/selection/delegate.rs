use async_trait::async_trait;

use super::SelectionEntry;
use crate::organization::DelegateUser;

/// Asks the user who should act for `candidate`.
///
/// Returning `None` means the picker was dismissed and the toggle is dropped.
#[async_trait]
pub trait DelegatePicker: Send + Sync {
    async fn choose(
        &self,
        candidate: &SelectionEntry,
        delegates: &[DelegateUser],
    ) -> Option<DelegateUser>;
}

/// Always takes the first offered delegate. Used for scripted replays.
pub struct FirstDelegate;

#[async_trait]
impl DelegatePicker for FirstDelegate {
    async fn choose(
        &self,
        _candidate: &SelectionEntry,
        delegates: &[DelegateUser],
    ) -> Option<DelegateUser> {
        delegates.first().cloned()
    }
}

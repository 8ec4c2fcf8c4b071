use crate::{
    domain::{
        search::SessionFilter, ClubId, ClubSystem, Member, MemberId, Purchase, Registration,
        Rollover, Session, SessionId, Tier,
    },
    ports::state::{Error, StatePort},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory club system
///
/// The whole system sits behind a single lock, which serializes rollovers against registrations
/// and purchases.
#[derive(Clone, Debug)]
pub struct MemoryState {
    system: Arc<Mutex<ClubSystem>>,
}

impl MemoryState {
    pub fn new(system: ClubSystem) -> Self {
        Self {
            system: Arc::new(Mutex::new(system)),
        }
    }

    /// Exclusive access to the system, e.g. to set up clubs and trainings
    pub fn lock(&self) -> Result<MutexGuard<'_, ClubSystem>, Error> {
        Ok(self.system.lock()?)
    }
}

impl Default for MemoryState {
    fn default() -> Self {
        Self::new(ClubSystem::default())
    }
}

#[async_trait::async_trait]
impl StatePort for MemoryState {
    async fn get_member(&self, member_id: MemberId) -> Result<Member, Error> {
        Ok(self.lock()?.member(member_id)?.clone())
    }

    async fn buy_membership(
        &self,
        member_id: MemberId,
        club_id: ClubId,
        tier: Tier,
    ) -> Result<Purchase, Error> {
        Ok(self.lock()?.buy_membership(member_id, club_id, tier)?)
    }

    async fn register_to_session(
        &self,
        member_id: MemberId,
        session_id: SessionId,
    ) -> Result<Registration, Error> {
        Ok(self.lock()?.register_to_session(member_id, session_id)?)
    }

    async fn unregister_from_session(
        &self,
        member_id: MemberId,
        session_id: SessionId,
    ) -> Result<(), Error> {
        Ok(self.lock()?.unregister_from_session(member_id, session_id)?)
    }

    async fn next_month(&self, club_id: Option<ClubId>) -> Result<Vec<Rollover>, Error> {
        let mut system = self.lock()?;
        match club_id {
            Some(club_id) => Ok(vec![system.next_month(club_id)?]),
            None => Ok(system.next_month_all()),
        }
    }

    async fn find_sessions(&self, filter: SessionFilter) -> Result<Vec<Session>, Error> {
        Ok(self
            .lock()?
            .find_sessions(&filter)
            .into_iter()
            .cloned()
            .collect())
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}

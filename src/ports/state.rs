use crate::domain::{
    search::SessionFilter, ClubId, Member, MemberId, Purchase, Registration, Rollover, Session,
    SessionId, Tier,
};

/// Access to the club system state
///
/// Every call is applied atomically: concurrent callers never observe a partially applied
/// operation, including a rollover in progress.
#[mockall::automock]
#[async_trait::async_trait]
pub trait StatePort {
    async fn get_member(&self, member_id: MemberId) -> Result<Member, Error>;
    async fn buy_membership(
        &self,
        member_id: MemberId,
        club_id: ClubId,
        tier: Tier,
    ) -> Result<Purchase, Error>;
    async fn register_to_session(
        &self,
        member_id: MemberId,
        session_id: SessionId,
    ) -> Result<Registration, Error>;
    async fn unregister_from_session(
        &self,
        member_id: MemberId,
        session_id: SessionId,
    ) -> Result<(), Error>;
    /// End the month for one club, or for every club when `club_id` is `None`
    async fn next_month(&self, club_id: Option<ClubId>) -> Result<Vec<Rollover>, Error>;
    async fn find_sessions(&self, filter: SessionFilter) -> Result<Vec<Session>, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Domain-level errors, such as a rejected registration
    #[error(transparent)]
    Domain(#[from] crate::domain::Error),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}

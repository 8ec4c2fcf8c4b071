use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{ClubId, Rollover},
    ports::state::StatePort,
};
use tower::Service;

use super::{DomainLogic, Error};

/// End the current month
///
/// Without a club, every club ends the month at once.
#[derive(Default)]
pub struct NextMonthRequest {
    pub club_id: Option<ClubId>,
}

#[derive(Debug, PartialEq)]
pub struct NextMonthResponse {
    pub rollovers: Vec<Rollover>,
    /// Memberships that ended, over every club
    pub ended_memberships: usize,
}

impl<S> Service<NextMonthRequest> for DomainLogic<S>
where
    S: StatePort + 'static,
{
    type Response = NextMonthResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: NextMonthRequest) -> Self::Future {
        let state = self.state.clone();
        Box::pin(async move {
            let rollovers = state.next_month(req.club_id).await?;
            if let Some(club_id) = req.club_id {
                if rollovers.iter().any(|rollover| rollover.club_id != club_id) {
                    return Err(Error::InvalidState(
                        format!("rollover of {club_id} reported other clubs").into(),
                    ));
                }
            }

            let ended_memberships = rollovers.iter().map(|rollover| rollover.members).sum();
            log::info!(
                "{} club(s) rolled over, {ended_memberships} membership(s) ended",
                rollovers.len()
            );
            Ok(NextMonthResponse {
                rollovers,
                ended_memberships,
            })
        })
    }
}

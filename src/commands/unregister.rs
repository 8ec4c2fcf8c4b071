use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{MemberId, SessionId},
    ports::state::StatePort,
};
use tower::Service;

use super::{DomainLogic, Error};

pub struct UnregisterRequest {
    pub member_id: MemberId,
    pub session_id: SessionId,
}

#[derive(Debug, PartialEq)]
pub struct UnregisterResponse {
    pub member_id: MemberId,
    pub session_id: SessionId,
    /// Sessions the member is still registered to
    pub remaining_sessions: usize,
}

impl<S> Service<UnregisterRequest> for DomainLogic<S>
where
    S: StatePort + 'static,
{
    type Response = UnregisterResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: UnregisterRequest) -> Self::Future {
        let state = self.state.clone();
        Box::pin(async move {
            state
                .unregister_from_session(req.member_id, req.session_id)
                .await?;
            let member = state.get_member(req.member_id).await?;

            Ok(UnregisterResponse {
                member_id: req.member_id,
                session_id: req.session_id,
                remaining_sessions: member.sessions().count(),
            })
        })
    }
}

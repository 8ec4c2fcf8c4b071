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

pub struct RegisterRequest {
    pub member_id: MemberId,
    pub session_id: SessionId,
}

#[derive(Debug, PartialEq)]
pub struct RegisterResponse {
    pub member_id: MemberId,
    pub session_id: SessionId,
    /// Amount debited for the session
    pub charged: f64,
    /// Balance after the registration
    pub balance: f64,
    /// Previous number of loyalty points
    pub old_loyalty_points: u32,
    /// New number of loyalty points
    pub new_loyalty_points: u32,
}

impl<S> Service<RegisterRequest> for DomainLogic<S>
where
    S: StatePort + 'static,
{
    type Response = RegisterResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RegisterRequest) -> Self::Future {
        let state = self.state.clone();
        Box::pin(async move {
            let registration = state
                .register_to_session(req.member_id, req.session_id)
                .await?;

            // Points only ever grow within a month
            let old_loyalty_points = registration
                .loyalty_points
                .checked_sub(registration.points_awarded)
                .ok_or_else(|| {
                    Error::InvalidState(
                        format!(
                            "member {} holds fewer points than just awarded",
                            req.member_id
                        )
                        .into(),
                    )
                })?;

            Ok(RegisterResponse {
                member_id: registration.member_id,
                session_id: registration.session_id,
                charged: registration.charged,
                balance: registration.balance,
                old_loyalty_points,
                new_loyalty_points: registration.loyalty_points,
            })
        })
    }
}

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{ClubId, MemberId, Tier},
    ports::state::StatePort,
};
use tower::Service;

use super::{DomainLogic, Error};

pub struct BuyMembershipRequest {
    pub member_id: MemberId,
    pub club_id: ClubId,
    pub tier: Tier,
}

#[derive(Debug, PartialEq)]
pub struct BuyMembershipResponse {
    pub member_id: MemberId,
    pub club_id: ClubId,
    pub tier: Tier,
    /// Discount earned with last month's activity
    pub discount_percent: f64,
    pub price_paid: f64,
    /// Balance before the purchase
    pub old_balance: f64,
    /// Balance after the purchase
    pub new_balance: f64,
}

impl<S> Service<BuyMembershipRequest> for DomainLogic<S>
where
    S: StatePort + 'static,
{
    type Response = BuyMembershipResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: BuyMembershipRequest) -> Self::Future {
        let state = self.state.clone();
        Box::pin(async move {
            let purchase = state
                .buy_membership(req.member_id, req.club_id, req.tier)
                .await?;
            let membership = purchase.membership;

            Ok(BuyMembershipResponse {
                member_id: purchase.member_id,
                club_id: membership.club_id,
                tier: membership.tier,
                discount_percent: membership.discount_percent,
                price_paid: membership.price_paid,
                old_balance: purchase.previous_balance,
                new_balance: purchase.balance,
            })
        })
    }
}

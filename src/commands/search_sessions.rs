use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{search::SessionFilter, Session},
    ports::state::StatePort,
};
use tower::Service;

use super::{DomainLogic, Error};

pub struct SearchSessionsRequest {
    pub filter: SessionFilter,
    /// Only return sessions with room left
    pub available_only: bool,
}

#[derive(Debug)]
pub struct SearchSessionsResponse {
    /// Matching sessions, earliest first
    pub sessions: Vec<Session>,
}

impl<S> Service<SearchSessionsRequest> for DomainLogic<S>
where
    S: StatePort + 'static,
{
    type Response = SearchSessionsResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: SearchSessionsRequest) -> Self::Future {
        let state = self.state.clone();
        Box::pin(async move {
            validate(&req.filter)?;

            let mut sessions = state.find_sessions(req.filter).await?;
            if req.available_only {
                sessions.retain(|session| !session.is_full());
            }

            Ok(SearchSessionsResponse { sessions })
        })
    }
}

/// Reject ranges that cannot match anything
fn validate(filter: &SessionFilter) -> Result<(), Error> {
    if let (Some(after), Some(before)) = (filter.starts_after, filter.starts_before) {
        if after >= before {
            return Err(Error::InvalidState(
                format!("empty time range: after {after}, before {before}").into(),
            ));
        }
    }
    if let (Some(after), Some(before)) = (filter.after_date, filter.before_date) {
        if after >= before {
            return Err(Error::InvalidState(
                format!("empty date range: after {after}, before {before}").into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::state::memory::MemoryState,
        domain::{
            Club, Member, SessionBuilder, SessionCategory, SessionLevel, SportType, Tier, Trainer,
            Training,
        },
        ports::state::MockStatePort,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use mockall::predicate::*;
    use rstest::*;
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::{BoxError, ServiceExt};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .and_then(|day| day.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[rstest]
    #[case(SessionFilter { starts_after: Some(at(6, 12)), starts_before: Some(at(6, 12)), ..Default::default() })]
    #[case(SessionFilter { starts_after: Some(at(7, 12)), starts_before: Some(at(6, 12)), ..Default::default() })]
    #[case(SessionFilter { after_date: NaiveDate::from_ymd_opt(2024, 5, 8), before_date: NaiveDate::from_ymd_opt(2024, 5, 1), ..Default::default() })]
    #[tokio::test]
    async fn test_call_empty_range(#[case] filter: SessionFilter) -> Result<(), BoxError> {
        // GIVEN a state port that must not be queried
        let mut state = MockStatePort::new();
        state.expect_find_sessions().never();
        let mut domain = DomainLogic {
            state: Arc::new(state),
        };

        // WHEN searching with an empty range
        let req = SearchSessionsRequest {
            filter,
            available_only: false,
        };
        let res = ServiceExt::<SearchSessionsRequest>::ready(&mut domain)
            .await?
            .call(req)
            .await;

        // THEN the request is rejected
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::InvalidState(_)));
        Arc::into_inner(domain.state).unwrap().checkpoint();

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_call_forwards_filter() -> Result<(), BoxError> {
        let filter = SessionFilter {
            level: Some(SessionLevel::Intermediate),
            sport: Some(SportType::Box),
            ..Default::default()
        };
        let mut state = MockStatePort::new();
        state
            .expect_find_sessions()
            .times(1)
            .with(eq(filter.clone()))
            .returning(|_| Ok(Vec::new()));
        let mut domain = DomainLogic {
            state: Arc::new(state),
        };

        let req = SearchSessionsRequest {
            filter,
            available_only: true,
        };
        let res = ServiceExt::<SearchSessionsRequest>::ready(&mut domain)
            .await?
            .call(req)
            .await;

        assert_that!(res)
            .is_ok()
            .matches(|res| res.sessions.is_empty());
        Arc::into_inner(domain.state).unwrap().checkpoint();

        Ok(())
    }

    #[rstest]
    #[case(false, 2)]
    #[case(true, 1)]
    #[tokio::test]
    async fn test_call_available_only(
        #[case] available_only: bool,
        #[case] expected: usize,
    ) -> Result<(), BoxError> {
        // GIVEN a full personal session and an online session with room left
        let state = MemoryState::default();
        {
            let mut system = state.lock()?;
            let club_id = system.add_club(Club::new("Downtown"));
            let trainer_id = system.add_trainer(Trainer::new("Adam", [SportType::Box]));
            let training_id = system.add_training(Training::new("Sparring", SportType::Box));
            system.add_training_to_club(club_id, training_id)?;
            system.assign_trainer(training_id, trainer_id)?;
            let personal = system.add_session(
                training_id,
                SessionBuilder::new(SessionCategory::Personal, SessionLevel::Beginner, at(6, 15)),
            )?;
            system.add_session(
                training_id,
                SessionBuilder::new(SessionCategory::Online, SessionLevel::Beginner, at(6, 19)),
            )?;
            let member_id = system.add_member(Member::new("Anton", 100.0))?;
            system.buy_membership(member_id, club_id, Tier::Standard)?;
            system.register_to_session(member_id, personal)?;
        }
        let mut domain = DomainLogic::new(state);

        // WHEN searching for Monday sessions
        let req = SearchSessionsRequest {
            filter: SessionFilter {
                weekday: Some(chrono::Weekday::Mon),
                ..Default::default()
            },
            available_only,
        };
        let res = ServiceExt::<SearchSessionsRequest>::ready(&mut domain)
            .await?
            .call(req)
            .await;

        // THEN full sessions are only skipped on request
        assert_that!(res)
            .is_ok()
            .matches(|res| res.sessions.len() == expected);

        Ok(())
    }
}

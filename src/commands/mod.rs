use std::{borrow::Cow, sync::Arc};

pub mod buy_membership;
pub mod next_month;
pub mod register;
pub mod search_sessions;
pub mod unregister;

/// Entry point of the engine operations
///
/// Each operation is a [`tower::Service`] implementation over this struct.
pub struct DomainLogic<S> {
    state: Arc<S>,
}

impl<S> DomainLogic<S> {
    pub fn new(state: S) -> Self {
        Self {
            state: Arc::new(state),
        }
    }
}

impl<S> Clone for DomainLogic<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("state port error: {0}")]
    State(#[from] crate::ports::state::Error),

    #[error("invalid state: {0}")]
    InvalidState(Cow<'static, str>),
}

impl Error {
    /// Domain error behind this error, if any
    pub fn domain(&self) -> Option<&crate::domain::Error> {
        match self {
            Error::State(crate::ports::state::Error::Domain(err)) => Some(err),
            _ => None,
        }
    }
}

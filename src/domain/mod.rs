use std::{borrow::Cow, fmt};

use uuid::Uuid;

pub mod admission;
pub mod club;
pub mod discount;
pub mod member;
pub mod points;
pub mod pricing;
pub mod rollover;
pub mod search;
pub mod system;
pub mod training;

pub use club::{Club, ClubAverages};
pub use member::{Member, Membership, MonthStats};
pub use system::{ClubSystem, Purchase, Registration, Rollover};
pub use training::{Session, SessionBuilder, Trainer, Training};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a `Member`
    MemberId
);
id_type!(
    /// Unique identifier for a `Club`
    ClubId
);
id_type!(TrainerId);
id_type!(TrainingId);
id_type!(SessionId);

/// Membership class bought by a member for one club
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Only beginner and intermediate sessions
    Standard,
    /// Every session level, plus cheaper personal sessions
    Full,
}

impl Tier {
    /// Whether this tier may attend a session of the given level
    pub fn permits(&self, level: SessionLevel) -> bool {
        match self {
            Tier::Standard => level != SessionLevel::Advanced,
            Tier::Full => true,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Standard => f.write_str("standard"),
            Tier::Full => f.write_str("full"),
        }
    }
}

/// Kind of session, which drives capacity, price and scheduling defaults
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionCategory {
    Personal,
    Group,
    Online,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SportType {
    Gym,
    Swimming,
    Tennis,
    Box,
    Yoga,
    Running,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The member holds no membership at all
    #[error("member {member_id} does not have any membership")]
    NoMembership { member_id: MemberId },

    /// The member holds memberships, but none for the session's club
    #[error("member {member_id} does not have a membership for club {club_id}")]
    WrongClubMembership { member_id: MemberId, club_id: ClubId },

    #[error("member {member_id} is already registered for session {session_id}")]
    AlreadyRegistered {
        member_id: MemberId,
        session_id: SessionId,
    },

    #[error("session {session_id} has reached its capacity of {capacity}")]
    CapacityExceeded { session_id: SessionId, capacity: u32 },

    /// Standard tier members can only attend beginner and intermediate sessions
    #[error("{tier} membership does not permit {level:?} sessions")]
    TierRestriction { tier: Tier, level: SessionLevel },

    #[error("insufficient funds: {required} required, {balance} available")]
    InsufficientFunds { balance: f64, required: f64 },

    #[error("member {member_id} is not registered for session {session_id}")]
    NotRegistered {
        member_id: MemberId,
        session_id: SessionId,
    },

    #[error("member {member_id} already has a membership for club {club_id}")]
    DuplicateMembership { member_id: MemberId, club_id: ClubId },

    /// Entities wired together in an invalid way
    ///
    /// This covers sessions built without a trainer, negative prices, non-positive capacities and
    /// times outside of the category's scheduling window.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(Cow<'static, str>),

    #[error("a member named {0:?} already exists")]
    DuplicateMemberName(String),

    #[error("member {0} does not exist")]
    MemberNotFound(MemberId),
    #[error("club {0} does not exist")]
    ClubNotFound(ClubId),
    #[error("trainer {0} does not exist")]
    TrainerNotFound(TrainerId),
    #[error("training {0} does not exist")]
    TrainingNotFound(TrainingId),
    #[error("session {0} does not exist")]
    SessionNotFound(SessionId),
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

use super::{
    points::loyalty_points,
    pricing::{Charge, Pricing},
    Club, Error, Member, Session, Tier,
};

/// Outcome of a successful admission check, to be committed by the caller
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Admission {
    pub tier: Tier,
    pub charge: Charge,
    pub points: u32,
}

/// Decide whether `member` may register to `session`, and at what cost
///
/// This does not mutate anything: a rejected registration leaves every entity untouched.
pub fn admit(
    member: &Member,
    session: &Session,
    club: &Club,
    pricing: &Pricing<'_>,
) -> Result<Admission, Error> {
    let member_id = member.member_id;
    if !member.has_membership() {
        return Err(Error::NoMembership { member_id });
    }
    let Some(membership) = member.membership(session.club_id) else {
        return Err(Error::WrongClubMembership {
            member_id,
            club_id: session.club_id,
        });
    };
    if session.has_participant(member_id) || member.is_registered(session.session_id) {
        return Err(Error::AlreadyRegistered {
            member_id,
            session_id: session.session_id,
        });
    }
    if session.is_full() {
        return Err(Error::CapacityExceeded {
            session_id: session.session_id,
            capacity: session.capacity(),
        });
    }
    if !membership.tier.permits(session.level) {
        return Err(Error::TierRestriction {
            tier: membership.tier,
            level: session.level,
        });
    }

    let charge = pricing.session(membership.tier, session, member, club);
    if member.balance() < charge.amount {
        return Err(Error::InsufficientFunds {
            balance: member.balance(),
            required: charge.amount,
        });
    }

    Ok(Admission {
        tier: membership.tier,
        charge,
        points: loyalty_points(membership.tier, session.category),
    })
}

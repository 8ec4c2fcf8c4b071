use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{ClubId, MemberId, SessionId, SportType, Tier};

/// Activity of a member over one month
///
/// Captured on each rollover and used to compute next month's membership discount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonthStats {
    /// Number of sessions the member was registered to
    pub sessions: u32,
    /// Number of distinct sports practiced
    pub sports: u32,
    /// Loyalty points earned
    pub points: u32,
}

/// Membership bought by a member for one club, valid until the next rollover
#[derive(Clone, Debug, PartialEq)]
pub struct Membership {
    pub club_id: ClubId,
    pub tier: Tier,
    /// Base price of the tier at the time of purchase
    pub base_price: f64,
    /// Discount granted on the base price, in percent
    pub discount_percent: f64,
    /// Amount actually debited from the member
    pub price_paid: f64,
}

#[derive(Clone, Debug)]
pub struct Member {
    /// Unique identifier for the `Member`
    pub member_id: MemberId,
    /// Display name, unique across the system
    name: String,
    /// Never negative after a successful charge
    balance: f64,
    /// Whether the next personal session under a full membership is free
    ///
    /// Consumed once for the member, whatever the club.
    free_personal_session: bool,
    /// At most one membership per club
    memberships: HashMap<ClubId, Membership>,
    /// Sessions of the current month, with their club and sport
    sessions: BTreeMap<SessionId, (ClubId, SportType)>,
    /// Sports of the sessions above
    sports: BTreeSet<SportType>,
    points: u32,
    previous: MonthStats,
}

impl Member {
    pub fn new(name: impl Into<String>, balance: f64) -> Self {
        Self {
            member_id: MemberId::new(),
            name: name.into(),
            balance,
            free_personal_session: true,
            memberships: HashMap::new(),
            sessions: BTreeMap::new(),
            sports: BTreeSet::new(),
            points: 0,
            previous: MonthStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn has_free_personal_session(&self) -> bool {
        self.free_personal_session
    }

    /// Loyalty points earned this month
    pub fn loyalty_points(&self) -> u32 {
        self.points
    }

    pub fn has_membership(&self) -> bool {
        !self.memberships.is_empty()
    }

    pub fn membership(&self, club_id: ClubId) -> Option<&Membership> {
        self.memberships.get(&club_id)
    }

    pub fn memberships(&self) -> impl Iterator<Item = &Membership> {
        self.memberships.values()
    }

    pub fn is_registered(&self, session_id: SessionId) -> bool {
        self.sessions.contains_key(&session_id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.keys().copied()
    }

    /// Number of sessions of the current month that belong to `club_id`
    pub fn sessions_in(&self, club_id: ClubId) -> usize {
        self.sessions
            .values()
            .filter(|(id, _)| *id == club_id)
            .count()
    }

    pub fn sports(&self) -> &BTreeSet<SportType> {
        &self.sports
    }

    /// Activity of the month so far
    pub fn current_stats(&self) -> MonthStats {
        MonthStats {
            sessions: self.sessions.len() as u32,
            sports: self.sports.len() as u32,
            points: self.points,
        }
    }

    /// Activity captured on the last rollover
    pub fn previous_stats(&self) -> MonthStats {
        self.previous
    }

    #[cfg(test)]
    pub(crate) fn set_previous_stats(&mut self, stats: MonthStats) {
        self.previous = stats;
    }

    pub(crate) fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }

    /// Callers must have checked that `amount <= balance`
    pub(crate) fn debit(&mut self, amount: f64) {
        self.balance = (self.balance - amount).max(0.0);
    }

    pub(crate) fn add_membership(&mut self, membership: Membership) {
        self.memberships.insert(membership.club_id, membership);
    }

    pub(crate) fn consume_free_personal_session(&mut self) {
        self.free_personal_session = false;
    }

    pub(crate) fn add_session(
        &mut self,
        session_id: SessionId,
        club_id: ClubId,
        sport: SportType,
        points: u32,
    ) {
        self.points += points;
        self.sessions.insert(session_id, (club_id, sport));
        self.sports.insert(sport);
    }

    /// Returns `false` if the member was not registered
    ///
    /// The sport is only kept if another registered session practices it.
    pub(crate) fn remove_session(&mut self, session_id: SessionId) -> bool {
        if self.sessions.remove(&session_id).is_none() {
            return false;
        }
        self.sports = self.sessions.values().map(|(_, sport)| *sport).collect();
        true
    }

    /// Move the current month into the previous month and start over
    ///
    /// Returns the sessions the member was registered to, so they can be released.
    pub(crate) fn roll_over(&mut self) -> Vec<SessionId> {
        self.previous = self.current_stats();
        self.memberships.clear();
        self.sports.clear();
        self.points = 0;
        std::mem::take(&mut self.sessions).into_keys().collect()
    }
}

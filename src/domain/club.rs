use std::collections::BTreeSet;

use super::{ClubId, Member, MemberId, TrainerId, TrainingId};

/// Club-wide activity figures for one month
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClubAverages {
    /// Sessions of this club registered per member
    pub sessions_per_member: f64,
    /// Loyalty points earned per member
    pub points_per_member: f64,
}

impl ClubAverages {
    /// Compute the averages over the members currently on the roster of `club_id`
    ///
    /// Only sessions of the club itself are counted, while loyalty points are the member's total
    /// for the month. Returns zeroes for an empty roster.
    pub fn compute<'a>(club_id: ClubId, members: impl IntoIterator<Item = &'a Member>) -> Self {
        let (count, sessions, points) = members
            .into_iter()
            .fold((0usize, 0usize, 0u64), |(count, sessions, points), member| {
                (
                    count + 1,
                    sessions + member.sessions_in(club_id),
                    points + u64::from(member.loyalty_points()),
                )
            });

        if count == 0 {
            return Self::default();
        }
        Self {
            sessions_per_member: sessions as f64 / count as f64,
            points_per_member: points as f64 / count as f64,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Club {
    pub club_id: ClubId,
    name: String,
    /// Members holding a membership this month
    members: BTreeSet<MemberId>,
    trainers: Vec<TrainerId>,
    trainings: Vec<TrainingId>,
    /// Averages as of the last change to the roster's activity
    current: ClubAverages,
    /// Averages captured on the last rollover, used for membership discounts
    previous: ClubAverages,
}

impl Club {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            club_id: ClubId::new(),
            name: name.into(),
            members: BTreeSet::new(),
            trainers: Vec::new(),
            trainings: Vec::new(),
            current: ClubAverages::default(),
            previous: ClubAverages::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &BTreeSet<MemberId> {
        &self.members
    }

    pub fn has_member(&self, member_id: MemberId) -> bool {
        self.members.contains(&member_id)
    }

    pub fn trainers(&self) -> &[TrainerId] {
        &self.trainers
    }

    pub fn trainings(&self) -> &[TrainingId] {
        &self.trainings
    }

    pub fn current_averages(&self) -> ClubAverages {
        self.current
    }

    pub fn previous_averages(&self) -> ClubAverages {
        self.previous
    }

    pub(crate) fn add_member(&mut self, member_id: MemberId) {
        self.members.insert(member_id);
    }

    pub(crate) fn remove_member(&mut self, member_id: MemberId) {
        self.members.remove(&member_id);
    }

    pub(crate) fn hire(&mut self, trainer_id: TrainerId) -> bool {
        if self.trainers.contains(&trainer_id) {
            return false;
        }
        self.trainers.push(trainer_id);
        true
    }

    pub(crate) fn add_training(&mut self, training_id: TrainingId) -> bool {
        if self.trainings.contains(&training_id) {
            return false;
        }
        self.trainings.push(training_id);
        true
    }

    pub(crate) fn set_current_averages(&mut self, averages: ClubAverages) {
        self.current = averages;
    }

    /// Promote `averages` to the previous month and empty the roster
    ///
    /// Memberships are month-to-month, so every member needs to buy a new one.
    pub(crate) fn close_month(&mut self, averages: ClubAverages) -> BTreeSet<MemberId> {
        self.previous = averages;
        self.current = ClubAverages::default();
        std::mem::take(&mut self.members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SessionId, SportType};
    use speculoos::prelude::*;

    #[test]
    fn test_compute_empty() {
        let res = ClubAverages::compute(ClubId::new(), std::iter::empty());

        assert_that!(res).is_equal_to(ClubAverages::default());
    }

    #[test]
    fn test_compute() {
        // GIVEN two members with 3 sessions in the club, and one session elsewhere
        let (club_id, other_club) = (ClubId::new(), ClubId::new());
        let mut anton = Member::new("Anton", 0.0);
        anton.add_session(SessionId::new(), club_id, SportType::Gym, 4);
        anton.add_session(SessionId::new(), club_id, SportType::Gym, 4);
        anton.add_session(SessionId::new(), other_club, SportType::Gym, 2);
        let mut nike = Member::new("Nike", 0.0);
        nike.add_session(SessionId::new(), club_id, SportType::Box, 2);

        // WHEN computing the averages for the club
        let res = ClubAverages::compute(club_id, [&anton, &nike]);

        // THEN
        // * sessions only count for the club
        // * points count for the whole month
        assert_that!(res.sessions_per_member).is_close_to(1.5, 1e-9);
        assert_that!(res.points_per_member).is_close_to(6.0, 1e-9);
    }

    #[test]
    fn test_close_month() {
        let mut club = Club::new("Downtown");
        let member_id = MemberId::new();
        club.add_member(member_id);
        let averages = ClubAverages {
            sessions_per_member: 2.0,
            points_per_member: 8.0,
        };
        club.set_current_averages(averages);

        let released = club.close_month(averages);

        assert_that!(released.contains(&member_id)).is_true();
        assert_that!(club.members().is_empty()).is_true();
        assert_that!(club.previous_averages()).is_equal_to(averages);
        assert_that!(club.current_averages()).is_equal_to(ClubAverages::default());
    }

    #[test]
    fn test_hire_once() {
        let mut club = Club::new("Downtown");
        let trainer_id = TrainerId::new();

        assert_that!(club.hire(trainer_id)).is_true();
        assert_that!(club.hire(trainer_id)).is_false();
        assert_that!(club.trainers().len()).is_equal_to(1);
    }
}

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDateTime};

use super::{
    ClubId, Error, MemberId, SessionCategory, SessionId, SessionLevel, SportType, TrainerId,
    TrainingId,
};

/// Every session lasts 1h30
pub const SESSION_DURATION_MINUTES: i64 = 90;

impl SessionCategory {
    pub fn default_capacity(&self) -> u32 {
        match self {
            SessionCategory::Personal => 1,
            SessionCategory::Group => 25,
            SessionCategory::Online => u32::MAX,
        }
    }

    pub fn default_price(&self) -> f64 {
        match self {
            SessionCategory::Personal => 30.0,
            SessionCategory::Group => 0.0,
            SessionCategory::Online => 5.0,
        }
    }

    /// Opening and closing hours a session of this category must fit in
    ///
    /// Both bounds are exclusive: the session must start after the opening hour and end before
    /// the closing hour.
    pub fn scheduling_window(&self) -> Option<(u32, u32)> {
        match self {
            SessionCategory::Personal => Some((14, 18)),
            SessionCategory::Group => Some((9, 15)),
            SessionCategory::Online => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Trainer {
    pub trainer_id: TrainerId,
    name: String,
    specializations: BTreeSet<SportType>,
    trainings: Vec<TrainingId>,
}

impl Trainer {
    pub fn new(name: impl Into<String>, specializations: impl IntoIterator<Item = SportType>) -> Self {
        Self {
            trainer_id: TrainerId::new(),
            name: name.into(),
            specializations: specializations.into_iter().collect(),
            trainings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn specializations(&self) -> &BTreeSet<SportType> {
        &self.specializations
    }

    pub fn can_conduct(&self, sport: SportType) -> bool {
        self.specializations.contains(&sport)
    }

    pub fn trainings(&self) -> &[TrainingId] {
        &self.trainings
    }

    pub fn add_specialization(&mut self, sport: SportType) -> Result<(), Error> {
        if !self.specializations.insert(sport) {
            return Err(Error::invalid(format!(
                "{} already specializes in {sport:?}",
                self.name
            )));
        }
        Ok(())
    }

    pub fn remove_specialization(&mut self, sport: SportType) -> Result<(), Error> {
        if !self.specializations.remove(&sport) {
            return Err(Error::invalid(format!(
                "{} does not specialize in {sport:?}",
                self.name
            )));
        }
        Ok(())
    }

    pub(crate) fn add_training(&mut self, training_id: TrainingId) {
        self.trainings.push(training_id);
    }
}

/// A kind of training offered by a club, made of one or more sessions
#[derive(Clone, Debug)]
pub struct Training {
    pub training_id: TrainingId,
    name: String,
    sport: SportType,
    /// Set once when the training is added to a club
    club_id: Option<ClubId>,
    /// Set once when a trainer is assigned
    trainer_id: Option<TrainerId>,
    sessions: Vec<SessionId>,
}

impl Training {
    pub fn new(name: impl Into<String>, sport: SportType) -> Self {
        Self {
            training_id: TrainingId::new(),
            name: name.into(),
            sport,
            club_id: None,
            trainer_id: None,
            sessions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sport(&self) -> SportType {
        self.sport
    }

    pub fn club_id(&self) -> Option<ClubId> {
        self.club_id
    }

    pub fn trainer_id(&self) -> Option<TrainerId> {
        self.trainer_id
    }

    pub fn sessions(&self) -> &[SessionId] {
        &self.sessions
    }

    pub(crate) fn set_club(&mut self, club_id: ClubId) -> Result<(), Error> {
        if self.club_id.is_some() {
            return Err(Error::invalid(format!(
                "training {} already belongs to a club",
                self.name
            )));
        }
        self.club_id = Some(club_id);
        Ok(())
    }

    pub(crate) fn assign_trainer(&mut self, trainer: &Trainer) -> Result<(), Error> {
        if self.trainer_id.is_some() {
            return Err(Error::invalid(format!(
                "training {} already has a trainer",
                self.name
            )));
        }
        if !trainer.can_conduct(self.sport) {
            return Err(Error::invalid(format!(
                "{} cannot conduct {:?} trainings",
                trainer.name(),
                self.sport
            )));
        }
        self.trainer_id = Some(trainer.trainer_id);
        Ok(())
    }

    pub(crate) fn add_session(&mut self, session_id: SessionId) {
        self.sessions.push(session_id);
    }
}

/// Parameters for a new [`Session`], validated against its training by [`SessionBuilder::build`]
#[derive(Clone, Debug)]
pub struct SessionBuilder {
    category: SessionCategory,
    level: SessionLevel,
    starts_at: NaiveDateTime,
    capacity: Option<u32>,
    price: Option<f64>,
}

impl SessionBuilder {
    pub fn new(category: SessionCategory, level: SessionLevel, starts_at: NaiveDateTime) -> Self {
        Self {
            category,
            level,
            starts_at,
            capacity: None,
            price: None,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn build(self, training: &Training) -> Result<Session, Error> {
        let Some(trainer_id) = training.trainer_id else {
            return Err(Error::invalid(format!(
                "training {} has no trainer",
                training.name
            )));
        };
        let Some(club_id) = training.club_id else {
            return Err(Error::invalid(format!(
                "training {} does not belong to a club",
                training.name
            )));
        };

        let capacity = self
            .capacity
            .unwrap_or_else(|| self.category.default_capacity());
        if capacity == 0 {
            return Err(Error::invalid("capacity must be greater than zero"));
        }
        let price = self.price.unwrap_or_else(|| self.category.default_price());
        validate_price(price)?;
        validate_schedule(self.category, self.starts_at)?;

        Ok(Session {
            session_id: SessionId::new(),
            training_id: training.training_id,
            club_id,
            trainer_id,
            sport: training.sport,
            category: self.category,
            level: self.level,
            starts_at: self.starts_at,
            capacity,
            price,
            participants: Vec::new(),
        })
    }
}

fn validate_price(price: f64) -> Result<(), Error> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::invalid(format!("price cannot be negative: {price}")));
    }
    Ok(())
}

fn validate_schedule(category: SessionCategory, starts_at: NaiveDateTime) -> Result<(), Error> {
    let Some((open, close)) = category.scheduling_window() else {
        return Ok(());
    };
    let day = starts_at.date();
    let (Some(opens_at), Some(closes_at)) = (day.and_hms_opt(open, 0, 0), day.and_hms_opt(close, 0, 0))
    else {
        return Err(Error::invalid("invalid scheduling window"));
    };
    let ends_at = starts_at + Duration::minutes(SESSION_DURATION_MINUTES);
    if starts_at <= opens_at || ends_at >= closes_at {
        return Err(Error::invalid(format!(
            "{category:?} sessions can only take place between {open}:00 and {close}:00"
        )));
    }
    Ok(())
}

/// A scheduled occurrence of a training
///
/// Sport, club and trainer are copied from the training when the session is built; they cannot
/// change afterwards.
#[derive(Clone, Debug)]
pub struct Session {
    pub session_id: SessionId,
    pub training_id: TrainingId,
    pub club_id: ClubId,
    pub trainer_id: TrainerId,
    pub sport: SportType,
    pub category: SessionCategory,
    pub level: SessionLevel,
    pub starts_at: NaiveDateTime,
    capacity: u32,
    price: f64,
    participants: Vec<MemberId>,
}

impl Session {
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn set_price(&mut self, price: f64) -> Result<(), Error> {
        validate_price(price)?;
        self.price = price;
        Ok(())
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.starts_at + Duration::minutes(SESSION_DURATION_MINUTES)
    }

    pub fn participants(&self) -> &[MemberId] {
        &self.participants
    }

    pub fn has_participant(&self, member_id: MemberId) -> bool {
        self.participants.contains(&member_id)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() as u64 >= u64::from(self.capacity)
    }

    pub(crate) fn add_participant(&mut self, member_id: MemberId) {
        self.participants.push(member_id);
    }

    pub(crate) fn remove_participant(&mut self, member_id: MemberId) {
        self.participants.retain(|id| *id != member_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::*;
    use speculoos::prelude::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .and_then(|day| day.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    #[fixture]
    fn training() -> Training {
        let trainer = Trainer::new("Steve", [SportType::Gym]);
        let mut training = Training::new("Gym class", SportType::Gym);
        training.assign_trainer(&trainer).unwrap();
        training.set_club(ClubId::new()).unwrap();
        training
    }

    #[rstest]
    #[case(SessionCategory::Personal, at(14, 15), 1, 30.0)]
    #[case(SessionCategory::Group, at(10, 30), 25, 0.0)]
    #[case(SessionCategory::Online, at(20, 0), u32::MAX, 5.0)]
    fn test_defaults(
        training: Training,
        #[case] category: SessionCategory,
        #[case] starts_at: NaiveDateTime,
        #[case] capacity: u32,
        #[case] price: f64,
    ) {
        let res = SessionBuilder::new(category, SessionLevel::Beginner, starts_at).build(&training);

        assert_that!(res).is_ok().matches(|session| {
            session.capacity() == capacity
                && session.price() == price
                && session.club_id == training.club_id().unwrap()
                && session.sport == SportType::Gym
        });
    }

    #[rstest]
    // Personal: after 14:00, ending before 18:00
    #[case(SessionCategory::Personal, at(14, 1), true)]
    #[case(SessionCategory::Personal, at(16, 29), true)]
    #[case(SessionCategory::Personal, at(14, 0), false)]
    #[case(SessionCategory::Personal, at(16, 30), false)]
    #[case(SessionCategory::Personal, at(10, 0), false)]
    // Group: after 09:00, ending before 15:00
    #[case(SessionCategory::Group, at(10, 30), true)]
    #[case(SessionCategory::Group, at(13, 29), true)]
    #[case(SessionCategory::Group, at(9, 0), false)]
    #[case(SessionCategory::Group, at(13, 30), false)]
    // Online sessions can happen any time
    #[case(SessionCategory::Online, at(23, 45), true)]
    #[case(SessionCategory::Online, at(5, 0), true)]
    fn test_scheduling_window(
        training: Training,
        #[case] category: SessionCategory,
        #[case] starts_at: NaiveDateTime,
        #[case] valid: bool,
    ) {
        let res = SessionBuilder::new(category, SessionLevel::Beginner, starts_at).build(&training);

        if valid {
            assert_that!(res).is_ok();
        } else {
            assert_that!(res)
                .is_err()
                .matches(|err| matches!(err, Error::InvalidConfiguration(_)));
        }
    }

    #[rstest]
    fn test_invalid_capacity(training: Training) {
        let res = SessionBuilder::new(SessionCategory::Online, SessionLevel::Beginner, at(8, 0))
            .with_capacity(0)
            .build(&training);

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::InvalidConfiguration(_)));
    }

    #[rstest]
    fn test_negative_price(training: Training) {
        let res = SessionBuilder::new(SessionCategory::Online, SessionLevel::Beginner, at(8, 0))
            .with_price(-1.0)
            .build(&training);
        assert_that!(res).is_err();

        let mut session = SessionBuilder::new(SessionCategory::Online, SessionLevel::Beginner, at(8, 0))
            .with_price(12.0)
            .build(&training)
            .unwrap();
        assert_that!(session.set_price(-0.5)).is_err();
        assert_that!(session.price()).is_equal_to(12.0);
        assert_that!(session.set_price(0.0)).is_ok();
        assert_that!(session.price()).is_equal_to(0.0);
    }

    #[test]
    fn test_build_requires_trainer() {
        let mut training = Training::new("Swim", SportType::Swimming);
        training.set_club(ClubId::new()).unwrap();

        let res = SessionBuilder::new(SessionCategory::Online, SessionLevel::Beginner, at(8, 0))
            .build(&training);

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_build_requires_club() {
        let trainer = Trainer::new("Steve", [SportType::Swimming]);
        let mut training = Training::new("Swim", SportType::Swimming);
        training.assign_trainer(&trainer).unwrap();

        let res = SessionBuilder::new(SessionCategory::Online, SessionLevel::Beginner, at(8, 0))
            .build(&training);

        assert_that!(res).is_err();
    }

    #[test]
    fn test_assign_trainer() {
        let boxer = Trainer::new("Mike", [SportType::Box]);
        let swimmer = Trainer::new("Kate", [SportType::Swimming]);
        let mut training = Training::new("Swim", SportType::Swimming);

        // A trainer must specialize in the sport
        assert_that!(training.assign_trainer(&boxer)).is_err();
        assert_that!(training.trainer_id()).is_none();

        // A trainer can only be assigned once
        assert_that!(training.assign_trainer(&swimmer)).is_ok();
        assert_that!(training.assign_trainer(&swimmer)).is_err();
        assert_that!(training.trainer_id()).is_equal_to(Some(swimmer.trainer_id));
    }

    #[test]
    fn test_set_club_once() {
        let mut training = Training::new("Swim", SportType::Swimming);
        let club_id = ClubId::new();

        assert_that!(training.set_club(club_id)).is_ok();
        assert_that!(training.set_club(ClubId::new())).is_err();
        assert_that!(training.club_id()).is_equal_to(Some(club_id));
    }

    #[test]
    fn test_specializations() {
        let mut trainer = Trainer::new("Steve", [SportType::Gym]);

        assert_that!(trainer.add_specialization(SportType::Gym)).is_err();
        assert_that!(trainer.add_specialization(SportType::Tennis)).is_ok();
        assert_that!(trainer.remove_specialization(SportType::Box)).is_err();
        assert_that!(trainer.remove_specialization(SportType::Gym)).is_ok();
        assert_that!(trainer.can_conduct(SportType::Gym)).is_false();
        assert_that!(trainer.can_conduct(SportType::Tennis)).is_true();
    }

    #[rstest]
    fn test_is_full(training: Training) {
        let mut session = SessionBuilder::new(SessionCategory::Group, SessionLevel::Beginner, at(10, 0))
            .with_capacity(2)
            .build(&training)
            .unwrap();

        session.add_participant(MemberId::new());
        assert_that!(session.is_full()).is_false();
        session.add_participant(MemberId::new());
        assert_that!(session.is_full()).is_true();
    }
}

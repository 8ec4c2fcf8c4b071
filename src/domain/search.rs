use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

use super::{
    ClubId, ClubSystem, Error, Session, SessionLevel, SportType, Trainer, Training, TrainingId,
};

/// Criteria to look up sessions across every club
///
/// Unset criteria match every session. Time and date bounds are exclusive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionFilter {
    pub club_id: Option<ClubId>,
    pub level: Option<SessionLevel>,
    pub sport: Option<SportType>,
    pub starts_after: Option<NaiveDateTime>,
    pub starts_before: Option<NaiveDateTime>,
    pub weekday: Option<Weekday>,
    pub after_date: Option<NaiveDate>,
    pub before_date: Option<NaiveDate>,
}

impl SessionFilter {
    pub fn matches(&self, session: &Session) -> bool {
        let date = session.starts_at.date();
        self.club_id.map_or(true, |id| session.club_id == id)
            && self.level.map_or(true, |level| session.level == level)
            && self.sport.map_or(true, |sport| session.sport == sport)
            && self.starts_after.map_or(true, |time| session.starts_at > time)
            && self.starts_before.map_or(true, |time| session.starts_at < time)
            && self.weekday.map_or(true, |day| date.weekday() == day)
            && self.after_date.map_or(true, |after| date > after)
            && self.before_date.map_or(true, |before| date < before)
    }
}

impl ClubSystem {
    /// Sessions matching `filter`, earliest first
    pub fn find_sessions(&self, filter: &SessionFilter) -> Vec<&Session> {
        let mut sessions: Vec<&Session> = self
            .sessions
            .values()
            .filter(|session| filter.matches(session))
            .collect();
        sessions.sort_by_key(|session| (session.starts_at, session.session_id));
        sessions
    }

    fn club_sessions(&self, club_id: ClubId) -> Result<Vec<&Session>, Error> {
        let club = self.club(club_id)?;
        Ok(club
            .trainings()
            .iter()
            .filter_map(|id| self.trainings.get(id))
            .flat_map(|training| training.sessions())
            .filter_map(|id| self.sessions.get(id))
            .collect())
    }

    /// Sessions of the club by time of day
    pub fn club_sessions_by_time(&self, club_id: ClubId) -> Result<Vec<&Session>, Error> {
        let mut sessions = self.club_sessions(club_id)?;
        sessions.sort_by_key(|session| (session.starts_at.time(), session.session_id));
        Ok(sessions)
    }

    /// Sessions of the club by level, then number of participants, then time
    pub fn ranked_sessions(&self, club_id: ClubId) -> Result<Vec<&Session>, Error> {
        let mut sessions = self.club_sessions(club_id)?;
        sessions.sort_by_key(|session| {
            (
                session.level,
                session.participants().len(),
                session.starts_at,
                session.session_id,
            )
        });
        Ok(sessions)
    }

    /// Participants over every session of a training
    pub fn training_participants(&self, training_id: TrainingId) -> Result<usize, Error> {
        Ok(self.participants_of(self.training(training_id)?))
    }

    fn participants_of(&self, training: &Training) -> usize {
        training
            .sessions()
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .map(|session| session.participants().len())
            .sum()
    }

    /// Trainings of the club with the most participants first, then the most sessions
    pub fn ranked_trainings(&self, club_id: ClubId) -> Result<Vec<&Training>, Error> {
        let club = self.club(club_id)?;
        let mut trainings: Vec<(usize, &Training)> = club
            .trainings()
            .iter()
            .filter_map(|id| self.trainings.get(id))
            .map(|training| (self.participants_of(training), training))
            .collect();
        trainings.sort_by(|(a_count, a), (b_count, b)| {
            b_count
                .cmp(a_count)
                .then_with(|| b.sessions().len().cmp(&a.sessions().len()))
        });
        Ok(trainings.into_iter().map(|(_, training)| training).collect())
    }

    /// Trainers of the club with the most specializations first, then the most participants,
    /// then by name
    pub fn ranked_trainers(&self, club_id: ClubId) -> Result<Vec<&Trainer>, Error> {
        let club = self.club(club_id)?;
        let mut trainers: Vec<(usize, &Trainer)> = club
            .trainers()
            .iter()
            .filter_map(|id| self.trainers.get(id))
            .map(|trainer| {
                let participants = trainer
                    .trainings()
                    .iter()
                    .filter_map(|id| self.trainings.get(id))
                    .map(|training| self.participants_of(training))
                    .sum();
                (participants, trainer)
            })
            .collect();
        trainers.sort_by(|(a_count, a), (b_count, b)| {
            b.specializations()
                .len()
                .cmp(&a.specializations().len())
                .then_with(|| b_count.cmp(a_count))
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(trainers.into_iter().map(|(_, trainer)| trainer).collect())
    }
}

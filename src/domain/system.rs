use std::collections::HashMap;

use super::{
    admission::admit, discount::DiscountStrategy, pricing::Pricing, Club, ClubAverages, ClubId,
    Error, Member, MemberId, Membership, Session, SessionBuilder, SessionId, Tier, Trainer,
    TrainerId, Training, TrainingId,
};
use crate::config::EngineConfig;

/// Receipt of a successful session registration
#[derive(Clone, Debug, PartialEq)]
pub struct Registration {
    pub member_id: MemberId,
    pub session_id: SessionId,
    /// Amount debited from the member
    pub charged: f64,
    pub points_awarded: u32,
    /// Balance after the registration
    pub balance: f64,
    /// Loyalty points of the month after the registration
    pub loyalty_points: u32,
}

/// Receipt of a successful membership purchase
#[derive(Clone, Debug, PartialEq)]
pub struct Purchase {
    pub member_id: MemberId,
    pub membership: Membership,
    /// Balance before the purchase
    pub previous_balance: f64,
    /// Balance after the purchase
    pub balance: f64,
}

/// Summary of one club's monthly rollover
#[derive(Clone, Debug, PartialEq)]
pub struct Rollover {
    pub club_id: ClubId,
    /// Averages of the month that just ended
    pub previous: ClubAverages,
    /// Number of members whose membership ended
    pub members: usize,
}

/// Every club, member, trainer, training and session known to the engine
///
/// Entities reference each other by identifier and are only mutated through this struct, so
/// that every operation either applies entirely or not at all.
#[derive(Debug)]
pub struct ClubSystem {
    pub(super) config: EngineConfig,
    pub(super) strategy: DiscountStrategy,
    pub(super) clubs: HashMap<ClubId, Club>,
    pub(super) members: HashMap<MemberId, Member>,
    pub(super) trainers: HashMap<TrainerId, Trainer>,
    pub(super) trainings: HashMap<TrainingId, Training>,
    pub(super) sessions: HashMap<SessionId, Session>,
}

impl Default for ClubSystem {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ClubSystem {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            strategy: DiscountStrategy::default(),
            clubs: HashMap::new(),
            members: HashMap::new(),
            trainers: HashMap::new(),
            trainings: HashMap::new(),
            sessions: HashMap::new(),
        }
    }

    /// Replace the default combined discount strategy
    pub fn with_strategy(mut self, strategy: DiscountStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn pricing(&self) -> Pricing<'_> {
        Pricing::new(&self.config.pricing, &self.strategy)
    }

    pub fn club(&self, club_id: ClubId) -> Result<&Club, Error> {
        self.clubs.get(&club_id).ok_or(Error::ClubNotFound(club_id))
    }

    pub fn clubs(&self) -> impl Iterator<Item = &Club> {
        self.clubs.values()
    }

    pub fn member(&self, member_id: MemberId) -> Result<&Member, Error> {
        self.members
            .get(&member_id)
            .ok_or(Error::MemberNotFound(member_id))
    }

    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members.values().find(|member| member.name() == name)
    }

    pub fn trainer(&self, trainer_id: TrainerId) -> Result<&Trainer, Error> {
        self.trainers
            .get(&trainer_id)
            .ok_or(Error::TrainerNotFound(trainer_id))
    }

    pub fn training(&self, training_id: TrainingId) -> Result<&Training, Error> {
        self.trainings
            .get(&training_id)
            .ok_or(Error::TrainingNotFound(training_id))
    }

    pub fn session(&self, session_id: SessionId) -> Result<&Session, Error> {
        self.sessions
            .get(&session_id)
            .ok_or(Error::SessionNotFound(session_id))
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn add_club(&mut self, club: Club) -> ClubId {
        let club_id = club.club_id;
        log::info!("club {} registered as {club_id}", club.name());
        self.clubs.insert(club_id, club);
        club_id
    }

    pub fn add_member(&mut self, member: Member) -> Result<MemberId, Error> {
        let balance = member.balance();
        if !balance.is_finite() || balance < 0.0 {
            return Err(Error::invalid(format!(
                "member {} cannot start with a balance of {balance}",
                member.name()
            )));
        }
        if self.member_by_name(member.name()).is_some() {
            return Err(Error::DuplicateMemberName(member.name().to_string()));
        }
        let member_id = member.member_id;
        self.members.insert(member_id, member);
        Ok(member_id)
    }

    pub fn add_trainer(&mut self, trainer: Trainer) -> TrainerId {
        let trainer_id = trainer.trainer_id;
        self.trainers.insert(trainer_id, trainer);
        trainer_id
    }

    pub fn hire_trainer(&mut self, club_id: ClubId, trainer_id: TrainerId) -> Result<(), Error> {
        self.trainer(trainer_id)?;
        let club = self
            .clubs
            .get_mut(&club_id)
            .ok_or(Error::ClubNotFound(club_id))?;
        if !club.hire(trainer_id) {
            return Err(Error::invalid(format!(
                "trainer {trainer_id} already works at club {club_id}"
            )));
        }
        log::info!("club {club_id} hired trainer {trainer_id}");
        Ok(())
    }

    pub fn add_training(&mut self, training: Training) -> TrainingId {
        let training_id = training.training_id;
        self.trainings.insert(training_id, training);
        training_id
    }

    /// Attach a training to the club that offers it
    ///
    /// A training belongs to at most one club, and this cannot be changed afterwards.
    pub fn add_training_to_club(
        &mut self,
        club_id: ClubId,
        training_id: TrainingId,
    ) -> Result<(), Error> {
        let club = self
            .clubs
            .get_mut(&club_id)
            .ok_or(Error::ClubNotFound(club_id))?;
        let training = self
            .trainings
            .get_mut(&training_id)
            .ok_or(Error::TrainingNotFound(training_id))?;
        training.set_club(club_id)?;
        club.add_training(training_id);
        log::info!("training {} added to club {club_id}", training.name());
        Ok(())
    }

    pub fn assign_trainer(
        &mut self,
        training_id: TrainingId,
        trainer_id: TrainerId,
    ) -> Result<(), Error> {
        let trainer = self
            .trainers
            .get_mut(&trainer_id)
            .ok_or(Error::TrainerNotFound(trainer_id))?;
        let training = self
            .trainings
            .get_mut(&training_id)
            .ok_or(Error::TrainingNotFound(training_id))?;
        training.assign_trainer(trainer)?;
        trainer.add_training(training_id);
        Ok(())
    }

    pub fn add_session(
        &mut self,
        training_id: TrainingId,
        builder: SessionBuilder,
    ) -> Result<SessionId, Error> {
        let training = self
            .trainings
            .get_mut(&training_id)
            .ok_or(Error::TrainingNotFound(training_id))?;
        let session = builder.build(training)?;
        let session_id = session.session_id;
        training.add_session(session_id);
        log::info!(
            "{:?} session {session_id} of {} scheduled at {}",
            session.category,
            training.name(),
            session.starts_at
        );
        self.sessions.insert(session_id, session);
        Ok(session_id)
    }

    pub fn set_session_price(&mut self, session_id: SessionId, price: f64) -> Result<(), Error> {
        self.sessions
            .get_mut(&session_id)
            .ok_or(Error::SessionNotFound(session_id))?
            .set_price(price)
    }

    /// Credit the configured salary to the member, returning the new balance
    pub fn work(&mut self, member_id: MemberId) -> Result<f64, Error> {
        let salary = self.config.salary;
        let member = self
            .members
            .get_mut(&member_id)
            .ok_or(Error::MemberNotFound(member_id))?;
        member.credit(salary);
        log::debug!("member {member_id} earned {salary}");
        Ok(member.balance())
    }

    pub fn buy_membership(
        &mut self,
        member_id: MemberId,
        club_id: ClubId,
        tier: Tier,
    ) -> Result<Purchase, Error> {
        let member = self.member(member_id)?;
        let club = self.club(club_id)?;

        let quote = self.pricing().membership(tier, member, club);
        log::debug!(
            "{tier} membership for {member_id} at {club_id}: {} with {}% discount",
            quote.price,
            quote.discount_percent
        );
        if member.balance() < quote.price {
            log::warn!("member {member_id} cannot afford a {tier} membership");
            return Err(Error::InsufficientFunds {
                balance: member.balance(),
                required: quote.price,
            });
        }
        if member.membership(club_id).is_some() {
            log::warn!("member {member_id} already has a membership at {club_id}");
            return Err(Error::DuplicateMembership { member_id, club_id });
        }

        let membership = Membership {
            club_id,
            tier,
            base_price: quote.base_price,
            discount_percent: quote.discount_percent,
            price_paid: quote.price,
        };
        let member = self
            .members
            .get_mut(&member_id)
            .ok_or(Error::MemberNotFound(member_id))?;
        let previous_balance = member.balance();
        member.debit(quote.price);
        member.add_membership(membership.clone());
        let purchase = Purchase {
            member_id,
            membership,
            previous_balance,
            balance: member.balance(),
        };
        if let Some(club) = self.clubs.get_mut(&club_id) {
            club.add_member(member_id);
        }
        self.refresh_averages_for(member_id);

        log::info!("member {member_id} bought a {tier} membership at {club_id}");
        Ok(purchase)
    }

    pub fn register_to_session(
        &mut self,
        member_id: MemberId,
        session_id: SessionId,
    ) -> Result<Registration, Error> {
        let member = self.member(member_id)?;
        let session = self.session(session_id)?;
        let club = self.club(session.club_id)?;

        let admission = admit(member, session, club, &self.pricing()).map_err(|err| {
            log::warn!("registration of {member_id} to {session_id} rejected: {err}");
            err
        })?;
        let (club_id, sport) = (session.club_id, session.sport);

        let member = self
            .members
            .get_mut(&member_id)
            .ok_or(Error::MemberNotFound(member_id))?;
        member.debit(admission.charge.amount);
        if admission.charge.consumes_free_session {
            member.consume_free_personal_session();
        }
        member.add_session(session_id, club_id, sport, admission.points);
        let registration = Registration {
            member_id,
            session_id,
            charged: admission.charge.amount,
            points_awarded: admission.points,
            balance: member.balance(),
            loyalty_points: member.loyalty_points(),
        };
        if let Some(session) = self.sessions.get_mut(&session_id) {
            session.add_participant(member_id);
        }
        self.refresh_averages_for(member_id);

        log::info!(
            "member {member_id} registered to {session_id} for {}",
            registration.charged
        );
        Ok(registration)
    }

    /// Remove the registration, without refunding the price or the loyalty points
    pub fn unregister_from_session(
        &mut self,
        member_id: MemberId,
        session_id: SessionId,
    ) -> Result<(), Error> {
        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(Error::SessionNotFound(session_id))?;
        let member = self
            .members
            .get_mut(&member_id)
            .ok_or(Error::MemberNotFound(member_id))?;
        if !member.remove_session(session_id) {
            return Err(Error::NotRegistered {
                member_id,
                session_id,
            });
        }
        session.remove_participant(member_id);
        self.refresh_averages_for(member_id);

        log::info!("member {member_id} unregistered from {session_id}");
        Ok(())
    }

    /// Recompute the current averages of every club `member_id` belongs to
    ///
    /// Loyalty points count towards every club of the member, so all of them are affected.
    pub(super) fn refresh_averages_for(&mut self, member_id: MemberId) {
        let club_ids: Vec<ClubId> = self
            .clubs
            .values()
            .filter(|club| club.has_member(member_id))
            .map(|club| club.club_id)
            .collect();
        self.refresh_averages(club_ids);
    }

    pub(super) fn refresh_averages(&mut self, club_ids: impl IntoIterator<Item = ClubId>) {
        for club_id in club_ids {
            let Some(club) = self.clubs.get_mut(&club_id) else {
                continue;
            };
            let averages = ClubAverages::compute(
                club_id,
                club.members().iter().filter_map(|id| self.members.get(id)),
            );
            club.set_current_averages(averages);
        }
    }
}

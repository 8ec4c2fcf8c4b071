use std::collections::BTreeSet;

use super::{ClubAverages, ClubId, ClubSystem, Error, MemberId, Rollover};

impl ClubSystem {
    /// End the month for one club
    ///
    /// The club's averages and every member's previous month are captured before anything is
    /// reset. Memberships are cleared for the whole member, so the members also leave the rosters
    /// of other clubs.
    pub fn next_month(&mut self, club_id: ClubId) -> Result<Rollover, Error> {
        self.club(club_id)?;
        let mut rollovers = self.roll_over(vec![club_id]);
        rollovers.pop().ok_or(Error::ClubNotFound(club_id))
    }

    /// End the month for every club at once
    pub fn next_month_all(&mut self) -> Vec<Rollover> {
        let club_ids = self.clubs.keys().copied().collect();
        let rollovers = self.roll_over(club_ids);
        log::info!(
            "month ended for {} clubs, memberships need to be renewed",
            rollovers.len()
        );
        rollovers
    }

    fn roll_over(&mut self, club_ids: Vec<ClubId>) -> Vec<Rollover> {
        // Averages from the state before any member is reset
        let closing: Vec<(ClubId, ClubAverages)> = club_ids
            .into_iter()
            .filter_map(|club_id| self.clubs.get(&club_id))
            .map(|club| {
                let averages = ClubAverages::compute(
                    club.club_id,
                    club.members().iter().filter_map(|id| self.members.get(id)),
                );
                (club.club_id, averages)
            })
            .collect();

        let mut affected: BTreeSet<MemberId> = BTreeSet::new();
        let mut rollovers = Vec::with_capacity(closing.len());
        for (club_id, averages) in closing {
            let Some(club) = self.clubs.get_mut(&club_id) else {
                continue;
            };
            let members = club.close_month(averages);
            log::info!(
                "club {club_id} closed the month with {} members, {:.2} sessions and {:.2} points per member",
                members.len(),
                averages.sessions_per_member,
                averages.points_per_member
            );
            rollovers.push(Rollover {
                club_id,
                previous: averages,
                members: members.len(),
            });
            affected.extend(members);
        }

        // Each member is reset exactly once, even when part of several closing clubs
        for member_id in &affected {
            let Some(member) = self.members.get_mut(member_id) else {
                continue;
            };
            for session_id in member.roll_over() {
                if let Some(session) = self.sessions.get_mut(&session_id) {
                    session.remove_participant(*member_id);
                }
            }
        }

        let mut touched = Vec::new();
        for club in self.clubs.values_mut() {
            let before = club.members().len();
            for member_id in &affected {
                club.remove_member(*member_id);
            }
            if club.members().len() != before {
                touched.push(club.club_id);
            }
        }
        self.refresh_averages(touched);

        rollovers
    }
}

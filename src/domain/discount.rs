use super::{ClubAverages, MonthStats};

const MAX_PARTICIPATION_DISCOUNT: f64 = 60.0;
const MAX_BONUS_POINTS_DISCOUNT: f64 = 20.0;
/// Discount percentage earned per point above the club average
const POINT_VALUE: f64 = 0.25;
const SPORTS_DIVERSITY_DISCOUNT: f64 = 10.0;
/// Members need strictly more distinct sports than this for the diversity discount
const SPORTS_DIVERSITY_THRESHOLD: u32 = 3;
const MAX_COMBINED_DISCOUNT: f64 = 90.0;

/// Ways of rewarding last month's activity with a discount on a membership
///
/// Every strategy looks at the member's previous month and the club's previous month averages
/// only, so discounts are stable for the whole month.
#[derive(Clone, Debug, PartialEq)]
pub enum DiscountStrategy {
    /// Registered to more sessions than the club average
    Participation,
    /// Earned more loyalty points than the club average
    BonusPoints,
    /// Practiced more than three different sports
    SportsDiversity,
    /// Sum of the inner strategies, capped at 90%
    Combined(Vec<DiscountStrategy>),
}

impl Default for DiscountStrategy {
    fn default() -> Self {
        Self::Combined(vec![
            Self::Participation,
            Self::BonusPoints,
            Self::SportsDiversity,
        ])
    }
}

impl DiscountStrategy {
    /// Discount in percent, always within `0.0..=90.0`
    pub fn discount_percent(&self, member: &MonthStats, club: &ClubAverages) -> f64 {
        match self {
            Self::Participation => participation(member.sessions, club.sessions_per_member),
            Self::BonusPoints => bonus_points(member.points, club.points_per_member),
            Self::SportsDiversity => sports_diversity(member.sports),
            Self::Combined(strategies) => strategies
                .iter()
                .map(|strategy| strategy.discount_percent(member, club))
                .sum::<f64>()
                .clamp(0.0, MAX_COMBINED_DISCOUNT),
        }
    }
}

fn participation(sessions: u32, average: f64) -> f64 {
    if sessions == 0 || average == 0.0 {
        return 0.0;
    }
    let sessions = f64::from(sessions);
    if sessions > average {
        (average / sessions * 100.0).min(MAX_PARTICIPATION_DISCOUNT)
    } else {
        0.0
    }
}

fn bonus_points(points: u32, average: f64) -> f64 {
    if points == 0 || average == 0.0 {
        return 0.0;
    }
    if f64::from(points) > average {
        let excess = i64::from(points) - average.trunc() as i64;
        (POINT_VALUE * excess as f64).min(MAX_BONUS_POINTS_DISCOUNT)
    } else {
        0.0
    }
}

fn sports_diversity(sports: u32) -> f64 {
    if sports > SPORTS_DIVERSITY_THRESHOLD {
        SPORTS_DIVERSITY_DISCOUNT
    } else {
        0.0
    }
}

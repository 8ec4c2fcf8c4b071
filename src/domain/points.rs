use super::{SessionCategory, Tier};

/// Loyalty points awarded for registering to a session of `category` under `tier`
pub fn loyalty_points(tier: Tier, category: SessionCategory) -> u32 {
    match (tier, category) {
        (Tier::Full, SessionCategory::Personal) => 20,
        (Tier::Full, SessionCategory::Group) => 4,
        (Tier::Full, SessionCategory::Online) => 8,
        (Tier::Standard, SessionCategory::Personal) => 10,
        (Tier::Standard, SessionCategory::Group) => 2,
        (Tier::Standard, SessionCategory::Online) => 4,
    }
}

use super::{discount::DiscountStrategy, Club, Member, Session, SessionCategory, Tier};
use crate::config::PricingConfig;

/// Price of a membership after the member's discount
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MembershipQuote {
    pub base_price: f64,
    pub discount_percent: f64,
    pub price: f64,
}

/// Amount charged for a session registration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Charge {
    pub amount: f64,
    /// The registration uses up the member's free personal session
    pub consumes_free_session: bool,
}

/// Resolves the prices of memberships and session registrations
#[derive(Clone, Copy, Debug)]
pub struct Pricing<'a> {
    config: &'a PricingConfig,
    strategy: &'a DiscountStrategy,
}

impl<'a> Pricing<'a> {
    pub fn new(config: &'a PricingConfig, strategy: &'a DiscountStrategy) -> Self {
        Self { config, strategy }
    }

    pub fn base_price(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Standard => self.config.standard_membership,
            Tier::Full => self.config.full_membership,
        }
    }

    /// Discount earned by the member's previous month at `club`
    pub fn discount_percent(&self, member: &Member, club: &Club) -> f64 {
        self.strategy
            .discount_percent(&member.previous_stats(), &club.previous_averages())
    }

    pub fn membership(&self, tier: Tier, member: &Member, club: &Club) -> MembershipQuote {
        let base_price = self.base_price(tier);
        let discount_percent = self.discount_percent(member, club);
        MembershipQuote {
            base_price,
            discount_percent,
            price: apply_discount(base_price, discount_percent),
        }
    }

    /// Price of registering `member` to `session` under a membership of `tier`
    ///
    /// Full tier members get their first personal session for free, and a reduced rate for every
    /// following one. This takes precedence over any discount.
    pub fn session(&self, tier: Tier, session: &Session, member: &Member, club: &Club) -> Charge {
        if tier == Tier::Full && session.category == SessionCategory::Personal {
            return if member.has_free_personal_session() {
                Charge {
                    amount: 0.0,
                    consumes_free_session: true,
                }
            } else {
                Charge {
                    amount: self.config.full_tier_personal_rate,
                    consumes_free_session: false,
                }
            };
        }

        let discount_percent = if self.config.discount_session_registrations {
            self.discount_percent(member, club)
        } else {
            0.0
        };
        Charge {
            amount: apply_discount(session.price(), discount_percent),
            consumes_free_session: false,
        }
    }
}

fn apply_discount(price: f64, discount_percent: f64) -> f64 {
    (price * (1.0 - discount_percent / 100.0)).max(0.0)
}

// src/domain/session.rs

use crate::domain::assumptions::Assumptions;
use crate::domain::audit::{audit_listing, AuditContext, ListingAudit};
use crate::domain::listing::Listing;
use crate::errors::{AppError, AppResult};
use std::collections::BTreeSet;

/// State of one comparison session: the slider assumptions and the
/// favorited listings. Passed explicitly; nothing here is global.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonSession {
    assumptions: Assumptions,
    favorites: BTreeSet<i64>,
}

impl ComparisonSession {
    pub fn new(assumptions: Assumptions) -> Self {
        Self {
            assumptions: assumptions.clamped(),
            favorites: BTreeSet::new(),
        }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn set_assumptions(&mut self, assumptions: Assumptions) {
        self.assumptions = assumptions.clamped();
    }

    /// Adds or removes a favorite. Returns whether it is now favorited.
    pub fn toggle_favorite(&mut self, id: i64) -> bool {
        if self.favorites.remove(&id) {
            false
        } else {
            self.favorites.insert(id);
            true
        }
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorites.contains(&id)
    }

    pub fn favorites(&self) -> impl Iterator<Item = i64> + '_ {
        self.favorites.iter().copied()
    }

    /// Audits the favorited listings under the session assumptions, best net
    /// yield first. Every favorite must be present in `listings`.
    pub fn compare(
        &self,
        listings: &[Listing],
        ctx: &AuditContext<'_>,
    ) -> AppResult<Vec<ListingAudit>> {
        let mut audits = self
            .favorites
            .iter()
            .map(|id| {
                listings
                    .iter()
                    .find(|l| l.id == *id)
                    .map(|l| audit_listing(l, ctx, &self.assumptions))
                    .ok_or(AppError::MissingListing(*id))
            })
            .collect::<AppResult<Vec<_>>>()?;

        audits.sort_by(|a, b| b.yields.net_yield.total_cmp(&a.yields.net_yield));
        Ok(audits)
    }
}

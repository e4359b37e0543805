pub mod area_rates;
pub mod assumptions;
pub mod audit;
pub mod currency;
pub mod filters;
pub mod flags;
pub mod listing;
pub mod price;
pub mod rate;
pub mod session;
pub mod yields;

pub use area_rates::AreaRateTable;
pub use assumptions::Assumptions;
pub use audit::{audit_all, audit_listing, AuditContext, ListingAudit};
pub use currency::CurrencyRates;
pub use filters::{AuditSummary, ListingFilter};
pub use flags::{FlagLevel, FlagPolicy};
pub use listing::Listing;
pub use rate::RatePolicy;
pub use session::ComparisonSession;

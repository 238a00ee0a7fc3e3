pub mod commission;

pub use commission::{commission_key, Commission, CommissionBreakdown, CommissionStatus};

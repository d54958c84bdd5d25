pub mod clock;
pub mod subscription_manager;
pub mod upcoming;

pub use clock::{Clock, FixedClock, SystemClock};
pub use subscription_manager::{SubscriptionManager, SubscriptionPatch};
pub use upcoming::{upcoming_charges, DueLabel, UpcomingCharge};

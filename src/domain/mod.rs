//! Subscription records and the closed enums that describe them.

pub mod frequency;
pub mod metadata;
pub mod subscription;

pub use frequency::Frequency;
pub use metadata::{Category, Currency, NotificationLead};
pub use subscription::{Subscription, DEFAULT_ICON};

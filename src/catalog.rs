//! Well-known services offered when adding a subscription.

use once_cell::sync::Lazy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTemplate {
    pub name: &'static str,
    pub icon: &'static str,
}

static SERVICES: Lazy<Vec<ServiceTemplate>> = Lazy::new(|| {
    [
        ("1Password", "lock.fill"),
        ("Adobe XD", "paintbrush.fill"),
        ("Aha", "video.fill"),
        ("Airtel", "antenna.radiowaves.left.and.right"),
        ("Albert Heijn", "cart.fill"),
        ("Amazon", "cart.fill"),
        ("Amazon AWS", "cloud.fill"),
        ("Amazon Prime", "play.fill"),
        ("American Express", "creditcard.fill"),
    ]
    .into_iter()
    .map(|(name, icon)| ServiceTemplate { name, icon })
    .collect()
});

pub fn services() -> &'static [ServiceTemplate] {
    &SERVICES
}

/// Case-insensitive substring search; an empty query returns the whole catalog.
pub fn search(query: &str) -> Vec<&'static ServiceTemplate> {
    let needle = query.trim().to_lowercase();
    SERVICES
        .iter()
        .filter(|service| needle.is_empty() || service.name.to_lowercase().contains(&needle))
        .collect()
}

/// Exact (case-insensitive) lookup used to pick an icon for a new subscription.
pub fn lookup(name: &str) -> Option<&'static ServiceTemplate> {
    let name = name.trim();
    SERVICES
        .iter()
        .find(|service| service.name.eq_ignore_ascii_case(name))
}

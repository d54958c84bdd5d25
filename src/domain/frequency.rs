use std::{fmt, str::FromStr};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::SubscriptionError;
use crate::schedule::calendar::{shift_month, shift_year};

/// Billing cadence of a subscription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }

    /// Date of the occurrence `steps` intervals after `anchor`.
    ///
    /// Calendar steps are measured from the anchor rather than chained, so a
    /// Jan 31 anchor yields Feb 28 and then Mar 31.
    pub fn advance(self, anchor: NaiveDate, steps: u64) -> Option<NaiveDate> {
        let steps = i64::try_from(steps).ok()?;
        match self {
            Frequency::Daily => anchor.checked_add_signed(Duration::try_days(steps)?),
            Frequency::Weekly => {
                anchor.checked_add_signed(Duration::try_days(steps.checked_mul(7)?)?)
            }
            Frequency::Monthly => shift_month(anchor, steps),
            Frequency::Yearly => shift_year(anchor, steps),
        }
    }

    /// Parses a persisted label, reporting whether it needed normalizing.
    ///
    /// Returns the frequency and `true` when the raw text differs from the
    /// canonical label (lowercase spellings, `annual`, surrounding spaces).
    pub fn parse_legacy(raw: &str) -> Result<(Frequency, bool), SubscriptionError> {
        let frequency: Frequency = raw.parse()?;
        Ok((frequency, raw != frequency.label()))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = SubscriptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Frequency::Daily),
            "weekly" | "week" => Ok(Frequency::Weekly),
            "monthly" | "month" => Ok(Frequency::Monthly),
            "yearly" | "year" | "annual" | "annually" => Ok(Frequency::Yearly),
            _ => Err(SubscriptionError::UnknownFrequency(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn advance_steps_by_frequency() {
        let start = date(2025, 1, 1);
        assert_eq!(Frequency::Daily.advance(start, 3), Some(date(2025, 1, 4)));
        assert_eq!(Frequency::Weekly.advance(start, 2), Some(date(2025, 1, 15)));
        assert_eq!(Frequency::Monthly.advance(start, 1), Some(date(2025, 2, 1)));
        assert_eq!(Frequency::Yearly.advance(start, 1), Some(date(2026, 1, 1)));
        assert_eq!(Frequency::Monthly.advance(start, 0), Some(start));
    }

    #[test]
    fn monthly_steps_keep_the_anchor_day() {
        let anchor = date(2025, 1, 31);
        let dates: Vec<_> = (0..4)
            .map(|n| Frequency::Monthly.advance(anchor, n).unwrap())
            .collect();
        assert_eq!(
            dates,
            vec![
                date(2025, 1, 31),
                date(2025, 2, 28),
                date(2025, 3, 31),
                date(2025, 4, 30)
            ]
        );
    }

    #[test]
    fn advance_out_of_range_is_none() {
        assert_eq!(Frequency::Yearly.advance(date(2025, 1, 1), u64::MAX), None);
        assert_eq!(Frequency::Daily.advance(date(2025, 1, 1), u64::MAX / 2), None);
    }

    #[test]
    fn parses_labels_and_legacy_spellings() {
        assert_eq!("Monthly".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!(" weekly ".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("annual".parse::<Frequency>().unwrap(), Frequency::Yearly);
        assert!(matches!(
            "Fortnightly".parse::<Frequency>(),
            Err(SubscriptionError::UnknownFrequency(raw)) if raw == "Fortnightly"
        ));

        assert_eq!(
            Frequency::parse_legacy("Yearly").unwrap(),
            (Frequency::Yearly, false)
        );
        assert_eq!(
            Frequency::parse_legacy("yearly").unwrap(),
            (Frequency::Yearly, true)
        );
    }

    #[test]
    fn serializes_as_canonical_label() {
        let json = serde_json::to_string(&Frequency::Yearly).unwrap();
        assert_eq!(json, "\"Yearly\"");
        for frequency in Frequency::ALL {
            assert_eq!(frequency.to_string(), frequency.label());
        }
    }
}

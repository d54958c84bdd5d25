use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate};

use super::calendar::month_index;
use super::window::DateWindow;
use crate::domain::Frequency;

/// Lazy sequence of billing dates stepping forward from an anchor.
///
/// The sequence is always finite: it ends at the last occurrence on or before
/// `upper`, or earlier if stepping leaves the representable date range.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: NaiveDate,
    frequency: Frequency,
    upper: NaiveDate,
    index: u64,
    finished: bool,
}

impl Occurrences {
    pub fn new(anchor: NaiveDate, frequency: Frequency, upper: NaiveDate) -> Self {
        Self {
            anchor,
            frequency,
            upper,
            index: 0,
            finished: false,
        }
    }

    pub fn upper(&self) -> NaiveDate {
        self.upper
    }

    /// Jumps to the first occurrence on or after `date` without walking every step.
    pub fn starting_from(mut self, date: NaiveDate) -> Self {
        if self.finished || date <= self.anchor {
            return self;
        }
        self.index = self.index.max(steps_before(self.anchor, self.frequency, date));
        loop {
            match self.frequency.advance(self.anchor, self.index) {
                Some(current) if current < date => self.index += 1,
                Some(_) => break,
                None => {
                    self.finished = true;
                    break;
                }
            }
        }
        self
    }

    /// Occurrences that fall inside `window`.
    pub fn within(self, window: DateWindow) -> impl Iterator<Item = NaiveDate> {
        let end = window.end;
        self.starting_from(window.start)
            .take_while(move |date| *date <= end)
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.finished {
            return None;
        }
        match self.frequency.advance(self.anchor, self.index) {
            Some(date) if date <= self.upper => {
                self.index += 1;
                Some(date)
            }
            _ => {
                self.finished = true;
                None
            }
        }
    }
}

impl FusedIterator for Occurrences {}

/// Lower bound on the number of steps from `anchor` to reach `date`.
fn steps_before(anchor: NaiveDate, frequency: Frequency, date: NaiveDate) -> u64 {
    let days = (date - anchor).num_days().max(0);
    let steps = match frequency {
        Frequency::Daily => days,
        Frequency::Weekly => days / 7,
        Frequency::Monthly => month_index(date) - month_index(anchor) - 1,
        Frequency::Yearly => i64::from(date.year() - anchor.year()) - 1,
    };
    u64::try_from(steps).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn terminates_after_upper_bound() {
        let dates: Vec<_> =
            Occurrences::new(date(2025, 1, 1), Frequency::Monthly, date(2025, 4, 1)).collect();
        assert_eq!(
            dates,
            vec![date(2025, 1, 1), date(2025, 2, 1), date(2025, 3, 1), date(2025, 4, 1)]
        );
    }

    #[test]
    fn empty_when_upper_precedes_anchor() {
        let mut iter = Occurrences::new(date(2025, 5, 1), Frequency::Daily, date(2025, 4, 30));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn single_day_interval_yields_one_occurrence() {
        let dates: Vec<_> =
            Occurrences::new(date(2025, 5, 1), Frequency::Daily, date(2025, 5, 1)).collect();
        assert_eq!(dates, vec![date(2025, 5, 1)]);
    }

    #[test]
    fn starting_from_matches_linear_walk() {
        let anchor = date(2020, 1, 31);
        let upper = date(2030, 12, 31);
        for frequency in Frequency::ALL {
            for probe in [date(2020, 1, 1), date(2022, 3, 1), date(2024, 2, 29), date(2027, 12, 31)] {
                let walked = Occurrences::new(anchor, frequency, upper).find(|d| *d >= probe);
                let jumped = Occurrences::new(anchor, frequency, upper)
                    .starting_from(probe)
                    .next();
                assert_eq!(walked, jumped, "{frequency} from {probe}");
            }
        }
    }

    #[test]
    fn within_limits_to_window() {
        let window = DateWindow::new(date(2025, 3, 1), date(2025, 3, 31)).unwrap();
        let dates: Vec<_> = Occurrences::new(date(2025, 2, 26), Frequency::Weekly, NaiveDate::MAX)
            .within(window)
            .collect();
        assert_eq!(
            dates,
            vec![date(2025, 3, 5), date(2025, 3, 12), date(2025, 3, 19), date(2025, 3, 26)]
        );
    }

    #[test]
    fn open_ended_sequence_is_safe_to_take_from() {
        let first_five: Vec<_> =
            Occurrences::new(date(2025, 1, 1), Frequency::Yearly, NaiveDate::MAX)
                .take(5)
                .collect();
        assert_eq!(first_five.len(), 5);
        assert_eq!(first_five[4], date(2029, 1, 1));
    }
}

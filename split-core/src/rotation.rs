//! Deterministic weekly buyer rotation
//!
//! Maps a week's start date to the roster member responsible for purchases
//! that week. The mapping depends only on `(week_start, roster, epoch)` and
//! is independent of any record — it is a pure function.

use crate::{Error, Member, Result};
use chrono::NaiveDate;

/// Buyer rotation schedule anchored at a fixed epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    /// Reference week start; `roster[0]` is the buyer for the epoch week
    pub epoch: NaiveDate,
}

impl Default for Rotation {
    fn default() -> Self {
        // First week of the original deployment
        Self {
            epoch: NaiveDate::from_ymd_opt(2025, 10, 20).expect("valid epoch date"),
        }
    }
}

impl Rotation {
    /// Create a rotation anchored at `epoch`
    pub fn new(epoch: NaiveDate) -> Self {
        Self { epoch }
    }

    /// Buyer responsible for the week starting at `week_start`
    ///
    /// Uses a floored modulo so week starts before the epoch still map into
    /// `[0, roster.len())`. The result cycles with period
    /// `7 * roster.len()` days.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRoster`] when the roster is empty — rotation is
    /// undefined without members.
    pub fn buyer_for<'a>(&self, week_start: NaiveDate, roster: &'a [Member]) -> Result<&'a Member> {
        if roster.is_empty() {
            return Err(Error::EmptyRoster);
        }

        let week_diff = (week_start - self.epoch).num_days().div_euclid(7);
        let index = week_diff.rem_euclid(roster.len() as i64) as usize;

        Ok(&roster[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn roster(names: &[&str]) -> Vec<Member> {
        names.iter().map(|n| Member::new(*n)).collect()
    }

    #[test]
    fn test_rotation_cycles_through_roster() {
        let rotation = Rotation::new(date(2025, 10, 20));
        let roster = roster(&["bee", "elsa"]);

        assert_eq!(
            rotation.buyer_for(date(2025, 10, 20), &roster).unwrap(),
            &Member::new("bee")
        );
        assert_eq!(
            rotation.buyer_for(date(2025, 10, 27), &roster).unwrap(),
            &Member::new("elsa")
        );
        assert_eq!(
            rotation.buyer_for(date(2025, 11, 3), &roster).unwrap(),
            &Member::new("bee")
        );
    }

    #[test]
    fn test_rotation_mid_week_dates_share_the_week() {
        let rotation = Rotation::new(date(2025, 10, 20));
        let roster = roster(&["bee", "elsa", "jim"]);

        // Any start date inside the same 7-day span maps to the same buyer
        for offset in 0..7 {
            let day = date(2025, 10, 27) + chrono::Duration::days(offset);
            assert_eq!(rotation.buyer_for(day, &roster).unwrap(), &Member::new("elsa"));
        }
    }

    #[test]
    fn test_rotation_before_epoch_uses_floored_modulo() {
        let rotation = Rotation::new(date(2025, 10, 20));
        let roster = roster(&["bee", "elsa", "jim"]);

        // One week before the epoch wraps to the last roster slot
        assert_eq!(
            rotation.buyer_for(date(2025, 10, 13), &roster).unwrap(),
            &Member::new("jim")
        );
        assert_eq!(
            rotation.buyer_for(date(2025, 10, 6), &roster).unwrap(),
            &Member::new("elsa")
        );
    }

    #[test]
    fn test_rotation_empty_roster() {
        let rotation = Rotation::default();
        let result = rotation.buyer_for(date(2025, 10, 20), &[]);
        assert!(matches!(result, Err(Error::EmptyRoster)));
    }

    #[test]
    fn test_rotation_is_pure() {
        let rotation = Rotation::default();
        let roster = roster(&["bee", "elsa", "jim", "betty"]);
        let first = rotation.buyer_for(date(2026, 3, 2), &roster).unwrap().clone();
        for _ in 0..10 {
            assert_eq!(rotation.buyer_for(date(2026, 3, 2), &roster).unwrap(), &first);
        }
    }
}

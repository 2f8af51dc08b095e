use chrono::NaiveDate;

use super::presets::{DateRange, Preset};
use crate::error::{ExtratoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    Closed,
    Open,
}

/// Two-state period picker.
///
/// Choosing a preset or completing a manual range while open closes the
/// picker and hands the new range back to the caller. Nothing is emitted
/// while closed.
#[derive(Debug, Clone)]
pub struct PeriodSelector {
    state: SelectorState,
    range: DateRange,
}

impl PeriodSelector {
    /// Starts closed on the current month.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: SelectorState::Closed,
            range: Preset::ThisMonth.range(today),
        }
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn open(&mut self) {
        self.state = SelectorState::Open;
    }

    /// Dismiss without changing the range
    pub fn close(&mut self) {
        self.state = SelectorState::Closed;
    }

    pub fn select_preset(&mut self, preset: Preset, today: NaiveDate) -> Option<DateRange> {
        if self.state != SelectorState::Open {
            return None;
        }
        Some(self.commit(preset.range(today)))
    }

    /// Finish a manual range. A backwards range is rejected and the picker stays open.
    pub fn complete_range(&mut self, from: NaiveDate, to: NaiveDate) -> Result<Option<DateRange>> {
        if self.state != SelectorState::Open {
            return Ok(None);
        }
        if from > to {
            return Err(ExtratoError::InvalidRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Some(self.commit(DateRange { from, to })))
    }

    fn commit(&mut self, range: DateRange) -> DateRange {
        self.range = range;
        self.state = SelectorState::Closed;
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn starts_closed_on_current_month() {
        let selector = PeriodSelector::new(d(2024, 5, 9));
        assert_eq!(selector.state(), SelectorState::Closed);
        assert_eq!(selector.range().from, d(2024, 5, 1));
        assert_eq!(selector.range().to, d(2024, 5, 31));
    }

    #[test]
    fn preset_selection_closes_and_emits() {
        let today = d(2024, 5, 9);
        let mut selector = PeriodSelector::new(today);
        assert_eq!(selector.select_preset(Preset::LastMonth, today), None);

        selector.open();
        let emitted = selector.select_preset(Preset::LastMonth, today).unwrap();
        assert_eq!(emitted.from, d(2024, 4, 1));
        assert_eq!(selector.state(), SelectorState::Closed);
        assert_eq!(selector.range(), emitted);
    }

    #[test]
    fn manual_range_must_be_ordered() {
        let mut selector = PeriodSelector::new(d(2024, 5, 9));
        selector.open();
        assert!(selector.complete_range(d(2024, 5, 10), d(2024, 5, 1)).is_err());
        assert_eq!(selector.state(), SelectorState::Open);

        let range = selector
            .complete_range(d(2024, 5, 1), d(2024, 5, 10))
            .unwrap()
            .unwrap();
        assert_eq!(range.days(), 10);
        assert_eq!(selector.state(), SelectorState::Closed);
    }

    #[test]
    fn closing_keeps_previous_range() {
        let mut selector = PeriodSelector::new(d(2024, 5, 9));
        let before = selector.range();
        selector.open();
        selector.close();
        assert_eq!(selector.range(), before);
        assert_eq!(
            selector.complete_range(d(2024, 1, 1), d(2024, 1, 2)).unwrap(),
            None
        );
    }
}

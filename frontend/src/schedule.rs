use std::ops::RangeInclusive;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::models::session::{Period, RentalHours, ReservationTime};

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = add_months(year, month, 1);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

fn add_months(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let zero_based = month - 1 + offset;
    (year + (zero_based / 12) as i32, zero_based % 12 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthOption {
    pub offset: u32,
    pub year: i32,
    pub month: u32,
}

/// Bookable dates: today through the same day-of-month `months_ahead`
/// months later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    today: NaiveDate,
    months_ahead: u32,
}

impl DateWindow {
    pub fn new(today: NaiveDate, months_ahead: u32) -> Self {
        Self { today, months_ahead }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn month_options(&self) -> Vec<MonthOption> {
        (0..=self.months_ahead).filter_map(|offset| self.month_at(offset)).collect()
    }

    pub fn month_at(&self, offset: u32) -> Option<MonthOption> {
        if offset > self.months_ahead {
            return None;
        }
        let (year, month) = add_months(self.today.year(), self.today.month(), offset);
        Some(MonthOption { offset, year, month })
    }

    /// Selectable days of the month at `offset`.
    pub fn day_range(&self, offset: u32) -> Option<RangeInclusive<u32>> {
        let option = self.month_at(offset)?;
        let last = days_in_month(option.year, option.month);
        let start = if offset == 0 { self.today.day() } else { 1 };
        let end = if offset == self.months_ahead {
            self.today.day().min(last)
        } else {
            last
        };
        Some(start..=end)
    }

    pub fn offset_of(&self, date: NaiveDate) -> Option<u32> {
        let months = (date.year() - self.today.year()) * 12 + date.month() as i32 - self.today.month() as i32;
        u32::try_from(months).ok().filter(|m| *m <= self.months_ahead)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.offset_of(date)
            .and_then(|offset| self.day_range(offset))
            .map(|range| range.contains(&date.day()))
            .unwrap_or(false)
    }

    pub fn date_at(&self, offset: u32, day: u32) -> Option<NaiveDate> {
        let option = self.month_at(offset)?;
        if !self.day_range(offset)?.contains(&day) {
            return None;
        }
        NaiveDate::from_ymd_opt(option.year, option.month, day)
    }
}

/// Month and day columns of the date modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePicker {
    window: DateWindow,
    month: Option<u32>,
    day: Option<u32>,
}

impl DatePicker {
    pub fn new(window: DateWindow) -> Self {
        let mut picker = Self { window, month: None, day: None };
        picker.select_month(0);
        picker
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    /// Re-syncs the columns with the stored date when the modal opens.
    pub fn open(&mut self, selected: Option<NaiveDate>) {
        if let Some(date) = selected.filter(|d| self.window.contains(*d)) {
            self.month = self.window.offset_of(date);
            self.day = Some(date.day());
        }
    }

    /// Switching month selects its first available day.
    pub fn select_month(&mut self, offset: u32) -> bool {
        match self.window.day_range(offset) {
            Some(range) => {
                self.month = Some(offset);
                self.day = Some(*range.start());
                true
            }
            None => false,
        }
    }

    pub fn select_day(&mut self, day: u32) -> bool {
        let in_range = self
            .month
            .and_then(|offset| self.window.day_range(offset))
            .map(|range| range.contains(&day))
            .unwrap_or(false);
        if in_range {
            self.day = Some(day);
        }
        in_range
    }

    pub fn selected_month(&self) -> Option<u32> {
        self.month
    }

    pub fn selected_day(&self) -> Option<u32> {
        self.day
    }

    pub fn day_options(&self) -> Vec<u32> {
        self.month
            .and_then(|offset| self.window.day_range(offset))
            .map(|range| range.collect())
            .unwrap_or_default()
    }

    /// `None` unless both columns hold a valid choice.
    pub fn confirm(&self) -> Option<NaiveDate> {
        self.window.date_at(self.month?, self.day?)
    }
}

pub const HOUR_OPTIONS: RangeInclusive<u8> = 1..=12;
pub const MINUTE_OPTIONS: RangeInclusive<u8> = 0..=59;

/// Period, hour and minute columns of the time modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimePicker {
    period: Option<Period>,
    hour: Option<u8>,
    minute: Option<u8>,
}

impl TimePicker {
    pub fn open(&mut self, selected: Option<ReservationTime>) {
        if let Some(time) = selected {
            let (period, hour) = time.to_12h();
            self.period = Some(period);
            self.hour = Some(hour);
            self.minute = Some(time.minute());
        }
    }

    pub fn select_period(&mut self, period: Period) {
        self.period = Some(period);
    }

    pub fn select_hour(&mut self, hour: u8) -> bool {
        let ok = HOUR_OPTIONS.contains(&hour);
        if ok {
            self.hour = Some(hour);
        }
        ok
    }

    pub fn select_minute(&mut self, minute: u8) -> bool {
        let ok = MINUTE_OPTIONS.contains(&minute);
        if ok {
            self.minute = Some(minute);
        }
        ok
    }

    pub fn period(&self) -> Option<Period> {
        self.period
    }

    pub fn hour(&self) -> Option<u8> {
        self.hour
    }

    pub fn minute(&self) -> Option<u8> {
        self.minute
    }

    pub fn confirm(&self) -> Option<ReservationTime> {
        ReservationTime::from_12h(self.period?, self.hour?, self.minute?).ok()
    }
}

/// Start, latest drop-off and pick-up times for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageWindow {
    pub start: NaiveDateTime,
    pub deadline: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl UsageWindow {
    /// Uses the picked date and time when both are set, otherwise `now`.
    pub fn compute(
        date: Option<NaiveDate>,
        time: Option<ReservationTime>,
        now: NaiveDateTime,
        hours: RentalHours,
        arrival_buffer_minutes: i64,
    ) -> Self {
        let start = match (date, time) {
            (Some(date), Some(time)) => date.and_time(time.to_naive()),
            _ => now,
        };
        Self {
            start,
            deadline: start + Duration::minutes(arrival_buffer_minutes),
            end: start + Duration::hours(hours.hours() as i64),
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
    fn test_month_options_cross_year() {
        let window = DateWindow::new(date(2026, 11, 15), 3);
        let months: Vec<(i32, u32)> = window.month_options().iter().map(|m| (m.year, m.month)).collect();
        assert_eq!(months, vec![(2026, 11), (2026, 12), (2027, 1), (2027, 2)]);
    }

    #[test]
    fn test_day_bounds() {
        let window = DateWindow::new(date(2026, 10, 19), 3);
        assert_eq!(window.day_range(0), Some(19..=31));
        assert_eq!(window.day_range(1), Some(1..=30));
        assert_eq!(window.day_range(3), Some(1..=19));
        assert_eq!(window.day_range(4), None);

        assert!(!window.contains(date(2026, 10, 18)));
        assert!(window.contains(date(2026, 10, 19)));
        assert!(window.contains(date(2027, 1, 19)));
        assert!(!window.contains(date(2027, 1, 20)));
        assert!(!window.contains(date(2027, 2, 1)));
        assert!(!window.contains(date(2025, 12, 25)));
    }

    #[test]
    fn test_final_month_shorter_than_today() {
        // Nov 30 + 3 months is February
        let window = DateWindow::new(date(2026, 11, 30), 3);
        assert_eq!(window.day_range(3), Some(1..=28));
    }

    #[test]
    fn test_date_picker_defaults_to_today() {
        let picker = DatePicker::new(DateWindow::new(date(2026, 10, 19), 3));
        assert_eq!(picker.confirm(), Some(date(2026, 10, 19)));
        assert_eq!(picker.day_options().first(), Some(&19));
    }

    #[test]
    fn test_date_picker_rejects_out_of_window_days() {
        let mut picker = DatePicker::new(DateWindow::new(date(2026, 10, 19), 3));
        assert!(!picker.select_day(18));
        assert!(picker.select_month(3));
        assert_eq!(picker.selected_day(), Some(1));
        assert!(!picker.select_day(20));
        assert!(picker.select_day(19));
        assert_eq!(picker.confirm(), Some(date(2027, 1, 19)));
        assert!(!picker.select_month(4));
    }

    #[test]
    fn test_date_picker_open_syncs_selection() {
        let mut picker = DatePicker::new(DateWindow::new(date(2026, 10, 19), 3));
        picker.open(Some(date(2026, 12, 3)));
        assert_eq!(picker.selected_month(), Some(2));
        assert_eq!(picker.confirm(), Some(date(2026, 12, 3)));
        picker.open(Some(date(2030, 1, 1)));
        assert_eq!(picker.confirm(), Some(date(2026, 12, 3)));
    }

    #[test]
    fn test_time_picker_requires_all_columns() {
        let mut picker = TimePicker::default();
        assert_eq!(picker.confirm(), None);
        picker.select_period(Period::Pm);
        assert!(picker.select_hour(12));
        assert_eq!(picker.confirm(), None);
        assert!(!picker.select_minute(60));
        assert!(picker.select_minute(5));
        assert_eq!(picker.confirm(), Some(ReservationTime::new(12, 5).unwrap()));
        assert!(!picker.select_hour(0));
    }

    #[test]
    fn test_time_picker_open_uses_twelve_hour_clock() {
        let mut picker = TimePicker::default();
        picker.open(Some(ReservationTime::new(0, 45).unwrap()));
        assert_eq!(picker.period(), Some(Period::Am));
        assert_eq!(picker.hour(), Some(12));
        assert_eq!(picker.minute(), Some(45));
    }

    #[test]
    fn test_usage_window() {
        let now = date(2026, 10, 19).and_hms_opt(10, 0, 0).unwrap();
        let window = UsageWindow::compute(None, None, now, RentalHours::Four, 30);
        assert_eq!(window.start, now);
        assert_eq!(window.deadline, date(2026, 10, 19).and_hms_opt(10, 30, 0).unwrap());
        assert_eq!(window.end, date(2026, 10, 19).and_hms_opt(14, 0, 0).unwrap());

        let picked = UsageWindow::compute(
            Some(date(2026, 10, 20)),
            Some(ReservationTime::new(20, 15).unwrap()),
            now,
            RentalHours::Eight,
            30,
        );
        assert_eq!(picked.end, date(2026, 10, 21).and_hms_opt(4, 15, 0).unwrap());
    }
}

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::models::session::{LockerSize, RentalHours, ReservationTime};
use crate::routing::resolver::{RouteResult, RouteSource};

/// `₩4,000`
pub fn won(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('₩');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn size_label(size: LockerSize) -> &'static str {
    match size {
        LockerSize::S => "S (소형)",
        LockerSize::M => "M (중형)",
        LockerSize::L => "L (대형)",
    }
}

pub fn hours_label(hours: RentalHours) -> String {
    format!("{}시간", hours.hours())
}

fn clock(hour: u32, minute: u32) -> String {
    let period = if hour < 12 { "오전" } else { "오후" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{} {}:{:02}", period, display, minute)
}

/// `오후 3:05`
pub fn clock_time(at: NaiveDateTime) -> String {
    clock(at.hour(), at.minute())
}

pub fn reservation_time(time: ReservationTime) -> String {
    clock(time.hour() as u32, time.minute() as u32)
}

/// `26년 3월 5일`
pub fn short_date(date: NaiveDate) -> String {
    format!("{:02}년 {}월 {}일", date.year() % 100, date.month(), date.day())
}

pub const NO_LOCATION_WALK_LABEL: &str = "도보 약 2분";

/// Routed durations are exact, estimates get "약".
pub fn walk_label(route: &RouteResult, override_minutes: Option<u32>) -> String {
    let minutes = override_minutes.unwrap_or(route.duration_minutes);
    match route.source {
        RouteSource::Routed => format!("도보 {}분", minutes),
        RouteSource::Fallback => format!("도보 약 {}분", minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_won_grouping() {
        assert_eq!(won(0), "₩0");
        assert_eq!(won(500), "₩500");
        assert_eq!(won(4000), "₩4,000");
        assert_eq!(won(12500), "₩12,500");
        assert_eq!(won(1234567), "₩1,234,567");
    }

    #[test]
    fn test_clock_format() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(clock_time(d.and_hms_opt(0, 7, 0).unwrap()), "오전 12:07");
        assert_eq!(clock_time(d.and_hms_opt(12, 0, 0).unwrap()), "오후 12:00");
        assert_eq!(clock_time(d.and_hms_opt(15, 5, 0).unwrap()), "오후 3:05");
        assert_eq!(reservation_time(ReservationTime::new(9, 30).unwrap()), "오전 9:30");
    }

    #[test]
    fn test_short_date() {
        assert_eq!(short_date(NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()), "26년 3월 5일");
        assert_eq!(short_date(NaiveDate::from_ymd_opt(2105, 12, 31).unwrap()), "05년 12월 31일");
    }

    #[test]
    fn test_walk_labels() {
        let routed = RouteResult {
            polyline: Vec::new(),
            distance_meters: 410.0,
            duration_minutes: 6,
            source: RouteSource::Routed,
        };
        assert_eq!(walk_label(&routed, None), "도보 6분");
        let fallback = RouteResult { source: RouteSource::Fallback, duration_minutes: 4, ..routed };
        assert_eq!(walk_label(&fallback, None), "도보 약 4분");
        assert_eq!(walk_label(&fallback, Some(6)), "도보 약 6분");
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::funnel::ReservationFunnel;
use crate::models::coordinate::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockerSize {
    S,
    M,
    L,
}

impl LockerSize {
    pub const ALL: [LockerSize; 3] = [LockerSize::S, LockerSize::M, LockerSize::L];

    pub fn as_str(&self) -> &'static str {
        match self {
            LockerSize::S => "S",
            LockerSize::M => "M",
            LockerSize::L => "L",
        }
    }
}

impl fmt::Display for LockerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockerSize {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "S" | "s" => Ok(LockerSize::S),
            "M" | "m" => Ok(LockerSize::M),
            "L" | "l" => Ok(LockerSize::L),
            other => Err(ParseError::LockerSize(other.to_string())),
        }
    }
}

/// Rental length. Only the two advertised options exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RentalHours {
    Four,
    Eight,
}

impl RentalHours {
    pub const ALL: [RentalHours; 2] = [RentalHours::Four, RentalHours::Eight];

    pub fn hours(&self) -> u32 {
        match self {
            RentalHours::Four => 4,
            RentalHours::Eight => 8,
        }
    }
}

impl TryFrom<u32> for RentalHours {
    type Error = ParseError;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        match hours {
            4 => Ok(RentalHours::Four),
            8 => Ok(RentalHours::Eight),
            other => Err(ParseError::RentalHours(other.to_string())),
        }
    }
}

impl FromStr for RentalHours {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hours: u32 = s
            .trim()
            .parse()
            .map_err(|_| ParseError::RentalHours(s.to_string()))?;
        RentalHours::try_from(hours)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Am,
    Pm,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        }
    }
}

impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AM" | "am" => Ok(Period::Am),
            "PM" | "pm" => Ok(Period::Pm),
            other => Err(ParseError::Period(other.to_string())),
        }
    }
}

/// Wall-clock start time, 24h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReservationTime {
    hour: u8,
    minute: u8,
}

impl ReservationTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ParseError> {
        if hour > 23 || minute > 59 {
            return Err(ParseError::TimeOfDay(format!("{}:{:02}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }

    /// 12 AM is midnight, 12 PM stays noon, other PM hours add 12.
    pub fn from_12h(period: Period, hour12: u8, minute: u8) -> Result<Self, ParseError> {
        if !(1..=12).contains(&hour12) {
            return Err(ParseError::TimeOfDay(format!("{} {}", hour12, period.as_str())));
        }
        let hour = match (period, hour12) {
            (Period::Am, 12) => 0,
            (Period::Am, h) => h,
            (Period::Pm, 12) => 12,
            (Period::Pm, h) => h + 12,
        };
        Self::new(hour, minute)
    }

    pub fn to_12h(&self) -> (Period, u8) {
        let period = if self.hour < 12 { Period::Am } else { Period::Pm };
        let display = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        (period, display)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn from_naive(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    pub fn to_naive(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for ReservationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ReservationTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::TimeOfDay(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(err)?;
        let hour = h.trim().parse::<u8>().map_err(|_| err())?;
        let minute = m.trim().parse::<u8>().map_err(|_| err())?;
        Self::new(hour, minute).map_err(|_| err())
    }
}

/// Everything one page view knows about the visitor. Owned by the page
/// controller; components receive only the pieces they need.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub selected_size: LockerSize,
    pub selected_hours: RentalHours,
    pub selected_date: Option<NaiveDate>,
    pub selected_time: Option<ReservationTime>,
    pub user_location: Option<Coordinate>,
    pub is_fallback_location: bool,
    pub funnel: ReservationFunnel,
    pub session_id: String,
    pub page_loaded_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(page_loaded_at: DateTime<Utc>) -> Self {
        Self {
            selected_size: LockerSize::M,
            selected_hours: RentalHours::Four,
            selected_date: None,
            selected_time: None,
            user_location: None,
            is_fallback_location: false,
            funnel: ReservationFunnel::default(),
            session_id: generate_session_id(page_loaded_at),
            page_loaded_at,
        }
    }

    pub fn seconds_on_page(&self, now: DateTime<Utc>) -> i64 {
        (now - self.page_loaded_at).num_milliseconds().max(0) / 1000
    }
}

pub fn generate_session_id(now: DateTime<Utc>) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("sess_{}_{}", &random[..9], now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sizes_and_hours() {
        assert_eq!("L".parse::<LockerSize>(), Ok(LockerSize::L));
        assert!("XL".parse::<LockerSize>().is_err());
        assert_eq!("8".parse::<RentalHours>(), Ok(RentalHours::Eight));
        assert_eq!(RentalHours::try_from(4), Ok(RentalHours::Four));
        assert!(RentalHours::try_from(6).is_err());
        assert!("soon".parse::<RentalHours>().is_err());
    }

    #[test]
    fn test_twelve_hour_conversion() {
        let midnight = ReservationTime::from_12h(Period::Am, 12, 0).unwrap();
        assert_eq!(midnight.hour(), 0);
        let noon = ReservationTime::from_12h(Period::Pm, 12, 30).unwrap();
        assert_eq!(noon.hour(), 12);
        let evening = ReservationTime::from_12h(Period::Pm, 7, 5).unwrap();
        assert_eq!(evening.to_string(), "19:05");
        let morning = ReservationTime::from_12h(Period::Am, 9, 59).unwrap();
        assert_eq!(morning.hour(), 9);

        assert!(ReservationTime::from_12h(Period::Am, 0, 0).is_err());
        assert!(ReservationTime::from_12h(Period::Pm, 13, 0).is_err());
        assert!(ReservationTime::from_12h(Period::Pm, 1, 60).is_err());
    }

    #[test]
    fn test_to_12h_is_inverse() {
        for hour in 0..24u8 {
            let t = ReservationTime::new(hour, 15).unwrap();
            let (period, h12) = t.to_12h();
            assert_eq!(ReservationTime::from_12h(period, h12, 15).unwrap(), t);
        }
    }

    #[test]
    fn test_parse_time_string() {
        assert_eq!("09:07".parse::<ReservationTime>().unwrap(), ReservationTime::new(9, 7).unwrap());
        assert!("24:00".parse::<ReservationTime>().is_err());
        assert!("0907".parse::<ReservationTime>().is_err());
    }

    #[test]
    fn test_new_session_defaults() {
        let loaded = Utc::now();
        let session = SessionState::new(loaded);
        assert_eq!(session.selected_size, LockerSize::M);
        assert_eq!(session.selected_hours, RentalHours::Four);
        assert!(session.user_location.is_none());
        assert!(session.session_id.starts_with("sess_"));
        assert_eq!(session.funnel.clicks(), 0);
        assert_eq!(session.seconds_on_page(loaded + chrono::Duration::milliseconds(2500)), 2);
    }
}

use thiserror::Error;

/// Untyped values coming from the page (data attributes, picker columns)
/// that do not map onto one of the closed option sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown locker size: {0}")]
    LockerSize(String),
    #[error("unsupported rental duration: {0} hours")]
    RentalHours(String),
    #[error("invalid time of day: {0}")]
    TimeOfDay(String),
    #[error("unknown period: {0}")]
    Period(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("price for {size}/{hours}h must be positive")]
    NonPositivePrice { size: String, hours: u32 },
    #[error("discounted price for {size}/{hours}h exceeds the original price")]
    DiscountAboveOriginal { size: String, hours: u32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("routing service answered with status {0}")]
    Http(u16),
    #[error("routing request failed: {0}")]
    Transport(String),
    #[error("malformed routing response: {0}")]
    Malformed(String),
    #[error("routing service returned no routes")]
    NoRoutes,
    #[error("routing request timed out")]
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("geolocation is not supported")]
    NotSupported,
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("geolocation timed out")]
    Timeout,
}

impl GeoError {
    /// Numeric code as reported by the browser's PositionError, 0 when the
    /// API itself is missing.
    pub fn code(&self) -> u16 {
        match self {
            GeoError::NotSupported => 0,
            GeoError::PermissionDenied => 1,
            GeoError::PositionUnavailable => 2,
            GeoError::Timeout => 3,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeoError::PermissionDenied,
            3 => GeoError::Timeout,
            _ => GeoError::PositionUnavailable,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            GeoError::NotSupported => "not_supported",
            GeoError::PermissionDenied => "permission_denied",
            GeoError::PositionUnavailable => "position_unavailable",
            GeoError::Timeout => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_codes_map_to_geo_errors() {
        assert_eq!(GeoError::from_code(1), GeoError::PermissionDenied);
        assert_eq!(GeoError::from_code(3), GeoError::Timeout);
        assert_eq!(GeoError::from_code(2), GeoError::PositionUnavailable);
        assert_eq!(GeoError::from_code(42), GeoError::PositionUnavailable);
        assert_eq!(GeoError::Timeout.code(), 3);
        assert_eq!(GeoError::NotSupported.reason(), "not_supported");
    }

    #[test]
    fn config_errors_name_the_cell() {
        let err = ConfigError::DiscountAboveOriginal { size: "M".into(), hours: 8 };
        assert_eq!(err.to_string(), "discounted price for M/8h exceeds the original price");
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::error::ConfigError;
use crate::models::session::{LockerSize, RentalHours};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursRow {
    pub four: u32,
    pub eight: u32,
}

impl HoursRow {
    pub fn get(&self, hours: RentalHours) -> u32 {
        match hours {
            RentalHours::Four => self.four,
            RentalHours::Eight => self.eight,
        }
    }
}

/// One value per size and duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeTable {
    pub s: HoursRow,
    pub m: HoursRow,
    pub l: HoursRow,
}

impl SizeTable {
    pub fn row(&self, size: LockerSize) -> &HoursRow {
        match size {
            LockerSize::S => &self.s,
            LockerSize::M => &self.m,
            LockerSize::L => &self.l,
        }
    }

    pub fn get(&self, size: LockerSize, hours: RentalHours) -> u32 {
        self.row(size).get(hours)
    }
}

/// Won prices.
pub type PriceTable = SizeTable;
/// Remaining slots shown on the cards. Display only, never decremented.
pub type AvailabilityTable = SizeTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub original_price: u32,
    pub discounted_price: u32,
    pub is_discount_active: bool,
}

impl PriceQuote {
    /// What the visitor would pay.
    pub fn price(&self) -> u32 {
        if self.is_discount_active {
            self.discounted_price
        } else {
            self.original_price
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingEngine {
    original: PriceTable,
    discounted: PriceTable,
    discount_cutoff: NaiveDate,
    availability: AvailabilityTable,
}

impl PricingEngine {
    /// Rejects tables where a price is zero or a discount would cost more
    /// than the original.
    pub fn new(config: &PricingConfig) -> Result<Self, ConfigError> {
        for size in LockerSize::ALL {
            for hours in RentalHours::ALL {
                let original = config.original.get(size, hours);
                let discounted = config.discounted.get(size, hours);
                if original == 0 || discounted == 0 {
                    return Err(ConfigError::NonPositivePrice {
                        size: size.to_string(),
                        hours: hours.hours(),
                    });
                }
                if discounted > original {
                    return Err(ConfigError::DiscountAboveOriginal {
                        size: size.to_string(),
                        hours: hours.hours(),
                    });
                }
            }
        }

        Ok(Self {
            original: config.original,
            discounted: config.discounted,
            discount_cutoff: config.discount_cutoff,
            availability: config.availability,
        })
    }

    /// No date means today, and today is always inside the promotion.
    pub fn is_discount_active(&self, reservation_date: Option<NaiveDate>) -> bool {
        match reservation_date {
            Some(date) => date <= self.discount_cutoff,
            None => true,
        }
    }

    pub fn quote(&self, size: LockerSize, hours: RentalHours, reservation_date: Option<NaiveDate>) -> PriceQuote {
        PriceQuote {
            original_price: self.original.get(size, hours),
            discounted_price: self.discounted.get(size, hours),
            is_discount_active: self.is_discount_active(reservation_date),
        }
    }

    pub fn availability(&self, size: LockerSize, hours: RentalHours) -> u32 {
        self.availability.get(size, hours)
    }

    pub fn is_sold_out(&self, size: LockerSize, hours: RentalHours) -> bool {
        self.availability(size, hours) == 0
    }

    /// A size whose shortest option is gone cannot be booked at all. The
    /// caller decides how to show that; the engine never switches sizes.
    pub fn is_size_unavailable(&self, size: LockerSize) -> bool {
        self.is_sold_out(size, RentalHours::Four)
    }

    /// Sold-out durations fall back to 4 hours, never the other way.
    pub fn reconcile_selection(&self, size: LockerSize, hours: RentalHours) -> RentalHours {
        if self.is_sold_out(size, hours) {
            RentalHours::Four
        } else {
            hours
        }
    }

    pub fn discount_cutoff(&self) -> NaiveDate {
        self.discount_cutoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LandingConfig;

    fn engine() -> PricingEngine {
        PricingEngine::new(&LandingConfig::default().pricing).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_discount_never_exceeds_original() {
        let engine = engine();
        for size in LockerSize::ALL {
            for hours in RentalHours::ALL {
                for when in [None, Some(date(2026, 1, 1)), Some(date(2030, 1, 1))] {
                    let quote = engine.quote(size, hours, when);
                    assert!(quote.discounted_price > 0);
                    assert!(quote.original_price > 0);
                    assert!(quote.discounted_price <= quote.original_price);
                }
            }
        }
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let engine = engine();
        let cutoff = engine.discount_cutoff();
        assert!(engine.is_discount_active(Some(cutoff)));
        assert!(engine.is_discount_active(cutoff.pred_opt()));
        assert!(!engine.is_discount_active(cutoff.succ_opt()));
        assert!(engine.is_discount_active(None));
    }

    #[test]
    fn test_large_eight_hours_after_cutoff_pays_original() {
        let engine = engine();
        let after = engine.discount_cutoff().succ_opt();
        let quote = engine.quote(LockerSize::L, RentalHours::Eight, after);
        assert!(!quote.is_discount_active);
        assert_eq!(quote.price(), 8000);
        assert_eq!(quote.price(), quote.original_price);
    }

    #[test]
    fn test_discounted_price_inside_promotion() {
        let engine = engine();
        let quote = engine.quote(LockerSize::S, RentalHours::Four, Some(date(2026, 10, 19)));
        assert!(quote.is_discount_active);
        assert_eq!(quote.price(), 3000);
    }

    #[test]
    fn test_sold_out_eight_hours_falls_back_to_four() {
        let engine = engine();
        assert_eq!(engine.availability(LockerSize::L, RentalHours::Eight), 0);
        assert_eq!(engine.reconcile_selection(LockerSize::L, RentalHours::Eight), RentalHours::Four);
        assert_eq!(engine.reconcile_selection(LockerSize::M, RentalHours::Eight), RentalHours::Eight);
    }

    #[test]
    fn test_available_four_hours_is_kept() {
        let engine = engine();
        for size in LockerSize::ALL {
            if engine.availability(size, RentalHours::Four) > 0 {
                assert_eq!(engine.reconcile_selection(size, RentalHours::Four), RentalHours::Four);
                assert!(!engine.is_size_unavailable(size));
            }
        }
    }

    #[test]
    fn test_size_without_four_hour_slots_is_unavailable() {
        let mut config = LandingConfig::default().pricing;
        config.availability.s = HoursRow { four: 0, eight: 0 };
        let engine = PricingEngine::new(&config).unwrap();
        assert!(engine.is_size_unavailable(LockerSize::S));
        // the engine still answers with the 4-hour option
        assert_eq!(engine.reconcile_selection(LockerSize::S, RentalHours::Eight), RentalHours::Four);
    }

    #[test]
    fn test_bad_tables_are_rejected() {
        let mut config = LandingConfig::default().pricing;
        config.discounted.m.eight = config.original.m.eight + 1;
        assert_eq!(
            PricingEngine::new(&config),
            Err(ConfigError::DiscountAboveOriginal { size: "M".to_string(), hours: 8 })
        );

        let mut config = LandingConfig::default().pricing;
        config.original.l.four = 0;
        assert!(matches!(PricingEngine::new(&config), Err(ConfigError::NonPositivePrice { .. })));
    }
}

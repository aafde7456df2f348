//! Loyalty discount cycle.
//!
//! Every confirmed trip adds one percent of discount, up to
//! [`CYCLE_LENGTH`] percent. Trip 21 starts the next cycle at 1% again.

use serde::Serialize;

/// Number of confirmed trips in one loyalty cycle; also the maximum discount
/// in percent.
pub const CYCLE_LENGTH: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoyaltyStatus {
    pub total_trips: u64,
    pub current_discount: u32,
    pub progress_percentage: f64,
    pub trips_to_next_reward: u32,
}

impl LoyaltyStatus {
    /// Computes the cycle position for a lifetime count of confirmed trips.
    ///
    /// Negative counts are clamped to zero.
    pub fn from_trip_count(total_trips: i64) -> Self {
        let total_trips = u64::try_from(total_trips).unwrap_or(0);
        let current_discount = current_discount(total_trips);
        Self {
            total_trips,
            current_discount,
            progress_percentage: f64::from(current_discount) / f64::from(CYCLE_LENGTH) * 100.0,
            trips_to_next_reward: CYCLE_LENGTH - current_discount,
        }
    }

    pub fn is_cycle_complete(&self) -> bool {
        self.current_discount == CYCLE_LENGTH
    }
}

impl Default for LoyaltyStatus {
    fn default() -> Self {
        Self::from_trip_count(0)
    }
}

/// `0` for no trips, otherwise `((total - 1) mod 20) + 1`.
pub fn current_discount(total_trips: u64) -> u32 {
    if total_trips == 0 {
        return 0;
    }
    let position = (total_trips - 1) % u64::from(CYCLE_LENGTH);
    // position < CYCLE_LENGTH, so it always fits
    u32::try_from(position).unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_trips_means_no_discount() {
        let status = LoyaltyStatus::from_trip_count(0);
        assert_eq!(status.current_discount, 0);
        assert_eq!(status.progress_percentage, 0.0);
        assert_eq!(status.trips_to_next_reward, 20);
        assert!(!status.is_cycle_complete());
    }

    #[test]
    fn cycle_peaks_at_twenty_and_resets() {
        assert_eq!(LoyaltyStatus::from_trip_count(1).current_discount, 1);

        let full = LoyaltyStatus::from_trip_count(20);
        assert_eq!(full.current_discount, 20);
        assert_eq!(full.trips_to_next_reward, 0);
        assert_eq!(full.progress_percentage, 100.0);
        assert!(full.is_cycle_complete());

        assert_eq!(LoyaltyStatus::from_trip_count(21).current_discount, 1);
        assert_eq!(LoyaltyStatus::from_trip_count(40).current_discount, 20);
        assert_eq!(LoyaltyStatus::from_trip_count(45).current_discount, 5);
    }

    #[test]
    fn discount_stays_in_range_and_matches_formula() {
        for trips in 1..=500u64 {
            let discount = current_discount(trips);
            assert!((1..=20).contains(&discount), "trips={trips}");
            assert_eq!(u64::from(discount), ((trips - 1) % 20) + 1);
        }
    }

    #[test]
    fn negative_counts_are_treated_as_zero() {
        assert_eq!(
            LoyaltyStatus::from_trip_count(-3),
            LoyaltyStatus::from_trip_count(0)
        );
    }

    #[test]
    fn progress_tracks_discount() {
        let status = LoyaltyStatus::from_trip_count(45);
        assert_eq!(status.progress_percentage, 25.0);
        assert_eq!(status.trips_to_next_reward, 15);
        assert_eq!(status, LoyaltyStatus::from_trip_count(45));
    }
}

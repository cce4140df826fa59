/// Fraction of the total collected at booking time and refunded on
/// cancellation.
pub const ADVANCE_RATE: f64 = 0.20;

/// Total price is always recomputed server-side from the catalog price,
/// never taken from client input.
pub fn total_price(tour_price: f64, number_of_tourists: i32) -> f64 {
    tour_price * f64::from(number_of_tourists)
}

pub fn advance_amount(total_price: f64) -> f64 {
    total_price * ADVANCE_RATE
}

/// Convert a rupee amount to paise for the gateway, rounded to the nearest
/// integer minor unit.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_price_times_tourists() {
        // 3-day tour for guide G: price 100, 2 tourists.
        let total = total_price(100.0, 2);
        assert_eq!(total, 200.0);
        assert_eq!(advance_amount(total), 40.0);
    }

    #[test]
    fn advance_is_twenty_percent() {
        assert_eq!(advance_amount(1000.0), 200.0);
        assert_eq!(advance_amount(0.0), 0.0);
    }

    #[test]
    fn minor_units_round_to_nearest() {
        assert_eq!(to_minor_units(40.0), 4000);
        assert_eq!(to_minor_units(99.99), 9999);
        assert_eq!(to_minor_units(0.125), 13);
    }
}

use chrono::NaiveDate;

/// Expand a start/end pair into the inclusive sequence of calendar days.
///
/// Deterministic: reserve and release both expand the same (start, end)
/// pair, so a release removes exactly the days a reserve added. Callers
/// validate start <= end; a reversed pair yields an empty sequence.
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;

    while current <= end {
        dates.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }

    dates
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn expands_inclusive_range() {
        let days = dates_in_range(date(2024, 6, 1), date(2024, 6, 3));
        assert_eq!(days, vec![date(2024, 6, 1), date(2024, 6, 2), date(2024, 6, 3)]);
    }

    #[test]
    fn single_day_range_is_one_day() {
        assert_eq!(
            dates_in_range(date(2024, 6, 1), date(2024, 6, 1)),
            vec![date(2024, 6, 1)]
        );
    }

    #[test]
    fn crosses_month_boundary() {
        let days = dates_in_range(date(2024, 1, 30), date(2024, 2, 2));
        assert_eq!(days.len(), 4);
        assert_eq!(days.first(), Some(&date(2024, 1, 30)));
        assert_eq!(days.last(), Some(&date(2024, 2, 2)));
    }

    #[test]
    fn reversed_range_is_empty() {
        assert!(dates_in_range(date(2024, 6, 3), date(2024, 6, 1)).is_empty());
    }

    #[test]
    fn reserve_then_release_restores_prior_set() {
        // The ledger round-trip law: removing the expansion of (start, end)
        // undoes adding it, leaving unrelated reservations untouched.
        let mut reserved: BTreeSet<NaiveDate> =
            [date(2024, 5, 20), date(2024, 7, 1)].into_iter().collect();
        let before = reserved.clone();

        for d in dates_in_range(date(2024, 6, 1), date(2024, 6, 3)) {
            reserved.insert(d);
        }
        assert_eq!(reserved.len(), 5);

        for d in dates_in_range(date(2024, 6, 1), date(2024, 6, 3)) {
            reserved.remove(&d);
        }
        assert_eq!(reserved, before);
    }

    #[test]
    fn overlapping_ranges_share_days() {
        let first: BTreeSet<NaiveDate> =
            dates_in_range(date(2024, 6, 1), date(2024, 6, 3)).into_iter().collect();
        let second = dates_in_range(date(2024, 6, 2), date(2024, 6, 4));

        assert!(second.iter().any(|d| first.contains(d)));
    }
}

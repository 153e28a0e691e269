//! ValueSeries 정렬/교집합 속성 테스트.

use chrono::{Duration, NaiveDate};
use folio_core::{DateRange, ValueSeries};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn series_from_offsets(offsets: &[u16]) -> ValueSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut days: Vec<u16> = offsets.to_vec();
    days.sort_unstable();
    days.dedup();

    ValueSeries::from_pairs(
        days.iter()
            .map(|d| (base + Duration::days(i64::from(*d)), Decimal::from(100 + u32::from(*d)))),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn intersect_yields_identical_date_sets(
        a in prop::collection::vec(0u16..200, 0..60),
        b in prop::collection::vec(0u16..200, 0..60),
    ) {
        let left = series_from_offsets(&a);
        let right = series_from_offsets(&b);

        let (l, r) = left.intersect(&right);
        prop_assert_eq!(l.dates(), r.dates());
        for date in l.dates() {
            prop_assert!(left.dates().contains(&date));
            prop_assert!(right.dates().contains(&date));
        }
    }

    #[test]
    fn full_range_slice_is_identity(a in prop::collection::vec(0u16..365, 1..80)) {
        let series = series_from_offsets(&a);
        let range = series.range().unwrap();
        prop_assert_eq!(series.slice(&range), series.clone());

        let empty = series.slice(&DateRange::new(
            range.end + Duration::days(1),
            range.end + Duration::days(10),
        ));
        prop_assert!(empty.is_empty());
    }
}

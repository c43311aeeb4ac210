use selfcert::cert::params::Validity;
use selfcert::validity::{PeriodUnit, ValidityPeriod};
use time::macros::{datetime, time};
use time::{Date, Duration, Month, OffsetDateTime};

fn month_index(t: OffsetDateTime) -> i64 {
    i64::from(t.year()) * 12 + i64::from(u8::from(t.month())) - 1
}

/// First day of every month across a leap cycle plus the last day of each.
fn sample_starts() -> Vec<OffsetDateTime> {
    let mut starts = Vec::new();
    for year in 2023..=2028 {
        let mut month = Month::January;
        for _ in 0..12 {
            let last = month.length(year);
            for day in [1, 15, 28, last] {
                let date = Date::from_calendar_date(year, month, day).unwrap();
                starts.push(date.with_time(time!(13:37:42)).assume_utc());
            }
            month = month.next();
        }
    }
    starts
}

#[test]
fn day_periods_add_exact_seconds() {
    for start in sample_starts() {
        for n in 1..=10 {
            let period = ValidityPeriod { unit: PeriodUnit::Day, magnitude: n };
            let expiry = period.expiry_from(start).unwrap();
            assert_eq!(expiry - start, Duration::seconds(i64::from(n) * 86_400));
        }
    }
}

#[test]
fn month_and_year_periods_follow_the_calendar() {
    for start in sample_starts() {
        for n in 1..=10u32 {
            for (unit, months) in [
                (PeriodUnit::Month, i64::from(n)),
                (PeriodUnit::Year, i64::from(n) * 12),
            ] {
                let expiry = ValidityPeriod { unit, magnitude: n }
                    .expiry_from(start)
                    .unwrap();

                assert!(expiry > start);
                assert_eq!(expiry.time(), start.time());
                assert_eq!(month_index(expiry) - month_index(start), months);

                let last = expiry.month().length(expiry.year());
                assert_eq!(expiry.day(), start.day().min(last), "{start} + {n}{unit:?}");
            }
        }
    }
}

#[test]
fn leap_day_plus_years_lands_on_feb_29_only_in_leap_years() {
    let start = datetime!(2024-02-29 08:00 UTC);
    for n in 1..=10 {
        let expiry = ValidityPeriod { unit: PeriodUnit::Year, magnitude: n }
            .expiry_from(start)
            .unwrap();
        assert_eq!(expiry.month(), Month::February);
        let expected_day = if time::util::is_leap_year(expiry.year()) { 29 } else { 28 };
        assert_eq!(expiry.day(), expected_day, "2024-02-29 + {n}Y");
    }
}

#[test]
fn end_of_month_clamps() {
    let cases = [
        (datetime!(2025-01-31 00:00 UTC), "1M", datetime!(2025-02-28 00:00 UTC)),
        (datetime!(2024-01-31 00:00 UTC), "1M", datetime!(2024-02-29 00:00 UTC)),
        (datetime!(2025-03-31 12:00 UTC), "1m", datetime!(2025-04-30 12:00 UTC)),
        (datetime!(2025-08-31 23:59:59 UTC), "6M", datetime!(2026-02-28 23:59:59 UTC)),
        (datetime!(2025-12-31 00:00 UTC), "2M", datetime!(2026-02-28 00:00 UTC)),
        (datetime!(2025-12-31 00:00 UTC), "10d", datetime!(2026-01-10 00:00 UTC)),
    ];
    for (start, expr, expected) in cases {
        let period: ValidityPeriod = expr.parse().unwrap();
        assert_eq!(period.expiry_from(start).unwrap(), expected, "{start} + {expr}");
    }
}

#[test]
fn validity_window_spans_the_period() {
    let start = datetime!(2024-02-29 10:11:12.987 UTC);
    let validity = Validity::starting_at(start, &"1Y".parse().unwrap()).unwrap();
    assert_eq!(validity.not_before, datetime!(2024-02-29 10:11:12 UTC));
    assert_eq!(validity.not_after, datetime!(2025-02-28 10:11:12 UTC));
}

#[test]
fn expiry_beyond_2049_still_round_trips_through_the_certificate() {
    use selfcert::cert::Certificate;
    use selfcert::cert::params::CertificateTemplate;
    use selfcert::key::KeyPair;

    let key = KeyPair::generate_rsa(1024).unwrap();
    let validity =
        Validity::starting_at(datetime!(2045-06-15 00:00 UTC), &"10Y".parse().unwrap()).unwrap();
    let template = CertificateTemplate::builder()
        .serial_number(7)
        .subject(Default::default())
        .validity(validity)
        .dns_names(vec!["far.example.test".into()])
        .build();

    let cert = Certificate::new_self_signed(&template, &key).unwrap();
    let parsed = Certificate::from_pem(&cert.to_pem().unwrap()).unwrap();
    assert_eq!(parsed.summary().unwrap().validity, validity);
}

mod properties {
    use proptest::prelude::*;

    use super::*;

    prop_compose! {
        /// Any second from 1970 up to the start of 2040.
        fn arb_start()(secs in 0i64..2_208_988_800) -> OffsetDateTime {
            OffsetDateTime::from_unix_timestamp(secs).unwrap()
        }
    }

    fn arb_unit() -> impl Strategy<Value = PeriodUnit> {
        prop_oneof![
            Just(PeriodUnit::Day),
            Just(PeriodUnit::Month),
            Just(PeriodUnit::Year),
        ]
    }

    proptest! {
        #[test]
        fn test_expiry_follows_calendar(
            start in arb_start(),
            unit in arb_unit(),
            magnitude in 1u32..=10,
        ) {
            let expiry = ValidityPeriod { unit, magnitude }.expiry_from(start).unwrap();

            prop_assert!(expiry > start);
            prop_assert_eq!(expiry.time(), start.time());

            match unit {
                PeriodUnit::Day => {
                    prop_assert_eq!(expiry - start, Duration::days(i64::from(magnitude)));
                }
                PeriodUnit::Month | PeriodUnit::Year => {
                    let months = if unit == PeriodUnit::Year { 12 } else { 1 };
                    prop_assert_eq!(
                        month_index(expiry) - month_index(start),
                        i64::from(magnitude) * months
                    );
                    let last = expiry.month().length(expiry.year());
                    prop_assert_eq!(expiry.day(), start.day().min(last));
                }
            }
        }
    }
}

//! Utilidades de fechas
//!
//! Las fechas del dominio son días de calendario (`YYYY-MM-DD`). Al
//! compararlas con el instante actual se toman como medianoche UTC.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Medianoche UTC del día dado
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// `ceil((target - now) / 1 día)` con aritmética entera en milisegundos
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff = (target - now).num_milliseconds();
    let days = diff.div_euclid(MILLIS_PER_DAY);
    if diff.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_start_of_day_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(start_of_day(date).to_rfc3339(), "2024-03-15T00:00:00+00:00");
    }

    #[test]
    fn test_days_until_rounds_up() {
        assert_eq!(days_until(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_until(now() + Duration::days(1), now()), 1);
        assert_eq!(days_until(now() + Duration::days(1) + Duration::milliseconds(1), now()), 2);
    }

    #[test]
    fn test_days_until_past_dates() {
        assert_eq!(days_until(now(), now()), 0);
        assert_eq!(days_until(now() - Duration::hours(1), now()), 0);
        assert_eq!(days_until(now() - Duration::hours(25), now()), -1);
        assert_eq!(days_until(now() - Duration::days(3), now()), -3);
    }

    #[test]
    fn test_days_until_matches_float_ceil() {
        let offsets_ms = [-200_000_000i64, -86_400_001, -1, 0, 1, 43_200_000, 86_400_000, 2_591_999_999, 2_592_000_001];
        for offset in offsets_ms {
            let target = now() + Duration::milliseconds(offset);
            let expected = (offset as f64 / MILLIS_PER_DAY as f64).ceil() as i64;
            assert_eq!(days_until(target, now()), expected, "offset {}", offset);
        }
    }
}

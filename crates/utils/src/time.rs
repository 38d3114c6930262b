use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

const KST_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// Korea Standard Time. Fixed UTC+9, no daylight saving.
pub fn kst_offset() -> FixedOffset {
    FixedOffset::east_opt(KST_UTC_OFFSET_SECS).expect("UTC+9 is within the valid offset range")
}

/// The service day for a given instant, i.e. the calendar date in KST.
pub fn service_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&kst_offset()).date_naive()
}

/// Today's service day.
pub fn today_kst() -> NaiveDate {
    service_date(Utc::now())
}

/// 1-based day of year, used to walk annual reading plans.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn service_date_tracks_kst_not_utc() {
        // 14:59 UTC is still the same day in Seoul, 15:00 UTC is the next one.
        let before = Utc.with_ymd_and_hms(2024, 6, 1, 14, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap();

        assert_eq!(
            service_date(before),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(
            service_date(after),
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );
    }

    #[test]
    fn day_of_year_handles_leap_years() {
        let leap = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let common = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(day_of_year(leap), 366);
        assert_eq!(day_of_year(common), 365);
    }
}

//! 时间工具函数: 业务时区转换
//!
//! Slot dates and wall-clock times travel as strings (`YYYY-MM-DD`,
//! `HH:MM`); "today" is computed in the configured store timezone so the
//! booking cutoff follows the shop, not the server clock.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult, ErrorCode};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {time}")))
}

/// Whether `end` is strictly after `start`, both `HH:MM`
pub fn is_end_after_start(start: &str, end: &str) -> AppResult<bool> {
    Ok(parse_time(end)? > parse_time(start)?)
}

/// 解析 IANA 时区名
pub fn parse_zone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidTimezone,
            format!("Unknown timezone '{name}'"),
        )
    })
}

/// 指定时刻在业务时区的日期, formatted `YYYY-MM-DD`
pub fn date_in_zone(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

/// 毫秒时间戳在业务时区的日期, formatted `YYYY-MM-DD`
pub fn format_date_in_zone(ms: i64, tz: Tz) -> AppResult<String> {
    let at = DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| AppError::validation(format!("Timestamp out of range: {ms}")))?;
    Ok(date_in_zone(at, tz))
}

/// 当前日期 (业务时区), formatted `YYYY-MM-DD`
pub fn today_in_zone(tz: Tz) -> String {
    date_in_zone(Utc::now(), tz)
}

/// `HH:MM` 转 12 小时制显示文案, 如 `9:00 AM`
pub fn format_time_12h(hhmm: &str) -> AppResult<String> {
    let t = parse_time(hhmm)?;
    Ok(t.format("%-I:%M %p").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_date("01/06/2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("9:30am").is_err());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_is_end_after_start() {
        assert!(is_end_after_start("09:00", "11:00").unwrap());
        assert!(!is_end_after_start("11:00", "09:00").unwrap());
        assert!(!is_end_after_start("09:00", "09:00").unwrap());
    }

    #[test]
    fn test_parse_zone() {
        assert!(parse_zone("Australia/Adelaide").is_ok());
        assert!(parse_zone("UTC").is_ok());
        assert!(parse_zone("Mars/Olympus").is_err());
    }

    #[test]
    fn test_today_in_zone_format() {
        let today = today_in_zone(chrono_tz::UTC);
        assert_eq!(today.len(), 10);
        assert!(parse_date(&today).is_ok());
    }

    #[test]
    fn test_date_in_zone_crosses_utc_midnight() {
        use chrono::TimeZone;

        // 18:30 UTC 在阿德莱德 (+09:30) 已是次日凌晨
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 18, 30, 0).unwrap();
        let adelaide: Tz = "Australia/Adelaide".parse().unwrap();
        let local = date_in_zone(at, adelaide);
        assert_eq!(local, "2025-06-02");
        assert_eq!(
            parse_date(&local).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
        assert_eq!(date_in_zone(at, chrono_tz::UTC), "2025-06-01");
    }

    #[test]
    fn test_format_date_in_zone_from_millis() {
        // 2025-06-01T18:30:00Z
        let ms = 1_748_802_600_000_i64;
        let adelaide: Tz = "Australia/Adelaide".parse().unwrap();
        assert_eq!(format_date_in_zone(ms, chrono_tz::UTC).unwrap(), "2025-06-01");
        assert_eq!(format_date_in_zone(ms, adelaide).unwrap(), "2025-06-02");
        // Idempotent for equal inputs
        assert_eq!(
            format_date_in_zone(ms, adelaide).unwrap(),
            format_date_in_zone(ms, adelaide).unwrap()
        );
    }

    #[test]
    fn test_format_time_12h() {
        assert_eq!(format_time_12h("00:15").unwrap(), "12:15 AM");
        assert_eq!(format_time_12h("09:00").unwrap(), "9:00 AM");
        assert_eq!(format_time_12h("12:00").unwrap(), "12:00 PM");
        assert_eq!(format_time_12h("13:30").unwrap(), "1:30 PM");
        assert_eq!(format_time_12h("23:59").unwrap(), "11:59 PM");
        assert!(format_time_12h("24:00").is_err());
    }
}

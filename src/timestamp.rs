//! The `YYYY-MM-DD HH:MM:SS` timestamp format that show start times use in forms, page data, and
//! the `datetime` template filter.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rocket_dyn_templates::tera::{self, Tera, Value};
use serde::Serializer;

pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats produced by `<input type="datetime-local">`, accepted in addition to `FORMAT`.
const DATETIME_LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

const MEDIUM_DISPLAY_FORMAT: &str = "%a %m/%d/%Y %-I:%M%p";
const FULL_DISPLAY_FORMAT: &str = "%A %B %-d, %Y at %-I:%M%p";

pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let raw = raw.trim();
    DATETIME_LOCAL_FORMATS.iter().fold(
        NaiveDateTime::parse_from_str(raw, FORMAT),
        |res, fmt| res.or_else(|_| NaiveDateTime::parse_from_str(raw, fmt)),
    )
}

pub fn format(timestamp: &NaiveDateTime) -> String {
    timestamp.format(FORMAT).to_string()
}

/// `serialize_with` target so that page data carries start times in `FORMAT` rather than chrono's
/// default ISO 8601 representation.
pub fn serialize<S: Serializer>(
    timestamp: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(timestamp))
}

/// Tera filter rendering a `FORMAT` timestamp for humans.  `{{ t | datetime }}` gives the medium
/// form and `{{ t | datetime(format="full") }}` the long one.
pub fn datetime_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("`datetime` filter expects a timestamp string"))?;
    let parsed = parse(raw)
        .map_err(|err| tera::Error::msg(format!("Invalid timestamp {:?}: {}", raw, err)))?;

    let display_format = match args.get("format").and_then(Value::as_str) {
        Some("full") => FULL_DISPLAY_FORMAT,
        _ => MEDIUM_DISPLAY_FORMAT,
    };
    Ok(Value::String(parsed.format(display_format).to_string()))
}

pub fn register_filters(tera: &mut Tera) {
    tera.register_filter("datetime", datetime_filter);
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn may_21_2019() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 5, 21)
            .and_then(|date| date.and_hms_opt(21, 30, 0))
            .expect("valid date")
    }

    #[test]
    fn parses_wire_format_and_datetime_local() {
        assert_eq!(parse("2019-05-21 21:30:00").unwrap(), may_21_2019());
        assert_eq!(parse("2019-05-21T21:30:00").unwrap(), may_21_2019());
        assert_eq!(parse("2019-05-21T21:30").unwrap(), may_21_2019());
        assert_eq!(parse("  2019-05-21 21:30:00 ").unwrap(), may_21_2019());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("").is_err());
        assert!(parse("yesterday").is_err());
        assert!(parse("2019-13-01 00:00:00").is_err());
        assert!(parse("2019-05-21").is_err());
    }

    #[test]
    fn format_matches_parse() {
        let formatted = format(&may_21_2019());
        assert_eq!(formatted, "2019-05-21 21:30:00");
        assert_eq!(parse(&formatted).unwrap(), may_21_2019());
    }

    #[test]
    fn datetime_filter_formats() {
        let value = Value::String("2019-05-21 21:30:00".into());

        let medium = datetime_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(medium, Value::String("Tue 05/21/2019 9:30PM".into()));

        let mut args = HashMap::new();
        args.insert("format".to_string(), Value::String("full".into()));
        let full = datetime_filter(&value, &args).unwrap();
        assert_eq!(full, Value::String("Tuesday May 21, 2019 at 9:30PM".into()));
    }

    #[test]
    fn datetime_filter_rejects_non_timestamps() {
        assert!(datetime_filter(&Value::Bool(true), &HashMap::new()).is_err());
        assert!(datetime_filter(&Value::String("soon".into()), &HashMap::new()).is_err());
    }
}

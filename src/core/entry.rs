use super::decimal::PrecisionDecimal;
use super::error::{LedgerError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Rendering style for [`Entry::to_string_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Single line, string values quoted: `Kind(field=..., field=...)`
    #[default]
    Repr,
    /// One field per line, nested entries indented one level deeper
    Display,
}

/// Anything that appears in a ledger for one asset.
pub trait Entry {
    /// Stable identifier, unique within the entry's asset.
    fn id(&self) -> String;

    fn timestamp(&self) -> DateTime<FixedOffset>;

    fn asset(&self) -> &str;

    /// How much crypto was gained or lost with this entry
    fn crypto_balance_change(&self) -> PrecisionDecimal;

    /// How much fiat was gained or lost with this entry
    fn usd_balance_change(&self) -> PrecisionDecimal;

    /// Deterministic textual form. Referenced entries render at `indent + 1`;
    /// `extra_data` is appended after the entry's own fields.
    fn to_string_with(&self, indent: usize, style: Style, extra_data: &[String]) -> String;
}

/// Assemble the textual form of an entry from pre-rendered `field=value` strings.
pub(crate) fn render(kind: &str, indent: usize, style: Style, fields: &[String]) -> String {
    let padding = "  ".repeat(indent);
    match style {
        Style::Repr => format!("{padding}{kind}({})", fields.join(", ")),
        Style::Display => {
            let mut output = format!("{padding}{kind}:");
            for field in fields {
                output.push('\n');
                output.push_str(&padding);
                output.push_str("  ");
                output.push_str(field);
            }
            output
        }
    }
}

/// String value as it appears in a rendered field.
pub(crate) fn stringify(style: Style, value: &str) -> String {
    match style {
        Style::Repr => format!("{value:?}"),
        Style::Display => value.to_string(),
    }
}

pub(crate) fn format_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S%.6f %:z").to_string()
}

/// Parse a timestamp parameter. Timestamps carry an explicit offset; a bare
/// date is taken as midnight UTC.
pub fn parse_timestamp(name: &str, value: &str) -> Result<DateTime<FixedOffset>> {
    let s = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    for format in [
        "%Y-%m-%d %H:%M:%S%.f %:z",
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%m/%d/%Y %H:%M:%S%.f %:z",
    ] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().fixed_offset());
        }
    }
    if NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok() {
        return Err(LedgerError::Value(format!(
            "Parameter '{name}' has no timezone information: {value:?}"
        )));
    }
    Err(LedgerError::Value(format!(
        "Parameter '{name}' has invalid timestamp value: {value:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parses_supported_formats() {
        let rfc = parse_timestamp("timestamp", "2021-01-02T08:42:43.882Z").unwrap();
        assert_eq!(
            rfc,
            Utc.with_ymd_and_hms(2021, 1, 2, 8, 42, 43).unwrap() + chrono::Duration::milliseconds(882)
        );

        let us = parse_timestamp("timestamp", "6/1/2020 3:59:59 -04:00").unwrap();
        assert_eq!(us, Utc.with_ymd_and_hms(2020, 6, 1, 7, 59, 59).unwrap());

        let spaced = parse_timestamp("timestamp", "2020-06-01 03:59:59 -04:00").unwrap();
        assert_eq!(spaced, us);

        let date = parse_timestamp("timestamp", "2020-01-01").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_naive_and_garbage() {
        let err = parse_timestamp("timestamp", "2020-06-01 03:59:59").unwrap_err();
        assert_eq!(
            err,
            LedgerError::Value(
                "Parameter 'timestamp' has no timezone information: \"2020-06-01 03:59:59\"".to_string()
            )
        );
        assert!(parse_timestamp("timestamp", "yesterday").unwrap_err().is_value_error());
    }

    #[test]
    fn render_styles() {
        let fields = vec!["id=\"1\"".to_string(), "asset=\"B1\"".to_string()];
        assert_eq!(render("Thing", 0, Style::Repr, &fields), "Thing(id=\"1\", asset=\"B1\")");
        assert_eq!(render("Thing", 1, Style::Repr, &fields), "  Thing(id=\"1\", asset=\"B1\")");
        assert_eq!(
            render("Thing", 1, Style::Display, &fields),
            "  Thing:\n    id=\"1\"\n    asset=\"B1\""
        );
    }

    #[test]
    fn stringify_quotes_only_in_repr() {
        assert_eq!(stringify(Style::Repr, "B1"), "\"B1\"");
        assert_eq!(stringify(Style::Display, "B1"), "B1");
    }
}

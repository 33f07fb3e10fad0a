// 🎓 Offer Record - one placement event linking a student, a company and a package
//
// Both loaders (CSV and SQL) produce a RawOffer first and convert it here, so
// date parsing and the derived offer_year are computed in exactly one place.

use crate::error::{DashboardError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Offer record as consumed by the aggregators. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferRecord {
    pub placement_id: Option<i64>,
    pub student_id: i64,
    pub roll_no: String,
    pub student_name: String,
    pub branch: String,
    pub cgpa: Option<f64>,
    pub batch_year: Option<i32>,
    pub company_name: String,
    /// Package in LPA
    pub package_lpa: Option<f64>,
    pub role: Option<String>,
    pub offer_date: Option<NaiveDate>,
    /// Derived once at load time from offer_date
    pub offer_year: Option<i32>,
}

/// In-memory table of offer records
pub type OfferTable = Vec<OfferRecord>;

/// Row exactly as it arrives from a source, before date parsing.
/// Column names match the CSV header and the SQL aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOffer {
    #[serde(default)]
    pub placement_id: Option<i64>,
    pub student_id: i64,
    pub roll_no: String,
    pub student_name: String,
    pub branch: String,
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub batch_year: Option<i32>,
    pub company_name: String,
    #[serde(default)]
    pub package_lpa: Option<f64>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub offer_date: Option<String>,
}

impl RawOffer {
    /// Convert into an OfferRecord. `row` is the 1-based data row, used in errors.
    pub fn into_record(self, row: usize) -> Result<OfferRecord> {
        let offer_date = match self.offer_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(parse_offer_date(text).ok_or_else(|| {
                DashboardError::InvalidDate {
                    row,
                    value: text.to_string(),
                }
            })?),
        };

        Ok(OfferRecord {
            placement_id: self.placement_id,
            student_id: self.student_id,
            roll_no: self.roll_no,
            student_name: self.student_name,
            branch: self.branch,
            cgpa: self.cgpa,
            batch_year: self.batch_year,
            company_name: self.company_name,
            package_lpa: self.package_lpa,
            role: self.role.filter(|r| !r.is_empty()),
            offer_date,
            offer_year: offer_date.map(|d| d.year()),
        })
    }
}

// Date-only layouts, ISO first. Month-first before day-first for slashes/dashes.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

// Two-digit years, tried only after every four-digit layout has failed.
// `%y` maps 00-68 to 20xx and 69-99 to 19xx.
const SHORT_YEAR_FORMATS: &[&str] = &["%m/%d/%y", "%d/%m/%y", "%m-%d-%y", "%d-%m-%y", "%y-%m-%d", "%y/%m/%d"];

// chrono's `%Y` takes any digit count, so "24" would read as year 24
fn has_full_year(date: &NaiveDate) -> bool {
    (1000..=9999).contains(&date.year())
}

/// Parse an offer date string into a calendar date.
///
/// Accepts plain dates, naive datetimes (time is dropped) and RFC 3339 timestamps.
/// Four-digit years win; two-digit years are read as 19xx/20xx.
pub fn parse_offer_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    let full_year = DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .chain(
            DATETIME_FORMATS
                .iter()
                .filter_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date()),
        )
        .find(has_full_year);
    if full_year.is_some() {
        return full_year;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    SHORT_YEAR_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: Option<&str>) -> RawOffer {
        RawOffer {
            placement_id: None,
            student_id: 7,
            roll_no: "CS-007".to_string(),
            student_name: "Asha".to_string(),
            branch: "CS".to_string(),
            cgpa: Some(8.4),
            batch_year: Some(2025),
            company_name: "Acme".to_string(),
            package_lpa: Some(12.5),
            role: Some("SDE".to_string()),
            offer_date: date.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_offer_date("2025-03-14"),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );
    }

    #[test]
    fn test_parse_other_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 11, 2);
        assert_eq!(parse_offer_date("2024/11/02"), expected);
        assert_eq!(parse_offer_date("11/02/2024"), expected);
        assert_eq!(parse_offer_date("2024-11-02 10:30:00"), expected);
        assert_eq!(parse_offer_date("2024-11-02T10:30:00+05:30"), expected);
        // Day-first is only chosen when month-first is impossible
        assert_eq!(
            parse_offer_date("25/12/2024"),
            NaiveDate::from_ymd_opt(2024, 12, 25)
        );
    }

    #[test]
    fn test_parse_two_digit_years() {
        assert_eq!(
            parse_offer_date("12/31/24"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert_eq!(
            parse_offer_date("10-12-25"),
            NaiveDate::from_ymd_opt(2025, 10, 12)
        );
        assert_eq!(
            parse_offer_date("25/12/24"),
            NaiveDate::from_ymd_opt(2024, 12, 25)
        );
        assert_eq!(parse_offer_date("12/31/24").map(|d| d.year()), Some(2024));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_offer_date("next tuesday"), None);
        assert_eq!(parse_offer_date("2025-13-40"), None);
    }

    #[test]
    fn test_into_record_derives_year() {
        let record = raw(Some("2025-06-01")).into_record(1).unwrap();
        assert_eq!(record.offer_year, Some(2025));
        assert_eq!(record.offer_date, NaiveDate::from_ymd_opt(2025, 6, 1));
    }

    #[test]
    fn test_into_record_missing_date() {
        let record = raw(None).into_record(1).unwrap();
        assert_eq!(record.offer_date, None);
        assert_eq!(record.offer_year, None);

        let record = raw(Some("  ")).into_record(1).unwrap();
        assert_eq!(record.offer_year, None);
    }

    #[test]
    fn test_into_record_bad_date_reports_row() {
        let err = raw(Some("soon")).into_record(4).unwrap_err();
        match err {
            DashboardError::InvalidDate { row, value } => {
                assert_eq!(row, 4);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_role_is_missing() {
        let mut r = raw(Some("2025-01-01"));
        r.role = Some(String::new());
        assert_eq!(r.into_record(1).unwrap().role, None);
    }
}

//! Date-of-service detection.

use std::sync::LazyLock;

use chrono::NaiveDate;
use medrec_model::format_dos;
use regex::Regex;

/// Labelled date fields, highest priority first. Labels are case-sensitive.
static DATE_FIELD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"Date/Time:\s*([\d/]+)",
        r"Filed:\s*([\d/]+)",
        r"Resulted:\s*([\d/]+)",
        r"Encounter Date:\s*([\d/]+)",
        r"Electronically signed by.*?(\d{1,2}/\d{1,2}/\d{2,4})",
        r"Creation Time:\s*(\d{1,2}/\d{1,2}/\d{2,4})",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid date field regex"))
    .collect()
});

/// Accepted layouts of a date token, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateLayout {
    /// `M/D/YYYY`
    SlashLongYear,
    /// `M/D/YY`, two-digit years below 69 land in the 2000s.
    SlashShortYear,
    /// `M.D.YYYY`
    Dotted,
    /// `YYYY-M-D`
    Iso,
    /// `M/D`, year 1900.
    MonthDay,
}

const LAYOUTS: [DateLayout; 5] = [
    DateLayout::SlashLongYear,
    DateLayout::SlashShortYear,
    DateLayout::Dotted,
    DateLayout::Iso,
    DateLayout::MonthDay,
];

const MONTH_DAY_YEAR: i32 = 1900;
const SHORT_YEAR_PIVOT: i32 = 69;

impl DateLayout {
    fn parse(self, token: &str) -> Option<NaiveDate> {
        match self {
            Self::SlashLongYear => {
                let [month, day, year] = split_fields::<3>(token, '/')?;
                build(year_digits(year, 4)?, month, day)
            }
            Self::SlashShortYear => {
                let [month, day, year] = split_fields::<3>(token, '/')?;
                let short = year_digits(year, 2)?;
                let year = if short < SHORT_YEAR_PIVOT {
                    2000 + short
                } else {
                    1900 + short
                };
                build(year, month, day)
            }
            Self::Dotted => {
                let [month, day, year] = split_fields::<3>(token, '.')?;
                build(year_digits(year, 4)?, month, day)
            }
            Self::Iso => {
                let [year, month, day] = split_fields::<3>(token, '-')?;
                build(year_digits(year, 4)?, month, day)
            }
            Self::MonthDay => {
                let [month, day] = split_fields::<2>(token, '/')?;
                build(MONTH_DAY_YEAR, month, day)
            }
        }
    }
}

fn split_fields<const N: usize>(token: &str, separator: char) -> Option<[&str; N]> {
    let mut fields = [""; N];
    let mut parts = token.split(separator);
    for field in &mut fields {
        *field = parts.next()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}

fn is_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

fn year_digits(field: &str, width: usize) -> Option<i32> {
    if field.len() != width || !is_digits(field) {
        return None;
    }
    field.parse().ok()
}

/// Month and day take one or two digits.
fn short_number(field: &str) -> Option<u32> {
    if field.len() > 2 || !is_digits(field) {
        return None;
    }
    field.parse().ok()
}

fn build(year: i32, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, short_number(month)?, short_number(day)?)
}

/// Parses the first whitespace-separated token of a captured date.
fn parse_date_token(raw: &str) -> Option<NaiveDate> {
    let token = raw.split_whitespace().next()?;
    LAYOUTS.iter().find_map(|layout| layout.parse(token))
}

/// Walks the date fields in priority order starting from `current`.
///
/// Each field's first match replaces `current` when it parses. The walk
/// stops as soon as `current` differs from `unresolved`, so an inherited date
/// survives unless the first matching field carries a readable date.
pub(crate) fn detect_dos(text: &str, current: &str, unresolved: &str) -> String {
    let mut dos = current.to_string();
    for pattern in DATE_FIELD_PATTERNS.iter() {
        let Some(captures) = pattern.captures(text) else {
            continue;
        };
        if let Some(date) = captures.get(1).and_then(|m| parse_date_token(m.as_str())) {
            dos = format_dos(date);
        }
        if dos != unresolved {
            break;
        }
    }
    dos
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODAY: &str = "10/19/2026";

    fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    #[test]
    fn layouts_in_order() {
        assert_eq!(parse_date_token("3/7/2024"), date(2024, 3, 7));
        assert_eq!(parse_date_token("03/07/24"), date(2024, 3, 7));
        assert_eq!(parse_date_token("03/07/85"), date(1985, 3, 7));
        assert_eq!(parse_date_token("03.07.2024"), date(2024, 3, 7));
        assert_eq!(parse_date_token("2024-03-07"), date(2024, 3, 7));
        assert_eq!(parse_date_token("03/07"), date(1900, 3, 7));
        assert_eq!(parse_date_token("03/07/2024 10:15"), date(2024, 3, 7));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(parse_date_token("13/01/2024"), None);
        assert_eq!(parse_date_token("02/30/2024"), None);
        assert_eq!(parse_date_token("1/2/202"), None);
        assert_eq!(parse_date_token("2024"), None);
        assert_eq!(parse_date_token(""), None);
    }

    #[test]
    fn first_labelled_field_wins() {
        let text = "Filed: 02/02/2024\nDate/Time: 01/05/2024 09:00";
        assert_eq!(detect_dos(text, TODAY, TODAY), "01/05/2024");
    }

    #[test]
    fn unreadable_field_falls_through() {
        let text = "Date/Time: 99/99/9999\nEncounter Date: 4/1/23";
        assert_eq!(detect_dos(text, TODAY, TODAY), "04/01/2023");
    }

    #[test]
    fn signature_date() {
        let text = "Electronically signed by Jane Roe, MD on 6/15/2023 4:12 PM";
        assert_eq!(detect_dos(text, TODAY, TODAY), "06/15/2023");
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert_eq!(detect_dos("date/time: 01/05/2024", TODAY, TODAY), TODAY);
    }

    #[test]
    fn inherited_date_survives_unreadable_field() {
        let text = "Date/Time: 99/99/9999\nFiled: 01/01/2024";
        assert_eq!(detect_dos(text, "03/03/2023", TODAY), "03/03/2023");
        assert_eq!(detect_dos("no dates", "03/03/2023", TODAY), "03/03/2023");
    }
}

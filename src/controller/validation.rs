//! Date filter validation

use chrono::NaiveDate;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DateValidationError {
    #[error("Selecciona una fecha para buscar.")]
    Missing,
    #[error("Formato de fecha inválido. Usa AAAA-MM-DD.")]
    Malformed,
    #[error("No es posible consultar una fecha futura.")]
    Future,
}

/// Checks a user-entered date against the latest selectable day.
///
/// Only the canonical `YYYY-MM-DD` form is accepted, so the value sent to the backend is
/// exactly what the user typed.
pub fn validate_query_date(
    selected: &str,
    max_selectable: NaiveDate,
) -> Result<NaiveDate, DateValidationError> {
    let selected = selected.trim();
    if selected.is_empty() {
        return Err(DateValidationError::Missing);
    }
    if selected.len() != 10 {
        return Err(DateValidationError::Malformed);
    }
    let date = NaiveDate::parse_from_str(selected, DATE_FORMAT)
        .map_err(|_| DateValidationError::Malformed)?;
    if date > max_selectable {
        return Err(DateValidationError::Future);
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn blank_dates_are_missing() {
        assert_eq!(validate_query_date("", today()), Err(DateValidationError::Missing));
        assert_eq!(validate_query_date("   ", today()), Err(DateValidationError::Missing));
    }

    #[test]
    fn rejects_non_canonical_dates() {
        for input in ["2026-1-5", "18/10/2026", "2026-02-30", "yesterday"] {
            assert_eq!(
                validate_query_date(input, today()),
                Err(DateValidationError::Malformed),
                "{input}"
            );
        }
    }

    #[test]
    fn rejects_dates_after_today() {
        assert_eq!(
            validate_query_date("2026-10-19", today()),
            Err(DateValidationError::Future)
        );
    }

    #[test]
    fn accepts_today_and_past_dates() {
        assert_eq!(validate_query_date("2026-10-18", today()), Ok(today()));
        assert_eq!(
            validate_query_date(" 2025-12-31 ", today()),
            NaiveDate::from_ymd_opt(2025, 12, 31).ok_or(DateValidationError::Malformed)
        );
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            DateValidationError::Missing.to_string(),
            "Selecciona una fecha para buscar."
        );
        assert_eq!(
            DateValidationError::Future.to_string(),
            "No es posible consultar una fecha futura."
        );
    }
}

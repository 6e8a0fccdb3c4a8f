//! Visit form binding and validation.

use super::{codes, require_max_length, require_not_blank, BindingResult, FormData};
use crate::models::Visit;

/// Copy submitted visit fields onto the pending `visit`.
pub fn bind_visit(visit: &mut Visit, form: &FormData, result: &mut BindingResult) {
    form.bind_date("date", &mut visit.date, result);
    form.bind_string("description", &mut visit.description);
}

/// Column size of `visits.description`.
pub const DESCRIPTION_MAX_LENGTH: usize = 255;

pub fn validate_visit(visit: &Visit, result: &mut BindingResult) {
    if visit.date.is_none() && !result.has_field_errors("date") {
        result.reject_value("date", codes::REQUIRED, "is required");
    }
    require_not_blank("description", &visit.description, result);
    require_max_length("description", &visit.description, DESCRIPTION_MAX_LENGTH, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn bind(pairs: &[(&str, &str)]) -> (Visit, BindingResult) {
        let form = FormData::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        );
        let mut visit = Visit::new();
        let mut result = BindingResult::new();
        bind_visit(&mut visit, &form, &mut result);
        validate_visit(&visit, &mut result);
        (visit, result)
    }

    #[test]
    fn test_valid_visit() {
        let (visit, result) = bind(&[("date", "2023-06-01"), ("description", "Visit Description")]);

        assert!(!result.has_errors());
        assert_eq!(visit.date, NaiveDate::from_ymd_opt(2023, 6, 1));
        assert_eq!(visit.description, "Visit Description");
    }

    #[test]
    fn test_date_defaults_to_today_when_omitted() {
        let (visit, result) = bind(&[("description", "Visit Description")]);

        assert!(!result.has_errors());
        assert_eq!(visit.date, Visit::new().date);
    }

    #[test]
    fn test_blank_description_rejected() {
        let (_, result) = bind(&[("date", "2023-06-01"), ("description", "  ")]);

        assert_eq!(
            result.field_error("description").map(|e| e.code.as_str()),
            Some(codes::NOT_BLANK)
        );
    }

    #[test]
    fn test_long_description_rejected() {
        let description = "x".repeat(DESCRIPTION_MAX_LENGTH + 1);
        let (_, result) = bind(&[("date", "2023-06-01"), ("description", description.as_str())]);

        assert_eq!(result.errors().len(), 1);
        assert_eq!(
            result.field_error("description").map(|e| e.code.as_str()),
            Some(codes::SIZE)
        );
    }

    #[test]
    fn test_empty_date_required() {
        let (_, result) = bind(&[("date", ""), ("description", "checkup")]);

        assert_eq!(
            result.field_error("date").map(|e| e.code.as_str()),
            Some(codes::REQUIRED)
        );
    }

    #[test]
    fn test_bad_date_reports_type_mismatch_once() {
        let (_, result) = bind(&[("date", "06/01/2023"), ("description", "checkup")]);

        assert_eq!(result.errors().len(), 1);
        assert_eq!(
            result.field_error("date").map(|e| e.code.as_str()),
            Some(codes::TYPE_MISMATCH)
        );
    }

    #[test]
    fn test_submitted_id_is_ignored() {
        let (visit, _) = bind(&[("id", "77"), ("description", "checkup")]);
        assert_eq!(visit.id, None);
    }
}

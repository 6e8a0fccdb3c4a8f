//! Holder form binding and validation.

use super::{codes, require_max_length, require_not_blank, BindingResult, FormData};
use crate::models::Holder;

/// Maximum significant integer digits in a telephone number.
pub const TELEPHONE_MAX_DIGITS: usize = 10;

/// Column sizes of the `holders` table.
pub const NAME_MAX_LENGTH: usize = 30;
pub const ADDRESS_MAX_LENGTH: usize = 255;
pub const CITY_MAX_LENGTH: usize = 80;
pub const TELEPHONE_MAX_LENGTH: usize = 20;

/// Copy submitted holder fields onto `holder`.
pub fn bind_holder(holder: &mut Holder, form: &FormData) {
    form.bind_string("firstName", &mut holder.first_name);
    form.bind_string("lastName", &mut holder.last_name);
    form.bind_string("address", &mut holder.address);
    form.bind_string("city", &mut holder.city);
    form.bind_string("telephone", &mut holder.telephone);
}

pub fn validate_holder(holder: &Holder, result: &mut BindingResult) {
    require_not_blank("firstName", &holder.first_name, result);
    require_not_blank("lastName", &holder.last_name, result);
    require_not_blank("address", &holder.address, result);
    require_not_blank("city", &holder.city, result);
    require_not_blank("telephone", &holder.telephone, result);

    require_max_length("firstName", &holder.first_name, NAME_MAX_LENGTH, result);
    require_max_length("lastName", &holder.last_name, NAME_MAX_LENGTH, result);
    require_max_length("address", &holder.address, ADDRESS_MAX_LENGTH, result);
    require_max_length("city", &holder.city, CITY_MAX_LENGTH, result);
    require_max_length("telephone", &holder.telephone, TELEPHONE_MAX_LENGTH, result);

    if !holder.telephone.trim().is_empty() && !is_valid_telephone(&holder.telephone) {
        result.reject_value(
            "telephone",
            codes::DIGITS,
            "numeric value out of bounds (<10 digits>.<0 digits> expected)",
        );
    }
}

/// All digits, at most ten once leading zeros are dropped.
fn is_valid_telephone(telephone: &str) -> bool {
    let telephone = telephone.trim();
    if !telephone.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    telephone.trim_start_matches('0').len() <= TELEPHONE_MAX_DIGITS
}

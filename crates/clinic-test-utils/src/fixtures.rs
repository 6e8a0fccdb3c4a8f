//! Record fixtures for clinic tests.

use chrono::NaiveDate;
use clinic_service::models::{Holder, Pet, PetType, Visit};

pub fn dog() -> PetType {
    PetType {
        id: 2,
        name: "dog".to_string(),
    }
}

/// George Franklin with his dog Max, unsaved.
pub fn george() -> Holder {
    let mut holder = Holder {
        first_name: "George".to_string(),
        last_name: "Franklin".to_string(),
        address: "110 W. Liberty St.".to_string(),
        city: "Madison".to_string(),
        telephone: "6085551023".to_string(),
        ..Holder::new()
    };
    holder.add_pet(max());
    holder
}

/// Max the dog with one past visit, unsaved.
pub fn max() -> Pet {
    let mut pet = Pet {
        name: "Max".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2010, 1, 1),
        pet_type: Some(dog()),
        ..Pet::new()
    };
    pet.add_visit(visit("2023-05-01", "annual checkup"));
    pet
}

/// A visit on an ISO `yyyy-MM-dd` date; an unparsable date leaves it unset.
pub fn visit(date: &str, description: &str) -> Visit {
    Visit {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        description: description.to_string(),
        ..Visit::new()
    }
}

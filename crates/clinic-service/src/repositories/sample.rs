//! Sample clinic records used to seed the in-memory repository.

use crate::models::{Holder, Pet, PetType, Visit};
use chrono::NaiveDate;

/// Pet type names, in id order.
pub const PET_TYPE_NAMES: &[&str] = &["cat", "dog", "lizard", "snake", "bird", "hamster"];

pub fn pet_types() -> Vec<PetType> {
    PET_TYPE_NAMES
        .iter()
        .zip(1..)
        .map(|(name, id)| PetType {
            id,
            name: (*name).to_string(),
        })
        .collect()
}

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn holder(first: &str, last: &str, address: &str, city: &str, telephone: &str) -> Holder {
    Holder {
        first_name: first.to_string(),
        last_name: last.to_string(),
        address: address.to_string(),
        city: city.to_string(),
        telephone: telephone.to_string(),
        ..Holder::new()
    }
}

fn pet(types: &[PetType], name: &str, type_name: &str, birth_date: Option<NaiveDate>) -> Pet {
    Pet {
        name: name.to_string(),
        birth_date,
        pet_type: types.iter().find(|t| t.name == type_name).cloned(),
        ..Pet::new()
    }
}

fn visit(on: Option<NaiveDate>, description: &str) -> Visit {
    Visit {
        date: on,
        description: description.to_string(),
        ..Visit::new()
    }
}

/// Unsaved sample holders. Saving them in order yields ids 1 to 10.
pub fn holders(types: &[PetType]) -> Vec<Holder> {
    let mut holders = Vec::new();

    let mut h = holder("George", "Franklin", "110 W. Liberty St.", "Madison", "6085551023");
    h.add_pet(pet(types, "Leo", "cat", date(2010, 9, 7)));
    holders.push(h);

    let mut h = holder("Betty", "Davis", "638 Cardinal Ave.", "Sun Prairie", "6085551749");
    h.add_pet(pet(types, "Basil", "hamster", date(2012, 8, 6)));
    holders.push(h);

    let mut h = holder("Eduardo", "Rodriquez", "2693 Commerce St.", "McFarland", "6085558763");
    h.add_pet(pet(types, "Rosy", "dog", date(2011, 4, 17)));
    h.add_pet(pet(types, "Jewel", "dog", date(2010, 3, 7)));
    holders.push(h);

    let mut h = holder("Harold", "Davis", "563 Friendly St.", "Windsor", "6085553198");
    h.add_pet(pet(types, "Iggy", "lizard", date(2010, 11, 30)));
    holders.push(h);

    let mut h = holder("Peter", "McTavish", "2387 S. Fair Way", "Madison", "6085552765");
    h.add_pet(pet(types, "George", "snake", date(2010, 1, 20)));
    holders.push(h);

    let mut h = holder("Jean", "Coleman", "105 N. Lake St.", "Monona", "6085552654");
    let mut samantha = pet(types, "Samantha", "cat", date(2012, 9, 4));
    samantha.add_visit(visit(date(2013, 1, 1), "rabies shot"));
    samantha.add_visit(visit(date(2013, 1, 4), "spayed"));
    let mut max = pet(types, "Max", "cat", date(2012, 9, 4));
    max.add_visit(visit(date(2013, 1, 2), "rabies shot"));
    max.add_visit(visit(date(2013, 1, 3), "neutered"));
    h.add_pet(samantha);
    h.add_pet(max);
    holders.push(h);

    let mut h = holder("Jeff", "Black", "1450 Oak Blvd.", "Monona", "6085555387");
    h.add_pet(pet(types, "Lucky", "bird", date(2011, 8, 6)));
    holders.push(h);

    let mut h = holder("Maria", "Escobito", "345 Maple St.", "Madison", "6085557683");
    h.add_pet(pet(types, "Mulligan", "dog", date(2007, 2, 24)));
    holders.push(h);

    let mut h = holder("David", "Schroeder", "2749 Blackhawk Trail", "Madison", "6085559435");
    h.add_pet(pet(types, "Freddy", "bird", date(2010, 3, 9)));
    holders.push(h);

    let mut h = holder("Carlos", "Estaban", "2335 Independence La.", "Waunakee", "6085555487");
    h.add_pet(pet(types, "Lucky", "dog", date(2010, 6, 24)));
    h.add_pet(pet(types, "Sly", "cat", date(2012, 6, 8)));
    holders.push(h);

    holders
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_records_are_unsaved_and_typed() {
        let types = pet_types();
        let holders = holders(&types);

        assert_eq!(holders.len(), 10);
        assert!(holders.iter().all(Holder::is_new));
        assert!(holders
            .iter()
            .flat_map(|h| h.pets.iter())
            .all(|p| p.pet_type.is_some() && p.birth_date.is_some()));
    }
}

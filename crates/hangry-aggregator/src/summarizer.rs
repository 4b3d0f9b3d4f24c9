//! Cuisine distribution over a location's full listing set.

use std::collections::HashMap;

use hangry_core::{CuisineDistribution, ListingRecord};

/// Counts restaurants per cuisine category. A restaurant counts once toward
/// each of its categories; one without categories counts toward none.
#[must_use]
pub fn count_cuisines(records: &[ListingRecord]) -> CuisineDistribution {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        for category in &record.cuisines {
            let category = category.trim();
            if !category.is_empty() {
                *counts.entry(category).or_default() += 1;
            }
        }
    }
    CuisineDistribution::from_counts(
        counts
            .into_iter()
            .map(|(category, count)| (category.to_owned(), count)),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn record(name: &str, cuisines: &[&str]) -> ListingRecord {
        ListingRecord {
            provider_id: name.to_lowercase(),
            name: name.to_owned(),
            street_address: None,
            city: None,
            state: None,
            zip: None,
            is_open: true,
            order_url: None,
            logo_url: None,
            cuisines: cuisines.iter().map(|c| (*c).to_owned()).collect::<BTreeSet<_>>(),
            menu: Vec::new(),
        }
    }

    #[test]
    fn multi_category_restaurant_counts_once_per_category() {
        let dist = count_cuisines(&[record("Kin Khao", &["Thai", "Noodles"])]);
        assert_eq!(dist.count_for("Thai"), 1);
        assert_eq!(dist.count_for("Noodles"), 1);
        assert_eq!(dist.entries().len(), 2);
    }

    #[test]
    fn uncategorized_restaurant_counts_nowhere() {
        let dist = count_cuisines(&[record("Mystery Spot", &[]), record("Blank", &["  "])]);
        assert!(dist.is_empty());
        assert_eq!(dist.count_for("Uncategorized"), 0);
    }

    #[test]
    fn counts_are_independent_of_input_order() {
        let mut records = vec![
            record("A", &["Pizza"]),
            record("B", &["Thai", "Noodles"]),
            record("C", &["Pizza", "Salads"]),
            record("D", &["Noodles"]),
            record("E", &[]),
        ];
        let forward = count_cuisines(&records);
        records.reverse();
        let reversed = count_cuisines(&records);
        records.rotate_left(2);
        let rotated = count_cuisines(&records);

        assert_eq!(forward, reversed);
        assert_eq!(forward, rotated);
        let names: Vec<&str> = forward.entries().iter().map(|e| e.category.as_str()).collect();
        assert_eq!(names, ["Noodles", "Pizza", "Salads", "Thai"]);
    }
}

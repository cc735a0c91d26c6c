use std::cmp::Ordering;

use crate::models::Country;

fn by_name(a: &Country, b: &Country) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

pub fn sort_countries(countries: &mut [Country]) {
    countries.sort_by(by_name);
}

/// Autocomplete ranking: names starting with the query first, then names
/// containing it elsewhere. Both groups sorted by name, matching is
/// case-insensitive. An empty query suggests nothing.
pub fn suggest(countries: &[Country], query: &str) -> Vec<Country> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut starts = Vec::new();
    let mut contains = Vec::new();
    for country in countries {
        let name = country.name.to_lowercase();
        if name.starts_with(&query) {
            starts.push(country.clone());
        } else if name.contains(&query) {
            contains.push(country.clone());
        }
    }

    starts.sort_by(by_name);
    contains.sort_by(by_name);
    starts.extend(contains);
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(name: &str, code: &str) -> Country {
        Country { name: name.to_string(), code: code.to_string() }
    }

    fn names(countries: &[Country]) -> Vec<&str> {
        countries.iter().map(|c| c.name.as_str()).collect()
    }

    fn sample() -> Vec<Country> {
        vec![
            country("Nigeria", "ng"),
            country("Algeria", "dz"),
            country("Niger", "ne"),
            country("Germany", "de"),
            country("Norway", "no"),
            country("Guinea-Bissau", "gw"),
        ]
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let mut list = vec![
            country("bhutan", "bt"),
            country("Benin", "bj"),
            country("Aruba", "aw"),
        ];
        sort_countries(&mut list);
        assert_eq!(names(&list), vec!["Aruba", "Benin", "bhutan"]);
    }

    #[test]
    fn test_prefix_matches_come_first() {
        let result = suggest(&sample(), "ni");
        assert_eq!(names(&result), vec!["Niger", "Nigeria"]);

        let result = suggest(&sample(), "ger");
        assert_eq!(names(&result), vec!["Germany", "Algeria", "Niger", "Nigeria"]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        assert_eq!(names(&suggest(&sample(), "NOR")), vec!["Norway"]);
        assert_eq!(names(&suggest(&sample(), "  bissau ")), vec!["Guinea-Bissau"]);
    }

    #[test]
    fn test_empty_and_unmatched() {
        assert!(suggest(&sample(), "").is_empty());
        assert!(suggest(&sample(), "   ").is_empty());
        assert!(suggest(&sample(), "zz").is_empty());
    }
}

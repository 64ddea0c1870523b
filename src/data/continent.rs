use super::model::Continent;

// ---------------------------------------------------------------------------
// Static country → continent lookup
// ---------------------------------------------------------------------------

/// The 49 countries covered by the integrated dataset, grouped by continent.
/// Fixed at build time; the loader consults this once per panel row and
/// leaves the continent unset for anything not listed here.
const COUNTRIES: &[(&str, Continent)] = &[
    // Europe
    ("Germany", Continent::Europe),
    ("United Kingdom", Continent::Europe),
    ("France", Continent::Europe),
    ("Italy", Continent::Europe),
    ("Spain", Continent::Europe),
    ("Poland", Continent::Europe),
    ("Netherlands", Continent::Europe),
    ("Belgium", Continent::Europe),
    ("Greece", Continent::Europe),
    ("Portugal", Continent::Europe),
    // Asia
    ("China", Continent::Asia),
    ("India", Continent::Asia),
    ("Japan", Continent::Asia),
    ("Indonesia", Continent::Asia),
    ("Pakistan", Continent::Asia),
    ("Bangladesh", Continent::Asia),
    ("Russia", Continent::Asia),
    ("Turkey", Continent::Asia),
    ("Iran", Continent::Asia),
    ("Thailand", Continent::Asia),
    // Americas
    ("United States", Continent::Americas),
    ("Brazil", Continent::Americas),
    ("Mexico", Continent::Americas),
    ("Canada", Continent::Americas),
    ("Argentina", Continent::Americas),
    ("Colombia", Continent::Americas),
    ("Peru", Continent::Americas),
    ("Venezuela", Continent::Americas),
    ("Chile", Continent::Americas),
    ("Ecuador", Continent::Americas),
    // Africa
    ("Nigeria", Continent::Africa),
    ("Ethiopia", Continent::Africa),
    ("Egypt", Continent::Africa),
    ("South Africa", Continent::Africa),
    ("Tanzania", Continent::Africa),
    ("Kenya", Continent::Africa),
    ("Algeria", Continent::Africa),
    ("Sudan", Continent::Africa),
    ("Uganda", Continent::Africa),
    // Oceania
    ("Australia", Continent::Oceania),
    ("Papua New Guinea", Continent::Oceania),
    ("New Zealand", Continent::Oceania),
    ("Fiji", Continent::Oceania),
    ("Solomon Islands", Continent::Oceania),
    ("Samoa", Continent::Oceania),
    ("Vanuatu", Continent::Oceania),
    ("Kiribati", Continent::Oceania),
    ("Tonga", Continent::Oceania),
    ("Micronesia", Continent::Oceania),
];

/// Look up the continent for a country name. Exact match on the
/// `Country/Territory` spelling used by the source data.
pub fn continent_of(country: &str) -> Option<Continent> {
    COUNTRIES
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, continent)| *continent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_countries_resolve() {
        assert_eq!(continent_of("Germany"), Some(Continent::Europe));
        assert_eq!(continent_of("Kiribati"), Some(Continent::Oceania));
        assert_eq!(continent_of("Sudan"), Some(Continent::Africa));
    }

    #[test]
    fn unknown_or_misspelled_countries_do_not_resolve() {
        assert_eq!(continent_of("Atlantis"), None);
        // Lookup is exact, not case-insensitive.
        assert_eq!(continent_of("germany"), None);
    }

    #[test]
    fn lookup_has_no_duplicate_entries() {
        let mut names: Vec<&str> = COUNTRIES.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COUNTRIES.len());
    }
}

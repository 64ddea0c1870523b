use std::collections::BTreeMap;

use crate::data::model::{Metric, PanelRow};

// ---------------------------------------------------------------------------
// Group-by-mean reducers
// ---------------------------------------------------------------------------
//
// The source panel may carry duplicate (country, year) rows; both reducers
// collapse duplicates by arithmetic mean before anything is plotted.
// Missing values are ignored. A group whose values are all missing is
// dropped from the output rather than emitted as null.

/// One point of a per-country time series.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryYearMean {
    pub country: String,
    pub year: i32,
    pub value: f64,
}

/// One bar of a per-country ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryMean {
    pub country: String,
    pub value: f64,
}

/// Collapse rows to one mean per distinct (country, year) pair.
///
/// Output is sorted by (country, year). Pure and total: any well-typed
/// input (including empty) produces a result, never an error.
pub fn mean_by_country_year<'a, I>(rows: I, metric: &Metric) -> Vec<CountryYearMean>
where
    I: IntoIterator<Item = &'a PanelRow>,
{
    let mut groups: BTreeMap<(&str, i32), MeanAcc> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.country.as_str(), row.year))
            .or_default()
            .push(row.value(metric));
    }

    groups
        .into_iter()
        .filter_map(|((country, year), acc)| {
            acc.mean().map(|value| CountryYearMean {
                country: country.to_string(),
                year,
                value,
            })
        })
        .collect()
}

/// Collapse rows to one mean per country, ranked descending by value.
///
/// The sort is stable and no secondary key is defined, so countries tied on
/// value keep the relative order in which they first appear in the input.
pub fn mean_by_country_ranked<'a, I>(rows: I, metric: &Metric) -> Vec<CountryMean>
where
    I: IntoIterator<Item = &'a PanelRow>,
{
    // First-appearance order; the stable sort below preserves it for
    // tied values.
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, MeanAcc> = BTreeMap::new();

    for row in rows {
        let country = row.country.as_str();
        if !groups.contains_key(country) {
            order.push(country);
        }
        groups.entry(country).or_default().push(row.value(metric));
    }

    let mut ranked: Vec<CountryMean> = order
        .into_iter()
        .filter_map(|country| {
            groups[country].mean().map(|value| CountryMean {
                country: country.to_string(),
                value,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked
}

/// Running sum/count over the present values of one group.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAcc {
    sum: f64,
    count: u32,
}

impl MeanAcc {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    /// `None` when every value in the group was missing.
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ClimateVariable;
    use std::collections::BTreeMap;

    fn row(country: &str, year: i32, temperature: Option<f64>) -> PanelRow {
        PanelRow {
            country: country.to_string(),
            year,
            continent: None,
            temperature_c: temperature,
            precipitation_mm: None,
            surface_pressure_pa: None,
            wind_speed_ms: None,
            cause_rates: BTreeMap::new(),
        }
    }

    const TEMPERATURE: Metric = Metric::Climate(ClimateVariable::Temperature);

    #[test]
    fn duplicate_country_year_rows_collapse_to_their_mean() {
        let rows = vec![
            row("Germany", 2000, Some(10.0)),
            row("Germany", 2000, Some(12.0)),
            row("Germany", 2001, Some(9.0)),
        ];
        let series = mean_by_country_year(&rows, &TEMPERATURE);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0], CountryYearMean { country: "Germany".into(), year: 2000, value: 11.0 });
        assert_eq!(series[1].value, 9.0);
    }

    #[test]
    fn one_output_row_per_distinct_key() {
        let rows = vec![
            row("Japan", 1991, Some(13.0)),
            row("Chile", 1990, Some(8.0)),
            row("Japan", 1990, Some(14.0)),
            row("Japan", 1991, Some(15.0)),
        ];
        let series = mean_by_country_year(&rows, &TEMPERATURE);

        let keys: Vec<(&str, i32)> = series.iter().map(|p| (p.country.as_str(), p.year)).collect();
        assert_eq!(keys, vec![("Chile", 1990), ("Japan", 1990), ("Japan", 1991)]);
        assert_eq!(series[2].value, 14.0);
    }

    #[test]
    fn missing_values_are_ignored_in_the_mean() {
        let rows = vec![
            row("Kenya", 2005, Some(24.0)),
            row("Kenya", 2005, None),
            row("Kenya", 2005, Some(26.0)),
        ];
        let series = mean_by_country_year(&rows, &TEMPERATURE);
        assert_eq!(series, vec![CountryYearMean { country: "Kenya".into(), year: 2005, value: 25.0 }]);
    }

    #[test]
    fn all_missing_groups_are_dropped() {
        let rows = vec![
            row("Kenya", 2005, None),
            row("Kenya", 2006, Some(25.0)),
            row("Chile", 1999, None),
        ];
        let series = mean_by_country_year(&rows, &TEMPERATURE);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].year, 2006);

        let ranked = mean_by_country_ranked(&rows, &TEMPERATURE);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].country, "Kenya");
    }

    #[test]
    fn ranking_is_descending() {
        let rows = vec![
            row("Chile", 1990, Some(8.0)),
            row("Chile", 1991, Some(10.0)),
            row("India", 1990, Some(25.0)),
            row("Norway", 1990, Some(2.0)),
        ];
        let ranked = mean_by_country_ranked(&rows, &TEMPERATURE);

        let names: Vec<&str> = ranked.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["India", "Chile", "Norway"]);
        assert_eq!(ranked[1].value, 9.0);
    }

    #[test]
    fn tied_countries_keep_first_appearance_order() {
        let rows = vec![
            row("Zambia", 1990, Some(20.0)),
            row("Austria", 1990, Some(20.0)),
            row("Mali", 1990, Some(30.0)),
        ];
        let ranked = mean_by_country_ranked(&rows, &TEMPERATURE);

        let names: Vec<&str> = ranked.iter().map(|r| r.country.as_str()).collect();
        // Zambia appears before Austria in the input, so the tie keeps
        // that order, not the alphabetical one.
        assert_eq!(names, vec!["Mali", "Zambia", "Austria"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let rows: Vec<PanelRow> = Vec::new();
        assert!(mean_by_country_year(&rows, &TEMPERATURE).is_empty());
        assert!(mean_by_country_ranked(&rows, &TEMPERATURE).is_empty());
    }
}

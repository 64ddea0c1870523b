use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use climate_pulse::{
    load, mean_by_country_year, select_top, top_causes_matrix, ClimateVariable, CorrelationMode,
    DashboardError, DashboardState, DataConfig, Metric, Selection,
};

const PANEL_CSV: &str = "\
Country/Territory,Year,Temperature_C,Precipitation_mm,Surface_Pressure_Pa,Wind_Speed_ms,Malaria_Rate_per_100k,Influenza_Rate_per_100k
Germany,2000,10.0,700.0,101325.0,3.5,0.10,12.0
Germany,2000,12.0,690.0,101300.0,3.4,0.30,14.0
Germany,2001,9.5,710.0,101310.0,3.6,0.20,13.0
Kenya,2000,24.0,640.0,100900.0,3.0,50.0,6.0
Kenya,2001,25.0,610.0,100880.0,3.1,48.0,5.5
Australia,2001,22.0,530.0,101100.0,3.8,1.2,7.0
";

const CORR_CSV: &str = "\
Cause,Climate_Variable,Correlation
Malaria,Temperature_C,0.82
Malaria,Precipitation_mm,0.61
Influenza,Temperature_C,-0.44
Influenza,Precipitation_mm,0.12
Road Injuries,Temperature_C,0.05
";

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("climate-pulse-flow-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn config() -> DataConfig {
    DataConfig::new(
        write_temp("panel.csv", PANEL_CSV),
        write_temp("corr.csv", CORR_CSV),
        vec!["Malaria".to_string(), "Influenza".to_string()],
    )
}

#[test]
fn load_filter_aggregate_end_to_end() {
    let tables = load(&config()).unwrap();
    assert_eq!(tables.panel.len(), 6);
    assert_eq!(tables.panel.countries.len(), 3);

    let countries: BTreeSet<String> =
        ["Germany", "Kenya"].iter().map(|s| s.to_string()).collect();
    let selection = Selection::new(countries, 2000, 2000);
    let indices = climate_pulse::filtered_indices(&tables.panel, &selection);
    assert_eq!(indices.len(), 3);

    // The duplicate (Germany, 2000) rows collapse to their mean, 11.0.
    let series = mean_by_country_year(
        tables.panel.select(&indices),
        &Metric::Climate(ClimateVariable::Temperature),
    );
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].country, "Germany");
    assert_eq!(series[0].value, 11.0);
    assert_eq!(series[1].country, "Kenya");
    assert_eq!(series[1].value, 24.0);
}

#[test]
fn session_drives_every_chart_view() {
    let tables = Arc::new(load(&config()).unwrap());
    let mut state = DashboardState::new(tables);

    let overview = state.overview();
    assert_eq!(overview.records, 6);
    assert_eq!(overview.year_span, Some((2000, 2001)));
    // Country, year, continent, four climate variables, two causes.
    assert_eq!(overview.columns, 9);

    assert!(state.set_cause("Malaria"));
    let ranked = state.ranked_rates();
    assert_eq!(ranked.first().map(|r| r.country.as_str()), Some("Kenya"));

    state.set_top_n(2);
    state.set_correlation_mode(CorrelationMode::Negative);
    let top = state.top_correlations().unwrap();
    assert_eq!(top[0].cause, "Influenza");
    assert_eq!(top[0].correlation, -0.44);

    let matrix = state.correlation_heatmap().unwrap();
    // Malaria's |0.82| outranks Influenza's |-0.44| and Road Injuries' 0.05.
    assert_eq!(matrix.causes()[0], "Malaria");
    // "Road Injuries" has no Precipitation_mm record: undefined, not zero.
    assert_eq!(matrix.get("Road Injuries", "Precipitation_mm"), None);
    assert_eq!(matrix.get("Influenza", "Precipitation_mm"), Some(0.12));
}

#[test]
fn absolute_tie_at_the_cutoff_widens_the_selection() {
    let corr = write_temp(
        "corr-tie.csv",
        "Cause,Climate_Variable,Correlation\n\
         A,Temperature_C,0.9\n\
         B,Temperature_C,-0.8\n\
         C,Temperature_C,0.7\n\
         D,Temperature_C,0.6\n\
         E,Temperature_C,0.4\n\
         F,Temperature_C,-0.4\n\
         G,Temperature_C,0.1\n",
    );
    let table = climate_pulse::load_correlations(&corr).unwrap();

    let absolute = select_top(&table, 5, CorrelationMode::AbsoluteStrongest).unwrap();
    assert_eq!(absolute.len(), 6);

    // The signed modes truncate the same tie to exactly n rows.
    let positive = select_top(&table, 5, CorrelationMode::Positive).unwrap();
    assert_eq!(positive.len(), 5);
}

#[test]
fn duplicate_pivot_key_surfaces_ambiguous_pivot() {
    let corr = write_temp(
        "corr-dup.csv",
        "Cause,Climate_Variable,Correlation\n\
         Flu,Temperature_C,0.30\n\
         Flu,Temperature_C,0.31\n",
    );
    let table = climate_pulse::load_correlations(&corr).unwrap();

    let err = top_causes_matrix(&table, 3).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::AmbiguousPivot { ref cause, ref variable }
            if cause.as_str() == "Flu" && variable.as_str() == "Temperature_C"
    ));
}

#[test]
fn missing_source_file_fails_fast() {
    let config = DataConfig::new(
        "/nonexistent/panel.csv",
        "/nonexistent/corr.csv",
        Vec::new(),
    );
    let err = load(&config).unwrap_err();
    assert!(matches!(err, DashboardError::DataUnavailable { .. }));
}

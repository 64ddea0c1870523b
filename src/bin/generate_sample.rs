use anyhow::{Context, Result};
use log::info;

use climate_pulse::data::model::{rate_column, ClimateVariable};
use climate_pulse::DataConfig;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Per-country climate baseline: (name, mean °C, annual mm, mean m/s).
const COUNTRIES: &[(&str, f64, f64, f64)] = &[
    ("Germany", 9.5, 700.0, 3.5),
    ("United Kingdom", 9.0, 885.0, 4.4),
    ("India", 24.7, 1083.0, 2.6),
    ("Japan", 11.1, 1668.0, 2.9),
    ("Brazil", 25.0, 1761.0, 2.2),
    ("Kenya", 24.8, 630.0, 3.0),
    ("Australia", 21.7, 534.0, 3.8),
    ("United States", 8.6, 715.0, 3.7),
];

/// (cause, baseline rate per 100k, sensitivity to °C above 15).
const CAUSES: &[(&str, f64, f64)] = &[
    ("Cardiovascular Diseases", 230.0, 1.8),
    ("Lower Respiratory Infections", 40.0, -0.9),
    ("Malaria", 6.0, 2.4),
    ("Diarrheal Diseases", 18.0, 1.2),
    ("Road Injuries", 17.0, 0.1),
];

const YEARS: std::ops::RangeInclusive<i32> = 1990..=2019;

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);

    write_panel("sample_panel.csv", &mut rng)?;
    write_correlations("sample_correlations.csv", &mut rng)?;
    write_config("sample_config.json")?;

    info!("sample data written to the current directory");
    Ok(())
}

fn write_panel(path: &str, rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating panel CSV")?;

    let mut header = vec!["Country/Territory".to_string(), "Year".to_string()];
    header.extend(ClimateVariable::ALL.iter().map(|v| v.column_name().to_string()));
    header.extend(CAUSES.iter().map(|(cause, _, _)| rate_column(cause)));
    writer.write_record(&header)?;

    let mut records = 0usize;
    for &(country, base_temp, base_precip, base_wind) in COUNTRIES {
        for year in YEARS {
            // One duplicate (country, year) observation per country, to
            // exercise the mean collapse downstream.
            let copies = if year == 2000 { 2 } else { 1 };
            for _ in 0..copies {
                let warming = 0.02 * f64::from(year - 1990);
                let temperature = rng.gauss(base_temp + warming, 0.6);
                let precipitation = rng.gauss(base_precip, base_precip * 0.12).max(0.0);
                let pressure = rng.gauss(101_325.0, 450.0);
                let wind = rng.gauss(base_wind, 0.4).max(0.1);

                let mut record = vec![
                    country.to_string(),
                    year.to_string(),
                    format!("{temperature:.2}"),
                    format!("{precipitation:.1}"),
                    format!("{pressure:.1}"),
                    format!("{wind:.2}"),
                ];
                for &(_, baseline, sensitivity) in CAUSES {
                    let rate = (baseline + sensitivity * (temperature - 15.0)
                        + rng.gauss(0.0, baseline * 0.05))
                        .max(0.0);
                    record.push(format!("{rate:.2}"));
                }
                writer.write_record(&record)?;
                records += 1;
            }
        }
    }

    writer.flush()?;
    info!("wrote {records} panel records to {path}");
    Ok(())
}

fn write_correlations(path: &str, rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating correlations CSV")?;
    writer.write_record(["Cause", "Climate_Variable", "Correlation"])?;

    for &(cause, _, sensitivity) in CAUSES {
        for variable in ClimateVariable::ALL {
            // Temperature correlations track the generating sensitivity;
            // the other variables are near-noise.
            let value = match variable {
                ClimateVariable::Temperature => (sensitivity / 3.0) + rng.gauss(0.0, 0.05),
                _ => rng.gauss(0.0, 0.15),
            };
            let formatted = format!("{:.4}", value.clamp(-1.0, 1.0));
            writer.write_record([cause, variable.column_name(), formatted.as_str()])?;
        }
    }

    writer.flush()?;
    info!("wrote correlations to {path}");
    Ok(())
}

fn write_config(path: &str) -> Result<()> {
    let config = DataConfig::new(
        "sample_panel.csv",
        "sample_correlations.csv",
        CAUSES.iter().map(|(cause, _, _)| cause.to_string()).collect(),
    );
    let text = serde_json::to_string_pretty(&config).context("serializing config")?;
    std::fs::write(path, text).context("writing config")?;
    info!("wrote config to {path}");
    Ok(())
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Write a deterministic synthetic launch table for trying out the dashboard.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file; `.parquet` writes Parquet, anything else CSV.
    #[arg(default_value = "spacex_launch_dash.csv")]
    output: PathBuf,

    /// Number of launches to generate
    #[arg(long, default_value_t = 56)]
    count: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

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

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

#[derive(Debug, Serialize)]
struct Launch {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Mission Outcome")]
    mission_outcome: String,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version")]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
}

const SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

/// Booster generations in flight order with their payload ceiling and
/// landing success rate.
const BOOSTERS: [(&str, f64, f64); 5] = [
    ("v1.0", 700.0, 0.0),
    ("v1.1", 4500.0, 0.15),
    ("FT", 9600.0, 0.65),
    ("B4", 7000.0, 0.55),
    ("B5", 9600.0, 0.9),
];

fn generate(count: usize, seed: u64) -> Vec<Launch> {
    let mut rng = SimpleRng::new(seed);
    (0..count)
        .map(|i| {
            // Later flights use later booster generations.
            let generation = (i * BOOSTERS.len() / count.max(1)).min(BOOSTERS.len() - 1);
            let (category, max_payload, success_rate) = BOOSTERS[generation];
            let payload = (rng.next_f64() * max_payload).round();
            let class = i64::from(rng.next_f64() < success_rate);
            Launch {
                flight_number: i as i64 + 1,
                launch_site: rng.pick(&SITES).to_string(),
                mission_outcome: "Success".to_string(),
                class,
                payload_mass_kg: payload,
                booster_version: format!("F9 {category}  B{}", 1000 + i),
                booster_version_category: category.to_string(),
            }
        })
        .collect()
}

fn write_csv(path: &Path, launches: &[Launch]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for launch in launches {
        writer.serialize(launch).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, launches: &[Launch]) -> Result<()> {
    let strings = |f: fn(&Launch) -> &str| {
        StringArray::from(launches.iter().map(f).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("Mission Outcome", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.flight_number))),
            Arc::new(strings(|l| l.launch_site.as_str())),
            Arc::new(strings(|l| l.mission_outcome.as_str())),
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
            Arc::new(Float64Array::from_iter_values(
                launches.iter().map(|l| l.payload_mass_kg),
            )),
            Arc::new(strings(|l| l.booster_version.as_str())),
            Arc::new(strings(|l| l.booster_version_category.as_str())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let launches = generate(args.count, args.seed);

    let is_parquet = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&args.output, &launches)?;
    } else {
        write_csv(&args.output, &launches)?;
    }

    println!(
        "Wrote {} launches across {} sites to {}",
        launches.len(),
        SITES.len(),
        args.output.display()
    );
    Ok(())
}

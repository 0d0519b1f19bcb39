use std::path::Path;

use anyhow::{Context, Result};

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

const COUNTRIES: [&str; 6] = ["Argentina", "Egypt", "India", "Japan", "Kenya", "Sweden"];
const AGE_GROUPS: [&str; 7] = ["15-19", "20-24", "25-29", "30-34", "35-39", "40-44", "45-49"];
const SEXES: [&str; 2] = ["Female", "Male"];
const STATUSES: [&str; 4] = ["Married", "Single", "Divorced", "Widowed"];

/// Share of a population group in each status, before noise. Marriage rises
/// with age and singlehood falls.
fn base_share(age_idx: usize, status: &str) -> f64 {
    let age = age_idx as f64 / (AGE_GROUPS.len() - 1) as f64;
    match status {
        "Married" => 10.0 + 70.0 * age,
        "Single" => 85.0 - 75.0 * age,
        "Divorced" => 1.0 + 8.0 * age,
        _ => 0.2 + 3.0 * age * age,
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = Path::new("data/World Marriage Dataset.csv");
    if let Some(dir) = output_path.parent() {
        std::fs::create_dir_all(dir).context("creating output directory")?;
    }

    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record([
        "Country",
        "AgeGroup",
        "Sex",
        "MaritalStatus",
        "Data Collection (Start Year)",
        "Data Collection (End Year)",
        "Value",
    ])?;

    let mut rows = 0usize;
    for country in COUNTRIES {
        // Each country has one or two survey waves.
        let waves = 1 + rng.below(2);
        for _ in 0..waves {
            let start = 1970 + rng.below(45);
            let end = start + rng.below(4);
            for (age_idx, age) in AGE_GROUPS.into_iter().enumerate() {
                for sex in SEXES {
                    for status in STATUSES {
                        let noise = (rng.next_f64() - 0.5) * 6.0;
                        let share = (base_share(age_idx, status) + noise).clamp(0.0, 100.0);
                        // Some cells are left blank, as in the published tables.
                        let value = if rng.below(40) == 0 {
                            String::new()
                        } else {
                            format!("{share:.1}")
                        };
                        writer.write_record([
                            country,
                            age,
                            sex,
                            status,
                            start.to_string().as_str(),
                            end.to_string().as_str(),
                            value.as_str(),
                        ])?;
                        rows += 1;
                    }
                }
            }
        }
    }
    writer.flush()?;

    println!("Wrote {rows} rows to {}", output_path.display());
    Ok(())
}

//! Writes a pair of CP949 population tables in the layout of the
//! resident-registration statistics export, for trying out the dashboard:
//!
//! * `population_total.csv`  – `2025년04월_계_0세` … `2025년04월_계_100세 이상`
//! * `population_by_sex.csv` – the same buckets under `_남_` and `_여_`
//!
//! Usage: `generate_sample [out_dir]`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use encoding_rs::EUC_KR;

const PERIOD: &str = "2025년04월";
const REGION: &str = "경기도  (4100000000)";
const OPEN_ENDED_AGE: u32 = 100;

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

    /// Uniform in `[1 - spread, 1 + spread)`.
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + spread * (2.0 * self.next_f64() - 1.0)
    }
}

/// Rough single-year population curve: a bulge around the 50s, tailing off
/// after 70.
fn base_population(age: u32) -> f64 {
    let a = age as f64;
    let bulge = 230_000.0 * (-(a - 52.0).powi(2) / (2.0 * 18.0_f64.powi(2))).exp();
    let young = 90_000.0 + 1_200.0 * a.min(30.0);
    let survival = if a > 70.0 { (-(a - 70.0) / 9.0).exp() } else { 1.0 };
    (young.max(bulge) * survival).max(40.0)
}

/// `1234567` → `"1,234,567"`
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn age_header(sex: &str, age: u32) -> String {
    if age == OPEN_ENDED_AGE {
        format!("{PERIOD}_{sex}_{age}세 이상")
    } else {
        format!("{PERIOD}_{sex}_{age}세")
    }
}

/// Header and one data row for one sex block (`계`, `남` or `여`).
fn block(sex: &str, counts: &[u64]) -> (Vec<String>, Vec<String>) {
    let sum: u64 = counts.iter().sum();
    let mut headers = vec![
        format!("{PERIOD}_{sex}_총인구수"),
        format!("{PERIOD}_{sex}_연령구간인구수"),
    ];
    let mut row = vec![group_thousands(sum), group_thousands(sum)];
    for (age, &count) in (0..=OPEN_ENDED_AGE).zip(counts) {
        headers.push(age_header(sex, age));
        row.push(group_thousands(count));
    }
    (headers, row)
}

fn write_cp949_csv(path: &Path, headers: &[String], row: &[String]) -> Result<()> {
    let mut buf = Vec::new();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(headers).context("writing header row")?;
        wtr.write_record(row).context("writing data row")?;
        wtr.flush().context("flushing CSV")?;
    }
    let text = String::from_utf8(buf).context("CSV output is not UTF-8")?;

    let (bytes, _, had_errors) = EUC_KR.encode(&text);
    ensure!(!had_errors, "text not representable in CP949");
    std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let mut male = Vec::new();
    let mut female = Vec::new();
    for age in 0..=OPEN_ENDED_AGE {
        let base = base_population(age);
        // Women outlive men: shift the split with age.
        let female_share = 0.49 + 0.25 * (age as f64 / 100.0).powi(2);
        male.push((base * (1.0 - female_share) * rng.jitter(0.04)).round() as u64);
        female.push((base * female_share * rng.jitter(0.04)).round() as u64);
    }
    let total: Vec<u64> = male.iter().zip(&female).map(|(m, f)| m + f).collect();

    let (mut headers, mut row) = (vec!["행정구역".to_string()], vec![REGION.to_string()]);
    let (h, r) = block("계", &total);
    headers.extend(h);
    row.extend(r);
    let total_path = out_dir.join("population_total.csv");
    write_cp949_csv(&total_path, &headers, &row)?;

    let (mut headers, mut row) = (vec!["행정구역".to_string()], vec![REGION.to_string()]);
    for (sex, counts) in [("남", &male), ("여", &female)] {
        let (h, r) = block(sex, counts);
        headers.extend(h);
        row.extend(r);
    }
    let sex_path = out_dir.join("population_by_sex.csv");
    write_cp949_csv(&sex_path, &headers, &row)?;

    println!(
        "Wrote {} age buckets to {} and {}",
        total.len(),
        total_path.display(),
        sex_path.display()
    );
    Ok(())
}

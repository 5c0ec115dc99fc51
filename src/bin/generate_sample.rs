use std::path::Path;

use anyhow::Result;
use rusty_dloc::data::loader::save_file;
use rusty_dloc::{Frame, Label, MultiIndex};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn generate_spectrum(
    wavenumbers: &[f64],
    peaks: &[(f64, f64, f64)],
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavenumbers
        .iter()
        .map(|&wn| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wn, mu, sigma, amp))
                .sum();
            signal + rng.gauss(0.0, noise_level)
        })
        .collect()
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Rows: sample / concentration / operator. Columns: band / wavenumber.
fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    // Wavenumbers: 4000 → 2100, step 100
    let wavenumbers: Vec<f64> = (0..20).map(|i| 4000.0 - i as f64 * 100.0).collect();

    let samples = ["Sample_A", "Sample_B", "Sample_C"];
    let concentrations = [0.1, 0.5, 1.0, 2.0, 5.0];
    let operators = ["Alice", "Bob"];

    let sample_peaks: [(&str, [(f64, f64, f64); 3]); 3] = [
        ("Sample_A", [(3400.0, 80.0, 0.8), (2900.0, 40.0, 0.5), (2350.0, 30.0, 0.3)]),
        ("Sample_B", [(3200.0, 60.0, 0.6), (2800.0, 50.0, 0.7), (2500.0, 35.0, 0.4)]),
        ("Sample_C", [(3600.0, 70.0, 0.9), (3000.0, 45.0, 0.4), (2200.0, 25.0, 0.5)]),
    ];

    let mut row_keys: Vec<Vec<Label>> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (sample, peaks_base) in &sample_peaks {
        for &conc in &concentrations {
            let peaks: Vec<(f64, f64, f64)> = peaks_base
                .iter()
                .map(|&(mu, sigma, amp)| (mu, sigma, amp * conc))
                .collect();

            for &operator in &operators {
                rows.push(generate_spectrum(&wavenumbers, &peaks, 0.005 * conc, &mut rng));
                row_keys.push(vec![
                    Label::from(*sample),
                    Label::from(conc),
                    Label::from(operator),
                ]);
            }
        }
    }
    debug_assert_eq!(row_keys.len(), samples.len() * concentrations.len() * operators.len());

    let col_keys: Vec<Vec<Label>> = wavenumbers
        .iter()
        .map(|&wn| {
            let band = if wn >= 3000.0 { "high" } else { "low" };
            vec![Label::from(band), Label::Integer(wn as i64)]
        })
        .collect();

    let index = MultiIndex::from_tuples(
        row_keys,
        vec![
            Some("sample".to_string()),
            Some("concentration".to_string()),
            Some("operator".to_string()),
        ],
    )?;
    let columns = MultiIndex::from_tuples(
        col_keys,
        vec![Some("band".to_string()), Some("wavenumber".to_string())],
    )?;
    let frame = Frame::new(index, columns, rows)?;

    for output_path in ["sample_data.json", "sample_data.csv"] {
        save_file(&frame, Path::new(output_path))?;
        println!(
            "Wrote {} rows x {} columns to {output_path}",
            frame.shape().0,
            frame.shape().1
        );
    }
    Ok(())
}

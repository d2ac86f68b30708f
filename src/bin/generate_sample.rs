use std::path::Path;

use anyhow::{Context, Result};

use ta_analyser::data::writer::save_table;
use ta_analyser::{MeasurementTable, WavelengthColumn};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Baseline the detector reports with the pump blocked.
fn dark_level(wavelength: f64) -> f64 {
    0.002 + 1e-5 * (wavelength - 450.0)
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

/// Build a table over `times` x `wavelengths` from a per-cell model.
fn measure(
    times: &[f64],
    wavelengths: &[f64],
    mut cell: impl FnMut(f64, f64) -> f64,
) -> MeasurementTable {
    let columns = wavelengths
        .iter()
        .map(|&w| {
            let values = times.iter().map(|&t| cell(t, w)).collect();
            WavelengthColumn::new(format!("{w:.1}"), w, values)
        })
        .collect();
    MeasurementTable::new("Time (ps)", times.to_vec(), columns)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // Signal: 450–650 nm, -5 → 100 ps. Reference grid is shifted on both axes
    // so only part of it overlaps.
    let signal_waves: Vec<f64> = (0..=200).map(|i| 450.0 + i as f64).collect();
    let signal_times: Vec<f64> = (0..=210).map(|i| -5.0 + i as f64 * 0.5).collect();
    let reference_waves: Vec<f64> = (0..=200).map(|i| 460.0 + i as f64).collect();
    let reference_times: Vec<f64> = (0..=190).map(|i| -5.0 + i as f64 * 0.5).collect();

    // Excited-state absorption band decaying with a 20 ps lifetime.
    let band = [(540.0, 25.0, 0.05), (610.0, 15.0, -0.02)];
    let tau = 20.0;

    let signal = measure(&signal_times, &signal_waves, |t, w| {
        let decay = if t < 0.0 { 0.0 } else { (-t / tau).exp() };
        let absorption: f64 = band
            .iter()
            .map(|&(mu, sigma, amp)| gaussian(w, mu, sigma, amp))
            .sum();
        dark_level(w) + decay * absorption + rng.gauss(0.0, 0.001)
    });

    let mut rng = SimpleRng::new(7);
    let reference = measure(&reference_times, &reference_waves, |_, w| {
        dark_level(w) + rng.gauss(0.0, 0.0005)
    });

    for (table, name) in [(&signal, "signal.csv"), (&reference, "reference_dark.csv")] {
        save_table(table, Path::new(name), b',').with_context(|| format!("writing {name}"))?;
        println!(
            "Wrote {name}: {} time points x {} wavelengths",
            table.len(),
            table.width()
        );
    }
    Ok(())
}

use std::path::Path;

use anyhow::{Context, Result};

use hexel_spectra::data::loader::save_trace;
use hexel_spectra::SpectrumTrace;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn generate_spectrum(
    wavelengths: &[f64],
    peak: Option<(f64, f64, f64)>,
    background: f64,
    noise: &mut DetectorNoise,
) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&wl| {
            let signal = peak
                .map(|(mu, sigma, amp)| gaussian(wl, mu, sigma, amp))
                .unwrap_or(0.0);
            background + signal + noise.sample()
        })
        .collect()
}

/// Seeded read noise of a spectrometer pixel row, in counts.
///
/// splitmix64 drives a polar Box-Muller draw; the second deviate of each
/// pair is kept for the next pixel.
struct DetectorNoise {
    counter: u64,
    read_noise: f64,
    spare: Option<f64>,
}

impl DetectorNoise {
    fn new(seed: u64, read_noise: f64) -> Self {
        Self {
            counter: seed,
            read_noise,
            spare: None,
        }
    }

    fn next_bits(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.counter;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in (-1, 1).
    fn symmetric_unit(&mut self) -> f64 {
        let unit = (self.next_bits() >> 11) as f64 / (1u64 << 53) as f64;
        2.0 * unit - 1.0
    }

    fn standard_normal(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        loop {
            let (u, v) = (self.symmetric_unit(), self.symmetric_unit());
            let r2 = u * u + v * v;
            if r2 > 0.0 && r2 < 1.0 {
                let scale = (-2.0 * r2.ln() / r2).sqrt();
                self.spare = Some(v * scale);
                return u * scale;
            }
        }
    }

    /// One pixel's worth of noise.
    fn sample(&mut self) -> f64 {
        self.read_noise * self.standard_normal()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let mut noise = DetectorNoise::new(42, 8.0);

    // Spectrometer axis: 400 → 500 nm, step 0.1
    let wavelengths: Vec<f64> = (0..=1000).map(|i| 400.0 + i as f64 * 0.1).collect();

    let duty_cycles = [10.0, 20.0, 40.0, 50.0, 60.0, 80.0, 90.0, 99.0];
    let emitters = 6;
    // Emitter 5 is wired open: background only.
    let broken = 5;

    let run = Path::new("Hexel1000001-sample");
    let mut files = 0;

    for e in 0..emitters {
        let folder = run.join(format!("emitter-{e}"));
        std::fs::create_dir_all(&folder)
            .with_context(|| format!("creating {}", folder.display()))?;

        for &dc in &duty_cycles {
            // Self-heating pushes the peak red as the duty cycle rises.
            let center = 442.0 + 0.3 * e as f64 + 0.02 * dc;
            let peak = (e != broken).then_some((center, 1.8, 4000.0 + 200.0 * e as f64));
            let y = generate_spectrum(&wavelengths, peak, 600.0, &mut noise);

            let trace = SpectrumTrace::new(wavelengths.clone(), y)?;
            save_trace(&folder.join(format!("dc-{dc}.csv")), &trace)?;
            files += 1;
        }
    }

    println!(
        "Wrote {files} spectra ({} wavelengths each) to {}",
        wavelengths.len(),
        run.display()
    );
    Ok(())
}

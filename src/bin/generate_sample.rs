//! Write synthetic walltime/energy CSVs for the `walltime` preset.
//!
//! Usage: generate_sample [OUTPUT_DIR]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use qmc_plot::config::WALLTIME_RUNS;
use qmc_plot::UFloat;

/// Energies each run converges to, in `WALLTIME_RUNS` order.
const TARGET_ENERGIES: [f64; 3] = [-2.2462, -2.2455, -2.2471];

/// Error bar of a run after one minute of walltime.
const INITIAL_ERROR: f64 = 0.02;

const POINTS_PER_RUN: usize = 20;

/// One DMC run: the statistical error shrinks like 1/sqrt(walltime).
fn generate_run(target: f64, rng: &mut SimpleRng) -> Vec<(f64, UFloat)> {
    (1..=POINTS_PER_RUN)
        .map(|i| {
            let walltime = 600.0 * i as f64;
            let sigma = INITIAL_ERROR / (walltime / 60.0).sqrt();
            let energy = target + rng.gauss(0.0, sigma);
            (walltime, UFloat::new(energy, sigma))
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

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    for (&(file, style), target) in WALLTIME_RUNS.iter().zip(TARGET_ENERGIES) {
        let path = out_dir.join(file);
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;

        wtr.write_record(["walltime", "energy"])?;
        let run = generate_run(target, &mut rng);
        for (walltime, energy) in &run {
            wtr.write_record([format!("{walltime:.0}"), energy.format_shorthand(1)])?;
        }
        wtr.flush()?;

        log::info!("{style}: {} rows converging to {target}", run.len());
        println!("Wrote {} rows to {}", run.len(), path.display());
    }
    Ok(())
}

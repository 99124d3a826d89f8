//! Synthetic audio generation for tests.
//!
//! Deterministic signals only; nothing here touches the file system.

use std::f32::consts::PI;

/// Generate a sine wave.
pub fn generate_sine(frequency: f32, sample_rate: u32, duration: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Generate a single punchy kick drum hit (~150 ms, pitch 150→50 Hz).
pub fn generate_kick(sample_rate: u32) -> Vec<f32> {
    let num_samples = (0.15 * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let freq = 50.0 + 100.0 * (-t * 30.0).exp();
            let amp = (-t * 15.0).exp();
            amp * (2.0 * PI * freq * t).sin()
        })
        .collect()
}

/// Generate a 4/4 pattern with kicks on beats 1 and 3.
///
/// Gives the bass-energy path something beat-shaped to react to.
pub fn generate_test_beat(bpm: f32, sample_rate: u32, duration: f32) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;
    let samples_per_beat = (60.0 / bpm * sample_rate as f32) as usize;
    let kick = generate_kick(sample_rate);

    let mut samples = vec![0.0; num_samples];
    let mut pos = 0;
    let mut beat = 0;
    while pos < num_samples {
        if beat % 2 == 0 {
            for (i, &s) in kick.iter().enumerate() {
                if pos + i < num_samples {
                    samples[pos + i] += s * 0.8;
                }
            }
        }
        pos += samples_per_beat;
        beat += 1;
    }

    let max_val = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    if max_val > 1.0 {
        for s in &mut samples {
            *s /= max_val;
        }
    }
    samples
}

//! Example: Render a visualization from synthetic audio.
//!
//! Generates a synthetic beat pattern, composes frames with the default
//! bar visualization, and encodes a short video through ffmpeg.
//!
//! Run with:
//!     RUST_LOG=info cargo run --example render_synthetic

use std::path::PathBuf;

use anyhow::{Context, Result};

use chromabeat::audio::synth::generate_test_beat;
use chromabeat::audio::{AudioData, AudioGraph};
use chromabeat::export::{export_track, ExportFormat, ExportPlan, ExportQuality};
use chromabeat::meta::AudioMetadata;
use chromabeat::pipeline::FrameComposer;
use chromabeat::settings::VisualizerSettings;

fn main() -> Result<()> {
    env_logger::init();

    println!("ChromaBeat - Synthetic Audio Example");
    println!("====================================\n");

    // Generate synthetic audio (120 BPM beat, 5 seconds)
    let sample_rate: u32 = 44_100;
    let duration_secs: f32 = 5.0;
    let bpm: f32 = 120.0;

    println!("Generating synthetic beat...");
    println!("  Sample rate: {} Hz", sample_rate);
    println!("  Duration: {} seconds", duration_secs);
    println!("  BPM: {}", bpm);

    let audio = AudioData {
        samples: generate_test_beat(bpm, sample_rate, duration_secs),
        sample_rate,
        channels: 1,
    };
    println!("  Generated {} samples\n", audio.samples.len());

    let mut graph = AudioGraph::new();
    graph.connect(&audio);

    let settings = VisualizerSettings::default();
    let mut composer = FrameComposer::new(settings);
    composer.set_metadata(Some(AudioMetadata::default().with_title("Synthetic Demo")));

    let plan = ExportPlan {
        title: "synthetic_demo".to_string(),
        quality: ExportQuality::P720,
        format: ExportFormat::Mp4,
        fps: 30,
        output_dir: PathBuf::from("."),
        audio_path: None,
        is_pro: false,
    };

    println!("Encoding video to: {}", plan.output_path().display());
    println!("  Quality: {}", plan.quality.label());
    println!("  FPS: {}", plan.fps);

    let report = export_track(&mut composer, &mut graph, &plan)
        .context("export failed (is ffmpeg on PATH?)")?;

    println!("\nDone! Wrote {} frames.", report.frames_written);
    println!("Play with: ffplay {}", report.path.display());

    Ok(())
}

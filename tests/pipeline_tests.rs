//! End-to-end tests over the composition and export pipeline.

use chromabeat::audio::synth::generate_test_beat;
use chromabeat::audio::{AudioData, AudioGraph};
use chromabeat::background::BackgroundAsset;
use chromabeat::export::{
    ExportFormat, ExportPhase, ExportPlan, ExportQuality, Exporter, MemorySink,
};
use chromabeat::pipeline::{FrameComposer, RenderLoop};
use chromabeat::settings::{AspectRatio, FilterKind, VisualizerSettings, VizMode};
use image::{Rgba, RgbaImage};

fn beat_graph(seconds: f32) -> AudioGraph {
    let audio = AudioData {
        samples: generate_test_beat(120.0, 44_100, seconds),
        sample_rate: 44_100,
        channels: 1,
    };
    let mut graph = AudioGraph::new();
    graph.connect(&audio);
    graph
}

#[test]
fn test_compose_produces_frames_at_configured_resolution() {
    let mut composer = FrameComposer::new(VisualizerSettings::default());
    let mut graph = beat_graph(1.0);
    graph.seek(0.25);

    let surface = composer.compose(&graph);
    assert_eq!(surface.dimensions(), (1920, 1080));
    assert_eq!(surface.pixels().len(), 1920 * 1080 * 4);
}

#[test]
fn test_compose_is_deterministic_for_same_playhead() {
    let mut settings = VisualizerSettings::default();
    settings.mode = VizMode::Circle;
    settings.filter = FilterKind::Vintage;

    let mut graph = beat_graph(1.0);
    graph.seek(0.5);

    let mut a = FrameComposer::new(settings.clone());
    let mut b = FrameComposer::new(settings);
    assert_eq!(a.compose(&graph).pixels(), b.compose(&graph).pixels());
}

#[test]
fn test_compose_draws_visualization_on_beat() {
    let mut graph = beat_graph(1.0);
    graph.seek(0.02); // inside the first kick

    let mut composer = FrameComposer::new(VisualizerSettings::default());
    let surface = composer.compose(&graph);
    let lit = surface
        .pixels()
        .chunks(4)
        .filter(|p| p[0] > 0 || p[1] > 0 || p[2] > 0)
        .count();
    assert!(lit > 0, "expected bars on the kick transient");
}

#[test]
fn test_background_cover_fit_on_square_canvas() {
    let mut settings = VisualizerSettings::default();
    settings.aspect_ratio = AspectRatio::Square;
    let mut composer = FrameComposer::new(settings);

    let token = composer.background.begin_generation();
    let white = RgbaImage::from_pixel(16, 9, Rgba([255, 255, 255, 255]));
    assert!(composer
        .background
        .install(token, BackgroundAsset::Image(white)));

    // trackless graph keeps the visualization out of the corner samples
    let graph = AudioGraph::new();
    let surface = composer.compose(&graph);
    assert_eq!(surface.dimensions(), (1080, 1080));
    // cover fit leaves no black corners under the scrim
    for (x, y) in [(2u32, 2u32), (1077, 2), (2, 1077), (1077, 1077)] {
        let [r, ..] = surface.get_pixel(x, y);
        assert!(r > 80, "corner ({x},{y}) not covered, r={r}");
    }
}

#[test]
fn test_stale_background_never_shows() {
    let mut composer = FrameComposer::new(VisualizerSettings::default());
    let stale = composer.background.begin_generation();
    let fresh = composer.background.begin_generation();

    let white = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
    assert!(!composer
        .background
        .install(stale, BackgroundAsset::Image(white)));

    let graph = AudioGraph::new();
    let surface = composer.compose(&graph);
    assert!(surface.pixels().chunks(4).all(|p| p[0] == 0));

    let black = RgbaImage::from_pixel(8, 8, Rgba([10, 10, 10, 255]));
    assert!(composer
        .background
        .install(fresh, BackgroundAsset::Image(black)));
}

#[test]
fn test_render_loop_teardown_mid_track() {
    let mut composer = FrameComposer::new(VisualizerSettings::default());
    let mut graph = beat_graph(2.0);
    let mut render_loop = RenderLoop::new(30);
    let handle = render_loop.handle();

    let mut seen = 0u32;
    let frames = render_loop.render_offline(&mut composer, &mut graph, 2.0, |_| {
        seen += 1;
        if seen == 10 {
            handle.stop();
        }
    });
    assert_eq!(frames, 10);
    assert!(!graph.is_playing());
}

#[test]
fn test_export_file_surfaces_decode_errors() {
    let plan = ExportPlan {
        title: "Missing".into(),
        quality: ExportQuality::P720,
        format: ExportFormat::WebM,
        fps: 30,
        output_dir: std::env::temp_dir(),
        audio_path: None,
        is_pro: false,
    };
    let err = chromabeat::export_file(
        std::path::Path::new("/nonexistent/track.mp3"),
        VisualizerSettings::default(),
        &plan,
    )
    .unwrap_err();
    assert!(matches!(err, chromabeat::PipelineError::Audio(_)));
}

#[test]
fn test_export_through_pipeline_counts_frames() {
    let mut composer = FrameComposer::new(VisualizerSettings::default());
    let mut graph = beat_graph(1.0);
    let plan = ExportPlan {
        title: "Beat Demo".into(),
        quality: ExportQuality::P720,
        format: ExportFormat::WebM,
        fps: 30,
        output_dir: std::env::temp_dir(),
        audio_path: None,
        is_pro: false,
    };

    let mut exporter = Exporter::new();
    assert!(exporter
        .start_with_sink(&plan, Box::new(MemorySink::new()))
        .unwrap());

    graph.seek(0.0);
    let mut render_loop = RenderLoop::new(plan.fps);
    let mut failed = false;
    let frames = render_loop.render_offline(&mut composer, &mut graph, 1.5, |surface| {
        if exporter.write_frame(surface.pixels()).is_err() {
            failed = true;
        }
    });
    assert!(!failed);

    let report = exporter.finish().unwrap();
    // 1 s track stops the clock before the requested 1.5 s elapse
    assert_eq!(report.frames_written, frames);
    assert!(frames >= 29 && frames <= 31, "{frames}");
    assert_eq!(exporter.phase(), ExportPhase::Idle);
}

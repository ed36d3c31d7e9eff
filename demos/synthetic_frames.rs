// demos/synthetic_frames.rs
//
// Drive the pipeline with a synthetic moving scene and print per-frame reports.
//
// Usage:
//   cargo run --example synthetic_frames --release
//   cargo run --example synthetic_frames --release -- color 120
//   RUST_LOG=debug cargo run --example synthetic_frames
//
// Arguments: [threshold|color|diff] [frames]
//
// The scene is a bright gradient with a dark square drifting right and a
// blue and an orange square drifting down. Halfway through, the demo sends
// the reset signal, which flips threshold segmentation to manual mode.

use frameseg::change::ChromaColor;
use frameseg::convert::bgr_pixel_to_ycbcr;
use frameseg::image::Image;
use frameseg::overlay::DrawList;
use frameseg::region::RunLabeler;
use frameseg::{Pipeline, PipelineConfig, Polarity, Segmentation};

use std::env;

const BLUE: [u8; 3] = [200, 40, 20];
const ORANGE: [u8; 3] = [20, 120, 230];
const MANUAL_THRESHOLD: u8 = 90;

fn render(w: usize, h: usize, t: usize) -> Image<[u8; 3]> {
    let mut img = Image::from_fn(w, h, |x, _| {
        let v = (170 + x * 60 / w) as u8;
        [v, v, v]
    });
    let mut paint = |left: usize, top: usize, size: usize, color: [u8; 3]| {
        for y in top..(top + size).min(h - 2) {
            for x in left..(left + size).min(w - 2) {
                img.set(x, y, color);
            }
        }
    };
    paint((40 + 6 * t) % (w - 80), 60, 48, [30, 30, 30]);
    paint(300, (20 + 4 * t) % (h - 60), 40, BLUE);
    paint(520, (200 + 3 * t) % (h - 60), 32, ORANGE);
    img
}

fn main() {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")
        .and_then(|logger| logger.start())
        .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"));

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("threshold");
    let frames: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(60);

    let segmentation = match mode {
        "threshold" => Segmentation::Threshold { polarity: Polarity::Dark },
        "color" => Segmentation::Color {
            palette: vec![
                ChromaColor::of(bgr_pixel_to_ycbcr(BLUE)),
                ChromaColor::of(bgr_pixel_to_ycbcr(ORANGE)),
            ],
            max_distance: 24,
        },
        "diff" => Segmentation::BackgroundDifference { threshold: 30 },
        other => {
            eprintln!("Usage: {} [threshold|color|diff] [frames]", args[0]);
            eprintln!("  unknown mode '{other}'");
            std::process::exit(1);
        }
    };

    let config = PipelineConfig {
        segmentation,
        ..Default::default()
    };
    let (w, h) = (config.width, config.height);
    let mut pipeline = match Pipeline::new(config) {
        Ok(p) => p,
        Err(e) => {
            log::error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let mut labeler = RunLabeler::new();
    let mut overlay = DrawList::new();
    let mut total_ms = 0.0f64;

    for step in 1..=frames {
        if step == frames / 2 {
            pipeline.reset();
        }
        let frame = render(w, h, step as usize);
        overlay.clear();
        let report = pipeline.process_frame(step, &frame, MANUAL_THRESHOLD, &mut labeler, &mut overlay);
        total_ms += report.elapsed.as_secs_f64() * 1e3;

        println!("{report}");
        for r in &report.regions {
            println!(
                "    {:?} area={} box=({},{})-({},{}) centroid=({:.1},{:.1})",
                r.label, r.area, r.bbox.left, r.bbox.top, r.bbox.right, r.bbox.bottom, r.centroid.0, r.centroid.1,
            );
        }
        log::debug!("{} draw commands", overlay.commands().len());
    }

    println!(
        "{frames} frames, mean {:.2} ms/frame",
        total_ms / frames.max(1) as f64
    );
}

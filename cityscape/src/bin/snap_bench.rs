use cityscape::{LineSegment, Point, SegmentLayer, SnapConfig, SnapEngine};
use std::time::Instant;

// Street grid: horizontal and vertical roads every `spacing` units
fn build_street_grid(segments_target: usize, spacing: f64) -> Vec<LineSegment> {
    let side = 120usize;
    let mut segs = Vec::with_capacity(segments_target);
    'outer: for j in 0..side {
        for i in 0..(side - 1) {
            let y = j as f64 * spacing;
            let (x0, x1) = (i as f64 * spacing, (i + 1) as f64 * spacing);
            segs.push(LineSegment::new(Point::new(x0, y), Point::new(x1, y), format!("h{}", j), "road"));
            segs.push(LineSegment::new(Point::new(y, x0), Point::new(y, x1), format!("v{}", j), "road"));
            if segs.len() >= segments_target {
                break 'outer;
            }
        }
    }
    segs
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut segments = 5000usize;
    let mut queries = 10000usize;
    let mut threshold = 15.0f64;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val) = a.strip_prefix("--segments=") { if let Ok(v) = val.parse() { segments = v; } }
        else if let Some(val) = a.strip_prefix("--queries=") { if let Ok(v) = val.parse() { queries = v; } }
        else if let Some(val) = a.strip_prefix("--threshold=") { if let Ok(v) = val.parse() { threshold = v; } }
        else if let Some(val) = a.strip_prefix("--assert-ms=") { if let Ok(v) = val.parse() { assert_ms = Some(v); } }
    }

    let t_build = Instant::now();
    let mut engine = SnapEngine::new(SnapConfig { threshold, ..SnapConfig::default() });
    engine.register_provider("roads", Box::new(SegmentLayer::new(build_street_grid(segments, 40.0))));
    let build_ms = t_build.elapsed().as_secs_f64() * 1000.0;

    let mut times_ms: Vec<f64> = Vec::with_capacity(queries);
    let start_all = Instant::now();
    let mut hits = 0usize;
    for k in 0..queries {
        let x = (k % 100) as f64 * 40.0 + 3.1;
        let y = ((k / 100) % 100) as f64 * 40.0 + 2.7;
        let t0 = Instant::now();
        if engine.find_snap_point(x, y).best.is_some() { hits += 1; }
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
    times_ms.sort_by(|a, b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let p99 = percentile(&times_ms, 0.99);
    println!(
        "segments={} cells={} queries={} threshold={} hits={} build_ms={:.3} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}",
        engine.index().len(), engine.index().occupied_cells(), queries, threshold, hits, build_ms, dur_all, med, p90, p99
    );
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}

use linkage::config::PropagationPolicy;
use linkage::Linkage;
use std::time::Instant;

fn build_ring(points: usize) -> (Linkage, Vec<u32>) {
    let mut g = Linkage::new();
    let mut ids = Vec::with_capacity(points);
    for i in 0..points { let a = i as f64 / points as f64 * std::f64::consts::TAU; ids.push(g.add_point(400.0 + 300.0*a.cos(), 400.0 + 300.0*a.sin())); }
    for i in 0..points { g.add_segment(ids[i], ids[(i+1)%points], true); }
    (g, ids)
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    let args: Vec<String> = std::env::args().collect();
    let mut points = 2000usize;
    let mut moves = 1000usize;
    let mut policy = PropagationPolicy::PathLocked;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--points=") { if let Ok(v)=val.parse() { points=v; } }
        else if let Some(val)=a.strip_prefix("--moves=") { if let Ok(v)=val.parse() { moves=v; } }
        else if a == "--visit-once" { policy = PropagationPolicy::VisitOnce; }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }
    let points = points.max(3);

    let (mut g, ids) = build_ring(points);
    g.set_policy(policy);
    log::info!("ring of {} points, {} moves, {:?}", points, moves, policy);
    let mut times_ms: Vec<f64> = Vec::with_capacity(moves);
    let start_all = Instant::now();
    let mut pulled = 0usize;
    for k in 0..moves {
        let id = ids[k % ids.len()];
        let (x, y) = match g.get_point(id) { Some(p) => p, None => continue };
        let t0 = Instant::now();
        if let Some(r) = g.move_point_report(id, x + 0.5, y - 0.25) { pulled += r.moved.len(); }
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
    times_ms.sort_by(|a,b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let p99 = percentile(&times_ms, 0.99);
    println!("points={} moves={} policy={:?} pulled={} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}", points, moves, policy, pulled, dur_all, med, p90, p99);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}

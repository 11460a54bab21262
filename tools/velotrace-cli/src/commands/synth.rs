//! Generate a synthetic constant-velocity sample stream.

use velotrace_core::{PointerSample, Position};

pub fn run(vx: f32, vy: f32, samples: u32, interval_ms: u64, id: u32) -> anyhow::Result<()> {
    for step in 0..samples as u64 {
        let t_ns = step * interval_ms * 1_000_000;
        let t_secs = t_ns as f32 / 1_000_000_000.0;
        let sample = PointerSample::single(t_ns, id, Position::new(vx * t_secs, vy * t_secs));
        println!("{}", serde_json::to_string(&sample)?);
    }
    Ok(())
}

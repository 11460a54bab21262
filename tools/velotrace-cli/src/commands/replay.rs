//! Replay a recorded JSONL sample stream through a velocity tracker.

use std::path::PathBuf;

use velotrace_common::config::AppConfig;
use velotrace_core::{
    PointerIdSet, PointerSample, StrategyKind, TrackerConfig, VelocityTracker,
};

pub fn run(
    path: PathBuf,
    strategy: &str,
    only_id: Option<u32>,
    per_sample: bool,
) -> anyhow::Result<()> {
    let kind: StrategyKind = strategy
        .parse()
        .map_err(|e| anyhow::anyhow!("bad --strategy: {e}"))?;

    let content = std::fs::read_to_string(&path)
        .map_err(|_| anyhow::anyhow!("Sample file not found: {}", path.display()))?;
    let samples = parse_samples(&content)?;

    println!("Replaying {} samples from {}", samples.len(), path.display());

    let config = TrackerConfig::from_defaults(&AppConfig::load().tracker);
    let mut tracker = VelocityTracker::with_config(kind, &config);

    let mut seen_ids = PointerIdSet::EMPTY;
    for sample in &samples {
        tracker.add_movement(sample.event_time_ns, sample.pointer_ids, &sample.positions);
        for id in sample.pointer_ids.iter() {
            seen_ids.insert(id);
        }

        if per_sample {
            for id in sample.pointer_ids.iter() {
                if only_id.is_some_and(|wanted| wanted != id) {
                    continue;
                }
                match tracker.velocity(id) {
                    Some(v) => println!(
                        "  t={:>12}ns id={id} vx={:>9.1} vy={:>9.1}",
                        sample.event_time_ns, v.x, v.y
                    ),
                    None => println!("  t={:>12}ns id={id} (no estimate)", sample.event_time_ns),
                }
            }
        }
    }

    println!("Final estimates:");
    for id in seen_ids.iter() {
        if only_id.is_some_and(|wanted| wanted != id) {
            continue;
        }
        match tracker.estimator(id) {
            Some(est) => {
                let v = est.velocity();
                println!(
                    "  id={id} degree={} confidence={:.3} vx={:.1} vy={:.1}",
                    est.degree,
                    est.confidence,
                    v.map_or(0.0, |v| v.x),
                    v.map_or(0.0, |v| v.y),
                );
            }
            None => println!("  id={id} (no data)"),
        }
    }

    Ok(())
}

/// Parse a JSONL sample stream, skipping header/comment lines (starting
/// with `#`) and blank lines.
///
/// Recorded files are data, not callers: a sample whose `pos` array does not
/// line up with its id set is rejected here with the offending line number
/// rather than being fed to the tracker.
fn parse_samples(content: &str) -> anyhow::Result<Vec<PointerSample>> {
    let mut samples = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let sample: PointerSample = serde_json::from_str(line)
            .map_err(|e| anyhow::anyhow!("line {}: failed to parse sample: {e}", index + 1))?;
        if sample.positions.len() != sample.pointer_ids.count() {
            anyhow::bail!(
                "line {}: {} positions for {} pointer ids",
                index + 1,
                sample.positions.len(),
                sample.pointer_ids.count()
            );
        }
        samples.push(sample);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "# header\n\
                       {\"t\":0,\"ids\":1,\"pos\":[{\"x\":0.0,\"y\":0.0}]}\n\
                       \n\
                       {\"t\":8000000,\"ids\":1,\"pos\":[{\"x\":8.0,\"y\":0.0}]}\n";
        let samples = parse_samples(content).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].event_time_ns, 8_000_000);
    }

    #[test]
    fn test_parse_rejects_misaligned_positions() {
        // Two ids, one position: must fail with the line number, not panic
        // later inside the tracker.
        let content = "# header\n\
                       {\"t\":0,\"ids\":3,\"pos\":[{\"x\":0.0,\"y\":0.0}]}\n";
        let err = parse_samples(content).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
        assert!(err.to_string().contains("1 positions for 2 pointer ids"), "{err}");
    }

    #[test]
    fn test_parse_reports_malformed_json_line() {
        let err = parse_samples("not json\n").unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");
    }
}

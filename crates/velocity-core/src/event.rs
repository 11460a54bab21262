//! Pointer sample and event types.
//!
//! A [`PointerSample`] is one time step of input: a timestamp, the set of
//! contacts present, and one position per contact ordered by ascending id.
//! Samples serialize as compact JSONL records so that recorded streams can
//! be replayed offline.

use serde::{Deserialize, Serialize};

use crate::pointer::{PointerIdSet, Position};

/// One time step of pointer data.
///
/// Invariant: `positions.len() == pointer_ids.count()`, with positions
/// ordered by ascending pointer id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Event time in nanoseconds on the input source's monotonic clock.
    #[serde(rename = "t")]
    pub event_time_ns: u64,

    /// Which pointer ids are present in this sample.
    #[serde(rename = "ids")]
    pub pointer_ids: PointerIdSet,

    /// One position per present id, ascending id order.
    #[serde(rename = "pos")]
    pub positions: Vec<Position>,
}

impl PointerSample {
    pub fn new(event_time_ns: u64, pointer_ids: PointerIdSet, positions: Vec<Position>) -> Self {
        assert_eq!(
            positions.len(),
            pointer_ids.count(),
            "positions must align 1:1 with pointer ids"
        );
        Self {
            event_time_ns,
            pointer_ids,
            positions,
        }
    }

    /// Convenience constructor for a single-pointer sample.
    pub fn single(event_time_ns: u64, id: u32, position: Position) -> Self {
        Self::new(event_time_ns, PointerIdSet::from_ids(&[id]), vec![position])
    }
}

/// An input event as delivered by an event source: zero or more historical
/// sub-samples batched into the event (oldest first), plus the event's final
/// sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Historical sub-samples, oldest first.
    #[serde(default)]
    pub historical: Vec<PointerSample>,

    /// The event's final sample.
    pub sample: PointerSample,
}

impl PointerEvent {
    /// An event with no batched history.
    pub fn from_sample(sample: PointerSample) -> Self {
        Self {
            historical: Vec::new(),
            sample,
        }
    }

    /// All samples in replay order: historical sub-samples oldest first,
    /// then the final sample.
    pub fn samples(&self) -> impl Iterator<Item = &PointerSample> {
        self.historical.iter().chain(std::iter::once(&self.sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_json_round_trip() {
        let sample = PointerSample::new(
            16_000_000,
            PointerIdSet::from_ids(&[0, 2]),
            vec![Position::new(1.0, 2.0), Position::new(3.0, 4.0)],
        );

        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"t\":16000000"));
        let back: PointerSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_event_replay_order() {
        let event = PointerEvent {
            historical: vec![
                PointerSample::single(1, 0, Position::new(0.0, 0.0)),
                PointerSample::single(2, 0, Position::new(1.0, 0.0)),
            ],
            sample: PointerSample::single(3, 0, Position::new(2.0, 0.0)),
        };

        let times: Vec<u64> = event.samples().map(|s| s.event_time_ns).collect();
        assert_eq!(times, vec![1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "align 1:1")]
    fn test_mismatched_positions_panic() {
        PointerSample::new(0, PointerIdSet::from_ids(&[0, 1]), vec![Position::default()]);
    }
}

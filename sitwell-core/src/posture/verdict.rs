//! Priority-ordered posture verdict
//!
//! Each rule either decides the verdict for the tick or passes to the next
//! one. The first rule that decides wins; if none does, every channel is
//! consistent.

use heapless::Vec;

use super::{ChairPresenceDetector, DriftDetector, ZonePostureClassifier};
use crate::state::{EngineEvent, MAX_EVENTS};
use crate::stats::SensorChannel;

/// Outcome of one tick's classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PostureVerdict {
    /// No seat channel is loaded
    AbsentFromSeat,
    /// Zone reads empty
    ZoneIncorrect(u8),
    /// At least one window is still filling
    Warming,
    /// Channel scored below the consistency threshold, or its read failed
    Inconsistent(u8),
    /// Channel median moved away from its baseline
    Drifted(u8),
    /// Every channel is consistent
    Consistent,
}

/// Everything the rules look at for one tick
pub struct Evaluation<'a> {
    pub channels: &'a [SensorChannel],
    pub presence: &'a ChairPresenceDetector,
    pub zones: &'a ZonePostureClassifier,
    pub drift: &'a DriftDetector,
    pub consistency_threshold: f32,
    pub mad_multiplier: f32,
}

type Events = Vec<EngineEvent, MAX_EVENTS>;

type Rule = fn(&Evaluation<'_>, &mut Events) -> Option<PostureVerdict>;

/// Rules in priority order
const RULES: [Rule; 4] = [absent_rule, zone_rule, warmup_rule, channel_rule];

/// Classify one tick
///
/// Channel problems found along the way are appended to `events`.
pub fn evaluate(eval: &Evaluation<'_>, events: &mut Events) -> PostureVerdict {
    RULES
        .iter()
        .find_map(|rule| rule(eval, events))
        .unwrap_or(PostureVerdict::Consistent)
}

fn absent_rule(eval: &Evaluation<'_>, _: &mut Events) -> Option<PostureVerdict> {
    (!eval.presence.is_present(eval.channels)).then_some(PostureVerdict::AbsentFromSeat)
}

fn zone_rule(eval: &Evaluation<'_>, _: &mut Events) -> Option<PostureVerdict> {
    eval.zones
        .first_empty(eval.channels)
        .map(PostureVerdict::ZoneIncorrect)
}

fn warmup_rule(eval: &Evaluation<'_>, _: &mut Events) -> Option<PostureVerdict> {
    eval.channels
        .iter()
        .any(|ch| !ch.is_ready())
        .then_some(PostureVerdict::Warming)
}

/// Checks every channel so all offenders are reported, not just the first
fn channel_rule(eval: &Evaluation<'_>, events: &mut Events) -> Option<PostureVerdict> {
    let mut verdict = None;
    for ch in eval.channels {
        let index = ch.index();

        // Failed read this tick: already reported by the engine
        if ch.latest().is_none() {
            verdict.get_or_insert(PostureVerdict::Inconsistent(index));
            continue;
        }

        if let Some(score) = ch.consistency(eval.mad_multiplier) {
            if score < eval.consistency_threshold {
                let _ = events.push(EngineEvent::ChannelInconsistent {
                    channel: index,
                    score,
                });
                verdict.get_or_insert(PostureVerdict::Inconsistent(index));
            }
        }

        if let Some(delta) = ch.median().and_then(|m| eval.drift.drift(index as usize, m)) {
            let _ = events.push(EngineEvent::ChannelDrifted {
                channel: index,
                delta,
            });
            verdict.get_or_insert(PostureVerdict::Drifted(index));
        }
    }
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZoneConfig;
    use crate::feedback::Color;
    use std::vec::Vec as StdVec;

    struct Fixture {
        channels: StdVec<SensorChannel>,
        presence: ChairPresenceDetector,
        zones: ZonePostureClassifier,
        drift: DriftDetector,
    }

    impl Fixture {
        fn new(values: &[f32]) -> Self {
            let channels = values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let mut ch = SensorChannel::new(i as u8, None, 5);
                    for _ in 0..5 {
                        ch.update(v);
                    }
                    ch
                })
                .collect();
            Self {
                channels,
                presence: ChairPresenceDetector::new(&[0, 1], 0.10),
                zones: ZonePostureClassifier::new(&[ZoneConfig::new(
                    "back",
                    &[2],
                    0.05,
                    Color::Magenta,
                )]),
                drift: DriftDetector::new(0.15),
            }
        }

        fn run(&self) -> (PostureVerdict, Events) {
            let eval = Evaluation {
                channels: &self.channels,
                presence: &self.presence,
                zones: &self.zones,
                drift: &self.drift,
                consistency_threshold: 0.65,
                mad_multiplier: 3.0,
            };
            let mut events = Events::new();
            let verdict = evaluate(&eval, &mut events);
            (verdict, events)
        }
    }

    #[test]
    fn test_consistent() {
        let (verdict, events) = Fixture::new(&[0.5, 0.5, 0.5]).run();
        assert_eq!(verdict, PostureVerdict::Consistent);
        assert!(events.is_empty());
    }

    #[test]
    fn test_absent_wins_over_everything() {
        let mut f = Fixture::new(&[0.0, 0.0, 0.0]);
        f.channels[2] = SensorChannel::new(2, None, 5);
        f.channels[2].update(0.0);
        assert_eq!(f.run().0, PostureVerdict::AbsentFromSeat);
    }

    #[test]
    fn test_zone_before_warmup() {
        let mut f = Fixture::new(&[0.5, 0.5, 0.0]);
        assert_eq!(f.run().0, PostureVerdict::ZoneIncorrect(0));

        f.channels[1] = SensorChannel::new(1, None, 5);
        f.channels[1].update(0.5);
        assert_eq!(f.run().0, PostureVerdict::ZoneIncorrect(0));
    }

    #[test]
    fn test_warming() {
        let mut f = Fixture::new(&[0.5, 0.5, 0.5]);
        f.channels[1] = SensorChannel::new(1, None, 5);
        f.channels[1].update(0.5);
        assert_eq!(f.run().0, PostureVerdict::Warming);
    }

    #[test]
    fn test_all_inconsistent_channels_reported() {
        let mut f = Fixture::new(&[0.5, 0.5, 0.5]);
        // One spike in a 5-sample window scores 0.8; two spikes score 0.6
        f.channels[1].update(0.95);
        f.channels[1].update(0.9);
        f.channels[2].update(0.1);
        f.channels[2].update(0.9);
        let (verdict, events) = f.run();
        assert_eq!(verdict, PostureVerdict::Inconsistent(1));
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(EngineEvent::is_channel_issue));
    }

    #[test]
    fn test_drift_needs_baseline() {
        let mut f = Fixture::new(&[0.5, 0.5, 0.5]);
        let (verdict, _) = f.run();
        assert_eq!(verdict, PostureVerdict::Consistent);

        f.drift.capture(&f.channels);
        for _ in 0..5 {
            f.channels[0].update(0.8);
        }
        let (verdict, events) = f.run();
        assert_eq!(verdict, PostureVerdict::Drifted(0));
        assert!(matches!(
            events[0],
            EngineEvent::ChannelDrifted { channel: 0, .. }
        ));
    }

    #[test]
    fn test_failed_read_is_inconsistent() {
        let mut f = Fixture::new(&[0.5, 0.5, 0.5]);
        f.channels[2].mark_fault();
        let (verdict, events) = f.run();
        assert_eq!(verdict, PostureVerdict::Inconsistent(2));
        assert!(events.is_empty());
    }
}

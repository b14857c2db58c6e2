use anyhow::{Context, Result};
use deck_config_compiler::{DeckFile, EasingName};
use serde::Serialize;
use swipedeck::{
    deck::config::{ClassifierConfig, DragConfig, ExitConfig, PointerConfig, SettleConfig},
    deck::{DeckTraceSample, Easing},
    Candidate, DeckAction, DeckConfig, DeckController, DeckOutput, NotifyError, PointerDriver,
    PointerSample,
};

use crate::trace::TraceStep;

/// Release debounce and exit motion both settle well inside this window.
const TAIL_FLUSH_MS: u64 = 200;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub ms: u64,
    pub kind: &'static str,
    pub candidate: String,
}

/// Controller snapshot after one trace step, for the JSON log.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceRecord {
    pub now_ms: u64,
    pub phase: String,
    pub display: String,
    pub last_decision: Option<&'static str>,
    pub dx: f32,
    pub dy: f32,
    pub backlog_len: u16,
    pub decision_pending: bool,
}

impl From<DeckTraceSample> for TraceRecord {
    fn from(sample: DeckTraceSample) -> Self {
        Self {
            now_ms: sample.now_ms,
            phase: format!("{:?}", sample.phase),
            display: format!("{:?}", sample.display),
            last_decision: sample.last_decision.map(|decision| decision.label()),
            dx: sample.dx,
            dy: sample.dy,
            backlog_len: sample.backlog_len,
            decision_pending: sample.decision_pending,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReplayReport {
    pub outcomes: Vec<Outcome>,
    pub traces: Vec<TraceRecord>,
}

impl Outcome {
    pub fn csv(&self) -> String {
        format!("outcome,{},{},{}", self.ms, self.kind, self.candidate)
    }
}

pub fn deck_config_from_file(file: &DeckFile) -> DeckConfig {
    let easing = |name: EasingName| match name {
        EasingName::Linear => Easing::Linear,
        EasingName::EaseOutCubic => Easing::EaseOutCubic,
    };
    DeckConfig {
        classifier: ClassifierConfig {
            threshold: file.classifier.threshold,
        },
        drag: DragConfig {
            rotation_max_deg: file.drag.rotation_max_deg,
            rotation_range: file.drag.rotation_range,
            overlay_band: file.drag.overlay_band,
        },
        settle: SettleConfig {
            duration_ms: file.settle.duration_ms,
            easing: easing(file.settle.easing),
        },
        exit: ExitConfig {
            offset: file.exit.offset,
            duration_ms: file.exit.duration_ms,
            easing: easing(file.exit.easing),
        },
        pointer: PointerConfig {
            debounce_down_ms: file.pointer.debounce_down_ms,
            debounce_up_ms: file.pointer.debounce_up_ms,
            move_deadzone: file.pointer.move_deadzone,
        },
    }
}

/// Drives one deck through `steps`. Every pointer sample also counts as a
/// frame, matching a host that polls the pointer once per vsync.
pub fn replay(config: DeckConfig, steps: &[TraceStep]) -> Result<ReplayReport> {
    let notify = |candidate_id: &str| -> Result<(), NotifyError> {
        log::debug!("replay: notify candidate={candidate_id}");
        Ok(())
    };
    let mut deck = DeckController::new(config, notify);
    let mut pointer = PointerDriver::new(config.pointer);
    let mut outcomes = Vec::new();
    let mut traces = Vec::with_capacity(steps.len() + 1);
    let mut last_ms = 0u64;

    for step in steps {
        match step {
            TraceStep::Enqueue(ids) => {
                let out = deck.enqueue(ids.iter().map(|id| Candidate::new(id.as_str())));
                collect(&mut outcomes, last_ms, &out);
            }
            TraceStep::Pointer {
                ms,
                touching,
                x,
                y,
            } => {
                let sample = if *touching {
                    PointerSample::down(*x, *y)
                } else {
                    PointerSample::up()
                };
                drive_pointer(&mut deck, &mut pointer, &mut outcomes, *ms, sample)?;
            }
            TraceStep::Frame(ms) => collect(&mut outcomes, *ms, &deck.tick(*ms)),
            TraceStep::Complete(ms) => {
                collect(&mut outcomes, *ms, &deck.animation_finished(*ms));
            }
            TraceStep::Abandon(ms) => collect(&mut outcomes, *ms, &deck.abandon(*ms)),
        }
        if let Some(ms) = step.ms() {
            last_ms = ms;
        }
        traces.push(TraceRecord::from(deck.trace()));
    }

    // Captured traces often stop right after the finger lifts; flush the
    // release debounce and let any running motion land.
    let tail_ms = last_ms.saturating_add(TAIL_FLUSH_MS);
    drive_pointer(&mut deck, &mut pointer, &mut outcomes, tail_ms, PointerSample::up())?;
    let settle_ms = tail_ms
        .saturating_add(config.exit.duration_ms)
        .saturating_add(config.settle.duration_ms);
    collect(&mut outcomes, settle_ms, &deck.tick(settle_ms));
    traces.push(TraceRecord::from(deck.trace()));

    Ok(ReplayReport { outcomes, traces })
}

fn drive_pointer<N: swipedeck::MatchNotifier>(
    deck: &mut DeckController<N>,
    pointer: &mut PointerDriver,
    outcomes: &mut Vec<Outcome>,
    ms: u64,
    sample: PointerSample,
) -> Result<()> {
    let signals = pointer.tick(ms, sample);
    for signal in signals.signals.into_iter().flatten() {
        let out = deck
            .apply_pointer(ms, signal)
            .with_context(|| format!("pointer signal {signal:?} rejected at {ms} ms"))?;
        collect(outcomes, ms, &out);
    }
    collect(outcomes, ms, &deck.tick(ms));
    Ok(())
}

fn collect(outcomes: &mut Vec<Outcome>, ms: u64, out: &DeckOutput) {
    for action in &out.actions {
        let (kind, candidate) = match action {
            DeckAction::Decided {
                candidate_id,
                decision,
            } => (decision.label(), candidate_id.clone()),
            DeckAction::Notified { candidate_id } => ("notify", candidate_id.clone()),
            DeckAction::Advanced { active } => {
                ("advance", active.clone().unwrap_or_else(|| "-".into()))
            }
            DeckAction::Exhausted => ("exhausted", "-".into()),
            DeckAction::Abandoned { candidate_id } => ("abandoned", candidate_id.clone()),
            DeckAction::PhaseChanged { .. }
            | DeckAction::NotifyFailed { .. }
            | DeckAction::GestureIgnored => continue,
        };
        outcomes.push(Outcome {
            ms,
            kind,
            candidate,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::parse_trace;

    fn kinds(outcomes: &[Outcome]) -> Vec<&'static str> {
        outcomes.iter().map(|o| o.kind).collect()
    }

    fn swipe(dx: f32, start_ms: u64) -> String {
        let mut lines = String::new();
        for (i, x) in [0.0, 0.0, 0.0, dx * 0.5, dx].iter().enumerate() {
            lines.push_str(&format!("pointer,{},1,{},300\n", start_ms + i as u64 * 20, 100.0 + x));
        }
        // Lift, then hold the lift past the release debounce.
        lines.push_str(&format!("pointer,{},0,0,0\n", start_ms + 100));
        lines.push_str(&format!("pointer,{},0,0,0\n", start_ms + 140));
        lines
    }

    #[test]
    fn right_swipe_likes_then_advances() {
        let trace = format!("enqueue,c1,c2\n{}", swipe(200.0, 0));
        let steps = parse_trace(&trace).expect("trace");
        let outcomes = replay(DeckConfig::default(), &steps)
            .expect("replay")
            .outcomes;

        assert_eq!(
            kinds(&outcomes),
            vec!["advance", "like", "notify", "advance"]
        );
        assert_eq!(outcomes[1].candidate, "c1");
        assert_eq!(outcomes[3].candidate, "c2");
        assert!(outcomes[2].ms > outcomes[1].ms);
    }

    #[test]
    fn short_drag_cancels_without_advancing() {
        let trace = format!("enqueue,c1\n{}", swipe(40.0, 0));
        let steps = parse_trace(&trace).expect("trace");
        let outcomes = replay(DeckConfig::default(), &steps)
            .expect("replay")
            .outcomes;

        assert_eq!(kinds(&outcomes), vec!["advance", "cancel"]);
    }

    #[test]
    fn left_swipe_on_last_card_exhausts() {
        let trace = format!("enqueue,c1\n{}", swipe(-220.0, 0));
        let steps = parse_trace(&trace).expect("trace");
        let outcomes = replay(DeckConfig::default(), &steps)
            .expect("replay")
            .outcomes;

        assert_eq!(
            kinds(&outcomes),
            vec!["advance", "pass", "advance", "exhausted"]
        );
        assert_eq!(outcomes[2].candidate, "-");
    }

    #[test]
    fn abandon_mid_exit_keeps_candidate() {
        let trace = format!("enqueue,c1\n{}abandon,160\n", swipe(220.0, 0));
        let steps = parse_trace(&trace).expect("trace");
        let outcomes = replay(DeckConfig::default(), &steps)
            .expect("replay")
            .outcomes;

        assert_eq!(kinds(&outcomes), vec!["advance", "like", "abandoned"]);
        assert_eq!(outcomes[2].csv(), "outcome,160,abandoned,c1");
    }

    #[test]
    fn every_step_leaves_a_trace_record() {
        let trace = format!("enqueue,c1,c2\n{}", swipe(-180.0, 0));
        let steps = parse_trace(&trace).expect("trace");
        let report = replay(DeckConfig::default(), &steps).expect("replay");

        assert_eq!(report.traces.len(), steps.len() + 1);
        let released = &report.traces[steps.len() - 1];
        assert_eq!(released.now_ms, 140);
        assert_eq!(released.phase, "ExitingLeft");
        assert_eq!(released.last_decision, Some("pass"));
        assert!(released.decision_pending);
        assert_eq!(released.backlog_len, 1);

        let settled = report.traces.last().expect("tail record");
        assert_eq!(settled.phase, "Idle");
        assert_eq!(settled.display, "Active");
        assert!(!settled.decision_pending);
        assert_eq!(settled.backlog_len, 0);
    }

    #[test]
    fn abandon_with_finger_down_replays_cleanly() {
        let steps = parse_trace(
            "enqueue,c1,c2\n\
             pointer,0,1,100,300\n\
             pointer,40,1,100,300\n\
             pointer,60,1,160,300\n\
             abandon,70\n\
             pointer,90,0,0,0\n\
             pointer,140,0,0,0\n",
        )
        .expect("trace");
        let outcomes = replay(DeckConfig::default(), &steps)
            .expect("lifting the finger after abandon is not a protocol violation")
            .outcomes;

        assert_eq!(kinds(&outcomes), vec!["advance"]);
    }

    #[test]
    fn file_config_maps_onto_deck_config() {
        let file = deck_config_compiler::parse_deck_str(
            r#"
[classifier]
threshold = 60.0

[drag]
rotation_max_deg = 20.0
rotation_range = 200.0
overlay_band = 100.0

[settle]
duration_ms = 150
easing = "linear"

[exit]
offset = 400.0
duration_ms = 180
easing = "ease_out_cubic"

[pointer]
debounce_down_ms = 20
debounce_up_ms = 25
move_deadzone = 2.0
"#,
        )
        .expect("parse");
        let config = deck_config_from_file(&file);

        assert_eq!(config.classifier.threshold, 60.0);
        assert_eq!(config.settle.easing, Easing::Linear);
        assert_eq!(config.exit.easing, Easing::EaseOutCubic);
        assert_eq!(config.pointer.debounce_up_ms, 25);

        let steps = parse_trace(&format!("enqueue,c1\n{}", swipe(80.0, 0))).expect("trace");
        let outcomes = replay(config, &steps).expect("replay").outcomes;
        assert_eq!(outcomes[1].kind, "like");
    }
}

use core::fmt;

use super::{
    animator::{AnimatorOutput, AnimatorSignal, TransitionAnimator},
    classify::classify,
    config::DeckConfig,
    gesture::{GestureError, GestureSampler},
    queue::CandidateQueue,
    trace::DeckTraceSample,
    types::{
        AnimationPhase, Candidate, CandidateId, CardTransform, DeckAction, DeckOutput, Decision,
        Displacement, DisplayState,
    },
};
use crate::pointer::PointerSignal;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotifyError(pub String);

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match notification failed: {}", self.0)
    }
}

impl std::error::Error for NotifyError {}

/// Receives finalized Like decisions. Retry policy, if any, lives here and
/// not in the deck.
pub trait MatchNotifier {
    fn notify(&mut self, candidate_id: &str) -> Result<(), NotifyError>;
}

impl<F> MatchNotifier for F
where
    F: FnMut(&str) -> Result<(), NotifyError>,
{
    fn notify(&mut self, candidate_id: &str) -> Result<(), NotifyError> {
        (self)(candidate_id)
    }
}

#[derive(Debug)]
pub enum DeckError {
    Gesture(GestureError),
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gesture(_) => f.write_str("gesture protocol violation"),
        }
    }
}

impl std::error::Error for DeckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gesture(err) => Some(err),
        }
    }
}

impl From<GestureError> for DeckError {
    fn from(value: GestureError) -> Self {
        Self::Gesture(value)
    }
}

#[derive(Clone, Debug)]
struct PendingDecision {
    candidate_id: CandidateId,
    decision: Decision,
}

/// Orchestrates one deck: gestures in, decisions out. A committed decision
/// is only finalized (notify, advance) once its exit animation completes.
pub struct DeckController<N> {
    config: DeckConfig,
    queue: CandidateQueue,
    sampler: GestureSampler,
    animator: TransitionAnimator,
    notifier: N,
    pending: Option<PendingDecision>,
    swallowing_gesture: bool,
    trace: DeckTraceSample,
}

impl<N: MatchNotifier> DeckController<N> {
    pub fn new(config: DeckConfig, notifier: N) -> Self {
        Self {
            config,
            queue: CandidateQueue::new(),
            sampler: GestureSampler::new(),
            animator: TransitionAnimator::new(config),
            notifier,
            pending: None,
            swallowing_gesture: false,
            trace: DeckTraceSample::default(),
        }
    }

    pub fn enqueue<I>(&mut self, candidates: I) -> DeckOutput
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut out = DeckOutput::default();
        let was_exhausted = self.queue.is_empty();
        self.queue.enqueue(candidates);

        if was_exhausted {
            if let Some(active) = self.queue.peek_active() {
                log::debug!("deck: refilled active={}", active.id);
                out.push(DeckAction::Advanced {
                    active: Some(active.id.clone()),
                });
            }
        }
        self.finish(out, self.trace.now_ms)
    }

    pub fn on_gesture_start(&mut self, now_ms: u64) -> DeckOutput {
        let mut out = DeckOutput::default();
        if self.queue.is_empty() || self.pending.is_some() || self.animator.phase().is_exiting() {
            log::debug!("deck: gesture ignored phase={:?}", self.animator.phase());
            self.swallowing_gesture = true;
            out.push(DeckAction::GestureIgnored);
            return self.finish(out, now_ms);
        }

        if self.sampler.on_gesture_start() {
            let anim = self.animator.gesture_start();
            self.absorb(&mut out, anim);
        }
        self.finish(out, now_ms)
    }

    pub fn on_gesture_move(&mut self, now_ms: u64, dx: f32, dy: f32) -> DeckOutput {
        let mut out = DeckOutput::default();
        if self.swallowing_gesture {
            return self.finish(out, now_ms);
        }

        if self.sampler.on_gesture_move(dx, dy) {
            let anim = self.animator.gesture_move(Displacement::new(dx, dy));
            self.absorb(&mut out, anim);
            self.trace.dx = dx;
            self.trace.dy = dy;
        } else {
            log::debug!("deck: move outside gesture dropped dx={dx} dy={dy}");
        }
        self.finish(out, now_ms)
    }

    /// Ends the live gesture and releases it. An end without a start is a
    /// wiring bug in the caller and is returned as an error.
    pub fn on_gesture_end(&mut self, now_ms: u64) -> Result<DeckOutput, DeckError> {
        if self.swallowing_gesture {
            self.swallowing_gesture = false;
            return Ok(self.finish(DeckOutput::default(), now_ms));
        }

        let displacement = self.sampler.on_gesture_end().map_err(|err| {
            log::error!("deck: {err}");
            DeckError::from(err)
        })?;
        Ok(self.on_release_gesture(now_ms, displacement.dx, displacement.dy))
    }

    pub fn on_release_gesture(&mut self, now_ms: u64, dx: f32, dy: f32) -> DeckOutput {
        let mut out = DeckOutput::default();
        self.sampler.discard();

        let phase = self.animator.phase();
        let accepts_release = matches!(phase, AnimationPhase::Idle | AnimationPhase::Dragging);
        let active_id = self.queue.peek_active().map(|candidate| candidate.id.clone());
        let Some(candidate_id) = active_id.filter(|_| accepts_release && self.pending.is_none())
        else {
            log::debug!("deck: release ignored phase={phase:?}");
            out.push(DeckAction::GestureIgnored);
            return self.finish(out, now_ms);
        };

        let decision = classify(dx, self.config.classifier.threshold);
        log::info!(
            "deck: decision={} candidate={} dx={dx:.1}",
            decision.label(),
            candidate_id
        );

        self.trace.last_decision = Some(decision);
        self.trace.dx = dx;
        self.trace.dy = dy;
        out.push(DeckAction::Decided {
            candidate_id: candidate_id.clone(),
            decision,
        });

        if decision.commits() {
            self.pending = Some(PendingDecision {
                candidate_id,
                decision,
            });
        }

        let anim = self
            .animator
            .release(now_ms, Displacement::new(dx, dy), decision);
        self.absorb(&mut out, anim);
        self.finish(out, now_ms)
    }

    /// Advances the running animation to `now_ms`; call once per frame.
    pub fn tick(&mut self, now_ms: u64) -> DeckOutput {
        let mut out = DeckOutput::default();
        let anim = self.animator.frame(now_ms);
        self.absorb(&mut out, anim);
        self.finish(out, now_ms)
    }

    /// Completion callback for hosts that run their own animation backend.
    pub fn animation_finished(&mut self, now_ms: u64) -> DeckOutput {
        let mut out = DeckOutput::default();
        let anim = self.animator.complete();
        self.absorb(&mut out, anim);
        self.finish(out, now_ms)
    }

    /// The card surface went away (e.g. screen unmount). A decision still
    /// exiting is abandoned: no notification and the candidate stays active.
    pub fn abandon(&mut self, now_ms: u64) -> DeckOutput {
        let mut out = DeckOutput::default();
        if let Some(pending) = self.pending.take() {
            log::debug!(
                "deck: abandoned decision={} candidate={}",
                pending.decision.label(),
                pending.candidate_id
            );
            out.push(DeckAction::Abandoned {
                candidate_id: pending.candidate_id,
            });
        }
        // A finger still down will deliver its End later; absorb it quietly.
        self.swallowing_gesture = self.swallowing_gesture || self.sampler.is_active();
        self.sampler.discard();

        let anim = self.animator.reset();
        self.absorb(&mut out, anim);
        self.finish(out, now_ms)
    }

    pub fn apply_pointer(
        &mut self,
        now_ms: u64,
        signal: PointerSignal,
    ) -> Result<DeckOutput, DeckError> {
        match signal {
            PointerSignal::Start => Ok(self.on_gesture_start(now_ms)),
            PointerSignal::Move { dx, dy } => Ok(self.on_gesture_move(now_ms, dx, dy)),
            PointerSignal::End => self.on_gesture_end(now_ms),
        }
    }

    pub fn peek_active(&self) -> Option<&Candidate> {
        self.queue.peek_active()
    }

    pub fn backlog_len(&self) -> usize {
        self.queue.backlog_len()
    }

    pub fn display_state(&self) -> DisplayState {
        if self.queue.is_empty() {
            DisplayState::Exhausted
        } else {
            DisplayState::Active
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.animator.phase()
    }

    pub fn transform(&self) -> CardTransform {
        self.animator.transform()
    }

    pub fn trace(&self) -> DeckTraceSample {
        self.trace
    }

    fn absorb(&mut self, out: &mut DeckOutput, anim: AnimatorOutput) {
        for signal in anim.signals.into_iter().flatten() {
            match signal {
                AnimatorSignal::PhaseChanged { from, to } => {
                    out.push(DeckAction::PhaseChanged { from, to });
                }
                AnimatorSignal::Completed { phase } if phase.is_exiting() => {
                    self.finalize(out);
                }
                AnimatorSignal::Completed { .. } => {}
            }
        }
    }

    fn finalize(&mut self, out: &mut DeckOutput) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        if pending.decision == Decision::Like {
            match self.notifier.notify(&pending.candidate_id) {
                Ok(()) => out.push(DeckAction::Notified {
                    candidate_id: pending.candidate_id.clone(),
                }),
                Err(err) => {
                    log::warn!("deck: notify failed candidate={} err={err}", pending.candidate_id);
                    out.push(DeckAction::NotifyFailed {
                        candidate_id: pending.candidate_id.clone(),
                    });
                }
            }
        }

        let next = self.queue.advance().map(|candidate| candidate.id.clone());
        match &next {
            Some(id) => log::debug!("deck: advanced active={id}"),
            None => log::info!("deck: exhausted"),
        }
        let exhausted = next.is_none();
        out.push(DeckAction::Advanced { active: next });
        if exhausted {
            out.push(DeckAction::Exhausted);
        }

        self.sampler.discard();
        let anim = self.animator.reset();
        self.absorb(out, anim);
    }

    fn finish(&mut self, mut out: DeckOutput, now_ms: u64) -> DeckOutput {
        out.transform = self.animator.transform();
        out.phase = self.animator.phase();

        self.trace.now_ms = now_ms;
        self.trace.phase = out.phase;
        self.trace.display = self.display_state();
        self.trace.backlog_len = self.queue.backlog_len().min(u16::MAX as usize) as u16;
        self.trace.decision_pending = self.pending.is_some();
        out
    }
}

use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{
    config::{DeckConfig, DragConfig, Easing},
    types::{AnimationPhase, CardTransform, Decision, Displacement},
};

#[derive(Clone, Copy, Debug)]
enum CardHsmEvent {
    GestureStart,
    GestureMove(Displacement),
    Release {
        now_ms: u64,
        displacement: Displacement,
        decision: Decision,
    },
    Frame {
        now_ms: u64,
    },
    Complete,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimatorSignal {
    PhaseChanged {
        from: AnimationPhase,
        to: AnimationPhase,
    },
    /// The settle or exit motion of `phase` reached its target.
    Completed { phase: AnimationPhase },
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AnimatorOutput {
    pub signals: [Option<AnimatorSignal>; 3],
    pub phase: AnimationPhase,
    pub transform: CardTransform,
}

impl AnimatorOutput {
    pub fn completed(&self) -> Option<AnimationPhase> {
        self.signals.iter().flatten().find_map(|signal| match signal {
            AnimatorSignal::Completed { phase } => Some(*phase),
            _ => None,
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    signals: [Option<AnimatorSignal>; 3],
}

impl DispatchContext {
    fn emit(&mut self, signal: AnimatorSignal) {
        for slot in &mut self.signals {
            if slot.is_none() {
                *slot = Some(signal);
                return;
            }
        }
    }
}

/// Card transform state machine: Idle, Dragging, SettlingBack and the two
/// exits. Completion is delivered either by `frame` reaching the motion
/// duration or by an external `complete` callback.
pub struct TransitionAnimator {
    machine: statig::blocking::StateMachine<CardHsm>,
}

impl Default for TransitionAnimator {
    fn default() -> Self {
        Self::new(DeckConfig::default())
    }
}

impl TransitionAnimator {
    pub fn new(config: DeckConfig) -> Self {
        Self {
            machine: CardHsm::new(config).state_machine(),
        }
    }

    pub fn gesture_start(&mut self) -> AnimatorOutput {
        self.dispatch(CardHsmEvent::GestureStart)
    }

    pub fn gesture_move(&mut self, displacement: Displacement) -> AnimatorOutput {
        self.dispatch(CardHsmEvent::GestureMove(displacement))
    }

    pub fn release(
        &mut self,
        now_ms: u64,
        displacement: Displacement,
        decision: Decision,
    ) -> AnimatorOutput {
        self.dispatch(CardHsmEvent::Release {
            now_ms,
            displacement,
            decision,
        })
    }

    pub fn frame(&mut self, now_ms: u64) -> AnimatorOutput {
        self.dispatch(CardHsmEvent::Frame { now_ms })
    }

    pub fn complete(&mut self) -> AnimatorOutput {
        self.dispatch(CardHsmEvent::Complete)
    }

    /// Returns to Idle with the identity transform, dropping any motion.
    pub fn reset(&mut self) -> AnimatorOutput {
        self.dispatch(CardHsmEvent::Reset)
    }

    pub fn phase(&self) -> AnimationPhase {
        self.machine.inner().phase
    }

    pub fn transform(&self) -> CardTransform {
        self.machine.inner().transform
    }

    fn dispatch(&mut self, event: CardHsmEvent) -> AnimatorOutput {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        let card = self.machine.inner();
        AnimatorOutput {
            signals: context.signals,
            phase: card.phase,
            transform: card.transform,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Motion {
    from: Displacement,
    to: Displacement,
    started_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl Motion {
    const fn rest() -> Self {
        Self {
            from: Displacement::ZERO,
            to: Displacement::ZERO,
            started_ms: 0,
            duration_ms: 0,
            easing: Easing::Linear,
        }
    }

    /// Position at `now_ms` and whether the target has been reached.
    fn sample(&self, now_ms: u64) -> (Displacement, bool) {
        let elapsed_ms = now_ms.saturating_sub(self.started_ms);
        if self.duration_ms == 0 || elapsed_ms >= self.duration_ms {
            return (self.to, true);
        }

        let progress = self
            .easing
            .apply(elapsed_ms as f32 / self.duration_ms as f32);
        let position = Displacement::new(
            self.from.dx + (self.to.dx - self.from.dx) * progress,
            self.from.dy + (self.to.dy - self.from.dy) * progress,
        );
        (position, false)
    }
}

struct CardHsm {
    config: DeckConfig,
    phase: AnimationPhase,
    transform: CardTransform,
    drag_origin: Displacement,
    motion: Motion,
}

impl CardHsm {
    fn new(config: DeckConfig) -> Self {
        Self {
            config,
            phase: AnimationPhase::Idle,
            transform: CardTransform::IDENTITY,
            drag_origin: Displacement::ZERO,
            motion: Motion::rest(),
        }
    }

    fn enter_phase(&mut self, context: &mut DispatchContext, phase: AnimationPhase) {
        if self.phase == phase {
            return;
        }
        log::debug!("animator: phase {:?} -> {:?}", self.phase, phase);
        context.emit(AnimatorSignal::PhaseChanged {
            from: self.phase,
            to: phase,
        });
        self.phase = phase;
    }

    fn place(&mut self, position: Displacement) {
        self.transform = card_transform(&self.config.drag, position);
    }

    fn follow_drag(&mut self, displacement: Displacement) {
        self.place(Displacement::new(
            self.drag_origin.dx + displacement.dx,
            self.drag_origin.dy + displacement.dy,
        ));
    }

    fn reset_card(&mut self, context: &mut DispatchContext) {
        self.transform = CardTransform::IDENTITY;
        self.drag_origin = Displacement::ZERO;
        self.motion = Motion::rest();
        self.enter_phase(context, AnimationPhase::Idle);
    }

    fn begin_release(
        &mut self,
        context: &mut DispatchContext,
        now_ms: u64,
        displacement: Displacement,
        decision: Decision,
    ) -> Outcome<State> {
        self.follow_drag(displacement);
        let from = self.transform.position();

        let (to, duration_ms, easing, phase) = match decision {
            Decision::Cancel => (
                Displacement::ZERO,
                self.config.settle.duration_ms,
                self.config.settle.easing,
                AnimationPhase::SettlingBack,
            ),
            Decision::Like => (
                Displacement::new(self.config.exit.offset, from.dy),
                self.config.exit.duration_ms,
                self.config.exit.easing,
                AnimationPhase::ExitingRight,
            ),
            Decision::Pass => (
                Displacement::new(-self.config.exit.offset, from.dy),
                self.config.exit.duration_ms,
                self.config.exit.easing,
                AnimationPhase::ExitingLeft,
            ),
        };

        self.motion = Motion {
            from,
            to,
            started_ms: now_ms,
            duration_ms,
            easing,
        };
        self.enter_phase(context, phase);

        if decision == Decision::Cancel {
            Transition(State::settling_back())
        } else {
            Transition(State::exiting())
        }
    }

    /// Moves along the current motion; returns true once the target is reached.
    fn step_motion(&mut self, now_ms: u64) -> bool {
        let (position, done) = self.motion.sample(now_ms);
        self.place(position);
        done
    }

    fn finish_motion(&mut self) {
        let target = self.motion.to;
        self.place(target);
    }
}

#[state_machine(initial = "State::idle()")]
impl CardHsm {
    #[state(superstate = "card")]
    fn idle(&mut self, context: &mut DispatchContext, event: &CardHsmEvent) -> Outcome<State> {
        match event {
            CardHsmEvent::GestureStart => {
                self.drag_origin = Displacement::ZERO;
                self.enter_phase(context, AnimationPhase::Dragging);
                Transition(State::dragging())
            }
            CardHsmEvent::GestureMove(displacement) => {
                self.drag_origin = Displacement::ZERO;
                self.follow_drag(*displacement);
                self.enter_phase(context, AnimationPhase::Dragging);
                Transition(State::dragging())
            }
            _ => Super,
        }
    }

    #[state(superstate = "card")]
    fn dragging(&mut self, context: &mut DispatchContext, event: &CardHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            CardHsmEvent::GestureMove(displacement) => {
                self.follow_drag(*displacement);
                Handled
            }
            CardHsmEvent::GestureStart => Handled,
            _ => Super,
        }
    }

    #[state(superstate = "card")]
    fn settling_back(
        &mut self,
        context: &mut DispatchContext,
        event: &CardHsmEvent,
    ) -> Outcome<State> {
        match event {
            CardHsmEvent::Frame { now_ms } => {
                if self.step_motion(*now_ms) {
                    self.settle_done(context)
                } else {
                    Handled
                }
            }
            CardHsmEvent::Complete => self.settle_done(context),
            CardHsmEvent::GestureStart => {
                // Resume from the live interpolated position so the card does not jump.
                self.drag_origin = self.transform.position();
                self.motion = Motion::rest();
                self.enter_phase(context, AnimationPhase::Dragging);
                Transition(State::dragging())
            }
            CardHsmEvent::Reset => Super,
            _ => Handled,
        }
    }

    #[state(superstate = "card")]
    fn exiting(&mut self, context: &mut DispatchContext, event: &CardHsmEvent) -> Outcome<State> {
        match event {
            CardHsmEvent::Frame { now_ms } => {
                if self.step_motion(*now_ms) {
                    self.exit_done(context)
                } else {
                    Handled
                }
            }
            CardHsmEvent::Complete => {
                self.finish_motion();
                self.exit_done(context)
            }
            CardHsmEvent::Reset => Super,
            _ => Handled,
        }
    }

    /// Off-screen and waiting for the controller to reset for the next card.
    #[state(superstate = "card")]
    fn exited(&mut self, context: &mut DispatchContext, event: &CardHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            CardHsmEvent::Reset => Super,
            _ => Handled,
        }
    }

    #[superstate]
    fn card(&mut self, context: &mut DispatchContext, event: &CardHsmEvent) -> Outcome<State> {
        match event {
            CardHsmEvent::Release {
                now_ms,
                displacement,
                decision,
            } => self.begin_release(context, *now_ms, *displacement, *decision),
            CardHsmEvent::Reset => {
                self.reset_card(context);
                Transition(State::idle())
            }
            _ => Handled,
        }
    }
}

impl CardHsm {
    fn settle_done(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        self.transform = CardTransform::IDENTITY;
        self.drag_origin = Displacement::ZERO;
        context.emit(AnimatorSignal::Completed {
            phase: AnimationPhase::SettlingBack,
        });
        self.enter_phase(context, AnimationPhase::Idle);
        Transition(State::idle())
    }

    fn exit_done(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        context.emit(AnimatorSignal::Completed { phase: self.phase });
        Transition(State::exited())
    }
}

/// Rotation follows x linearly over `rotation_range`; each overlay fades in
/// over `overlay_band` on its own side only.
pub fn card_transform(drag: &DragConfig, position: Displacement) -> CardTransform {
    let x = position.dx;
    let tilt = (x / drag.rotation_range).clamp(-1.0, 1.0);
    CardTransform {
        translate_x: x,
        translate_y: position.dy,
        rotation_deg: tilt * drag.rotation_max_deg,
        like_opacity: (x / drag.overlay_band).clamp(0.0, 1.0),
        pass_opacity: (-x / drag.overlay_band).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests;

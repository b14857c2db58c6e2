use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::deck::config::{active_config, PointerConfig};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPoint {
    pub x: f32,
    pub y: f32,
}

/// One raw sample from the pointer hardware: a single contact or none.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerSample {
    pub touching: bool,
    pub point: PointerPoint,
}

impl PointerSample {
    pub const fn down(x: f32, y: f32) -> Self {
        Self {
            touching: true,
            point: PointerPoint { x, y },
        }
    }

    pub const fn up() -> Self {
        Self {
            touching: false,
            point: PointerPoint { x: 0.0, y: 0.0 },
        }
    }
}

/// Gesture driver events; `Move` carries the cumulative offset from the
/// anchored touch-down point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerSignal {
    Start,
    Move { dx: f32, dy: f32 },
    End,
}

#[derive(Clone, Copy, Debug)]
enum PointerHsmEvent {
    Sample { now_ms: u64, sample: PointerSample },
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PointerOutput {
    pub signals: [Option<PointerSignal>; 3],
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    signals: [Option<PointerSignal>; 3],
}

impl DispatchContext {
    fn emit(&mut self, signal: PointerSignal) {
        for slot in &mut self.signals {
            if slot.is_none() {
                *slot = Some(signal);
                return;
            }
        }
    }

    fn finish(self) -> PointerOutput {
        PointerOutput {
            signals: self.signals,
        }
    }
}

pub struct PointerDriver {
    machine: statig::blocking::StateMachine<PointerHsm>,
}

impl Default for PointerDriver {
    fn default() -> Self {
        Self::new(active_config().pointer)
    }
}

impl PointerDriver {
    pub fn new(config: PointerConfig) -> Self {
        Self {
            machine: PointerHsm::new(config).state_machine(),
        }
    }

    pub fn tick(&mut self, now_ms: u64, sample: PointerSample) -> PointerOutput {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&PointerHsmEvent::Sample { now_ms, sample }, &mut context);
        context.finish()
    }
}

struct PointerHsm {
    config: PointerConfig,
    down_ms: u64,
    anchor: PointerPoint,
    last_point: PointerPoint,
    last_move_emit_point: PointerPoint,
    release_ms: u64,
}

impl PointerHsm {
    fn new(config: PointerConfig) -> Self {
        Self {
            config,
            down_ms: 0,
            anchor: PointerPoint::default(),
            last_point: PointerPoint::default(),
            last_move_emit_point: PointerPoint::default(),
            release_ms: 0,
        }
    }

    fn begin_press(&mut self, now_ms: u64, point: PointerPoint) {
        self.down_ms = now_ms;
        self.anchor = point;
        self.last_point = point;
        self.last_move_emit_point = point;
        self.release_ms = now_ms;
    }

    fn down_settled(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.down_ms) >= self.config.debounce_down_ms
    }

    fn start_tracking(
        &mut self,
        context: &mut DispatchContext,
        point: PointerPoint,
    ) -> Outcome<State> {
        // Anchor once debounce has stabilized so a noisy first contact does not bias dx.
        self.anchor = point;
        self.last_point = point;
        self.last_move_emit_point = point;
        context.emit(PointerSignal::Start);
        Transition(State::tracking())
    }

    fn emit_move(&mut self, context: &mut DispatchContext, point: PointerPoint) {
        self.last_move_emit_point = point;
        context.emit(PointerSignal::Move {
            dx: point.x - self.anchor.x,
            dy: point.y - self.anchor.y,
        });
    }

    fn maybe_emit_move(&mut self, context: &mut DispatchContext, point: PointerPoint) {
        let deadzone = self.config.move_deadzone;
        if squared_distance(point, self.last_move_emit_point) >= deadzone * deadzone {
            self.emit_move(context, point);
        }
    }

    fn finalize_release(&mut self, context: &mut DispatchContext) {
        let release_point = self.last_point;
        if release_point != self.last_move_emit_point {
            self.emit_move(context, release_point);
        }
        context.emit(PointerSignal::End);
    }
}

#[state_machine(initial = "State::idle()")]
impl PointerHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &PointerHsmEvent) -> Outcome<State> {
        match event {
            PointerHsmEvent::Sample { now_ms, sample } => {
                if !sample.touching {
                    return Handled;
                }
                self.begin_press(*now_ms, sample.point);
                if self.down_settled(*now_ms) {
                    return self.start_tracking(context, sample.point);
                }
                Transition(State::debounce_down())
            }
        }
    }

    #[state]
    fn debounce_down(
        &mut self,
        context: &mut DispatchContext,
        event: &PointerHsmEvent,
    ) -> Outcome<State> {
        match event {
            PointerHsmEvent::Sample { now_ms, sample } => {
                if !sample.touching {
                    log::trace!("pointer: bounce ignored at {now_ms}");
                    return Transition(State::idle());
                }
                self.last_point = sample.point;
                if self.down_settled(*now_ms) {
                    self.start_tracking(context, sample.point)
                } else {
                    Handled
                }
            }
        }
    }

    #[state]
    fn tracking(
        &mut self,
        context: &mut DispatchContext,
        event: &PointerHsmEvent,
    ) -> Outcome<State> {
        match event {
            PointerHsmEvent::Sample { now_ms, sample } => {
                if !sample.touching {
                    self.release_ms = *now_ms;
                    return Transition(State::debounce_up());
                }
                self.last_point = sample.point;
                self.maybe_emit_move(context, sample.point);
                Handled
            }
        }
    }

    #[state]
    fn debounce_up(
        &mut self,
        context: &mut DispatchContext,
        event: &PointerHsmEvent,
    ) -> Outcome<State> {
        match event {
            PointerHsmEvent::Sample { now_ms, sample } => {
                let within_window =
                    now_ms.saturating_sub(self.release_ms) < self.config.debounce_up_ms;
                match (sample.touching, within_window) {
                    (false, true) => Handled,
                    (false, false) => {
                        self.finalize_release(context);
                        Transition(State::idle())
                    }
                    (true, true) => {
                        self.last_point = sample.point;
                        self.maybe_emit_move(context, sample.point);
                        Transition(State::tracking())
                    }
                    (true, false) => {
                        // The release held long enough; close it before the new press.
                        self.finalize_release(context);
                        self.begin_press(*now_ms, sample.point);
                        if self.down_settled(*now_ms) {
                            return self.start_tracking(context, sample.point);
                        }
                        Transition(State::debounce_down())
                    }
                }
            }
        }
    }
}

fn squared_distance(a: PointerPoint, b: PointerPoint) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

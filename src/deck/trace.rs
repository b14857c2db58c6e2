use super::types::{AnimationPhase, Decision, DisplayState};

/// Snapshot of the controller after the most recent call, for replay logs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeckTraceSample {
    pub now_ms: u64,
    pub phase: AnimationPhase,
    pub display: DisplayState,
    pub last_decision: Option<Decision>,
    pub dx: f32,
    pub dy: f32,
    pub backlog_len: u16,
    pub decision_pending: bool,
}

impl Default for DeckTraceSample {
    fn default() -> Self {
        Self {
            now_ms: 0,
            phase: AnimationPhase::Idle,
            display: DisplayState::Exhausted,
            last_decision: None,
            dx: 0.0,
            dy: 0.0,
            backlog_len: 0,
            decision_pending: false,
        }
    }
}

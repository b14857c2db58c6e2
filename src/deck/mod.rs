pub mod animator;
pub mod classify;
pub mod config;
pub mod controller;
pub mod gesture;
pub mod queue;
pub mod trace;
pub mod types;

pub use animator::{AnimatorOutput, AnimatorSignal, TransitionAnimator};
pub use classify::classify;
pub use config::{active_config, DeckConfig, Easing};
pub use controller::{DeckController, DeckError, MatchNotifier, NotifyError};
pub use gesture::{GestureError, GestureSampler};
pub use queue::CandidateQueue;
pub use trace::DeckTraceSample;
pub use types::{
    AnimationPhase, Candidate, CandidateId, CardTransform, DeckAction, DeckOutput, Decision,
    Displacement, DisplayState,
};

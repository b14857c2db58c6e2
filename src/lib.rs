//! Swipe-deck decision engine: pointer drags in, Like/Pass/Cancel out.
//!
//! [`pointer::PointerDriver`] debounces raw samples into gesture signals,
//! [`deck::DeckController`] classifies released gestures, animates the card
//! through [`deck::TransitionAnimator`] and advances the candidate queue once
//! the exit motion completes.

pub mod deck;
pub mod pointer;

pub use deck::{
    active_config, classify, AnimationPhase, Candidate, CardTransform, DeckAction,
    DeckController, DeckConfig, DeckError, DeckOutput, Decision, DisplayState, MatchNotifier,
    NotifyError,
};
pub use pointer::{PointerDriver, PointerSample, PointerSignal};

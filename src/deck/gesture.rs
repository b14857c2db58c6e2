use core::fmt;

use super::types::Displacement;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GestureError {
    /// `on_gesture_end` without a live session; the driver wiring is broken.
    EndWithoutStart,
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndWithoutStart => write!(f, "gesture end received without a gesture start"),
        }
    }
}

impl std::error::Error for GestureError {}

/// Holds the cumulative displacement of the single live gesture session.
#[derive(Debug, Default)]
pub struct GestureSampler {
    session: Option<Displacement>,
}

impl GestureSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when a session is already live; the start is ignored.
    pub fn on_gesture_start(&mut self) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(Displacement::ZERO);
        true
    }

    /// `dx`/`dy` are absolute offsets from touch-down; the latest sample wins.
    /// Returns `false` when no session is live and the sample was dropped.
    pub fn on_gesture_move(&mut self, dx: f32, dy: f32) -> bool {
        match &mut self.session {
            Some(displacement) => {
                *displacement = Displacement::new(dx, dy);
                true
            }
            None => false,
        }
    }

    pub fn on_gesture_end(&mut self) -> Result<Displacement, GestureError> {
        self.session.take().ok_or(GestureError::EndWithoutStart)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn displacement(&self) -> Option<Displacement> {
        self.session
    }

    pub(crate) fn discard(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_resets_and_end_returns_latest_sample() {
        let mut sampler = GestureSampler::new();
        assert!(sampler.on_gesture_start());
        assert_eq!(sampler.displacement(), Some(Displacement::ZERO));

        assert!(sampler.on_gesture_move(10.0, 2.0));
        assert!(sampler.on_gesture_move(64.0, -8.0));
        assert!(sampler.on_gesture_move(52.0, -3.0));

        assert_eq!(sampler.on_gesture_end(), Ok(Displacement::new(52.0, -3.0)));
        assert!(!sampler.is_active());
    }

    #[test]
    fn second_start_is_ignored_while_live() {
        let mut sampler = GestureSampler::new();
        assert!(sampler.on_gesture_start());
        sampler.on_gesture_move(30.0, 0.0);

        assert!(!sampler.on_gesture_start());
        assert_eq!(sampler.displacement(), Some(Displacement::new(30.0, 0.0)));
    }

    #[test]
    fn end_without_start_is_a_protocol_violation() {
        let mut sampler = GestureSampler::new();
        assert_eq!(sampler.on_gesture_end(), Err(GestureError::EndWithoutStart));

        sampler.on_gesture_start();
        let _ = sampler.on_gesture_end();
        assert_eq!(sampler.on_gesture_end(), Err(GestureError::EndWithoutStart));
    }

    #[test]
    fn move_outside_session_is_dropped() {
        let mut sampler = GestureSampler::new();
        assert!(!sampler.on_gesture_move(90.0, 0.0));
        assert!(sampler.on_gesture_start());
        assert_eq!(sampler.on_gesture_end(), Ok(Displacement::ZERO));
    }
}

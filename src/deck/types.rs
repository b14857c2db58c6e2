pub type CandidateId = String;

/// A profile awaiting a decision. Everything except `id` is display payload
/// that the engine never interprets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub image_url: String,
    pub bio: String,
}

impl Candidate {
    pub fn new(id: impl Into<CandidateId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Displacement {
    pub dx: f32,
    pub dy: f32,
}

impl Displacement {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    Like,
    Pass,
    Cancel,
}

impl Decision {
    pub const fn commits(self) -> bool {
        matches!(self, Self::Like | Self::Pass)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Pass => "pass",
            Self::Cancel => "cancel",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AnimationPhase {
    #[default]
    Idle,
    Dragging,
    SettlingBack,
    ExitingLeft,
    ExitingRight,
}

impl AnimationPhase {
    pub const fn is_exiting(self) -> bool {
        matches!(self, Self::ExitingLeft | Self::ExitingRight)
    }
}

/// Values handed to the render surface each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CardTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotation_deg: f32,
    pub like_opacity: f32,
    pub pass_opacity: f32,
}

impl CardTransform {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        rotation_deg: 0.0,
        like_opacity: 0.0,
        pass_opacity: 0.0,
    };

    pub const fn position(&self) -> Displacement {
        Displacement::new(self.translate_x, self.translate_y)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DisplayState {
    Active,
    Exhausted,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeckAction {
    PhaseChanged {
        from: AnimationPhase,
        to: AnimationPhase,
    },
    Decided {
        candidate_id: CandidateId,
        decision: Decision,
    },
    Notified {
        candidate_id: CandidateId,
    },
    NotifyFailed {
        candidate_id: CandidateId,
    },
    Advanced {
        active: Option<CandidateId>,
    },
    Exhausted,
    Abandoned {
        candidate_id: CandidateId,
    },
    GestureIgnored,
}

pub const MAX_DECK_ACTIONS: usize = 8;

pub type ActionBuffer = heapless::Vec<DeckAction, MAX_DECK_ACTIONS>;

#[derive(Clone, Debug, Default)]
pub struct DeckOutput {
    pub actions: ActionBuffer,
    pub transform: CardTransform,
    pub phase: AnimationPhase,
}

impl DeckOutput {
    pub(crate) fn push(&mut self, action: DeckAction) {
        // Full buffers drop the newest action; MAX_DECK_ACTIONS covers the longest chain.
        let _ = self.actions.push(action);
    }

    pub fn decision(&self) -> Option<Decision> {
        self.actions.iter().find_map(|action| match action {
            DeckAction::Decided { decision, .. } => Some(*decision),
            _ => None,
        })
    }

    pub fn notified(&self) -> Option<&str> {
        self.actions.iter().find_map(|action| match action {
            DeckAction::Notified { candidate_id } => Some(candidate_id.as_str()),
            _ => None,
        })
    }

    pub fn advanced(&self) -> bool {
        self.actions
            .iter()
            .any(|action| matches!(action, DeckAction::Advanced { .. }))
    }

    pub fn is_exhausted(&self) -> bool {
        self.actions
            .iter()
            .any(|action| matches!(action, DeckAction::Exhausted))
    }
}

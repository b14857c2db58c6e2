use std::collections::VecDeque;

use super::types::Candidate;

/// FIFO backlog plus the single active candidate. The active candidate is
/// never also present in `backlog`.
#[derive(Debug, Default)]
pub struct CandidateQueue {
    active: Option<Candidate>,
    backlog: VecDeque<Candidate>,
}

impl CandidateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peek_active(&self) -> Option<&Candidate> {
        self.active.as_ref()
    }

    /// Drops the active candidate and promotes the next backlog entry.
    pub fn advance(&mut self) -> Option<&Candidate> {
        self.active = self.backlog.pop_front();
        self.active.as_ref()
    }

    /// Appends in arrival order. Duplicate ids are kept; suppressing them is
    /// the profile source's job.
    pub fn enqueue<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = Candidate>,
    {
        self.backlog.extend(candidates);
        if self.active.is_none() {
            self.active = self.backlog.pop_front();
        }
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    pub fn len(&self) -> usize {
        self.backlog.len() + usize::from(self.active.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }
}

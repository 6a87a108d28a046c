//! Turn-taking for the proposal debate loop.
//!
//! The queue starts with every enabled councilor. Each pop yields the next
//! speaker; a `[CHALLENGE: name]` moves the named councilor to the front.
//! Three challenges in a row trigger a moderator interjection and a
//! reshuffle of the remaining queue. The loop ends when the queue drains
//! or after `councilors * 2 + 1` counted turns.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};

/// Consecutive challenges that trigger a moderator interjection
pub const REBUTTAL_CHAIN_LIMIT: u32 = 3;

/// The next debate turn to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateTurn {
    pub participant_id: String,
    /// First time this participant takes the floor
    pub opening: bool,
}

/// What the loop must do after a turn's challenge was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// No (valid) challenge; the chain was reset
    None,
    /// The challenged participant now heads the queue
    Redirected,
    /// The chain hit the limit; a moderator must interject
    Interject,
}

#[derive(Debug, Clone)]
pub struct DebateQueue {
    queue: VecDeque<String>,
    last_speaker: Option<String>,
    spoken: HashSet<String>,
    rebuttal_chain: u32,
    turns_taken: usize,
    max_turns: usize,
}

impl DebateQueue {
    pub fn new(participant_ids: Vec<String>) -> Self {
        let max_turns = participant_ids.len() * 2 + 1;
        Self {
            queue: participant_ids.into(),
            last_speaker: None,
            spoken: HashSet::new(),
            rebuttal_chain: 0,
            turns_taken: 0,
            max_turns,
        }
    }

    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    pub fn turns_taken(&self) -> usize {
        self.turns_taken
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn rebuttal_chain(&self) -> u32 {
        self.rebuttal_chain
    }

    /// Pop the next speaker, skipping an immediate repeat of the previous one
    /// when someone else is waiting.
    pub fn next_turn(&mut self) -> Option<DebateTurn> {
        if self.turns_taken >= self.max_turns {
            return None;
        }
        let mut next = self.queue.pop_front()?;
        if self.last_speaker.as_deref() == Some(next.as_str())
            && let Some(other) = self.queue.pop_front()
        {
            self.queue.push_back(next);
            next = other;
        }
        let opening = !self.spoken.contains(&next);
        Some(DebateTurn {
            participant_id: next,
            opening,
        })
    }

    /// Count a turn that produced a message
    pub fn record_spoken(&mut self, participant_id: &str) {
        self.turns_taken += 1;
        self.spoken.insert(participant_id.to_string());
        self.last_speaker = Some(participant_id.to_string());
    }

    /// Apply the challenge found in `speaker`'s output (resolved to an id).
    ///
    /// Self-challenges are ignored and reset the chain like no challenge.
    pub fn apply_challenge(&mut self, speaker: &str, target: Option<&str>) -> ChallengeOutcome {
        let Some(target) = target.filter(|t| *t != speaker) else {
            self.rebuttal_chain = 0;
            return ChallengeOutcome::None;
        };
        self.queue.retain(|id| id != target);
        self.queue.push_front(target.to_string());
        self.rebuttal_chain += 1;
        if self.rebuttal_chain >= REBUTTAL_CHAIN_LIMIT {
            ChallengeOutcome::Interject
        } else {
            ChallengeOutcome::Redirected
        }
    }

    /// Count the moderator's interjection, reset the chain and reshuffle
    pub fn record_interjection<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.turns_taken += 1;
        self.rebuttal_chain = 0;
        self.queue.make_contiguous().shuffle(rng);
    }
}

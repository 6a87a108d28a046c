//! Role-aware view over a session's participants.

use super::entities::{Participant, ParticipantRole};
use crate::core::error::DomainError;
use crate::core::string::names_match;
use serde::{Deserialize, Serialize};

/// The participants loaded into a session's settings (Value Object)
///
/// Only enabled participants are visible through the role accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    pub fn all(&self) -> &[Participant] {
        &self.participants
    }

    pub fn enabled(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.enabled)
    }

    pub fn by_id(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// The enabled speaker (first one wins)
    pub fn speaker(&self) -> Result<&Participant, DomainError> {
        self.enabled()
            .find(|p| p.role == ParticipantRole::Speaker)
            .ok_or(DomainError::NoSpeaker)
    }

    /// The enabled moderator, if any
    pub fn moderator(&self) -> Option<&Participant> {
        self.enabled().find(|p| p.role == ParticipantRole::Moderator)
    }

    /// Enabled councilors only (the proposal debate queue)
    pub fn councilors(&self) -> Vec<&Participant> {
        self.enabled()
            .filter(|p| p.role == ParticipantRole::Councilor)
            .collect()
    }

    /// Enabled councilors and specialists
    pub fn council_members(&self) -> Vec<&Participant> {
        self.enabled().filter(|p| p.role.is_council_member()).collect()
    }

    /// Swarm agents when present, otherwise the council members
    pub fn swarm_workers(&self) -> Vec<&Participant> {
        let agents: Vec<&Participant> = self
            .enabled()
            .filter(|p| p.role == ParticipantRole::SwarmAgent)
            .collect();
        if agents.is_empty() {
            self.council_members()
        } else {
            agents
        }
    }

    /// Resolve a name written by a model against the enabled roster.
    ///
    /// Exact (case-insensitive) name or id matches win over substring matches.
    pub fn resolve_name(&self, name: &str) -> Option<&Participant> {
        let wanted = name.trim();
        if wanted.is_empty() {
            return None;
        }
        self.enabled()
            .find(|p| p.name.eq_ignore_ascii_case(wanted) || p.id.eq_ignore_ascii_case(wanted))
            .or_else(|| self.enabled().find(|p| names_match(wanted, &p.name)))
    }

    /// Enable exactly the given participant ids (plus the speaker and moderator)
    pub fn enable_only(&mut self, ids: &[String]) {
        for p in &mut self.participants {
            p.enabled = matches!(p.role, ParticipantRole::Speaker | ParticipantRole::Moderator)
                || ids.iter().any(|id| id == &p.id);
        }
    }

    /// Replace a participant with the same id, or append it
    pub fn upsert(&mut self, participant: Participant) {
        match self.participants.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => *existing = participant,
            None => self.participants.push(participant),
        }
    }
}

impl From<Vec<Participant>> for Roster {
    fn from(participants: Vec<Participant>) -> Self {
        Self::new(participants)
    }
}

//! Built-in persona catalog.
//!
//! The default council: a Speaker who frames and closes every session, a
//! Moderator who breaks argument loops, twelve archetypal councilors and a
//! handful of domain specialists. Only the classic five-seat council
//! (Technocrat, Ethicist, Pragmatist, Skeptic plus the Speaker) and the
//! Moderator are enabled by default.

use super::entities::{Participant, ParticipantRole};
use super::roster::Roster;

/// One entry of the persona catalog
struct Persona {
    id: &'static str,
    name: &'static str,
    role: ParticipantRole,
    persona: &'static str,
    color: &'static str,
    enabled: bool,
}

const PERSONAS: &[Persona] = &[
    Persona {
        id: "speaker",
        name: "Speaker",
        role: ParticipantRole::Speaker,
        persona: "You are the Speaker - a balanced, wise facilitator who synthesizes perspectives.",
        color: "#f59e0b",
        enabled: true,
    },
    Persona {
        id: "moderator",
        name: "Moderator",
        role: ParticipantRole::Moderator,
        persona: "You are the Moderator - keeps discussion balanced, ensures all voices are heard.",
        color: "#64748b",
        enabled: true,
    },
    Persona {
        id: "councilor-technocrat",
        name: "Technocrat",
        role: ParticipantRole::Councilor,
        persona: "You are the Technocrat - analytical, data-driven, focused on technical feasibility.",
        color: "#3b82f6",
        enabled: true,
    },
    Persona {
        id: "councilor-ethicist",
        name: "Ethicist",
        role: ParticipantRole::Councilor,
        persona: "You are the Ethicist - concerned with moral implications and ethical boundaries.",
        color: "#10b981",
        enabled: true,
    },
    Persona {
        id: "councilor-pragmatist",
        name: "Pragmatist",
        role: ParticipantRole::Councilor,
        persona: "You are the Pragmatist - focused on practical implementation and real-world constraints.",
        color: "#8b5cf6",
        enabled: true,
    },
    Persona {
        id: "councilor-visionary",
        name: "Visionary",
        role: ParticipantRole::Councilor,
        persona: "You are the Visionary - imaginative, forward-thinking, sees long-term possibilities.",
        color: "#ec4899",
        enabled: false,
    },
    Persona {
        id: "councilor-skeptic",
        name: "Skeptic",
        role: ParticipantRole::Councilor,
        persona: "You are the Skeptic - challenges assumptions, demands evidence, identifies risks.",
        color: "#ef4444",
        enabled: true,
    },
    Persona {
        id: "councilor-sentinel",
        name: "Sentinel",
        role: ParticipantRole::Councilor,
        persona: "You are the Sentinel - guards against harm, prioritizes safety and security.",
        color: "#dc2626",
        enabled: false,
    },
    Persona {
        id: "councilor-historian",
        name: "Historian",
        role: ParticipantRole::Councilor,
        persona: "You are the Historian - provides historical context and pattern recognition.",
        color: "#a16207",
        enabled: false,
    },
    Persona {
        id: "councilor-diplomat",
        name: "Diplomat",
        role: ParticipantRole::Councilor,
        persona: "You are the Diplomat - seeks consensus, mediates conflicts, builds bridges.",
        color: "#0ea5e9",
        enabled: false,
    },
    Persona {
        id: "councilor-journalist",
        name: "Journalist",
        role: ParticipantRole::Councilor,
        persona: "You are the Journalist - asks probing questions, seeks clarity and truth.",
        color: "#f97316",
        enabled: false,
    },
    Persona {
        id: "councilor-psychologist",
        name: "Psychologist",
        role: ParticipantRole::Councilor,
        persona: "You are the Psychologist - understands human behavior and cognitive biases.",
        color: "#14b8a6",
        enabled: false,
    },
    Persona {
        id: "specialist-science",
        name: "Science Specialist",
        role: ParticipantRole::Specialist,
        persona: "You are a research scientist. Ground every claim in empirical evidence and cite the state of the art.",
        color: "#22c55e",
        enabled: false,
    },
    Persona {
        id: "specialist-law",
        name: "Legal Specialist",
        role: ParticipantRole::Specialist,
        persona: "You are a legal scholar. Identify regulatory, contractual and liability implications.",
        color: "#6366f1",
        enabled: false,
    },
    Persona {
        id: "specialist-finance",
        name: "Finance Specialist",
        role: ParticipantRole::Specialist,
        persona: "You are a financial analyst. Quantify costs, benefits, and economic second-order effects.",
        color: "#eab308",
        enabled: false,
    },
    Persona {
        id: "specialist-code",
        name: "Code Specialist",
        role: ParticipantRole::Specialist,
        persona: "You are a senior software engineer. Favor simple, tested, maintainable designs.",
        color: "#06b6d4",
        enabled: false,
    },
];

/// Build the default roster, every participant using `model`
pub fn default_roster(model: &str) -> Roster {
    Roster::new(
        PERSONAS
            .iter()
            .map(|p| {
                let participant = Participant::new(p.id, p.name, p.role, model)
                    .with_persona(p.persona)
                    .with_color(p.color);
                if p.enabled {
                    participant
                } else {
                    participant.disabled()
                }
            })
            .collect(),
    )
}

/// Ids of every catalog persona, in catalog order
pub fn persona_ids() -> impl Iterator<Item = &'static str> {
    PERSONAS.iter().map(|p| p.id)
}

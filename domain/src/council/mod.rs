//! Council decision domain
//!
//! Pure logic behind a council session: reading structured data out of
//! free-text model output, tallying weighted votes, and deciding who
//! speaks next in a proposal debate.
//!
//! ```text
//! speaker output ──▶ tags ──▶ parsing::parse_votes ──▶ VoteData
//!                        └──▶ parsing::parse_prediction ──▶ PredictionData
//! councilor output ──▶ directives ([CHALLENGE], [PASS]) ──▶ DebateQueue
//! ```

pub mod debate;
pub mod directives;
pub mod parsing;
pub mod prediction;
pub mod tags;
pub mod vote;

pub use debate::{ChallengeOutcome, DebateQueue, DebateTurn};
pub use parsing::{parse_prediction, parse_votes};
pub use prediction::PredictionData;
pub use vote::{ConsensusLabel, VoteChoice, VoteData, VoteOutcome, VoteRecord};

//! Prompt templates for council sessions

use crate::council::directives::FileTask;
use crate::council::vote::VoteData;
use crate::participant::entities::{Participant, ParticipantRole};
use crate::session::mode::SessionMode;
use crate::tool::entities::ToolSpec;

/// What the council was asked to consider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionBrief {
    pub topic: String,
    /// Background material supplied with the session
    pub context: Option<String>,
    /// The human's own request, if it differs from the topic
    pub user_prompt: Option<String>,
}

impl SessionBrief {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            context: None,
            user_prompt: None,
        }
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_user_prompt(mut self, prompt: Option<String>) -> Self {
        self.user_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }

    fn render(&self) -> String {
        let mut out = format!("Topic: {}", self.topic);
        if let Some(prompt) = &self.user_prompt {
            out.push_str(&format!("\n\nRequest from the petitioner:\n{}", prompt));
        }
        if let Some(context) = &self.context {
            out.push_str(&format!("\n\nBackground material:\n{}", context));
        }
        out
    }
}

/// One of the fixed phases of a swarm-coding session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwarmCodingPhase {
    pub name: &'static str,
    pub instruction: &'static str,
}

/// Index of the phase whose output lists the files to write
pub const FILE_MANIFEST_PHASE: usize = 4;

pub const SWARM_CODING_PHASES: [SwarmCodingPhase; 12] = [
    SwarmCodingPhase {
        name: "Requirements",
        instruction: "List the functional and non-functional requirements. Number them.",
    },
    SwarmCodingPhase {
        name: "Architecture",
        instruction: "Describe the architecture: components, their responsibilities and how data flows between them.",
    },
    SwarmCodingPhase {
        name: "Technology Stack",
        instruction: "Choose the language, libraries and tools. Justify each choice in one line.",
    },
    SwarmCodingPhase {
        name: "Interface Contracts",
        instruction: "Define the public interfaces between components: function signatures, data types, error cases.",
    },
    SwarmCodingPhase {
        name: "File Manifest",
        instruction: "List every file to create, one per line, exactly as `FILE: <path> | <description>`. Nothing else.",
    },
    SwarmCodingPhase {
        name: "Integration Review",
        instruction: "Review the generated files against the interface contracts. List mismatches and the fix for each.",
    },
    SwarmCodingPhase {
        name: "Security Audit",
        instruction: "Audit the design and files for security issues. Rate each finding low, medium or high.",
    },
    SwarmCodingPhase {
        name: "Test Strategy",
        instruction: "Describe the unit and integration tests needed, naming the files and cases.",
    },
    SwarmCodingPhase {
        name: "Performance Review",
        instruction: "Identify performance risks and concrete mitigations.",
    },
    SwarmCodingPhase {
        name: "Documentation",
        instruction: "Write the README: purpose, setup, usage and configuration.",
    },
    SwarmCodingPhase {
        name: "Deployment Plan",
        instruction: "Describe how to build, package and deploy the project.",
    },
    SwarmCodingPhase {
        name: "Final Handoff",
        instruction: "Summarise what was built, the open risks and the next steps for the team taking over.",
    },
];

/// Templates for generating prompts at each stage
pub struct CouncilPrompt;

impl CouncilPrompt {
    /// System prompt for a participant in a given mode
    pub fn system(participant: &Participant, mode: SessionMode, tools: &ToolSpec) -> String {
        let mut prompt = format!(
            "You are {}, the {} of the AI Council.",
            participant.name,
            participant.role.as_str()
        );
        if !participant.persona.trim().is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(participant.persona.trim());
        }

        prompt.push_str("\n\n");
        prompt.push_str(match participant.role {
            ParticipantRole::Speaker => {
                "You open and close sessions, keep order and deliver the council's rulings. \
                 Be impartial and precise."
            }
            ParticipantRole::Moderator => {
                "You keep the debate productive. When arguments go in circles, name the loop, \
                 restate the open questions and steer the council toward them."
            }
            ParticipantRole::Councilor | ParticipantRole::Specialist => {
                "Argue from your own perspective. Be concrete and brief (under 200 words). \
                 Engage with what your colleagues actually said."
            }
            ParticipantRole::SwarmAgent => {
                "You are one worker in a swarm. Complete the task you are given thoroughly and \
                 report only your result."
            }
        });

        if mode == SessionMode::Proposal && participant.role == ParticipantRole::Councilor {
            prompt.push_str(
                "\n\nDebate rules:\n\
                 - To demand an answer from a colleague, write [CHALLENGE: Name] anywhere in your speech.\n\
                 - If you have nothing new to add, reply with exactly [PASS].",
            );
        }

        if !tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&Self::tool_instructions(tools));
        }

        prompt
    }

    fn tool_instructions(tools: &ToolSpec) -> String {
        let descriptions = tools
            .all()
            .map(|t| t.usage())
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"Available tools:
{descriptions}

To use a tool, include a block like this in your answer; its output will be appended to your message:

```tool
{{"tool": "tool_name", "args": {{"arg1": "value1"}}}}
```"#
        )
    }

    /// Speaker's opening turn for any mode
    pub fn opening(brief: &SessionBrief, mode: SessionMode) -> String {
        let instruction = match mode {
            SessionMode::Proposal => {
                "Open the session. Restate the motion, the stakes and the questions the council must settle before voting."
            }
            SessionMode::Deliberation => {
                "Open the deliberation. Frame the topic and name the perspectives the council should weigh."
            }
            SessionMode::Inquiry => {
                "Frame the inquiry. Restate the question precisely and say what a complete answer must cover."
            }
            SessionMode::Research => {
                "Write a research plan: the sub-questions to investigate, the evidence needed and how findings will be judged."
            }
            SessionMode::Swarm => {
                "Decompose the objective into independent work items. Write each item as <task>description</task>."
            }
            SessionMode::SwarmCoding => {
                "Open the engineering session. Restate what must be built."
            }
            SessionMode::Prediction => {
                "Open the forecasting session. State the event to forecast, the resolution criteria and the key drivers."
            }
            SessionMode::Advisory => {
                "The petitioner seeks personal counsel. Restate their situation and the decision they face, with empathy."
            }
        };
        format!("{}\n\n{}", brief.render(), instruction)
    }

    /// A council member's contribution in a linear (non-debate) mode
    pub fn contribution(
        brief: &SessionBrief,
        mode: SessionMode,
        transcript: &[(String, String)],
    ) -> String {
        let instruction = match mode {
            SessionMode::Deliberation => {
                "Give your perspective. Build on or dispute the points already made."
            }
            SessionMode::Inquiry => "Answer the question from your area of expertise.",
            SessionMode::Research => {
                "Investigate the plan from your area of expertise. Report findings with the evidence behind them."
            }
            SessionMode::Prediction => {
                "Give your forecast: the most likely outcome, your probability in percent and the timeline, with your reasoning."
            }
            SessionMode::Advisory => {
                "Give the petitioner practical advice from your perspective. Be kind and direct."
            }
            SessionMode::Proposal | SessionMode::Swarm | SessionMode::SwarmCoding => {
                "Give your contribution."
            }
        };
        format!(
            "{}\n\n{}\n{}",
            brief.render(),
            Self::render_transcript(transcript),
            instruction
        )
    }

    /// Speaker's closing turn for the linear modes
    pub fn closing(
        brief: &SessionBrief,
        mode: SessionMode,
        transcript: &[(String, String)],
    ) -> String {
        let instruction = match mode {
            SessionMode::Prediction => {
                "Deliver the council's final forecast in exactly this format:\n\
                 <outcome>the predicted outcome</outcome>\n\
                 <confidence>probability in percent</confidence>\n\
                 <timeline>when it resolves</timeline>\n\
                 <reasoning>why</reasoning>"
            }
            SessionMode::Research => {
                "Compile the final research dossier: findings, confidence in each, and remaining unknowns."
            }
            SessionMode::Inquiry => "Compile the council's answer into one clear response.",
            SessionMode::Swarm => "Aggregate the workers' results into one deliverable.",
            SessionMode::Advisory => {
                "Deliver the council's counsel: the recommendation, the main risks and the first step to take."
            }
            SessionMode::Deliberation | SessionMode::Proposal | SessionMode::SwarmCoding => {
                "Synthesise the discussion: points of agreement, open disagreements and the council's conclusion."
            }
        };
        format!(
            "{}\n\n{}\n{}",
            brief.render(),
            Self::render_transcript(transcript),
            instruction
        )
    }

    /// Councilor's first speech in a proposal debate
    pub fn debate_opening(brief: &SessionBrief, transcript: &[(String, String)]) -> String {
        format!(
            "{}\n\n{}\nState your position on the motion and your strongest argument.",
            brief.render(),
            Self::render_transcript(transcript)
        )
    }

    /// Councilor's later speech in a proposal debate
    pub fn debate_rebuttal(
        brief: &SessionBrief,
        transcript: &[(String, String)],
        challenged_by: Option<&str>,
    ) -> String {
        let instruction = match challenged_by {
            Some(name) => format!(
                "{} has challenged you. Answer their challenge directly, then restate where you stand.",
                name
            ),
            None => "Respond to the strongest argument against your position.".to_string(),
        };
        format!(
            "{}\n\n{}\n{}",
            brief.render(),
            Self::render_transcript(transcript),
            instruction
        )
    }

    /// Moderator stepping in after a chain of challenges
    pub fn moderator_interjection(brief: &SessionBrief, transcript: &[(String, String)]) -> String {
        format!(
            "{}\n\n{}\nThe debate is going in circles. Interject: name the loop, \
             summarise the unresolved points and direct the council to new ground.",
            brief.render(),
            Self::render_transcript(transcript)
        )
    }

    /// One-call simulated debate for economy mode
    pub fn economy_debate(brief: &SessionBrief, councilors: &[&Participant]) -> String {
        let roster = councilors
            .iter()
            .map(|p| {
                let persona = p.persona.lines().next().unwrap_or_default();
                format!("- {}: {}", p.name, persona)
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "{}\n\nSimulate the council's debate on this motion. The councilors are:\n{}\n\n\
             Give each councilor at least one speech in their own voice. Start every speech on a new \
             line with [TURN: Name] using the names above.",
            brief.render(),
            roster
        )
    }

    /// Speaker recording the council's votes
    pub fn vote_call(
        brief: &SessionBrief,
        transcript: &[(String, String)],
        councilors: &[&Participant],
    ) -> String {
        let names = councilors
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{}\n\n{}\nCall the vote. For each councilor ({}), record how they vote based on \
             their arguments, using exactly this format per councilor:\n\
             <voter>Name</voter>\n<vote>YEA or NAY</vote>\n<confidence>0-10</confidence>\n<reason>one sentence</reason>",
            brief.render(),
            Self::render_transcript(transcript),
            names
        )
    }

    /// Speaker's ruling after the vote
    pub fn resolution(brief: &SessionBrief, vote: Option<&VoteData>) -> String {
        let result = match vote {
            Some(v) => format!(
                "The motion is {}: {} yea, {} nay (weighted {:.1} to {:.1}), consensus {} ({}).",
                v.outcome, v.yeas, v.nays, v.weighted_yeas, v.weighted_nays, v.consensus_score, v.consensus_label
            ),
            None => "No valid votes were recorded.".to_string(),
        };
        format!(
            "{}\n\n{}\n\nDeliver the council's official ruling. Explain the outcome and, if \
             reconciliation is needed, what must change for the motion to pass.",
            brief.render(),
            result
        )
    }

    /// Speaker looking for gaps in the research findings
    pub fn gap_analysis(brief: &SessionBrief, transcript: &[(String, String)]) -> String {
        format!(
            "{}\n\n{}\nIdentify the gaps and contradictions in these findings. List each open \
             question as <task>question</task>.",
            brief.render(),
            Self::render_transcript(transcript)
        )
    }

    /// Council member filling one research gap
    pub fn gap_filling(brief: &SessionBrief, gap: &str) -> String {
        format!(
            "{}\n\nThe council's research left this question open:\n{}\n\nInvestigate it and report what you find.",
            brief.render(),
            gap
        )
    }

    /// Swarm worker executing one task
    pub fn swarm_task(brief: &SessionBrief, task: &str) -> String {
        format!("{}\n\nYour task:\n{}", brief.render(), task)
    }

    /// Speaker running one swarm-coding phase
    pub fn coding_phase(
        brief: &SessionBrief,
        phase: &SwarmCodingPhase,
        language: Option<&str>,
        transcript: &[(String, String)],
    ) -> String {
        let language = language
            .map(|l| format!("\nTarget language: {}", l))
            .unwrap_or_default();
        format!(
            "{}{}\n\n{}\nPhase: {}\n{}",
            brief.render(),
            language,
            Self::render_transcript(transcript),
            phase.name,
            phase.instruction
        )
    }

    /// Developer writing one file of the manifest
    pub fn developer_file(
        brief: &SessionBrief,
        file: &FileTask,
        language: Option<&str>,
        design: &str,
    ) -> String {
        let language = language
            .map(|l| format!(" The project language is {}.", l))
            .unwrap_or_default();
        format!(
            "{}\n\nDesign so far:\n{}\n\nWrite the complete contents of `{}` ({}).{} \
             Reply with a single fenced code block.",
            brief.render(),
            design,
            file.path,
            file.description,
            language
        )
    }

    fn render_transcript(transcript: &[(String, String)]) -> String {
        if transcript.is_empty() {
            return String::new();
        }
        let mut out = String::from("Council record so far:\n");
        for (author, content) in transcript {
            out.push_str(&format!("\n--- {} ---\n{}\n", author, content));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> SessionBrief {
        SessionBrief::new("Adopt a four-day work week")
            .with_context(Some("Pilot data from 60 firms".to_string()))
            .with_user_prompt(Some("  ".to_string()))
    }

    #[test]
    fn test_brief_render_skips_blank_fields() {
        let rendered = brief().render();
        assert!(rendered.contains("Adopt a four-day work week"));
        assert!(rendered.contains("Pilot data"));
        assert!(!rendered.contains("petitioner"));
    }

    #[test]
    fn test_councilor_system_prompt_has_debate_rules() {
        let p = Participant::new("councilor-skeptic", "Skeptic", ParticipantRole::Councilor, "m")
            .with_persona("You doubt everything.");
        let proposal = CouncilPrompt::system(&p, SessionMode::Proposal, &ToolSpec::new());
        assert!(proposal.contains("You doubt everything."));
        assert!(proposal.contains("[CHALLENGE: Name]"));
        assert!(proposal.contains("[PASS]"));
        assert!(!proposal.contains("```tool"));

        let deliberation = CouncilPrompt::system(&p, SessionMode::Deliberation, &ToolSpec::new());
        assert!(!deliberation.contains("[PASS]"));
    }

    #[test]
    fn test_system_prompt_lists_tools() {
        use crate::tool::entities::{ArgKind, ToolDefinition};
        let tools = ToolSpec::new().register(
            ToolDefinition::new("read_file", "Read a file").required(
                "path",
                ArgKind::Path,
                "File path",
            ),
        );
        let p = Participant::new("speaker", "Speaker", ParticipantRole::Speaker, "m");
        let prompt = CouncilPrompt::system(&p, SessionMode::Research, &tools);
        assert!(prompt.contains("- read_file: Read a file"));
        assert!(prompt.contains("path (path, required): File path"));
        assert!(prompt.contains("```tool"));
    }

    #[test]
    fn test_vote_call_names_councilors_and_tags() {
        let a = Participant::new("a", "Technocrat", ParticipantRole::Councilor, "m");
        let b = Participant::new("b", "Ethicist", ParticipantRole::Councilor, "m");
        let transcript = vec![("Technocrat".to_string(), "Productivity rose.".to_string())];
        let prompt = CouncilPrompt::vote_call(&brief(), &transcript, &[&a, &b]);
        assert!(prompt.contains("Technocrat, Ethicist"));
        assert!(prompt.contains("<voter>"));
        assert!(prompt.contains("--- Technocrat ---\nProductivity rose."));
    }

    #[test]
    fn test_prediction_closing_requests_tags() {
        let prompt = CouncilPrompt::closing(&brief(), SessionMode::Prediction, &[]);
        for tag in ["<outcome>", "<confidence>", "<timeline>", "<reasoning>"] {
            assert!(prompt.contains(tag));
        }
        assert!(!prompt.contains("Council record so far"));
    }

    #[test]
    fn test_swarm_coding_phases() {
        assert_eq!(SWARM_CODING_PHASES.len(), 12);
        assert_eq!(SWARM_CODING_PHASES[FILE_MANIFEST_PHASE].name, "File Manifest");
        assert!(SWARM_CODING_PHASES[FILE_MANIFEST_PHASE].instruction.contains("FILE: <path> | <description>"));
        assert_eq!(SWARM_CODING_PHASES[11].name, "Final Handoff");
    }

    #[test]
    fn test_economy_debate_uses_turn_delimiters() {
        let a = Participant::new("a", "Technocrat", ParticipantRole::Councilor, "m")
            .with_persona("Data first.\nSecond line.");
        let prompt = CouncilPrompt::economy_debate(&brief(), &[&a]);
        assert!(prompt.contains("- Technocrat: Data first."));
        assert!(!prompt.contains("Second line."));
        assert!(prompt.contains("[TURN: Name]"));
    }
}

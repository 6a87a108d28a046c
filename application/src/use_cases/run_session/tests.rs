use super::test_support::*;
use super::*;
use crate::ports::budget_guard::CallKind;
use council_domain::{AuthorKind, Participant, ParticipantRole, Roster};
use std::sync::Weak;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

const TOPIC: &str = "Adopt a four-day work week";

const VOTES: &str = "The council votes.\n\
    <voter>Alice</voter><vote>YEA</vote><confidence>9</confidence><reason>Productivity</reason>\n\
    <voter>Bob</voter><vote>YEA</vote><confidence>8</confidence><reason>Retention</reason>\n\
    <voter>Carol</voter><vote>NAY</vote><confidence>7</confidence><reason>Coverage</reason>";

fn orchestrator(invoker: Arc<ScriptedInvoker>, store: Arc<MemoryStore>) -> CouncilOrchestrator {
    CouncilOrchestrator::new(invoker, store).with_params(
        OrchestratorParams::default()
            .with_batch_delay(Duration::ZERO)
            .with_seed(Some(7)),
    )
}

fn input(session_id: &str, mode: ModeSettings) -> RunSessionInput {
    RunSessionInput::new(
        session_id,
        TOPIC,
        CouncilSettings::new(test_roster(), mode).with_max_concurrency(2),
    )
}

fn proposal() -> ModeSettings {
    ModeSettings::Proposal { economy: false }
}

fn deliberation() -> ModeSettings {
    ModeSettings::Deliberation { rounds: 1 }
}

/// Speaker answers the vote call and the ruling; councilors argue plainly
fn speaker_reply(prompt: &str) -> String {
    if prompt.contains("Call the vote") {
        VOTES.to_string()
    } else if prompt.contains("official ruling") {
        "The motion carries.".to_string()
    } else {
        "Order. The motion is before the council.".to_string()
    }
}

fn plain_responder(p: &Participant, prompt: &str, nth: usize) -> Result<String, String> {
    match p.role {
        ParticipantRole::Speaker => Ok(speaker_reply(prompt)),
        _ => Ok(format!("{} makes point {}.", p.name, nth)),
    }
}

/// (author, role label) of every participant message
fn spoken(output: &RunSessionOutput) -> Vec<(String, String)> {
    output
        .messages
        .iter()
        .filter(|m| m.author_kind == AuthorKind::Participant)
        .map(|m| (m.author.clone(), m.role_label.clone().unwrap_or_default()))
        .collect()
}

fn debate_speakers(output: &RunSessionOutput) -> Vec<String> {
    spoken(output)
        .into_iter()
        .filter(|(_, label)| label == "OPENING STATEMENT" || label == "REBUTTAL")
        .map(|(author, _)| author)
        .collect()
}

// ==================== Proposal Tests ====================

#[tokio::test]
async fn test_proposal_runs_every_phase() {
    let invoker = Arc::new(ScriptedInvoker::new(plain_responder));
    let store = Arc::new(MemoryStore::default());
    let precedents = Arc::new(RecordingPrecedents::default());
    let logger = Arc::new(RecordingLogger::default());
    let orchestrator = orchestrator(invoker.clone(), store.clone())
        .with_precedent_store(precedents.clone())
        .with_conversation_logger(logger.clone());

    let output = orchestrator.run_session(input("s-1", proposal())).await.unwrap();

    assert_eq!(output.outcome, RunOutcome::Completed);
    assert_eq!(output.status, SessionStatus::Adjourned);
    assert_eq!(
        store.status_history(),
        vec![
            SessionStatus::Opening,
            SessionStatus::Debating,
            SessionStatus::Voting,
            SessionStatus::Resolving,
            SessionStatus::Adjourned,
        ]
    );

    assert_eq!(output.messages[0].author_kind, AuthorKind::Human);
    assert_eq!(output.messages[0].content, TOPIC);
    let labels: Vec<String> = spoken(&output).into_iter().map(|(_, l)| l).collect();
    assert_eq!(
        labels,
        vec![
            "OPENING BRIEF",
            "OPENING STATEMENT",
            "OPENING STATEMENT",
            "OPENING STATEMENT",
            "VOTE TALLY",
            "OFFICIAL RULING",
        ]
    );
    assert_eq!(debate_speakers(&output), vec!["Alice", "Bob", "Carol"]);

    let vote = output.vote_data.as_ref().unwrap();
    assert_eq!((vote.yeas, vote.nays), (2, 1));
    assert_eq!(vote.consensus_score, 47);
    assert_eq!(output.consensus_label, Some(ConsensusLabel::Contentious));
    assert!(vote.outcome.is_passed());
    assert!(
        output
            .summary
            .starts_with("Motion PASSED — consensus 47 (Contentious)")
    );
    assert!(output.summary.ends_with("The motion carries."));

    let recorded = precedents.recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].topic, TOPIC);
    assert_eq!(recorded[0].ruling, "The motion carries.");
    let authors: Vec<&str> = recorded[0]
        .transcript
        .iter()
        .map(|s| s.author.as_str())
        .collect();
    assert_eq!(authors, vec!["Speaker", "Alice", "Bob", "Carol", "Speaker", "Speaker"]);
    assert_eq!(recorded[0].transcript[2].content, "Bob makes point 0.");
    assert_eq!(
        recorded[0].transcript.last().map(|s| s.content.as_str()),
        Some("The motion carries.")
    );

    let events = logger.event_types();
    assert!(events.contains(&"vote_tally"));
    assert_eq!(events.iter().filter(|e| **e == "turn_complete").count(), 6);
    assert_eq!(events.last(), Some(&"session_adjourned"));
    assert!(!orchestrator.is_running("s-1"));
}

#[tokio::test]
async fn test_challenge_moves_target_to_front() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| match (p.id.as_str(), nth) {
        ("alice", 0) => Ok("Four days is enough. [CHALLENGE: Carol] prove otherwise.".to_string()),
        _ => plain_responder(p, prompt, nth),
    }));
    let store = Arc::new(MemoryStore::default());
    let output = orchestrator(invoker.clone(), store)
        .run_session(input("s-2", proposal()))
        .await
        .unwrap();

    // Carol was third in the queue and jumps ahead of Bob
    assert_eq!(debate_speakers(&output), vec!["Alice", "Carol", "Bob"]);
    let carol = invoker.calls_for("carol");
    assert_eq!(carol.len(), 1);
    assert!(carol[0].prompt.contains("Alice has challenged you"));
}

#[tokio::test]
async fn test_rebuttal_chain_triggers_moderator() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| match (p.id.as_str(), nth) {
        ("alice", 0) => Ok("[CHALLENGE: Bob]".to_string()),
        ("bob", 0) => Ok("[CHALLENGE: Carol]".to_string()),
        ("carol", 0) => Ok("[CHALLENGE: Alice]".to_string()),
        ("alice", _) => Ok("I rest my case.".to_string()),
        _ => plain_responder(p, prompt, nth),
    }));
    let store = Arc::new(MemoryStore::default());
    let output = orchestrator(invoker.clone(), store)
        .run_session(input("s-3", proposal()))
        .await
        .unwrap();

    let interjections: Vec<(String, String)> = spoken(&output)
        .into_iter()
        .filter(|(_, label)| label == "MODERATOR INTERJECTION")
        .collect();
    assert_eq!(interjections.len(), 1);
    assert_eq!(interjections[0].0, "Moderator");

    assert_eq!(debate_speakers(&output), vec!["Alice", "Bob", "Carol", "Alice"]);
    let alice = invoker.calls_for("alice");
    assert!(alice[1].prompt.contains("Carol has challenged you"));
}

#[tokio::test]
async fn test_pass_is_not_recorded() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| match p.id.as_str() {
        "bob" => Ok("[PASS]".to_string()),
        _ => plain_responder(p, prompt, nth),
    }));
    let store = Arc::new(MemoryStore::default());
    let output = orchestrator(invoker.clone(), store)
        .run_session(input("s-4", proposal()))
        .await
        .unwrap();

    assert_eq!(invoker.calls_for("bob").len(), 1);
    assert_eq!(debate_speakers(&output), vec!["Alice", "Carol"]);
    assert!(output.messages.iter().all(|m| !m.content.contains("[PASS]")));
}

#[tokio::test]
async fn test_pass_after_thinking_is_not_recorded() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| match p.id.as_str() {
        "bob" => Ok("<think>Nothing new to add.</think>[PASS]".to_string()),
        _ => plain_responder(p, prompt, nth),
    }));
    let store = Arc::new(MemoryStore::default());
    let output = orchestrator(invoker.clone(), store)
        .run_session(input("s-4b", proposal()))
        .await
        .unwrap();

    assert_eq!(invoker.calls_for("bob").len(), 1);
    assert_eq!(debate_speakers(&output), vec!["Alice", "Carol"]);
    assert!(output.messages.iter().all(|m| m.author != "Bob"));
    assert!(output.messages.iter().all(|m| !m.content.contains("[PASS]")));
}

#[tokio::test]
async fn test_economy_debate_splits_transcript() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| {
        if prompt.contains("Simulate the council's debate") {
            Ok("Preamble.\n[TURN: Alice]\nI support it.\n[TURN: Bob]\nI doubt it.\n[TURN: Zed]\nWho am I?".to_string())
        } else {
            plain_responder(p, prompt, nth)
        }
    }));
    let store = Arc::new(MemoryStore::default());
    let output = orchestrator(invoker.clone(), store)
        .run_session(input("s-5", ModeSettings::Proposal { economy: true }))
        .await
        .unwrap();

    let simulated: Vec<&Message> = output
        .messages
        .iter()
        .filter(|m| m.role_label.as_deref() == Some("SIMULATED DEBATE"))
        .collect();
    let authors: Vec<&str> = simulated.iter().map(|m| m.author.as_str()).collect();
    assert_eq!(authors, vec!["Alice", "Bob", "Zed"]);
    assert_eq!(simulated[0].participant_id.as_deref(), Some("alice"));
    assert_eq!(simulated[0].content, "I support it.");
    assert_eq!(simulated[2].participant_id, None);

    assert!(invoker.calls_for("alice").is_empty());
    assert!(output.vote_data.is_some());
}

// ==================== Failure Handling Tests ====================

#[tokio::test]
async fn test_stop_before_batch_makes_no_calls() {
    let invoker = Arc::new(ScriptedInvoker::new(plain_responder));
    let store = Arc::new(MemoryStore::default());
    let orchestrator = Arc::new(orchestrator(invoker.clone(), store.clone()));

    let weak: Weak<CouncilOrchestrator> = Arc::downgrade(&orchestrator);
    invoker.set_hook(move |p| {
        if p.role == ParticipantRole::Speaker
            && let Some(orchestrator) = weak.upgrade()
        {
            assert!(orchestrator.stop_session("s-stop"));
        }
    });

    let output = orchestrator
        .run_session(input("s-stop", deliberation()))
        .await
        .unwrap();

    assert_eq!(output.outcome, RunOutcome::Halted);
    assert_eq!(invoker.calls().len(), 1);
    assert_eq!(output.status, SessionStatus::Adjourned);
    assert_eq!(
        store.status_history(),
        vec![SessionStatus::Opening, SessionStatus::Adjourned]
    );
    let last = output.messages.last().unwrap();
    assert!(last.is_system());
    assert_eq!(last.content, "Session halted by request.");
    assert_eq!(output.summary, "Session halted by request.");
    assert!(!orchestrator.is_running("s-stop"));
}

#[tokio::test]
async fn test_budget_denial_is_soft_and_paired() {
    let invoker = Arc::new(ScriptedInvoker::new(plain_responder));
    let store = Arc::new(MemoryStore::default());
    let budget = Arc::new(RecordingBudget::denying(&["bob"]));
    let output = orchestrator(invoker.clone(), store)
        .with_budget_guard(budget.clone())
        .run_session(input("s-budget", deliberation()))
        .await
        .unwrap();

    assert_eq!(output.outcome, RunOutcome::Completed);
    assert!(invoker.calls_for("bob").is_empty());
    assert!(output.messages.iter().any(|m| m.is_system()
        && m.content == "Bob was not called: call depth limit reached"));

    // opening, alice, carol, synthesis
    assert_eq!(budget.checks.load(Ordering::SeqCst), 5);
    assert_eq!(budget.recorded.load(Ordering::SeqCst), 4);
    assert_eq!(budget.completed.load(Ordering::SeqCst), 4);
    assert!(budget.tokens.load(Ordering::SeqCst) > 0);
    assert_eq!(
        budget.kinds(),
        vec![CallKind::Single, CallKind::Batched, CallKind::Batched, CallKind::Single]
    );
}

#[tokio::test]
async fn test_invoker_error_is_annotated_inline() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| match p.id.as_str() {
        "carol" => Err("model offline".to_string()),
        _ => plain_responder(p, prompt, nth),
    }));
    let store = Arc::new(MemoryStore::default());
    let budget = Arc::new(RecordingBudget::default());
    let output = orchestrator(invoker, store)
        .with_budget_guard(budget.clone())
        .run_session(input("s-err", deliberation()))
        .await
        .unwrap();

    assert_eq!(output.outcome, RunOutcome::Completed);
    let carol = output.messages.iter().find(|m| m.author == "Carol").unwrap();
    assert_eq!(carol.content, "[Error: Request failed: model offline]");
    assert!(output.messages.iter().any(|m| m.author == "Bob"));
    assert_eq!(
        budget.recorded.load(Ordering::SeqCst),
        budget.completed.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn test_missing_speaker_fails_pipeline() {
    let store = Arc::new(MemoryStore::default());
    let invoker = Arc::new(ScriptedInvoker::new(plain_responder));
    let roster = Roster::new(vec![participant("alice", "Alice", ParticipantRole::Councilor)]);
    let output = orchestrator(invoker.clone(), store.clone())
        .run_session(RunSessionInput::new(
            "s-nospeaker",
            TOPIC,
            CouncilSettings::new(roster, proposal()),
        ))
        .await
        .unwrap();

    assert!(matches!(output.outcome, RunOutcome::Failed(ref e) if e.contains("speaker")));
    assert_eq!(output.status, SessionStatus::Adjourned);
    assert!(invoker.calls().is_empty());
    let last = output.messages.last().unwrap();
    assert!(last.is_system());
    assert!(last.content.starts_with("Session failed: "));
    assert_eq!(output.summary, last.content);
}

#[tokio::test]
async fn test_rejected_petition_still_adjourns() {
    let store = Arc::new(MemoryStore::rejecting_petitions());
    let invoker = Arc::new(ScriptedInvoker::new(plain_responder));
    let orchestrator = orchestrator(invoker.clone(), store.clone());
    let output = orchestrator
        .run_session(input("s-petition", proposal()))
        .await
        .unwrap();

    assert!(matches!(output.outcome, RunOutcome::Failed(ref e) if e.contains("petition rejected")));
    assert_eq!(output.status, SessionStatus::Adjourned);
    assert_eq!(store.status_history(), vec![SessionStatus::Adjourned]);
    assert!(invoker.calls().is_empty());
    assert!(output.summary.starts_with("Session failed: "));
    assert!(!orchestrator.is_running("s-petition"));
}

#[tokio::test]
async fn test_snapshot_reads_back_like_the_run() {
    let store = Arc::new(MemoryStore::default());
    let output = orchestrator(Arc::new(ScriptedInvoker::new(plain_responder)), store.clone())
        .run_session(input("s-snap", proposal()))
        .await
        .unwrap();

    let snapshot = store.get_session("s-snap").unwrap();
    let restored = RunSessionOutput::from_snapshot(&snapshot, 400);
    assert_eq!(restored.outcome, RunOutcome::Completed);
    assert_eq!(restored.summary, output.summary);
    assert_eq!(restored.messages.len(), output.messages.len());
    assert_eq!(restored.consensus_label, Some(ConsensusLabel::Contentious));

    let failed = Arc::new(MemoryStore::rejecting_petitions());
    orchestrator(Arc::new(ScriptedInvoker::new(plain_responder)), failed.clone())
        .run_session(input("s-snap-failed", proposal()))
        .await
        .unwrap();
    let restored =
        RunSessionOutput::from_snapshot(&failed.get_session("s-snap-failed").unwrap(), 400);
    assert!(matches!(restored.outcome, RunOutcome::Failed(ref e) if e.contains("petition rejected")));
    assert!(restored.summary.starts_with("Session failed: "));
}

#[test]
fn test_unfinished_snapshot_reads_as_failed() {
    let mut session = Session::new(
        "s-crashed",
        TOPIC,
        CouncilSettings::new(test_roster(), deliberation()),
    );
    session.apply_status(SessionStatus::Opening).unwrap();

    let restored = RunSessionOutput::from_snapshot(&session, 400);
    assert_eq!(restored.status, SessionStatus::Opening);
    assert!(matches!(restored.outcome, RunOutcome::Failed(ref e) if e.contains("opening")));
}

#[tokio::test]
async fn test_invalid_and_adjourned_sessions_are_rejected() {
    let store = Arc::new(MemoryStore::default());
    let orchestrator = orchestrator(Arc::new(ScriptedInvoker::new(plain_responder)), store);

    let mut blank = input("s-blank", deliberation());
    blank.topic = "   ".to_string();
    assert!(matches!(
        orchestrator.run_session(blank).await,
        Err(RunSessionError::InvalidInput(_))
    ));

    orchestrator.run_session(input("s-once", deliberation())).await.unwrap();
    assert!(matches!(
        orchestrator.run_session(input("s-once", deliberation())).await,
        Err(RunSessionError::AlreadyAdjourned(_))
    ));

    assert!(!orchestrator.stop_session("unknown"));
    assert_eq!(orchestrator.pause_session("unknown"), None);
}

// ==================== Concurrency Tests ====================

#[tokio::test]
async fn test_second_run_of_same_session_is_rejected() {
    let gate = Arc::new(Semaphore::new(0));
    let invoker = Arc::new(ScriptedInvoker::new(plain_responder).with_gate(gate.clone()));
    let store = Arc::new(MemoryStore::default());
    let orchestrator = orchestrator(invoker, store);

    let first = orchestrator.run_session(input("s-dup", deliberation()));
    let second = async {
        while !orchestrator.is_running("s-dup") {
            tokio::task::yield_now().await;
        }
        let result = orchestrator.run_session(input("s-dup", deliberation())).await;
        gate.add_permits(64);
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(second, Err(RunSessionError::AlreadyRunning(ref id)) if id == "s-dup"));
    assert_eq!(first.unwrap().outcome, RunOutcome::Completed);
    assert!(!orchestrator.is_running("s-dup"));
}

#[tokio::test]
async fn test_pause_during_debate_suspends_and_flips_status() {
    let invoker = Arc::new(ScriptedInvoker::new(plain_responder));
    let store = Arc::new(MemoryStore::default());
    let orchestrator = Arc::new(orchestrator(invoker.clone(), store.clone()));

    let weak = Arc::downgrade(&orchestrator);
    let fired = AtomicBool::new(false);
    invoker.set_hook(move |p| {
        if p.id == "alice"
            && !fired.swap(true, Ordering::SeqCst)
            && let Some(orchestrator) = weak.upgrade()
        {
            assert_eq!(orchestrator.pause_session("s-pause"), Some(true));
        }
    });

    let run = orchestrator.run_session(input("s-pause", deliberation()));
    let resume = async {
        loop {
            let status = store.get_session("s-pause").map(|s| s.status());
            if status == Some(SessionStatus::Paused) {
                break;
            }
            tokio::task::yield_now().await;
        }
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        // Carol's chunk cannot start while paused
        let carol_calls = invoker.calls_for("carol").len();
        assert_eq!(orchestrator.pause_session("s-pause"), Some(false));
        carol_calls
    };
    let (output, carol_calls_while_paused) = tokio::join!(run, resume);

    assert_eq!(carol_calls_while_paused, 0);
    assert_eq!(invoker.calls_for("carol").len(), 1);
    assert_eq!(output.unwrap().outcome, RunOutcome::Completed);
    assert_eq!(
        store.status_history(),
        vec![
            SessionStatus::Opening,
            SessionStatus::Debating,
            SessionStatus::Paused,
            SessionStatus::Debating,
            SessionStatus::Resolving,
            SessionStatus::Adjourned,
        ]
    );
}

#[tokio::test]
async fn test_pause_outside_debate_only_holds_checkpoint() {
    let invoker = Arc::new(ScriptedInvoker::new(plain_responder));
    let store = Arc::new(MemoryStore::default());
    let orchestrator = Arc::new(orchestrator(invoker.clone(), store.clone()));

    let weak = Arc::downgrade(&orchestrator);
    let fired = AtomicBool::new(false);
    invoker.set_hook(move |p| {
        if p.role == ParticipantRole::Speaker
            && !fired.swap(true, Ordering::SeqCst)
            && let Some(orchestrator) = weak.upgrade()
        {
            assert_eq!(orchestrator.pause_session("s-hold"), Some(true));
        }
    });

    let run = orchestrator.run_session(input("s-hold", deliberation()));
    let resume = async {
        while invoker.calls().is_empty() {
            tokio::task::yield_now().await;
        }
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let status = store.get_session("s-hold").map(|s| s.status());
        let calls = invoker.calls().len();
        assert_eq!(orchestrator.pause_session("s-hold"), Some(false));
        (status, calls)
    };
    let (output, (status_while_paused, calls_while_paused)) = tokio::join!(run, resume);

    assert_eq!(status_while_paused, Some(SessionStatus::Opening));
    assert_eq!(calls_while_paused, 1);
    assert_eq!(output.unwrap().outcome, RunOutcome::Completed);
    assert!(!store.status_history().contains(&SessionStatus::Paused));
}

// ==================== Other Mode Tests ====================

#[tokio::test]
async fn test_tool_output_is_appended_to_message() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| match p.id.as_str() {
        "alice" => Ok("Let me check.\n```tool\n{\"tool\": \"echo\", \"args\": {\"text\": \"hello\"}}\n```".to_string()),
        _ => plain_responder(p, prompt, nth),
    }));
    let store = Arc::new(MemoryStore::default());
    let output = orchestrator(invoker, store)
        .with_tools(Arc::new(EchoTools::default()))
        .run_session(input("s-tools", deliberation()))
        .await
        .unwrap();

    let alice = output.messages.iter().find(|m| m.author == "Alice").unwrap();
    assert!(alice.content.starts_with("Let me check."));
    assert!(alice.content.ends_with("[Tool result: echo]\nHELLO"));
}

#[tokio::test]
async fn test_thinking_is_split_from_content() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| match p.id.as_str() {
        "bob" => Ok("<think>weigh costs</think>Costs dominate.".to_string()),
        _ => plain_responder(p, prompt, nth),
    }));
    let store = Arc::new(MemoryStore::default());
    let output = orchestrator(invoker, store)
        .run_session(input("s-think", deliberation()))
        .await
        .unwrap();

    let bob = output.messages.iter().find(|m| m.author == "Bob").unwrap();
    assert_eq!(bob.content, "Costs dominate.");
    assert_eq!(bob.thinking.as_deref(), Some("weigh costs"));
}

#[tokio::test]
async fn test_prediction_is_extracted() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| {
        if p.role == ParticipantRole::Speaker && prompt.contains("final forecast") {
            Ok("<outcome>Adopted by 2030</outcome><confidence>70%</confidence>\
                <timeline>Q3 2030</timeline><reasoning>Pilots succeed</reasoning>"
                .to_string())
        } else {
            plain_responder(p, prompt, nth)
        }
    }));
    let store = Arc::new(MemoryStore::default());
    let logger = Arc::new(RecordingLogger::default());
    let output = orchestrator(invoker, store.clone())
        .with_conversation_logger(logger.clone())
        .run_session(input("s-predict", ModeSettings::Prediction))
        .await
        .unwrap();

    let prediction = output.prediction_data.unwrap();
    assert_eq!(prediction.outcome, "Adopted by 2030");
    assert_eq!(prediction.confidence, 70);
    assert_eq!(prediction.timeline, "Q3 2030");
    assert_eq!(
        output.summary,
        "Prediction: Adopted by 2030 (70% confidence, timeline: Q3 2030)"
    );
    assert!(logger.event_types().contains(&"prediction"));
    assert_eq!(
        store.status_history(),
        vec![
            SessionStatus::Opening,
            SessionStatus::Debating,
            SessionStatus::Resolving,
            SessionStatus::Adjourned,
        ]
    );
}

#[tokio::test]
async fn test_research_reconciles_gaps() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| {
        if p.role == ParticipantRole::Speaker && prompt.contains("Identify the gaps") {
            Ok("<task>Sick leave impact</task><task>Customer coverage</task>".to_string())
        } else {
            plain_responder(p, prompt, nth)
        }
    }));
    let store = Arc::new(MemoryStore::default());
    let output = orchestrator(invoker.clone(), store.clone())
        .run_session(input("s-research", ModeSettings::Research { follow_up: true }))
        .await
        .unwrap();

    assert_eq!(
        store.status_history(),
        vec![
            SessionStatus::Opening,
            SessionStatus::Debating,
            SessionStatus::Reconciling,
            SessionStatus::Resolving,
            SessionStatus::Adjourned,
        ]
    );
    let fillers: Vec<String> = spoken(&output)
        .into_iter()
        .filter(|(_, label)| label == "GAP FILLING")
        .map(|(author, _)| author)
        .collect();
    assert_eq!(fillers, vec!["Alice", "Bob"]);
    assert!(invoker.calls_for("alice")[1].prompt.contains("Sick leave impact"));
}

#[tokio::test]
async fn test_swarm_coding_writes_manifest_files() {
    let invoker = Arc::new(ScriptedInvoker::new(|_, prompt, _| {
        if prompt.contains("Write the complete contents of") {
            Ok("Here you go:\n```rust\nfn main() {}\n```".to_string())
        } else if prompt.contains("Phase: File Manifest") {
            Ok("FILE: src/main.rs | entry point\nFILE: src/lib.rs | library".to_string())
        } else {
            Ok("Notes.".to_string())
        }
    }));
    let store = Arc::new(MemoryStore::default());
    let output = orchestrator(invoker.clone(), store.clone())
        .run_session(input(
            "s-code",
            ModeSettings::SwarmCoding {
                language: Some("Rust".to_string()),
            },
        ))
        .await
        .unwrap();

    assert_eq!(invoker.calls_for("speaker").len(), 12);
    let files = output.generated_files.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, "src/main.rs");
    assert_eq!(files[0].language, "rust");
    assert_eq!(files[0].content, "fn main() {}");
    assert_eq!(files[0].author, "Alice");
    assert_eq!(files[1].author, "Bob");
    assert_eq!(
        store.status_history(),
        vec![
            SessionStatus::Opening,
            SessionStatus::Debating,
            SessionStatus::Resolving,
            SessionStatus::Adjourned,
        ]
    );
    assert_eq!(output.summary, "Notes.");
}

#[tokio::test]
async fn test_inquiry_addresses_one_councilor() {
    let invoker = Arc::new(ScriptedInvoker::new(plain_responder));
    let store = Arc::new(MemoryStore::default());
    orchestrator(invoker.clone(), store)
        .run_session(input(
            "s-ask",
            ModeSettings::Inquiry {
                addressed_to: Some("carol".to_string()),
            },
        ))
        .await
        .unwrap();

    assert_eq!(invoker.calls_for("carol").len(), 1);
    assert!(invoker.calls_for("alice").is_empty());
    assert!(invoker.calls_for("bob").is_empty());
}

#[tokio::test]
async fn test_swarm_distributes_tasks_round_robin() {
    let invoker = Arc::new(ScriptedInvoker::new(|p, prompt, nth| {
        if p.role == ParticipantRole::Speaker && prompt.contains("Decompose") {
            Ok("<task>a</task><task>b</task><task>c</task><task>d</task>".to_string())
        } else {
            plain_responder(p, prompt, nth)
        }
    }));
    let store = Arc::new(MemoryStore::default());
    orchestrator(invoker.clone(), store)
        .run_session(input("s-swarm", ModeSettings::Swarm))
        .await
        .unwrap();

    assert_eq!(invoker.calls_for("alice").len(), 2);
    assert_eq!(invoker.calls_for("bob").len(), 1);
    assert_eq!(invoker.calls_for("carol").len(), 1);
}

use std::sync::Arc;

use bridge_agent::QueryAgent;
use tracing::{debug, info};

use crate::error::{FlowError, Result};
use crate::extract::extract_numbered;
use crate::questions::INTAKE_QUESTIONS;
use crate::store::{IntakeRecord, QaPair, SessionStore};

/// Tool-call headers understood by the catalog; kept verbatim so the remote
/// tools recognize the instruction.
const FOLLOWUP_TOOL_HEADER: &str = "CALL_TOOL five_questions_analysis_and_followup";
const FINAL_ANALYSIS_TOOL_HEADER: &str =
    "CALL_TOOL prompt_optimizer_mcp_server_five_and_followup_questions_final_analysis";

const FOLLOWUP_COUNT: usize = 3;

/// Drives the three-round conversation: intake → follow-up questions →
/// final synthesis. Each round is one independent request; only the intake
/// record survives between rounds, held by the injected [`SessionStore`].
pub struct InteractiveFlow {
    agent: Arc<dyn QueryAgent>,
    store: Arc<dyn SessionStore>,
}

impl InteractiveFlow {
    pub fn new(agent: Arc<dyn QueryAgent>, store: Arc<dyn SessionStore>) -> Self {
        Self { agent, store }
    }

    /// Round 1 → 2: persist the five intake pairs (overwriting any prior
    /// record for this session), ask the catalog to analyze them, and return
    /// the extracted follow-up questions: up to three, fewer if the model
    /// produced fewer.
    pub async fn submit_intake(
        &self,
        session_id: &str,
        answers: Vec<String>,
    ) -> Result<Vec<String>> {
        if answers.len() != INTAKE_QUESTIONS.len() {
            return Err(FlowError::InvalidSubmission(format!(
                "expected {} intake answers, got {}",
                INTAKE_QUESTIONS.len(),
                answers.len()
            )));
        }

        let record: IntakeRecord = INTAKE_QUESTIONS
            .iter()
            .zip(answers)
            .map(|(question, answer)| QaPair {
                question: (*question).to_string(),
                answer: answer.trim().to_string(),
            })
            .collect();
        self.store.save(session_id, record.clone()).await?;

        let mut lines = vec![FOLLOWUP_TOOL_HEADER.to_string()];
        for pair in &record {
            lines.push(format!(
                "Question: {}\nAnswer: {}",
                pair.question, pair.answer
            ));
        }
        let instruction = lines.join("\n\n");

        let raw = self.agent.query(&instruction).await?;
        let followups = extract_numbered(&raw, FOLLOWUP_COUNT);
        info!(
            "intake for session '{}' produced {} follow-up question(s)",
            session_id,
            followups.len()
        );

        Ok(followups)
    }

    /// Round 2 → 3: synthesize the final optimized prompt from the stored
    /// intake pairs followed by the submitted follow-up pairs, in that fixed
    /// order. A missing intake record (expired or skipped session) is not an
    /// error; the synthesis simply runs on fewer pairs.
    pub async fn submit_followups(
        &self,
        session_id: &str,
        questions: Vec<String>,
        answers: Vec<String>,
    ) -> Result<String> {
        if questions.len() != answers.len() {
            return Err(FlowError::InvalidSubmission(format!(
                "{} follow-up questions but {} answers",
                questions.len(),
                answers.len()
            )));
        }

        let intake = self.store.load(session_id).await?.unwrap_or_default();
        if intake.is_empty() {
            debug!(
                "no intake record for session '{}', synthesizing from follow-ups only",
                session_id
            );
        }

        let followups: Vec<QaPair> = questions
            .into_iter()
            .zip(answers)
            .map(|(question, answer)| QaPair { question, answer })
            .collect();

        let mut lines = vec![FINAL_ANALYSIS_TOOL_HEADER.to_string()];
        for pair in intake.iter().chain(followups.iter()) {
            lines.push(format!("Q: {}\nA: {}", pair.question, pair.answer));
        }
        let instruction = lines.join("\n\n");

        let analysis = self.agent.query(&instruction).await?;

        // Terminal state: the record has served its purpose.
        self.store.remove(session_id).await?;
        info!("session '{}' completed", session_id);

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySessionStore;
    use async_trait::async_trait;
    use bridge_agent::BridgeError;
    use std::sync::Mutex;

    /// Records every instruction and answers from a script.
    struct FakeAgent {
        instructions: Mutex<Vec<String>>,
        responses: Mutex<Vec<String>>,
    }

    impl FakeAgent {
        fn new(responses: Vec<&str>) -> Self {
            Self {
                instructions: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            }
        }

        fn instructions(&self) -> Vec<String> {
            self.instructions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryAgent for FakeAgent {
        async fn query(&self, instruction: &str) -> bridge_agent::Result<String> {
            self.instructions
                .lock()
                .unwrap()
                .push(instruction.to_string());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(BridgeError::Unavailable);
            }
            Ok(responses.remove(0))
        }
    }

    fn five_answers() -> Vec<String> {
        vec![
            "write a sonnet".to_string(),
            "it is about autumn".to_string(),
            "fourteen lines".to_string(),
            "poetry readers".to_string(),
            "  avoid clichés  ".to_string(),
        ]
    }

    #[tokio::test]
    async fn intake_persists_pairs_and_extracts_followups() {
        let agent = Arc::new(FakeAgent::new(vec![
            "Sure! Here you go:\n1. Which form?\n2. What tone?\n3. How long?\nHope that helps.",
        ]));
        let store = Arc::new(InMemorySessionStore::new());
        let flow = InteractiveFlow::new(agent.clone(), store.clone());

        let followups = flow.submit_intake("s1", five_answers()).await.unwrap();

        assert_eq!(followups, vec!["Which form?", "What tone?", "How long?"]);

        let record = store.load("s1").await.unwrap().unwrap();
        assert_eq!(record.len(), 5);
        assert_eq!(record[0].question, INTAKE_QUESTIONS[0]);
        assert_eq!(record[4].answer, "avoid clichés");

        let instruction = &agent.instructions()[0];
        assert!(instruction.starts_with("CALL_TOOL five_questions_analysis_and_followup"));
        assert!(instruction.contains("Question: What is your goal or what do you want to achieve?\nAnswer: write a sonnet"));
    }

    #[tokio::test]
    async fn intake_is_lenient_about_followup_shortfall() {
        let agent = Arc::new(FakeAgent::new(vec!["1. Only question?"]));
        let store = Arc::new(InMemorySessionStore::new());
        let flow = InteractiveFlow::new(agent, store);

        let followups = flow.submit_intake("s1", five_answers()).await.unwrap();
        assert_eq!(followups, vec!["Only question?"]);
    }

    #[tokio::test]
    async fn intake_rejects_the_wrong_number_of_answers() {
        let agent = Arc::new(FakeAgent::new(vec![]));
        let store = Arc::new(InMemorySessionStore::new());
        let flow = InteractiveFlow::new(agent.clone(), store);

        let err = flow
            .submit_intake("s1", vec!["only one".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidSubmission(_)));
        assert!(agent.instructions().is_empty());
    }

    #[tokio::test]
    async fn full_round_trip_reuses_the_intake_record_byte_for_byte() {
        let agent = Arc::new(FakeAgent::new(vec![
            "1. Which form?\n2. What tone?\n3. How long?",
            "FINAL OPTIMIZED PROMPT",
        ]));
        let store = Arc::new(InMemorySessionStore::new());
        let flow = InteractiveFlow::new(agent.clone(), store.clone());

        let followups = flow.submit_intake("s1", five_answers()).await.unwrap();
        let analysis = flow
            .submit_followups(
                "s1",
                followups.clone(),
                vec![
                    "a sonnet".to_string(),
                    "wistful".to_string(),
                    "fourteen lines".to_string(),
                ],
            )
            .await
            .unwrap();

        assert_eq!(analysis, "FINAL OPTIMIZED PROMPT");

        let final_instruction = &agent.instructions()[1];
        assert!(final_instruction.starts_with(
            "CALL_TOOL prompt_optimizer_mcp_server_five_and_followup_questions_final_analysis"
        ));
        // intake pairs come first, byte-identical to what round 1 stored
        for (question, answer) in INTAKE_QUESTIONS.iter().zip([
            "write a sonnet",
            "it is about autumn",
            "fourteen lines",
            "poetry readers",
            "avoid clichés",
        ]) {
            assert!(final_instruction.contains(&format!("Q: {}\nA: {}", question, answer)));
        }
        // followup pairs come after the intake block
        let intake_pos = final_instruction
            .find("Q: What is your goal")
            .expect("intake pair present");
        let followup_pos = final_instruction
            .find("Q: Which form?")
            .expect("followup pair present");
        assert!(intake_pos < followup_pos);

        // terminal state: the record is gone
        assert!(store.load("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_intake_record_synthesizes_from_followups_only() {
        let agent = Arc::new(FakeAgent::new(vec!["STILL AN ANSWER"]));
        let store = Arc::new(InMemorySessionStore::new());
        let flow = InteractiveFlow::new(agent.clone(), store);

        let analysis = flow
            .submit_followups(
                "expired",
                vec!["Q1?".to_string()],
                vec!["A1".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(analysis, "STILL AN ANSWER");
        let instruction = &agent.instructions()[0];
        assert!(!instruction.contains("What is your goal"));
        assert!(instruction.contains("Q: Q1?\nA: A1"));
    }

    #[tokio::test]
    async fn mismatched_followup_lengths_are_rejected() {
        let agent = Arc::new(FakeAgent::new(vec![]));
        let store = Arc::new(InMemorySessionStore::new());
        let flow = InteractiveFlow::new(agent.clone(), store);

        let err = flow
            .submit_followups("s1", vec!["Q1?".to_string()], vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidSubmission(_)));
        assert!(agent.instructions().is_empty());
    }

    #[tokio::test]
    async fn failed_synthesis_keeps_the_record_for_a_retry() {
        let agent = Arc::new(FakeAgent::new(vec![
            "1. Which form?\n2. What tone?\n3. How long?",
            // script exhausted afterwards → synthesis fails
        ]));
        let store = Arc::new(InMemorySessionStore::new());
        let flow = InteractiveFlow::new(agent, store.clone());

        flow.submit_intake("s1", five_answers()).await.unwrap();
        let err = flow
            .submit_followups("s1", vec!["Q1?".to_string()], vec!["A1".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Agent(_)));
        assert!(store.load("s1").await.unwrap().is_some());
    }
}

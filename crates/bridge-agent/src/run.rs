/// One tool invocation observed during an agent exchange, with the literal
/// text the tool returned (not the model's rendering of it).
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub name: String,
    pub raw_result: String,
}

/// Execution record of one agent query.
#[derive(Debug, Clone, Default)]
pub struct AgentRun {
    /// The model's composed answer
    pub content: String,
    /// Tool invocations in the order they ran
    pub tool_invocations: Vec<ToolInvocation>,
}

impl AgentRun {
    /// The externally visible answer. When a tool ran, its raw output wins
    /// over the model's paraphrase; the model may summarize, translate or
    /// otherwise distort literal tool output.
    pub fn final_text(&self) -> String {
        match self.tool_invocations.first() {
            Some(invocation) => invocation.raw_result.trim().to_string(),
            None => self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_output_wins_over_paraphrase() {
        let run = AgentRun {
            content: "Here is a nicer version of your prompt: ...".to_string(),
            tool_invocations: vec![ToolInvocation {
                name: "one_shot_optimization".to_string(),
                raw_result: "  Optimized prompt.  ".to_string(),
            }],
        };
        assert_eq!(run.final_text(), "Optimized prompt.");
    }

    #[test]
    fn first_invocation_is_preferred() {
        let run = AgentRun {
            content: String::new(),
            tool_invocations: vec![
                ToolInvocation {
                    name: "a".to_string(),
                    raw_result: "first".to_string(),
                },
                ToolInvocation {
                    name: "b".to_string(),
                    raw_result: "second".to_string(),
                },
            ],
        };
        assert_eq!(run.final_text(), "first");
    }

    #[test]
    fn model_content_is_the_answer_when_no_tool_ran() {
        let run = AgentRun {
            content: "direct answer".to_string(),
            tool_invocations: Vec::new(),
        };
        assert_eq!(run.final_text(), "direct answer");
    }
}

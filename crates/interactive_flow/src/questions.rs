/// The fixed intake questions, in presentation order. The same sequence is
/// used to render the form, validate submissions and build the analysis
/// instruction, so question text and collected answer always line up by
/// ordinal.
pub const INTAKE_QUESTIONS: [&str; 5] = [
    "What is your goal or what do you want to achieve?",
    "What specific information or input do you have?",
    "What format or output style do you prefer?",
    "Who is the target audience, if any?",
    "Are there any constraints or things to avoid/include?",
];

use mathwise_core::classify::is_wh_question;
use mathwise_core::{EnvelopeBuilder, ProblemType, ResultEnvelope};

/// Fixed redirect for inputs that failed the math-likelihood gate. Never
/// touches an engine and never carries steps.
pub fn respond(raw: &str) -> ResultEnvelope {
    let solution = if is_wh_question(raw) {
        format!(
            "I'm mathwise, a math expert. For non-math questions like '{raw}', please consult a general AI assistant."
        )
    } else {
        format!(
            "I specialize in mathematics. For question '{raw}', I recommend using a general AI assistant."
        )
    };
    EnvelopeBuilder::new(ProblemType::GeneralQuestion, false)
        .solution(solution)
        .build()
}

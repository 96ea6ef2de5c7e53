use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedStep {
    pub step: String,
    pub explanation: String,
}

/// Pair each step with the explanation at the same index, or `""` when the
/// explanations run out. The output always has `steps.len()` entries.
pub fn combine(steps: &[String], explanations: &[String]) -> Vec<DetailedStep> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| DetailedStep {
            step: step.clone(),
            explanation: explanations.get(i).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Append-only step and explanation sequences written by a strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepTrace {
    steps: Vec<String>,
    explanations: Vec<String>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: impl Into<String>, explanation: impl Into<String>) {
        self.steps.push(step.into());
        self.explanations.push(explanation.into());
    }

    pub fn push_step(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    pub fn push_explanation(&mut self, explanation: impl Into<String>) {
        self.explanations.push(explanation.into());
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn explanations(&self) -> &[String] {
        &self.explanations
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn detailed(&self) -> Vec<DetailedStep> {
        combine(&self.steps, &self.explanations)
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.steps, self.explanations)
    }
}

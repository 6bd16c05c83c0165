use rand::RngCore;

use super::{ContentRequest, ContentResolver};
use crate::model::{QuizQuestion, SourceTag};

/// Last tier: generic text that always answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateResolver;

pub fn explanation_text(concept: &str) -> String {
    format!(
        "{concept} is a concept related to decentralized finance (DeFi) and the Compound Protocol. \
         For more specific information, please check the documentation or the lesson topics."
    )
}

pub fn quiz_question(concept: &str) -> QuizQuestion {
    QuizQuestion {
        question: format!("Which of the following best describes {concept}?"),
        options: vec![
            "A mechanism in the Compound Protocol".to_string(),
            "A type of cryptocurrency token".to_string(),
            "A DeFi lending strategy".to_string(),
            "A blockchain consensus algorithm".to_string(),
        ],
        correct_index: 0,
        explanation: "This is a generic question. Pick a lesson topic for a curated quiz."
            .to_string(),
    }
}

impl ContentResolver for TemplateResolver {
    fn tag(&self) -> SourceTag {
        SourceTag::Fallback
    }

    fn explain(&self, request: &ContentRequest) -> Option<String> {
        Some(explanation_text(&request.concept))
    }

    fn quiz(
        &self,
        request: &ContentRequest,
        _rng: &mut dyn RngCore,
    ) -> Option<(QuizQuestion, Option<usize>)> {
        Some((quiz_question(&request.concept), None))
    }
}

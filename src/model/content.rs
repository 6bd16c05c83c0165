use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::topic::Topic;

/// Which resolver tier produced a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Hand-written lesson material.
    Curated,
    /// Keyword-matched glossary entry.
    Glossary,
    /// Generic template text.
    Fallback,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Curated => "curated",
            SourceTag::Glossary => "glossary",
            SourceTag::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Explanation {
    pub text: String,
    pub source: SourceTag,
}

/// A four-option multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_index
    }
}

/// A question handed to the learner, with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(flatten)]
    pub question: QuizQuestion,
    /// Topic and bank position for curated questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_index: Option<usize>,
    pub source: SourceTag,
}

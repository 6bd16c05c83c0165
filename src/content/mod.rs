//! Lesson text and quiz selection.
//!
//! Content comes from an ordered chain of resolvers. Each one either answers
//! a request or passes; the first answer wins and is tagged with the tier
//! that produced it. The default chain is curated bank, then glossary, then
//! a generic template that always answers.

pub mod curated;
pub mod glossary;
pub mod template;

use anyhow::Result;
use rand::RngCore;

use crate::model::{Difficulty, Explanation, Quiz, QuizQuestion, SourceTag, Topic};

pub use curated::CuratedBank;
pub use glossary::Glossary;
pub use template::TemplateResolver;

/// What the learner asked about.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRequest {
    /// Free text as entered (topic id, topic title or any concept).
    pub concept: String,
    /// Set when the concept names a known topic.
    pub topic: Option<Topic>,
    pub difficulty: Difficulty,
}

impl ContentRequest {
    pub fn new(concept: &str, difficulty: Difficulty) -> Self {
        Self {
            concept: concept.trim().to_string(),
            topic: Topic::lookup(concept),
            difficulty,
        }
    }

    pub fn for_topic(topic: Topic, difficulty: Difficulty) -> Self {
        Self {
            concept: topic.title().to_string(),
            topic: Some(topic),
            difficulty,
        }
    }
}

/// One tier of the content chain.
pub trait ContentResolver: Send + Sync {
    fn tag(&self) -> SourceTag;

    fn explain(&self, request: &ContentRequest) -> Option<String>;

    /// A question plus its position in the resolver's bank, if it has one.
    fn quiz(
        &self,
        request: &ContentRequest,
        rng: &mut dyn RngCore,
    ) -> Option<(QuizQuestion, Option<usize>)>;

    /// Look up a specific banked question. Only curated tiers have a bank.
    fn question(&self, _topic: Topic, _index: usize) -> Option<QuizQuestion> {
        None
    }
}

/// Ordered resolver chain.
pub struct ContentSelector {
    resolvers: Vec<Box<dyn ContentResolver>>,
}

impl ContentSelector {
    pub fn new(resolvers: Vec<Box<dyn ContentResolver>>) -> Self {
        Self { resolvers }
    }

    /// Curated bank → glossary → template, using the embedded data files.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(vec![
            Box::new(CuratedBank::embedded()?),
            Box::new(Glossary::embedded()?),
            Box::new(TemplateResolver),
        ]))
    }

    pub fn explain(&self, concept: &str, difficulty: Difficulty) -> Explanation {
        self.explain_request(&ContentRequest::new(concept, difficulty))
    }

    pub fn explain_request(&self, request: &ContentRequest) -> Explanation {
        self.resolvers
            .iter()
            .find_map(|r| {
                r.explain(request).map(|text| Explanation {
                    text,
                    source: r.tag(),
                })
            })
            .unwrap_or_else(|| Explanation {
                text: template::explanation_text(&request.concept),
                source: SourceTag::Fallback,
            })
    }

    pub fn quiz_for(&self, concept: &str) -> Quiz {
        self.quiz_with_rng(concept, &mut rand::rng())
    }

    pub fn quiz_with_rng(&self, concept: &str, rng: &mut dyn RngCore) -> Quiz {
        let request = ContentRequest::new(concept, Difficulty::default());
        for resolver in &self.resolvers {
            if let Some((question, bank_index)) = resolver.quiz(&request, rng) {
                return Quiz {
                    question,
                    topic: bank_index.and(request.topic),
                    bank_index,
                    source: resolver.tag(),
                };
            }
        }
        Quiz {
            question: template::quiz_question(&request.concept),
            topic: None,
            bank_index: None,
            source: SourceTag::Fallback,
        }
    }

    /// Fetch a banked question by topic and index.
    pub fn question(&self, topic: Topic, index: usize) -> Option<QuizQuestion> {
        self.resolvers.iter().find_map(|r| r.question(topic, index))
    }
}

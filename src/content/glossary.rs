use anyhow::{Context, Result};
use rand::RngCore;
use rand::seq::SliceRandom;
use serde::Deserialize;

use super::{ContentRequest, ContentResolver};
use crate::model::{QuizQuestion, SourceTag};

const GLOSSARY_JSON: &str = include_str!("../../data/glossary.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    pub explanation: String,
}

/// Term definitions matched by keyword.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    entries: Vec<GlossaryEntry>,
}

impl Glossary {
    pub fn new(entries: Vec<GlossaryEntry>) -> Self {
        Self { entries }
    }

    pub fn embedded() -> Result<Self> {
        let entries: Vec<GlossaryEntry> =
            serde_json::from_str(GLOSSARY_JSON).context("parsing glossary")?;
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[GlossaryEntry] {
        &self.entries
    }

    /// Exact term match first, then a term contained in the concept or vice versa.
    pub fn lookup(&self, concept: &str) -> Option<&GlossaryEntry> {
        let needle = concept.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|e| e.term.to_lowercase() == needle)
            .or_else(|| {
                self.entries.iter().find(|e| {
                    let term = e.term.to_lowercase();
                    needle.contains(&term) || term.contains(&needle)
                })
            })
    }
}

impl ContentResolver for Glossary {
    fn tag(&self) -> SourceTag {
        SourceTag::Glossary
    }

    fn explain(&self, request: &ContentRequest) -> Option<String> {
        self.lookup(&request.concept).map(|e| e.explanation.clone())
    }

    /// Ask for the matched term's definition, with other definitions as distractors.
    fn quiz(
        &self,
        request: &ContentRequest,
        rng: &mut dyn RngCore,
    ) -> Option<(QuizQuestion, Option<usize>)> {
        let entry = self.lookup(&request.concept)?;

        let mut distractors: Vec<&GlossaryEntry> =
            self.entries.iter().filter(|e| e.term != entry.term).collect();
        if distractors.len() < 3 {
            return None;
        }
        distractors.shuffle(rng);

        let mut options: Vec<&GlossaryEntry> = distractors.into_iter().take(3).collect();
        options.push(entry);
        options.shuffle(rng);
        let correct_index = options.iter().position(|e| e.term == entry.term)?;

        Some((
            QuizQuestion {
                question: format!("Which statement best describes {}?", entry.term),
                options: options.iter().map(|e| e.explanation.clone()).collect(),
                correct_index,
                explanation: format!("{}: {}", entry.term, entry.explanation),
            },
            None,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_beats_partial() {
        let glossary = Glossary::embedded().unwrap();
        assert_eq!(glossary.lookup("collateral").unwrap().term, "Collateral");
        assert_eq!(
            glossary.lookup("what is a health factor").unwrap().term,
            "Health Factor"
        );
        assert!(glossary.lookup("   ").is_none());
        assert!(glossary.lookup("flash loan").is_none());
    }
}

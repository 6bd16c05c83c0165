use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use rand::RngCore;
use rand::seq::IndexedRandom;
use serde::Deserialize;

use super::{ContentRequest, ContentResolver};
use crate::model::{Difficulty, QuizQuestion, SourceTag, Topic};

const LESSONS_JSON: &str = include_str!("../../data/lessons.json");
const QUIZ_BANK_JSON: &str = include_str!("../../data/quiz_bank.json");

/// Lesson text for one topic at each difficulty.
#[derive(Debug, Clone, Deserialize)]
pub struct Lesson {
    pub beginner: String,
    pub intermediate: String,
    pub advanced: String,
}

impl Lesson {
    pub fn at(&self, difficulty: Difficulty) -> &str {
        match difficulty {
            Difficulty::Beginner => &self.beginner,
            Difficulty::Intermediate => &self.intermediate,
            Difficulty::Advanced => &self.advanced,
        }
    }
}

/// Hand-written lessons and quiz questions, keyed by topic.
#[derive(Debug, Clone, Default)]
pub struct CuratedBank {
    lessons: HashMap<Topic, Lesson>,
    quizzes: HashMap<Topic, Vec<QuizQuestion>>,
}

impl CuratedBank {
    pub fn new(lessons: HashMap<Topic, Lesson>, quizzes: HashMap<Topic, Vec<QuizQuestion>>) -> Self {
        Self { lessons, quizzes }
    }

    /// Load the bank compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(LESSONS_JSON, QUIZ_BANK_JSON)
    }

    pub fn from_json(lessons_json: &str, quizzes_json: &str) -> Result<Self> {
        let lessons: HashMap<Topic, Lesson> =
            serde_json::from_str(lessons_json).context("parsing lessons")?;
        let quizzes: HashMap<Topic, Vec<QuizQuestion>> =
            serde_json::from_str(quizzes_json).context("parsing quiz bank")?;

        for (topic, questions) in &quizzes {
            for (i, q) in questions.iter().enumerate() {
                if q.correct_index >= q.options.len() {
                    bail!(
                        "Quiz `{topic}` question {i} has correct index {} but only {} options",
                        q.correct_index,
                        q.options.len()
                    );
                }
            }
        }

        Ok(Self::new(lessons, quizzes))
    }

    pub fn lesson(&self, topic: Topic) -> Option<&Lesson> {
        self.lessons.get(&topic)
    }

    pub fn questions(&self, topic: Topic) -> &[QuizQuestion] {
        self.quizzes.get(&topic).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl ContentResolver for CuratedBank {
    fn tag(&self) -> SourceTag {
        SourceTag::Curated
    }

    fn explain(&self, request: &ContentRequest) -> Option<String> {
        let lesson = self.lesson(request.topic?)?;
        Some(lesson.at(request.difficulty).to_string())
    }

    fn quiz(
        &self,
        request: &ContentRequest,
        rng: &mut dyn RngCore,
    ) -> Option<(QuizQuestion, Option<usize>)> {
        let questions = self.questions(request.topic?);
        let indices: Vec<usize> = (0..questions.len()).collect();
        let &index = indices.choose(rng)?;
        Some((questions[index].clone(), Some(index)))
    }

    fn question(&self, topic: Topic, index: usize) -> Option<QuizQuestion> {
        self.questions(topic).get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_bank_covers_every_topic() {
        let bank = CuratedBank::embedded().unwrap();
        for topic in Topic::ALL {
            assert!(bank.lesson(topic).is_some(), "no lesson for {topic}");
            assert_eq!(bank.questions(topic).len(), 4, "quiz bank for {topic}");
        }
    }

    #[test]
    fn test_out_of_range_answer_rejected() {
        let quizzes = r#"{"apy":[{"question":"q","options":["a","b"],"correctIndex":2,"explanation":"e"}]}"#;
        assert!(CuratedBank::from_json("{}", quizzes).is_err());
    }
}

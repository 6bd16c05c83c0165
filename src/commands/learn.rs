use anyhow::{Result, anyhow, bail};

use learnfi::model::{Difficulty, Quiz, SourceTag, Topic};

use super::Session;
use crate::cli::GlobalArgs;

pub fn explain(global: &GlobalArgs, concept: &str, difficulty: Difficulty) -> Result<()> {
    let session = Session::open(global)?;
    let explanation = session.state.explain(concept, difficulty);
    println!("{}", explanation.text);
    println!("\n[{} · {}]", explanation.source.as_str(), difficulty);
    Ok(())
}

pub fn quiz(global: &GlobalArgs, concept: &str) -> Result<()> {
    let session = Session::open(global)?;
    let quiz = session.state.quiz_for(concept);

    println!("{}", quiz.question.question);
    for (i, option) in quiz.question.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }

    match (quiz.topic, quiz.bank_index) {
        (Some(topic), Some(index)) => {
            println!(
                "\nAnswer with: learnfi answer {} <choice> --question {}",
                topic.id(),
                index + 1
            );
        }
        _ => {
            // Only banked questions can be graded later; show the key now.
            println!(
                "\n[{}] practice question, answer: {}",
                quiz.source.as_str(),
                quiz.question.correct_index + 1
            );
        }
    }
    Ok(())
}

pub fn answer(global: &GlobalArgs, topic: &str, question: usize, choice: usize) -> Result<()> {
    let topic: Topic = Topic::lookup(topic)
        .ok_or_else(|| anyhow!("Unknown topic '{topic}'. Use a topic id such as `ctoken` or `apy`."))?;
    if question == 0 || choice == 0 {
        bail!("Question and choice numbers start at 1");
    }

    let mut session = Session::open(global)?;
    let asked = session
        .state
        .content()
        .question(topic, question - 1)
        .ok_or_else(|| anyhow!("No question {question} for {}", topic.title()))?;
    if choice > asked.options.len() {
        bail!("Choice must be between 1 and {}", asked.options.len());
    }

    let quiz = Quiz {
        question: asked,
        topic: Some(topic),
        bank_index: Some(question - 1),
        source: SourceTag::Curated,
    };
    let result = session.state.answer_quiz(&quiz, choice - 1);

    if result.correct {
        println!("Correct! {}", result.explanation);
    } else {
        println!(
            "Not quite. The answer was {}. {}",
            quiz.question.correct_index + 1,
            result.explanation
        );
    }
    if let Some(badge) = &result.badge {
        println!("Badge earned: {}", badge.name);
    }
    if let Some(level) = result.level_up {
        println!("Level up! You are now level {level}.");
    }
    if result.correct {
        if let Some(next) = topic.next() {
            println!("Next topic: {} (learnfi explain {})", next.title(), next.id());
        }
    }
    Ok(())
}

//! Reflection Prompts
//!
//! The fixed question set shown in the selector, the feedback tone labels,
//! and composition of the instruction sent to the feedback service.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selector entry that asks for a random question
pub const RANDOM_QUESTION: &str = "Random Question";

/// Fixed reflection questions (the random sentinel is not part of this list)
pub const REFLECTION_QUESTIONS: [&str; 8] = [
    "How are you feeling today emotionally?",
    "What’s one thing you're grateful for today?",
    "What challenges did you face recently, and how did you navigate them?",
    "What positive thing happened today, big or small?",
    "What helps you relax when you feel stressed, and how often do you practice it?",
    "Describe a recent moment when you felt truly at peace.",
    "What is one small step you can take today towards your well-being goals?",
    "If you could give your past self advice about stress, what would it be?",
];

/// Persona framing placed at the start of every instruction
pub const COACH_PERSONA: &str = "a compassionate and non-judgmental mental wellness coach";

/// The question a fresh session starts on
pub fn default_question() -> &'static str {
    REFLECTION_QUESTIONS[0]
}

/// Entries offered by the question selector, sentinel last
pub fn selector_entries() -> Vec<&'static str> {
    let mut entries: Vec<&'static str> = REFLECTION_QUESTIONS.to_vec();
    entries.push(RANDOM_QUESTION);
    entries
}

/// What the user picked in the question selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "question", rename_all = "snake_case")]
pub enum QuestionChoice {
    /// A literal question string
    Fixed(String),
    /// Draw one question uniformly from the fixed set
    Random,
}

impl QuestionChoice {
    /// Parse a selector value; the sentinel and "random" map to `Random`
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("random") || trimmed == RANDOM_QUESTION {
            QuestionChoice::Random
        } else {
            QuestionChoice::Fixed(trimmed.to_string())
        }
    }

    /// Resolve this choice to a concrete question using `rng` for the random case
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self {
            QuestionChoice::Fixed(question) => question.clone(),
            QuestionChoice::Random => REFLECTION_QUESTIONS
                .choose(rng)
                .copied()
                .unwrap_or_else(default_question)
                .to_string(),
        }
    }
}

impl From<&str> for QuestionChoice {
    fn from(value: &str) -> Self {
        QuestionChoice::parse(value)
    }
}

/// Requested emotional register of the feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackStyle {
    #[default]
    Gentle,
    Practical,
    Reflective,
    Uplifting,
}

impl FeedbackStyle {
    pub const ALL: [FeedbackStyle; 4] = [
        FeedbackStyle::Gentle,
        FeedbackStyle::Practical,
        FeedbackStyle::Reflective,
        FeedbackStyle::Uplifting,
    ];

    /// Label shown to the user and placed in the instruction
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackStyle::Gentle => "Gentle & Encouraging",
            FeedbackStyle::Practical => "Practical & Actionable",
            FeedbackStyle::Reflective => "Reflective & Insightful",
            FeedbackStyle::Uplifting => "Uplifting & Motivational",
        }
    }

    /// Short form used in form values and JSON
    pub fn slug(&self) -> &'static str {
        match self {
            FeedbackStyle::Gentle => "gentle",
            FeedbackStyle::Practical => "practical",
            FeedbackStyle::Reflective => "reflective",
            FeedbackStyle::Uplifting => "uplifting",
        }
    }

    /// What the coach should focus on for this tone
    fn guidance(&self) -> &'static str {
        match self {
            FeedbackStyle::Gentle => {
                "Focus on active listening, validation of feelings, and offering positive \
                 reinforcement or simple, actionable suggestions for well-being."
            }
            FeedbackStyle::Practical => {
                "Acknowledge the feelings briefly, then offer two or three concrete, \
                 realistic steps the person could try in the next day or two."
            }
            FeedbackStyle::Reflective => {
                "Mirror back what you hear, gently point out patterns or strengths in the \
                 reflection, and close with one open question for further thought."
            }
            FeedbackStyle::Uplifting => {
                "Highlight what is going well, celebrate effort and resilience, and end \
                 with an energising but grounded note of encouragement."
            }
        }
    }
}

impl fmt::Display for FeedbackStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown tone label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown feedback style: {0}")]
pub struct UnknownStyle(pub String);

impl FromStr for FeedbackStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        FeedbackStyle::ALL
            .iter()
            .copied()
            .find(|style| {
                needle.eq_ignore_ascii_case(style.slug()) || needle.eq_ignore_ascii_case(style.label())
            })
            .ok_or_else(|| UnknownStyle(needle.to_string()))
    }
}

/// Build the instruction sent to the feedback service
pub fn compose_feedback_prompt(question: &str, draft: &str, style: FeedbackStyle) -> String {
    format!(
        "As {persona}, provide feedback in a {tone} tone on the following reflection. \
         {guidance} The reflection is in response to the question: '{question}'.\n\n\
         User's Reflection: \"{draft}\"",
        persona = COACH_PERSONA,
        tone = style.label(),
        guidance = style.guidance(),
        question = question,
        draft = draft,
    )
}

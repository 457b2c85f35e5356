// src/models/question.rs

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// `Answer: B` / `**Answer:** B) ...` style designator line.
static ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\**\s*answer\s*\**\s*[:\-]\s*(.+?)\s*$").expect("valid answer regex")
});

/// Leading `Q3:` / `Question 3.` / `12)` numbering on a prompt line.
static PROMPT_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\**\s*(?:q(?:uestion)?\s*)?\d+\s*[).:\-]\**\s*").expect("valid prompt regex")
});

/// Leading `A)` / `(b)` / `C.` labels on an option line.
static OPTION_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\(?([a-d])[)\].:]\s*").expect("valid option regex"));

/// A bare option letter, optionally wrapped in punctuation: `b`, `B)`, `(c)`.
static BARE_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\(?([a-d])[)\].:]?$").expect("valid letter regex"));

/// One multiple-choice question parsed out of the provider's free-form
/// response. Never persisted; lives only inside a quiz session.
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub prompt: String,
    /// Exactly four options, in the order the provider listed them.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer, resolved at parse time.
    #[serde(skip)]
    pub correct_index: usize,
}

impl QuizQuestion {
    /// The text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    /// Grades a submitted answer. Accepts the option text or its bare
    /// letter, case-insensitively, with or without an `A)`-style label.
    pub fn is_correct(&self, selected: &str) -> bool {
        let selected = selected.trim();

        if let Some(caps) = BARE_LETTER_RE.captures(selected) {
            let letter = caps[1].to_ascii_lowercase().chars().next();
            return letter.map(|l| l as usize - 'a' as usize) == Some(self.correct_index);
        }

        let stripped = OPTION_PREFIX_RE.replace(selected, "");
        stripped.trim().eq_ignore_ascii_case(self.correct_option())
    }
}

/// Parses the provider's raw response into discrete questions.
///
/// The provider output is untrusted input: blocks are only accepted when
/// they decompose into a prompt line, four option lines, and an answer
/// designator that resolves to one of those options. Anything else is
/// discarded with a warning; parsing never panics and never indexes
/// without a bounds check.
pub fn parse_generated_questions(raw: &str) -> Vec<QuizQuestion> {
    let normalized = raw.replace("\r\n", "\n");

    let mut questions = Vec::new();

    for block in normalized.split("\n\n") {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.len() < 6 {
            if !lines.is_empty() {
                tracing::warn!("Discarding malformed question block ({} lines)", lines.len());
            }
            continue;
        }

        // The answer designator is usually the last line, but scan from the
        // end in case the provider appended commentary.
        let Some(answer_pos) = lines.iter().rposition(|l| ANSWER_RE.is_match(l)) else {
            tracing::warn!("Discarding question block without an answer line");
            continue;
        };
        if answer_pos < 5 {
            tracing::warn!("Discarding question block with too few option lines");
            continue;
        }

        let prompt = PROMPT_PREFIX_RE.replace(lines[0], "").trim().to_string();
        if prompt.is_empty() {
            tracing::warn!("Discarding question block with empty prompt");
            continue;
        }

        let options: Vec<String> = lines[1..answer_pos]
            .iter()
            .take(4)
            .map(|l| OPTION_PREFIX_RE.replace(l, "").trim().to_string())
            .collect();
        if options.len() < 4 || options.iter().any(|o| o.is_empty()) {
            tracing::warn!("Discarding question block with fewer than four options");
            continue;
        }

        let Some(designator) = ANSWER_RE
            .captures(lines[answer_pos])
            .map(|caps| caps[1].trim_matches('*').trim().to_string())
        else {
            continue;
        };

        let Some(correct_index) = resolve_answer(&designator, &options) else {
            tracing::warn!("Discarding question whose answer '{}' matches no option", designator);
            continue;
        };

        questions.push(QuizQuestion {
            prompt,
            options,
            correct_index,
        });
    }

    questions
}

/// Resolves an answer designator (`B`, `b)`, or the literal option text)
/// to an option index.
fn resolve_answer(designator: &str, options: &[String]) -> Option<usize> {
    if let Some(caps) = BARE_LETTER_RE.captures(designator) {
        let letter = caps[1].to_ascii_lowercase().chars().next()?;
        let index = letter as usize - 'a' as usize;
        return (index < options.len()).then_some(index);
    }

    let text = OPTION_PREFIX_RE.replace(designator, "");
    let text = text.trim();
    options
        .iter()
        .position(|o| o.eq_ignore_ascii_case(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
1. What does JVM stand for?
A) Java Virtual Machine
B) Java Vendor Model
C) Joint Virtual Machine
D) Java Visual Machine
Answer: A

2. Which AWS service stores objects?
A) EC2
B) S3
C) Lambda
D) RDS
Answer: B) S3";

    #[test]
    fn parses_well_formed_blocks() {
        let questions = parse_generated_questions(WELL_FORMED);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].prompt, "What does JVM stand for?");
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[0].correct_option(), "Java Virtual Machine");
        // `Answer: B) S3` resolves through the letter
        assert_eq!(questions[1].correct_option(), "S3");
    }

    #[test]
    fn answer_may_be_literal_option_text() {
        let raw = "\
What is 2 + 2?
A) 3
B) 4
C) 5
D) 22
Answer: 4";
        let questions = parse_generated_questions(raw);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_index, 1);
    }

    #[test]
    fn short_blocks_are_discarded_not_fatal() {
        let raw = "\
Broken question with no options
Answer: A

What does JVM stand for?
A) Java Virtual Machine
B) Java Vendor Model
C) Joint Virtual Machine
D) Java Visual Machine
Answer: A";
        let questions = parse_generated_questions(raw);
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn unresolvable_answer_is_discarded() {
        let raw = "\
Pick a color.
A) Red
B) Green
C) Blue
D) Yellow
Answer: Purple";
        assert!(parse_generated_questions(raw).is_empty());
    }

    #[test]
    fn missing_answer_line_is_discarded() {
        let raw = "\
Pick a color.
A) Red
B) Green
C) Blue
D) Yellow
E) Purple";
        assert!(parse_generated_questions(raw).is_empty());
    }

    #[test]
    fn tolerates_markdown_and_crlf() {
        let raw = "**Question 1:** What does JVM stand for?\r\n\
(a) Java Virtual Machine\r\n\
(b) Java Vendor Model\r\n\
(c) Joint Virtual Machine\r\n\
(d) Java Visual Machine\r\n\
**Answer:** a\r\n";
        let questions = parse_generated_questions(raw);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt, "What does JVM stand for?");
        assert_eq!(questions[0].correct_index, 0);
    }

    #[test]
    fn grading_accepts_text_letter_or_labelled_option() {
        let questions = parse_generated_questions(WELL_FORMED);
        let q = &questions[0];
        assert!(q.is_correct("Java Virtual Machine"));
        assert!(q.is_correct("java virtual machine"));
        assert!(q.is_correct("A"));
        assert!(q.is_correct("a)"));
        assert!(q.is_correct("A) Java Virtual Machine"));
        assert!(!q.is_correct("B"));
        assert!(!q.is_correct("Java Vendor Model"));
    }

    #[test]
    fn empty_input_yields_no_questions() {
        assert!(parse_generated_questions("").is_empty());
        assert!(parse_generated_questions("\n\n\n").is_empty());
    }
}

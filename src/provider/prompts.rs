//! Prompt builders for the generative provider.

use crate::models::batch::Batch;

/// Prompt for the course/job-role recommendation table shown on the
/// recommendations view. The provider is asked for HTML; the response is
/// sanitized before it is cached or served.
pub fn recommendation_prompt(batch: Batch) -> String {
    format!(
        "Provide a list of 5 relevant e-books, websites, and 5 job roles for someone in the {}. \
         Format it in an HTML table with columns: 'Course/Resource', 'Type', and 'Job Role'.",
        batch.label()
    )
}

/// Prompt for a multiple-choice quiz. The expected shape per question is a
/// prompt line, four option lines, and a final `Answer: <letter>` line,
/// with blank lines between questions. The parser does not rely on the
/// provider honouring this exactly.
pub fn mcq_prompt(batch: Batch, count: usize) -> String {
    format!(
        "Generate {} multiple-choice questions for the {} with four answer options each \
         labelled A) to D). After the options of each question, add a line of the form \
         'Answer: <letter>' identifying the correct option. Separate questions with a blank line.",
        count,
        batch.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcq_prompt_mentions_count_and_batch() {
        let p = mcq_prompt(Batch::Java, 15);
        assert!(p.contains("15"));
        assert!(p.contains("Java Batch"));
    }
}

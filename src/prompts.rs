//! Prompt text for requirement extraction.
//!
//! Callers can override the instruction block via
//! [`crate::config::ExtractorConfig::instructions`]; the constant here is used
//! only when no override is provided.

/// Default instructions appended after the extracted document text.
pub const REQUIREMENTS_INSTRUCTIONS: &str = "Extract all requirements from the provided PDF, capturing both the code and the description for each requirement.
Structure the output as a table with two fields: 'code' and 'description'.
The 'code' should contain the requirement code or identifier.
The 'description' field should contain the full text of the requirement between brackets.
Format the output in CSV to ensure compatibility with Excel.";

/// Embed `extracted_text` in the default extraction prompt.
pub fn requirements_prompt(extracted_text: &str) -> String {
    requirements_prompt_with(extracted_text, REQUIREMENTS_INSTRUCTIONS)
}

/// Embed `extracted_text` followed by custom `instructions`.
pub fn requirements_prompt_with(extracted_text: &str, instructions: &str) -> String {
    format!(
        "Extracted text:\n\n{}\n\n{}\n",
        extracted_text.trim_end(),
        instructions.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_puts_text_before_instructions() {
        let p = requirements_prompt("REQ-001 The unit shall survive 50 g.");
        let text_at = p.find("REQ-001").unwrap();
        let instr_at = p.find("Extract all requirements").unwrap();
        assert!(p.starts_with("Extracted text:"));
        assert!(text_at < instr_at);
    }

    #[test]
    fn prompt_names_both_columns_and_csv() {
        let p = requirements_prompt("x");
        assert!(p.contains("'code'"));
        assert!(p.contains("'description'"));
        assert!(p.contains("CSV"));
    }

    #[test]
    fn custom_instructions_replace_default() {
        let p = requirements_prompt_with("body", "  List every shall-statement as JSON.  ");
        assert!(p.ends_with("List every shall-statement as JSON.\n"));
        assert!(!p.contains("Excel"));
    }
}

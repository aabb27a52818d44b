//! Prompt text for batch review and chat.

/// Batch review prompt: checks to run and the exact JSON shape to return.
pub fn batch_prompt(context: &str) -> String {
    format!(
        r#"You are a marketing copy QA assistant. Analyze this project and identify issues.

Project Data:
{context}

Check for:
1. Grammar and spelling errors
2. Inconsistent terminology across markets
3. Tone inconsistencies
4. Missing or placeholder content
5. Character length issues (too long for UI)
6. Cultural sensitivity concerns

Respond ONLY with valid JSON in this format:
{{
  "issues": [
    {{
      "severity": "error|warning|suggestion",
      "deliverable": "Gallery 1",
      "field": "Headline",
      "market": "en-US",
      "message": "Description of issue",
      "suggestion": "Optional fix"
    }}
  ],
  "summary": {{
    "totalIssues": 0,
    "errors": 0,
    "warnings": 0,
    "suggestions": 0
  }}
}}

DO NOT include any text outside the JSON object. DO NOT use markdown code blocks."#
    )
}

/// First chat turn: the project context the conversation is about.
pub fn chat_preamble(context: &str) -> String {
    format!(
        "You are a helpful marketing copy QA assistant. You have access to this project data:\n\n\
         {context}\n\n\
         The user will ask questions about the copy. Provide helpful, specific answers."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_prompt_embeds_context_and_schema() {
        let prompt = batch_prompt("Markets: en-US\n");
        assert!(prompt.contains("Project Data:\nMarkets: en-US\n"));
        assert!(prompt.contains("\"totalIssues\": 0"));
        assert!(prompt.ends_with("DO NOT use markdown code blocks."));
    }

    #[test]
    fn test_chat_preamble() {
        let preamble = chat_preamble("CTX");
        assert!(preamble.contains("project data:\n\nCTX\n\nThe user"));
    }
}

/// A fixed instructional prompt with a single slot for file content.
///
/// The content is embedded verbatim: no escaping, no truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Short name used in log lines
    pub name: &'static str,
    head: &'static str,
    tail: &'static str,
}

impl PromptTemplate {
    /// Build the full prompt for one file
    pub fn render(&self, content: &str) -> String {
        let mut prompt = String::with_capacity(self.head.len() + content.len() + self.tail.len());
        prompt.push_str(self.head);
        prompt.push_str(content);
        prompt.push_str(self.tail);
        prompt
    }
}

/// Prompt for generating a test file from a Dart/Flutter source file
pub const GENERATE_TESTS_PROMPT: PromptTemplate = PromptTemplate {
    name: "generate-tests",
    head: r#"
      Analyze this Dart/Flutter code and generate comprehensive test cases:

      "#,
    tail: r#"

      Generate test cases that cover:
      1. Unit tests for all public methods
      2. Edge cases and error handling
      3. Widget tests for UI components
      4. Integration test scenarios
      5. Performance test considerations

      Return only valid Dart test code using flutter_test package.
    "#,
};

/// Prompt for grading an existing Flutter test file
pub const ANALYZE_TESTS_PROMPT: PromptTemplate = PromptTemplate {
    name: "analyze-tests",
    head: r#"
      Analyze this Flutter test file for quality and completeness:

      "#,
    tail: r#"

      Evaluate:
      1. Test coverage completeness
      2. Edge case handling
      3. Test structure and organization
      4. Performance considerations
      5. Best practices adherence

      Provide a score (1-10) and specific recommendations for improvement.
    "#,
};

//! Pipeline job definitions
//!
//! A job bundles everything a run needs to know about one kind of work:
//! where to look, what to match, which prompt to send and where results go.

use std::path::{Path, PathBuf};

use super::paths::SuffixRule;
use super::scanner::SuffixPredicate;
use super::writer::PostProcess;
use crate::ai::prompts::{PromptTemplate, ANALYZE_TESTS_PROMPT, GENERATE_TESTS_PROMPT};

/// Source file extension
pub const DART_SUFFIX: &str = ".dart";

/// Test file naming convention
pub const DART_TEST_SUFFIX: &str = "_test.dart";

/// Import every generated test must carry
pub const FLUTTER_TEST_IMPORT: &str = "import 'package:flutter_test/flutter_test.dart';";

/// Where derived outputs land
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPlacement {
    /// Mirror the input tree under another root
    Mirror(PathBuf),

    /// Next to the source file
    InPlace,
}

/// One kind of scan-and-transform run
#[derive(Debug, Clone)]
pub struct PipelineJob {
    /// Short name used in log lines
    pub name: &'static str,

    pub input_root: PathBuf,
    pub placement: OutputPlacement,
    pub predicate: SuffixPredicate,
    pub rule: SuffixRule,
    pub template: PromptTemplate,
    pub post_process: PostProcess,

    /// When set, each artifact is also printed to stdout under
    /// `=== <label> for <file name> ===`
    pub echo_label: Option<&'static str>,
}

impl PipelineJob {
    /// Generate `test/ai_generated/<rel>_test.dart` for every `lib/**.dart`
    pub fn generate_tests(project_root: &Path) -> Self {
        Self {
            name: "generate",
            input_root: project_root.join("lib"),
            placement: OutputPlacement::Mirror(project_root.join("test").join("ai_generated")),
            predicate: SuffixPredicate::new(DART_SUFFIX),
            rule: SuffixRule::new(DART_SUFFIX, DART_TEST_SUFFIX),
            template: GENERATE_TESTS_PROMPT,
            post_process: PostProcess::SourceCode {
                required_import: FLUTTER_TEST_IMPORT.to_string(),
            },
            echo_label: None,
        }
    }

    /// Grade every `test/**_test.dart`, writing `<name>_test_analysis.md` beside it
    pub fn analyze_tests(project_root: &Path) -> Self {
        Self {
            name: "analyze",
            input_root: project_root.join("test"),
            placement: OutputPlacement::InPlace,
            predicate: SuffixPredicate::new(DART_TEST_SUFFIX),
            rule: SuffixRule::new(DART_SUFFIX, "_analysis.md"),
            template: ANALYZE_TESTS_PROMPT,
            post_process: PostProcess::Verbatim,
            echo_label: Some("Analysis"),
        }
    }

    pub fn with_input_root(mut self, input_root: PathBuf) -> Self {
        self.input_root = input_root;
        self
    }

    pub fn with_placement(mut self, placement: OutputPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Output root for a scan rooted at `scanned_root`
    pub fn output_root(&self, scanned_root: &Path) -> PathBuf {
        match &self.placement {
            OutputPlacement::Mirror(root) => root.clone(),
            OutputPlacement::InPlace => scanned_root.to_path_buf(),
        }
    }
}

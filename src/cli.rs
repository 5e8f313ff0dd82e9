//! Command line entry
//!
//! Two subcommands, each running one pipeline over the whole project once:
//!   1. `generate`: write AI-generated tests for every `lib/**.dart`
//!   2. `analyze`: grade every `test/**_test.dart` and save the report

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, warn};

use crate::ai::GeminiClient;
use crate::config::{GenerationConfig, API_KEY_VAR};
use crate::pipeline::{OutputPlacement, PipelineJob, PipelineRunner};

#[derive(Parser, Debug)]
#[command(
    name = "testforge",
    version,
    about = "Generate and grade Flutter tests with a generative-language API."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate tests for every Dart source file under lib/
    Generate(RunArgs),

    /// Grade every *_test.dart under test/ and write *_analysis.md reports
    Analyze(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Project root containing lib/ and test/
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// Scan this directory instead of the default one under the project root
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Write outputs under this directory, mirroring the input tree
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Pause between files in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay_ms: u64,
}

impl Commands {
    fn args(&self) -> &RunArgs {
        match self {
            Commands::Generate(args) | Commands::Analyze(args) => args,
        }
    }

    fn completion_message(&self) -> &'static str {
        match self {
            Commands::Generate(_) => "AI test generation completed!",
            Commands::Analyze(_) => "Test quality analysis completed!",
        }
    }
}

impl Cli {
    /// Job described by the parsed arguments
    pub fn job(&self) -> PipelineJob {
        let args = self.command.args();

        let mut job = match &self.command {
            Commands::Generate(_) => PipelineJob::generate_tests(&args.project_root),
            Commands::Analyze(_) => PipelineJob::analyze_tests(&args.project_root),
        };

        if let Some(input) = &args.input {
            job = job.with_input_root(input.clone());
        }
        if let Some(output) = &args.output {
            job = job.with_placement(OutputPlacement::Mirror(output.clone()));
        }

        job
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.command.args().delay_ms)
    }

    /// Run the selected pipeline once
    ///
    /// Per-file failures still exit successfully; only a failed scan or
    /// write produces a failure code.
    pub async fn run(self) -> ExitCode {
        let config = GenerationConfig::from_env();
        if !config.has_api_key() {
            warn!(
                "{} is not set; every generation request will be rejected by the remote service",
                API_KEY_VAR
            );
        }

        let job = self.job();
        let mut runner = PipelineRunner::new(GeminiClient::new(config)).with_delay(self.delay());

        match runner.run(&job).await {
            Ok(summary) => {
                if summary.skipped() > 0 {
                    eprintln!(
                        "{} of {} files skipped; re-run to retry them.",
                        summary.skipped(),
                        summary.discovered
                    );
                }
                println!("{}", self.command.completion_message());
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(job = job.name, "Run aborted: {}", e);
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["testforge", "generate"]).unwrap();
        let job = cli.job();

        assert_eq!(job.name, "generate");
        assert_eq!(job.input_root, Path::new(".").join("lib"));
        assert_eq!(cli.delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_analyze_with_project_root() {
        let cli = Cli::try_parse_from(["testforge", "analyze", "--project-root", "/proj", "--delay-ms", "0"]).unwrap();
        let job = cli.job();

        assert_eq!(job.name, "analyze");
        assert_eq!(job.input_root, PathBuf::from("/proj/test"));
        assert_eq!(job.placement, OutputPlacement::InPlace);
        assert_eq!(cli.delay(), Duration::ZERO);
    }

    #[test]
    fn test_input_and_output_overrides() {
        let cli = Cli::try_parse_from([
            "testforge",
            "generate",
            "--input",
            "/src/app",
            "--output",
            "/tmp/generated",
        ])
        .unwrap();
        let job = cli.job();

        assert_eq!(job.input_root, PathBuf::from("/src/app"));
        assert_eq!(job.placement, OutputPlacement::Mirror(PathBuf::from("/tmp/generated")));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["testforge"]).is_err());
    }
}

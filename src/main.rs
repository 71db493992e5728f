//! stack-audit CLI entry point.
//!
//! Exit code policy: non-zero when a strict gate fails, when a strict
//! structured-score parse fails, or when the pipeline hits a fatal error
//! (empty corpus, synthesis failure). Per-file analysis failures inside
//! `analyze` are reported and tolerated.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stack_audit::cli::{Cli, Commands};
use stack_audit::output::{self, LintArtifact, OutputFormat};
use stack_audit::pipeline::{
    self, CorpusAnalyzer, PipelineError, PipelineResult, ScoreOutcome,
};
use stack_audit::{config, git, walk};
use stack_audit_core::{Document, PromptRegistry, TokenChunker};
use stack_audit_gates::{GateDecision, GateError};
use stack_audit_llm::{create_provider, RequestOptions};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    config::load_env();

    match run(cli).await {
        Ok(code) => code,
        Err(PipelineError::Gate(GateError::ParseFailed { message, raw })) => {
            error!(%message, "structured score was not parsable; raw model output follows");
            eprintln!("{}", raw);
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> PipelineResult<ExitCode> {
    let format = cli.output_format.as_domain();
    let kind = cli.provider.as_domain();
    let output_path = cli.output.as_deref();

    match cli.command {
        Commands::Analyze {
            path,
            category,
            mode,
            max_chunk_tokens,
            encoding_model,
            fail_fast,
        } => {
            let provider_config = config::provider_config(kind, cli.model, 0.2);
            let encoding = encoding_model.unwrap_or_else(|| provider_config.model.clone());
            let chunker = TokenChunker::for_model(&encoding, max_chunk_tokens)?;
            let provider = create_provider(provider_config);

            let analyzer = CorpusAnalyzer::new(provider, chunker, PromptRegistry::builtin())
                .with_fail_fast(fail_fast);

            let documents = walk::collect_documents(&path, category.as_domain())?;
            info!(files = documents.len(), "corpus collected");

            let outcome = analyzer.run_corpus(&documents, mode.as_domain()).await?;
            if !outcome.failures.is_empty() {
                warn!(
                    failed = outcome.failures.len(),
                    "some files could not be analyzed; see report"
                );
            }

            let text = output::render_corpus(&outcome, format)?;
            output::write_artifact(&text, output_path)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Lint {
            file,
            diff,
            diff_file,
            category,
            mode,
            score,
            strict,
            min_score,
        } => {
            let provider_config = config::provider_config(kind, cli.model, 0.3);
            let provider = create_provider(provider_config);
            let registry = PromptRegistry::builtin();
            let options = RequestOptions::default();
            let category = category.as_domain();

            let document = match (file, diff) {
                (Some(path), None) => {
                    let content = std::fs::read_to_string(&path)?;
                    Document::new(path.display().to_string(), content, category)
                }
                (None, Some(range)) => {
                    let (base, head) = (&range[0], &range[1]);
                    let diff_text = git::diff_file(Path::new("."), base, head, &diff_file).await?;
                    if diff_text.is_empty() {
                        info!(file = %diff_file.display(), "no changes in range, nothing to analyze");
                        output::write_artifact(
                            &format!("No changes to {} detected.", diff_file.display()),
                            output_path,
                        )?;
                        return Ok(ExitCode::SUCCESS);
                    }
                    let identifier = format!("{}@{}..{}", diff_file.display(), base, head);
                    Document::new(identifier, diff_text, category)
                }
                // clap's arg group guarantees exactly one input source
                _ => unreachable!("lint requires exactly one of --file/--diff"),
            };

            let report = pipeline::analyze_whole(
                provider.as_ref(),
                &registry,
                &options,
                &document,
                mode.as_domain(),
            )
            .await?;

            let mut artifact = LintArtifact {
                report: report.map(|r| r.text),
                ..Default::default()
            };
            let mut exit = ExitCode::SUCCESS;

            if score {
                // Strict mode always needs machine-parsable output; otherwise
                // only the JSON rendering does.
                let structured = strict || format == OutputFormat::Json;
                match pipeline::score_document(provider.as_ref(), &options, &document, structured)
                    .await
                {
                    Ok(ScoreOutcome::Structured(record)) => {
                        let decision = GateDecision::evaluate(&record, min_score);
                        if strict && decision.is_failure() {
                            error!(
                                score = decision.overall_score,
                                min = decision.min_score,
                                "gate failed"
                            );
                            exit = ExitCode::FAILURE;
                        }
                        artifact.gate = Some(decision);
                        artifact.score = Some(record);
                    }
                    Ok(ScoreOutcome::FreeText(text)) => {
                        // Free-text scoring computes no gate decision.
                        artifact.score_text = Some(text);
                    }
                    Err(PipelineError::Gate(err)) if !strict => {
                        let GateError::ParseFailed { message, raw } = err;
                        warn!(%message, "structured score unparsable, keeping raw text");
                        artifact.score_text = Some(raw);
                    }
                    Err(err) => return Err(err),
                }
            }

            if artifact.report.is_none()
                && artifact.score.is_none()
                && artifact.score_text.is_none()
            {
                output::write_artifact("No analyzable content; skipped.", output_path)?;
                return Ok(ExitCode::SUCCESS);
            }

            let text = output::render_lint(&artifact, format)?;
            output::write_artifact(&text, output_path)?;
            Ok(exit)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the report; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

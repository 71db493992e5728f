//! End-to-end pipeline tests against a scripted completion provider.
//!
//! The provider double records every prompt it receives and answers from a
//! prepared queue, so these tests exercise chunk dispatch, report assembly,
//! the synthesis barrier, and scoring without any network or local runner.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use stack_audit::pipeline::{
    self, CorpusAnalyzer, PipelineError, ScoreOutcome,
};
use stack_audit_core::{
    AnalysisMode, ContentCategory, CoreError, Document, PromptRegistry, TokenChunker,
};
use stack_audit_gates::{GateDecision, GateError};
use stack_audit_llm::{
    CompletionProvider, LlmError, LlmResult, ProviderConfig, RequestOptions,
};

struct ScriptedProvider {
    config: ProviderConfig,
    responses: Mutex<VecDeque<LlmResult<String>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<LlmResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            config: ProviderConfig::default(),
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str, _options: &RequestOptions) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::backend("script exhausted")))
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

fn chunker(max_tokens: usize) -> TokenChunker {
    TokenChunker::for_model("gpt-4-turbo", max_tokens).unwrap()
}

fn analyzer(provider: Arc<ScriptedProvider>, max_tokens: usize) -> CorpusAnalyzer {
    CorpusAnalyzer::new(provider, chunker(max_tokens), PromptRegistry::builtin())
}

#[tokio::test]
async fn file_report_joins_chunk_analyses_in_index_order() {
    let content = "resource \"aws_instance\" \"web\" { ami = \"ami-123\" }\n".repeat(12);
    let doc = Document::new("infra/main.tf", content.clone(), ContentCategory::Terraform);

    // Script one response per chunk the 32-token budget will produce.
    let chunk_count = chunker(32).chunk(&doc).unwrap().len();
    assert!(chunk_count > 1, "content must span multiple chunks");
    let responses: Vec<LlmResult<String>> =
        (0..chunk_count).map(|i| Ok(format!("R{}", i))).collect();
    let expected = (0..chunk_count)
        .map(|i| format!("R{}", i))
        .collect::<Vec<_>>()
        .join("\n\n");

    let provider = ScriptedProvider::new(responses);
    let report = analyzer(provider.clone(), 32)
        .analyze_document(&doc, AnalysisMode::Review)
        .await
        .unwrap()
        .expect("non-blank document must produce a report");

    assert_eq!(provider.call_count(), chunk_count);
    assert_eq!(report.text, expected);
    assert_eq!(report.document, "infra/main.tf");
    // Per-chunk prompts carry the basename, not the full path.
    assert!(provider.prompt(0).contains("File: main.tf"));
}

#[tokio::test]
async fn blank_document_is_skipped_without_model_calls() {
    let doc = Document::new("empty.tf", "   \n", ContentCategory::Terraform);
    let provider = ScriptedProvider::new(vec![]);

    let report = analyzer(provider.clone(), 100)
        .analyze_document(&doc, AnalysisMode::Review)
        .await
        .unwrap();

    assert!(report.is_none());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn corpus_run_tolerates_per_file_failures() {
    let docs = vec![
        Document::new("a.tf", "resource \"a\" {}", ContentCategory::Terraform),
        Document::new("b.tf", "resource \"b\" {}", ContentCategory::Terraform),
        Document::new("blank.tf", "", ContentCategory::Terraform),
    ];

    // a.tf succeeds, b.tf hits a transport failure, synthesis succeeds.
    let provider = ScriptedProvider::new(vec![
        Ok("report for a".to_string()),
        Err(LlmError::transport("connection reset")),
        Ok("project synthesis".to_string()),
    ]);

    let outcome = analyzer(provider.clone(), 100)
        .run_corpus(&docs, AnalysisMode::Review)
        .await
        .unwrap();

    assert_eq!(outcome.file_reports.len(), 1);
    assert!(outcome.file_reports.contains_key("a.tf"));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].document, "b.tf");
    assert_eq!(outcome.skipped, vec!["blank.tf".to_string()]);
    assert_eq!(outcome.corpus_report.text, "project synthesis");
    // Two analysis attempts plus one synthesis; the blank file cost nothing.
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn fail_fast_aborts_on_first_failure() {
    let docs = vec![
        Document::new("a.tf", "resource \"a\" {}", ContentCategory::Terraform),
        Document::new("b.tf", "resource \"b\" {}", ContentCategory::Terraform),
    ];
    let provider = ScriptedProvider::new(vec![Err(LlmError::transport("down"))]);

    let result = analyzer(provider.clone(), 100)
        .with_fail_fast(true)
        .run_corpus(&docs, AnalysisMode::Review)
        .await;

    assert!(matches!(result, Err(PipelineError::Llm(_))));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn empty_corpus_fails_before_any_model_call() {
    let provider = ScriptedProvider::new(vec![Ok("should never be used".to_string())]);

    let result = analyzer(provider.clone(), 100)
        .synthesize(&BTreeMap::new())
        .await;

    assert!(matches!(
        result,
        Err(PipelineError::Core(CoreError::EmptyCorpus))
    ));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn synthesis_prompt_embeds_reports_under_headings() {
    let docs = vec![
        Document::new("b/ci.yml", "stages: [build]", ContentCategory::GitlabCi),
        Document::new("a/ci.yml", "stages: [test]", ContentCategory::GitlabCi),
    ];
    let provider = ScriptedProvider::new(vec![
        Ok("analysis B".to_string()),
        Ok("analysis A".to_string()),
        Ok("synthesis".to_string()),
    ]);

    analyzer(provider.clone(), 100)
        .run_corpus(&docs, AnalysisMode::Review)
        .await
        .unwrap();

    // Last call is the meta-prompt; file reports appear lexicographically.
    let meta = provider.prompt(2);
    let pos_a = meta.find("### a/ci.yml").unwrap();
    let pos_b = meta.find("### b/ci.yml").unwrap();
    assert!(pos_a < pos_b);
    assert!(meta.contains("senior DevOps architect"));
}

#[tokio::test]
async fn structured_score_feeds_the_gate() {
    let doc = Document::new(".gitlab-ci.yml", "stages: [build]", ContentCategory::GitlabCi);
    let provider = ScriptedProvider::new(vec![Ok(r#"{
        "structure": {"score": 4, "reasoning": "ok"},
        "reliability": {"score": 3, "reasoning": "ok"},
        "security": {"score": 4, "reasoning": "ok"},
        "maintainability": {"score": 4, "reasoning": "ok"},
        "overall_score": 3.8
    }"#
    .to_string())]);

    let outcome = pipeline::score_document(
        provider.as_ref(),
        &RequestOptions::default(),
        &doc,
        true,
    )
    .await
    .unwrap();

    let ScoreOutcome::Structured(record) = outcome else {
        panic!("expected structured outcome");
    };
    let decision = GateDecision::evaluate(&record, 4.0);
    assert!(decision.is_failure());

    let decision = GateDecision::evaluate(&record, 3.8);
    assert!(decision.passed);
}

#[tokio::test]
async fn unparsable_structured_score_preserves_raw_output() {
    let doc = Document::new(".gitlab-ci.yml", "stages: [build]", ContentCategory::GitlabCi);
    let raw = "Overall I'd say this is a solid 4/5 pipeline.";
    let provider = ScriptedProvider::new(vec![Ok(raw.to_string())]);

    let err = pipeline::score_document(
        provider.as_ref(),
        &RequestOptions::default(),
        &doc,
        true,
    )
    .await
    .unwrap_err();

    match err {
        PipelineError::Gate(GateError::ParseFailed { raw: preserved, .. }) => {
            assert_eq!(preserved, raw);
        }
        other => panic!("expected ParseFailed, got {other}"),
    }
}

#[tokio::test]
async fn free_text_scoring_computes_no_gate() {
    let doc = Document::new(".gitlab-ci.yml", "stages: [build]", ContentCategory::GitlabCi);
    let provider = ScriptedProvider::new(vec![Ok("reads fine, about a 4".to_string())]);

    let outcome = pipeline::score_document(
        provider.as_ref(),
        &RequestOptions::default(),
        &doc,
        false,
    )
    .await
    .unwrap();

    assert!(matches!(outcome, ScoreOutcome::FreeText(_)));
}

#[tokio::test]
async fn whole_document_lint_uses_single_call() {
    let doc = Document::new(".gitlab-ci.yml", "stages: [build]", ContentCategory::GitlabCi);
    let provider = ScriptedProvider::new(vec![Ok("critique".to_string())]);

    let result = pipeline::analyze_whole(
        provider.as_ref(),
        &PromptRegistry::builtin(),
        &RequestOptions::default(),
        &doc,
        AnalysisMode::Critic,
    )
    .await
    .unwrap()
    .expect("non-blank document must produce a result");

    assert_eq!(result.text, "critique");
    assert_eq!(provider.call_count(), 1);
    assert!(provider.prompt(0).contains("senior DevOps reviewer"));
}

#[tokio::test]
async fn empty_diff_document_is_skipped() {
    // An empty diff becomes a blank document; lint must skip it rather than
    // issue a model call.
    let doc = Document::new(
        ".gitlab-ci.yml@v1..v2",
        "",
        ContentCategory::GitlabCi,
    );
    let provider = ScriptedProvider::new(vec![]);

    let result = pipeline::analyze_whole(
        provider.as_ref(),
        &PromptRegistry::builtin(),
        &RequestOptions::default(),
        &doc,
        AnalysisMode::Critic,
    )
    .await
    .unwrap();

    assert!(result.is_none());
    assert_eq!(provider.call_count(), 0);
}

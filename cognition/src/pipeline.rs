//! The pipeline entry point.

use knowledge::KnowledgeStore;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::classifier::InputClassifier;
use crate::config::CognitionConfig;
use crate::engine::IterativeReasoningEngine;
use crate::facts::{PersonalFacts, SuggestionSink};
use crate::synthesizer::ResolutionSynthesizer;
use crate::trace::{ThoughtKind, ThoughtTrace};
use crate::types::{Resolved, Result};
use crate::verification::Verifier;

/// Classify, reason, synthesize and verify one utterance at a time.
///
/// Runs share the knowledge store read-only; each run owns its own trace.
pub struct CognitivePipeline {
    store: Arc<KnowledgeStore>,
    config: CognitionConfig,
    classifier: InputClassifier,
    engine: IterativeReasoningEngine,
    synthesizer: ResolutionSynthesizer,
    verifier: Verifier,
    rng: Mutex<StdRng>,
}

impl CognitivePipeline {
    /// Create with default configuration.
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        Self::build(store, CognitionConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(store: Arc<KnowledgeStore>, config: CognitionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(store, config))
    }

    /// Start a builder.
    pub fn builder(store: Arc<KnowledgeStore>) -> CognitivePipelineBuilder {
        CognitivePipelineBuilder::new(store)
    }

    fn build(store: Arc<KnowledgeStore>, config: CognitionConfig) -> Self {
        let rng = match config.phrasing.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            knowledge_entries = store.len(),
            seeded = config.phrasing.seed.is_some(),
            "Cognitive pipeline ready"
        );

        Self {
            classifier: InputClassifier::new(),
            engine: IterativeReasoningEngine::with_config(&config),
            synthesizer: ResolutionSynthesizer::with_config(&config),
            verifier: Verifier::with_config(&config),
            rng: Mutex::new(rng),
            store,
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &CognitionConfig {
        &self.config
    }

    /// Get the knowledge store.
    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    /// Resolve one utterance against a facts snapshot. Never fails.
    ///
    /// The shared RNG is locked per draw, so concurrent runs only contend
    /// while picking a phrasing template.
    pub fn resolve(&self, utterance: &str, facts: PersonalFacts) -> Resolved {
        self.resolve_with_rng(utterance, facts, &mut SharedRng(&self.rng))
    }

    /// Resolve with a caller-supplied RNG for phrasing selection.
    pub fn resolve_with_rng<R: Rng + ?Sized>(
        &self,
        utterance: &str,
        facts: PersonalFacts,
        rng: &mut R,
    ) -> Resolved {
        let mut trace = ThoughtTrace::new();

        let spark = self.classifier.classify(utterance);
        debug!(category = %spark.category, confidence = spark.confidence, "Classified input");
        trace.emit(
            ThoughtKind::Spark,
            format!("This looks {} ({:.2})", spark.category, spark.confidence),
            spark.confidence,
        );

        let iterations = self.engine.run(utterance, &spark, &facts, &mut trace);
        let best = iterations.best();

        let warnings = best.result.warnings.clone();
        for warning in &warnings {
            warn!(warning = ?warning, "Parse warning");
            trace.emit(ThoughtKind::Warning, warning.describe(), best.confidence);
        }
        let suggestions = best.result.suggestions.clone();

        let resolution = self.synthesizer.synthesize(
            utterance,
            &iterations,
            &self.store,
            &facts,
            &mut trace,
            rng,
        );
        let (resolution, corrected) = self.verifier.verify(utterance, resolution, &mut trace);

        info!(
            category = %resolution.category,
            confidence = resolution.confidence,
            iterations = iterations.passes(),
            corrected,
            "Resolved utterance"
        );

        Resolved {
            category: resolution.category,
            content: resolution.content,
            confidence: resolution.confidence,
            answer: resolution.answer,
            steps: resolution.steps,
            reasoning: trace.reasoning(),
            pathways: iterations.pathways.clone(),
            suggestions,
            trace: trace.into_events(),
            spark,
            iterations: iterations.passes(),
            corrected,
            warnings,
            knowledge_fingerprint: self.store.fingerprint().to_string(),
        }
    }

    /// Resolve, then hand any suggestions to `sink`.
    pub async fn resolve_and_report(
        &self,
        utterance: &str,
        facts: PersonalFacts,
        sink: &dyn SuggestionSink,
    ) -> Result<Resolved> {
        let resolved = self.resolve(utterance, facts);
        if !resolved.suggestions.is_empty() {
            sink.accept(&resolved.suggestions).await?;
            debug!(count = resolved.suggestions.len(), "Delivered fact suggestions");
        }
        Ok(resolved)
    }
}

/// Borrowed view of the pipeline RNG that locks for each draw.
struct SharedRng<'a>(&'a Mutex<StdRng>);

impl SharedRng<'_> {
    fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock only means another run panicked mid-draw
        let mut rng = self.0.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut *rng)
    }
}

impl RngCore for SharedRng<'_> {
    fn next_u32(&mut self) -> u32 {
        self.with(|rng| rng.next_u32())
    }

    fn next_u64(&mut self) -> u64 {
        self.with(|rng| rng.next_u64())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.with(|rng| rng.fill_bytes(dest))
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.with(|rng| rng.try_fill_bytes(dest))
    }
}

/// Builder for [`CognitivePipeline`].
pub struct CognitivePipelineBuilder {
    store: Arc<KnowledgeStore>,
    config: CognitionConfig,
}

impl CognitivePipelineBuilder {
    /// Create a new builder.
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        Self {
            store,
            config: CognitionConfig::default(),
        }
    }

    /// Use a full configuration.
    pub fn config(mut self, config: CognitionConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed phrasing selection.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.phrasing.seed = Some(seed);
        self
    }

    /// Set the early-exit threshold.
    pub fn early_exit_threshold(mut self, threshold: f64) -> Self {
        self.config.engine.early_exit_threshold = threshold;
        self
    }

    /// Toggle verification.
    pub fn verification(mut self, enabled: bool) -> Self {
        self.config.verification.enabled = enabled;
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<CognitivePipeline> {
        CognitivePipeline::with_config(self.store, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::MemorySink;
    use crate::types::Category;

    fn pipeline() -> CognitivePipeline {
        CognitivePipeline::builder(Arc::new(KnowledgeStore::empty()))
            .seed(11)
            .build()
            .unwrap()
    }

    #[test]
    fn test_spark_is_first_event() {
        let resolved = pipeline().resolve("2+3*4", PersonalFacts::new());
        assert_eq!(resolved.trace[0].category, ThoughtKind::Spark);
        assert_eq!(resolved.reasoning.len(), resolved.trace.len());
        assert!(resolved
            .trace
            .iter()
            .enumerate()
            .all(|(i, e)| e.sequence == i as u64));
    }

    #[test]
    fn test_warnings_surface() {
        let resolved = pipeline().resolve("4x5", PersonalFacts::new());
        assert_eq!(resolved.answer, Some(20.0));
        assert_eq!(resolved.warnings.len(), 1);
        assert!(resolved
            .trace
            .iter()
            .any(|e| e.category == ThoughtKind::Warning));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = CognitivePipeline::builder(Arc::new(KnowledgeStore::empty()))
            .early_exit_threshold(1.5)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_verification_toggle() {
        let pipeline = CognitivePipeline::builder(Arc::new(KnowledgeStore::empty()))
            .verification(false)
            .build()
            .unwrap();
        let resolved = pipeline.resolve("6 * 7", PersonalFacts::new());
        assert!(!resolved
            .trace
            .iter()
            .any(|e| e.category == ThoughtKind::Verification));
    }

    #[test]
    fn test_rng_lock_not_held_across_run() {
        let pipeline = Arc::new(pipeline());
        let _held = pipeline.rng.lock().unwrap();

        let worker = Arc::clone(&pipeline);
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let resolved = worker.resolve("2+3*4", PersonalFacts::new());
            let _ = tx.send(resolved.answer);
        });

        let answer = rx
            .recv_timeout(std::time::Duration::from_secs(10))
            .expect("arithmetic run never waits on phrasing");
        assert_eq!(answer, Some(14.0));
    }

    #[test]
    fn test_shared_rng_matches_seeded_rng() {
        let pipeline = pipeline();
        let mut direct = StdRng::seed_from_u64(11);
        let mut shared = SharedRng(&pipeline.rng);
        assert_eq!(shared.next_u64(), direct.next_u64());
        assert_eq!(shared.next_u32(), direct.next_u32());
    }

    #[tokio::test]
    async fn test_resolve_and_report() {
        let sink = MemorySink::new();
        let resolved = pipeline()
            .resolve_and_report("call me Ada", PersonalFacts::new(), &sink)
            .await
            .unwrap();

        assert_eq!(resolved.category, Category::Personal);
        let snapshot = sink.snapshot().await;
        assert_eq!(snapshot.get("name"), Some("Ada"));
    }

    #[tokio::test]
    async fn test_nothing_reported_without_suggestions() {
        let sink = MemorySink::new();
        pipeline()
            .resolve_and_report("2+2", PersonalFacts::new(), &sink)
            .await
            .unwrap();
        assert!(sink.received().await.is_empty());
    }
}

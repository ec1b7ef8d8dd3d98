//! Conversion Integration Tests
//!
//! Tests for the conversion contract: validation, credentials, ordering,
//! independence of calls, and batch conversion.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use shotscene::adapters::{Completion, CompletionBackend, CompletionRequest};
use shotscene::core::{Converter, RetryPolicy};
use shotscene::{ConvertConfig, ConvertError, ShotType, UpstreamError, ValidationError};
use tokio_test::assert_ok;

const BAR_BREAKDOWN: &str = r#"{
  "scenes": [
    {
      "heading": "INT. BAR - NIGHT",
      "summary": "A man comes in and orders.",
      "shots": [
        {
          "shot_type": "wide",
          "camera_angle": "eye level",
          "camera_movement": "static",
          "description": "A man walks into a bar.",
          "dialogue": null,
          "duration_seconds": 4
        },
        {
          "shot_type": "medium",
          "camera_movement": "dolly in",
          "description": "He leans on the counter and orders a drink.",
          "dialogue": "Whiskey.",
          "duration_seconds": 3
        }
      ]
    }
  ]
}"#;

/// Backend that answers every request with the same text
struct FixedBackend {
    content: String,
    calls: AtomicUsize,
}

impl FixedBackend {
    fn new(content: &str) -> Arc<Self> {
        Arc::new(Self {
            content: content.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for FixedBackend {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn complete(&self, request: &CompletionRequest) -> shotscene::error::Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Completion::new(self.content.clone(), request.model.clone()))
    }

    async fn health_check(&self) -> shotscene::error::Result<()> {
        Ok(())
    }
}

/// Backend that always fails with a server error
struct FailingBackend {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: &CompletionRequest) -> shotscene::error::Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(UpstreamError::Status {
            status: 500,
            message: "internal error".to_string(),
        }
        .into())
    }

    async fn health_check(&self) -> shotscene::error::Result<()> {
        Ok(())
    }
}

fn config() -> ConvertConfig {
    ConvertConfig::new("sk-test", "test-model").with_retry(RetryPolicy::none())
}

#[tokio::test]
async fn test_bar_story_yields_ordered_beats() {
    let backend = FixedBackend::new(BAR_BREAKDOWN);
    let converter = Converter::with_backend(config(), backend.clone());

    let list = converter
        .convert("A man walks into a bar. He orders a drink.")
        .await
        .unwrap();

    assert!(list.shot_count() >= 2);
    let shots: Vec<_> = list.shots().collect();
    assert_eq!(shots[0].label(), "1.1");
    assert_eq!(shots[1].label(), "1.2");
    assert_eq!(shots[0].shot_type, ShotType::Wide);
    assert!(shots[0].description.contains("walks into a bar"));
    assert!(shots[1].description.contains("orders a drink"));
    assert_ne!(shots[0].description, shots[1].description);
    assert_eq!(list.scenes[0].estimated_duration(), Some(7.0));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_shot_numbers_strictly_increase() {
    let breakdown = r#"{"scenes": [
        {"heading": "EXT. STREET - DAY", "shots": [
            {"shot_type": "establishing", "description": "A busy street."},
            {"shot_type": "pov", "description": "Through her eyes, a red door."}
        ]},
        {"heading": "INT. SHOP - DAY", "shots": [
            {"shot_type": "insert", "description": "A bell rings over the door."},
            {"shot_type": "two shot", "description": "She greets the shopkeeper."},
            {"shot_type": "cu", "description": "He smiles."}
        ]}
    ]}"#;
    let converter = Converter::with_backend(config(), FixedBackend::new(breakdown));

    let list = converter.convert("She walks to the shop.").await.unwrap();

    let keys: Vec<(u32, u32)> = list
        .shots()
        .map(|s| (s.scene_number, s.shot_number))
        .collect();
    assert_eq!(keys, vec![(1, 1), (1, 2), (2, 1), (2, 2), (2, 3)]);
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_empty_and_whitespace_text_rejected() {
    let backend = FixedBackend::new(BAR_BREAKDOWN);
    let converter = Converter::with_backend(config(), backend.clone());

    for text in ["", "   ", "\n\t\n"] {
        let err = converter.convert(text).await.unwrap_err();
        assert!(matches!(err, ConvertError::Validation(ValidationError::Empty)));
    }
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_oversize_text_rejected() {
    let backend = FixedBackend::new(BAR_BREAKDOWN);
    let mut config = config();
    config.limits.max_input_bytes = 16;
    let converter = Converter::with_backend(config, backend.clone());

    let err = converter.convert(&"word ".repeat(10)).await.unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Validation(ValidationError::TooLarge {
            actual: 50,
            limit: 16
        })
    ));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_missing_credentials_make_no_call() {
    let backend = FixedBackend::new(BAR_BREAKDOWN);
    let mut config = config();
    config.api_key = None;
    let converter = Converter::with_backend(config, backend.clone());

    let err = converter.convert("A story.").await.unwrap_err();
    assert!(matches!(err, ConvertError::Authentication(_)));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_validation_checked_before_credentials() {
    let backend = FixedBackend::new(BAR_BREAKDOWN);
    let mut config = config();
    config.api_key = None;
    let converter = Converter::with_backend(config, backend);

    let err = converter.convert(" ").await.unwrap_err();
    assert!(matches!(err, ConvertError::Validation(_)));
}

#[tokio::test]
async fn test_upstream_error_status_surfaces() {
    let backend = Arc::new(FailingBackend {
        calls: AtomicUsize::new(0),
    });
    let config = config().with_retry(RetryPolicy {
        max_attempts: 2,
        initial_delay_ms: 1,
        max_delay_ms: 1,
        backoff_multiplier: 1.0,
    });
    let converter = Converter::with_backend(config, backend.clone());

    let err = converter.convert("A story.").await.unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Upstream(UpstreamError::Status { status: 500, .. })
    ));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_malformed_breakdown_is_upstream_error() {
    let converter = Converter::with_backend(
        config(),
        FixedBackend::new("Here is your shot list: scene one, a man..."),
    );

    let err = converter.convert("A story.").await.unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Upstream(UpstreamError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_identical_calls_are_independent() {
    let converter = Converter::with_backend(config(), FixedBackend::new(BAR_BREAKDOWN));
    let text = "A man walks into a bar. He orders a drink.";

    let first = assert_ok!(converter.convert(text).await);
    let second = assert_ok!(converter.convert(text).await);

    assert_ne!(first.id, second.id);
    assert_eq!(first.scenes, second.scenes);
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let backend = FixedBackend::new(BAR_BREAKDOWN);
    let converter = Converter::with_backend(config(), backend.clone());

    let results = converter
        .convert_batch(vec!["First story.", "", "Third story."], 2)
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(ConvertError::Validation(ValidationError::Empty))
    ));
    assert!(results[2].is_ok());
    assert_eq!(backend.calls(), 2);
}

//! Model loader integration tests
//!
//! Exercises configuration parsing through to a usable classifier. Hub
//! downloads are not attempted; only sources that need no network are loaded.

use veritext_classifiers::{Classifier, ModelConfig, ModelLoader, ModelSource};

fn builtin_config() -> &'static str {
    r#"
name: "offline-detector"
source:
  type: builtin
  implementation: lexicon
inference:
  max_length: 128
"#
}

#[tokio::test]
async fn test_builtin_from_yaml() {
    let config = ModelConfig::from_yaml(builtin_config()).unwrap();
    let classifier = ModelLoader::new().load(&config).unwrap();

    assert_eq!(classifier.name(), "offline-detector");

    let result = classifier
        .classify("Moreover, this robust and seamless solution will foster meaningful change.")
        .await
        .unwrap();
    assert_eq!(result.label, "LABEL_1");
    assert!((0.0..=1.0).contains(&result.score));
}

#[tokio::test]
async fn test_builtin_scores_are_confidences() {
    let config = ModelConfig::builtin_lexicon();
    let classifier = ModelLoader::new().load(&config).unwrap();

    let texts = [
        "",
        "short",
        "the cat sat on the mat and looked out of the window at the rain",
        "In conclusion, it is important to note the pivotal, multifaceted landscape.",
    ];

    for text in texts {
        let result = classifier.classify(text).await.unwrap();
        // Confidence of the winning label is never below one half
        assert!(result.score >= 0.5, "{text:?} -> {}", result.score);
        assert!(result.score <= 1.0);

        let all = result.metadata.all_scores.expect("lexicon reports all scores");
        let sum: f32 = all.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_hub_source_parses() {
    let yaml = r#"
source:
  type: huggingface
  repo: "someone/detector"
architecture:
  type: xlm-roberta-sequence-classification
  num_labels: 2
"#;
    let config = ModelConfig::from_yaml(yaml).unwrap();

    match config.source {
        ModelSource::HuggingFace { repo, revision } => {
            assert_eq!(repo, "someone/detector");
            assert_eq!(revision, "main");
        }
        other => panic!("Expected HuggingFace source, got {other:?}"),
    }
}

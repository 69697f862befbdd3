//! Mock classifiers for pipeline tests
//!
//! Configurable implementations of the Classifier trait for exercising the
//! analyzer without model weights.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use veritext_classifiers::{ClassificationResult, Classifier};
use veritext_core::{Error, Result};

/// Returns the same label and confidence for every input
pub struct MockClassifier {
    name: String,
    label: String,
    score: f32,
    call_count: AtomicU32,
}

impl MockClassifier {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: "LABEL_1".to_string(),
            score: 0.5,
            call_count: AtomicU32::new(0),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(ClassificationResult::new(self.label.clone(), self.score))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Replays a fixed sequence of (label, confidence) answers, one per call
pub struct ScriptedClassifier {
    answers: Mutex<VecDeque<(String, f32)>>,
}

impl ScriptedClassifier {
    pub fn new(answers: &[(&str, f32)]) -> Self {
        Self {
            answers: Mutex::new(
                answers
                    .iter()
                    .map(|(label, score)| (label.to_string(), *score))
                    .collect(),
            ),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        let (label, score) = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::classifier("script exhausted"))?;
        Ok(ClassificationResult::new(label, score))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Succeeds a fixed number of times, then fails every call
pub struct FailingClassifier {
    succeed_first: u32,
    error_message: String,
    call_count: AtomicU32,
}

impl FailingClassifier {
    pub fn new() -> Self {
        Self {
            succeed_first: 0,
            error_message: "Simulated classifier failure".to_string(),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn after(mut self, calls: u32) -> Self {
        self.succeed_first = calls;
        self
    }

    pub fn with_error(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        let call = self.call_count.fetch_add(1, Ordering::Relaxed);
        if call < self.succeed_first {
            Ok(ClassificationResult::new("LABEL_1", 0.9))
        } else {
            Err(Error::model(self.error_message.clone()))
        }
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// `n` distinct words joined by single spaces
pub fn words(n: usize) -> String {
    (0..n)
        .map(|i| format!("token{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

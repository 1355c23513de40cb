//! Classification of descriptions as artifact-producing.
//!
//! This is a heuristic, not a guarantee: a description is treated as an app
//! request when it contains any trigger substring, case-insensitively. Plain
//! substring matching means "happy" matches "app".

use webtoys_types::config::ClassifierConfig;

#[derive(Debug, Clone)]
pub struct TriggerClassifier {
    keywords: Vec<String>,
}

impl TriggerClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(&config.trigger_keywords)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_artifact_producing(&self, description: &str) -> bool {
        let description = description.to_lowercase();
        self.keywords.iter().any(|k| description.contains(k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_classifier() -> TriggerClassifier {
        TriggerClassifier::from_config(&ClassifierConfig::default())
    }

    #[test]
    fn test_matches_default_keywords_case_insensitively() {
        let c = default_classifier();
        assert!(c.is_artifact_producing("Make me a GAME about cats"));
        assert!(c.is_artifact_producing("please BUILD a todo list"));
        assert!(c.is_artifact_producing("wtaf a landing page"));
        assert!(c.is_artifact_producing("Meme: a dog in a hat"));
    }

    #[test]
    fn test_non_trigger_descriptions() {
        let c = default_classifier();
        assert!(!c.is_artifact_producing("hello there"));
        assert!(!c.is_artifact_producing("status"));
        assert!(!c.is_artifact_producing(""));
    }

    #[test]
    fn test_substring_heuristic_over_matches() {
        assert!(default_classifier().is_artifact_producing("I'm happy today"));
    }

    #[test]
    fn test_keywords_are_normalized() {
        let c = TriggerClassifier::new(["  Toy ", "", "ZINE"]);
        assert_eq!(c.keywords(), &["toy".to_string(), "zine".to_string()]);
        assert!(c.is_artifact_producing("a tiny toy"));
        assert!(!c.is_artifact_producing("make an app"));
    }
}

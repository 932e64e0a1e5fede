//! Pricing intent detection.
//!
//! The orchestrator only runs a pricing lookup when the user's message looks
//! like it is asking about cost or availability. The policy sits behind a
//! trait so it can be swapped for something smarter (a classifier, the model
//! itself) without touching the turn flow.

/// Decides whether a user message warrants a pricing lookup.
pub trait IntentDetector: Send + Sync {
    fn wants_pricing(&self, message: &str) -> bool;
}

/// Case-insensitive keyword matching. Deliberately eager: a false positive
/// costs one bounded lookup, a false negative loses the data for the turn.
pub struct KeywordIntentDetector {
    keywords: Vec<&'static str>,
}

impl KeywordIntentDetector {
    pub fn new() -> Self {
        Self {
            keywords: vec![
                "price",
                "pricing",
                "cost",
                "how much",
                "distributor",
                "stock",
                "availability",
                "available",
                "bom",
                "buy",
                "order",
            ],
        }
    }
}

impl Default for KeywordIntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentDetector for KeywordIntentDetector {
    fn wants_pricing(&self, message: &str) -> bool {
        let lowered = message.to_lowercase();
        self.keywords.iter().any(|kw| lowered.contains(kw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_questions_are_detected() {
        let detector = KeywordIntentDetector::new();
        assert!(detector.wants_pricing("How much would this BOM cost?"));
        assert!(detector.wants_pricing("Is R1 in STOCK at any distributor?"));
        assert!(detector.wants_pricing("what's the price of U1"));
    }

    #[test]
    fn design_questions_are_not() {
        let detector = KeywordIntentDetector::new();
        assert!(!detector.wants_pricing("Why is my ground plane split?"));
        assert!(!detector.wants_pricing("Review the decoupling on U1"));
    }
}

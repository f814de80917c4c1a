// Completion-signal detection over free-text model replies
//
// The model announces it is ready to write the draft in plain prose. All of
// the phrase matching lives here so the state machine only asks one question.

const DEFAULT_SIGNALS: [&str; 7] = [
    "i have enough information",
    "let me create a draft",
    "let me pull together",
    "let me synthesize",
    "i'll create a draft",
    "let me draft",
    "creating a draft",
];

/// Case-insensitive substring matcher over a fixed phrase set.
#[derive(Debug, Clone)]
pub struct CompletionDetector {
    phrases: Vec<String>,
}

impl Default for CompletionDetector {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_SIGNALS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CompletionDetector {
    /// Default phrases plus `extra`.
    pub fn with_phrases<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut detector = Self::default();
        detector
            .phrases
            .extend(extra.into_iter().map(|p| p.into().to_lowercase()));
        detector
    }

    /// True when the reply signals the question phase is over.
    pub fn signals_completion(&self, reply: &str) -> bool {
        let lower = reply.to_lowercase();
        self.phrases.iter().any(|phrase| lower.contains(phrase.as_str()))
    }

    /// True when a completing reply already carries the draft itself, so no
    /// separate synthesis call is needed.
    pub fn reply_is_draft(&self, reply: &str) -> bool {
        reply.to_lowercase().contains("draft")
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

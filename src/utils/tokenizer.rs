use tiktoken_rs::CoreBPE;

/// Token counting for assembled prompts and loaded documents
pub struct Tokenizer {
    model_name: String,
    bpe: Option<CoreBPE>,
}

impl Tokenizer {
    /// Create a tokenizer for the given model, falling back to cl100k_base
    pub fn new(model_name: &str) -> Self {
        let encoding_model = Self::encoding_model(model_name);
        let bpe = tiktoken_rs::get_bpe_from_model(encoding_model)
            .or_else(|_| tiktoken_rs::cl100k_base())
            .ok();

        Self {
            model_name: model_name.to_string(),
            bpe,
        }
    }

    /// Count tokens in a string (characters / 4 when no encoding is available)
    pub fn count_tokens(&self, text: &str) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_with_special_tokens(text).len(),
            None => text.len() / 4,
        }
    }

    /// Approximate context window of the model
    pub fn context_window(&self) -> usize {
        let name = self.model_name.to_lowercase();
        if name.contains("gemini") {
            1_048_576
        } else if name.contains("gpt-4o") || name.contains("gpt-4-turbo") {
            128_000
        } else if name.contains("gpt-4") {
            8192
        } else if name.contains("gpt-3.5") {
            16_384
        } else {
            8192
        }
    }

    /// Map a model name to the model whose encoding we borrow
    fn encoding_model(model_name: &str) -> &'static str {
        // Gemini has no public BPE; gpt-4o's encoding is a close enough estimate
        const MAPPINGS: &[(&str, &str)] = &[
            ("gpt-4o", "gpt-4o"),
            ("gpt-4", "gpt-4"),
            ("gpt-3.5", "gpt-3.5-turbo"),
            ("gemini", "gpt-4o"),
        ];

        let lower = model_name.to_lowercase();
        MAPPINGS
            .iter()
            .find(|(pattern, _)| lower.contains(pattern))
            .map(|(_, encoding)| *encoding)
            .unwrap_or("gpt-3.5-turbo")
    }
}

/// Count tokens in a text (convenience function)
pub fn count_tokens(content: &str, model_name: &str) -> usize {
    Tokenizer::new(model_name).count_tokens(content)
}

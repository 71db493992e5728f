//! Token-Bounded Chunking
//!
//! Splits document content into an ordered sequence of chunks whose token
//! counts never exceed a configured maximum, using the target model's own
//! token encoding. The chunks are a gapless, non-overlapping partition of the
//! document's token stream: decoding and concatenating them reconstructs the
//! original token sequence exactly. The decoded text is not guaranteed to be
//! byte-identical to the input when the encoding's decode is not a perfect
//! inverse of encode; that approximation is accepted.

use serde::{Deserialize, Serialize};
use tiktoken_rs::{get_bpe_from_model, CoreBPE};
use tracing::debug;

use crate::document::Document;
use crate::error::{CoreError, CoreResult};

/// Default chunk budget in tokens, leaving headroom for the prompt template
/// inside a 4k completion window.
pub const DEFAULT_MAX_CHUNK_TOKENS: usize = 3500;

/// A bounded-size, order-indexed slice of a document's token stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based ordinal; defines reassembly order
    pub index: usize,
    /// Number of tokens in this chunk (always <= the chunker's maximum)
    pub token_count: usize,
    /// Decoded chunk text
    pub text: String,
}

/// Splits raw text into bounded-size chunks with a model-specific encoding.
pub struct TokenChunker {
    bpe: CoreBPE,
    model: String,
    max_tokens: usize,
}

impl std::fmt::Debug for TokenChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenChunker")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

impl TokenChunker {
    /// Create a chunker for the given target model.
    ///
    /// Fails with [`CoreError::Encoding`] when no token encoding is known for
    /// the model name (local model names usually have none; pass a hosted
    /// model name with a compatible vocabulary instead).
    pub fn for_model(model: &str, max_tokens: usize) -> CoreResult<Self> {
        if max_tokens == 0 {
            return Err(CoreError::validation("max chunk size must be at least 1 token"));
        }
        let bpe = get_bpe_from_model(model)
            .map_err(|e| CoreError::encoding(model, e.to_string()))?;
        Ok(Self {
            bpe,
            model: model.to_string(),
            max_tokens,
        })
    }

    /// The model name this chunker encodes for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The configured per-chunk token budget
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Number of tokens in the given text
    pub fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Split a document's content into ordered, bounded chunks.
    ///
    /// A blank document yields zero chunks; callers must treat that as "skip"
    /// and issue no model calls for it.
    pub fn chunk(&self, document: &Document) -> CoreResult<Vec<Chunk>> {
        if document.is_blank() {
            debug!(document = %document.identifier, "blank document, no chunks");
            return Ok(Vec::new());
        }

        let tokens = self.bpe.encode_ordinary(&document.content);
        let mut chunks = Vec::with_capacity(tokens.len().div_ceil(self.max_tokens));

        for (index, window) in tokens.chunks(self.max_tokens).enumerate() {
            let text = self
                .bpe
                .decode(window.to_vec())
                .map_err(|e| CoreError::encoding(&self.model, e.to_string()))?;
            chunks.push(Chunk {
                index,
                token_count: window.len(),
                text,
            });
        }

        debug!(
            document = %document.identifier,
            tokens = tokens.len(),
            chunks = chunks.len(),
            "chunked document"
        );
        Ok(chunks)
    }
}

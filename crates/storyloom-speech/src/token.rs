use std::sync::Arc;
use std::time::Duration;

use mini_moka::sync::Cache;

use crate::backend::SpeechBackend;
use crate::error::SpeechError;

/// Cache key: one provider, one token
const TOKEN_KEY: &str = "bearer";

/// Process-wide bearer token source
///
/// Tokens are cached for a short validity window so concurrent
/// synthesis requests share one credential exchange. An invalid-token
/// signal from the provider invalidates the cache, forcing the next
/// acquisition to exchange credentials again.
#[derive(Clone)]
pub struct TokenSource {
    backend: Arc<dyn SpeechBackend>,
    cache: Cache<&'static str, Arc<String>>,
}

impl TokenSource {
    pub fn new(backend: Arc<dyn SpeechBackend>, ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).max_capacity(1).build();

        Self { backend, cache }
    }

    /// Current bearer token, exchanging credentials on a cache miss
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the exchange
    /// fails; there is no synthesis fallback without a token
    pub async fn acquire(&self) -> Result<Arc<String>, SpeechError> {
        if let Some(token) = self.cache.get(&TOKEN_KEY) {
            return Ok(token);
        }

        let token = Arc::new(self.backend.exchange_token().await?);
        self.cache.insert(TOKEN_KEY, Arc::clone(&token));

        tracing::debug!("acquired fresh speech provider token");
        Ok(token)
    }

    /// Drop the cached token after an invalid-token signal
    pub fn invalidate(&self) {
        self.cache.invalidate(&TOKEN_KEY);
    }
}

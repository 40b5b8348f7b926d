//! Text token counting
//!
//! The length heuristic is always available and authoritative. A precise,
//! provider-specific tokenizer can be loaded in the background through
//! [`TokenizerSlot`]; only the most recent load request may install its
//! result.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use crate::core::Provider;

/// Average characters per token assumed by the heuristic
const CHARS_PER_TOKEN: u64 = 4;

pub(crate) trait Tokenizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn count(&self, text: &str) -> u64;
}

/// `ceil(chars / 4)`
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Heuristic;

impl Tokenizer for Heuristic {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn count(&self, text: &str) -> u64 {
        (text.chars().count() as u64).div_ceil(CHARS_PER_TOKEN)
    }
}

#[cfg(feature = "tiktoken")]
mod bpe {
    use std::sync::Arc;

    use super::Tokenizer;
    use crate::core::Provider;

    pub(super) struct Bpe {
        inner: tiktoken_rs::CoreBPE,
    }

    impl Tokenizer for Bpe {
        fn name(&self) -> &'static str {
            "o200k_base"
        }

        fn count(&self, text: &str) -> u64 {
            self.inner.encode_with_special_tokens(text).len() as u64
        }
    }

    pub(super) fn load(provider: Provider) -> Option<Arc<dyn Tokenizer>> {
        match provider {
            Provider::OpenAi => match tiktoken_rs::o200k_base() {
                Ok(inner) => Some(Arc::new(Bpe { inner })),
                Err(e) => {
                    tracing::warn!("failed to load o200k_base: {e}");
                    None
                }
            },
            _ => None,
        }
    }
}

/// Precise tokenizer for a provider, if this build has one
#[cfg(feature = "tiktoken")]
pub(crate) fn load_precise(provider: Provider) -> Option<Arc<dyn Tokenizer>> {
    bpe::load(provider)
}

#[cfg(not(feature = "tiktoken"))]
pub(crate) fn load_precise(_provider: Provider) -> Option<Arc<dyn Tokenizer>> {
    None
}

type Loader = fn(Provider) -> Option<Arc<dyn Tokenizer>>;

struct Installed {
    provider: Provider,
    tokenizer: Arc<dyn Tokenizer>,
}

#[derive(Default)]
struct SlotState {
    generation: u64,
    installed: Option<Installed>,
}

/// Holds the precise tokenizer currently in effect
pub(crate) struct TokenizerSlot {
    state: Mutex<SlotState>,
    loader: Loader,
}

impl Default for TokenizerSlot {
    fn default() -> Self {
        Self::with_loader(load_precise)
    }
}

impl TokenizerSlot {
    pub(crate) fn with_loader(loader: Loader) -> Self {
        Self {
            state: Mutex::new(SlotState::default()),
            loader,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Tokenizer to count with for `provider` right now
    pub(crate) fn current(&self, provider: Provider) -> Arc<dyn Tokenizer> {
        match &self.lock().installed {
            Some(installed) if installed.provider == provider => Arc::clone(&installed.tokenizer),
            _ => Arc::new(Heuristic),
        }
    }

    fn next_ticket(&self) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.generation
    }

    /// Install a loaded tokenizer unless a newer request was issued meanwhile
    fn install(&self, ticket: u64, provider: Provider, loaded: Option<Arc<dyn Tokenizer>>) -> bool {
        let mut state = self.lock();
        if state.generation != ticket {
            tracing::debug!(%provider, ticket, "discarding superseded tokenizer load");
            return false;
        }
        let Some(tokenizer) = loaded else {
            tracing::debug!(%provider, "no precise tokenizer, keeping heuristic");
            return false;
        };
        tracing::debug!(%provider, tokenizer = tokenizer.name(), "installed precise tokenizer");
        state.installed = Some(Installed {
            provider,
            tokenizer,
        });
        true
    }

    /// Load on a background thread. The handle yields whether the result
    /// was installed.
    pub(crate) fn request(self: &Arc<Self>, provider: Provider) -> JoinHandle<bool> {
        let ticket = self.next_ticket();
        let slot = Arc::clone(self);
        std::thread::spawn(move || {
            let loaded = (slot.loader)(provider);
            slot.install(ticket, provider, loaded)
        })
    }

    pub(crate) fn load_blocking(&self, provider: Provider) -> bool {
        let ticket = self.next_ticket();
        let loaded = (self.loader)(provider);
        self.install(ticket, provider, loaded)
    }
}

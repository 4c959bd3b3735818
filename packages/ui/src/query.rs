//! Keyed cache invalidation.
//!
//! A resource that reads [`QueryClient::generation`] for a key re-runs
//! whenever someone calls [`QueryClient::invalidate`] with that key.

use std::collections::HashMap;

use dioxus::prelude::*;

#[derive(Clone, Copy, PartialEq)]
pub struct QueryClient {
    generations: Signal<HashMap<String, u64>>,
}

impl QueryClient {
    /// Current generation of `key`. Reading it subscribes the caller.
    pub fn generation(&self, key: &str) -> u64 {
        self.generations.read().get(key).copied().unwrap_or(0)
    }

    /// Mark `key` stale so every subscriber reloads.
    pub fn invalidate(&mut self, key: &str) {
        tracing::debug!(key, "invalidating query");
        *self.generations.write().entry(key.to_string()).or_default() += 1;
    }
}

pub fn use_query_client() -> QueryClient {
    use_context::<QueryClient>()
}

#[component]
pub fn QueryClientProvider(children: Element) -> Element {
    use_context_provider(|| QueryClient {
        generations: Signal::new(HashMap::new()),
    });

    rsx! {
        {children}
    }
}

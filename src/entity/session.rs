use std::fmt;
use std::sync::Arc;

use crate::network::NetworkProvider;

/// A connected wallet session.
///
/// Contexts are never mutated: connecting builds a new one and disconnecting
/// drops it, and whoever depends on the session is handed the replacement.
#[derive(Clone)]
pub struct SessionContext {
    provider: Arc<dyn NetworkProvider>,
    account: String,
    chain_id: u64,
}

impl SessionContext {
    pub fn new(provider: Arc<dyn NetworkProvider>, account: String, chain_id: u64) -> Self {
        Self {
            provider,
            account,
            chain_id,
        }
    }

    pub fn provider(&self) -> Arc<dyn NetworkProvider> {
        self.provider.clone()
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

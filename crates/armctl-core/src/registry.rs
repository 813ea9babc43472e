// ── Shared client registry ──
//
// One management client per controller kind, created the first time a
// controller of that kind is built with a usable credential and reused by
// every later controller in the process.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use armctl_api::ArmClient;
use tracing::{debug, warn};

use crate::config::ArmConfig;
use crate::error::CoreError;

/// Process-wide slot holding a lazily created client.
///
/// `OnceLock` gives lock-free reads once set; the mutex serializes the
/// fallible initializer so concurrent first constructions build exactly
/// one client.
pub struct ClientRegistry<C> {
    cell: OnceLock<Arc<C>>,
    init: Mutex<()>,
}

impl<C> ClientRegistry<C> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// The shared client, if one has been created.
    pub fn get(&self) -> Option<Arc<C>> {
        self.cell.get().map(Arc::clone)
    }

    /// Return the shared client, running `init` only if none exists yet.
    ///
    /// A failed `init` leaves the slot empty so a later call can retry.
    pub fn get_or_try_init<E>(&self, init: impl FnOnce() -> Result<C, E>) -> Result<Arc<C>, E> {
        if let Some(client) = self.get() {
            return Ok(client);
        }

        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = self.get() {
            return Ok(client);
        }

        let client = Arc::new(init()?);
        Ok(Arc::clone(self.cell.get_or_init(|| client)))
    }
}

impl<C> Default for ClientRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Client shared by every `NetworkController`.
pub static NETWORK_CLIENT: ClientRegistry<ArmClient> = ClientRegistry::new();

/// Client shared by every `ResourcesController`.
pub static RESOURCES_CLIENT: ClientRegistry<ArmClient> = ClientRegistry::new();

/// Shared client for a controller, creating it from `config` if needed.
///
/// Returns `None` when no client exists yet and `config` cannot produce one;
/// the controller then fails every operation with `ClientNotInstantiated`.
pub(crate) fn acquire(
    registry: &ClientRegistry<ArmClient>,
    config: &ArmConfig,
    user_agent: &str,
) -> Option<Arc<ArmClient>> {
    if let Some(client) = registry.get() {
        debug!(user_agent, "reusing shared management client");
        return Some(client);
    }

    match registry.get_or_try_init(|| config.build_client(user_agent)) {
        Ok(client) => Some(client),
        Err(CoreError::ClientNotInstantiated) => {
            warn!(user_agent, "no credential supplied; controller operations will fail");
            None
        }
        Err(e) => {
            warn!(user_agent, error = %e, "failed to create management client");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn initializer_runs_once_under_contention() {
        let registry: Arc<ClientRegistry<usize>> = Arc::new(ClientRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    registry.get_or_try_init(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, ()>(i)
                    })
                })
            })
            .collect();

        let values: Vec<usize> = handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(Ok(v)) => *v,
                _ => usize::MAX,
            })
            .collect();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(values.windows(2).all(|w| w[0] == w[1]));
        assert_ne!(values[0], usize::MAX);
    }

    #[test]
    fn failed_init_can_be_retried() {
        let registry: ClientRegistry<&str> = ClientRegistry::new();
        assert_eq!(registry.get_or_try_init(|| Err("no credential")), Err("no credential"));
        assert!(registry.get().is_none());

        let client = registry.get_or_try_init(|| Ok::<_, &str>("client"));
        assert_eq!(client.as_deref().copied(), Ok("client"));
        assert_eq!(registry.get().as_deref().copied(), Some("client"));
    }
}

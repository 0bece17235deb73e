//! Subscription handle - owns exactly one release action.
//!
//! # Lifecycle
//!
//! ```text
//! Pending ──arm──▶ Active ──dispose──▶ Disposed
//!    │                                    ▲
//!    └──────────────dispose───────────────┘
//! ```
//!
//! `Disposed` is terminal. A release action armed after disposal runs
//! immediately, so a registration that completes after its subscriber gave
//! up is still torn down.
//!
//! A core reaches `Disposed` in one of two ways. The owner cancels it with
//! `dispose`, after which nothing more may reach the observer. Or the
//! source terminates it with `try_terminate`, which lets the terminal
//! notification through exactly once.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::foundation::SubscriptionId;

type ReleaseFn = Box<dyn FnOnce() + Send + 'static>;

/// Observable lifecycle state of a [`Subscription`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Created, transport registration not yet in place.
    Pending,
    /// Registered with the transport.
    Active,
    /// Released. No path leads back to `Active`.
    Disposed,
}

enum Slot {
    Pending,
    Active(ReleaseFn),
    Disposed,
}

impl Slot {
    fn state(&self) -> SubscriptionState {
        match self {
            Slot::Pending => SubscriptionState::Pending,
            Slot::Active(_) => SubscriptionState::Active,
            Slot::Disposed => SubscriptionState::Disposed,
        }
    }
}

/// Shared core of a subscription.
///
/// Bridges keep a clone of this inside their transport handler so the
/// handler can drop late deliveries and release itself on terminal errors.
pub(crate) struct SubscriptionCore {
    id: SubscriptionId,
    slot: Mutex<Slot>,
    cancelled: AtomicBool,
}

impl SubscriptionCore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            id: SubscriptionId::new(),
            slot: Mutex::new(Slot::Pending),
            cancelled: AtomicBool::new(false),
        })
    }

    pub(crate) fn id(&self) -> SubscriptionId {
        self.id
    }

    pub(crate) fn state(&self) -> SubscriptionState {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state()
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.state() == SubscriptionState::Disposed
    }

    /// Installs the release action. Runs it at once if already disposed.
    pub(crate) fn arm(&self, release: impl FnOnce() + Send + 'static) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match *slot {
            Slot::Pending => *slot = Slot::Active(Box::new(release)),
            Slot::Active(_) | Slot::Disposed => {
                drop(slot);
                release();
            }
        }
    }

    /// True once the owner disposed the subscription. Queued notifications
    /// check this before reaching the observer.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Cancels on behalf of the owner, running the release action at most once.
    ///
    /// The action runs after the lock is dropped so it may call back into
    /// the transport freely.
    pub(crate) fn dispose(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(Some(release)) = self.take_release() {
            release();
        }
    }

    /// Terminates from the source side.
    ///
    /// Only the first caller to leave a live state wins: it runs `notify`
    /// and then the release action, and gets `true`. Every later caller,
    /// and any caller after `dispose`, gets `false` and `notify` is dropped.
    pub(crate) fn try_terminate(&self, notify: impl FnOnce()) -> bool {
        let Some(release) = self.take_release() else {
            return false;
        };
        notify();
        if let Some(release) = release {
            release();
        }
        true
    }

    /// Moves to `Disposed`. `None` if it already was; otherwise the
    /// release action, which is itself `None` while still `Pending`.
    fn take_release(&self) -> Option<Option<ReleaseFn>> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match std::mem::replace(&mut *slot, Slot::Disposed) {
            Slot::Disposed => None,
            Slot::Pending => Some(None),
            Slot::Active(release) => Some(Some(release)),
        }
    }
}

/// Handle for one observer subscription.
///
/// Disposing it (explicitly or by dropping it) releases the underlying
/// registration exactly once.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    core: Arc<SubscriptionCore>,
}

impl Subscription {
    /// Creates a subscription that runs `release` on disposal.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        let core = SubscriptionCore::new();
        core.arm(release);
        Self { core }
    }

    pub(crate) fn from_core(core: Arc<SubscriptionCore>) -> Self {
        Self { core }
    }

    pub fn id(&self) -> SubscriptionId {
        self.core.id()
    }

    pub fn state(&self) -> SubscriptionState {
        self.core.state()
    }

    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }

    /// Releases the registration. Calling this again is a no-op.
    pub fn dispose(&self) {
        self.core.dispose();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.core.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.core.id())
            .field("state", &self.core.state())
            .finish()
    }
}

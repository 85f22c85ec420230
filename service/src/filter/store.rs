//! [`Store`] of a [`FilterState`].

use derive_more::Debug;

use super::{FilterState, Patch};

/// Subscriber notified with the new [`FilterState`] on every change.
type Subscriber = Box<dyn FnMut(&FilterState)>;

/// Container owning a [`FilterState`].
///
/// The [`FilterState`] is mutated only through [`Patch`]es, and every
/// effective change is broadcast to the subscribers.
#[derive(Debug, Default)]
pub struct Store {
    /// Current [`FilterState`].
    state: FilterState,

    /// Number of effective changes applied so far.
    revision: u64,

    /// [`Subscription`] to be handed out next.
    next_subscription: Subscription,

    /// Live subscribers along with their [`Subscription`]s.
    #[debug(skip)]
    subscribers: Vec<(Subscription, Subscriber)>,
}

impl Store {
    /// Creates a new [`Store`] holding the provided [`FilterState`].
    #[must_use]
    pub fn new(state: FilterState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Returns the current [`FilterState`].
    #[must_use]
    pub fn get_state(&self) -> &FilterState {
        &self.state
    }

    /// Returns the number of effective changes applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies the provided [`Patch`] and notifies the subscribers if the
    /// [`FilterState`] has changed.
    pub fn apply_patch(&mut self, patch: Patch) -> bool {
        self.apply_patches([patch])
    }

    /// Applies the provided [`Patch`]es, notifying the subscribers once if
    /// the [`FilterState`] has changed.
    pub fn apply_patches(
        &mut self,
        patches: impl IntoIterator<Item = Patch>,
    ) -> bool {
        let mut changed = false;
        for patch in patches {
            changed |= self.state.apply(patch);
        }
        if changed {
            self.commit();
        }
        changed
    }

    /// Mutates the [`FilterState`] in place with the provided function,
    /// notifying the subscribers if it returns `true`.
    pub fn update(&mut self, f: impl FnOnce(&mut FilterState) -> bool) -> bool {
        let changed = f(&mut self.state);
        if changed {
            self.commit();
        }
        changed
    }

    /// Subscribes the provided function to [`FilterState`] changes.
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&FilterState) + 'static,
    ) -> Subscription {
        let subscription = self.next_subscription;
        self.next_subscription.0 += 1;
        self.subscribers.push((subscription, Box::new(subscriber)));
        subscription
    }

    /// Removes the provided [`Subscription`].
    ///
    /// Already removed [`Subscription`]s are ignored.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|(s, _)| *s != subscription);
    }

    /// Registers an effective change and notifies the subscribers.
    fn commit(&mut self) {
        self.revision += 1;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.state);
        }
    }
}

/// Handle of a [`Store`] subscriber.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Subscription(u64);

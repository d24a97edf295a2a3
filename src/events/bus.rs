//! Minimal in-process publish/subscribe bus.
//!
//! The bus exists to let the history panel learn about new feedback without
//! the predictor logic holding a direct reference to it. It is scoped to the
//! plugin's lifetime and carries no payloads: one topic, synchronous delivery,
//! subscription order preserved.
//!
//! Handlers are `FnMut()` closures. Since closures have no usable identity,
//! [`EventBus::subscribe`] returns a [`SubscriberId`] token that is passed
//! back to [`EventBus::unsubscribe`]; unsubscribing an id that is no longer
//! registered is a no-op.

/// Topics that can be published on the bus.
///
/// Exactly one topic is used in practice; the enum keeps publish/subscribe
/// call sites typo-proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// A feedback record was appended or the history was cleared.
    FeedbackUpdated,
}

/// Opaque handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

/// Single-threaded observer registry with synchronous, in-order delivery.
pub struct EventBus {
    subscribers: Vec<(Topic, SubscriberId, Box<dyn FnMut()>)>,
    next_id: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a handler for a topic and returns its subscription id.
    ///
    /// Handlers for the same topic are invoked in subscription order.
    pub fn subscribe(&mut self, topic: Topic, handler: impl FnMut() + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((topic, id, Box::new(handler)));
        tracing::debug!(?topic, subscriber_count = self.subscribers.len(), "subscriber added");
        id
    }

    /// Removes a subscription. Unknown or already-removed ids are a no-op.
    pub fn unsubscribe(&mut self, topic: Topic, id: SubscriberId) {
        self.subscribers
            .retain(|(t, sid, _)| !(*t == topic && *sid == id));
    }

    /// Invokes every handler subscribed to `topic`, synchronously, in
    /// subscription order.
    pub fn publish(&mut self, topic: Topic) {
        let _span = tracing::debug_span!("publish", ?topic).entered();
        for (t, _, handler) in &mut self.subscribers {
            if *t == topic {
                handler();
            }
        }
    }

    /// Number of live subscriptions across all topics.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn publish_invokes_handlers_in_subscription_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let first = Rc::clone(&order);
        bus.subscribe(Topic::FeedbackUpdated, move || first.borrow_mut().push(1));
        let second = Rc::clone(&order);
        bus.subscribe(Topic::FeedbackUpdated, move || second.borrow_mut().push(2));

        bus.publish(Topic::FeedbackUpdated);
        assert_eq!(*order.borrow(), vec![1, 2]);

        bus.publish(Topic::FeedbackUpdated);
        assert_eq!(*order.borrow(), vec![1, 2, 1, 2]);
    }

    #[test]
    fn unsubscribed_handler_is_not_invoked() {
        let calls = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();

        let counter = Rc::clone(&calls);
        let id = bus.subscribe(Topic::FeedbackUpdated, move || *counter.borrow_mut() += 1);

        bus.publish(Topic::FeedbackUpdated);
        bus.unsubscribe(Topic::FeedbackUpdated, id);
        bus.publish(Topic::FeedbackUpdated);

        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn unsubscribing_twice_is_a_no_op() {
        let mut bus = EventBus::new();
        let id = bus.subscribe(Topic::FeedbackUpdated, || {});
        bus.unsubscribe(Topic::FeedbackUpdated, id);
        bus.unsubscribe(Topic::FeedbackUpdated, id);
        assert_eq!(bus.subscriber_count(), 0);
    }
}

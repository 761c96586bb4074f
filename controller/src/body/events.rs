//! Grounded / takeoff notifications.

/// Edge of the vertical state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyEventKind {
    /// The body entered `Grounded` from `Rising` or `Falling`.
    Grounded,
    /// The body left `Grounded`.
    Takeoff,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyEvent {
    pub kind: BodyEventKind,
    /// Simulation time of the step that produced the edge (seconds).
    pub time: f32,
}

/// Handle returned by [`super::Body::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type BodyCallback = Box<dyn FnMut(&BodyEvent)>;

/// Callback list, delivered synchronously in registration order.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, BodyCallback)>,
}

impl Subscribers {
    pub fn add(&mut self, callback: BodyCallback) -> SubscriptionId {
        let mut id = SubscriptionId(self.next_id);
        // Skip ids still held after the counter wraps.
        while self.entries.iter().any(|(live, _)| *live == id) {
            id = SubscriptionId(id.0.wrapping_add(1));
        }
        self.next_id = id.0.wrapping_add(1);
        self.entries.push((id, callback));
        id
    }

    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn emit(&mut self, event: &BodyEvent) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_counter_skips_live_ids() {
        let mut subscribers = Subscribers::default();
        let first = subscribers.add(Box::new(|_| {}));
        assert_eq!(first, SubscriptionId(0));

        subscribers.next_id = u64::MAX;
        let last = subscribers.add(Box::new(|_| {}));
        let wrapped = subscribers.add(Box::new(|_| {}));
        assert_eq!(last, SubscriptionId(u64::MAX));
        assert_eq!(wrapped, SubscriptionId(1));

        assert!(subscribers.remove(first));
        assert!(!subscribers.remove(first));
        assert_eq!(subscribers.len(), 2);
    }
}

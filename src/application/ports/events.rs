use crate::domain::news::NewsEvent;

/// Fire-and-forget broadcast of lifecycle events. Delivery is synchronous
/// and in emission order; implementations must swallow listener failures.
pub trait EventBus: Send + Sync {
    fn broadcast(&self, event: &NewsEvent);
}

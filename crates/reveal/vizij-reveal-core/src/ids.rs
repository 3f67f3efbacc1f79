//! Identifiers and simple allocators for subscriptions, timers and list keys.

use serde::{Deserialize, Serialize};

/// Handle to one intersection subscription issued by a host facility.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

/// Handle to one deferred action issued by a host facility.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Caller-side identity of an item list. Two lists with the same key are the
/// same list; a new key means a new list reference.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ListKey(pub u64);

/// Monotonic allocator for SubscriptionId, TimerId and ListKey.
/// Facilities use it so ids are never reused within one host lifetime.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_subscription: u32,
    next_timer: u32,
    next_list: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_subscription(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_timer(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_list(&mut self) -> ListKey {
        let key = ListKey(self.next_list);
        self.next_list = self.next_list.wrapping_add(1);
        key
    }
}

use vizij_reveal_core::{
    IdAllocator, ItemList, ManualClock, RevealDelay, RevealEvent, RevealMode, StaggerConfig,
    StaggerScheduler,
};

fn scheduler() -> StaggerScheduler<ManualClock> {
    StaggerScheduler::new(ManualClock::new(), StaggerConfig::default())
}

fn delay(secs: f64) -> RevealDelay {
    RevealDelay::from_secs(secs).unwrap()
}

fn visible(s: &StaggerScheduler<ManualClock>) -> Vec<usize> {
    s.visible().to_vec()
}

#[test]
fn empty_list_is_empty_immediately() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    let ev = s
        .schedule(Some(ItemList::new(keys.alloc_list(), 0)), delay(0.1))
        .unwrap();
    assert_eq!(ev, None);
    assert!(s.visible().is_empty());
    assert!(!s.has_pending());
    assert_eq!(s.facility().pending_count(), 0);
}

#[test]
fn absent_list_behaves_like_empty() {
    let mut s = scheduler();
    assert_eq!(s.schedule(None, delay(0.1)).unwrap(), None);
    assert!(s.visible().is_empty());
    assert!(!s.has_pending());
}

#[test]
fn three_items_reveal_together_after_settle() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    s.schedule(Some(ItemList::new(keys.alloc_list(), 3)), delay(0.1))
        .unwrap();

    assert!(s.advance(199).is_empty());
    assert!(s.visible().is_empty());

    let events = s.advance(1);
    assert_eq!(
        events,
        vec![RevealEvent::Revealed { start: 0, end: 3 }]
    );
    assert_eq!(visible(&s), vec![0, 1, 2]);
    assert!(s.is_active(2));
    assert!(!s.is_active(3));
    assert!(!s.has_pending());

    // Nothing further fires.
    assert!(s.advance(10_000).is_empty());
    assert_eq!(visible(&s), vec![0, 1, 2]);
}

#[test]
fn delay_hint_does_not_change_simultaneous_timing() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    s.schedule(Some(ItemList::new(keys.alloc_list(), 4)), delay(5.0))
        .unwrap();
    assert_eq!(s.advance(200).len(), 1);
    assert_eq!(visible(&s), vec![0, 1, 2, 3]);
}

#[test]
fn rapid_changes_debounce_to_final_list() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();

    s.update(Some(ItemList::new(keys.alloc_list(), 2)), delay(0.1))
        .unwrap();
    assert!(s.advance(150).is_empty());
    s.update(Some(ItemList::new(keys.alloc_list(), 5)), delay(0.1))
        .unwrap();
    assert!(s.advance(150).is_empty());
    s.update(Some(ItemList::new(keys.alloc_list(), 3)), delay(0.1))
        .unwrap();

    assert_eq!(s.facility().pending_count(), 1);
    assert_eq!(s.facility().cancelled_count(), 2);

    let events = s.advance(1_000);
    assert_eq!(
        events,
        vec![RevealEvent::Revealed { start: 0, end: 3 }]
    );
    assert_eq!(visible(&s), vec![0, 1, 2]);
}

#[test]
fn two_then_three_never_reveals_two() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    s.schedule(Some(ItemList::new(keys.alloc_list(), 2)), delay(0.1))
        .unwrap();
    s.schedule(Some(ItemList::new(keys.alloc_list(), 3)), delay(0.1))
        .unwrap();

    let events = s.advance(400);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0],
        RevealEvent::Revealed { start: 0, end: 3 }
    );
}

#[test]
fn unchanged_input_is_a_no_op() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    let list = ItemList::new(keys.alloc_list(), 2);

    s.update(Some(list), delay(0.1)).unwrap();
    s.advance(100);
    // Same identity, length and delay: the pending firing is untouched.
    s.update(Some(list), delay(0.1)).unwrap();
    assert_eq!(s.facility().cancelled_count(), 0);

    s.advance(100);
    assert_eq!(visible(&s), vec![0, 1]);

    // Still unchanged after reveal: nothing is cleared.
    assert_eq!(s.update(Some(list), delay(0.1)).unwrap(), None);
    assert_eq!(visible(&s), vec![0, 1]);
}

#[test]
fn delay_change_restarts_reveal() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    let list = ItemList::new(keys.alloc_list(), 2);

    s.update(Some(list), delay(0.1)).unwrap();
    s.advance(150);
    s.update(Some(list), delay(0.2)).unwrap();
    assert!(s.advance(150).is_empty());
    assert_eq!(s.advance(50).len(), 1);
}

#[test]
fn length_change_on_same_identity_restarts_reveal() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    let key = keys.alloc_list();

    s.update(Some(ItemList::new(key, 2)), delay(0.1)).unwrap();
    s.advance(200);
    assert_eq!(visible(&s), vec![0, 1]);

    let ev = s.update(Some(ItemList::new(key, 4)), delay(0.1)).unwrap();
    assert_eq!(ev, Some(RevealEvent::Cleared));
    assert!(s.visible().is_empty());
    s.advance(200);
    assert_eq!(visible(&s), vec![0, 1, 2, 3]);
}

#[test]
fn becoming_empty_clears_without_delay() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    s.update(Some(ItemList::new(keys.alloc_list(), 3)), delay(0.1))
        .unwrap();
    s.advance(200);
    assert_eq!(visible(&s).len(), 3);

    let ev = s
        .update(Some(ItemList::new(keys.alloc_list(), 0)), delay(0.1))
        .unwrap();
    assert_eq!(ev, Some(RevealEvent::Cleared));
    assert!(s.visible().is_empty());
    assert!(!s.has_pending());
}

#[test]
fn becoming_empty_cancels_pending_reveal() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    s.update(Some(ItemList::new(keys.alloc_list(), 3)), delay(0.1))
        .unwrap();
    s.update(None, delay(0.1)).unwrap();
    assert_eq!(s.facility().pending_count(), 0);
    assert!(s.advance(1_000).is_empty());
    assert!(s.visible().is_empty());
}

#[test]
fn stale_timer_is_ignored() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    s.schedule(Some(ItemList::new(keys.alloc_list(), 2)), delay(0.1))
        .unwrap();
    let stale = s.pending_timer().unwrap();
    s.schedule(Some(ItemList::new(keys.alloc_list(), 3)), delay(0.1))
        .unwrap();

    assert_eq!(s.on_timer(stale), None);
    assert!(s.visible().is_empty());
    assert!(s.has_pending());
}

#[test]
fn cancel_keeps_visible_but_stops_pending() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    s.schedule(Some(ItemList::new(keys.alloc_list(), 2)), delay(0.1))
        .unwrap();
    s.cancel();
    assert!(!s.has_pending());
    assert!(s.advance(1_000).is_empty());
}

#[test]
fn same_list_after_cancel_rearms() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    let list = ItemList::new(keys.alloc_list(), 2);

    s.update(Some(list), RevealDelay::ZERO).unwrap();
    s.cancel();
    // Cleanup followed by a re-run with the identical list, as a component
    // remount does.
    s.update(Some(list), RevealDelay::ZERO).unwrap();
    assert!(s.has_pending());

    s.advance(1_000);
    assert_eq!(visible(&s), vec![0, 1]);
}

#[test]
fn cancel_after_reveal_then_same_list_reveals_again() {
    let mut keys = IdAllocator::new();
    let mut s = scheduler();
    let list = ItemList::new(keys.alloc_list(), 3);

    s.update(Some(list), delay(0.1)).unwrap();
    s.advance(200);
    s.cancel();
    assert_eq!(visible(&s), vec![0, 1, 2]);

    let ev = s.update(Some(list), delay(0.1)).unwrap();
    assert_eq!(ev, Some(RevealEvent::Cleared));
    assert_eq!(
        s.advance(200),
        vec![RevealEvent::Revealed { start: 0, end: 3 }]
    );
}

#[test]
fn custom_settle_interval() {
    let mut keys = IdAllocator::new();
    let mut s = StaggerScheduler::new(
        ManualClock::new(),
        StaggerConfig {
            settle_ms: 50,
            mode: RevealMode::Simultaneous,
        },
    );
    s.schedule(Some(ItemList::new(keys.alloc_list(), 1)), RevealDelay::ZERO)
        .unwrap();
    assert_eq!(s.advance(50).len(), 1);
}

#[test]
fn staggered_mode_reveals_in_order_with_one_pending() {
    let mut keys = IdAllocator::new();
    let mut s = StaggerScheduler::new(
        ManualClock::new(),
        StaggerConfig {
            settle_ms: 200,
            mode: RevealMode::Staggered,
        },
    );
    s.schedule(Some(ItemList::new(keys.alloc_list(), 3)), delay(0.1))
        .unwrap();

    assert_eq!(
        s.advance(200),
        vec![RevealEvent::Revealed { start: 0, end: 1 }]
    );
    assert_eq!(s.facility().pending_count(), 1);

    assert!(s.advance(99).is_empty());
    assert_eq!(
        s.advance(1),
        vec![RevealEvent::Revealed { start: 1, end: 2 }]
    );
    assert_eq!(
        s.advance(100),
        vec![RevealEvent::Revealed { start: 2, end: 3 }]
    );
    assert_eq!(visible(&s), vec![0, 1, 2]);
    assert!(!s.has_pending());
}

#[test]
fn staggered_mode_restart_drops_partial_reveal() {
    let mut keys = IdAllocator::new();
    let mut s = StaggerScheduler::new(
        ManualClock::new(),
        StaggerConfig {
            settle_ms: 200,
            mode: RevealMode::Staggered,
        },
    );
    s.schedule(Some(ItemList::new(keys.alloc_list(), 3)), delay(0.1))
        .unwrap();
    s.advance(200);
    assert_eq!(visible(&s), vec![0]);

    let ev = s
        .schedule(Some(ItemList::new(keys.alloc_list(), 2)), delay(0.1))
        .unwrap();
    assert_eq!(ev, Some(RevealEvent::Cleared));
    assert_eq!(s.facility().pending_count(), 1);

    let events = s.advance(10_000);
    assert_eq!(events.len(), 2);
    assert_eq!(visible(&s), vec![0, 1]);
}

#[test]
fn drop_cancels_pending() {
    use std::cell::Cell;
    use std::rc::Rc;
    use vizij_reveal_core::{DeferredFacility, RevealError, TimerId};

    struct Counting {
        live: Rc<Cell<usize>>,
    }

    impl DeferredFacility for Counting {
        fn defer(&mut self, _after_ms: u32) -> Result<TimerId, RevealError> {
            self.live.set(self.live.get() + 1);
            Ok(TimerId(0))
        }

        fn cancel(&mut self, _timer: TimerId) {
            self.live.set(self.live.get() - 1);
        }
    }

    let live = Rc::new(Cell::new(0));
    {
        let mut keys = IdAllocator::new();
        let mut s = StaggerScheduler::new(
            Counting { live: live.clone() },
            StaggerConfig::default(),
        );
        s.schedule(Some(ItemList::new(keys.alloc_list(), 2)), delay(0.1))
            .unwrap();
        assert_eq!(live.get(), 1);
    }
    assert_eq!(live.get(), 0);
}

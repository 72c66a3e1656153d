use std::time::{Duration, Instant};

use log::debug;

/// One tick of the render loop.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Frame {
    pub index: u64,
    /// Time since the scheduler was created.
    pub elapsed: Duration,
    /// Time since the previous tick.
    pub delta: Duration,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(u64);

type FrameListener<T> = Box<dyn FnMut(&mut T, &Frame)>;

/// Calls registered listeners once per frame, in registration order.
pub struct FrameScheduler<T> {
    listeners: Vec<(SubscriptionHandle, FrameListener<T>)>,
    next_handle: u64,
    next_index: u64,
    started: Instant,
    last_tick: Instant,
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            listeners: Vec::new(),
            next_handle: 0,
            next_index: 0,
            started: now,
            last_tick: now,
        }
    }

    pub fn register_frame_listener<F>(&mut self, listener: F) -> SubscriptionHandle
    where
        F: FnMut(&mut T, &Frame) + 'static,
    {
        let handle = SubscriptionHandle(self.next_handle);
        self.next_handle += 1;
        self.listeners.push((handle, Box::new(listener)));
        debug!("Registered frame listener {:?}", handle);
        handle
    }

    /// Returns false if the handle was already cancelled.
    pub fn cancel(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        let removed = self.listeners.len() != before;
        if removed {
            debug!("Cancelled frame listener {:?}", handle);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn tick(&mut self, target: &mut T) -> Frame {
        let now = Instant::now();
        let frame = Frame {
            index: self.next_index,
            elapsed: now - self.started,
            delta: now - self.last_tick,
        };
        self.next_index += 1;
        self.last_tick = now;

        for (_, listener) in self.listeners.iter_mut() {
            listener(target, &frame);
        }

        frame
    }
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_run_in_registration_order() {
        let mut scheduler = FrameScheduler::<Vec<&str>>::new();
        scheduler.register_frame_listener(|log, _| log.push("first"));
        scheduler.register_frame_listener(|log, _| log.push("second"));

        let mut log = Vec::new();
        scheduler.tick(&mut log);
        scheduler.tick(&mut log);

        assert_eq!(log, ["first", "second", "first", "second"]);
    }

    #[test]
    fn cancelled_listener_stops_receiving_frames() {
        let mut scheduler = FrameScheduler::<u32>::new();
        let handle = scheduler.register_frame_listener(|n, _| *n += 1);

        let mut count = 0;
        scheduler.tick(&mut count);
        assert!(scheduler.cancel(handle));
        scheduler.tick(&mut count);

        assert_eq!(count, 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut scheduler = FrameScheduler::<()>::new();
        let handle = scheduler.register_frame_listener(|_, _| ());
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
    }

    #[test]
    fn handles_are_never_reused() {
        let mut scheduler = FrameScheduler::<()>::new();
        let a = scheduler.register_frame_listener(|_, _| ());
        scheduler.cancel(a);
        let b = scheduler.register_frame_listener(|_, _| ());
        assert_ne!(a, b);

        // Cancelling the stale handle must not remove the new listener.
        assert!(!scheduler.cancel(a));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn frame_index_counts_ticks() {
        let mut scheduler = FrameScheduler::<Vec<u64>>::new();
        scheduler.register_frame_listener(|seen, frame| seen.push(frame.index));

        let mut seen = Vec::new();
        let last = (0..3).map(|_| scheduler.tick(&mut seen)).last().unwrap();

        assert_eq!(seen, [0, 1, 2]);
        assert_eq!(last.index, 2);
        assert!(last.elapsed >= last.delta);
    }
}

//! Interrupt-safe queue of button edges
//!
//! An edge interrupt pushes raw transitions with their timestamps; the main
//! loop drains them in order. Built on `critical-section` and
//! `heapless::Deque`, so it works from an ISR on `no_std` targets.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;
use heapless::Deque;

/// Raw level transition seen by the input pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge {
    /// Raw reading after the transition, before polarity is applied
    pub raw_pressed: bool,
    pub at: Instant,
}

/// Bounded edge queue shared between an interrupt and the main loop
///
/// When full, the oldest edge is dropped: a missed old edge is less harmful
/// than losing the most recent press or release.
pub struct EdgeQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<ButtonEdge, SIZE>>>,
}

impl<const SIZE: usize> EdgeQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Record an edge; callable from interrupt context
    ///
    /// Returns `false` if an older edge had to be dropped to make room.
    pub fn push(&self, edge: ButtonEdge) -> bool {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            let mut kept_all = true;
            if queue.is_full() {
                queue.pop_front();
                kept_all = false;
            }
            // Cannot fail: a slot was freed above if the queue was full
            let _ = queue.push_back(edge);
            kept_all
        })
    }

    /// Take the oldest pending edge
    pub fn pop(&self) -> Option<ButtonEdge> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().is_empty())
    }
}

impl<const SIZE: usize> Default for EdgeQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

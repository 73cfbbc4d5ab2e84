//! Remote command vocabulary and its bounded queue.
//!
//! Transport handlers (HTTP routes, WebSocket frames) may run in
//! interrupt-like contexts, so they never touch render state directly:
//! they enqueue a [`Command`] here and the controller drains the queue
//! at one fixed point in its poll loop. The queue is backed by a
//! fixed-size `heapless::Deque` behind a critical section.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Duration;
use heapless::Deque;

use crate::color::Rgb;
use crate::pattern::PatternId;

/// A state-changing request from the outside world.
///
/// Validation happens where the command is applied; a rejected command
/// produces no observable change and no status broadcast.
#[derive(Debug, Clone, Copy)]
pub enum Command {
    SetPattern(PatternId),
    CyclePattern,
    SetColor(Rgb),
    /// Carried wide so out-of-range remote values (0, 256) are rejected
    /// rather than silently truncated to a valid byte.
    SetBrightness(u16),
    SetAutoCycle(bool),
    SetAutoCycleInterval(Duration),
}

/// Error returned when trying to send to a full queue.
#[derive(Debug, Clone, Copy)]
pub struct QueueFullError(pub Command);

/// Bounded, thread-safe command queue.
///
/// `DEPTH` is the number of commands that can be in flight; excess
/// sends are refused back to the transport layer.
pub struct CommandQueue<const DEPTH: usize> {
    inner: Mutex<RefCell<Deque<Command, DEPTH>>>,
}

impl<const DEPTH: usize> CommandQueue<DEPTH> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this queue.
    ///
    /// Multiple senders can coexist; they share the same backing queue.
    pub const fn sender(&self) -> CommandSender<'_, DEPTH> {
        CommandSender { queue: self }
    }

    /// Get the receiver handle for this queue. One receiver (the
    /// controller) should drain it.
    pub const fn receiver(&self) -> CommandReceiver<'_, DEPTH> {
        CommandReceiver { queue: self }
    }

    fn try_send(&self, command: Command) -> Result<(), QueueFullError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(QueueFullError)
        })
    }

    fn try_receive(&self) -> Option<Command> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front()
        })
    }
}

impl<const DEPTH: usize> Default for CommandQueue<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`CommandQueue`].
#[derive(Clone, Copy)]
pub struct CommandSender<'a, const DEPTH: usize> {
    queue: &'a CommandQueue<DEPTH>,
}

impl<const DEPTH: usize> CommandSender<'_, DEPTH> {
    /// Try to enqueue a command.
    ///
    /// Returns `Err(QueueFullError(command))` if the queue is full.
    pub fn try_send(&self, command: Command) -> Result<(), QueueFullError> {
        self.queue.try_send(command)
    }
}

/// The receiver handle for a [`CommandQueue`].
#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const DEPTH: usize> {
    queue: &'a CommandQueue<DEPTH>,
}

impl<const DEPTH: usize> CommandReceiver<'_, DEPTH> {
    /// Take the next pending command, if any.
    pub fn try_receive(&self) -> Option<Command> {
        self.queue.try_receive()
    }
}

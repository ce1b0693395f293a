//! Signal events recorded during evaluation.
//!
//! The scheduler appends events while it evaluates a tick and the host
//! drains them afterwards (for logs, audio cues, a renderer's flash effect).
//! Rejected frames record nothing.

use serde::{Deserialize, Serialize};

use crate::phase::Phase;
use crate::state::Ticks;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A scheduler event. All events carry the tick at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalEvent {
    /// The active lane's phase changed without the lane changing.
    PhaseChanged {
        lane: usize,
        from: Phase,
        to: Phase,
        tick: Ticks,
    },
    /// Yellow expired and the next lane started its adaptive green.
    LaneAdvanced {
        from: usize,
        to: usize,
        green_ticks: i64,
        tick: Ticks,
    },
    /// An emergency vehicle was granted immediate green. `preempted` is the
    /// lane and phase that were cut off, or `None` for a re-grant of the lane
    /// that already held the pass.
    EmergencyGranted {
        lane: usize,
        preempted: Option<(usize, Phase)>,
        tick: Ticks,
    },
    /// The emergency ended and its lane began clearing through yellow.
    EmergencyCleared { lane: usize, tick: Ticks },
}

/// Discriminant tag for event types, used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalEventKind {
    PhaseChanged,
    LaneAdvanced,
    EmergencyGranted,
    EmergencyCleared,
}

impl SignalEvent {
    pub fn kind(&self) -> SignalEventKind {
        match self {
            SignalEvent::PhaseChanged { .. } => SignalEventKind::PhaseChanged,
            SignalEvent::LaneAdvanced { .. } => SignalEventKind::LaneAdvanced,
            SignalEvent::EmergencyGranted { .. } => SignalEventKind::EmergencyGranted,
            SignalEvent::EmergencyCleared { .. } => SignalEventKind::EmergencyCleared,
        }
    }

    pub fn tick(&self) -> Ticks {
        match self {
            SignalEvent::PhaseChanged { tick, .. }
            | SignalEvent::LaneAdvanced { tick, .. }
            | SignalEvent::EmergencyGranted { tick, .. }
            | SignalEvent::EmergencyCleared { tick, .. } => *tick,
        }
    }
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// Bounded buffer of undrained events. When full, the oldest event is
/// dropped so a host that never drains cannot grow memory without bound.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: std::collections::VecDeque<SignalEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventLog {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: std::collections::VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: SignalEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Remove and return all buffered events, oldest first.
    pub fn drain(&mut self) -> Vec<SignalEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events discarded because the buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared(tick: Ticks) -> SignalEvent {
        SignalEvent::EmergencyCleared { lane: 0, tick }
    }

    #[test]
    fn kind_and_tick_accessors() {
        let event = SignalEvent::LaneAdvanced {
            from: 3,
            to: 0,
            green_ticks: 7,
            tick: 42,
        };
        assert_eq!(event.kind(), SignalEventKind::LaneAdvanced);
        assert_eq!(event.tick(), 42);
    }

    #[test]
    fn drain_empties_in_order() {
        let mut log = EventLog::default();
        log.push(cleared(1));
        log.push(cleared(2));

        let drained = log.drain();
        assert_eq!(drained, vec![cleared(1), cleared(2)]);
        assert!(log.is_empty());
    }

    #[test]
    fn full_log_drops_oldest() {
        let mut log = EventLog::with_capacity(2);
        log.push(cleared(1));
        log.push(cleared(2));
        log.push(cleared(3));

        assert_eq!(log.len(), 2);
        assert_eq!(log.dropped(), 1);
        assert_eq!(log.drain(), vec![cleared(2), cleared(3)]);
    }
}

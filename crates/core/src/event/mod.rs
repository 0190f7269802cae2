//! Checkpoint events emitted by instrumented algorithms and the contract that
//! binds an algorithm to whatever consumes those events.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::VisualiserError;

/// Index list carried by an event. No algorithm highlights more than three
/// positions at once, so the common case never allocates.
pub type Highlights = SmallVec<[usize; 4]>;

/// Immutable description of one algorithm checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// Positions involved in the current comparison or shift.
    pub highlighted: Highlights,
    /// Position that was just written, moved or placed.
    pub active: Option<usize>,
    /// Set only while revealing the sorted array after the algorithm finished.
    pub is_final_sweep: bool,
    /// Set on every sweep event; the sort logic is over once this is seen.
    pub is_end: bool,
}

impl Event {
    pub fn new(highlighted: &[usize], active: Option<usize>) -> Self {
        Self {
            highlighted: SmallVec::from_slice(highlighted),
            active,
            is_final_sweep: false,
            is_end: false,
        }
    }

    /// Two or more positions being compared, nothing written yet.
    pub fn compare(indices: &[usize]) -> Self {
        Self::new(indices, None)
    }

    /// `index` just received a new value; `highlighted` gives the context.
    pub fn moved(highlighted: &[usize], index: usize) -> Self {
        Self::new(highlighted, Some(index))
    }

    /// Sorting finished, nothing highlighted, sweep about to start.
    pub fn settled() -> Self {
        Self::default()
    }

    /// One step of the cosmetic left-to-right reveal.
    pub fn sweep(index: usize) -> Self {
        Self {
            highlighted: SmallVec::new(),
            active: Some(index),
            is_final_sweep: true,
            is_end: true,
        }
    }

    /// Returns `true` when every referenced index is valid for `len`.
    pub fn within(&self, len: usize) -> bool {
        self.highlighted.iter().all(|&index| index < len)
            && self.active.map_or(true, |index| index < len)
    }
}

/// Reason an event consumer refused to hand control back to the algorithm.
#[derive(Debug, thiserror::Error)]
pub enum Halt {
    /// Abandon the current run and start over with a fresh array.
    #[error("restart requested")]
    Restart,
    /// Stop everything.
    #[error("quit requested")]
    Quit,
    /// Something outside the restart/quit protocol went wrong.
    #[error(transparent)]
    Fault(#[from] VisualiserError),
}

/// Outcome of a single suspension point. Algorithms propagate the `Err` arm
/// with `?` straight away and never retry.
pub type Step = std::result::Result<(), Halt>;

/// Callback contract between an algorithm and the playback side.
///
/// `array` is the algorithm's own view at the time of the checkpoint. The
/// call may block for as long as the consumer likes (pacing, pause) and the
/// algorithm resumes with the same array afterwards.
pub trait EventSink {
    fn on_event(&mut self, array: &[u32], event: Event) -> Step;
}

/// Emits the two trailing phases shared by every algorithm: one settled
/// event followed by a sweep event per index in ascending order.
pub fn finish(array: &[u32], sink: &mut dyn EventSink) -> Step {
    sink.on_event(array, Event::settled())?;
    for index in 0..array.len() {
        sink.on_event(array, Event::sweep(index))?;
    }
    Ok(())
}

/// Sink that keeps every event it receives along with the array length at
/// emission time. Used by the headless trace mode and by tests.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<(usize, Event)>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|(_, event)| event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns `true` if every recorded event referenced valid indices.
    pub fn all_within_bounds(&self) -> bool {
        self.events.iter().all(|(len, event)| event.within(*len))
    }

    /// Events emitted before the trailing settled/sweep phases.
    pub fn algorithm_events(&self) -> impl Iterator<Item = &Event> {
        let body = self
            .events
            .iter()
            .rposition(|(_, event)| *event == Event::settled())
            .unwrap_or(self.events.len());
        self.events[..body].iter().map(|(_, event)| event)
    }

    pub fn sweep_events(&self) -> impl Iterator<Item = &Event> {
        self.events().filter(|event| event.is_final_sweep)
    }

    pub fn summary(&self) -> EventCounts {
        let mut counts = EventCounts::default();
        for event in self.events() {
            counts.record(event);
        }
        counts
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, array: &[u32], event: Event) -> Step {
        self.events.push((array.len(), event));
        Ok(())
    }
}

/// Event totals grouped by the shape of the event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub total: usize,
    /// Highlights only, no active index.
    pub inspections: usize,
    /// Carries an active index outside the sweep.
    pub moves: usize,
    pub settled: usize,
    pub sweep: usize,
}

impl EventCounts {
    /// Adds one event to the matching bucket.
    pub fn record(&mut self, event: &Event) {
        self.total += 1;
        if event.is_final_sweep {
            self.sweep += 1;
        } else if event.active.is_some() {
            self.moves += 1;
        } else if event.highlighted.is_empty() {
            self.settled += 1;
        } else {
            self.inspections += 1;
        }
    }
}

/// Sink that only counts. Memory stays constant however many events a run
/// produces, which makes it the one to use for headless runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTally {
    counts: EventCounts,
    in_bounds: bool,
}

impl Default for EventTally {
    fn default() -> Self {
        Self {
            counts: EventCounts::default(),
            in_bounds: true,
        }
    }
}

impl EventTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> EventCounts {
        self.counts
    }

    /// Returns `true` if every event seen so far referenced valid indices.
    pub fn all_within_bounds(&self) -> bool {
        self.in_bounds
    }
}

impl EventSink for EventTally {
    fn on_event(&mut self, array: &[u32], event: Event) -> Step {
        self.in_bounds &= event.within(array.len());
        self.counts.record(&event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct QuitAfter(usize);

    impl EventSink for QuitAfter {
        fn on_event(&mut self, _array: &[u32], _event: Event) -> Step {
            if self.0 == 0 {
                return Err(Halt::Quit);
            }
            self.0 -= 1;
            Ok(())
        }
    }

    #[test]
    fn finish_emits_settled_then_ascending_sweep() {
        let mut log = EventLog::new();
        finish(&[3, 1, 2], &mut log).unwrap();

        let events: Vec<_> = log.events().cloned().collect();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], Event::settled());
        for (index, event) in events[1..].iter().enumerate() {
            assert_eq!(event.active, Some(index));
            assert!(event.is_final_sweep && event.is_end);
            assert!(event.highlighted.is_empty());
        }
    }

    #[test]
    fn finish_stops_at_first_halt() {
        let mut sink = QuitAfter(2);
        let outcome = finish(&[1, 2, 3, 4], &mut sink);
        assert!(matches!(outcome, Err(Halt::Quit)));
        assert_eq!(sink.0, 0);
    }

    #[test]
    fn bounds_check_covers_active_and_highlights() {
        assert!(Event::compare(&[0, 1]).within(2));
        assert!(!Event::compare(&[0, 2]).within(2));
        assert!(!Event::moved(&[0], 5).within(3));
        assert!(Event::settled().within(0));
    }

    #[test]
    fn summary_groups_by_shape() {
        let mut log = EventLog::new();
        let array = [2, 1];
        log.on_event(&array, Event::compare(&[0, 1])).unwrap();
        log.on_event(&array, Event::moved(&[0, 1], 1)).unwrap();
        finish(&array, &mut log).unwrap();

        let counts = log.summary();
        assert_eq!(counts.total, 5);
        assert_eq!(counts.inspections, 1);
        assert_eq!(counts.moves, 1);
        assert_eq!(counts.settled, 1);
        assert_eq!(counts.sweep, 2);
        assert_eq!(log.algorithm_events().count(), 2);
    }

    #[test]
    fn tally_matches_log_without_keeping_events() {
        let array = [4, 1, 3];
        let events = [
            Event::compare(&[0, 1]),
            Event::moved(&[0, 1], 1),
            Event::compare(&[1, 2]),
        ];
        let mut log = EventLog::new();
        let mut tally = EventTally::new();
        for event in events {
            log.on_event(&array, event.clone()).unwrap();
            tally.on_event(&array, event).unwrap();
        }
        finish(&array, &mut log).unwrap();
        finish(&array, &mut tally).unwrap();

        assert_eq!(tally.counts(), log.summary());
        assert!(tally.all_within_bounds());

        tally.on_event(&array, Event::moved(&[0], 3)).unwrap();
        assert!(!tally.all_within_bounds());
        assert_eq!(tally.counts().total, log.summary().total + 1);
    }
}

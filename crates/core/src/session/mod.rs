//! Array generation and the outer run/restart state machine.

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    algorithms::Algorithm,
    config::SessionSettings,
    event::{EventCounts, EventTally, Halt},
    sink::PlaybackSink,
    Result, VisualiserError,
};

/// Produces fresh arrays for every run according to fixed settings.
#[derive(Debug, Clone)]
pub struct ArrayGenerator {
    size: usize,
    max_value: u32,
    unique: bool,
    rng: StdRng,
}

impl ArrayGenerator {
    /// Builds a generator for validated settings. A unique request larger
    /// than the value range is shrunk to the range with a warning.
    pub fn new(settings: &SessionSettings) -> Result<Self> {
        settings.validate()?;

        let mut size = settings.size;
        let range = settings.max_value as usize;
        if settings.unique && size > range {
            tracing::warn!(
                requested = size,
                max_value = settings.max_value,
                "cannot draw that many unique values, reducing size to {range}"
            );
            size = range;
        }

        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            size,
            max_value: settings.max_value,
            unique: settings.unique,
            rng,
        })
    }

    /// Length of every generated array.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    pub fn unique(&self) -> bool {
        self.unique
    }

    /// Values are drawn from `1..=max_value`.
    pub fn generate(&mut self) -> Vec<u32> {
        if self.unique {
            index::sample(&mut self.rng, self.max_value as usize, self.size)
                .into_iter()
                .map(|value| value as u32 + 1)
                .collect()
        } else {
            (0..self.size)
                .map(|_| self.rng.gen_range(1..=self.max_value))
                .collect()
        }
    }
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SettingUp,
    Running,
    Finalized,
    Restarting,
    Exit,
}

/// Why the session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// The user asked to quit.
    Quit,
    /// Something outside the restart/quit protocol went wrong.
    Failed(VisualiserError),
}

/// What happened over the whole session.
#[derive(Debug)]
pub struct SessionReport {
    pub runs: usize,
    pub restarts: usize,
    pub completed: usize,
    pub end: SessionEnd,
}

impl SessionReport {
    pub fn is_clean(&self) -> bool {
        matches!(self.end, SessionEnd::Quit)
    }
}

/// Drives one algorithm over freshly generated arrays until the user quits.
pub struct Session<P> {
    algorithm: &'static Algorithm,
    generator: ArrayGenerator,
    sink: P,
    state: SessionState,
    runs: usize,
    restarts: usize,
    completed: usize,
}

impl<P: PlaybackSink> Session<P> {
    /// Resolves the algorithm and prepares the generator. Both failures are
    /// setup faults.
    pub fn new(settings: &SessionSettings, sink: P) -> Result<Self> {
        let algorithm = Algorithm::lookup(&settings.algorithm)?;
        let generator = ArrayGenerator::new(settings)?;
        Ok(Self::with_parts(algorithm, generator, sink))
    }

    pub fn with_parts(algorithm: &'static Algorithm, generator: ArrayGenerator, sink: P) -> Self {
        Self {
            algorithm,
            generator,
            sink,
            state: SessionState::SettingUp,
            runs: 0,
            restarts: 0,
            completed: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn algorithm(&self) -> &'static Algorithm {
        self.algorithm
    }

    pub fn generator(&self) -> &ArrayGenerator {
        &self.generator
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn into_sink(self) -> P {
        self.sink
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
    }

    /// Runs until quit or an unexpected fault.
    pub fn run(&mut self) -> SessionReport {
        let end = loop {
            match self.state {
                SessionState::SettingUp | SessionState::Restarting => {
                    self.transition(SessionState::Running);
                }
                SessionState::Running => {
                    let mut array = self.generator.generate();
                    self.runs += 1;
                    tracing::info!(
                        algorithm = self.algorithm.id,
                        size = array.len(),
                        run = self.runs,
                        "starting run"
                    );
                    self.sink.reset(&array);

                    match self.algorithm.run(&mut array, &mut self.sink) {
                        Ok(()) => {
                            self.completed += 1;
                            tracing::info!(run = self.runs, "sort complete");
                            self.transition(SessionState::Finalized);
                        }
                        Err(halt) => {
                            if let Some(end) = self.on_halt(halt) {
                                break end;
                            }
                        }
                    }
                }
                SessionState::Finalized => {
                    let halt = self.sink.finalize();
                    if let Some(end) = self.on_halt(halt) {
                        break end;
                    }
                }
                SessionState::Exit => break SessionEnd::Quit,
            }
        };

        self.transition(SessionState::Exit);
        SessionReport {
            runs: self.runs,
            restarts: self.restarts,
            completed: self.completed,
            end,
        }
    }

    /// Maps a halt to the next state; returns the end reason when the
    /// session is over.
    fn on_halt(&mut self, halt: Halt) -> Option<SessionEnd> {
        match halt {
            Halt::Restart => {
                self.restarts += 1;
                tracing::info!(restarts = self.restarts, "restarting with a fresh array");
                self.transition(SessionState::Restarting);
                None
            }
            Halt::Quit => {
                tracing::info!("quit requested");
                Some(SessionEnd::Quit)
            }
            Halt::Fault(err) => {
                tracing::error!(
                    error = %err,
                    details = ?err,
                    state = ?self.state,
                    run = self.runs,
                    "unexpected failure, ending session"
                );
                Some(SessionEnd::Failed(err))
            }
        }
    }
}

impl<P> std::fmt::Debug for Session<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("algorithm", &self.algorithm.id)
            .field("generator", &self.generator)
            .field("state", &self.state)
            .field("runs", &self.runs)
            .field("restarts", &self.restarts)
            .finish()
    }
}

/// Result of a headless run, suitable for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    pub algorithm: String,
    pub input: Vec<u32>,
    pub output: Vec<u32>,
    pub events: EventCounts,
    pub sorted: bool,
    pub in_bounds: bool,
}

/// Runs the configured algorithm once without any display, counting every
/// event.
pub fn trace(settings: &SessionSettings) -> Result<TraceReport> {
    let algorithm = Algorithm::lookup(&settings.algorithm)?;
    let mut generator = ArrayGenerator::new(settings)?;
    let input = generator.generate();

    let mut output = input.clone();
    let mut tally = EventTally::new();
    algorithm
        .run(&mut output, &mut tally)
        .map_err(|halt| VisualiserError::msg(format!("headless run halted: {halt}")))?;

    Ok(TraceReport {
        algorithm: algorithm.id.to_string(),
        sorted: output.windows(2).all(|pair| pair[0] <= pair[1]),
        in_bounds: tally.all_within_bounds(),
        events: tally.counts(),
        input,
        output,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::event::{Event, EventSink, Step};

    fn settings(size: usize, max_value: u32, unique: bool) -> SessionSettings {
        SessionSettings {
            algorithm: "insertion_sort".into(),
            size,
            max_value,
            delay_ms: 0,
            unique,
            seed: Some(7),
        }
    }

    /// Restarts the first run after `restart_after` events, then lets the
    /// second run finish and quits from the final screen.
    #[derive(Default)]
    struct ScriptedSink {
        restart_after: usize,
        events_this_run: usize,
        resets: Vec<Vec<u32>>,
        last_array: Vec<u32>,
        finalized: usize,
    }

    impl EventSink for ScriptedSink {
        fn on_event(&mut self, array: &[u32], _event: Event) -> Step {
            self.events_this_run += 1;
            self.last_array = array.to_vec();
            if self.resets.len() == 1 && self.events_this_run > self.restart_after {
                return Err(Halt::Restart);
            }
            Ok(())
        }
    }

    impl PlaybackSink for ScriptedSink {
        fn reset(&mut self, array: &[u32]) {
            self.events_this_run = 0;
            self.resets.push(array.to_vec());
        }

        fn finalize(&mut self) -> Halt {
            self.finalized += 1;
            Halt::Quit
        }
    }

    #[test]
    fn generated_values_stay_in_range() {
        let mut generator = ArrayGenerator::new(&settings(200, 9, false)).unwrap();
        let array = generator.generate();
        assert_eq!(array.len(), 200);
        assert!(array.iter().all(|&value| (1..=9).contains(&value)));
    }

    #[test]
    fn unique_generation_has_no_duplicates() {
        let mut generator = ArrayGenerator::new(&settings(50, 60, true)).unwrap();
        let array = generator.generate();
        let distinct: HashSet<_> = array.iter().collect();
        assert_eq!(distinct.len(), 50);
        assert!(array.iter().all(|&value| (1..=60).contains(&value)));
    }

    #[test]
    fn impossible_unique_request_shrinks_size() {
        let mut generator = ArrayGenerator::new(&settings(30, 10, true)).unwrap();
        assert_eq!(generator.size(), 10);
        let mut array = generator.generate();
        array.sort_unstable();
        assert_eq!(array, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn seeded_generators_repeat() {
        let a = ArrayGenerator::new(&settings(20, 100, false)).unwrap().generate();
        let b = ArrayGenerator::new(&settings(20, 100, false)).unwrap().generate();
        assert_eq!(a, b);
    }

    #[test]
    fn restart_regenerates_and_runs_to_completion() {
        let sink = ScriptedSink {
            restart_after: 3,
            ..Default::default()
        };
        let mut session = Session::new(&settings(12, 50, false), sink).unwrap();
        let report = session.run();

        assert!(report.is_clean());
        assert_eq!(report.runs, 2);
        assert_eq!(report.restarts, 1);
        assert_eq!(report.completed, 1);
        assert_eq!(session.state(), SessionState::Exit);

        let sink = session.into_sink();
        assert_eq!(sink.finalized, 1);
        assert_eq!(sink.resets.len(), 2);
        assert!(sink.resets.iter().all(|array| array.len() == 12));
        // Same seed stream, so the second run sees a new array.
        assert_ne!(sink.resets[0], sink.resets[1]);

        let mut expected = sink.resets[1].clone();
        expected.sort_unstable();
        assert_eq!(sink.last_array, expected);
    }

    #[test]
    fn faults_end_the_session() {
        struct Broken;

        impl EventSink for Broken {
            fn on_event(&mut self, _array: &[u32], _event: Event) -> Step {
                Err(Halt::Fault(VisualiserError::msg("boom")))
            }
        }

        impl PlaybackSink for Broken {
            fn reset(&mut self, _array: &[u32]) {}

            fn finalize(&mut self) -> Halt {
                Halt::Quit
            }
        }

        let mut session = Session::new(&settings(5, 5, false), Broken).unwrap();
        let report = session.run();
        assert!(matches!(report.end, SessionEnd::Failed(_)));
        assert_eq!(report.completed, 0);
    }

    #[test]
    fn unknown_algorithm_is_a_setup_fault() {
        let mut bad = settings(5, 5, false);
        bad.algorithm = "sleep_sort".into();
        let err = Session::new(&bad, ScriptedSink::default()).unwrap_err();
        assert!(matches!(err, VisualiserError::UnknownAlgorithm(_)));
    }

    #[test]
    fn trace_reports_sorted_output() {
        let mut settings = settings(25, 1_000, false);
        settings.algorithm = "radix".into();
        let report = trace(&settings).unwrap();

        assert_eq!(report.algorithm, "radix_sort");
        assert!(report.sorted);
        assert!(report.in_bounds);
        assert_eq!(report.events.sweep, 25);
        let mut expected = report.input.clone();
        expected.sort_unstable();
        assert_eq!(report.output, expected);
    }

    #[test]
    fn trace_counts_match_a_full_event_log() {
        for algorithm in ["bubble_sort", "heap_sort", "merge_sort", "shell_sort"] {
            let mut settings = settings(40, 200, false);
            settings.algorithm = algorithm.into();
            let report = trace(&settings).unwrap();

            let mut replay = report.input.clone();
            let mut log = crate::event::EventLog::new();
            Algorithm::lookup(algorithm)
                .unwrap()
                .run(&mut replay, &mut log)
                .unwrap();

            assert_eq!(report.events, log.summary(), "{algorithm}");
            assert_eq!(report.in_bounds, log.all_within_bounds(), "{algorithm}");
            assert_eq!(report.output, replay, "{algorithm}");
        }
    }
}

use crate::event::{finish, Event, EventSink, Step};

/// Bubble sort with early exit once a pass makes no swaps.
pub fn bubble_sort(array: &mut [u32], sink: &mut dyn EventSink) -> Step {
    let n = array.len();
    let mut pass = 0;
    loop {
        let mut swapped = false;
        for j in 0..n.saturating_sub(pass + 1) {
            sink.on_event(array, Event::compare(&[j, j + 1]))?;
            if array[j] > array[j + 1] {
                array.swap(j, j + 1);
                swapped = true;
                sink.on_event(array, Event::moved(&[j, j + 1], j + 1))?;
            }
        }
        pass += 1;
        if !swapped {
            break;
        }
    }
    tracing::trace!(passes = pass, "bubble sort finished");

    finish(array, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventLog;

    #[test]
    fn textbook_trace_takes_four_passes() {
        let mut array = [5, 3, 1, 4, 2];
        let mut log = EventLog::new();
        bubble_sort(&mut array, &mut log).unwrap();

        assert_eq!(array, [1, 2, 3, 4, 5]);
        let counts = log.summary();
        // Passes compare 4, 3, 2 and 1 pairs; the fourth pass makes no swap.
        assert_eq!(counts.inspections, 4 + 3 + 2 + 1);
        // One swap per inversion.
        assert_eq!(counts.moves, 7);
        assert_eq!(counts.sweep, 5);
    }

    #[test]
    fn sorted_input_exits_after_one_pass() {
        let mut array = [1, 2, 3, 4];
        let mut log = EventLog::new();
        bubble_sort(&mut array, &mut log).unwrap();

        let counts = log.summary();
        assert_eq!(counts.inspections, 3);
        assert_eq!(counts.moves, 0);
    }

    #[test]
    fn swap_marks_right_hand_index() {
        let mut array = [2, 1];
        let mut log = EventLog::new();
        bubble_sort(&mut array, &mut log).unwrap();

        let body: Vec<_> = log.algorithm_events().cloned().collect();
        assert_eq!(body[0], Event::compare(&[0, 1]));
        assert_eq!(body[1], Event::moved(&[0, 1], 1));
    }
}

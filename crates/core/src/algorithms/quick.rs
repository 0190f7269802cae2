use crate::event::{finish, Event, EventSink, Halt, Step};

/// Quick sort with a Lomuto partition around the last element.
pub fn quick_sort(array: &mut [u32], sink: &mut dyn EventSink) -> Step {
    if !array.is_empty() {
        let high = array.len() - 1;
        sort_range(array, 0, high, sink)?;
    }

    finish(array, sink)
}

fn sort_range(array: &mut [u32], low: usize, high: usize, sink: &mut dyn EventSink) -> Step {
    if low >= high {
        return Ok(());
    }

    let pivot = partition(array, low, high, sink)?;
    if pivot > low {
        sort_range(array, low, pivot - 1, sink)?;
    }
    sort_range(array, pivot + 1, high, sink)
}

fn partition(
    array: &mut [u32],
    low: usize,
    high: usize,
    sink: &mut dyn EventSink,
) -> Result<usize, Halt> {
    let pivot = array[high];
    sink.on_event(array, Event::compare(&[high]))?;

    // Next slot for an element smaller than the pivot.
    let mut store = low;
    for j in low..high {
        sink.on_event(array, Event::moved(&[store, j, high], j))?;
        if array[j] < pivot {
            array.swap(store, j);
            sink.on_event(array, Event::moved(&[store, j, high], j))?;
            store += 1;
        }
    }

    array.swap(store, high);
    sink.on_event(array, Event::moved(&[store], store))?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventLog;

    #[test]
    fn pivot_lands_in_final_position() {
        let mut array = [3, 5, 1, 4];
        let mut log = EventLog::new();
        quick_sort(&mut array, &mut log).unwrap();

        assert_eq!(array, [1, 3, 4, 5]);
        let body: Vec<_> = log.algorithm_events().cloned().collect();
        assert_eq!(body[0], Event::compare(&[3]));
        // First partition places the pivot 4 at index 2.
        let placement = body
            .iter()
            .find(|event| event.highlighted.len() == 1 && event.active.is_some());
        assert_eq!(placement, Some(&Event::moved(&[2], 2)));
    }

    #[test]
    fn handles_sorted_and_reversed_runs() {
        for input in [vec![1, 2, 3, 4, 5, 6], vec![6, 5, 4, 3, 2, 1], vec![2, 2, 2]] {
            let mut array = input.clone();
            let mut log = EventLog::new();
            quick_sort(&mut array, &mut log).unwrap();

            let mut expected = input;
            expected.sort_unstable();
            assert_eq!(array, expected);
            assert!(log.all_within_bounds());
        }
    }
}

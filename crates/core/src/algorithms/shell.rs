use crate::event::{finish, Event, EventSink, Step};

/// Largest term of Knuth's 1, 4, 13, 40, ... sequence used for `n` elements.
pub(crate) fn initial_gap(n: usize) -> usize {
    let mut gap = 1;
    // `gap < n / 3` over the reals.
    while gap * 3 < n {
        gap = gap * 3 + 1;
    }
    gap
}

pub fn shell_sort(array: &mut [u32], sink: &mut dyn EventSink) -> Step {
    let n = array.len();
    let mut gap = initial_gap(n);

    while gap > 0 {
        for i in gap..n {
            let held = array[i];
            let mut j = i;
            while j >= gap && array[j - gap] > held {
                array[j] = array[j - gap];
                sink.on_event(array, Event::moved(&[j, j - gap], j))?;
                j -= gap;
            }
            array[j] = held;
            sink.on_event(array, Event::moved(&[i], j))?;
        }
        gap /= 3;
    }

    finish(array, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventLog;

    #[test]
    fn knuth_gaps() {
        assert_eq!(initial_gap(0), 1);
        assert_eq!(initial_gap(3), 1);
        assert_eq!(initial_gap(4), 4);
        assert_eq!(initial_gap(12), 4);
        assert_eq!(initial_gap(13), 13);
        assert_eq!(initial_gap(100), 40);
    }

    #[test]
    fn one_placement_per_element_per_gap() {
        let mut array = [9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
        let mut log = EventLog::new();
        shell_sort(&mut array, &mut log).unwrap();

        assert_eq!(array, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let placements = log
            .algorithm_events()
            .filter(|event| event.highlighted.len() == 1)
            .count();
        // Gaps 4 and 1 over ten elements.
        assert_eq!(placements, (10 - 4) + (10 - 1));
    }
}

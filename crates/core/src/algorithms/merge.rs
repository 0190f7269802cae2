use crate::event::{finish, Event, EventSink, Step};

/// Top-down merge sort over a full-size scratch buffer.
///
/// Every output position is reported twice: once when it is written to the
/// scratch buffer and once more when it is copied back.
pub fn merge_sort(array: &mut [u32], sink: &mut dyn EventSink) -> Step {
    let n = array.len();
    if n > 0 {
        let mut scratch = vec![0; n];
        split(array, &mut scratch, 0, n - 1, sink)?;
    }

    finish(array, sink)
}

fn split(
    array: &mut [u32],
    scratch: &mut [u32],
    start: usize,
    end: usize,
    sink: &mut dyn EventSink,
) -> Step {
    if start >= end {
        return Ok(());
    }

    let middle = (start + end) / 2;
    split(array, scratch, start, middle, sink)?;
    split(array, scratch, middle + 1, end, sink)?;
    merge(array, scratch, start, end, sink)
}

fn merge(
    array: &mut [u32],
    scratch: &mut [u32],
    start: usize,
    end: usize,
    sink: &mut dyn EventSink,
) -> Step {
    let left_end = (start + end) / 2;
    let mut left = start;
    let mut right = left_end + 1;
    let mut out = start;

    while left <= left_end && right <= end {
        sink.on_event(array, Event::moved(&[left, right], out))?;
        if array[left] <= array[right] {
            scratch[out] = array[left];
            left += 1;
        } else {
            scratch[out] = array[right];
            right += 1;
        }
        out += 1;
    }

    while left <= left_end {
        sink.on_event(array, Event::moved(&[left], out))?;
        scratch[out] = array[left];
        left += 1;
        out += 1;
    }

    while right <= end {
        sink.on_event(array, Event::moved(&[right], out))?;
        scratch[out] = array[right];
        right += 1;
        out += 1;
    }

    for index in start..=end {
        array[index] = scratch[index];
        sink.on_event(array, Event::moved(&[index], index))?;
    }
    Ok(())
}

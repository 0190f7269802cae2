use crate::event::{finish, Event, EventSink, Step};

/// Heap sort. Events during heap maintenance carry a mirrored copy of the
/// array that is refreshed after every swap.
pub fn heap_sort(array: &mut [u32], sink: &mut dyn EventSink) -> Step {
    let n = array.len();
    let mut mirror = array.to_vec();

    for root in (0..n / 2).rev() {
        sift_down(array, &mut mirror, n, root, sink)?;
    }

    for end in (1..n).rev() {
        array.swap(0, end);
        mirror.copy_from_slice(array);
        sink.on_event(&mirror, Event::moved(&[0, end], end))?;
        sift_down(array, &mut mirror, end, 0, sink)?;
    }

    finish(array, sink)
}

fn sift_down(
    array: &mut [u32],
    mirror: &mut [u32],
    len: usize,
    root: usize,
    sink: &mut dyn EventSink,
) -> Step {
    let left = 2 * root + 1;
    let right = 2 * root + 2;
    let mut largest = root;

    sink.on_event(mirror, Event::compare(&[root]))?;

    if left < len {
        sink.on_event(mirror, Event::moved(&[root, left], left))?;
        if array[left] > array[largest] {
            largest = left;
        }
    }

    if right < len {
        sink.on_event(mirror, Event::moved(&[root, largest, right], right))?;
        if array[right] > array[largest] {
            largest = right;
        }
    }

    if largest != root {
        array.swap(root, largest);
        mirror.copy_from_slice(array);
        sink.on_event(mirror, Event::moved(&[root, largest], largest))?;
        sift_down(array, mirror, len, largest, sink)?;
    }
    Ok(())
}

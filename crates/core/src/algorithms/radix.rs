use crate::event::{finish, Event, EventSink, Step};

const RADIX: usize = 10;

/// LSD radix sort, one counting sort per decimal digit.
pub fn radix_sort(array: &mut [u32], sink: &mut dyn EventSink) -> Step {
    let Some(&max) = array.iter().max() else {
        return Ok(());
    };

    let mut output = vec![0; array.len()];
    let mut exp: u64 = 1;
    while u64::from(max) / exp > 0 {
        counting_pass(array, &mut output, exp, sink)?;
        exp *= RADIX as u64;
    }

    finish(array, sink)
}

fn digit(value: u32, exp: u64) -> usize {
    (u64::from(value) / exp % RADIX as u64) as usize
}

fn counting_pass(
    array: &mut [u32],
    output: &mut [u32],
    exp: u64,
    sink: &mut dyn EventSink,
) -> Step {
    let n = array.len();
    let mut count = [0usize; RADIX];

    for i in 0..n {
        count[digit(array[i], exp)] += 1;
        sink.on_event(array, Event::compare(&[i]))?;
    }

    for d in 1..RADIX {
        count[d] += count[d - 1];
    }

    for i in (0..n).rev() {
        let d = digit(array[i], exp);
        let slot = count[d] - 1;
        output[slot] = array[i];
        count[d] -= 1;
        sink.on_event(array, Event::moved(&[i], slot))?;
    }

    for i in 0..n {
        array[i] = output[i];
        sink.on_event(array, Event::moved(&[], i))?;
    }
    Ok(())
}

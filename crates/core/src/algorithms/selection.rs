use crate::event::{finish, Event, EventSink, Step};

pub fn selection_sort(array: &mut [u32], sink: &mut dyn EventSink) -> Step {
    let n = array.len();
    for i in 0..n {
        let mut min = i;
        sink.on_event(array, Event::compare(&[i]))?;

        for j in i + 1..n {
            sink.on_event(array, Event::moved(&[i, min], j))?;
            if array[j] < array[min] {
                min = j;
                sink.on_event(array, Event::moved(&[i, min], j))?;
            }
        }

        array.swap(i, min);
        sink.on_event(array, Event::moved(&[i], min))?;
    }

    finish(array, sink)
}

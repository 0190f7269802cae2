use crate::event::{finish, Event, EventSink, Step};

pub fn insertion_sort(array: &mut [u32], sink: &mut dyn EventSink) -> Step {
    for i in 1..array.len() {
        let key = array[i];
        sink.on_event(array, Event::moved(&[i], i))?;

        let mut slot = i;
        while slot > 0 && key < array[slot - 1] {
            array[slot] = array[slot - 1];
            sink.on_event(array, Event::moved(&[slot - 1, i], slot))?;
            slot -= 1;
        }
        array[slot] = key;
        sink.on_event(array, Event::moved(&[slot], slot))?;
    }

    finish(array, sink)
}

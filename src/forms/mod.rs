mod serialize;
mod word_count;

pub(crate) use serialize::serialize_page_forms;
pub(crate) use word_count::attach_word_counters;

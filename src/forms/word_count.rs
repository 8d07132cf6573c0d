use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Textareas opt in with `data-word-limit="N"`; the counter lives in
/// `#{name}_counter`.
const LIMIT_ATTR: &str = "data-word-limit";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WordLimitStatus {
    Remaining(usize),
    Over(usize),
}

impl WordLimitStatus {
    pub fn text(&self) -> String {
        match self {
            WordLimitStatus::Remaining(n) => format!("{n} words remaining"),
            WordLimitStatus::Over(n) => format!("{n} words over the limit"),
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            WordLimitStatus::Remaining(_) => "char_counter_ok",
            WordLimitStatus::Over(_) => "char_counter_over",
        }
    }
}

/// Runs of anything but space, CR and LF. Tabs do not split words.
pub(crate) fn count_words(text: &str) -> usize {
    text.split([' ', '\r', '\n'])
        .filter(|w| !w.is_empty())
        .count()
}

pub(crate) fn word_limit_status(text: &str, limit: usize) -> WordLimitStatus {
    let words = count_words(text);
    if words <= limit {
        WordLimitStatus::Remaining(limit - words)
    } else {
        WordLimitStatus::Over(words - limit)
    }
}

fn refresh_counter(doc: &web_sys::Document, area: &web_sys::HtmlTextAreaElement, limit: usize) {
    let counter_id = format!("{}_counter", area.name());
    let Some(counter) = doc.get_element_by_id(&counter_id) else {
        return;
    };

    let status = word_limit_status(&area.value(), limit);
    counter.set_text_content(Some(&status.text()));
    counter.set_class_name(status.class());
}

/// Wire live word counters for every limited textarea on the page.
///
/// Returns how many were attached. Listeners live for the page.
pub(crate) fn attach_word_counters() -> usize {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return 0;
    };
    let Ok(areas) = doc.query_selector_all(&format!("textarea[{LIMIT_ATTR}]")) else {
        return 0;
    };

    let mut attached = 0;
    for i in 0..areas.length() {
        let Some(area) = areas
            .item(i)
            .and_then(|n| n.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        else {
            continue;
        };

        let raw = area.get_attribute(LIMIT_ATTR).unwrap_or_default();
        let Ok(limit) = raw.trim().parse::<usize>() else {
            warn!(field = %area.name(), %raw, "ignoring bad word limit");
            continue;
        };

        refresh_counter(&doc, &area, limit);

        let doc2 = doc.clone();
        let area2 = area.clone();
        let cb = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            refresh_counter(&doc2, &area2, limit);
        }) as Box<dyn FnMut(web_sys::Event)>);

        if let Err(e) = area.add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())
        {
            warn!(field = %area.name(), error = ?e, "could not attach word counter");
            continue;
        }
        cb.forget();
        attached += 1;
    }

    debug!(attached, "word counters attached");
    attached
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words_splits_on_space_and_newlines_only() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \r\n "), 0);
        assert_eq!(count_words("one two\nthree\r\nfour"), 4);
        assert_eq!(count_words("tab\tjoined words"), 2);
        assert_eq!(count_words("  padded   out  "), 2);
    }

    #[test]
    fn test_word_limit_status() {
        assert_eq!(word_limit_status("a b c", 5), WordLimitStatus::Remaining(2));
        assert_eq!(word_limit_status("a b c", 3), WordLimitStatus::Remaining(0));
        assert_eq!(word_limit_status("a b c d", 3), WordLimitStatus::Over(1));
    }

    #[test]
    fn test_word_limit_text_and_class() {
        let ok = WordLimitStatus::Remaining(12);
        assert_eq!(ok.text(), "12 words remaining");
        assert_eq!(ok.class(), "char_counter_ok");

        let over = WordLimitStatus::Over(3);
        assert_eq!(over.text(), "3 words over the limit");
        assert_eq!(over.class(), "char_counter_over");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_attach_word_counters_renders_initial_count() {
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .expect("document");
        let host = doc.create_element("div").expect("div");
        host.set_inner_html(
            r#"<textarea name="mission" data-word-limit="4">feed the city</textarea>
               <span id="mission_counter"></span>
               <textarea name="notes" data-word-limit="lots"></textarea>"#,
        );
        doc.body().expect("body").append_child(&host).expect("append");

        assert_eq!(attach_word_counters(), 1);
        let counter = doc.get_element_by_id("mission_counter").expect("counter");
        assert_eq!(counter.text_content().as_deref(), Some("1 words remaining"));
        assert_eq!(counter.class_name(), "char_counter_ok");

        host.remove();
    }
}

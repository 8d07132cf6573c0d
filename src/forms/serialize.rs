use tracing::warn;
use wasm_bindgen::JsCast;

/// `name=value&...` with both sides percent-encoded.
pub(crate) fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Text fields of every `<form>` on the page, in document order.
///
/// File inputs are skipped (their values are `File` objects, not strings);
/// disabled controls and buttons are already excluded by `FormData`.
pub(crate) fn collect_page_form_pairs() -> Vec<(String, String)> {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return vec![];
    };
    let Ok(forms) = doc.query_selector_all("form") else {
        return vec![];
    };

    let mut out = vec![];
    for i in 0..forms.length() {
        let Some(form) = forms
            .item(i)
            .and_then(|n| n.dyn_into::<web_sys::HtmlFormElement>().ok())
        else {
            continue;
        };

        let data = match web_sys::FormData::new_with_form(&form) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = ?e, "could not read form fields");
                continue;
            }
        };

        let Ok(Some(entries)) = js_sys::try_iter(&data) else {
            continue;
        };
        for entry in entries.flatten() {
            let pair = js_sys::Array::from(&entry);
            let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string())
            else {
                continue;
            };
            out.push((name, value));
        }
    }

    out
}

/// Body for a save request, like jQuery's `$('form').serialize()`.
pub(crate) fn serialize_page_forms() -> String {
    let pairs = collect_page_form_pairs();
    encode_pairs(pairs.iter().map(|(n, v)| (n.as_str(), v.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pairs_escapes_names_and_values() {
        let body = encode_pairs([
            ("csrfmiddlewaretoken", "abc"),
            ("project_title", "Food & Shelter"),
            ("budget[0]", "1,200"),
        ]);
        assert_eq!(
            body,
            "csrfmiddlewaretoken=abc&project_title=Food%20%26%20Shelter&budget%5B0%5D=1%2C200"
        );
    }

    #[test]
    fn test_encode_pairs_keeps_empty_values_and_drops_unnamed() {
        assert_eq!(encode_pairs([("a", ""), ("", "x"), ("b", "2")]), "a=&b=2");
        assert_eq!(encode_pairs(Vec::<(&str, &str)>::new()), "");
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_serialize_page_forms_reads_text_fields() {
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .expect("document");
        let host = doc.create_element("div").expect("div");
        host.set_inner_html(
            r#"<form>
                 <input name="org_name" value="Harbor Collective">
                 <textarea name="narrative">We feed people</textarea>
                 <input name="locked" value="x" disabled>
                 <input type="file" name="budget_file">
               </form>"#,
        );
        doc.body().expect("body").append_child(&host).expect("append");

        let body = serialize_page_forms();
        host.remove();

        assert!(body.contains("org_name=Harbor%20Collective"));
        assert!(body.contains("narrative=We%20feed%20people"));
        assert!(!body.contains("locked"));
        assert!(!body.contains("budget_file"));
    }
}

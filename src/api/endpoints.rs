/// Urls for one application form.
///
/// `staff_override` is a ready-made query string (`?user=...`) that lets staff
/// edit another user's draft; it is appended verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FormEndpoints {
    autosave_base: String,
    has_staff_override: bool,
}

impl FormEndpoints {
    pub fn new(url_prefix: &str, submit_id: &str, staff_override: Option<&str>) -> Self {
        let prefix = url_prefix.trim_matches('/');
        let staff = staff_override.unwrap_or_default();

        Self {
            autosave_base: format!("/{prefix}/{submit_id}/autosave{staff}"),
            has_staff_override: !staff.is_empty(),
        }
    }

    /// Path and query for a save request.
    pub fn autosave_url(&self, force: bool) -> String {
        let sep = if self.has_staff_override { '&' } else { '?' };
        format!("{}{sep}force={force}", self.autosave_base)
    }
}

/// Template placeholders the server renders when there is no override.
pub(crate) fn normalize_staff_override(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == "None" {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Where to send the browser after a 401.
pub(crate) fn login_redirect_url(login_url: &str, current_href: &str) -> String {
    format!("{login_url}?next={current_href}")
}

/// Url-encoded form body with the editor id appended.
///
/// `user_id` rides in the POST body, not the query string; the server reads it from the form data.
pub(crate) fn save_body(form_body: &str, user_id: &str) -> String {
    let user_id = urlencoding::encode(user_id);
    if form_body.is_empty() {
        format!("user_id={user_id}")
    } else {
        format!("{form_body}&user_id={user_id}")
    }
}

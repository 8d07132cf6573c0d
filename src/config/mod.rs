use crate::api::{normalize_staff_override, FormEndpoints};
use crate::util::generate_user_id;
use serde::{de, Deserialize, Deserializer};
use std::time::Duration;

/// Key under `window.ENV` the page template fills in.
const ENV_KEY: &str = "GRANT_FORM";

const DEFAULT_MOUNT_ID: &str = "autosave-root";
const DEFAULT_SUPPORT_URL: &str = "/apply/support#contact";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("window.ENV.GRANT_FORM is not set")]
    Missing,
    #[error("window.ENV.GRANT_FORM could not be read: {0}")]
    Js(String),
    #[error("invalid form config: {0}")]
    Invalid(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AutosaveTimings {
    pub save_interval: Duration,
    /// Wait after a first-time init before periodic saving starts.
    pub start_delay: Duration,
    /// How long the window may stay unfocused before autosave pauses.
    pub pause_delay: Duration,
}

impl Default for AutosaveTimings {
    fn default() -> Self {
        Self {
            save_interval: Duration::from_secs(60),
            start_delay: Duration::from_secs(10),
            pause_delay: Duration::from_secs(60),
        }
    }
}

/// Per-page settings rendered by the server template, e.g.
///
/// ```js
/// window.ENV = { GRANT_FORM: { url_prefix: "apply", submit_id: 12, user_id: "..." } };
/// ```
#[derive(Deserialize, Clone, Debug)]
pub(crate) struct PageConfig {
    /// First path segment, e.g. `apply` or `report`.
    pub url_prefix: String,
    /// Primary key of the object the form posts to (cycle or award).
    #[serde(deserialize_with = "id_string")]
    pub submit_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub staff_user: Option<String>,

    /// Defaults to the page origin.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub mount_id: Option<String>,
    #[serde(default)]
    pub support_url: Option<String>,

    /// `false` skips the initial delay (e.g. reopening an existing draft).
    #[serde(default = "default_first_time")]
    pub first_time: bool,

    #[serde(default)]
    pub save_interval_ms: Option<u64>,
    #[serde(default)]
    pub start_delay_ms: Option<u64>,
    #[serde(default)]
    pub pause_delay_ms: Option<u64>,
}

fn default_first_time() -> bool {
    true
}

/// Ids arrive as template numbers or strings.
fn id_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a non-empty string or number id, got {other}"
        ))),
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = serde_json::from_str(json)?;
        if config.url_prefix.trim_matches('/').is_empty() {
            return Err(ConfigError::Invalid(de::Error::custom(
                "url_prefix must not be empty",
            )));
        }
        Ok(config)
    }

    /// Read `window.ENV.GRANT_FORM`.
    pub fn load() -> Result<Self, ConfigError> {
        let window = web_sys::window().ok_or(ConfigError::Missing)?;
        let env = window.get("ENV").ok_or(ConfigError::Missing)?;
        if env.is_undefined() || !env.is_object() {
            return Err(ConfigError::Missing);
        }

        let form = js_sys::Reflect::get(&env, &ENV_KEY.into())
            .map_err(|e| ConfigError::Js(format!("{e:?}")))?;
        if form.is_undefined() || form.is_null() {
            return Err(ConfigError::Missing);
        }

        let json = js_sys::JSON::stringify(&form)
            .map_err(|e| ConfigError::Js(format!("{e:?}")))?
            .as_string()
            .ok_or_else(|| ConfigError::Js("stringify returned a non-string".into()))?;

        Self::from_json(&json)
    }

    pub fn timings(&self) -> AutosaveTimings {
        let d = AutosaveTimings::default();
        let ms = |v: Option<u64>, fallback: Duration| {
            v.filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(fallback)
        };

        AutosaveTimings {
            save_interval: ms(self.save_interval_ms, d.save_interval),
            start_delay: ms(self.start_delay_ms, d.start_delay),
            // Unless set, the pause delay follows the save interval.
            pause_delay: ms(
                self.pause_delay_ms,
                ms(self.save_interval_ms, d.pause_delay),
            ),
        }
    }

    pub fn endpoints(&self) -> FormEndpoints {
        let staff = normalize_staff_override(self.staff_user.as_deref());
        FormEndpoints::new(&self.url_prefix, &self.submit_id, staff.as_deref())
    }

    /// Server-provided editor id, or a fresh one for this page load.
    pub fn resolved_user_id(&self) -> String {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "None")
            .map(str::to_string)
            .unwrap_or_else(generate_user_id)
    }

    pub fn resolved_base_url(&self) -> String {
        if let Some(url) = self.base_url.as_deref().filter(|s| !s.trim().is_empty()) {
            return url.to_string();
        }
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }

    pub fn mount_id(&self) -> &str {
        self.mount_id.as_deref().unwrap_or(DEFAULT_MOUNT_ID)
    }

    pub fn support_url(&self) -> String {
        self.support_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SUPPORT_URL.to_string())
    }
}

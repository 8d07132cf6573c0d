use crate::api::TransportError;

/// Raw reply from the save endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SaveResponse {
    pub status: u16,
    pub body: String,
}

/// What a save attempt means for the autosave session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SaveOutcome {
    Saved,
    /// 2xx other than 200.
    UnexpectedStatus(u16),
    /// 409: another editor saved in between.
    Conflict,
    /// 401: body carries the login url.
    AuthExpired { login_url: String },
    Timeout,
    HttpError(u16),
    /// Request never produced a status.
    Transport,
}

impl SaveOutcome {
    pub fn from_response(resp: &SaveResponse) -> Self {
        match resp.status {
            200 => SaveOutcome::Saved,
            409 => SaveOutcome::Conflict,
            401 => SaveOutcome::AuthExpired {
                login_url: resp.body.clone(),
            },
            s if (200..300).contains(&s) => SaveOutcome::UnexpectedStatus(s),
            s => SaveOutcome::HttpError(s),
        }
    }

    pub fn from_transport(err: &TransportError) -> Self {
        match err {
            TransportError::Timeout => SaveOutcome::Timeout,
            TransportError::Network(_) => SaveOutcome::Transport,
        }
    }

    /// Text shown on the page after "Error: ", for outcomes that leave the
    /// schedule running. `None` for outcomes handled elsewhere.
    pub fn error_text(&self) -> Option<String> {
        let text = match self {
            SaveOutcome::Saved | SaveOutcome::Conflict | SaveOutcome::AuthExpired { .. } => {
                return None
            }
            SaveOutcome::Timeout => "Request timeout",
            SaveOutcome::HttpError(code) => status_text(*code).unwrap_or("Unknown error"),
            SaveOutcome::UnexpectedStatus(_) | SaveOutcome::Transport => "Unknown error",
        };
        Some(text.to_string())
    }
}

pub(crate) fn status_text(code: u16) -> Option<&'static str> {
    let text = match code {
        400 => "400 Bad request",
        401 => "401 Unauthorized",
        403 => "403 Forbidden",
        404 => "404 Not found",
        408 => "408 Request timeout",
        500 => "500 Internal server error",
        503 => "503 Service unavailable",
        504 => "504 Gateway timeout",
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(status: u16, body: &str) -> SaveResponse {
        SaveResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(SaveOutcome::from_response(&resp(200, "")), SaveOutcome::Saved);
        assert_eq!(
            SaveOutcome::from_response(&resp(409, "")),
            SaveOutcome::Conflict
        );
        assert_eq!(
            SaveOutcome::from_response(&resp(204, "")),
            SaveOutcome::UnexpectedStatus(204)
        );
        assert_eq!(
            SaveOutcome::from_response(&resp(408, "")),
            SaveOutcome::HttpError(408)
        );
        assert_eq!(
            SaveOutcome::from_response(&resp(302, "")),
            SaveOutcome::HttpError(302)
        );
    }

    #[test]
    fn test_auth_expired_keeps_body_verbatim() {
        let out = SaveOutcome::from_response(&resp(401, "/apply/login/"));
        assert_eq!(
            out,
            SaveOutcome::AuthExpired {
                login_url: "/apply/login/".to_string()
            }
        );
        assert_eq!(out.error_text(), None);
    }

    #[test]
    fn test_transport_errors() {
        assert_eq!(
            SaveOutcome::from_transport(&TransportError::Timeout),
            SaveOutcome::Timeout
        );
        let out = SaveOutcome::from_transport(&TransportError::Network("offline".into()));
        assert_eq!(out, SaveOutcome::Transport);
        assert_eq!(out.error_text().as_deref(), Some("Unknown error"));
    }

    #[test]
    fn test_error_text_uses_status_table() {
        assert_eq!(
            SaveOutcome::HttpError(404).error_text().as_deref(),
            Some("404 Not found")
        );
        assert_eq!(
            SaveOutcome::HttpError(502).error_text().as_deref(),
            Some("Unknown error")
        );
        assert_eq!(SaveOutcome::Conflict.error_text(), None);
        assert_eq!(SaveOutcome::Saved.error_text(), None);
    }
}

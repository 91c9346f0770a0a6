//! One-time login marker parameters on the launch URL.
//!
//! After the OAuth round trip the backend redirects back with either
//! `login_success=true` or `login_error=<reason>`. They are read once and then
//! removed so a reload doesn't replay them.

use url::Url;

pub const LOGIN_SUCCESS_PARAM: &str = "login_success";
pub const LOGIN_ERROR_PARAM: &str = "login_error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginMarker {
    Succeeded,
    Failed(String),
}

/// Read the login marker from `url`, if any.
///
/// Only the first occurrence of each parameter counts. Success wins when both
/// are present; only the literal value `true` is success, and an empty
/// `login_error` is ignored.
pub fn read_marker(url: &Url) -> Option<LoginMarker> {
    let first = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if first(LOGIN_SUCCESS_PARAM).as_deref() == Some("true") {
        return Some(LoginMarker::Succeeded);
    }
    first(LOGIN_ERROR_PARAM)
        .filter(|reason| !reason.is_empty())
        .map(LoginMarker::Failed)
}

/// `url` without either marker parameter; other parameters are kept in order.
pub fn strip_markers(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != LOGIN_SUCCESS_PARAM && k != LOGIN_ERROR_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut cleaned = url.clone();
    if kept.is_empty() {
        cleaned.set_query(None);
    } else {
        cleaned.query_pairs_mut().clear().extend_pairs(kept);
    }
    cleaned
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_success_marker() {
        let u = url("http://127.0.0.1:5173/?login_success=true");
        assert_eq!(read_marker(&u), Some(LoginMarker::Succeeded));
    }

    #[test]
    fn test_success_marker_requires_true() {
        let u = url("http://127.0.0.1:5173/?login_success=1");
        assert_eq!(read_marker(&u), None);
    }

    #[test]
    fn test_error_marker_is_decoded() {
        let u = url("http://127.0.0.1:5173/?login_error=access%20denied");
        assert_eq!(
            read_marker(&u),
            Some(LoginMarker::Failed("access denied".to_string()))
        );
    }

    #[test]
    fn test_empty_error_marker_is_ignored() {
        let u = url("http://127.0.0.1:5173/?login_error=");
        assert_eq!(read_marker(&u), None);
    }

    #[test]
    fn test_success_wins_over_error() {
        let u = url("http://127.0.0.1:5173/?login_error=state_mismatch&login_success=true");
        assert_eq!(read_marker(&u), Some(LoginMarker::Succeeded));
    }

    #[test]
    fn test_repeated_marker_uses_first_value() {
        let u = url("http://127.0.0.1:5173/?login_success=false&login_success=true");
        assert_eq!(read_marker(&u), None);

        let u = url("http://127.0.0.1:5173/?login_error=&login_error=access_denied");
        assert_eq!(read_marker(&u), None);

        let u = url("http://127.0.0.1:5173/?login_error=first&login_error=second");
        assert_eq!(read_marker(&u), Some(LoginMarker::Failed("first".to_string())));
    }

    #[test]
    fn test_no_markers() {
        let u = url("http://127.0.0.1:5173/?theme=dark");
        assert_eq!(read_marker(&u), None);
    }

    #[test]
    fn test_strip_removes_only_markers() {
        let u = url("http://127.0.0.1:5173/app?theme=dark&login_success=true&lang=fr");
        assert_eq!(
            strip_markers(&u).as_str(),
            "http://127.0.0.1:5173/app?theme=dark&lang=fr"
        );
    }

    #[test]
    fn test_strip_drops_empty_query() {
        let u = url("http://127.0.0.1:5173/?login_success=true&login_error=x");
        assert_eq!(strip_markers(&u).as_str(), "http://127.0.0.1:5173/");
    }
}

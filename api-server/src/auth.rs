use actix_web::http::header::{HeaderMap, AUTHORIZATION};

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let authorization = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = authorization.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed)
}

/// Opaque player identity established by the upstream auth layer. Accepts a
/// bearer token or an `x-player-id` header; cookie plumbing lives elsewhere.
pub(crate) fn player_id(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = bearer_token(headers) {
        return Some(token.to_string());
    }

    headers
        .get("x-player-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    fn headers_with(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            actix_web::http::header::HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
        headers
    }

    #[test]
    fn bearer_token_parses_and_trims() {
        let headers = headers_with("authorization", "Bearer  player-7 ");
        assert_eq!(bearer_token(&headers), Some("player-7"));
    }

    #[test]
    fn non_bearer_schemes_are_rejected() {
        let headers = headers_with("authorization", "Basic cGxheWVy");
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(player_id(&headers), None);
    }

    #[test]
    fn player_header_is_a_fallback() {
        let headers = headers_with("x-player-id", "player-9");
        assert_eq!(player_id(&headers).as_deref(), Some("player-9"));
    }
}

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::{env, sync::OnceLock};

const DEFAULT_CSP_POLICY: &str = "default-src 'self'; base-uri 'self'; frame-ancestors 'none'; object-src 'none'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; connect-src 'self' https:";
const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Attach the security header set to every response.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in response_headers() {
        headers.insert(name.clone(), value.clone());
    }
    response
}

/// The full header set, resolved from the environment once.
fn response_headers() -> &'static [(HeaderName, HeaderValue)] {
    static HEADERS: OnceLock<Vec<(HeaderName, HeaderValue)>> = OnceLock::new();
    HEADERS.get_or_init(|| {
        build_headers(
            env::var("CSP_POLICY").ok(),
            env_flag("ENABLE_HSTS", true),
        )
    })
}

fn build_headers(
    csp_override: Option<String>,
    enable_hsts: bool,
) -> Vec<(HeaderName, HeaderValue)> {
    let csp = csp_override
        .and_then(|raw| match HeaderValue::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Invalid CSP_POLICY value ({err}), using the default policy");
                None
            }
        })
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CSP_POLICY));

    let mut headers = vec![
        (HeaderName::from_static("content-security-policy"), csp),
        (
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ),
        (
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ),
        (
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ),
        (
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
        ),
        (
            HeaderName::from_static("cross-origin-opener-policy"),
            HeaderValue::from_static("same-origin"),
        ),
        (
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("same-origin"),
        ),
    ];

    if enable_hsts {
        headers.push((
            HeaderName::from_static("strict-transport-security"),
            HeaderValue::from_static(HSTS_VALUE),
        ));
    }

    headers
}

fn env_flag(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .and_then(|value| match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "on" => Some(true),
            "0" | "false" | "no" | "n" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(
        headers: &'a [(HeaderName, HeaderValue)],
        name: &str,
    ) -> Option<&'a HeaderValue> {
        headers
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v)
    }

    #[test]
    fn baseline_headers_always_present() {
        let headers = build_headers(None, false);
        assert!(find(&headers, "content-security-policy").is_some());
        assert_eq!(
            find(&headers, "x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(find(&headers, "x-frame-options").unwrap(), "DENY");
    }

    #[test]
    fn hsts_is_toggleable() {
        let with = build_headers(None, true);
        assert_eq!(
            find(&with, "strict-transport-security").unwrap(),
            HSTS_VALUE
        );
        let without = build_headers(None, false);
        assert!(find(&without, "strict-transport-security").is_none());
    }

    #[test]
    fn invalid_csp_override_falls_back_to_default() {
        let headers = build_headers(Some("bad\npolicy".to_string()), false);
        let csp = find(&headers, "content-security-policy").unwrap();
        assert_eq!(csp.to_str().unwrap(), DEFAULT_CSP_POLICY);
    }

    #[test]
    fn valid_csp_override_is_used() {
        let headers = build_headers(Some("default-src 'none'".to_string()), false);
        let csp = find(&headers, "content-security-policy").unwrap();
        assert_eq!(csp.to_str().unwrap(), "default-src 'none'");
    }
}

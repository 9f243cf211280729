use std::time::Duration;

use http::header::CONTENT_TYPE;
use http::request::Parts as ReqParts;
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// CORS policy for the browser client.
///
/// `*` anywhere in `allowed` opens the API to every origin; otherwise an origin passes when it
/// ends with one of the configured suffixes.
pub fn cors(allowed: &[String]) -> CorsLayer {
    let allow_origin = if allowed.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let suffixes = allowed.to_vec();
        AllowOrigin::predicate(move |org: &HeaderValue, _: &ReqParts| {
            suffixes
                .iter()
                .any(|suffix| org.as_bytes().ends_with(suffix.as_bytes()))
        })
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(allow_origin)
        .max_age(PREFLIGHT_MAX_AGE)
}

//! Signed GET/POST requests against the configured API.

use api_signer_common::request_signing::RequestSigner;
use api_signer_common::settings::Settings;
use http::header::{HeaderMap, CONTENT_TYPE};
use url::Url;

use crate::error::CliError;

const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Join the API base URL and a request path.
///
/// The signed path must be exactly what is sent, so a path the URL parser
/// would rewrite (dot segments, unescaped spaces or non-ASCII) is rejected.
pub(crate) fn build_url(api_url: &str, path: &str) -> Result<Url, CliError> {
    if !path.starts_with('/') {
        return Err(CliError::Config(format!(
            "Request path must start with '/': {}",
            path
        )));
    }
    let joined = format!("{}{}", api_url.trim_end_matches('/'), path);
    let url = Url::parse(&joined)
        .map_err(|e| CliError::Config(format!("Invalid request URL {}: {}", joined, e)))?;

    let base_path = Url::parse(api_url)
        .map_err(|e| CliError::Config(format!("Invalid API URL {}: {}", api_url, e)))?
        .path()
        .trim_end_matches('/')
        .to_string();
    let sent = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };
    if sent != format!("{}{}", base_path, path) {
        return Err(CliError::Config(format!(
            "Request path {} would be sent as {}; pass it percent-encoded and normalized",
            path, sent
        )));
    }
    Ok(url)
}

/// Sign a request and return its full header set, `Content-Type` included.
pub(crate) fn signed_headers(
    settings: &Settings,
    method: Method,
    path: &str,
    body: &[u8],
) -> Result<HeaderMap, CliError> {
    let signer = RequestSigner::from_settings(settings)?;
    let mut headers = signer.sign_request_now(method.as_str(), path, body)?;
    headers.insert(CONTENT_TYPE, http::HeaderValue::from_static(CONTENT_TYPE_JSON));
    Ok(headers)
}

/// Render headers one per line as `name: value`.
pub(crate) fn render_headers(headers: &HeaderMap) -> Result<String, CliError> {
    let mut lines = Vec::with_capacity(headers.len());
    for (name, value) in headers {
        let value = value
            .to_str()
            .map_err(|e| CliError::Http(format!("Header {} is not text: {}", name, e)))?;
        lines.push(format!("{}: {}", name, value));
    }
    lines.sort();
    Ok(lines.join("\n"))
}

fn with_headers<B>(
    mut request: ureq::RequestBuilder<B>,
    headers: &HeaderMap,
) -> Result<ureq::RequestBuilder<B>, CliError> {
    for (name, value) in headers {
        let value = value
            .to_str()
            .map_err(|e| CliError::Http(format!("Header {} is not text: {}", name, e)))?;
        request = request.header(name.as_str(), value);
    }
    Ok(request)
}

/// Send a signed request and return the response body.
///
/// With `dry_run`, nothing is sent and the request line and headers are
/// returned instead.
pub fn send(
    settings: &Settings,
    method: Method,
    path: &str,
    body: &[u8],
    dry_run: bool,
) -> Result<String, CliError> {
    let url = build_url(&settings.api_url, path)?;
    let headers = signed_headers(settings, method, path, body)?;

    if dry_run {
        return Ok(format!(
            "{} {}\n{}",
            method.as_str(),
            url,
            render_headers(&headers)?
        ));
    }

    log::info!("{} {}", method.as_str(), url);

    let response = match method {
        Method::Get => with_headers(ureq::get(url.as_str()), &headers)?.call()?,
        Method::Post => with_headers(ureq::post(url.as_str()), &headers)?.send(body)?,
    };

    log::debug!("Response status: {}", response.status());
    Ok(response.into_body().read_to_string()?)
}

//! HTTP response checks shared by the store and platform clients.

/// A non-success response, before it is turned into a client's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    RateLimited { retry_after_secs: u64 },
    Status { status: u16, message: String },
}

/// Map 429 to [`Rejection::RateLimited`] and other non-success statuses to
/// [`Rejection::Status`], converted into the caller's error type. Returns the
/// response unchanged on success.
pub async fn check_response<E: From<Rejection>>(resp: reqwest::Response) -> Result<reqwest::Response, E> {
    if resp.status() == 429 {
        return Err(Rejection::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        }
        .into());
    }
    if !resp.status().is_success() {
        return Err(Rejection::Status {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        }
        .into());
    }
    Ok(resp)
}

/// `Retry-After` in seconds, 60 when absent or unparseable.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

//! HTTP lookup against an ipinfo-compatible service.

use std::sync::Arc;

use log::debug;
use url::Url;

use super::types::{GeoLocation, IpInfoResponse};
use super::Geolocator;
use crate::error_handling::{InitializationError, LookupError};
use crate::initialization::init_client;

/// Client for `GET {base_url}/{ip}/json`.
#[derive(Clone)]
pub struct IpInfoClient {
    client: Arc<reqwest::Client>,
    base_url: Url,
    token: Option<String>,
    provider: String,
}

impl IpInfoClient {
    /// Builds a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Fails if `base_url` is not an absolute http(s) URL or the HTTP client
    /// cannot be built.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout_seconds: u64,
        token: Option<String>,
    ) -> Result<Self, InitializationError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        let provider = base_url
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| base_url.to_string());
        let client = init_client(user_agent, timeout_seconds)?;

        Ok(Self {
            client,
            base_url,
            token: token.filter(|t| !t.is_empty()),
            provider,
        })
    }

    fn lookup_url(&self, ip: &str) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(ip)
            .push("json");
        Ok(url)
    }
}

impl Geolocator for IpInfoClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn locate(&self, ip: &str) -> Result<GeoLocation, LookupError> {
        let url = self.lookup_url(ip)?;
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// Decodes an ipinfo-style JSON body.
pub(crate) fn parse_response(body: &str) -> Result<GeoLocation, LookupError> {
    let response: IpInfoResponse = serde_json::from_str(body)?;
    let loc = response
        .loc
        .filter(|l| !l.trim().is_empty())
        .ok_or(LookupError::MissingLocation)?;
    let (latitude, longitude) = parse_loc(&loc)?;

    Ok(GeoLocation {
        latitude,
        longitude,
        city: non_empty(response.city),
        region: non_empty(response.region),
        country: non_empty(response.country),
        organization: non_empty(response.org),
        timezone: non_empty(response.timezone),
    })
}

/// Parses `"lat,lon"` and checks both are in range.
pub(crate) fn parse_loc(loc: &str) -> Result<(f64, f64), LookupError> {
    let invalid = || LookupError::InvalidLocation(loc.to_string());

    let (lat, lon) = loc.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid());
    }
    Ok((latitude, longitude))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

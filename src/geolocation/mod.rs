//! IP geolocation.
//!
//! A `Geolocator` resolves one IP address to coordinates. The collector only
//! depends on the trait; `IpInfoClient` is the HTTP implementation used in
//! production.

mod lookup;
mod types;

use std::future::Future;

pub use lookup::IpInfoClient;
pub use types::GeoLocation;

use crate::error_handling::LookupError;

/// Resolves IP addresses to locations.
pub trait Geolocator {
    /// Short provider name stored alongside each record.
    fn provider(&self) -> &str;

    /// Looks up a single IP. One call is one outbound request.
    fn locate(&self, ip: &str) -> impl Future<Output = Result<GeoLocation, LookupError>> + Send;
}

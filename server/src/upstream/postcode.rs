//! Postcode County Lookup
//!
//! Resolves a UK postcode to its county via postcodes.io. Best-effort:
//! lookup failures come back as `None` and the caller decides whether that
//! is fatal for the request it is building.

use serde::Deserialize;
use tracing::warn;

const POSTCODES_ENDPOINT: &str = "https://api.postcodes.io/postcodes";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    status: u16,
    result: Option<PostcodeResult>,
}

#[derive(Debug, Deserialize)]
struct PostcodeResult {
    admin_county: Option<String>,
    admin_district: Option<String>,
}

/// County for a postcode, preferring the administrative county and falling
/// back to the district (metropolitan areas have no admin county).
fn county_from(response: LookupResponse) -> Option<String> {
    if response.status != 200 {
        return None;
    }
    let result = response.result?;
    result.admin_county.or(result.admin_district)
}

/// Look up the county for a UK postcode. Spaces in the postcode are fine.
///
/// Returns `None` for unknown postcodes and for transport failures alike.
pub async fn lookup_county(http: &reqwest::Client, postcode: &str) -> Option<String> {
    let postcode: String = postcode.split_whitespace().collect();

    let response = match http
        .get(format!("{POSTCODES_ENDPOINT}/{postcode}"))
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            warn!("Postcode lookup request failed: {}", err);
            return None;
        }
    };

    if !response.status().is_success() {
        return None;
    }

    match response.json::<LookupResponse>().await {
        Ok(body) => county_from(body),
        Err(err) => {
            warn!("Postcode lookup returned unexpected body: {}", err);
            None
        }
    }
}

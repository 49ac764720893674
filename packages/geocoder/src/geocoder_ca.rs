//! geocoder.ca intersection lookup client.
//!
//! Request: `GET {base_url}?street1={main}&street2={cross}&city={city}&geoit=xml`.
//! Response: an XML document whose root may contain `latt`, `longt`,
//! `confidence` (0–1), and a presence-only `error` element. No
//! authentication. The free tier is heavily throttled and signals it
//! with HTTP 403, which the transport retries with exponential backoff.

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::service::{GeocodingService, RetryPolicy};
use crate::{Geocode, GeocodeError, IntersectionGeocoder};

/// Confidence below which a match is classified as not found.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// User agent sent with every request.
const USER_AGENT: &str = "parking-map/1.0";

/// A configured geocoder.ca client.
pub struct GeocoderCa {
    client: reqwest::Client,
    service: GeocodingService,
}

impl GeocoderCa {
    /// Creates a client for the given service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP client cannot be built.
    pub fn new(service: GeocodingService) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, service })
    }
}

#[async_trait]
impl IntersectionGeocoder for GeocoderCa {
    async fn fetch(
        &self,
        main_street: &str,
        cross_street: &str,
    ) -> Result<Geocode, GeocodeError> {
        fetch_intersection(&self.client, &self.service, main_street, cross_street).await
    }
}

/// Looks up the coordinates of a street intersection.
///
/// An empty street name short-circuits to [`Geocode::skipped`] without
/// any network call.
///
/// # Errors
///
/// Returns [`GeocodeError`] on transport failure, retry exhaustion, or
/// a response that is not the XML document the service promises.
pub async fn fetch_intersection(
    client: &reqwest::Client,
    service: &GeocodingService,
    main_street: &str,
    cross_street: &str,
) -> Result<Geocode, GeocodeError> {
    if main_street.trim().is_empty() || cross_street.trim().is_empty() {
        return Ok(Geocode::skipped());
    }

    log::info!("Fetching geocode for {main_street} at {cross_street}");

    let url = format!(
        "{base}?street1={street1}&street2={street2}&city={city}&geoit=xml",
        base = service.base_url,
        street1 = urlencoding(main_street),
        street2 = urlencoding(cross_street),
        city = urlencoding(&service.city),
    );

    let body = get_with_retry(client, &service.retry, &url).await?;
    parse_geocode_xml(&body)
}

/// Issues a GET, retrying per the policy when the status is retryable.
async fn get_with_retry(
    client: &reqwest::Client,
    policy: &RetryPolicy,
    url: &str,
) -> Result<String, GeocodeError> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let resp = client.get(url).send().await?;
        let status = resp.status().as_u16();

        if policy.is_retryable("GET", status) {
            if attempt >= policy.max_attempts {
                return Err(GeocodeError::RetriesExhausted {
                    attempts: attempt,
                    status,
                });
            }
            let delay = policy.backoff_delay(attempt);
            log::warn!(
                "Geocoder returned {status}, retrying in {}s (attempt {attempt}/{})",
                delay.as_secs(),
                policy.max_attempts
            );
            tokio::time::sleep(delay).await;
            continue;
        }

        return Ok(resp.text().await?);
    }
}

/// Classifies a geocoder.ca XML response.
///
/// - an `error` element anywhere in the document is a conclusive miss,
///   regardless of any coordinates present;
/// - confidence below [`CONFIDENCE_THRESHOLD`] (missing counts as 0)
///   discards the coordinates and is a conclusive miss;
/// - otherwise both `latt` and `longt` must be present for a hit.
///
/// # Errors
///
/// Returns [`GeocodeError::UnexpectedFormat`] for unparseable XML or
/// non-numeric `latt`/`longt`/`confidence` text.
pub fn parse_geocode_xml(body: &str) -> Result<Geocode, GeocodeError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut current: Option<String> = None;
    let mut lat_text: Option<String> = None;
    let mut lng_text: Option<String> = None;
    let mut confidence_text: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "error" {
                    return Ok(Geocode::not_found());
                }
                current = Some(name);
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"error" {
                    return Ok(Geocode::not_found());
                }
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| GeocodeError::UnexpectedFormat {
                        message: format!("Bad text node: {e}"),
                    })?
                    .into_owned();
                match current.as_deref() {
                    Some("latt") if lat_text.is_none() => lat_text = Some(text),
                    Some("longt") if lng_text.is_none() => lng_text = Some(text),
                    Some("confidence") if confidence_text.is_none() => {
                        confidence_text = Some(text);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(GeocodeError::UnexpectedFormat {
                    message: format!("Malformed XML: {e}"),
                });
            }
        }
    }

    let confidence = match confidence_text {
        Some(text) => parse_float("confidence", &text)?,
        None => 0.0,
    };

    if confidence < CONFIDENCE_THRESHOLD {
        log::debug!("Geocode confidence {confidence} below threshold, treating as not found");
        return Ok(Geocode::not_found());
    }

    let lat = lat_text.map(|t| parse_float("latt", &t)).transpose()?;
    let lng = lng_text.map(|t| parse_float("longt", &t)).transpose()?;

    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(Geocode::found(lat, lng)),
        _ => Ok(Geocode::not_found()),
    }
}

fn parse_float(field: &str, text: &str) -> Result<f64, GeocodeError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::UnexpectedFormat {
            message: format!("Non-numeric {field}: {text:?}"),
        })
}

/// Simple percent-encoding for URL query parameters.
fn urlencoding(s: &str) -> String {
    s.replace(' ', "+")
        .replace('&', "%26")
        .replace('#', "%23")
        .replace('?', "%3F")
        .replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::default_service;
    use parking_map_bylaw_models::GeocodeStatus;

    #[test]
    fn parses_full_geodata_document() {
        let body = "<geodata>\
                        <latt>43.690601</latt>\
                        <longt>-79.439944</longt>\
                        <city>toronto</city>\
                        <prov>ON</prov>\
                        <street1>ashbury avenue</street1>\
                        <street2>oakwood avenue</street2>\
                        <confidence>0.9</confidence>\
                    </geodata>";
        let geocode = parse_geocode_xml(body).unwrap();
        assert_eq!(geocode.status, GeocodeStatus::Found);
        assert_eq!(geocode.lat, Some(43.690_601));
        assert_eq!(geocode.lng, Some(-79.439_944));
    }

    #[test]
    fn error_element_wins_over_everything_else() {
        let body = "<geodata>\
                        <latt>43.690601</latt>\
                        <longt>-79.439944</longt>\
                        <confidence>0.9</confidence>\
                        <error><code>008</code></error>\
                    </geodata>";
        assert_eq!(parse_geocode_xml(body).unwrap(), Geocode::not_found());
    }

    #[test]
    fn nested_error_element_is_still_an_error() {
        let body = "<geodata><result><error/></result></geodata>";
        assert_eq!(parse_geocode_xml(body).unwrap(), Geocode::not_found());
    }

    #[test]
    fn low_confidence_discards_coordinates() {
        let body = "<geodata>\
                        <latt>43.690601</latt>\
                        <longt>-79.439944</longt>\
                        <confidence>0.3</confidence>\
                    </geodata>";
        let geocode = parse_geocode_xml(body).unwrap();
        assert_eq!(geocode.status, GeocodeStatus::NotFound);
        assert_eq!(geocode.lat, None);
        assert_eq!(geocode.lng, None);
    }

    #[test]
    fn threshold_confidence_is_accepted() {
        let body = "<geodata>\
                        <latt>43.690601</latt>\
                        <longt>-79.439944</longt>\
                        <confidence>0.5</confidence>\
                    </geodata>";
        assert_eq!(
            parse_geocode_xml(body).unwrap().status,
            GeocodeStatus::Found
        );
    }

    #[test]
    fn missing_confidence_counts_as_zero() {
        let body = "<geodata><latt>43.690601</latt><longt>-79.439944</longt></geodata>";
        assert_eq!(parse_geocode_xml(body).unwrap(), Geocode::not_found());
    }

    #[test]
    fn missing_coordinate_with_high_confidence_is_not_found() {
        let body = "<geodata><latt>43.690601</latt><confidence>0.9</confidence></geodata>";
        assert_eq!(parse_geocode_xml(body).unwrap(), Geocode::not_found());
    }

    #[test]
    fn mismatched_tags_are_an_unexpected_format() {
        let body = "<geodata><latt>43.690601</geodata>";
        assert!(matches!(
            parse_geocode_xml(body),
            Err(GeocodeError::UnexpectedFormat { .. })
        ));
    }

    #[test]
    fn non_numeric_confidence_is_an_unexpected_format() {
        let body = "<geodata><confidence>high</confidence></geodata>";
        assert!(matches!(
            parse_geocode_xml(body),
            Err(GeocodeError::UnexpectedFormat { .. })
        ));
    }

    #[tokio::test]
    async fn empty_street_skips_without_a_network_call() {
        // The base_url is unroutable; reaching the network would error.
        let mut service = default_service();
        service.base_url = "http://127.0.0.1:9/".to_string();
        let client = reqwest::Client::new();

        let geocode = fetch_intersection(&client, &service, "", "Oakwood Avenue")
            .await
            .unwrap();
        assert_eq!(geocode, Geocode::skipped());

        let geocode = fetch_intersection(&client, &service, "Ashbury Avenue", "  ")
            .await
            .unwrap();
        assert_eq!(geocode, Geocode::skipped());
    }

    #[test]
    fn encodes_query_characters() {
        assert_eq!(urlencoding("Queen Street W"), "Queen+Street+W");
        assert_eq!(urlencoding("King & Dufferin"), "King+%26+Dufferin");
    }
}

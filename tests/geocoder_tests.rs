use devcamper_backend::config::GeocoderConfig;
use devcamper_backend::util::geocoder::{GeocodeError, Geocoder, MapQuestGeocoder};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn geocoder_for(server: &MockServer) -> MapQuestGeocoder {
    let config = GeocoderConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        timeout_secs: 5,
    };
    MapQuestGeocoder::new(config).unwrap()
}

#[tokio::test]
async fn test_geocode_parses_first_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocoding/v1/address"))
        .and(query_param("key", "test-key"))
        .and(query_param("location", "233 Bay State Rd Boston MA 02215"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "locations": [
                    {
                        "latLng": { "lat": 42.350846, "lng": -71.104081 },
                        "street": "233 Bay State Rd",
                        "adminArea5": "Boston",
                        "adminArea3": "MA",
                        "postalCode": "02215",
                        "adminArea1": "US"
                    },
                    {
                        "latLng": { "lat": 0.0, "lng": 0.0 },
                        "adminArea5": "Elsewhere"
                    }
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let geo = geocoder_for(&server).geocode("233 Bay State Rd Boston MA 02215").await.unwrap();
    assert_eq!(geo.lat, 42.350846);
    assert_eq!(geo.lng, -71.104081);
    assert_eq!(geo.city.as_deref(), Some("Boston"));
    assert_eq!(geo.zipcode.as_deref(), Some("02215"));
    assert_eq!(geo.formatted_address, "233 Bay State Rd, Boston, MA 02215, US");
}

#[tokio::test]
async fn test_geocode_without_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocoding/v1/address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [{ "locations": [] }] })))
        .mount(&server)
        .await;

    let err = geocoder_for(&server).geocode("Atlantis").await.unwrap_err();
    assert!(matches!(err, GeocodeError::NoResult(ref address) if address == "Atlantis"));
}

#[tokio::test]
async fn test_geocode_upstream_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocoding/v1/address"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = geocoder_for(&server).geocode("02215").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Status(403)));
}

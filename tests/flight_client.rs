mod common;

use chrono::NaiveDate;
use flight_search::flight_client::{ClassType, ClientError, FlightClient, FlightSearchQuery, FlightSource};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> FlightClient {
    FlightClient::new(server.uri(), reqwest::Client::new())
}

#[tokio::test]
async fn search_forwards_filled_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights"))
        .and(query_param("departureLocation", "Berlin"))
        .and(query_param("departureDate", "2024-07-01"))
        .and(query_param("classType", "ECONOMY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [common::flight_summary_json(1), common::flight_summary_json(2)],
            "totalElements": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = FlightSearchQuery {
        departure_location: Some("Berlin".to_string()),
        departure_date: NaiveDate::from_ymd_opt(2024, 7, 1),
        class_type: Some(ClassType::Economy),
        ..Default::default()
    };
    let page = client(&server).search_flights(&query).await.unwrap();

    let ids: Vec<i64> = page.content.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(page.content[0].class_types, vec!["ECONOMY", "BUSINESS"]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("departureLocation=Berlin&departureDate=2024-07-01&classType=ECONOMY"));
}

#[tokio::test]
async fn details_are_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::flight_details_json(42)))
        .mount(&server)
        .await;

    let details = client(&server).get_flight(42).await.unwrap();

    assert_eq!(details.id, 42);
    assert_eq!(details.available_seats.len(), 2);
    assert_eq!(details.available_seats[1].amount, 3);
    assert_eq!(details.luggage_option("Checked bag").map(|o| o.price), Some(35.0));
    assert_eq!(details.prices.get("ECONOMY"), Some(&80.0));
    assert_eq!(details.price_history.history_by_class["ECONOMY"].len(), 2);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).fetch_details(7).await.unwrap_err();

    assert!(matches!(err, ClientError::Status(status) if status == reqwest::StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).get_flight(7).await.unwrap_err();

    assert!(matches!(err, ClientError::Http(_)));
}

use wikiroute_core::config::Config;
use wikiroute_core::contract::{OpenUrlRequest, RouteRequest};
use wikiroute_core::route_service::RouteService;
use wikiroute_core::shared_store::open_memory;
use wikiroute_core::transport::{handle_json, handle_request, ErrorCode, TransportResponse};

fn service() -> RouteService {
    RouteService::with_connection(Config::default(), open_memory().unwrap()).unwrap()
}

#[test]
fn request_handler_returns_ok_transport_response() {
    let mut service = service();

    let response = handle_request(
        &mut service,
        RouteRequest::OpenUrl(OpenUrlRequest {
            url: "wikipedia://search?term=Swift".into(),
            detached_surface: false,
        }),
    );

    match response {
        TransportResponse::Ok { response } => {
            let encoded = serde_json::to_string(&TransportResponse::Ok { response }).unwrap();
            assert!(encoded.contains("\"status\":\"ok\""));
            assert!(encoded.contains("search_request"));
        }
        _ => panic!("expected ok transport response"),
    }
}

#[test]
fn json_handler_returns_invalid_json_error_code() {
    let mut service = service();

    let raw = handle_json(&mut service, "{not-json");
    let parsed: TransportResponse = serde_json::from_str(&raw).unwrap();

    match parsed {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::InvalidJson),
        _ => panic!("expected invalid json error"),
    }
}

#[test]
fn json_handler_returns_invalid_request_error_code() {
    let mut service = service();
    let request = RouteRequest::OpenUrl(OpenUrlRequest {
        url: "definitely not a url".into(),
        detached_surface: false,
    });

    let raw = handle_json(&mut service, &serde_json::to_string(&request).unwrap());
    let parsed: TransportResponse = serde_json::from_str(&raw).unwrap();

    match parsed {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::InvalidRequest),
        _ => panic!("expected invalid request error"),
    }
}

#[test]
fn json_handler_returns_store_error_code_for_corrupt_payload() {
    let config = Config::default();
    let db = open_memory().unwrap();
    wikiroute_core::shared_store::write_value(
        &db,
        wikiroute_core::shared_store::RECENT_SEARCHES_KEY,
        "not-json",
    )
    .unwrap();
    let mut service = RouteService::with_connection(config, db).unwrap();

    let raw = handle_json(
        &mut service,
        r#"{"kind":"Suggestions","payload":{"preview":false}}"#,
    );
    let parsed: TransportResponse = serde_json::from_str(&raw).unwrap();

    match parsed {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::Store),
        _ => panic!("expected store error"),
    }
}

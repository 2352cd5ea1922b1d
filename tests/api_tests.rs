use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ride_dispatch::config::environment::EnvironmentConfig;
use ride_dispatch::{create_router, AppState};

struct TestApp {
    router: Router,
}

struct TestResponse {
    status: StatusCode,
    body: Value,
}

impl TestApp {
    fn new() -> Self {
        let config = EnvironmentConfig::from_lookup(|_| None).unwrap();
        Self {
            router: create_router(AppState::in_memory(config)),
        }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }

    async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    async fn passenger(&self, phone_number: i64) -> i64 {
        let response = self
            .post(
                "/passengers",
                json!({"first_name": "Ana", "last_name": "Gil", "phone_number": phone_number}),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["id"].as_i64().unwrap()
    }

    async fn driver(&self, phone_number: i64) -> i64 {
        let response = self
            .post(
                "/drivers",
                json!({
                    "first_name": "Luis",
                    "last_name": "Mora",
                    "phone_number": phone_number,
                    "car_type": "sedan",
                    "license_plate": 4821
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["backend"], "memory");
    assert!(response.body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ride_lifecycle_over_http() {
    let app = TestApp::new();
    let passenger_id = app.passenger(600000001).await;

    let created = app
        .post(
            "/rides",
            json!({"passenger_id": passenger_id, "origin": "A", "destination": "B"}),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["ride_id"], 1);
    assert_eq!(created.body["status"], "pending");
    assert_eq!(created.body["passenger"]["id"], passenger_id);
    assert!(created.body.get("driver").is_none());

    let driver_id = app.driver(611000001).await;
    let assigned = app.put("/rides/1/driver", json!({"driver_id": driver_id})).await;
    assert_eq!(assigned.status, StatusCode::OK);
    assert_eq!(assigned.body["ride_id"], 1);
    assert_eq!(assigned.body["driver_id"], driver_id);

    let ride = app.get("/rides/1").await;
    assert_eq!(ride.status, StatusCode::OK);
    assert_eq!(ride.body["status"], "accepted");
    assert_eq!(ride.body["driver"]["id"], driver_id);
    assert_eq!(ride.body["driver"]["car_type"], "sedan");

    let again = app.put("/rides/1/driver", json!({"driver_id": driver_id})).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["code"], "DRIVER_ALREADY_ASSIGNED_TO_RIDE");
    assert_eq!(again.body["message"], "driver already assigned to this ride");

    let other_driver = app.driver(611000002).await;
    let other = app.put("/rides/1/driver", json!({"driver_id": other_driver})).await;
    assert_eq!(other.status, StatusCode::CONFLICT);
    assert_eq!(other.body["code"], "RIDE_ALREADY_ASSIGNED");

    let completed = app.put("/rides/1/status", json!({"status": "completed"})).await;
    assert_eq!(completed.status, StatusCode::OK);
    assert_eq!(completed.body["status"], "completed");

    let reopened = app.put("/rides/1/status", json!({"status": "cancelled"})).await;
    assert_eq!(reopened.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reopened.body["message"], "cannot change completed ride");

    let ride = app.get("/rides/1").await;
    assert_eq!(ride.body["status"], "completed");
}

#[tokio::test]
async fn test_create_ride_errors() {
    let app = TestApp::new();

    let missing_passenger = app.post("/rides", json!({"origin": "A", "destination": "B"})).await;
    assert_eq!(missing_passenger.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_passenger.body["code"], "PASSENGER_ID_REQUIRED");

    let unknown_passenger = app
        .post("/rides", json!({"passenger_id": 77, "origin": "A", "destination": "B"}))
        .await;
    assert_eq!(unknown_passenger.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_passenger.body["code"], "PASSENGER_NOT_FOUND");

    let passenger_id = app.passenger(600000001).await;
    let no_destination = app
        .post("/rides", json!({"passenger_id": passenger_id, "origin": "A"}))
        .await;
    assert_eq!(no_destination.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_destination.body["code"], "DESTINATION_REQUIRED");

    let too_long = app
        .post(
            "/rides",
            json!({"passenger_id": passenger_id, "origin": "x".repeat(300), "destination": "B"}),
        )
        .await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
    assert_eq!(too_long.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/rides")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unparseable_ids_use_the_error_envelope() {
    let app = TestApp::new();

    let ride = app.get("/rides/abc").await;
    assert_eq!(ride.status, StatusCode::BAD_REQUEST);
    assert_eq!(ride.body["code"], "INVALID_PATH");
    assert_eq!(ride.body["error"], "Validation Error");
    assert!(ride.body["message"].is_string());

    let overflow = app
        .put("/rides/99999999999999999999/status", json!({"status": "completed"}))
        .await;
    assert_eq!(overflow.status, StatusCode::BAD_REQUEST);
    assert_eq!(overflow.body["code"], "INVALID_PATH");

    let passenger = app.delete("/passengers/uno").await;
    assert_eq!(passenger.status, StatusCode::BAD_REQUEST);
    assert_eq!(passenger.body["code"], "INVALID_PATH");

    let driver = app.get("/drivers/-x").await;
    assert_eq!(driver.status, StatusCode::BAD_REQUEST);
    assert_eq!(driver.body["code"], "INVALID_PATH");
}

#[tokio::test]
async fn test_update_status_errors() {
    let app = TestApp::new();

    let missing = app.put("/rides/5/status", json!({"status": "completed"})).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["code"], "RIDE_NOT_FOUND");

    let zero = app.put("/rides/0/status", json!({"status": "completed"})).await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
    assert_eq!(zero.body["code"], "RIDE_ID_REQUIRED");

    let passenger_id = app.passenger(600000001).await;
    app.post("/rides", json!({"passenger_id": passenger_id, "origin": "A", "destination": "B"}))
        .await;

    let invalid = app.put("/rides/1/status", json!({"status": "flying"})).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["code"], "INVALID_RIDE_STATUS");
}

#[tokio::test]
async fn test_driver_on_active_ride_cannot_take_another() {
    let app = TestApp::new();
    let p1 = app.passenger(600000001).await;
    let p2 = app.passenger(600000002).await;
    let driver_id = app.driver(611000001).await;

    app.post("/rides", json!({"passenger_id": p1, "origin": "A", "destination": "B"})).await;
    app.post("/rides", json!({"passenger_id": p2, "origin": "C", "destination": "D"})).await;

    let first = app.put("/rides/1/driver", json!({"driver_id": driver_id})).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.put("/rides/2/driver", json!({"driver_id": driver_id})).await;
    assert_eq!(second.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(second.body["code"], "DRIVER_ALREADY_ON_ACTIVE_RIDE");

    let missing_driver = app.put("/rides/2/driver", json!({})).await;
    assert_eq!(missing_driver.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_driver.body["code"], "DRIVER_ID_REQUIRED");
}

#[tokio::test]
async fn test_list_rides() {
    let app = TestApp::new();
    assert_eq!(app.get("/rides").await.body, json!([]));

    let passenger_id = app.passenger(600000001).await;
    for origin in ["A", "B", "C"] {
        app.post(
            "/rides",
            json!({"passenger_id": passenger_id, "origin": origin, "destination": "Z"}),
        )
        .await;
    }

    let rides = app.get("/rides").await;
    assert_eq!(rides.status, StatusCode::OK);
    let rides = rides.body.as_array().unwrap().clone();
    assert_eq!(rides.len(), 3);
    assert!(rides.iter().all(|r| r["passenger"]["id"] == passenger_id));
}

#[tokio::test]
async fn test_passenger_directory() {
    let app = TestApp::new();
    let id = app.passenger(600000001).await;

    let duplicate = app
        .post(
            "/passengers",
            json!({"first_name": "Eva", "last_name": "Sanz", "phone_number": 600000001}),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["code"], "PHONE_NUMBER_EXISTS");

    let no_last_name = app
        .post("/passengers", json!({"first_name": "Eva", "phone_number": 600000002}))
        .await;
    assert_eq!(no_last_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_last_name.body["code"], "LAST_NAME_REQUIRED");

    let found = app.get(&format!("/passengers/{}", id)).await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["phone_number"], 600000001);

    assert_eq!(app.get("/passengers").await.body.as_array().unwrap().len(), 1);

    let deleted = app.delete(&format!("/passengers/{}", id)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["id"], id);

    let gone = app.get(&format!("/passengers/{}", id)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_driver_directory() {
    let app = TestApp::new();

    let no_plate = app
        .post(
            "/drivers",
            json!({"first_name": "Luis", "last_name": "Mora", "phone_number": 611000001, "car_type": "van"}),
        )
        .await;
    assert_eq!(no_plate.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_plate.body["code"], "LICENSE_PLATE_REQUIRED");

    let id = app.driver(611000001).await;
    let found = app.get(&format!("/drivers/{}", id)).await;
    assert_eq!(found.body["is_available"], true);

    let deleted = app.delete(&format!("/drivers/{}", id)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let again = app.delete(&format!("/drivers/{}", id)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.body["code"], "DRIVER_NOT_FOUND");
}

#[tokio::test]
async fn test_ride_survives_deleted_passenger() {
    let app = TestApp::new();
    let passenger_id = app.passenger(600000001).await;
    app.post(
        "/rides",
        json!({"passenger_id": passenger_id, "origin": "A", "destination": "B"}),
    )
    .await;

    app.delete(&format!("/passengers/{}", passenger_id)).await;

    let ride = app.get("/rides/1").await;
    assert_eq!(ride.status, StatusCode::OK);
    assert!(ride.body.get("passenger").is_none());
}

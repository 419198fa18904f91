use std::io;
use std::sync::{Arc, Mutex};

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use wheel_protocol::{ControlValues, ErrorResponse};
use wheelhub::sampler::{BUTTON_COUNT, RawWheelState, WheelSampler};
use wheelhub::telemetry::TelemetrySink;
use wheelhub::{AppState, NO_DEVICE_MESSAGE, app};

/// Sampler stub: either a fixed wheel state or no device at all.
struct FixedSampler(Option<RawWheelState>);

impl WheelSampler for FixedSampler {
    fn sample(&self) -> Option<RawWheelState> {
        self.0.clone()
    }
}

/// Sink spy that records every forwarded value and optionally fails.
struct RecordingSink {
    sent: Mutex<Vec<ControlValues>>,
    fail: bool,
}

impl RecordingSink {
    fn new(fail: bool) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail,
        }
    }

    fn sent(&self) -> Vec<ControlValues> {
        self.sent.lock().unwrap().clone()
    }
}

impl TelemetrySink for RecordingSink {
    fn forward(&self, values: &ControlValues) -> io::Result<()> {
        self.sent.lock().unwrap().push(values.clone());
        if self.fail {
            Err(io::Error::other("sink forced to fail"))
        } else {
            Ok(())
        }
    }
}

fn second_gear_full_throttle() -> RawWheelState {
    let mut buttons = [false; BUTTON_COUNT];
    buttons[13] = true;
    RawWheelState {
        axis_x: 65535,
        axis_y: 0,
        buttons,
    }
}

fn setup(
    state: Option<RawWheelState>,
    fail_sink: bool,
) -> (axum::Router, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new(fail_sink));
    let sampler = Arc::new(FixedSampler(state));
    (app(AppState::new(sampler, sink.clone())), sink)
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn query_returns_mapped_values() {
    let (app, sink) = setup(Some(second_gear_full_throttle()), false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/controls")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let values: ControlValues = body_json(response).await;
    assert_eq!(
        values,
        ControlValues {
            steer: 100,
            speed: 100,
            gear: 2
        }
    );
    // Query is read-only: nothing reaches the sink.
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn query_without_device_is_not_found() {
    let (app, sink) = setup(None, false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/controls")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = body_json(response).await;
    assert_eq!(error.error, NO_DEVICE_MESSAGE);
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn push_without_device_is_not_found_and_sends_nothing() {
    let (app, sink) = setup(None, false);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/controls/send")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn push_forwards_values_once() {
    let (app, sink) = setup(Some(second_gear_full_throttle()), false);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/controls/send")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let values: ControlValues = body_json(response).await;
    let sent = sink.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], values);
}

#[tokio::test]
async fn push_still_answers_when_sink_fails() {
    let (app, sink) = setup(Some(second_gear_full_throttle()), true);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/controls/send")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // The failed send is swallowed; the caller still gets the values.
    assert_eq!(response.status(), StatusCode::OK);
    let values: ControlValues = body_json(response).await;
    assert_eq!(
        values,
        ControlValues {
            steer: 100,
            speed: 100,
            gear: 2
        }
    );
    assert_eq!(sink.sent().len(), 1);
}

#[tokio::test]
async fn healthz_answers_ok() {
    let (app, _) = setup(None, false);

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

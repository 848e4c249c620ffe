//! Exposition route handlers.
//!
//! Handlers are pure request → (status, headers, body) functions over
//! the shared [`ExpositionState`]; nothing mutates a response in place
//! across branches.

use std::io::Write;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use flate2::write::GzEncoder;
use flate2::Compression;
use http_body_util::BodyExt;
use tracing::{error, warn};

use promrelay_metrics::Gauge;

use crate::{introspect, ExpositionState, SCRAPE_PATH, SUBMIT_PATH};

/// All exposition responses are plain text.
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// POST /send-metrics: stream inbound records into the aggregator.
///
/// The sessions counter ticks on receipt, success or not. Each data
/// chunk ticks the processed counter before ingestion; the first
/// ingestion failure aborts the session and surfaces the error's status
/// (500 when it carries none). An empty body is a zero-chunk success.
pub async fn submit(State(state): State<ExpositionState>, body: Body) -> Response {
    state.counters.sessions_total.inc();

    let mut body = body;
    while let Some(frame) = body.frame().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                state.counters.bad_metrics_total.inc();
                return (StatusCode::BAD_REQUEST, format!("Bad metrics: {e}")).into_response();
            }
        };
        let Ok(chunk) = frame.into_data() else {
            continue;
        };

        state.counters.metrics_total.inc();
        if let Err(e) = state.aggregator.ingest(&chunk).await {
            if state.verbose {
                error!(error = ?e, "metric chunk ingestion failed");
            }
            state.counters.bad_metrics_total.inc();
            let status = e
                .status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, format!("Bad metrics: {e}")).into_response();
        }
    }

    (StatusCode::OK, "OK").into_response()
}

/// GET /metrics: render aggregated state plus the exporter's own gauges
/// and counters, gzip-encoded when the scraper accepts it.
pub async fn scrape(State(state): State<ExpositionState>, headers: HeaderMap) -> Response {
    let payload = assemble_payload(&state).await;

    if accepts_gzip(&headers) {
        match gzip(payload.as_bytes()) {
            Ok(compressed) => {
                return (
                    [
                        (header::CONTENT_TYPE, CONTENT_TYPE_TEXT),
                        (header::CONTENT_ENCODING, "gzip"),
                    ],
                    compressed,
                )
                    .into_response();
            }
            Err(e) => warn!(error = %e, "gzip encoding failed, serving identity"),
        }
    }

    ([(header::CONTENT_TYPE, CONTENT_TYPE_TEXT)], payload).into_response()
}

/// Fallback for every other path.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("Not found: the exporter only listens on {SCRAPE_PATH} and {SUBMIT_PATH}"),
    )
        .into_response()
}

/// Assemble the full scrape payload.
///
/// Order: working gauge, rss gauge, the three self counters, then the
/// aggregator's rendered text. Blocks are blank-line separated and the
/// payload ends with a single newline.
async fn assemble_payload(state: &ExpositionState) -> String {
    let rendered =
        match tokio::time::timeout(state.render_timeout, state.aggregator.render_text()).await {
            Ok(text) => text,
            Err(_) => {
                // The in-flight render is dropped here; its result no
                // longer matters for this scrape.
                warn!(
                    timeout_ms = state.render_timeout.as_millis() as u64,
                    "metrics text rendering timed out"
                );
                String::new()
            }
        };

    let working = Gauge::new(
        "collector_working",
        "Whether the aggregator is producing metrics text.",
        if rendered.is_empty() { 0.0 } else { 1.0 },
    );
    let rss = Gauge::new(
        "collector_rss",
        "Resident memory of the exporter process in bytes.",
        introspect::resident_set_bytes() as f64,
    );

    let mut blocks = vec![
        working.to_exposition_text(),
        rss.to_exposition_text(),
        state.counters.metrics_total.to_exposition_text(),
        state.counters.sessions_total.to_exposition_text(),
        state.counters.bad_metrics_total.to_exposition_text(),
    ];
    if !rendered.is_empty() {
        blocks.push(rendered.trim_end().to_string());
    }

    format!("{}\n", blocks.join("\n\n"))
}

/// Bare substring check; quality values and other encodings are not
/// parsed.
fn accepts_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("gzip"))
}

fn gzip(payload: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Read;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use flate2::read::GzDecoder;

    use crate::aggregator::{Aggregator, IngestError, RecordAggregator};

    /// Renders slower than any test timeout.
    struct GlacialAggregator;

    #[async_trait]
    impl Aggregator for GlacialAggregator {
        async fn ingest(&self, _: &[u8]) -> Result<(), IngestError> {
            Ok(())
        }

        async fn render_text(&self) -> String {
            tokio::time::sleep(Duration::from_secs(60)).await;
            "too late".to_string()
        }
    }

    fn test_state() -> ExpositionState {
        ExpositionState::new(
            Arc::new(RecordAggregator::new()),
            Duration::from_secs(2),
            false,
        )
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn empty_submit_is_a_zero_chunk_success() {
        let state = test_state();
        let response = submit(State(state.clone()), Body::empty()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
        assert_eq!(state.counters.sessions_total.get(), 1);
        assert_eq!(state.counters.metrics_total.get(), 0);
        assert_eq!(state.counters.bad_metrics_total.get(), 0);
    }

    #[tokio::test]
    async fn submit_ingests_and_acks() {
        let state = test_state();
        let body = Body::from(r#"{"type":"worker_pool","workers_total":8}"#);
        let response = submit(State(state.clone()), body).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.counters.metrics_total.get(), 1);
        assert_eq!(state.counters.bad_metrics_total.get(), 0);
    }

    #[tokio::test]
    async fn submit_surfaces_carried_status() {
        let state = test_state();
        let response = submit(State(state.clone()), Body::from(r#"{"no_type":1}"#)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_string(response).await.starts_with("Bad metrics:"));
        assert_eq!(state.counters.bad_metrics_total.get(), 1);
    }

    #[tokio::test]
    async fn submit_defaults_to_500_without_a_status() {
        let state = test_state();
        let response = submit(State(state.clone()), Body::from("not json")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.counters.bad_metrics_total.get(), 1);
    }

    #[tokio::test]
    async fn scrape_reports_working_when_state_renders() {
        let state = test_state();
        state
            .aggregator
            .ingest(br#"{"type":"worker_pool","workers_total":8}"#)
            .await
            .unwrap();

        let response = scrape(State(state), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let text = body_string(response).await;
        assert!(text.contains("collector_working 1"));
        assert!(text.contains("worker_pool_workers_total 8"));
        assert!(text.ends_with('\n'));
        assert!(!text.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn scrape_reports_not_working_on_empty_state() {
        let response = scrape(State(test_state()), HeaderMap::new()).await;
        let text = body_string(response).await;
        assert!(text.contains("collector_working 0"));
    }

    #[tokio::test]
    async fn render_timeout_degrades_to_not_working() {
        let state = ExpositionState::new(
            Arc::new(GlacialAggregator),
            Duration::from_millis(20),
            false,
        );

        let response = scrape(State(state), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let text = body_string(response).await;
        assert!(text.contains("collector_working 0"));
        assert!(!text.contains("too late"));
    }

    /// Drop the rss sample line: its value can drift between two scrapes
    /// taken from a live process.
    fn without_rss_sample(text: &str) -> String {
        text.lines()
            .filter(|line| !line.starts_with("collector_rss "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn gzip_scrape_matches_identity_payload() {
        let state = test_state();
        state
            .aggregator
            .ingest(br#"{"type":"worker_pool","workers_total":8}"#)
            .await
            .unwrap();

        let plain = body_string(scrape(State(state.clone()), HeaderMap::new()).await).await;

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_ENCODING, "gzip, deflate".parse().unwrap());
        let response = scrape(State(state), headers).await;
        assert_eq!(
            response.headers().get(header::CONTENT_ENCODING).unwrap(),
            "gzip"
        );

        let compressed = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let mut decoder = GzDecoder::new(&compressed[..]);
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).unwrap();

        assert_eq!(without_rss_sample(&decompressed), without_rss_sample(&plain));
        assert!(decompressed.contains("collector_rss"));
    }

    #[tokio::test]
    async fn scrape_without_gzip_has_no_content_encoding() {
        let response = scrape(State(test_state()), HeaderMap::new()).await;
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(content_type, CONTENT_TYPE_TEXT);
    }

    #[tokio::test]
    async fn not_found_names_both_routes() {
        let response = not_found().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let text = body_string(response).await;
        assert!(text.contains(SCRAPE_PATH));
        assert!(text.contains(SUBMIT_PATH));
    }
}

//! Simulated heartbeat push stream for /api/realtime.
//!
//! This is a cosmetic connected-users indicator, not a live seismic feed:
//! each connection gets its own timer and its own fake user count, and it
//! shares no state with the fetch/cache pipeline.

use std::time::Duration;

use axum::response::sse::Event;
use chrono::{SecondsFormat, Utc};
use futures::Stream;

#[derive(serde::Serialize)]
struct ConnectedFrame {
    r#type: &'static str,
    message: &'static str,
}

#[derive(serde::Serialize)]
struct HeartbeatFrame {
    r#type: &'static str,
    /// ISO-8601 UTC with milliseconds (JS `toISOString` shape).
    timestamp: String,
    #[serde(rename = "activeUsers")]
    active_users: u32,
    counter: u64,
}

struct Feed {
    ticker: Option<tokio::time::Interval>,
    counter: u64,
    base_users: u32,
    period: Duration,
}

/// Frames for one client connection: a connected frame first, then a
/// heartbeat immediately and every `period` after that. The stream is
/// unbounded; it ends when the client disconnects and the response body
/// is dropped.
pub fn heartbeat_stream(period: Duration) -> impl Stream<Item = Result<Event, axum::Error>> {
    let feed = Feed {
        ticker: None,
        counter: 0,
        base_users: rand::random_range(20..50),
        period,
    };

    futures::stream::unfold(feed, |mut feed| async move {
        let event = match feed.ticker.as_mut() {
            None => {
                // First poll: announce the connection, arm the timer.
                // The first tick of a tokio interval completes at once,
                // so the first heartbeat follows immediately.
                feed.ticker = Some(tokio::time::interval(feed.period));
                Event::default().json_data(ConnectedFrame {
                    r#type: "connected",
                    message: "Gerçek zamanlı bağlantı kuruldu",
                })
            }
            Some(ticker) => {
                ticker.tick().await;
                let frame = HeartbeatFrame {
                    r#type: "heartbeat",
                    timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    active_users: feed.base_users + rand::random_range(0..5),
                    counter: feed.counter,
                };
                feed.counter += 1;
                Event::default().json_data(frame)
            }
        };
        Some((event, feed))
    })
}

use serde_json::Value;

use crate::market::types::{FeedEvent, Tick};

/// Decode one WebSocket text frame into feed events.
///
/// Frames are JSON arrays of event objects. Any element carrying `t`
/// (epoch millis) and `bp` (bid price) becomes a tick, whichever channel
/// it arrived on; `status` events surface as control messages; everything
/// else carries nothing to aggregate and is dropped.
pub fn parse_stream_frame(raw: &str) -> Result<Vec<FeedEvent>, serde_json::Error> {
    let frame: Vec<Value> = serde_json::from_str(raw)?;

    let mut events = Vec::with_capacity(frame.len());
    for entry in frame {
        if let Some(message) = control_message(&entry) {
            events.push(FeedEvent::Control(message));
            continue;
        }

        if let Ok(tick) = serde_json::from_value::<Tick>(entry) {
            events.push(FeedEvent::Tick(tick));
        }
    }

    Ok(events)
}

fn control_message(entry: &Value) -> Option<String> {
    if entry.get("ev").and_then(Value::as_str) != Some("status") {
        return None;
    }

    let text = entry
        .get("message")
        .or_else(|| entry.get("status"))
        .and_then(Value::as_str)
        .unwrap_or("status");

    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_frame_routes_ticks_and_controls() {
        let raw = r#"[
            {"ev":"status","status":"auth_success","message":"authenticated"},
            {"ev":"Q","sym":"AAPL","t":1709392800000,"bp":187.32,"ap":187.35},
            {"ev":"AM","sym":"AAPL","o":187.0,"c":187.4,"h":187.5,"l":186.9}
        ]"#;

        let events = parse_stream_frame(raw).expect("frame should decode");
        assert_eq!(
            events,
            vec![
                FeedEvent::Control("authenticated".into()),
                FeedEvent::Tick(Tick::new(1709392800000, 187.32)),
            ]
        );
    }

    #[test]
    fn status_without_message_falls_back_to_the_status_field() {
        let raw = r#"[{"ev":"status","status":"connected"}]"#;

        let events = parse_stream_frame(raw).expect("frame should decode");
        assert_eq!(events, vec![FeedEvent::Control("connected".into())]);
    }

    #[test]
    fn events_without_a_bid_quote_are_dropped() {
        let raw = r#"[{"ev":"T","sym":"AAPL","t":1709392800000,"p":187.3,"s":100}]"#;

        let events = parse_stream_frame(raw).expect("frame should decode");
        assert!(events.is_empty());
    }

    #[test]
    fn non_array_frames_are_errors() {
        assert!(parse_stream_frame(r#"{"ev":"Q"}"#).is_err());
        assert!(parse_stream_frame("not json at all").is_err());
    }
}

// SPDX-License-Identifier: MIT

//! Inbound producer frame: `{"busId": str, "lat": f64, "lng": f64, "route": str}`.

use serde_json::Value;

use crate::error::FrameError;

/// A validated position update from a producer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerFrame {
    pub bus_id: String,
    pub lat: f64,
    pub lng: f64,
    pub route: String,
}

/// Parse and validate one producer text frame.
///
/// - `Err(FrameError::InvalidJson)`: the text was not valid JSON at all —
///   the caller must close the connection.
/// - `Ok(None)`: `busId` was missing or empty — the caller silently skips
///   the frame and keeps the connection open.
/// - `Err(FrameError::SchemaMismatch(_))`: `lat`, `lng`, or `route` was
///   missing or the wrong type — the caller must close the connection.
/// - `Ok(Some(frame))`: a fully valid frame, ready to upsert.
pub fn parse_producer_frame(text: &str) -> Result<Option<ProducerFrame>, FrameError> {
    let value: Value = serde_json::from_str(text).map_err(|_| FrameError::InvalidJson)?;
    let Value::Object(obj) = value else {
        return Err(FrameError::InvalidJson);
    };

    let bus_id = obj.get("busId").and_then(Value::as_str).unwrap_or("");
    if bus_id.is_empty() {
        return Ok(None);
    }

    let lat = obj.get("lat").and_then(Value::as_f64).ok_or(FrameError::SchemaMismatch("lat"))?;
    let lng = obj.get("lng").and_then(Value::as_f64).ok_or(FrameError::SchemaMismatch("lng"))?;
    let route =
        obj.get("route").and_then(Value::as_str).ok_or(FrameError::SchemaMismatch("route"))?;

    Ok(Some(ProducerFrame { bus_id: bus_id.to_string(), lat, lng, route: route.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_frame_parses() {
        let frame = parse_producer_frame(
            r#"{"busId":"A","lat":55.75,"lng":37.61,"route":"R1"}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(frame.bus_id, "A");
        assert_eq!(frame.lat, 55.75);
        assert_eq!(frame.lng, 37.61);
        assert_eq!(frame.route, "R1");
    }

    #[test]
    fn invalid_json_closes_connection() {
        assert_eq!(parse_producer_frame("not json"), Err(FrameError::InvalidJson));
    }

    #[test]
    fn missing_bus_id_is_skipped_not_closed() {
        assert_eq!(parse_producer_frame(r#"{"lat":1.0,"lng":2.0,"route":"R"}"#), Ok(None));
    }

    #[test]
    fn empty_bus_id_is_skipped() {
        assert_eq!(
            parse_producer_frame(r#"{"busId":"","lat":1.0,"lng":2.0,"route":"R"}"#),
            Ok(None)
        );
    }

    #[test]
    fn missing_lat_closes_connection() {
        assert_eq!(
            parse_producer_frame(r#"{"busId":"A","lng":2.0,"route":"R"}"#),
            Err(FrameError::SchemaMismatch("lat"))
        );
    }

    #[test]
    fn wrong_typed_route_closes_connection() {
        assert_eq!(
            parse_producer_frame(r#"{"busId":"A","lat":1.0,"lng":2.0,"route":42}"#),
            Err(FrameError::SchemaMismatch("route"))
        );
    }

    #[test]
    fn top_level_array_is_invalid_json() {
        assert_eq!(parse_producer_frame("[1,2,3]"), Err(FrameError::InvalidJson));
    }
}

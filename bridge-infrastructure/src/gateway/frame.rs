// Minimal engine.io / socket.io v4 text frame codec
//
// The gateway speaks socket.io over a single WebSocket. A text frame is an
// engine.io type digit, for messages followed by a socket.io type digit, an
// optional ack id, and a JSON body:
//
//   0{...}          open (handshake)
//   2 / 3           ping / pong
//   40{...}         namespace connect / connect ack
//   42[name, data]  event (push)
//   42<id>[...]     event expecting an ack
//   43<id>[data]    ack for a client emit
//   44{...}         connect error

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,
    #[error("malformed frame: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Open(Value),
    Close,
    Ping,
    Pong,
    ConnectAck(Value),
    Disconnect,
    Event { name: String, payload: Value },
    Ack { id: u64, payload: Value },
    ConnectError(Value),
    Other(String),
}

pub fn parse_frame(text: &str) -> Result<Frame, FrameError> {
    let mut chars = text.chars();
    match chars.next() {
        None => Err(FrameError::Empty),
        Some('0') => Ok(Frame::Open(parse_json_or_null(&text[1..]))),
        Some('1') => Ok(Frame::Close),
        Some('2') => Ok(Frame::Ping),
        Some('3') => Ok(Frame::Pong),
        Some('4') => parse_message(&text[1..]),
        Some(_) => Ok(Frame::Other(text.to_string())),
    }
}

fn parse_message(rest: &str) -> Result<Frame, FrameError> {
    match rest.chars().next() {
        Some('0') => Ok(Frame::ConnectAck(parse_json_or_null(&rest[1..]))),
        Some('1') => Ok(Frame::Disconnect),
        Some('2') => {
            let (_, body) = split_ack_id(&rest[1..]);
            let args = parse_args(body)?;
            let name = args
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| FrameError::Malformed(format!("event without name: {}", body)))?
                .to_string();
            let payload = args.get(1).cloned().unwrap_or(Value::Null);
            Ok(Frame::Event { name, payload })
        }
        Some('3') => {
            let (id, body) = split_ack_id(&rest[1..]);
            let id = id.ok_or_else(|| FrameError::Malformed(format!("ack without id: {}", body)))?;
            let args = parse_args(body)?;
            let payload = args.first().cloned().unwrap_or(Value::Null);
            Ok(Frame::Ack { id, payload })
        }
        Some('4') => Ok(Frame::ConnectError(parse_json_or_null(&rest[1..]))),
        _ => Ok(Frame::Other(format!("4{}", rest))),
    }
}

/// Namespace connect, optionally carrying the auth payload.
pub fn encode_connect(auth: &Value) -> String {
    if auth.is_null() {
        "40".to_string()
    } else {
        format!("40{}", auth)
    }
}

pub fn encode_pong() -> String {
    "3".to_string()
}

/// Emit expecting an ack: `42<id>["method", params]`.
pub fn encode_emit(id: u64, event: &str, params: &Value) -> String {
    let args = Value::Array(vec![Value::String(event.to_string()), params.clone()]);
    format!("42{}{}", id, args)
}

fn split_ack_id(rest: &str) -> (Option<u64>, &str) {
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return (None, rest);
    }
    (rest[..digits_end].parse().ok(), &rest[digits_end..])
}

fn parse_args(body: &str) -> Result<Vec<Value>, FrameError> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str(body) {
        Ok(Value::Array(args)) => Ok(args),
        Ok(other) => Err(FrameError::Malformed(format!(
            "expected argument array, got {}",
            other
        ))),
        Err(err) => Err(FrameError::Malformed(err.to_string())),
    }
}

fn parse_json_or_null(body: &str) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_open_packet() {
        let frame = parse_frame(r#"0{"sid":"abc","pingInterval":25000}"#).expect("frame");
        match frame {
            Frame::Open(handshake) => assert_eq!(handshake["sid"], "abc"),
            other => panic!("expected open, got {:?}", other),
        }
    }

    #[test]
    fn parses_ping_and_pong() {
        assert_eq!(parse_frame("2").expect("ping"), Frame::Ping);
        assert_eq!(parse_frame("3").expect("pong"), Frame::Pong);
    }

    #[test]
    fn parses_connect_ack() {
        let frame = parse_frame(r#"40{"sid":"xyz"}"#).expect("frame");
        match frame {
            Frame::ConnectAck(payload) => assert_eq!(payload["sid"], "xyz"),
            other => panic!("expected connect ack, got {:?}", other),
        }
    }

    #[test]
    fn parses_push_event() {
        let frame =
            parse_frame(r#"42["eventUpdate",{"deviceId":"D1","eventId":"E1"}]"#).expect("frame");
        match frame {
            Frame::Event { name, payload } => {
                assert_eq!(name, "eventUpdate");
                assert_eq!(payload["deviceId"], "D1");
            }
            other => panic!("expected event, got {:?}", other),
        }
    }

    #[test]
    fn parses_event_without_payload() {
        let frame = parse_frame(r#"42["userUpdate"]"#).expect("frame");
        match frame {
            Frame::Event { name, payload } => {
                assert_eq!(name, "userUpdate");
                assert!(payload.is_null());
            }
            other => panic!("expected event, got {:?}", other),
        }
    }

    #[test]
    fn parses_ack_with_id() {
        let frame = parse_frame(r#"437[{"deviceId":"D1"}]"#).expect("frame");
        match frame {
            Frame::Ack { id, payload } => {
                assert_eq!(id, 7);
                assert_eq!(payload["deviceId"], "D1");
            }
            other => panic!("expected ack, got {:?}", other),
        }
    }

    #[test]
    fn ack_without_id_is_malformed() {
        assert!(parse_frame(r#"43[{"deviceId":"D1"}]"#).is_err());
    }

    #[test]
    fn emit_round_trips_through_parser() {
        let encoded = encode_emit(12, "getDevice", &json!({ "deviceId": "D1" }));
        assert!(encoded.starts_with("4212["));
        // A server echoing the emit body as an event parses cleanly.
        let frame = parse_frame(&encoded).expect("frame");
        match frame {
            Frame::Event { name, payload } => {
                assert_eq!(name, "getDevice");
                assert_eq!(payload["deviceId"], "D1");
            }
            other => panic!("expected event, got {:?}", other),
        }
    }

    #[test]
    fn encodes_connect_with_and_without_auth() {
        assert_eq!(encode_connect(&Value::Null), "40");
        assert_eq!(
            encode_connect(&json!({ "token": "secret" })),
            r#"40{"token":"secret"}"#
        );
    }

    #[test]
    fn parses_connect_error() {
        let frame = parse_frame(r#"44{"message":"auth failed"}"#).expect("frame");
        match frame {
            Frame::ConnectError(payload) => assert_eq!(payload["message"], "auth failed"),
            other => panic!("expected connect error, got {:?}", other),
        }
    }
}

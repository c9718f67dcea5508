//! Device response parser
//!
//! Classifies inbound lines by their leading token. The device speaks a
//! small line protocol: acknowledgements (`ok N<seq>`), errors, busy
//! notices, telemetry JSON, status reports, and position reports.

use serde_json::Value;

/// A classified inbound line
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceResponse {
    /// `ok N<seq>`: acknowledgement of a sequenced command
    Ack {
        /// The acknowledged sequence number.
        seq: u64,
    },
    /// `err ...`: device-reported command failure
    Error {
        /// The sequence the error refers to, when parseable.
        seq: Option<u64>,
        /// The full error line.
        detail: String,
    },
    /// `busy ...`: device queue is saturated; informational
    Busy {
        /// The rest of the busy line.
        detail: String,
    },
    /// `telemetry <json>`: parsed telemetry payload
    Telemetry {
        /// The parsed JSON object.
        payload: Value,
    },
    /// `telemetry <garbage>`: payload did not parse as JSON
    MalformedTelemetry {
        /// The raw payload text.
        raw: String,
    },
    /// `status ...`: status report line
    Status {
        /// The full status line.
        line: String,
    },
    /// `pos ...`: position report; informational
    Position {
        /// The full position line.
        line: String,
    },
    /// Anything else
    Unrecognized {
        /// The raw line.
        line: String,
    },
}

/// Extract a `N<seq>` token from anywhere in a response line.
fn find_sequence(line: &str) -> Option<u64> {
    line.split_whitespace()
        .find_map(|word| word.strip_prefix('N')?.parse().ok())
}

impl DeviceResponse {
    /// Classify one inbound line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("ok") {
            if let Some(seq) = find_sequence(rest) {
                return Self::Ack { seq };
            }
            return Self::Unrecognized {
                line: line.to_string(),
            };
        }
        if line.starts_with("err") {
            return Self::Error {
                seq: find_sequence(line),
                detail: line.to_string(),
            };
        }
        if let Some(rest) = line.strip_prefix("busy") {
            return Self::Busy {
                detail: rest.trim().to_string(),
            };
        }
        if let Some(rest) = line.strip_prefix("telemetry") {
            let raw = rest.trim();
            return match serde_json::from_str::<Value>(raw) {
                Ok(payload) => Self::Telemetry { payload },
                Err(_) => Self::MalformedTelemetry {
                    raw: raw.to_string(),
                },
            };
        }
        if line.starts_with("status") {
            return Self::Status {
                line: line.to_string(),
            };
        }
        if line.starts_with("pos") {
            return Self::Position {
                line: line.to_string(),
            };
        }

        Self::Unrecognized {
            line: line.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_parsing() {
        assert_eq!(DeviceResponse::parse("ok N42"), DeviceResponse::Ack { seq: 42 });
        assert_eq!(DeviceResponse::parse("  ok N1  "), DeviceResponse::Ack { seq: 1 });
    }

    #[test]
    fn test_ack_without_sequence_is_unrecognized() {
        assert!(matches!(
            DeviceResponse::parse("ok"),
            DeviceResponse::Unrecognized { .. }
        ));
        assert!(matches!(
            DeviceResponse::parse("ok Nx"),
            DeviceResponse::Unrecognized { .. }
        ));
    }

    #[test]
    fn test_error_carries_sequence_when_present() {
        let response = DeviceResponse::parse("err N7 code=LIMIT");
        assert_eq!(
            response,
            DeviceResponse::Error {
                seq: Some(7),
                detail: "err N7 code=LIMIT".to_string(),
            }
        );
        assert!(matches!(
            DeviceResponse::parse("err something"),
            DeviceResponse::Error { seq: None, .. }
        ));
    }

    #[test]
    fn test_telemetry_json() {
        let response = DeviceResponse::parse(r#"telemetry {"pos":{"x":1.5},"q":3}"#);
        match response {
            DeviceResponse::Telemetry { payload } => {
                assert_eq!(payload["q"], 3);
                assert_eq!(payload["pos"]["x"], 1.5);
            }
            other => panic!("expected telemetry, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_telemetry_is_contained() {
        assert!(matches!(
            DeviceResponse::parse("telemetry {not json"),
            DeviceResponse::MalformedTelemetry { .. }
        ));
    }

    #[test]
    fn test_status_busy_pos() {
        assert!(matches!(
            DeviceResponse::parse("status state=READY q=0"),
            DeviceResponse::Status { .. }
        ));
        assert!(matches!(
            DeviceResponse::parse("busy q=32 state=PLOTTING"),
            DeviceResponse::Busy { .. }
        ));
        assert!(matches!(
            DeviceResponse::parse("pos X:10.00 Y:20.00"),
            DeviceResponse::Position { .. }
        ));
    }
}

//! Error types for renderer discovery and control.

use std::fmt;
use thiserror::Error;

/// UPnP fault detail carried inside a SOAP error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpnpFault {
    pub code: Option<u32>,
    pub description: String,
}

impl fmt::Display for UpnpFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "UPnP error {} ({})", code, self.description),
            None => write!(f, "UPnP fault ({})", self.description),
        }
    }
}

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("SOAP parse error: {0}")]
    SoapParse(#[from] xmltree::ParseError),

    #[error("SOAP serialization error: {0}")]
    SoapWrite(#[from] xmltree::Error),

    #[error("missing SOAP Envelope")]
    MissingEnvelope,

    #[error("missing SOAP Body")]
    MissingBody,

    #[error("missing required device element: {0}")]
    MissingField(&'static str),

    #[error("unexpected SOAP response: {0}")]
    UnexpectedResponse(String),

    #[error("{action} failed with HTTP status {status}{}", .fault.as_ref().map(|f| format!(": {f}")).unwrap_or_default())]
    ActionFailed {
        action: &'static str,
        status: ureq::http::StatusCode,
        fault: Option<UpnpFault>,
    },

    #[error("renderer does not expose {0}")]
    MissingCapability(&'static str),
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, ControlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_failure_mentions_the_fault() {
        let err = ControlError::ActionFailed {
            action: "SetVolume",
            status: ureq::http::StatusCode::INTERNAL_SERVER_ERROR,
            fault: Some(UpnpFault {
                code: Some(501),
                description: "Action Failed".to_string(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("SetVolume"));
        assert!(msg.contains("UPnP error 501"));
    }

    #[test]
    fn action_failure_without_fault_reads_cleanly() {
        let err = ControlError::ActionFailed {
            action: "Play",
            status: ureq::http::StatusCode::BAD_GATEWAY,
            fault: None,
        };
        assert_eq!(err.to_string(), "Play failed with HTTP status 502 Bad Gateway");
    }
}

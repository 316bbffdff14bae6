//! AVTransport service client (transport control).

use crate::description::ServiceEndpoint;
use crate::error::Result;
use crate::soap_client::{handle_action_response, invoke_action};

#[derive(Debug, Clone)]
pub struct AvTransportClient {
    pub control_url: String,
    pub service_type: String,
}

impl AvTransportClient {
    pub fn new(control_url: String, service_type: String) -> Self {
        Self {
            control_url,
            service_type,
        }
    }

    pub fn from_endpoint(endpoint: &ServiceEndpoint) -> Self {
        Self::new(endpoint.control_url.clone(), endpoint.service_type.clone())
    }

    /// Point the renderer at a new URI, with DIDL-Lite metadata.
    pub fn set_av_transport_uri(&self, instance_id: u32, uri: &str, metadata: &str) -> Result<()> {
        let instance = instance_id.to_string();
        let args = [
            ("InstanceID", instance.as_str()),
            ("CurrentURI", uri),
            ("CurrentURIMetaData", metadata),
        ];
        let result = invoke_action(
            &self.control_url,
            &self.service_type,
            "SetAVTransportURI",
            &args,
        )?;
        handle_action_response("SetAVTransportURI", &result)
    }

    /// Start playback of the current URI. `speed` is "1" for normal play.
    pub fn play(&self, instance_id: u32, speed: &str) -> Result<()> {
        let instance = instance_id.to_string();
        let args = [("InstanceID", instance.as_str()), ("Speed", speed)];
        let result = invoke_action(&self.control_url, &self.service_type, "Play", &args)?;
        handle_action_response("Play", &result)
    }

    pub fn stop(&self, instance_id: u32) -> Result<()> {
        let instance = instance_id.to_string();
        let args = [("InstanceID", instance.as_str())];
        let result = invoke_action(&self.control_url, &self.service_type, "Stop", &args)?;
        handle_action_response("Stop", &result)
    }
}

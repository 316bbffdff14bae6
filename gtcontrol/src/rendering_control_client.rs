//! RenderingControl service client (volume).

use crate::description::ServiceEndpoint;
use crate::error::{ControlError, Result};
use crate::soap_client::{
    SoapEnvelope, ensure_success, extract_child_text, find_child_with_suffix, invoke_action,
};

/// The channel UPnP volume actions address by default.
pub const DEFAULT_CHANNEL: &str = "Master";

#[derive(Debug, Clone)]
pub struct RenderingControlClient {
    pub control_url: String,
    pub service_type: String,
}

impl RenderingControlClient {
    pub fn new(control_url: String, service_type: String) -> Self {
        Self {
            control_url,
            service_type,
        }
    }

    pub fn from_endpoint(endpoint: &ServiceEndpoint) -> Self {
        Self::new(endpoint.control_url.clone(), endpoint.service_type.clone())
    }

    pub fn set_volume(&self, instance_id: u32, channel: &str, volume: u32) -> Result<()> {
        let instance = instance_id.to_string();
        let desired = volume.to_string();
        let args = [
            ("InstanceID", instance.as_str()),
            ("Channel", channel),
            ("DesiredVolume", desired.as_str()),
        ];
        let result = invoke_action(&self.control_url, &self.service_type, "SetVolume", &args)?;
        ensure_success("SetVolume", &result)
    }

    pub fn get_volume(&self, instance_id: u32, channel: &str) -> Result<u32> {
        let instance = instance_id.to_string();
        let args = [("InstanceID", instance.as_str()), ("Channel", channel)];
        let result = invoke_action(&self.control_url, &self.service_type, "GetVolume", &args)?;
        ensure_success("GetVolume", &result)?;

        let envelope = result.envelope.as_ref().ok_or(ControlError::MissingEnvelope)?;
        parse_volume(envelope)
    }
}

fn parse_volume(envelope: &SoapEnvelope) -> Result<u32> {
    let response = find_child_with_suffix(&envelope.body, "GetVolumeResponse").ok_or_else(|| {
        ControlError::UnexpectedResponse("missing GetVolumeResponse element".to_string())
    })?;

    let text = extract_child_text(response, "CurrentVolume")?;
    text.parse::<u32>().map_err(|_| {
        ControlError::UnexpectedResponse(format!("CurrentVolume is not a number: {text}"))
    })
}

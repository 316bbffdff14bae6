//! UPnP device description fetching and parsing.
//!
//! Streams `description.xml` with quick-xml instead of building a DOM:
//! descriptions from real devices run to tens of kilobytes of mostly
//! irrelevant service detail and we only need a handful of fields.

use crate::error::{ControlError, Result};
use quick_xml::{Error as XmlError, Reader, events::Event};
use std::io::{BufReader, Read};
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

const AVTRANSPORT_PREFIX: &str = "urn:schemas-upnp-org:service:avtransport:";
const RENDERING_CONTROL_PREFIX: &str = "urn:schemas-upnp-org:service:renderingcontrol:";

/// A control endpoint extracted from a device description, with the
/// control URL already resolved against the description location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub service_type: String,
    pub control_url: String,
}

/// Control capabilities a renderer advertises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererCapabilities {
    pub transport_control: bool,
    pub volume_control: bool,
}

/// The parts of a device description a control point needs.
#[derive(Debug, Default)]
pub struct DeviceDescription {
    location: String,
    udn: Option<String>,
    device_type: Option<String>,
    friendly_name: Option<String>,
    manufacturer: Option<String>,
    model_name: Option<String>,
    av_transport: Option<ServiceEndpoint>,
    rendering_control: Option<ServiceEndpoint>,
}

impl DeviceDescription {
    /// Fetch and parse the description document at `location`.
    pub fn fetch(location: &str, timeout: Duration) -> Result<Self> {
        debug!("Fetching device description at {}", location);

        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        let agent: Agent = config.into();

        let response = agent.get(location).call()?;
        let (_parts, body) = response.into_parts();

        Self::parse(location, body.into_reader())
    }

    /// Parse a description document. Control URLs are resolved against
    /// `location` as they are found.
    pub fn parse<R: Read>(location: &str, body: R) -> Result<Self> {
        let mut reader = Reader::from_reader(BufReader::new(body));
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut parsed = DeviceDescription {
            location: location.to_string(),
            ..Default::default()
        };

        let mut in_device = false;
        let mut in_service = false;
        let mut current_tag: Option<String> = None;
        let mut current_service_type: Option<String> = None;
        let mut current_control_url: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "device" => {
                            in_device = true;
                            current_tag = None;
                        }
                        "service" => {
                            if in_device {
                                in_service = true;
                                current_tag = None;
                                current_service_type = None;
                                current_control_url = None;
                            }
                        }
                        _ => {
                            if in_device {
                                current_tag = Some(name);
                            }
                        }
                    }
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "device" => {
                            in_device = false;
                        }
                        "service" => {
                            if in_device && in_service {
                                if let (Some(st), Some(ctrl)) =
                                    (&current_service_type, &current_control_url)
                                {
                                    parsed.capture_service(st, ctrl);
                                }
                                in_service = false;
                                current_service_type = None;
                                current_control_url = None;
                            }
                        }
                        _ => {}
                    }
                    current_tag = None;
                }
                Event::Text(e) => {
                    if in_device {
                        if let Some(tag) = &current_tag {
                            let text = e.decode().map_err(XmlError::Encoding)?.into_owned();
                            match tag.as_str() {
                                "UDN" => {
                                    parsed.udn.get_or_insert(text);
                                }
                                "deviceType" => {
                                    parsed.device_type.get_or_insert(text);
                                }
                                "friendlyName" => {
                                    parsed.friendly_name.get_or_insert(text);
                                }
                                "manufacturer" => {
                                    parsed.manufacturer.get_or_insert(text);
                                }
                                "modelName" => {
                                    parsed.model_name.get_or_insert(text);
                                }
                                "serviceType" if in_service => {
                                    current_service_type = Some(text);
                                }
                                "controlURL" if in_service => {
                                    current_control_url = Some(text);
                                }
                                _ => {}
                            }
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }

            buf.clear();
        }

        parsed.require_fields()
    }

    // First matching service wins; embedded devices rarely improve on
    // the root device's endpoints.
    fn capture_service(&mut self, service_type: &str, control_url: &str) {
        let lower = service_type.to_ascii_lowercase();
        let is_transport = lower.contains(AVTRANSPORT_PREFIX);
        let is_rendering = lower.contains(RENDERING_CONTROL_PREFIX);
        if !is_transport && !is_rendering {
            return;
        }

        let endpoint = ServiceEndpoint {
            service_type: service_type.to_string(),
            control_url: resolve_control_url(&self.location, control_url),
        };

        if is_transport && self.av_transport.is_none() {
            debug!(
                "Found AVTransport: type={} controlURL={}",
                endpoint.service_type, endpoint.control_url
            );
            self.av_transport = Some(endpoint);
        } else if is_rendering && self.rendering_control.is_none() {
            debug!(
                "Found RenderingControl: type={} controlURL={}",
                endpoint.service_type, endpoint.control_url
            );
            self.rendering_control = Some(endpoint);
        }
    }

    fn require_fields(self) -> Result<Self> {
        if self.friendly_name.is_none() {
            return Err(ControlError::MissingField("friendlyName"));
        }
        Ok(self)
    }

    pub fn location(&self) -> &str {
        &self.location
    }
    pub fn udn(&self) -> Option<&str> {
        self.udn.as_deref()
    }
    pub fn device_type(&self) -> Option<&str> {
        self.device_type.as_deref()
    }
    pub fn friendly_name(&self) -> &str {
        self.friendly_name.as_deref().unwrap_or_default()
    }
    pub fn manufacturer(&self) -> Option<&str> {
        self.manufacturer.as_deref()
    }
    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }
    pub fn av_transport(&self) -> Option<&ServiceEndpoint> {
        self.av_transport.as_ref()
    }
    pub fn rendering_control(&self) -> Option<&ServiceEndpoint> {
        self.rendering_control.as_ref()
    }

    pub fn capabilities(&self) -> RendererCapabilities {
        RendererCapabilities {
            transport_control: self.av_transport.is_some(),
            volume_control: self.rendering_control.is_some(),
        }
    }
}

/// Resolve a controlURL from a description against the description's
/// own location. Absolute URLs pass through untouched.
pub fn resolve_control_url(description_url: &str, control_url: &str) -> String {
    if control_url.starts_with("http://") || control_url.starts_with("https://") {
        return control_url.to_string();
    }

    // Extract "scheme://host[:port]" from the description URL
    if let Some((scheme, rest)) = description_url.split_once("://") {
        let authority = match rest.find('/') {
            Some(pos) => &rest[..pos],
            None => rest,
        };
        if !authority.is_empty() {
            if control_url.starts_with('/') {
                return format!("{}://{}{}", scheme, authority, control_url);
            }
            return format!("{}://{}/{}", scheme, authority, control_url);
        }
    }

    // Fallback: return the raw control URL if the location is unusable
    control_url.to_string()
}

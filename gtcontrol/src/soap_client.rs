//! SOAP transport for UPnP control actions.

use crate::error::{ControlError, Result, UpnpFault};
use std::io::BufReader;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;
use xmltree::{Element, EmitterConfig, XMLNode};

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SOAP_ENCODING_NS: &str = "http://schemas.xmlsoap.org/soap/encoding/";
const SOAP_TIMEOUT_SECS: u64 = 10;

/// A parsed SOAP envelope: optional header, mandatory body.
#[derive(Debug, Clone)]
pub struct SoapEnvelope {
    pub header: Option<Element>,
    pub body: Element,
}

/// Result of a SOAP call:
/// - HTTP status code
/// - raw XML body (always)
/// - parsed SOAP envelope if parsing succeeded
pub struct SoapCallResult {
    pub status: ureq::http::StatusCode,
    pub raw_body: String,
    pub envelope: Option<SoapEnvelope>,
}

/// Build the XML request document for a UPnP action.
pub fn build_action_request(
    service_type: &str,
    action: &str,
    args: &[(&str, &str)],
) -> Result<String> {
    let request_name = format!("u:{}", action);
    let mut request_elem = Element::new(&request_name);
    request_elem
        .attributes
        .insert("xmlns:u".to_string(), service_type.to_string());

    for (name, value) in args {
        let mut child = Element::new(name);
        child.children.push(XMLNode::Text((*value).to_string()));
        request_elem.children.push(XMLNode::Element(child));
    }

    let mut body = Element::new("s:Body");
    body.children.push(XMLNode::Element(request_elem));

    let mut envelope = Element::new("s:Envelope");
    envelope
        .attributes
        .insert("xmlns:s".to_string(), SOAP_ENVELOPE_NS.to_string());
    envelope
        .attributes
        .insert("s:encodingStyle".to_string(), SOAP_ENCODING_NS.to_string());
    envelope.children.push(XMLNode::Element(body));

    let mut buf = Vec::new();
    let config = EmitterConfig::new()
        .write_document_declaration(true)
        .perform_indent(true)
        .indent_string("  ");
    envelope.write_with_config(&mut buf, config)?;

    Ok(String::from_utf8(buf).unwrap())
}

/// Parse a SOAP envelope. Element names are matched by suffix because
/// devices use assorted namespace prefixes.
pub fn parse_envelope(xml: &[u8]) -> Result<SoapEnvelope> {
    let reader = BufReader::new(xml);
    let root = Element::parse(reader)?;

    if !root.name.ends_with("Envelope") {
        return Err(ControlError::MissingEnvelope);
    }

    let header = root
        .children
        .iter()
        .find_map(|n| n.as_element().filter(|e| e.name.ends_with("Header")))
        .cloned();

    let body = root
        .get_child("Body")
        .or_else(|| {
            root.children
                .iter()
                .find_map(|n| n.as_element().filter(|e| e.name.ends_with("Body")))
        })
        .ok_or(ControlError::MissingBody)?
        .clone();

    Ok(SoapEnvelope { header, body })
}

/// Invoke a UPnP SOAP action on a control URL.
///
/// 4xx/5xx statuses are not treated as transport errors: SOAP faults
/// arrive as HTTP 500 with a body we still need to read.
pub fn invoke_action(
    control_url: &str,
    service_type: &str,
    action: &str,
    args: &[(&str, &str)],
) -> Result<SoapCallResult> {
    let body_xml = build_action_request(service_type, action, args)?;

    let config = Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(Duration::from_secs(SOAP_TIMEOUT_SECS)))
        .build();
    let agent: Agent = config.into();

    // SOAPAction header: "urn:service#Action"
    let soap_action_header = format!(r#""{}#{}""#, service_type, action);

    debug!("SOAP {} -> {}", action, control_url);
    let mut response = agent
        .post(control_url)
        .header("Content-Type", r#"text/xml; charset="utf-8""#)
        .header("SOAPAction", &soap_action_header)
        .send(body_xml)?;

    let status = response.status();
    let raw_body = response.body_mut().read_to_string()?;

    // A body that is not valid SOAP still yields status + raw text.
    let envelope = parse_envelope(raw_body.as_bytes()).ok();

    Ok(SoapCallResult {
        status,
        raw_body,
        envelope,
    })
}

/// Map a non-success SOAP call to [`ControlError::ActionFailed`],
/// attaching the UPnP fault detail when the body carries one.
pub(crate) fn ensure_success(action: &'static str, result: &SoapCallResult) -> Result<()> {
    if result.status.is_success() {
        return Ok(());
    }
    let fault = result.envelope.as_ref().and_then(parse_upnp_fault);
    Err(ControlError::ActionFailed {
        action,
        status: result.status,
        fault,
    })
}

/// Check status and body: some renderers answer HTTP 200 yet embed a
/// fault in the envelope.
pub(crate) fn handle_action_response(action: &'static str, result: &SoapCallResult) -> Result<()> {
    ensure_success(action, result)?;

    if let Some(fault) = result.envelope.as_ref().and_then(parse_upnp_fault) {
        return Err(ControlError::ActionFailed {
            action,
            status: result.status,
            fault: Some(fault),
        });
    }
    Ok(())
}

/// Extract `Fault/detail/UPnPError` from a SOAP body, if present.
pub(crate) fn parse_upnp_fault(envelope: &SoapEnvelope) -> Option<UpnpFault> {
    let fault = find_child_with_suffix(&envelope.body, "Fault")?;
    let detail = find_child_with_suffix(fault, "detail")?;
    let upnp_error = find_child_with_suffix(detail, "UPnPError")?;

    let code = find_child_with_suffix(upnp_error, "errorCode")
        .and_then(|e| e.get_text())
        .and_then(|t| t.trim().parse::<u32>().ok());

    let description = find_child_with_suffix(upnp_error, "errorDescription")
        .and_then(|e| e.get_text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    Some(UpnpFault { code, description })
}

pub(crate) fn find_child_with_suffix<'a>(parent: &'a Element, suffix: &str) -> Option<&'a Element> {
    parent.children.iter().find_map(|node| match node {
        XMLNode::Element(elem) if elem.name.ends_with(suffix) => Some(elem),
        _ => None,
    })
}

pub(crate) fn extract_child_text(parent: &Element, suffix: &str) -> Result<String> {
    let child = find_child_with_suffix(parent, suffix).ok_or_else(|| {
        ControlError::UnexpectedResponse(format!("missing {suffix} element"))
    })?;

    child
        .get_text()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ControlError::UnexpectedResponse(format!("{suffix} element has no text")))
}

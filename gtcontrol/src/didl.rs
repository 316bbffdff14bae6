//! DIDL-Lite metadata for radio streams.

/// Build the DIDL-Lite document announcing an audio broadcast.
///
/// Renderers display the title and use the `res` entry to fetch the
/// stream; `audioBroadcast` tells them not to expect a finite duration.
pub fn broadcast_metadata(title: &str, stream_url: &str) -> String {
    let title = escape_text(title);
    let url = escape_url(stream_url);
    format!(
        r#"<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/">
  <item id="0" parentID="0" restricted="1">
    <dc:title>{title}</dc:title>
    <upnp:class>object.item.audioItem.audioBroadcast</upnp:class>
    <res protocolInfo="http-get:*:audio/mpeg:*">{url}</res>
  </item>
</DIDL-Lite>"#
    )
}

// '&' must be replaced first, the other entities introduce it.
fn escape_text(value: &str) -> String {
    value.replace('&', "&amp;").replace('<', "&lt;")
}

fn escape_url(value: &str) -> String {
    value.replace('&', "&amp;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmltree::Element;

    #[test]
    fn titles_and_urls_are_escaped() {
        let xml = broadcast_metadata("Jazz & Blues <FM>", "http://host/stream?a=1&b=2");
        assert!(xml.contains("<dc:title>Jazz &amp; Blues &lt;FM></dc:title>"));
        assert!(xml.contains(">http://host/stream?a=1&amp;b=2</res>"));
    }

    #[test]
    fn metadata_is_well_formed_xml() {
        let xml = broadcast_metadata("Jazz & Blues <FM>", "http://host/stream?a=1&b=2");
        let root = Element::parse(xml.as_bytes()).unwrap();

        let item = root.get_child("item").unwrap();
        assert_eq!(item.attributes.get("restricted").map(String::as_str), Some("1"));

        let title = item.get_child("title").unwrap().get_text().unwrap();
        assert_eq!(title, "Jazz & Blues <FM>");

        let res = item.get_child("res").unwrap();
        assert_eq!(
            res.attributes.get("protocolInfo").map(String::as_str),
            Some("http-get:*:audio/mpeg:*")
        );
        assert_eq!(res.get_text().unwrap(), "http://host/stream?a=1&b=2");
    }

    #[test]
    fn class_marks_an_audio_broadcast() {
        let xml = broadcast_metadata("Any", "http://host/s.mp3");
        assert!(xml.contains("<upnp:class>object.item.audioItem.audioBroadcast</upnp:class>"));
    }
}

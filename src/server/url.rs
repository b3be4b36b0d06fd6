//! URLs for the local server and the profiler's `from-url` entry point.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::net::SocketAddr;

// Everything but unreserved characters gets escaped, `/` and `:` included,
// since the local URL is embedded as a single path segment.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// URL the browser should use to reach a server bound to `addr`
pub fn local_url(addr: SocketAddr) -> String {
    let ip = addr.ip();
    if ip.is_loopback() || ip.is_unspecified() {
        format!("http://localhost:{}", addr.port())
    } else {
        format!("http://{}", addr)
    }
}

/// `<origin>/from-url/<local_url>?name=<display_name>`
pub fn visualizer_url(origin: &str, local_url: &str, display_name: &str) -> String {
    format!(
        "{}/from-url/{}?name={}",
        origin.trim_end_matches('/'),
        encode_component(local_url),
        encode_component(display_name)
    )
}

/// Name shown for the profile: the arguments joined by spaces
pub fn display_name<S: AsRef<str>>(command: &[S]) -> String {
    command
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    #[test]
    fn test_encode_component_escapes_reserved() {
        assert_eq!(
            encode_component("http://localhost:8000"),
            "http%3A%2F%2Flocalhost%3A8000"
        );
        assert_eq!(encode_component("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(encode_component("brew upgrade"), "brew%20upgrade");
    }

    #[test]
    fn test_local_url() {
        assert_eq!(
            local_url("127.0.0.1:4242".parse().unwrap()),
            "http://localhost:4242"
        );
        assert_eq!(local_url("0.0.0.0:80".parse().unwrap()), "http://localhost:80");
        assert_eq!(
            local_url("192.168.1.5:9000".parse().unwrap()),
            "http://192.168.1.5:9000"
        );
        assert_eq!(local_url("[::1]:7000".parse().unwrap()), "http://localhost:7000");
    }

    #[test]
    fn test_visualizer_url() {
        let url = visualizer_url(
            "https://profiler.firefox.com/",
            "http://localhost:4242",
            "echo hi",
        );
        assert_eq!(
            url,
            "https://profiler.firefox.com/from-url/http%3A%2F%2Flocalhost%3A4242?name=echo%20hi"
        );
    }

    #[test]
    fn test_display_name_round_trips() {
        let name = display_name(&["echo", "hi"]);
        let encoded = encode_component(&name);
        let decoded = percent_decode_str(&encoded).decode_utf8().unwrap();

        assert_eq!(decoded, "echo hi");
    }
}

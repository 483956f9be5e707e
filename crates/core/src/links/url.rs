//! Stream URL construction and host resolution.

use crate::config::ServerConfig;
use crate::torrent::TorrentId;

/// Resolve the host clients should dial for streams.
///
/// Precedence: configured public address, then the bind address unless it
/// is a wildcard, then the first routable interface address (IPv4
/// preferred), then loopback.
pub fn resolve_stream_host(config: &ServerConfig) -> String {
    if let Some(public) = config
        .public_host
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
    {
        return public.to_string();
    }

    if let Some(host) = config.host {
        if !host.is_unspecified() {
            return host.to_string();
        }
    }

    match local_ip_address::local_ip().or_else(|_| local_ip_address::local_ipv6()) {
        Ok(ip) => ip.to_string(),
        Err(e) => {
            tracing::debug!("no routable interface address: {}", e);
            "127.0.0.1".to_string()
        }
    }
}

/// Base URL (`http://host:port`) for stream links, bracketing IPv6 hosts.
pub fn stream_base_url(config: &ServerConfig) -> String {
    let host = resolve_stream_host(config);
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{}]:{}", host, config.port)
    } else {
        format!("http://{}:{}", host, config.port)
    }
}

/// Build the stream URL written into a link file.
pub fn build_stream_url(base_url: &str, id: &TorrentId, path: &str, index: u32) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    let escaped = urlencoding::encode(name);
    format!("{base_url}/stream/{escaped}?link={id}&index={index}&play")
}

//! A throwaway HTTP server that hands out one document and then stops.
//!
//! Every request is answered `200` with the JSON content type and a
//! permissive CORS header, whatever its method or path. Only `GET` gets a
//! body. After the first request the listener is closed, so later
//! connections are refused.

use super::url::local_url;
use crate::profile::Profile;
use crate::utils::config::MAX_REQUEST_HEAD_BYTES;
use crate::utils::error::ServeError;
use log::{debug, error, info};
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Bound and waiting for the one request
    Listening,
    /// A request was handled and the listener is gone
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Head,
    Other(String),
}

impl RequestMethod {
    /// Parse the method token from a request head
    pub fn from_head(head: &[u8]) -> Self {
        let method = head
            .split(|&b| b == b' ' || b == b'\r' || b == b'\n')
            .next()
            .unwrap_or_default();

        match method {
            b"GET" => RequestMethod::Get,
            b"HEAD" => RequestMethod::Head,
            other => RequestMethod::Other(String::from_utf8_lossy(other).into_owned()),
        }
    }
}

pub struct OneShotServer {
    listener: Option<TcpListener>,
    addr: SocketAddr,
    body: Vec<u8>,
}

impl OneShotServer {
    /// Serialize `profile` and bind an OS-assigned port on `host`
    ///
    /// # Errors
    /// * `ServeError::Serialize` - the profile could not be encoded
    /// * `ServeError::Bind` / `ServeError::LocalAddr` - no port could be bound
    pub fn bind(profile: &Profile, host: &str) -> Result<Self, ServeError> {
        let body = serde_json::to_vec(profile)?;
        Self::bind_bytes(body, host)
    }

    /// Bind a server that will hand out `body` as-is
    pub fn bind_bytes(body: Vec<u8>, host: &str) -> Result<Self, ServeError> {
        let listener = TcpListener::bind((host, 0)).map_err(|source| ServeError::Bind {
            host: host.to_string(),
            source,
        })?;
        let addr = listener.local_addr().map_err(ServeError::LocalAddr)?;

        info!("Serving profile ({} bytes) on {}", body.len(), addr);

        Ok(Self {
            listener: Some(listener),
            addr,
            body,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// URL a browser on this machine should fetch
    pub fn local_url(&self) -> String {
        local_url(self.addr)
    }

    pub fn state(&self) -> ServerState {
        if self.listener.is_some() {
            ServerState::Listening
        } else {
            ServerState::Stopped
        }
    }

    /// Block until the request is served
    pub fn serve(mut self) -> Result<(), ServeError> {
        while self.state() == ServerState::Listening {
            self.handle_request()?;
        }
        Ok(())
    }

    /// Accept one connection and answer it.
    ///
    /// A connection that closes before sending anything is not a request and
    /// leaves the server listening. Anything else is answered and stops the
    /// server, even if writing the response fails.
    pub fn handle_request(&mut self) -> Result<ServerState, ServeError> {
        let Some(listener) = self.listener.as_ref() else {
            return Ok(ServerState::Stopped);
        };

        let (mut stream, peer) = listener.accept().map_err(ServeError::Accept)?;

        let head = match read_request_head(&mut stream) {
            Ok(head) if head.is_empty() => {
                debug!("Connection from {} closed without a request", peer);
                return Ok(ServerState::Listening);
            }
            Ok(head) => head,
            Err(e) => {
                debug!("Failed to read request from {}: {}", peer, e);
                Vec::new()
            }
        };

        // Stop listening before answering so nothing else can get in
        self.listener = None;

        let method = RequestMethod::from_head(&head);
        let send_body = method == RequestMethod::Get;

        match write_response(&mut stream, &self.body, send_body) {
            Ok(()) => debug!(
                "Answered {:?} from {} ({} body bytes)",
                method,
                peer,
                if send_body { self.body.len() } else { 0 }
            ),
            Err(e) => error!("Failed to serve the profile to {}: {}", peer, e),
        }
        let _ = stream.shutdown(Shutdown::Write);

        Ok(ServerState::Stopped)
    }
}

/// Read until the end of the request head, EOF, or the size cap
fn read_request_head(stream: &mut TcpStream) -> io::Result<Vec<u8>> {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];

    while head.len() < MAX_REQUEST_HEAD_BYTES {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    Ok(head)
}

/// Write the fixed `200` response, with `body` only if `send_body`
pub fn write_response<W: Write>(out: &mut W, body: &[u8], send_body: bool) -> io::Result<()> {
    write!(
        out,
        "HTTP/1.1 200 OK\r\n\
         Content-Type: application/json\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        body.len()
    )?;
    if send_body {
        out.write_all(body)?;
    }
    out.flush()
}

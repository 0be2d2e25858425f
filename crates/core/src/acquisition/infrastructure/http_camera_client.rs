use std::time::Duration;

use crate::acquisition::domain::camera_client::CameraClient;
use crate::shared::constants::CAMERA_FETCH_TIMEOUT;

/// Pulls snapshots from an IP camera's HTTP still-image endpoint.
pub struct HttpCameraClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpCameraClient {
    pub fn new(endpoint: &str) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, CAMERA_FETCH_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl CameraClient for HttpCameraClient {
    fn fetch_snapshot(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()?
            .error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves exactly one canned HTTP response on a loopback port.
    fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
            }
        });
        format!("http://{addr}/snapshot.jpg")
    }

    #[test]
    fn test_fetch_returns_body_on_success() {
        let url = serve_once("200 OK", b"image-bytes".to_vec());
        let client = HttpCameraClient::new(&url).unwrap();
        assert_eq!(client.fetch_snapshot().unwrap(), b"image-bytes");
    }

    #[test]
    fn test_fetch_non_2xx_is_error() {
        let url = serve_once("503 Service Unavailable", b"busy".to_vec());
        let client = HttpCameraClient::new(&url).unwrap();
        assert!(client.fetch_snapshot().is_err());
    }

    #[test]
    fn test_fetch_unreachable_host_is_error() {
        let client =
            HttpCameraClient::new("http://invalid.nonexistent.example.com/snapshot.jpg").unwrap();
        assert!(client.fetch_snapshot().is_err());
    }

    #[test]
    fn test_describe_is_endpoint() {
        let client = HttpCameraClient::new("http://camera.local/still").unwrap();
        assert_eq!(client.describe(), "http://camera.local/still");
    }
}

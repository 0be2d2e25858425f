/// Fetches the raw bytes of the camera's current snapshot.
///
/// Any failure (transport, non-2xx status, timeout) is an error; callers do
/// not distinguish between them.
pub trait CameraClient: Send {
    fn fetch_snapshot(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Human-readable identification of the endpoint for logs.
    fn describe(&self) -> String;
}

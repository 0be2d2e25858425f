pub mod fallback_image_source;
pub mod http_camera_client;

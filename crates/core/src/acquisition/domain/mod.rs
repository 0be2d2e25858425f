pub mod camera_client;
pub mod image_source;

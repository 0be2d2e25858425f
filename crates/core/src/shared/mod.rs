pub mod bounding_box;
pub mod clock;
pub mod constants;
pub mod frame;
pub mod image_files;
pub mod model_resolver;

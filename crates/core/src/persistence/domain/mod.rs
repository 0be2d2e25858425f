pub mod artifact_name;
pub mod artifact_persister;
pub mod frame_annotator;
pub mod image_writer;

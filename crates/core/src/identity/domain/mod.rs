pub mod face_encoder;
pub mod identity_encoding;
pub mod known_identity_set;

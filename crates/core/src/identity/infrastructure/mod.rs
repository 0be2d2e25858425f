pub mod arcface_encoder;
pub mod face_registry;
pub mod known_identity_loader;

pub mod detection;
pub mod detector;
pub mod face_locator;
pub mod face_recognition_detector;
pub mod object_detector;
pub mod person_detector;

pub mod acquisition;
pub mod alerting;
pub mod detection;
pub mod identity;
pub mod persistence;
pub mod pipeline;
pub mod shared;

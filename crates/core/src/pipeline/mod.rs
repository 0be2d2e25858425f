pub mod check_camera_use_case;
pub mod monitor_config;
pub mod monitor_loop;
pub mod scheduler;

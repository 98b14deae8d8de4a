pub mod app_state;
pub mod cookies;
pub mod session_layer;

pub mod interactive_controller;
pub mod optimize_controller;
pub mod system_controller;

pub mod command_sink;
pub mod frame_source;

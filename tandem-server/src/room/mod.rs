mod room_command;
mod room_manager;
mod room_table;

pub use room_command::*;
pub use room_manager::*;
pub use room_table::*;

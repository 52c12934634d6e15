pub mod correction;
pub mod role;
pub mod time_entry;

pub mod assignments;
pub mod excel_read;
pub mod excel_write;
pub mod gate_log;
pub mod json_write;
pub mod master;

pub mod buffer_reader;
pub mod buffer_writer;
pub mod types;

pub mod csv_writer;
pub mod wrf_ascii;

pub use csv_writer::CsvWriter;
pub use wrf_ascii::WrfAsciiWriter;

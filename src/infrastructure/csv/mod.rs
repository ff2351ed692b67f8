// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV decoding, parsing and serialization

mod csv_reader;
mod csv_writer;

pub use csv_reader::CsvReader;
pub use csv_writer::CsvWriter;

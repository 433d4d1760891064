pub mod table_parser;
pub mod table_serializer;

pub use table_parser::{TableError, parse_records, parse_table};
pub use table_serializer::{format_float, serialize_record, serialize_table};

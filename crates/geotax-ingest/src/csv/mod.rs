//! CSV reading utilities.

mod reader;

pub use reader::{MAX_CSV_FILE_SIZE, check_file_size_with_limit, read_listing_csv, validate_encoding};

//! File format readers.

pub mod gifti;
pub mod nifti;
pub mod table;

pub use gifti::{parse_gifti, read_gifti};
pub use nifti::read_nifti;
pub use table::{
    Delimiter, MAX_TABLE_FILE_SIZE, check_file_size, read_rows, validate_encoding,
};

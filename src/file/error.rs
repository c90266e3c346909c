use std::io;
use thiserror::Error;

use super::PageNumber;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Page overflow: page={page}, {len} bytes exceed page size {page_size}")]
    PageOverflow {
        page: PageNumber,
        len: usize,
        page_size: usize,
    },

    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    #[error("Page already free: page={0}")]
    DoubleFree(PageNumber),

    #[error("Page was never allocated: page={0}")]
    PageNotAllocated(PageNumber),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FileResult<T> = Result<T, FileError>;

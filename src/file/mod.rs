mod config;
mod error;
mod free_list;
mod page_store;

#[cfg(test)]
mod tests;

pub use config::{ContractMode, StoreConfig};
pub use error::{FileError, FileResult};
pub use free_list::FreeList;
pub use page_store::{Page, PageStore};

/// Default backing file name
pub const DEFAULT_DB_PATH: &str = "nopesql.db";

/// Page size used when the host page size cannot be queried
pub const FALLBACK_PAGE_SIZE: usize = 4096;

/// Logical page number
pub type PageNumber = u64;

/// Native memory page size of the host OS
#[cfg(unix)]
pub fn host_page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        FALLBACK_PAGE_SIZE
    }
}

/// Native memory page size of the host OS
#[cfg(not(unix))]
pub fn host_page_size() -> usize {
    FALLBACK_PAGE_SIZE
}

pub mod file;

pub use file::{
    ContractMode, DEFAULT_DB_PATH, FileError, FileResult, FreeList, Page, PageNumber, PageStore,
    StoreConfig, host_page_size,
};

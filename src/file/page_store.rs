use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::config::{ContractMode, StoreConfig};
use super::error::{FileError, FileResult};
use super::free_list::FreeList;
use super::{DEFAULT_DB_PATH, PageNumber, host_page_size};

/// A numbered block of bytes
///
/// Data read back from disk includes any zero padding written with it;
/// telling payload from padding is up to the layer above.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    number: PageNumber,
    data: Vec<u8>,
}

impl Page {
    pub fn new(number: PageNumber, data: impl Into<Vec<u8>>) -> Self {
        Self {
            number,
            data: data.into(),
        }
    }

    pub fn empty(number: PageNumber) -> Self {
        Self::new(number, Vec::new())
    }

    pub fn number(&self) -> PageNumber {
        self.number
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Maps page numbers to fixed-size blocks of a backing file
///
/// Page `n` lives at bytes `[n * page_size, (n + 1) * page_size)`. The file
/// is opened per call and closed before the call returns; no handle and no
/// page contents are kept between calls.
///
/// Freeing a number does no I/O: the old bytes stay on disk until the slot
/// is written again, so a freed page must not be read before it has been
/// reallocated and rewritten.
///
/// Not safe for concurrent use. Seek and read/write are not atomic as a pair.
#[derive(Debug)]
pub struct PageStore {
    path: PathBuf,
    page_size: usize,
    contract: ContractMode,
    free_list: FreeList,
}

impl PageStore {
    /// Bind a store to `path` with a fixed `page_size`
    ///
    /// The file is neither created nor truncated here, and `page_size` is
    /// not validated. Use [`PageStore::with_config`] for a checked store.
    pub fn create<P: AsRef<Path>>(path: P, page_size: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            page_size,
            contract: ContractMode::default(),
            free_list: FreeList::new(),
        }
    }

    /// Bind a store to `path` using the host page size
    pub fn create_default<P: AsRef<Path>>(path: P) -> Self {
        Self::create(path, host_page_size())
    }

    /// Create a store from a validated config
    pub fn with_config(config: StoreConfig) -> FileResult<Self> {
        Self::from_parts(config, FreeList::new())
    }

    /// Create a store that resumes from a saved allocation state
    pub fn from_parts(config: StoreConfig, free_list: FreeList) -> FileResult<Self> {
        config.validate()?;
        if config.contract == ContractMode::Checked {
            free_list.validate()?;
        }
        Ok(Self {
            path: config.path,
            page_size: config.page_size,
            contract: config.contract,
            free_list,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn contract(&self) -> ContractMode {
        self.contract
    }

    pub fn free_list(&self) -> &FreeList {
        &self.free_list
    }

    /// Byte offset of page `number` in the backing file
    pub fn page_offset(&self, number: PageNumber) -> FileResult<u64> {
        number.checked_mul(self.page_size as u64).ok_or_else(|| {
            FileError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("offset of page {} overflows", number),
            ))
        })
    }

    /// Read up to `page_size` bytes at the page's offset
    ///
    /// A short or empty result is returned as-is when the file ends before
    /// the page does.
    pub fn read_page(&self, number: PageNumber) -> FileResult<Page> {
        let offset = self.page_offset(number)?;

        let mut file = File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FileError::FileNotFound(self.path.display().to_string()),
            _ => FileError::Io(e),
        })?;
        file.seek(SeekFrom::Start(offset))?;

        let mut data = Vec::new();
        file.take(self.page_size as u64).read_to_end(&mut data)?;

        debug!(page = number, offset, bytes = data.len(), "read page");
        Ok(Page::new(number, data))
    }

    /// Write the page zero-padded to exactly `page_size` bytes at its offset
    ///
    /// The file is created if missing. No fsync is issued.
    pub fn write_page(&self, page: &Page) -> FileResult<()> {
        let len = page.data.len();
        if len > self.page_size {
            return Err(FileError::PageOverflow {
                page: page.number,
                len,
                page_size: self.page_size,
            });
        }

        let offset = self.page_offset(page.number)?;
        if offset.checked_add(self.page_size as u64).is_none() {
            return Err(FileError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("end of page {} overflows", page.number),
            )));
        }

        let mut payload = Vec::new();
        payload
            .try_reserve_exact(self.page_size)
            .map_err(|_| FileError::InvalidPageSize(self.page_size))?;
        payload.extend_from_slice(&page.data);
        payload.resize(self.page_size, 0);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&payload)?;

        debug!(page = page.number, offset, bytes = len, "wrote page");
        Ok(())
    }

    /// Number of page slots the backing file spans, 0 if it doesn't exist
    pub fn page_count(&self) -> FileResult<u64> {
        if self.page_size == 0 {
            return Err(FileError::InvalidPageSize(self.page_size));
        }

        let len = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        Ok(len.div_ceil(self.page_size as u64))
    }

    /// Flush the backing file to disk
    pub fn sync(&self) -> FileResult<()> {
        let file = OpenOptions::new().read(true).open(&self.path).map_err(|e| {
            match e.kind() {
                io::ErrorKind::NotFound => {
                    FileError::FileNotFound(self.path.display().to_string())
                }
                _ => FileError::Io(e),
            }
        })?;
        file.sync_all()?;
        Ok(())
    }

    pub fn get_next_page(&mut self) -> PageNumber {
        self.free_list.get_next_page()
    }

    /// Return `number` to the free list; its on-disk bytes are left untouched
    pub fn free_page(&mut self, number: PageNumber) -> FileResult<()> {
        self.free_list.free_page(number, self.contract)
    }
}

impl Default for PageStore {
    fn default() -> Self {
        Self::create_default(DEFAULT_DB_PATH)
    }
}

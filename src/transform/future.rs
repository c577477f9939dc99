use crate::error::FetchError;
use crate::model::Block;
use crate::types::BlockId;
use crossbeam::channel::Sender;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

/// Channel carrying child-list requests to query workers.
pub type QuerySender = Sender<Arc<BlockFuture>>;

/// Channel carrying image downloads to asset workers.
pub type AssetSender = Sender<Arc<AssetFuture>>;

/// A one-shot result cell.
///
/// One writer resolves it, any number of readers block until then and
/// each receive a clone of the stored result.
#[derive(Debug)]
pub struct Resolution<T> {
    state: Mutex<Option<Result<T, FetchError>>>,
    ready: Condvar,
}

impl<T: Clone> Resolution<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Stores the result and wakes every reader.
    ///
    /// Only the first write is kept. Returns `false` for later writes.
    pub fn write(&self, result: Result<T, FetchError>) -> bool {
        let mut state = self.state.lock();
        if state.is_some() {
            return false;
        }
        *state = Some(result);
        self.ready.notify_all();
        true
    }

    /// Blocks until the cell is resolved.
    pub fn read(&self) -> Result<T, FetchError> {
        let mut state = self.state.lock();
        loop {
            if let Some(result) = state.as_ref() {
                return result.clone();
            }
            self.ready.wait(&mut state);
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.state.lock().is_some()
    }
}

impl<T: Clone> Default for Resolution<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pending children of one block.
#[derive(Debug)]
pub struct BlockFuture {
    pub block_id: BlockId,
    children: Resolution<Arc<Vec<Block>>>,
}

impl BlockFuture {
    pub fn new(block_id: BlockId) -> Self {
        Self {
            block_id,
            children: Resolution::new(),
        }
    }

    /// A future that is already resolved with `blocks`.
    pub fn resolved(block_id: BlockId, blocks: Vec<Block>) -> Self {
        let future = Self::new(block_id);
        future.write(Ok(blocks));
        future
    }

    pub fn write(&self, result: Result<Vec<Block>, FetchError>) {
        if !self.children.write(result.map(Arc::new)) {
            log::warn!("children of block {} were already resolved", self.block_id);
        }
    }

    pub fn read(&self) -> Result<Arc<Vec<Block>>, FetchError> {
        self.children.read()
    }

    pub fn is_resolved(&self) -> bool {
        self.children.is_resolved()
    }
}

/// Pending download of an image into the asset directory.
///
/// Resolves to the path Markdown should link to.
#[derive(Debug)]
pub struct AssetFuture {
    pub block_id: BlockId,
    pub url: String,
    /// Lowercase suffix of the URL path starting at its last `.`,
    /// empty when there is none.
    pub extension: String,
    path: Resolution<String>,
}

impl AssetFuture {
    pub fn new(block_id: BlockId, url: &str) -> Self {
        Self {
            block_id,
            url: url.to_string(),
            extension: url_extension(url),
            path: Resolution::new(),
        }
    }

    pub fn write(&self, result: Result<String, FetchError>) {
        if !self.path.write(result) {
            log::warn!("asset of block {} was already resolved", self.block_id);
        }
    }

    pub fn read(&self) -> Result<String, FetchError> {
        self.path.read()
    }
}

fn url_extension(raw: &str) -> String {
    let Ok(parsed) = url::Url::parse(raw) else {
        return String::new();
    };
    let path = parsed.path();
    path.rfind('.')
        .map(|idx| path[idx..].to_lowercase())
        .unwrap_or_default()
}

// src/export/mod.rs
//! Export orchestration: scans pages, renders each into a Markdown file and
//! services the transformer's block and asset requests from worker pools.

mod assets;
mod paths;
mod rate_limit;

pub use assets::{asset_path, download_asset, AssetFetcher, HttpAssetFetcher};
pub use paths::{markdown_path, relative_path, sanitize_filename};
pub use rate_limit::RateLimiter;

use crate::api::NotionRepository;
use crate::config::{ExportConfig, ExportSource};
use crate::constants::{DEFAULT_EXPORT_SPEED, MAX_EXPORT_SPEED};
use crate::error::{AppError, FetchError};
use crate::error_recovery::retry_default;
use crate::model::{Block, Page};
use crate::transform::{AssetFuture, AssetSender, BlockFuture, Markdown, MarkdownConfig, QuerySender};
use crate::types::{BlockId, PageId};
use chrono::{Days, NaiveDate};
use crossbeam::channel::{bounded, Receiver};
use dashmap::DashSet;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, ScopedJoinHandle};
use tokio::runtime::Handle;

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub scanned: usize,
    pub exported: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
struct Counters {
    exported: AtomicUsize,
    failed: AtomicUsize,
}

/// Exports pages to Markdown files.
///
/// Repository calls are async; worker threads drive them through the
/// runtime handle, so [`Exporter::run`] must be called outside of an async
/// context (e.g. from `spawn_blocking`).
pub struct Exporter {
    config: ExportConfig,
    repository: Arc<dyn NotionRepository>,
    asset_fetcher: Arc<dyn AssetFetcher>,
    runtime: Handle,
    limiter: RateLimiter,
    visited: DashSet<PageId>,
    counters: Counters,
}

impl Exporter {
    pub fn new(
        config: ExportConfig,
        repository: Arc<dyn NotionRepository>,
        asset_fetcher: Arc<dyn AssetFetcher>,
        runtime: Handle,
    ) -> Self {
        let limiter = RateLimiter::new(config.export_speed);
        Self {
            config,
            repository,
            asset_fetcher,
            runtime,
            limiter,
            visited: DashSet::new(),
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Applies defaults and checks the output directories.
    ///
    /// A single-page export writes to the current directory and renders
    /// plain prose unless told otherwise.
    pub fn validate(&mut self) -> Result<(), AppError> {
        if self.config.is_single_page() {
            if self.config.directory.as_os_str().is_empty() {
                self.config.directory = std::env::current_dir()?;
            }
            if self.config.markdown.is_default() {
                self.config.markdown = MarkdownConfig::single_page();
            }
        }

        precheck_dir(&self.config.directory)?;
        if let Some(asset_directory) = &self.config.asset_directory {
            precheck_dir(asset_directory)?;
        }
        if let Some(debug_cache) = &self.config.debug_cache {
            fs::create_dir_all(debug_cache)?;
        }

        self.config.export_speed = clamp_export_speed(self.config.export_speed);
        self.limiter = RateLimiter::new(self.config.export_speed);
        Ok(())
    }

    fn workers(&self) -> usize {
        (self.config.export_speed as usize).max(1)
    }

    /// Runs the export to completion.
    ///
    /// Individual page failures are logged and counted; only a failed scan
    /// fails the run.
    pub fn run(&self) -> Result<ExportSummary, AppError> {
        let workers = self.workers();
        log::info!(
            "Exporting to {} ({} workers, {:.1} requests/s)",
            self.config.directory.display(),
            workers,
            self.config.export_speed
        );

        let (page_tx, page_rx) = bounded::<Page>(workers);
        let (query_tx, query_rx) = bounded::<Arc<BlockFuture>>(workers);
        let (asset_tx, asset_rx) = bounded::<Arc<AssetFuture>>(workers * 2);

        let scanned = thread::scope(|scope| {
            let queriers: Vec<_> = (0..workers)
                .map(|_| {
                    let rx = query_rx.clone();
                    scope.spawn(move || self.serve_queries(rx))
                })
                .collect();

            let downloaders: Vec<_> = (0..workers * 2)
                .map(|_| {
                    let rx = asset_rx.clone();
                    scope.spawn(move || self.serve_downloads(rx))
                })
                .collect();

            let exporters: Vec<_> = (0..workers)
                .map(|_| {
                    let rx = page_rx.clone();
                    let query = query_tx.clone();
                    let assets = asset_tx.clone();
                    scope.spawn(move || self.serve_pages(rx, &query, &assets))
                })
                .collect();

            let scanned = self.scan_pages().map(|pages| {
                let count = pages.len();
                log::info!("Scanned pages: {}", count);
                for page in pages {
                    if page_tx.send(page).is_err() {
                        log::error!("All exporters stopped; remaining pages are skipped");
                        break;
                    }
                }
                count
            });

            // Exporters feed both request channels; queriers go last since
            // nothing else waits on downloads.
            drop(page_tx);
            join_all("exporter", exporters);
            drop(asset_tx);
            join_all("downloader", downloaders);
            drop(query_tx);
            join_all("querier", queriers);

            scanned
        })?;

        let summary = ExportSummary {
            scanned,
            exported: self.counters.exported.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
        };
        log::info!(
            "Export finished: {} scanned, {} exported, {} failed",
            summary.scanned,
            summary.exported,
            summary.failed
        );
        Ok(summary)
    }

    /// The pages a run starts from.
    pub fn scan_pages(&self) -> Result<Vec<Page>, AppError> {
        match &self.config.source {
            ExportSource::Page(id) => Ok(vec![self.retrieve_page(id)?]),
            ExportSource::Database(id) => {
                let body = database_query(
                    self.config.filter.as_ref(),
                    self.config.lookback_days,
                    chrono::Local::now().date_naive(),
                );
                log::debug!("Database query: {}", body);

                self.limiter.wait();
                self.runtime.block_on(retry_default(|| {
                    self.repository
                        .query_database(id, body.clone(), self.config.debug_limit)
                }))
            }
        }
    }

    /// All children of a block, paced by the rate limiter.
    pub fn query_blocks(&self, id: &BlockId) -> Result<Vec<Block>, AppError> {
        self.limiter.wait();
        let blocks = self
            .runtime
            .block_on(retry_default(|| self.repository.retrieve_children(id)))?;
        self.write_debug_cache(id.as_str(), &blocks);
        Ok(blocks)
    }

    /// Dumps `value` as `<debug cache>/<name>.json`. Failures only warn.
    fn write_debug_cache(&self, name: &str, value: &impl Serialize) {
        let Some(dir) = &self.config.debug_cache else {
            return;
        };
        let path = dir.join(format!("{}.json", name));
        let written = File::create(&path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()
        });
        if let Err(e) = written {
            log::warn!("Failed to write debug cache {}: {}", path.display(), e);
        }
    }

    fn retrieve_page(&self, id: &PageId) -> Result<Page, AppError> {
        self.limiter.wait();
        self.runtime
            .block_on(retry_default(|| self.repository.retrieve_page(id)))
    }

    /// Writes `page` to its export file, then exports the pages it contains.
    ///
    /// Returns `None` when the page was already exported during this run.
    pub fn export_page(
        &self,
        page: Page,
        query: &QuerySender,
        assets: &AssetSender,
    ) -> Result<Option<PathBuf>, AppError> {
        if !self.visited.insert(page.id.clone()) {
            log::debug!("Page {} already exported", page.id);
            return Ok(None);
        }

        let page_id = page.id.clone();
        self.write_debug_cache(&format!("page-{}", page_id), &page);
        let blocks = self.query_blocks(&page_id.cast())?;
        let sub_pages: Vec<PageId> = blocks.iter().filter_map(Block::sub_page).collect();

        let path = self.export_filename(&page);
        let file = File::create(&path).map_err(|e| {
            AppError::PathError(format!("create file: {}, err: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);

        Markdown::new(self.config.markdown.clone(), page, blocks)
            .with_query_channel(query.clone())
            .with_asset_channel(assets.clone())
            .transform_out(&mut writer)?;
        writer.flush()?;

        self.counters.exported.fetch_add(1, Ordering::SeqCst);
        log::debug!("Exported to file: [{}] -> {}", page_id, path.display());

        for sub_page in sub_pages {
            if self.visited.contains(&sub_page) {
                continue;
            }
            let result = self
                .retrieve_page(&sub_page)
                .and_then(|child| self.export_page(child, query, assets));
            if let Err(e) = result {
                self.counters.failed.fetch_add(1, Ordering::SeqCst);
                log::warn!("Failed to export sub-page {} of {}: {}", sub_page, page_id, e);
            }
        }

        Ok(Some(path))
    }

    /// `<directory>/<page id>.md`, or the cleaned-up title when configured.
    pub fn export_filename(&self, page: &Page) -> PathBuf {
        let directory = &self.config.directory;

        if self.config.use_title_as_filename {
            let mut title = page.title();
            if let Some((from, to)) = &self.config.replace_title {
                if !from.is_empty() {
                    title = title.replace(from.as_str(), to);
                }
            }
            let title = sanitize_filename(&title);
            if !title.is_empty() {
                return markdown_path(directory, &title);
            }
        }

        markdown_path(directory, page.id.as_str())
    }

    fn serve_pages(&self, pages: Receiver<Page>, query: &QuerySender, assets: &AssetSender) {
        for page in pages {
            let id = page.id.clone();
            if let Err(e) = self.export_page(page, query, assets) {
                self.counters.failed.fetch_add(1, Ordering::SeqCst);
                log::warn!("Failed to export {}: {}", id, e);
            }
        }
    }

    fn serve_queries(&self, requests: Receiver<Arc<BlockFuture>>) {
        for request in requests {
            let result = self.query_blocks(&request.block_id).map_err(|e| {
                log::warn!("Failed to query children of {}: {}", request.block_id, e);
                FetchError::from(&e)
            });
            request.write(result);
        }
    }

    fn serve_downloads(&self, requests: Receiver<Arc<AssetFuture>>) {
        for asset in requests {
            let result = download_asset(
                &asset,
                self.config.asset_directory.as_deref(),
                &self.config.directory,
                self.asset_fetcher.as_ref(),
            )
            .map_err(|e| {
                log::warn!("Failed to download: {}", e);
                FetchError::from(&e)
            });
            asset.write(result);
        }
    }
}

fn join_all(role: &str, handles: Vec<ScopedJoinHandle<'_, ()>>) {
    for handle in handles {
        if handle.join().is_err() {
            log::error!("{} worker panicked", role);
        }
    }
}

fn precheck_dir(dir: &Path) -> Result<(), AppError> {
    let metadata = fs::metadata(dir).map_err(|_| {
        AppError::Validation(format!(
            "directory does not exist: {}. Create it first",
            dir.display()
        ))
    })?;

    if !metadata.is_dir() {
        return Err(AppError::Validation(format!(
            "directory is invalid: {}",
            dir.display()
        )));
    }
    Ok(())
}

/// Keeps the request rate within Notion's limits.
pub fn clamp_export_speed(speed: f64) -> f64 {
    if !(speed >= 1.0) {
        DEFAULT_EXPORT_SPEED
    } else if speed > MAX_EXPORT_SPEED {
        MAX_EXPORT_SPEED
    } else {
        speed
    }
}

/// Database query body for a run.
///
/// A lookback window filters on `last_edited_time`; combined with a raw
/// filter both must match.
pub fn database_query(filter: Option<&Value>, lookback_days: Option<u32>, today: NaiveDate) -> Value {
    let lookback = lookback_days
        .filter(|days| *days > 0)
        .and_then(|days| today.checked_sub_days(Days::new(days.into())))
        .map(|since| {
            json!({
                "timestamp": "last_edited_time",
                "last_edited_time": { "on_or_after": since.format("%Y-%m-%d").to_string() }
            })
        });

    match (filter.cloned(), lookback) {
        (Some(filter), Some(lookback)) => json!({ "filter": { "and": [filter, lookback] } }),
        (Some(filter), None) | (None, Some(filter)) => json!({ "filter": filter }),
        (None, None) => json!({}),
    }
}

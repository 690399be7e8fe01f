//! Materialise the virtual modules, feed, sitemap and redirects to disk

use anyhow::{Context, Result};
use chrono::Utc;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::generator::{atom_feed, sitemap};
use crate::meta::VirtualModule;
use crate::redirects::RedirectTable;
use crate::Blog;

/// Atom feed output file
pub const FEED_FILE: &str = "rss.xml";
/// Sitemap output file
pub const SITEMAP_FILE: &str = "sitemap.xml";
/// Redirect table output file
pub const REDIRECTS_FILE: &str = "redirects.json";

/// Build every output once
pub async fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();
    let loader = blog.loader();

    // Each module is its own extraction pass
    let (meta, with_html) = tokio::try_join!(
        VirtualModule::PostMeta.records(&loader),
        VirtualModule::PostMetaWithHtml.records(&loader),
    )?;
    tracing::info!("Loaded {} posts", meta.len());

    fs::create_dir_all(&blog.public_dir)
        .with_context(|| format!("Failed to create {:?}", blog.public_dir))?;

    write_output(
        &blog.public_dir,
        VirtualModule::PostMeta.file_name(),
        &serde_json::to_string(&meta)?,
    )?;
    write_output(
        &blog.public_dir,
        VirtualModule::PostMetaWithHtml.file_name(),
        &serde_json::to_string(&with_html)?,
    )?;

    write_output(
        &blog.public_dir,
        FEED_FILE,
        &atom_feed(&blog.config, &with_html, Utc::now()),
    )?;
    write_output(&blog.public_dir, SITEMAP_FILE, &sitemap(&blog.config, &meta))?;

    let redirects = RedirectTable::new(&blog.config.redirects, &meta);
    write_output(
        &blog.public_dir,
        REDIRECTS_FILE,
        &serde_json::to_string_pretty(redirects.entries())?,
    )?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

fn write_output(public_dir: &Path, name: &str, content: &str) -> Result<()> {
    let path = public_dir.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Generated {}", name);
    Ok(())
}

/// Rebuild whenever a post or the config changes
pub async fn watch(blog: &Blog) -> Result<()> {
    let blog = blog.clone();
    let runtime = tokio::runtime::Handle::current();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let (tx, rx) = std::sync::mpsc::channel();

        // Debounce so an editor's save burst triggers one rebuild
        let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

        debouncer
            .watcher()
            .watch(&blog.posts_dir, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", blog.posts_dir);

        let config_path = blog.config_path();
        if config_path.exists() {
            debouncer
                .watcher()
                .watch(&config_path, RecursiveMode::NonRecursive)?;
            tracing::debug!("Watching: {:?}", config_path);
        }

        tracing::info!("Watching for changes. Press Ctrl+C to stop.");

        loop {
            match rx.recv() {
                Ok(Ok(events)) => {
                    for event in &events {
                        tracing::info!("File changed: {}", event.path.display());
                    }

                    // Config edits must be picked up too
                    let current = match Blog::new(&blog.base_dir) {
                        Ok(current) => current,
                        Err(e) => {
                            tracing::error!("Reloading config failed: {}", e);
                            continue;
                        }
                    };
                    match runtime.block_on(run(&current)) {
                        Ok(()) => tracing::info!("Rebuilt successfully"),
                        Err(e) => tracing::error!("Build failed: {:#}", e),
                    }
                }
                Ok(Err(e)) => tracing::error!("Watch error: {:?}", e),
                Err(e) => {
                    tracing::error!("Channel error: {:?}", e);
                    break;
                }
            }
        }

        Ok(())
    })
    .await?
}

//! Shared helpers for integration tests.
//!
//! Provides in-memory poster images, a [`ScriptedProvider`] that counts its
//! calls, and a cache configuration rooted in a temp directory.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reelshelf::config::CacheConfig;
use reelshelf::metadata::{MetadataProvider, PosterQuery};

/// Encode a solid-color PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

/// Cache configuration storing posters under `dir`.
pub fn cache_config(dir: &Path) -> CacheConfig {
    CacheConfig {
        dir: dir.to_path_buf(),
        fetch_timeout_secs: 2,
        ..CacheConfig::default()
    }
}

/// Create an empty file at `root/rel`, creating parent directories.
pub fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, b"").expect("write");
}

/// How a [`ScriptedProvider`] answers.
enum Script {
    /// Pop answers in order, `None` once exhausted.
    Queue(Mutex<VecDeque<Option<String>>>),
    /// A fresh URL under this base on every call.
    Endless(String),
    /// Look the title up.
    ByTitle(HashMap<String, String>),
    /// Always fail.
    Failing,
}

/// Mock provider with call-count instrumentation.
pub struct ScriptedProvider {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn with(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn queue<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self::with(Script::Queue(Mutex::new(
            answers.into_iter().map(|a| a.map(Into::into)).collect(),
        )))
    }

    pub fn empty() -> Self {
        Self::queue(Vec::<Option<String>>::new())
    }

    pub fn endless(base: impl Into<String>) -> Self {
        Self::with(Script::Endless(base.into()))
    }

    pub fn by_title(entries: &[(&str, String)]) -> Self {
        Self::with(Script::ByTitle(
            entries
                .iter()
                .map(|(t, u)| (t.to_string(), u.clone()))
                .collect(),
        ))
    }

    pub fn failing() -> Self {
        Self::with(Script::Failing)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn search_poster(&self, query: &PosterQuery) -> anyhow::Result<Option<String>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Queue(answers) => Ok(answers.lock().unwrap().pop_front().flatten()),
            Script::Endless(base) => Ok(Some(format!("{base}/broken-{n}.jpg"))),
            Script::ByTitle(map) => Ok(map.get(&query.title).cloned()),
            Script::Failing => anyhow::bail!("provider unavailable"),
        }
    }
}

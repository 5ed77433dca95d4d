//! Import icons from SVG symbol sheets.
//!
//! A sheet is a single SVG document that bundles icons as `<symbol>`
//! elements inside `<defs>`:
//!
//! ```text
//! <svg>
//!   <defs>
//!     <symbol id="home" viewBox="0 0 24 24">...</symbol>
//!     <symbol id="arrow_left" width="16" height="16">...</symbol>
//!   </defs>
//! </svg>
//! ```
//!
//! Problems with a single symbol (no `id`, unusable size, duplicate keyword,
//! broken content) skip that symbol only. Problems with the document itself
//! abort the whole import.

use crate::collection::Collection;
use crate::fragment::{inner_markup, namespaces_of, wrap_svg, Dimensions, IconFragment};
use log::{debug, info, warn};
use roxmltree::Document;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort an import
#[derive(Error, Debug)]
pub enum ImportError {
    /// Document root is not an `svg` element.
    #[error("Missing SVG element")]
    MissingRoot,

    /// Root has no `defs` child.
    #[error("Missing definitions")]
    MissingDefinitions,

    /// No symbol survived extraction.
    #[error("No images found")]
    NoIconsFound,

    /// Source is neither markup nor a usable path.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("XML parse error: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("Failed to read: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns a symbol `id` into a lookup keyword; `None` skips the symbol
pub type KeywordCallback = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Receives human readable diagnostics
pub type DiagnosticSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Import settings
#[derive(Clone)]
pub struct ImportOptions {
    /// Keyword sanitizer, [`default_keyword`] unless replaced
    pub keyword_callback: KeywordCallback,

    /// Report skipped and invalid symbols
    pub debug: bool,

    /// Diagnostic sink; `None` routes diagnostics to the `log` facade
    pub log: Option<DiagnosticSink>,

    /// Forwarded to the loader, not interpreted here
    pub headless: bool,

    /// Forwarded to the loader, not interpreted here
    pub minify: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            keyword_callback: Arc::new(default_keyword),
            debug: false,
            log: None,
            headless: true,
            minify: true,
        }
    }
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("debug", &self.debug)
            .field("log", &self.log.is_some())
            .field("headless", &self.headless)
            .field("minify", &self.minify)
            .finish_non_exhaustive()
    }
}

impl ImportOptions {
    pub fn with_keyword_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.keyword_callback = Arc::new(callback);
        self
    }

    pub fn with_log<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.log = Some(Arc::new(sink));
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Always reported
    fn emit(&self, message: &str) {
        match &self.log {
            Some(sink) => sink(message),
            None => warn!("{}", message),
        }
    }

    /// Reported only in debug mode
    fn trace(&self, message: &str) {
        if self.debug {
            self.emit(message);
        } else {
            debug!("{}", message);
        }
    }
}

/// Default keyword sanitizer.
///
/// Lowercases, turns `_` into `-`, drops anything outside `[a-z0-9_-]` and
/// collapses runs of `-`.
pub fn default_keyword(id: &str) -> Option<String> {
    let mut keyword = String::with_capacity(id.len());

    for ch in id.to_lowercase().chars() {
        let ch = if ch == '_' { '-' } else { ch };
        if !(ch.is_ascii_alphanumeric() || ch == '-') {
            continue;
        }
        if ch == '-' && keyword.ends_with('-') {
            continue;
        }
        keyword.push(ch);
    }

    Some(keyword)
}

/// Parsed SVG markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    source: String,
}

impl SvgDocument {
    /// Parse markup, keeping the text for later traversal
    pub fn parse(source: impl Into<String>) -> Result<Self, roxmltree::Error> {
        let source = source.into();
        Document::parse(&source)?;
        Ok(Self { source })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Element tree view of the document
    pub fn tree(&self) -> Result<Document<'_>, roxmltree::Error> {
        Document::parse(&self.source)
    }
}

/// Where a sheet comes from
#[derive(Debug, Clone)]
pub enum SheetSource {
    Document(SvgDocument),
    Markup(String),
    File(PathBuf),
}

impl From<SvgDocument> for SheetSource {
    fn from(doc: SvgDocument) -> Self {
        SheetSource::Document(doc)
    }
}

/// Text starting with `<` is markup, anything else is a file name
impl From<&str> for SheetSource {
    fn from(text: &str) -> Self {
        if text.trim_start().starts_with('<') {
            SheetSource::Markup(text.to_string())
        } else {
            SheetSource::File(PathBuf::from(text))
        }
    }
}

impl From<String> for SheetSource {
    fn from(text: String) -> Self {
        if text.trim_start().starts_with('<') {
            SheetSource::Markup(text)
        } else {
            SheetSource::File(PathBuf::from(text))
        }
    }
}

impl From<&Path> for SheetSource {
    fn from(path: &Path) -> Self {
        SheetSource::File(path.to_path_buf())
    }
}

impl From<PathBuf> for SheetSource {
    fn from(path: PathBuf) -> Self {
        SheetSource::File(path)
    }
}

/// Resolves file references to parsed documents
pub trait SheetLoader {
    fn load(
        &self,
        path: &Path,
        options: &ImportOptions,
    ) -> impl Future<Output = Result<SvgDocument, ImportError>> + Send;
}

/// Reads sheets from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SheetLoader for FsLoader {
    async fn load(&self, path: &Path, options: &ImportOptions) -> Result<SvgDocument, ImportError> {
        debug!(
            "Loading {} (headless: {}, minify: {})",
            path.display(),
            options.headless,
            options.minify
        );
        let source = tokio::fs::read_to_string(path).await?;
        Ok(SvgDocument::parse(source)?)
    }
}

/// Import a sheet from markup, a parsed document or a file
pub async fn import_sheet(
    source: impl Into<SheetSource>,
    options: &ImportOptions,
) -> Result<Collection, ImportError> {
    import_sheet_with(source, options, &FsLoader).await
}

/// Import a sheet, resolving files through a custom loader
pub async fn import_sheet_with<L: SheetLoader>(
    source: impl Into<SheetSource>,
    options: &ImportOptions,
    loader: &L,
) -> Result<Collection, ImportError> {
    let document = match source.into() {
        SheetSource::Document(doc) => doc,
        SheetSource::Markup(text) => SvgDocument::parse(text)?,
        SheetSource::File(path) => {
            if path.as_os_str().is_empty() {
                return Err(ImportError::InvalidSource("empty file name".to_string()));
            }
            loader.load(&path, options).await?
        }
    };

    import_document(&document, options)
}

/// Extract every usable `<symbol>` of a parsed sheet
pub fn import_document(
    document: &SvgDocument,
    options: &ImportOptions,
) -> Result<Collection, ImportError> {
    let tree = document.tree()?;
    let root = tree.root_element();
    if root.tag_name().name() != "svg" {
        return Err(ImportError::MissingRoot);
    }

    let defs: Vec<_> = root
        .children()
        .filter(|n| n.has_tag_name("defs"))
        .collect();
    if defs.is_empty() {
        return Err(ImportError::MissingDefinitions);
    }

    let mut collection = Collection::new();

    let symbols = defs
        .iter()
        .flat_map(|d| d.children())
        .filter(|n| n.has_tag_name("symbol"));

    for symbol in symbols {
        let Some(id) = symbol.attribute("id").filter(|id| !id.is_empty()) else {
            continue;
        };

        let Some(dims) = Dimensions::from_node(&symbol) else {
            options.trace(&format!("Invalid dimensions for symbol {}", id));
            continue;
        };

        let svg = wrap_svg(
            inner_markup(document.source(), &symbol),
            &dims,
            &namespaces_of(&symbol),
        );

        let keyword = match (options.keyword_callback)(id) {
            Some(k) if !k.is_empty() => k,
            _ => {
                options.trace(&format!("Ignoring symbol {}: empty keyword", id));
                continue;
            }
        };

        if collection.contains(&keyword) {
            options.emit(&format!("Duplicate entry for {}", keyword));
            continue;
        }

        match IconFragment::parse(&svg) {
            Ok(icon) => collection.add(keyword, icon),
            Err(e) => options.trace(&format!("Invalid content in symbol {}: {}", id, e)),
        }
    }

    if collection.is_empty() {
        return Err(ImportError::NoIconsFound);
    }

    info!("Imported {} icons", collection.len());
    Ok(collection)
}

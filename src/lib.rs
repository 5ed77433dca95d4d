//! # icon-sheet
//!
//! Extract icons from SVG symbol sheets and export them as compact JSON
//! icon sets.
//!
//! ## Features
//!
//! - Import every `<symbol>` of a sheet as a standalone icon
//! - Dimensions from `viewBox`, falling back to `width`/`height`
//! - Pluggable keyword sanitizer with duplicate detection
//! - Prefix detection from key naming (`foo-icon`, `foo:icon`)
//! - Aliases with their own rotate/flip hints
//! - Optimized export hoisting the most common width/height
//!
//! ## Example
//!
//! ```
//! use icon_sheet::{export_json, import_document, ExportOptions, ImportOptions, SvgDocument};
//!
//! let sheet = r#"<svg xmlns="http://www.w3.org/2000/svg"><defs>
//!     <symbol id="home" viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></symbol>
//! </defs></svg>"#;
//!
//! let doc = SvgDocument::parse(sheet).unwrap();
//! let mut icons = import_document(&doc, &ImportOptions::default()).unwrap();
//! let json = export_json(&mut icons, &ExportOptions::default());
//!
//! assert_eq!(json.icons["home"].width, Some(24.0));
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Print JSON for a sheet
//! icon-sheet sprite.svg
//!
//! # Optimized output written to a file
//! icon-sheet sprite.svg --optimize -o icons.json
//!
//! # List icons
//! icon-sheet sprite.svg --format text
//! ```

pub mod config;
mod collection;
mod export;
mod fragment;
mod import;

pub use collection::Collection;
pub use export::{
    export_json, export_json_to, AliasRecord, ExportError, ExportOptions, FsSink, IconRecord,
    IconSetJson, JsonSink,
};
pub use fragment::{Alias, Dimensions, FragmentError, IconFragment};
pub use import::{
    default_keyword, import_document, import_sheet, import_sheet_with, DiagnosticSink,
    FsLoader, ImportError, ImportOptions, KeywordCallback, SheetLoader, SheetSource, SvgDocument,
};

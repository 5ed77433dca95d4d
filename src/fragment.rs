//! Single icon value type

use roxmltree::{Document, Node};
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Errors raised while building an [`IconFragment`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FragmentError {
    /// The text is not a single well-formed `svg` element.
    #[error("Invalid SVG markup: {0}")]
    InvalidMarkup(String),

    /// No usable width/height could be derived.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Alternate name for an icon, with optional transformations of its own.
///
/// Hints on an alias are applied on top of the parent body only; the parent's
/// own `rotate`/`h_flip`/`v_flip` are not copied into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub rotate: u8,
    pub h_flip: bool,
    pub v_flip: bool,
}

impl Alias {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rotate: 0,
            h_flip: false,
            v_flip: false,
        }
    }

    /// Set rotation in quarter turns (normalized to 0-3)
    pub fn with_rotate(mut self, rotate: u8) -> Self {
        self.rotate = rotate % 4;
        self
    }

    pub fn with_h_flip(mut self, h_flip: bool) -> Self {
        self.h_flip = h_flip;
        self
    }

    pub fn with_v_flip(mut self, v_flip: bool) -> Self {
        self.v_flip = v_flip;
        self
    }
}

impl From<&str> for Alias {
    fn from(name: &str) -> Self {
        Alias::new(name)
    }
}

impl From<String> for Alias {
    fn from(name: String) -> Self {
        Alias::new(name)
    }
}

/// Box geometry of an icon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Read dimensions from `viewBox`, falling back to `width`/`height`.
    ///
    /// A `viewBox` with exactly four numeric components always wins over
    /// explicit attributes. Returns `None` unless both sizes are positive.
    pub fn from_attributes(
        view_box: Option<&str>,
        width: Option<&str>,
        height: Option<&str>,
    ) -> Option<Self> {
        let dims = view_box
            .and_then(parse_view_box)
            .or_else(|| match (width.and_then(parse_length), height.and_then(parse_length)) {
                (Some(width), Some(height)) => Some(Dimensions {
                    left: 0.0,
                    top: 0.0,
                    width,
                    height,
                }),
                _ => None,
            })?;

        if is_positive(dims.width) && is_positive(dims.height) {
            Some(dims)
        } else {
            None
        }
    }

    /// Read dimensions from an element's attributes
    pub fn from_node(node: &Node) -> Option<Self> {
        Self::from_attributes(
            node.attribute("viewBox"),
            node.attribute("width"),
            node.attribute("height"),
        )
    }

    /// `viewBox` attribute value
    pub fn view_box(&self) -> String {
        format!("{} {} {} {}", self.left, self.top, self.width, self.height)
    }
}

/// Namespace declaration carried over from the source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlNamespace {
    prefix: Option<String>,
    uri: String,
}

/// Every namespace in scope on `node`, except the implicit `xml` one
pub(crate) fn namespaces_of(node: &Node) -> Vec<XmlNamespace> {
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .map(|ns| XmlNamespace {
            prefix: ns.name().map(str::to_string),
            uri: ns.uri().to_string(),
        })
        .collect()
}

/// One icon: inner SVG markup plus its geometry and transform hints.
///
/// `body` never includes the outer `<svg>` element; [`IconFragment::to_svg`]
/// rebuilds a standalone document from the fragment's own fields.
#[derive(Debug, Clone, PartialEq)]
pub struct IconFragment {
    body: String,
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
    pub rotate: u8,
    pub h_flip: bool,
    pub v_flip: bool,
    pub aliases: Vec<Alias>,
    namespaces: Vec<XmlNamespace>,
}

impl IconFragment {
    /// Create from an already extracted body
    pub fn new(body: impl Into<String>, width: f64, height: f64) -> Result<Self, FragmentError> {
        let body = body.into();
        if starts_with_svg_tag(&body) {
            return Err(FragmentError::InvalidMarkup(
                "body must not contain the outer svg element".to_string(),
            ));
        }
        Self::from_body(body, width, height)
    }

    /// Body extracted from a parsed root, may legitimately start with a nested `<svg>`
    fn from_body(body: String, width: f64, height: f64) -> Result<Self, FragmentError> {
        if !is_positive(width) || !is_positive(height) {
            return Err(FragmentError::InvalidDimensions(format!(
                "{}x{}",
                width, height
            )));
        }

        Ok(Self {
            body,
            width,
            height,
            left: 0.0,
            top: 0.0,
            rotate: 0,
            h_flip: false,
            v_flip: false,
            aliases: Vec::new(),
            namespaces: Vec::new(),
        })
    }

    /// Parse a standalone SVG document
    pub fn parse(markup: &str) -> Result<Self, FragmentError> {
        let doc = Document::parse(markup)
            .map_err(|e| FragmentError::InvalidMarkup(e.to_string()))?;
        let root = doc.root_element();

        if root.tag_name().name() != "svg" {
            return Err(FragmentError::InvalidMarkup(format!(
                "expected svg root, found <{}>",
                root.tag_name().name()
            )));
        }

        let dims = Dimensions::from_node(&root).ok_or_else(|| {
            FragmentError::InvalidDimensions(
                "missing viewBox and width/height attributes".to_string(),
            )
        })?;

        let body = inner_markup(markup, &root).to_string();
        let mut icon =
            Self::from_body(body, dims.width, dims.height)?.with_offset(dims.left, dims.top);
        icon.namespaces = namespaces_of(&root);
        Ok(icon)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
        }
    }

    pub fn with_offset(mut self, left: f64, top: f64) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    /// Set rotation in quarter turns (normalized to 0-3)
    pub fn with_rotate(mut self, rotate: u8) -> Self {
        self.rotate = rotate % 4;
        self
    }

    pub fn with_h_flip(mut self, h_flip: bool) -> Self {
        self.h_flip = h_flip;
        self
    }

    pub fn with_v_flip(mut self, v_flip: bool) -> Self {
        self.v_flip = v_flip;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<Alias>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Declare a prefixed namespace used by the body, e.g. `xlink`
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.push(XmlNamespace {
            prefix: Some(prefix.into()),
            uri: uri.into(),
        });
        self
    }

    /// Wrap body in a standalone `<svg>` document
    pub fn to_svg(&self) -> String {
        wrap_svg(&self.body, &self.dimensions(), &self.namespaces)
    }
}

/// Build a standalone SVG document around inner markup.
///
/// `namespaces` are redeclared on the new root so prefixed attributes in the
/// body (`xlink:href`, `inkscape:label`, ...) still resolve.
pub(crate) fn wrap_svg(body: &str, dims: &Dimensions, namespaces: &[XmlNamespace]) -> String {
    let default_uri = namespaces
        .iter()
        .find(|ns| ns.prefix.is_none())
        .map_or(SVG_NS, |ns| ns.uri.as_str());

    let mut declarations = format!(" xmlns=\"{}\"", escape_attribute(default_uri));
    let mut seen = HashSet::new();
    for ns in namespaces {
        if let Some(prefix) = &ns.prefix {
            if seen.insert(prefix.as_str()) {
                declarations.push_str(&format!(
                    " xmlns:{}=\"{}\"",
                    prefix,
                    escape_attribute(&ns.uri)
                ));
            }
        }
    }

    format!(
        "<svg{} width=\"{}\" height=\"{}\" viewBox=\"{}\">{}</svg>",
        declarations,
        dims.width,
        dims.height,
        dims.view_box(),
        body
    )
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// Exact source text between an element's start and end tags
pub(crate) fn inner_markup<'a>(source: &'a str, node: &Node) -> &'a str {
    match (node.first_child(), node.last_child()) {
        (Some(first), Some(last)) => &source[first.range().start..last.range().end],
        _ => "",
    }
}

/// Parse `viewBox` into exactly four numbers
fn parse_view_box(value: &str) -> Option<Dimensions> {
    let numbers = svgtypes::NumberListParser::from(value)
        .collect::<Result<Vec<f64>, _>>()
        .ok()?;
    let [left, top, width, height] = numbers[..] else {
        return None;
    };

    Some(Dimensions {
        left,
        top,
        width,
        height,
    })
}

/// Numeric part of a `width`/`height` value (`"24px"` -> 24)
fn parse_length(value: &str) -> Option<f64> {
    svgtypes::Length::from_str(value.trim())
        .ok()
        .map(|length| length.number)
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn starts_with_svg_tag(body: &str) -> bool {
    let trimmed = body.trim_start();
    match trimmed.get(..4) {
        Some(head) if head.eq_ignore_ascii_case("<svg") => trimmed[4..]
            .chars()
            .next()
            .map_or(true, |c| c.is_whitespace() || c == '>' || c == '/'),
        _ => false,
    }
}

/// Errors that can occur while loading a DAT catalog.
///
/// Any of these is fatal to a verification run: no game can be looked up
/// without a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid DAT file: {0}")]
    Parse(String),
}

impl CatalogError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Parse error tied to a line of a line-oriented DAT.
    pub fn at_line(line: usize, msg: impl std::fmt::Display) -> Self {
        Self::Parse(format!("line {line}: {msg}"))
    }
}

#[derive(Debug)]
pub enum ParsingError {
    MissingRoot,
    WrongToken,
    Utf8Error(std::str::Utf8Error),
    QuickXml(quick_xml::Error),
    Eof,
}
impl std::fmt::Display for ParsingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRoot => write!(f, "No root element in document"),
            Self::WrongToken => write!(f, "Wrong token"),
            Self::Utf8Error(e) => write!(f, "Utf8 Error: {}", e),
            Self::QuickXml(e) => write!(f, "Quick XML error: {}", e),
            Self::Eof => write!(f, "Found EOF while expecting data"),
        }
    }
}
impl std::error::Error for ParsingError {}
impl From<quick_xml::Error> for ParsingError {
    fn from(value: quick_xml::Error) -> Self {
        Self::QuickXml(value)
    }
}
impl From<std::str::Utf8Error> for ParsingError {
    fn from(value: std::str::Utf8Error) -> Self {
        Self::Utf8Error(value)
    }
}

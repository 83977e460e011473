use quick_xml::reader::NsReader;

use super::document::Document;
use super::error::ParsingError;
use super::xml::Reader;

/// Outcome of reading a response body as XML.
///
/// Servers answer MKCOL, PUT or DELETE with an empty body, or sometimes with
/// an HTML page: only the status code matters for those, so a body that is
/// not XML is reported here instead of failing the operation.
#[derive(Debug)]
pub enum XmlBody {
    Document(Document),
    Empty,
    Unparsable(ParsingError),
}

impl XmlBody {
    pub fn document(&self) -> Option<&Document> {
        match self {
            Self::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

pub async fn parse(body: &[u8]) -> XmlBody {
    if body.iter().all(u8::is_ascii_whitespace) {
        return XmlBody::Empty;
    }

    match Reader::new(NsReader::from_reader(body)).document().await {
        Ok(doc) => XmlBody::Document(doc),
        Err(e) => {
            tracing::warn!(err=%e, "response body is not a valid XML document");
            XmlBody::Unparsable(e)
        }
    }
}

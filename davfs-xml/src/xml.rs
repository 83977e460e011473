use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use tokio::io::AsyncBufRead;

use super::document::{Document, Element, Node};
use super::error::ParsingError;

// Constants
pub const DAV_URN: &str = "DAV:";

/// Transform an XML stream of characters into a namespace-resolved tree
pub struct Reader<T: AsyncBufRead + Unpin> {
    pub rdr: NsReader<T>,
    parents: Vec<Element>,
    buf: Vec<u8>,
}
impl<T: AsyncBufRead + Unpin> Reader<T> {
    pub fn new(rdr: NsReader<T>) -> Self {
        Self {
            rdr,
            parents: vec![],
            buf: vec![],
        }
    }

    /// Read up to the end of the first top-level element.
    /// Anything after it is left unread.
    pub async fn document(mut self) -> Result<Document, ParsingError> {
        loop {
            let evt = self.rdr.read_event_into_async(&mut self.buf).await?;
            let done = match evt {
                Event::Start(bs) => {
                    let elem = resolve(&self.rdr, &bs)?;
                    self.parents.push(elem);
                    None
                }
                Event::Empty(bs) => {
                    let elem = resolve(&self.rdr, &bs)?;
                    attach(&mut self.parents, elem)
                }
                Event::End(_) => {
                    let elem = self.parents.pop().ok_or(ParsingError::WrongToken)?;
                    attach(&mut self.parents, elem)
                }
                Event::Text(escaped) => {
                    if let Some(parent) = self.parents.last_mut() {
                        parent
                            .children
                            .push(Node::Text(escaped.unescape()?.into_owned()));
                    }
                    None
                }
                Event::CData(unescaped) => {
                    if let Some(parent) = self.parents.last_mut() {
                        let txt = std::str::from_utf8(unescaped.as_ref())?;
                        parent.children.push(Node::Text(txt.to_string()));
                    }
                    None
                }
                Event::Eof if self.parents.is_empty() => return Err(ParsingError::MissingRoot),
                Event::Eof => return Err(ParsingError::Eof),
                // declaration, comments, processing instructions, doctype
                _ => None,
            };
            self.buf.clear();

            if let Some(root) = done {
                return Ok(Document { root });
            }
        }
    }
}

/// Bind an opening tag to its namespace while its declarations are in scope
fn resolve<T>(rdr: &NsReader<T>, bs: &BytesStart<'_>) -> Result<Element, ParsingError> {
    let (extr_ns, local) = rdr.resolve_element(bs.name());
    let namespace = match extr_ns {
        ResolveResult::Bound(v) => Some(std::str::from_utf8(v.into_inner())?.to_string()),
        // an unknown prefix is kept unbound rather than failing the whole body
        _ => None,
    };
    let local_name = std::str::from_utf8(local.into_inner())?;
    Ok(Element::new(namespace, local_name))
}

/// Append a closed element to its parent, or hand it back when it was the root
fn attach(parents: &mut Vec<Element>, elem: Element) -> Option<Element> {
    match parents.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(elem));
            None
        }
        None => Some(elem),
    }
}

// utils
pub mod error;
pub mod xml;

// tree
pub mod document;

// response bodies
pub mod body;

pub use body::{parse, XmlBody};
pub use document::{Document, Element, Node};
pub use error::ParsingError;
pub use xml::DAV_URN;

//! The textual client protocol: framing, decoding, and outbound lines

mod framer;
pub use framer::{LineCodec, LineFramer, Lines};

mod message;
pub use message::{DecodeError, Message, Origin};

pub mod ctcp;
pub mod names;
pub mod outbound;

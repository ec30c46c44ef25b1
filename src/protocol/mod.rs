//! WebSocket protocol core: frame values and the close payload codec (RFC 6455).

pub mod frame;
pub mod opcode;

pub use frame::{Frame, MAX_CLOSE_REASON, MAX_CONTROL_PAYLOAD, decode_close, encode_close};
pub use opcode::OpCode;

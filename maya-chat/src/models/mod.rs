pub mod attachment;
pub mod session;
pub mod turn;

pub use attachment::Attachment;
pub use session::Session;
pub use turn::{Role, Turn};

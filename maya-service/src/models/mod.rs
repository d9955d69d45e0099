pub mod attachment;
pub mod relay;

pub use attachment::AttachmentPayload;
pub use relay::{RelayOutcome, RelayRequest, RelayTarget};

pub mod gate;
pub mod response;
pub mod session;

pub use gate::enforce_gate;
pub use response::{ApiResponse, ApiResult};
pub use session::{session_from_headers, session_middleware};

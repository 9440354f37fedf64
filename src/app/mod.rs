//! Push-model application interface.
//!
//! # Data Flow
//! ```text
//! ServerRequest (start line, headers, HttpConnection)
//!     → Application::find_handler
//!     → RequestHandler intake: headers_received → data_received* → finish
//!     → handler writes through HttpConnection (often via ResponseWriter)
//! ```
//!
//! # Design Decisions
//! - Intake calls return `Intake`, an explicit Completed / Pending variant
//! - Handler errors are `anyhow::Error` and propagate out of the adapter untouched
//! - Routing belongs to the application; the adapter only asks for a handler

pub mod handler;
pub mod request;
pub mod sample;
pub mod writer;

pub use handler::{Application, Intake, RequestHandler};
pub use request::ServerRequest;
pub use writer::ResponseWriter;

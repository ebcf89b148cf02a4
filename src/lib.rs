//! Client for the Ingen patch protocol.
//!
//! An Ingen engine is driven by sending it patch messages (`patch:Get`,
//! `patch:Put`, `patch:Patch`, `patch:Set`, `patch:Delete`) as Turtle over a
//! Unix or TCP socket, one NUL-terminated message at a time. Each reply carries
//! a `patch:Response` with a status code and, on success, any state the
//! server wants to report. [`Remote`] sends the requests, checks the status,
//! strips the response envelope and mirrors the reported state in a local
//! graph.
//!
//! ```rust,ignore
//! use ingen_remote::Remote;
//!
//! let mut ingen = Remote::connect_to("unix:///tmp/ingen.sock")?;
//! ingen.get("ingen:/main")?;
//! for triple in ingen.model().graph() {
//!     println!("{}", triple);
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod model;
pub mod ns;
pub mod prefix;
pub mod resolver;
pub mod response;
pub mod store;
pub mod transport;
pub mod turtle;

pub use client::{Interface, Remote};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use message::{MsgType, Request};
pub use model::{Graph, Term, Triple};
pub use ns::Namespace;
pub use prefix::PrefixRegistry;
pub use resolver::ErrorResolver;
pub use store::LocalModel;
pub use transport::Transport;

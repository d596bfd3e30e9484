//! # Quote Sources
//!
//! Adapters for the external USD/BRL rate sources.
//!
//! Every source implements [`SourceAdapter`] and reaches the network through
//! an injected [`HttpResource`].
//!
//! # Available Adapters
//!
//! - [`WiseSource`]: converter page scrape, mid rate with a fixed spread
//! - [`NubankSource`]: open-data conversion table scrape
//! - [`NomadSource`]: calculator JSON API

pub mod error;
pub mod extract;
pub mod http_client;
pub mod nomad;
pub mod nubank;
pub mod shared_client;
pub mod traits;
pub mod wise;

pub use error::{SourceError, SourceResult};
pub use http_client::HttpClient;
pub use nomad::NomadSource;
pub use nubank::NubankSource;
pub use shared_client::{HttpResource, SharedHttpResource};
pub use traits::SourceAdapter;
pub use wise::WiseSource;

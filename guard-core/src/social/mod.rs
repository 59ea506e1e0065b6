//! Social account aggregation.
//!
//! Accounts are linked through [`SocialConnector`]s. The connectors shipped
//! here are stand-ins: OAuth is simulated after an artificial delay and
//! posts are randomly generated.
//!
//! # Architecture
//!
//! ```text
//! PrivacyGuard
//!     ├── MockConnector (one per platform, SocialConnector)
//!     │     └── mock::generate_mock_posts
//!     └── feed (filters over the stored post list)
//! ```

mod connector;
mod error;
mod feed;
pub mod mock;
pub mod types;

pub use connector::{
    connector_for, granted_scopes, import_posts, simulate_oauth, MockConnector, MockOAuthResponse,
    SocialConnector,
};
pub use error::{ConnectorError, Result};
pub use feed::{connected_platforms, filter_posts, unconnected_platforms, PostFilter};
pub use types::{PostUpdate, PostVisibility, SocialAccount, SocialPlatform, SocialPost};

//! stnts - a tiny new tab server.
//!
//! Serves one HTML page of link groups described by a JSON file, with a
//! favicon next to every link.
//!
//! # Architecture
//!
//! - **Site**: The immutable configuration model loaded at startup
//! - **Template**: Tera fragments compiled once per fragment list and cached
//! - **Icon**: Favicons probed from a fixed list of candidate paths per host,
//!   cached on success and remembered for a while on failure
//! - **Render**: Binds the site and the current time into the index page
//!
//! # Routes
//!
//! ```text
//! GET /             the new tab page
//! GET /icon/{host}  favicon for a host on the page
//! GET /health       health check
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod icon;
pub mod render;
pub mod routes;
pub mod site;
pub mod state;
pub mod template;

pub use config::Config;
pub use routes::router;
pub use site::Site;
pub use state::AppState;

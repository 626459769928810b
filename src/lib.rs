//! annexdraw - Render protocol steps as TikZ drawings and CSS-grid markup
//!
//! Each protocol step (a request, an action, a party starting or ending) is
//! built once from typed arguments. Its geometry is fixed at construction, and
//! both backends read the same derived state.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use annexdraw::{GridResolver, HttpMessage, Party, Request, RequestArgs, RequestKind, Step, StepContext};
//!
//! let browser = Arc::new(Party::new("Browser", 1, 2));
//! let server = Arc::new(Party::new("Server", 2, 3));
//!
//! let mut ctx = StepContext::new();
//! let kind = RequestKind::Http(HttpMessage::new("GET", "/login"));
//! let steps: Vec<Step> = vec![
//!     Request::new(RequestArgs::new(1, kind).between(&browser, &server), &mut ctx)
//!         .unwrap()
//!         .into(),
//! ];
//!
//! let tikz = annexdraw::render_tikz(&steps, &GridResolver::default());
//! assert!(tikz.contains(r"\draw[annex_http_request] (pos-1-1) to"));
//!
//! let html = annexdraw::render_html(&steps);
//! assert!(html.contains("grid-column: 2 / 3; grid-row: 2 / span 1"));
//! ```
//!
//! # Step Variants
//!
//! - Requests: plain, HTTP, XHR, responses, WebSocket, postMessage and
//!   request/response pairs drawn on one row
//! - Actions and script actions
//! - Party lifecycles: start, end, window open/close and placeholders

pub mod config;
pub mod error;
pub mod geometry;
pub mod html;
pub mod steps;
pub mod tikz;
pub mod types;

pub use config::GeometryConfig;
pub use error::{Result, StepError};
pub use geometry::{Alignment, Height};
pub use html::{render_html, template_context, MarkupBlock};
pub use steps::*;
pub use tikz::{render_tikz, VectorDrawing};
pub use types::*;

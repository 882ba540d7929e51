//! Page-ready bootstrap for kiln sites.
//!
//! Pages ship with a no-JS indicator (a class on the root element) that styles
//! use to show fallback content. Once the document reaches the `complete`
//! ready state, the bootstrap flips that indicator to its "JavaScript
//! available" value, exactly once.
//!
//! The host page is modeled by the [`ReadyStateEvents`] and [`Document`]
//! traits, and the indicator is injected through [`Indicator`], so the
//! bootstrap can be driven without a browser. [`BootstrapScript`] renders the
//! same behavior as the script deployed with a built site.

pub mod bootstrap;
pub mod document;
pub mod indicator;
pub mod ready_state;
pub mod script;

pub use bootstrap::PageReadyBootstrap;
pub use document::{Document, Listener, MemoryDocument, ReadyStateEvents};
pub use indicator::{ClassList, Detached, Indicator, IndicatorConfig, IndicatorState};
pub use ready_state::ReadyState;
pub use script::BootstrapScript;

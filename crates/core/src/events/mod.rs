//! Domain events module.
//!
//! Provides change-notice event types and the sink trait the store emits
//! through after every committed write. The live worker implements the sink
//! to turn notices into recomputed views.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;

//! Route handlers, grouped by resource

pub mod farms;
pub mod harvests;
pub mod producers;
pub mod registry;
pub mod stats;
pub mod system;

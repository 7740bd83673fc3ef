//! Preset handlers
//!
//! A handler knows which (preset, property) pairs it can serve. Client-side
//! handlers turn a pair into a local predicate; the server-side handler
//! turns it into parameters for the remote listing call.

mod client_side;
mod server_side;

pub use client_side::{ClientSideFilterFunc, ClientSideHandler};
pub use server_side::{single_filter, ServerSideFilterFunc, ServerSideFilters, ServerSideHandler};

use oq_core::PropEnum;

use crate::presets::QueryPresets;

/// Capability checks shared by every handler
pub trait HandlerBase<P: PropEnum> {
    /// True if this handler can serve `preset` for `prop`
    fn check_supported(&self, preset: QueryPresets, prop: P) -> bool;

    /// True if this handler has any mapping for `preset`
    fn preset_known(&self, preset: QueryPresets) -> bool;
}

/// Which properties a preset may be used with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropSupport<P> {
    /// Every property of the resource
    All,
    /// Only the listed properties
    Props(Vec<P>),
}

impl<P: PartialEq> PropSupport<P> {
    pub fn supports(&self, prop: &P) -> bool {
        match self {
            Self::All => true,
            Self::Props(props) => props.contains(prop),
        }
    }
}

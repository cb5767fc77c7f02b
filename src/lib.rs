mod client;
mod components;
mod config;
mod confirmation;
mod error;
mod gateway_component;
mod interop;
mod types;
mod widget;

pub use client::*;
pub use components::*;
pub use config::*;
pub use confirmation::*;
pub use error::*;
pub use gateway_component::*;
pub use interop::*;
pub use types::*;
pub use widget::*;

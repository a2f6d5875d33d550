//! Reusable HTML fragments.
//!
//! Plain functions returning markup strings; callers are responsible for
//! escaping text before it is passed in as content.
//!
//! - [`button()`]: button with variants
//! - [`card()`], [`titled_card`], [`stat_card`]: card containers
//! - [`badge()`]: small label
//! - icons: inline SVG icons

mod badge;
mod button;
mod card;
mod icons;

pub use badge::badge;
pub use button::{ButtonSize, ButtonVariant, button};
pub use card::{card, stat_card, titled_card};
pub use icons::*;

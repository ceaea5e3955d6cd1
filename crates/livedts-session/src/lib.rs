#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod debounce;
pub mod session;
pub mod surface;

pub use debounce::DebouncedTrigger;
pub use session::TypingsSession;
pub use surface::{ChangeListener, EditingSurface, Subscription};

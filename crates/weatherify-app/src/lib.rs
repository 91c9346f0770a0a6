//! Weatherify client application: state store, background services,
//! controller and the text view used by the `weatherify` binary.

pub mod controller;
pub mod services;
pub mod state;
pub mod view;

pub use controller::{Controller, Dispatch};
pub use state::{AppEvent, AppState, Store, WeatherSlice};
pub use view::{Action, Screen};

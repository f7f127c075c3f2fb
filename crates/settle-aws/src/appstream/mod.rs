//! Amazon AppStream 2.0

pub mod api;
pub mod finder;
pub mod fleet;
pub mod status;
pub mod types;
pub mod waiter;

pub use api::AppStreamApi;
pub use finder::find_fleet_by_name;
pub use fleet::{FLEET_RESOURCE_TYPE, FleetResource};
pub use status::fleet_state;
pub use types::{Fleet, FleetConfig, UpdateFleetInput};
pub use waiter::{fleet_state_running, fleet_state_stopped};

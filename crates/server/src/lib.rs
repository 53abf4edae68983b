pub mod errors;
pub mod openapi;
pub mod request_validation;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run;
pub use state::AppState;

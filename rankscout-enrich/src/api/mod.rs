//! HTTP API handlers for rankscout-enrich

pub mod health;
pub mod history;
pub mod results;
pub mod settings;
pub mod status;
pub mod upload;

pub use health::health_routes;
pub use history::history_routes;
pub use results::results_routes;
pub use settings::settings_routes;
pub use status::status_routes;
pub use upload::upload_routes;

pub mod common;
pub mod surface;

pub use common::common_routes_with_table;
pub use surface::surface_routes;

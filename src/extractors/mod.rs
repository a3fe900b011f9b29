pub mod request_args;

pub use request_args::RequestArgs;

//! CLI domain: parse, route and output only.
//! Route handlers stay thin; the work lives in dispatch and declaration.

mod output;
mod parse;
mod route;

pub use output::{format_invocation_json, format_invocation_text, map_error};
pub use parse::{Cli, Commands};
pub use route::RunContext;

pub mod bundler;
pub mod config;
pub mod error;
pub mod settings;
pub mod whitelist;

#[cfg(test)]
mod bundler_test;

pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod clock;
pub mod config;
pub mod harness;
pub mod logging;
pub mod sim;
pub mod timeline;

#[cfg(test)]
mod test;

//! Configuration helpers
//!
//! Typed readers for environment variables. Absent variables come back as
//! `None`; present but malformed ones are errors, so a typo in deployment
//! config fails loudly at startup.
//!
//! # Example
//!
//! ```rust,ignore
//! use tooling::config::{get_env_nonempty, get_env_parse};
//!
//! let host = get_env_nonempty("HOST")?;
//! let port: Option<u16> = get_env_parse("PORT")?;
//! ```

mod env;

pub use env::{get_env, get_env_list, get_env_nonempty, get_env_parse};

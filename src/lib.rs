//! Forest growth simulation
//!
//! Forests of trees are read from record files, then grown, cut, reaped,
//! saved and reloaded from an interactive menu.
//!
//! Layers, inner to outer:
//! - [`domain`]: trees, forests and the growth/reap rules
//! - [`application`]: record import and forest persistence
//! - [`infrastructure`]: filesystem and console boundaries, service wiring
//! - [`cli`]: arguments, commands and the interactive session

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

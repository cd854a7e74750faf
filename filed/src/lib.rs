// (c) 2024 Ross Younger

//! `filed` is a minimal TCP file-serving daemon.
//!
//! A client connects, sends a filename, and receives the contents of that file
//! from the server's root directory. It may then send another filename on the same
//! connection, and so on, until it closes the connection.
//! If the file does not exist (or is not one the server is willing to serve), the
//! client receives a short text message instead.
//!
//! ## 📖 Documentation
//!
//! * [The wire protocol](protocol)
//! * [Configuring filed](config)
//!
//! ## Overview
//! - 🗂️ Serves regular files from a single root directory, which defaults to the directory containing the executable
//! - 🔒 Requests are confined to the root: absolute paths and `..` are refused
//! - 🚀 Every client gets its own task; a slow client does not hold up anyone else
//! - 🧾 Connection and transfer activity is logged, with a per-connection identifier
//!
//! #### What filed is not
//!
//! * Secure. There is no authentication and no encryption. Run it only on networks you trust.
//! * A robust transfer protocol. Replies are not framed, so a client cannot tell where a file ends,
//!   nor distinguish a file whose contents happen to look like the error message from the error itself.
//! * A directory lister, uploader or resumable downloader.
//!
//! ## 🧰 Getting Started
//!
//! * Run `filed --root /some/directory`.
//! * From another machine, try `printf 'readme.txt' | nc -q1 server-host 27015`.
//! * See `filed --help` for the available options, and `filed --show-config` to check what will be used.
//!
//! ## Miscellanea
//!
//! #### MSRV policy
//!
//! As this is an application crate, the MSRV is not guaranteed to remain stable.
//! The MSRV may be upgraded from time to time to take advantage of new language features.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod cli;
pub use cli::cli as main;

pub mod config;
pub use config::Configuration;

pub mod protocol;
pub mod server;
pub use server::Server;
pub(crate) use server::server_main;
pub mod transfer;
pub mod util;

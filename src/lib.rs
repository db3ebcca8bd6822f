//! `igvcontrol` is a crate for stepping through a list of genomic variants and
//! driving a running [IGV](https://igv.org) to each of them through its
//! remote-control (batch) port.
//!
//! The crate provides two independent points of entry:
//!
//! - Reading variant coordinates from a file with [`Variants`].
//! - Sending commands to IGV with a [`Client`].
//!
//! The two only meet in the [`Variant`] coordinate pair: the former produces
//! them and the latter accepts them.
//!
//! ## Reading variants
//!
//! A [`Variants`] detects the format of a file when it is built and then
//! yields one [`Variant`] at a time. VCF files (plain or gzipped), tab-delimited
//! files, and spreadsheets are supported. See the [`variants`] module for the
//! details of how each format is detected and read.
//!
//! ```no_run
//! use igvcontrol::Variants;
//!
//! let variants = Variants::from_path("variants.vcf")?;
//! println!("format: {}", variants.format());
//!
//! for result in variants {
//!     let variant = result?;
//!     println!("{} {}", variant.chromosome(), variant.position());
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Driving IGV
//!
//! A [`Client`] opens a new connection for every command and closes it before
//! returning. A response other than the expected one is reported as `false`,
//! while an unreachable or unresponsive IGV is reported as a
//! [`client::TransportError`]. Because IGV regularly stalls, callers usually
//! want to tolerate timeouts on `goto` and `load` but report them for the
//! initial liveness check.
//!
//! ```no_run
//! use igvcontrol::Client;
//! use igvcontrol::Variants;
//!
//! let client = Client::default();
//!
//! if !client.is_alive()? {
//!     eprintln!("IGV is not answering on {}:{}", client.host(), client.port());
//! }
//!
//! for result in Variants::from_path("variants.tab")? {
//!     let variant = result?;
//!
//!     match client.goto_variant(&variant) {
//!         Ok(true) => println!("{variant}"),
//!         Ok(false) => eprintln!("IGV declined {variant}"),
//!         Err(err) => eprintln!("{variant}: {err}"),
//!     }
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod client;
pub mod variant;
pub mod variants;

pub use client::Client;
pub use variant::Variant;
pub use variants::Variants;

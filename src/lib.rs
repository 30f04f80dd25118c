//! A pedagogical [RSA](https://en.wikipedia.org/wiki/RSA_(cryptosystem)) toolkit.
//!
//! The crate shows how RSA is constructed from primes, totients and modular
//! inverses, and how real key files (as produced by common SSH tooling) are
//! laid out on disk. It generates key pairs, reads and writes PKCS#1 PEM and
//! SSH public key formats, and runs textbook (unpadded) RSA over arbitrary
//! byte streams in a small framed envelope.
//!
//! This is **not** a crypto library _(don't roll your own crypto!)_: there
//! is no padding scheme, no constant-time arithmetic and no side-channel
//! hygiene. It exists to make the moving parts visible.
//!
//! The `keygen`, `encrypt` and `decrypt` binaries are thin shells over
//! [`workflow`].

#![deny(clippy::correctness)]
#![warn(clippy::style)]
#![warn(clippy::complexity)]
#![warn(clippy::perf)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::use_self)] // Not sure about this :/
#![allow(clippy::unreadable_literal)] // I don't like it on hex magic constants
#![allow(clippy::doc_markdown)] // Too many false positives, not very smart
#![allow(clippy::module_name_repetitions)] // Anti-pattern IMHO

pub mod envelope;
pub mod error;
pub mod keys;
pub mod rand;
pub mod rsa;
pub mod workflow;

pub use error::{Error, Result};

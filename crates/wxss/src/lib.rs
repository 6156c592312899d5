//! # WXSS - Mini-app stylesheet front end
//!
//! A Rust reader for WXSS, the CSS dialect used by mini-app packages.
//! WXSS is ordinary CSS plus the `rpx` device-relative length unit, where
//! `750rpx` always spans the full screen width.
//!
//! This crate provides:
//!
//! - **Parsing**: Convert stylesheet text into a [`Root`](parser::Root) tree of
//!   rules, declarations, at-rules and comments, each with its source span
//! - **Units**: Locate `rpx` literals inside declaration values
//! - **Selectors**: Rewrite bare type selectors for custom element names
//!
//! The tree keeps raw text (selectors, the separator after a property name,
//! the important marker as written) so a compiler can reproduce the source
//! closely while rewriting only what it must.
//!
//! ## Quick Start
//!
//! ```rust
//! use wxss::parser::{parse_stylesheet, Node};
//!
//! let source = r#"
//!     @import "common.wxss";
//!
//!     .card {
//!         width: 690rpx;
//!         color: red !important;
//!     }
//! "#;
//!
//! let root = parse_stylesheet(source).expect("valid WXSS");
//! assert_eq!(root.nodes.len(), 2);
//! assert!(matches!(&root.nodes[0], Node::AtRule(at) if at.name == "import"));
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: Parsing and source tree data structures
//! - [`error`]: Error types for parsing failures

pub mod error;
pub mod parser;

pub use error::{ParseError, SyntaxError};
pub use parser::parse_stylesheet;

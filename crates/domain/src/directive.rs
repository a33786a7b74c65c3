//! The `intercept` directive language.
//!
//! ```text
//! intercept [zone ...] {
//!     record <ttl> <class> <type|*> <answer>+ [net (<cidr>|*)+]
//! }
//! ```
mod lexer;
mod parser;

pub use parser::{parse_directives, DIRECTIVE_NAME};

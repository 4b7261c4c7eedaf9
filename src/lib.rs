//! A flag set with extra value kinds and named positional arguments.
//!
//! Flags are registered on a [`FlagSet`] and parsed from `-name value`,
//! `-name=value` or `--name value` tokens. Parsing stops at the first
//! non-flag argument. If a [`Positional`] parser is attached, the remaining
//! arguments are assigned to named slots described by an order template:
//!
//! ```
//! use posflag::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut flags = FlagSet::new("cp", ErrorHandling::ContinueOnError);
//!     flags.bool("v", false, "verbose")?;
//!     flags
//!         .positional()
//!         .string("src", "", "source file")?
//!         .strings("dst", "destination files")?
//!         .set_order("src [dst...]");
//!     let args = ["-v", "a", "b", "c"].iter().map(|s| s.to_string());
//!     flags.parse(args)?;
//!     assert_eq!(flags.get_bool("v"), Some(true));
//!     let positional = flags.positional();
//!     assert_eq!(positional.get_str("src"), Some("a"));
//!     assert_eq!(positional.get_strings("dst"), Some(&["b".to_string(), "c".to_string()][..]));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod flag_set;
pub mod help;
pub mod low_level;
pub mod order;
pub mod positional;
pub mod value;

pub use error::{MissingRequired, ParseError, SpecError, ValueError};
pub use flag_set::{ErrorHandling, FlagSet, Flags};
pub use help::Usage;
pub use low_level::Flag;
pub use order::{OrderSpec, Slot};
pub use positional::{interleave, validate, Positional};
pub use value::{FlagValue, Input, Output, Value};

pub mod prelude {
    pub use super::{ErrorHandling, FlagSet, Flags, Positional, Value};
}

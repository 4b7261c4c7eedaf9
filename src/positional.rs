//! Named positional arguments.
//!
//! A [`Positional`] parser owns its own flag table, one flag per slot. Bare
//! tokens are rewritten into `-slot token` pairs by [`interleave`] so that the
//! flag table consumes them exactly as if they had been typed as flags, and
//! [`validate`] then checks that every required slot was assigned.

use crate::error::{MissingRequired, ParseError};
use crate::flag_set::Flags;
use crate::low_level::LowLevelParser;
use crate::order::OrderSpec;
use std::collections::HashSet;
use tracing::debug;

/// Rewrites positional `values` into a stream of `-name value` pairs following
/// `order`.
///
/// A repeating slot keeps its name for every remaining value. Values past the
/// last declared slot are emitted without a name. The flag table stops at the
/// first of them and hands it and everything after it back as unconsumed
/// arguments, unless that first value is itself flag-shaped (`-y`), in which
/// case it is parsed as a flag and usually fails as an unknown name.
pub fn interleave(values: &[String], order: &OrderSpec) -> Vec<String> {
    let mut args = Vec::with_capacity(2 * values.len());
    let mut i = 0;
    for (j, value) in values.iter().enumerate() {
        if let Some(name) = order.slot_name(i) {
            args.push(format!("-{}", name));
        }
        args.push(value.clone());
        let last_value = j + 1 == values.len();
        let last_slot = i + 1 == order.len();
        if (last_value && last_slot) || !order.is_repeating(i) {
            i += 1;
        }
    }
    args
}

/// Returns the first required slot of `order`, in declaration order, whose
/// name is missing from `set`.
pub fn validate(set: &HashSet<String>, order: &OrderSpec) -> Result<(), MissingRequired> {
    match order.required().find(|name| !set.contains(*name)) {
        Some(slot) => Err(MissingRequired {
            slot: slot.to_string(),
        }),
        None => Ok(()),
    }
}

/// Parser for the positional tail of a command line.
#[derive(Debug, Default)]
pub struct Positional {
    low_level: LowLevelParser,
    template: Option<String>,
    rest: Vec<String>,
}

impl Positional {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order template, e.g. `"src [dst...]"`.
    pub fn set_order<S: AsRef<str>>(&mut self, template: S) -> &mut Self {
        self.template = Some(template.as_ref().to_string());
        self
    }

    /// The slots this parser assigns, built from the template if one was set
    /// and is non-empty, otherwise from the registered flags in registration
    /// order.
    pub fn order_spec(&self) -> OrderSpec {
        let order = self
            .template
            .as_deref()
            .map(OrderSpec::parse)
            .unwrap_or_default();
        if order.is_empty() {
            OrderSpec::from_names(self.low_level.flags().iter().map(|flag| &flag.name))
        } else {
            order
        }
    }

    pub fn parse<A: IntoIterator<Item = String>>(&mut self, args: A) -> Result<(), ParseError> {
        let order = self.order_spec();
        let values = args.into_iter().collect::<Vec<_>>();
        let synthetic = interleave(&values, &order);
        debug!(order = %order, args = ?synthetic, "interleaved positional arguments");
        self.rest.clear();
        self.rest = self.low_level.parse(synthetic)?;
        let set = self
            .low_level
            .visited()
            .map(|flag| flag.name.clone())
            .collect::<HashSet<_>>();
        validate(&set, &order).map_err(|missing| {
            debug!(slot = %missing.slot, "required positional argument missing");
            missing
        })?;
        Ok(())
    }

    /// Values past the declared slots, left over by the last parse.
    pub fn rest(&self) -> &[String] {
        &self.rest
    }
}

impl Flags for Positional {
    fn low_level(&self) -> &LowLevelParser {
        &self.low_level
    }

    fn low_level_mut(&mut self) -> &mut LowLevelParser {
        &mut self.low_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_ascii_whitespace().map(String::from).collect()
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_interleave_single_slots() {
        let order = OrderSpec::parse("a b c");
        assert_eq!(
            interleave(&args("x y z"), &order),
            args("-a x -b y -c z")
        );
    }

    #[test]
    fn test_interleave_repeating_absorbs_rest() {
        let order = OrderSpec::parse("a...");
        assert_eq!(interleave(&args("x y z"), &order), args("-a x -a y -a z"));
        let order = OrderSpec::parse("a [b...]");
        assert_eq!(interleave(&args("x y z"), &order), args("-a x -b y -b z"));
    }

    #[test]
    fn test_interleave_tail_is_bare() {
        let order = OrderSpec::parse("a [b]");
        assert_eq!(interleave(&args("x y z w"), &order), args("-a x -b y z w"));
    }

    #[test]
    fn test_interleave_repeating_before_single() {
        // a repeating slot that is not last never gives way to later slots
        let order = OrderSpec::parse("a... b");
        assert_eq!(interleave(&args("x y"), &order), args("-a x -a y"));
    }

    #[test]
    fn test_interleave_empty() {
        assert!(interleave(&[], &OrderSpec::parse("a")).is_empty());
        assert_eq!(interleave(&args("x"), &OrderSpec::default()), args("x"));
    }

    #[test]
    fn test_validate_first_missing_in_declaration_order() {
        let order = OrderSpec::parse("a [b] c d");
        assert_eq!(
            validate(&set(&["a"]), &order),
            Err(MissingRequired { slot: "c".into() })
        );
        for _ in 0..16 {
            assert_eq!(
                validate(&set(&[]), &order),
                Err(MissingRequired { slot: "a".into() })
            );
        }
        assert_eq!(validate(&set(&["a", "c", "d"]), &order), Ok(()));
    }

    #[test]
    fn test_order_spec_falls_back_to_flags() {
        let mut p = Positional::new();
        p.string("foo", "", "").unwrap();
        p.string("bar", "", "").unwrap();
        assert_eq!(p.order_spec(), OrderSpec::from_names(["foo", "bar"]));
        p.set_order("");
        assert_eq!(p.order_spec(), OrderSpec::from_names(["foo", "bar"]));
        p.set_order("[bar] foo");
        assert_eq!(p.order_spec(), OrderSpec::parse("[bar] foo"));
    }

    #[test]
    fn test_parse_rest() -> Result<(), ParseError> {
        let mut p = Positional::new();
        p.string("a", "", "").unwrap();
        p.set_order("a");
        p.parse(args("x y z"))?;
        assert_eq!(p.get_str("a"), Some("x"));
        assert_eq!(p.rest(), args("y z").as_slice());
        Ok(())
    }

    #[test]
    fn test_parse_unknown_slot_flag() {
        let mut p = Positional::new();
        p.set_order("ghost");
        assert!(matches!(
            p.parse(args("x")),
            Err(ParseError::UnknownName(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_parse_reuse_recomputes_set() {
        let mut p = Positional::new();
        p.string("a", "", "").unwrap();
        p.string("b", "", "").unwrap();
        p.parse(args("x y")).unwrap();
        let err = p.parse(args("z")).unwrap_err();
        assert_eq!(err.missing_slot(), Some("b"));
    }

    #[test]
    fn test_failed_parse_clears_rest() {
        let mut p = Positional::new();
        p.string("a", "", "").unwrap();
        p.set_order("a");
        p.parse(args("x y z")).unwrap();
        assert_eq!(p.rest(), args("y z").as_slice());
        assert!(p.parse(args("x -y")).is_err());
        assert!(p.rest().is_empty());
    }

    #[test]
    fn test_flag_shaped_tail_is_parsed() {
        let mut p = Positional::new();
        p.string("a", "", "").unwrap();
        p.set_order("a");
        assert!(matches!(
            p.parse(args("x -y")),
            Err(ParseError::UnknownName(name)) if name == "y"
        ));
        p.parse(args("x y -z")).unwrap();
        assert_eq!(p.rest(), args("y -z").as_slice());
    }
}

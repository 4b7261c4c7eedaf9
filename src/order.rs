//! The grammar of positional slots.
//!
//! An order template is a whitespace separated list of slot tokens:
//!
//! | token       | meaning                |
//! |-------------|------------------------|
//! | `name`      | required, single value |
//! | `[name]`    | optional, single value |
//! | `name...`   | required, repeating    |
//! | `[name...]` | optional, repeating    |

use std::fmt;

const OPEN: &str = "[";
const CLOSE: &str = "]";
const ELLIPSIS: &str = "...";

/// One declared position in the positional grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: String,
    pub optional: bool,
    pub repeating: bool,
}

impl Slot {
    pub fn parse(token: &str) -> Self {
        let optional = token.starts_with(OPEN) && token.ends_with(CLOSE);
        let stripped = token.strip_prefix(OPEN).unwrap_or(token);
        let stripped = stripped.strip_suffix(CLOSE).unwrap_or(stripped);
        let name = stripped.strip_suffix(ELLIPSIS);
        Self {
            name: name.unwrap_or(stripped).to_string(),
            optional,
            repeating: name.is_some(),
        }
    }

    /// A slot for a flag that was registered without a template.
    pub fn required<S: AsRef<str>>(name: S) -> Self {
        Self {
            name: name.as_ref().to_string(),
            optional: false,
            repeating: false,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ellipsis = if self.repeating { ELLIPSIS } else { "" };
        if self.optional {
            write!(f, "{}{}{}{}", OPEN, self.name, ellipsis, CLOSE)
        } else {
            write!(f, "{}{}", self.name, ellipsis)
        }
    }
}

/// The ordered slots of a positional parser. Declaration order is
/// consumption order.
///
/// Indices past the last declared slot belong to an implicit tail slot that
/// is both optional and repeating and has no name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    slots: Vec<Slot>,
}

impl OrderSpec {
    pub fn parse(template: &str) -> Self {
        Self {
            slots: template.split_whitespace().map(Slot::parse).collect(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            slots: names.into_iter().map(Slot::required).collect(),
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot_name(&self, i: usize) -> Option<&str> {
        self.slots.get(i).map(|slot| slot.name.as_str())
    }

    pub fn is_optional(&self, i: usize) -> bool {
        self.slots.get(i).map_or(true, |slot| slot.optional)
    }

    pub fn is_repeating(&self, i: usize) -> bool {
        self.slots.get(i).map_or(true, |slot| slot.repeating)
    }

    /// Names of the non-optional slots, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|slot| !slot.optional)
            .map(|slot| slot.name.as_str())
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", slot)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(name: &str, optional: bool, repeating: bool) -> Slot {
        Slot {
            name: name.to_string(),
            optional,
            repeating,
        }
    }

    #[test]
    fn test_markers() {
        let order = OrderSpec::parse("src [dst] files... [rest...]");
        assert_eq!(
            order.slots(),
            &[
                slot("src", false, false),
                slot("dst", true, false),
                slot("files", false, true),
                slot("rest", true, true),
            ]
        );
        assert_eq!(order.required().collect::<Vec<_>>(), ["src", "files"]);
    }

    #[test]
    fn test_unbalanced_bracket_is_not_optional() {
        assert_eq!(Slot::parse("[name"), slot("name", false, false));
        assert_eq!(Slot::parse("name...]"), slot("name", false, true));
    }

    #[test]
    fn test_implicit_tail() {
        let order = OrderSpec::parse("a");
        assert!(!order.is_optional(0));
        assert!(!order.is_repeating(0));
        assert!(order.is_optional(1));
        assert!(order.is_repeating(1));
        assert_eq!(order.slot_name(1), None);
    }

    #[test]
    fn test_deterministic() {
        let template = "a [b] c... [d...]";
        assert_eq!(OrderSpec::parse(template), OrderSpec::parse(template));
    }

    #[test]
    fn test_display_round_trips_template() {
        let template = "src [dst] files... [rest...]";
        assert_eq!(OrderSpec::parse(template).to_string(), template);
    }

    #[test]
    fn test_extra_whitespace() {
        let order = OrderSpec::parse("  a   [b] ");
        assert_eq!(order.len(), 2);
        assert!(OrderSpec::parse("").is_empty());
    }

    #[test]
    fn test_from_names() {
        let order = OrderSpec::from_names(["foo", "bar"]);
        assert_eq!(
            order.slots(),
            &[slot("foo", false, false), slot("bar", false, false)]
        );
    }
}

//! Pattern rules - regex plus handler, dispatched in registration order
//!
//! A [`PatternRule`] pairs a compiled pattern over one line of text with a handler that
//! turns the captures into an [`Event`]. A [`RuleSet`] evaluates its rules strictly in
//! the order they were added and stops at the first match, so overlapping rules must be
//! registered from most to least specific.
//!
//! The same shape serves the broadcast classifier and the external log dispatcher: the
//! dispatcher passes a running chain id, the classifier passes none.
//!
//! ```
//! use squad_rcon_core::rule::{Dispatch, PatternRule, RuleMatch, RuleSet, EventSink};
//! use squad_rcon_core::types::EventKind;
//!
//! fn on_restart(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
//!     sink.emit(m.event().with_field("reason", m.text(1)));
//! }
//!
//! let rules = RuleSet::new().with(
//!     PatternRule::new("restart", EventKind::Other("RESTART".into()), r"^Restarting: (.*)$", on_restart)
//!         .unwrap(),
//! );
//!
//! let mut events = Vec::new();
//! let outcome = rules.dispatch("Restarting: patch", None, &mut events);
//! assert_eq!(outcome, Dispatch::Matched { rule: "restart", index: 0 });
//! assert_eq!(events[0].field("reason"), Some("patch"));
//! ```

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};

use crate::types::{Event, EventKind};

/// Receives events emitted by rule handlers.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Keeps the first emitted event.
impl EventSink for Option<Event> {
    fn emit(&mut self, event: Event) {
        if self.is_none() {
            *self = Some(event);
        }
    }
}

/// Captures and context handed to a rule handler.
#[derive(Debug)]
pub struct RuleMatch<'t> {
    line: &'t str,
    captures: Captures<'t>,
    kind: &'t EventKind,
    chain_id: Option<u64>,
    time: DateTime<Utc>,
}

impl<'t> RuleMatch<'t> {
    /// The full source line.
    pub fn line(&self) -> &'t str {
        self.line
    }

    /// The text matched by the whole pattern (capture group 0).
    pub fn matched(&self) -> &'t str {
        self.text(0)
    }

    /// Capture group by index; `None` when the group did not participate.
    pub fn get(&self, index: usize) -> Option<&'t str> {
        self.captures.get(index).map(|m| m.as_str())
    }

    /// Capture group by name; `None` when absent.
    pub fn name(&self, name: &str) -> Option<&'t str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    /// Capture group by index, empty when it did not participate.
    pub fn text(&self, index: usize) -> &'t str {
        self.get(index).unwrap_or("")
    }

    /// Chain id supplied by the dispatcher, if any.
    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn kind(&self) -> &EventKind {
        self.kind
    }

    /// Start an event of the rule's kind with `raw` and `time` filled in.
    pub fn event(&self) -> Event {
        Event::new(self.kind.clone(), self.line(), self.time)
    }
}

/// Handler invoked with the captures of a matching line.
pub type RuleHandler = fn(&RuleMatch<'_>, &mut dyn EventSink);

/// One regex plus handler.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    kind: EventKind,
    pattern: Regex,
    handler: RuleHandler,
}

impl PatternRule {
    /// Compile a rule.
    ///
    /// # Errors
    ///
    /// Returns the regex error when `pattern` does not compile.
    pub fn new(
        name: impl Into<String>,
        kind: EventKind,
        pattern: &str,
        handler: RuleHandler,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            kind,
            pattern: Regex::new(pattern)?,
            handler,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Run the handler if the pattern matches `line`. Returns whether it matched.
    pub fn apply(
        &self,
        line: &str,
        chain_id: Option<u64>,
        time: DateTime<Utc>,
        sink: &mut dyn EventSink,
    ) -> bool {
        let Some(captures) = self.pattern.captures(line) else {
            return false;
        };
        let m = RuleMatch {
            line,
            captures,
            kind: &self.kind,
            chain_id,
            time,
        };
        (self.handler)(&m, sink);
        true
    }
}

/// Outcome of dispatching one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'r> {
    /// The rule at `index` matched and ran; later rules were not consulted.
    Matched { rule: &'r str, index: usize },
    /// No rule matched. Not an error.
    NoMatch,
}

impl Dispatch<'_> {
    pub fn is_match(&self) -> bool {
        matches!(self, Dispatch::Matched { .. })
    }
}

/// Ordered rule registry. Read-only once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule (builder style).
    pub fn with(mut self, rule: PatternRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: PatternRule) {
        self.rules.push(rule);
    }

    /// Append every rule of `other` after the rules already registered.
    pub fn extend(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter()
    }

    /// Dispatch `line`, stamping events with the current time.
    pub fn dispatch(
        &self,
        line: &str,
        chain_id: Option<u64>,
        sink: &mut dyn EventSink,
    ) -> Dispatch<'_> {
        self.dispatch_at(line, chain_id, Utc::now(), sink)
    }

    /// Dispatch `line` with an explicit parse time.
    pub fn dispatch_at(
        &self,
        line: &str,
        chain_id: Option<u64>,
        time: DateTime<Utc>,
        sink: &mut dyn EventSink,
    ) -> Dispatch<'_> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.apply(line, chain_id, time, sink) {
                tracing::debug!(rule = rule.name(), kind = %rule.kind(), "matched line");
                return Dispatch::Matched {
                    rule: rule.name(),
                    index,
                };
            }
        }
        Dispatch::NoMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_plain(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
        sink.emit(m.event().with_field("g1", m.text(1)));
    }

    fn rule(name: &str, pattern: &str) -> PatternRule {
        PatternRule::new(name, EventKind::Other(name.to_uppercase()), pattern, emit_plain).unwrap()
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = RuleSet::new()
            .with(rule("specific", r"^Kicked player (\d+)"))
            .with(rule("general", r"^Kicked (.*)"));

        let mut sink = Vec::new();
        let outcome = rules.dispatch("Kicked player 7", None, &mut sink);
        assert_eq!(outcome, Dispatch::Matched { rule: "specific", index: 0 });
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind, EventKind::Other("SPECIFIC".into()));
        assert_eq!(sink[0].field("g1"), Some("7"));
    }

    #[test]
    fn test_order_is_significant() {
        let rules = RuleSet::new()
            .with(rule("general", r"^Kicked (.*)"))
            .with(rule("specific", r"^Kicked player (\d+)"));

        let mut sink = Vec::new();
        let outcome = rules.dispatch("Kicked player 7", None, &mut sink);
        assert_eq!(outcome, Dispatch::Matched { rule: "general", index: 0 });
        assert_eq!(sink[0].field("g1"), Some("player 7"));
    }

    #[test]
    fn test_no_match_emits_nothing() {
        let rules = RuleSet::new().with(rule("a", r"^A$"));
        let mut sink: Option<Event> = None;
        let outcome = rules.dispatch("B", Some(3), &mut sink);
        assert_eq!(outcome, Dispatch::NoMatch);
        assert!(!outcome.is_match());
        assert!(sink.is_none());
    }

    #[test]
    fn test_handler_sees_chain_id_and_time() {
        fn with_chain(m: &RuleMatch<'_>, sink: &mut dyn EventSink) {
            let mut ev = m.event();
            ev.chain_id = m.chain_id();
            sink.emit(ev);
        }
        let rules = RuleSet::new()
            .with(PatternRule::new("c", EventKind::FragDetonates, r"boom", with_chain).unwrap());
        let time = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let mut sink = Vec::new();
        rules.dispatch_at("a boom here", Some(42), time, &mut sink);
        assert_eq!(sink[0].chain_id, Some(42));
        assert_eq!(sink[0].time, time);
        assert_eq!(sink[0].raw, "a boom here");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        assert!(PatternRule::new("bad", EventKind::ChatMessage, r"(", emit_plain).is_err());
    }

    #[test]
    fn test_extend_appends_after_existing_rules() {
        let mut rules = RuleSet::new().with(rule("a", "a"));
        rules.extend(RuleSet::new().with(rule("b", "b")));
        let names: Vec<_> = rules.iter().map(PatternRule::name).collect();
        assert_eq!(names, ["a", "b"]);
    }
}

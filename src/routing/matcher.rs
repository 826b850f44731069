//! Predicate tree and matcher list evaluation.
//!
//! # Responsibilities
//! - Compile `single_predicate` / `and_matcher` / `or_matcher` documents into a [`Predicate`]
//! - Compile matcher lists into a [`MatchTree`] whose leaves hold route actions
//! - Evaluate both against a request
//!
//! # Design Decisions
//! - Data inputs are resolved by name at build time; unknown names reject the config
//! - Absent attribute = no match
//! - And/Or evaluate in declaration order and short-circuit
//! - First matching field matcher wins; `on_no_match` is the fallback
//! - Leaves hold an `Arc<RouteMatchAction>` built once, so every match returns the same instance

use std::sync::Arc;

use crate::config::schema::{
    FieldMatcherConfig, MatcherConfig, OnMatchConfig, PredicateConfig, SinglePredicateConfig,
    ValueMatchConfig,
};
use crate::request::StreamRequest;
use crate::routing::entry::{RouteEntry, RouteMatchAction, ROUTE_ACTION};
use crate::routing::error::RouteConfigError;
use crate::routing::input::DataInput;
use crate::routing::registry::Extensions;

/// Inputs shared by every build step of one route configuration.
#[derive(Clone, Copy)]
pub(crate) struct BuildContext<'a> {
    pub extensions: &'a Extensions,
    pub route_config_name: &'a str,
}

impl BuildContext<'_> {
    fn route(&self) -> String {
        self.route_config_name.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StringPattern {
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
}

/// Matches an extracted string value.
#[derive(Debug, Clone)]
pub struct StringMatcher {
    pattern: StringPattern,
    ignore_case: bool,
}

impl StringMatcher {
    pub fn exact(value: impl Into<String>) -> Self {
        Self {
            pattern: StringPattern::Exact(value.into()),
            ignore_case: false,
        }
    }

    fn from_config(
        config: &ValueMatchConfig,
        ctx: BuildContext<'_>,
    ) -> Result<Self, RouteConfigError> {
        let invalid = |reason: String| RouteConfigError::InvalidValueMatcher {
            reason,
            route: ctx.route(),
        };

        let set: Vec<(&str, &str)> = [
            ("exact", &config.exact),
            ("prefix", &config.prefix),
            ("suffix", &config.suffix),
            ("contains", &config.contains),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.as_deref().map(|value| (kind, value)))
        .collect();

        let (kind, value) = match set.as_slice() {
            [single] => *single,
            [] => {
                return Err(invalid(
                    "one of exact, prefix, suffix or contains is required".into(),
                ))
            }
            _ => {
                let kinds: Vec<&str> = set.iter().map(|(kind, _)| *kind).collect();
                return Err(invalid(format!(
                    "only one pattern may be set, found {}",
                    kinds.join(", ")
                )));
            }
        };

        if kind != "exact" && value.is_empty() {
            return Err(invalid(format!("{} pattern must not be empty", kind)));
        }
        let value = if config.ignore_case {
            value.to_lowercase()
        } else {
            value.to_string()
        };

        let pattern = match kind {
            "exact" => StringPattern::Exact(value),
            "prefix" => StringPattern::Prefix(value),
            "suffix" => StringPattern::Suffix(value),
            _ => StringPattern::Contains(value),
        };

        Ok(Self {
            pattern,
            ignore_case: config.ignore_case,
        })
    }

    pub fn matches(&self, value: &str) -> bool {
        let lowered;
        let value = if self.ignore_case {
            lowered = value.to_lowercase();
            lowered.as_str()
        } else {
            value
        };

        match &self.pattern {
            StringPattern::Exact(expected) => value == expected,
            StringPattern::Prefix(prefix) => value.starts_with(prefix.as_str()),
            StringPattern::Suffix(suffix) => value.ends_with(suffix.as_str()),
            StringPattern::Contains(needle) => value.contains(needle.as_str()),
        }
    }
}

/// A data input paired with a value matcher.
#[derive(Debug)]
pub struct SinglePredicate {
    input: Box<dyn DataInput>,
    matcher: StringMatcher,
}

impl SinglePredicate {
    pub fn new(input: Box<dyn DataInput>, matcher: StringMatcher) -> Self {
        Self { input, matcher }
    }

    fn from_config(
        config: &SinglePredicateConfig,
        ctx: BuildContext<'_>,
    ) -> Result<Self, RouteConfigError> {
        let name = &config.input.name;
        let factory = ctx.extensions.data_input(name).ok_or_else(|| {
            RouteConfigError::UnknownDataInput {
                input: name.clone(),
                route: ctx.route(),
            }
        })?;
        let input = factory
            .create_data_input(&config.input.typed_config)
            .map_err(|source| RouteConfigError::InvalidDataInput {
                input: name.clone(),
                route: ctx.route(),
                source,
            })?;

        Ok(Self::new(input, StringMatcher::from_config(&config.value_match, ctx)?))
    }

    pub fn evaluate(&self, request: &dyn StreamRequest) -> bool {
        self.input
            .get(request)
            .map(|value| self.matcher.matches(value))
            .unwrap_or(false)
    }
}

/// Boolean expression over request attributes.
#[derive(Debug)]
pub enum Predicate {
    Single(SinglePredicate),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub(crate) fn from_config(
        config: &PredicateConfig,
        ctx: BuildContext<'_>,
    ) -> Result<Self, RouteConfigError> {
        let build_all = |list: &[PredicateConfig]| {
            list.iter()
                .map(|p| Predicate::from_config(p, ctx))
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(match config {
            PredicateConfig::SinglePredicate(single) => {
                Predicate::Single(SinglePredicate::from_config(single, ctx)?)
            }
            PredicateConfig::AndMatcher(list) => Predicate::And(build_all(&list.predicate)?),
            PredicateConfig::OrMatcher(list) => Predicate::Or(build_all(&list.predicate)?),
        })
    }

    pub fn evaluate(&self, request: &dyn StreamRequest) -> bool {
        match self {
            Predicate::Single(single) => single.evaluate(request),
            // Empty And is vacuously true, empty Or vacuously false.
            Predicate::And(children) => children.iter().all(|p| p.evaluate(request)),
            Predicate::Or(children) => children.iter().any(|p| p.evaluate(request)),
        }
    }
}

/// What happens when a predicate holds.
#[derive(Debug)]
pub enum OnMatch {
    Action(Arc<RouteMatchAction>),
    Matcher(Box<MatchTree>),
}

impl OnMatch {
    fn from_config(
        config: &OnMatchConfig,
        ctx: BuildContext<'_>,
    ) -> Result<Self, RouteConfigError> {
        match config {
            OnMatchConfig::Action(action) => {
                if let Some(name) = action.name.as_deref() {
                    if name != ROUTE_ACTION {
                        return Err(RouteConfigError::UnknownAction {
                            action: name.to_string(),
                            route: ctx.route(),
                        });
                    }
                }
                let entry = RouteEntry::new(
                    &action.typed_config,
                    ctx.extensions,
                    ctx.route_config_name,
                )?;
                Ok(OnMatch::Action(Arc::new(RouteMatchAction::new(Arc::new(entry)))))
            }
            OnMatchConfig::Matcher(matcher) => {
                Ok(OnMatch::Matcher(Box::new(MatchTree::from_config(matcher, ctx)?)))
            }
        }
    }

    fn resolve(&self, request: &dyn StreamRequest) -> Option<&Arc<RouteMatchAction>> {
        match self {
            OnMatch::Action(action) => Some(action),
            OnMatch::Matcher(matcher) => matcher.evaluate(request),
        }
    }
}

#[derive(Debug)]
pub struct FieldMatcher {
    predicate: Predicate,
    on_match: OnMatch,
}

impl FieldMatcher {
    pub fn new(predicate: Predicate, on_match: OnMatch) -> Self {
        Self { predicate, on_match }
    }

    fn from_config(
        config: &FieldMatcherConfig,
        ctx: BuildContext<'_>,
    ) -> Result<Self, RouteConfigError> {
        Ok(Self::new(
            Predicate::from_config(&config.predicate, ctx)?,
            OnMatch::from_config(&config.on_match, ctx)?,
        ))
    }
}

/// Ordered matcher list with an optional fallback.
#[derive(Debug)]
pub struct MatchTree {
    matchers: Vec<FieldMatcher>,
    on_no_match: Option<OnMatch>,
}

impl MatchTree {
    pub fn new(matchers: Vec<FieldMatcher>, on_no_match: Option<OnMatch>) -> Self {
        Self {
            matchers,
            on_no_match,
        }
    }

    pub(crate) fn from_config(
        config: &MatcherConfig,
        ctx: BuildContext<'_>,
    ) -> Result<Self, RouteConfigError> {
        let matchers = config
            .matcher_list
            .matchers
            .iter()
            .map(|m| FieldMatcher::from_config(m, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        let on_no_match = config
            .on_no_match
            .as_deref()
            .map(|m| OnMatch::from_config(m, ctx))
            .transpose()?;

        Ok(Self::new(matchers, on_no_match))
    }

    /// Returns the action of the first field matcher that holds.
    /// A nested matcher that yields nothing falls through to the next entry.
    pub fn evaluate(&self, request: &dyn StreamRequest) -> Option<&Arc<RouteMatchAction>> {
        self.matchers
            .iter()
            .filter(|m| m.predicate.evaluate(request))
            .find_map(|m| m.on_match.resolve(request))
            .or_else(|| {
                self.on_no_match
                    .as_ref()
                    .and_then(|on_no_match| on_no_match.resolve(request))
            })
    }
}

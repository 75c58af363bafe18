//! Ordered set of OData system query options (`$top`, `$filter`, ...) and
//! custom parameters, serialized as a URL query string.
//!
//! Values are written verbatim; nothing is percent-encoded.

use std::fmt::{self, Display};

use itertools::Itertools;
use serde_json::Value;

use crate::config::{Dialect, FilterConfig};
use crate::parser::{parse_with, ParseError};
use crate::predicate::{Literal, Predicate};
use crate::render::render_with;

const TOP: &str = "$top";
const SKIP: &str = "$skip";
const ORDER_BY: &str = "$orderby";
const EXPAND: &str = "$expand";
const SELECT: &str = "$select";
const FILTER: &str = "$filter";
const INLINE_COUNT: &str = "$inlinecount";

const ALL_PAGES: &str = "allpages";

/// Contents of the `$filter` option
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A filter string passed through unchanged
    Text(String),
    /// A predicate rendered when the query string is built
    Predicate(Predicate),
}

impl Filter {
    /// Filter text in the given dialect
    pub fn render(&self, dialect: Dialect) -> String {
        match self {
            Filter::Text(s) => s.clone(),
            Filter::Predicate(p) => render_with(p, dialect),
        }
    }

    /// The filter as a predicate tree, parsing text filters with `config`
    pub fn to_predicate(&self, config: &FilterConfig) -> Result<Predicate, ParseError> {
        match self {
            Filter::Text(s) => parse_with(s, config),
            Filter::Predicate(p) => Ok(p.clone()),
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            Filter::Text(s) => !s.is_empty(),
            Filter::Predicate(_) => true,
        }
    }
}

impl From<&str> for Filter {
    fn from(s: &str) -> Self {
        Filter::Text(s.to_string())
    }
}

impl From<String> for Filter {
    fn from(s: String) -> Self {
        Filter::Text(s)
    }
}

impl From<Predicate> for Filter {
    fn from(p: Predicate) -> Self {
        Filter::Predicate(p)
    }
}

/// Property names for `$select` and `$expand`, joined with `,`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyList(Vec<String>);

impl PropertyList {
    fn joined(&self) -> Option<String> {
        if self.0.is_empty() || self.0.iter().any(String::is_empty) {
            None
        } else {
            Some(self.0.join(","))
        }
    }
}

impl From<&str> for PropertyList {
    fn from(s: &str) -> Self {
        PropertyList(vec![s.to_string()])
    }
}

impl From<String> for PropertyList {
    fn from(s: String) -> Self {
        PropertyList(vec![s])
    }
}

impl From<Vec<String>> for PropertyList {
    fn from(v: Vec<String>) -> Self {
        PropertyList(v)
    }
}

impl From<Vec<&str>> for PropertyList {
    fn from(v: Vec<&str>) -> Self {
        v.into_iter().collect()
    }
}

impl<const N: usize> From<[&str; N]> for PropertyList {
    fn from(v: [&str; N]) -> Self {
        v.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PropertyList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        PropertyList(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum OptionValue {
    Count(u64),
    Text(String),
    Filter(Filter),
    Custom(Literal),
}

impl OptionValue {
    fn render(&self, dialect: Dialect) -> String {
        match self {
            OptionValue::Count(n) => n.to_string(),
            OptionValue::Text(s) => s.clone(),
            OptionValue::Filter(f) => f.render(dialect),
            OptionValue::Custom(v) => v.to_plain_string(),
        }
    }
}

/// Query options in the order they were first set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    options: Vec<(String, OptionValue)>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the known system options from a JSON object. `$top`/`$skip` must
    /// be non-negative integers, `$select`/`$expand` strings or string arrays,
    /// `$filter` a string and `$inlinecount` `true` or `"allpages"`. Other
    /// keys and ill-typed values are ignored.
    pub fn from_json(value: &Value) -> Self {
        let mut options = Self::new();
        let Some(object) = value.as_object() else {
            return options;
        };

        if let Some(top) = object.get(TOP).and_then(Value::as_u64) {
            options.set_top(Some(top));
        }
        if let Some(skip) = object.get(SKIP).and_then(Value::as_u64) {
            options.set_skip(Some(skip));
        }
        if let Some(order_by) = object.get(ORDER_BY).and_then(Value::as_str) {
            options.set_order_by(Some(order_by));
        }
        if let Some(expand) = object.get(EXPAND).and_then(property_list) {
            options.set_expand(Some(expand));
        }
        if let Some(select) = object.get(SELECT).and_then(property_list) {
            options.set_select(Some(select));
        }
        if let Some(filter) = object.get(FILTER).and_then(Value::as_str) {
            options.set_filter(Some(filter.into()));
        }
        match object.get(INLINE_COUNT) {
            Some(Value::Bool(b)) => {
                options.set_inline_count(Some(*b));
            }
            Some(Value::String(s)) if s == ALL_PAGES => {
                options.set_inline_count(Some(true));
            }
            _ => {}
        }

        options
    }

    fn get(&self, key: &str) -> Option<&OptionValue> {
        self.options.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn put(&mut self, key: &str, value: OptionValue) {
        match self.options.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.options.push((key.to_string(), value)),
        }
    }

    fn remove(&mut self, key: &str) {
        self.options.retain(|(k, _)| k != key);
    }

    fn set_or_clear(&mut self, key: &str, value: Option<Option<OptionValue>>) -> &mut Self {
        match value {
            None => self.remove(key),
            Some(Some(value)) => self.put(key, value),
            // present but invalid: keep whatever was there
            Some(None) => {}
        }
        self
    }

    /// Maximum number of results
    pub fn set_top(&mut self, top: Option<u64>) -> &mut Self {
        self.set_or_clear(TOP, top.map(|n| Some(OptionValue::Count(n))))
    }

    /// Index of the first result
    pub fn set_skip(&mut self, skip: Option<u64>) -> &mut Self {
        self.set_or_clear(SKIP, skip.map(|n| Some(OptionValue::Count(n))))
    }

    /// Sort clause, e.g. `name desc`; an empty string is ignored
    pub fn set_order_by(&mut self, order_by: Option<&str>) -> &mut Self {
        let value = order_by.map(|s| (!s.is_empty()).then(|| OptionValue::Text(s.to_string())));
        self.set_or_clear(ORDER_BY, value)
    }

    /// Navigation properties to expand; an empty list is ignored
    pub fn set_expand(&mut self, expand: Option<PropertyList>) -> &mut Self {
        let value = expand.map(|l| l.joined().map(OptionValue::Text));
        self.set_or_clear(EXPAND, value)
    }

    /// Properties to return; an empty list is ignored
    pub fn set_select(&mut self, select: Option<PropertyList>) -> &mut Self {
        let value = select.map(|l| l.joined().map(OptionValue::Text));
        self.set_or_clear(SELECT, value)
    }

    /// `Some(true)` requests `$inlinecount=allpages`; anything else clears it
    pub fn set_inline_count(&mut self, inline_count: Option<bool>) -> &mut Self {
        let value = match inline_count {
            Some(true) => Some(Some(OptionValue::Text(ALL_PAGES.to_string()))),
            _ => None,
        };
        self.set_or_clear(INLINE_COUNT, value)
    }

    /// Filter clause as text or predicate; empty text is ignored
    pub fn set_filter(&mut self, filter: Option<Filter>) -> &mut Self {
        let value = filter.map(|f| f.is_valid().then_some(OptionValue::Filter(f)));
        self.set_or_clear(FILTER, value)
    }

    /// Set a custom query parameter. Names starting with `$` are reserved for
    /// system options and, like empty names, are ignored.
    pub fn set_custom(&mut self, name: &str, value: Option<Literal>) -> &mut Self {
        if name.is_empty() || name.starts_with('$') {
            return self;
        }
        self.set_or_clear(name, value.map(|v| Some(OptionValue::Custom(v))))
    }

    pub fn top(&self) -> Option<u64> {
        match self.get(TOP) {
            Some(OptionValue::Count(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn skip(&self) -> Option<u64> {
        match self.get(SKIP) {
            Some(OptionValue::Count(n)) => Some(*n),
            _ => None,
        }
    }

    fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(OptionValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn order_by(&self) -> Option<&str> {
        self.text(ORDER_BY)
    }

    pub fn expand(&self) -> Option<&str> {
        self.text(EXPAND)
    }

    pub fn select(&self) -> Option<&str> {
        self.text(SELECT)
    }

    /// `Some("allpages")` when an inline count was requested
    pub fn inline_count(&self) -> Option<&str> {
        self.text(INLINE_COUNT)
    }

    pub fn filter(&self) -> Option<&Filter> {
        match self.get(FILTER) {
            Some(OptionValue::Filter(f)) => Some(f),
            _ => None,
        }
    }

    pub fn custom(&self, name: &str) -> Option<&Literal> {
        if name.starts_with('$') {
            return None;
        }
        match self.get(name) {
            Some(OptionValue::Custom(v)) => Some(v),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Copy every option of `other` into this set, overriding matching ones
    pub fn extend(&mut self, other: &QueryOptions) -> &mut Self {
        for (key, value) in &other.options {
            self.put(key, value.clone());
        }
        self
    }

    /// `?k=v&k=v`, or an empty string when no option is set
    pub fn to_query_string(&self) -> String {
        self.to_query_string_with(Dialect::default())
    }

    /// Like [`QueryOptions::to_query_string`], rendering predicate filters in `dialect`
    pub fn to_query_string_with(&self, dialect: Dialect) -> String {
        if self.options.is_empty() {
            return String::new();
        }
        let params = self
            .options
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.render(dialect)))
            .join("&");
        format!("?{}", params)
    }
}

impl Display for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

fn property_list(value: &Value) -> Option<PropertyList> {
    match value {
        Value::String(s) => Some(PropertyList::from(s.as_str())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(PropertyList::from),
        _ => None,
    }
}

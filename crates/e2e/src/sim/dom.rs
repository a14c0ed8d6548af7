//! Rendered screen model
//!
//! A screen is built as a tree of [`El`] values and flattened into a
//! [`Document`] in pre-order, so document order is index order and the
//! descendants of a node occupy the contiguous range `idx + 1..end`.
//!
//! Every node gets a stable key derived from its position (`id` attribute or
//! explicit key where present). A key that survives a re-render keeps
//! referring to the same logical element.

use super::app::Action;
use crate::locator::{Locator, Strategy};
use crate::result::{E2eError, E2eResult};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// Builder for one element of a rendered screen
#[derive(Debug, Clone)]
pub(crate) struct El {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    text: String,
    children: Vec<El>,
    hidden: bool,
    disabled: bool,
    key: Option<String>,
    action: Option<Action>,
}

impl El {
    pub(crate) fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            hidden: false,
            disabled: false,
            key: None,
            action: None,
        }
    }

    pub(crate) fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub(crate) fn id(self, value: &str) -> Self {
        self.attr("id", value)
    }

    pub(crate) fn class(self, value: &str) -> Self {
        self.attr("class", value)
    }

    pub(crate) fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub(crate) fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    pub(crate) const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub(crate) const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub(crate) fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub(crate) fn on_click(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }
}

/// One flattened element
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) key: String,
    pub(crate) tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    text: String,
    children: Vec<usize>,
    end: usize,
    pub(crate) displayed: bool,
    pub(crate) enabled: bool,
    pub(crate) action: Option<Action>,
}

impl Node {
    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }
}

/// A rendered screen
#[derive(Debug, Clone, Default)]
pub(crate) struct Document {
    nodes: Vec<Node>,
    by_key: HashMap<String, usize>,
}

impl Document {
    pub(crate) fn build(root: El) -> Self {
        let mut doc = Self::default();
        doc.push(root, None, true);
        doc
    }

    fn push(&mut self, el: El, parent: Option<(usize, String)>, parent_displayed: bool) -> usize {
        let El {
            tag,
            attrs,
            text,
            children,
            hidden,
            disabled,
            key,
            action,
        } = el;

        let segment = if let Some(id) = attrs.iter().find(|(n, _)| *n == "id") {
            format!("{tag}#{}", id.1)
        } else if let Some(key) = &key {
            format!("{tag}@{key}")
        } else if let Some((parent_idx, _)) = &parent {
            let n = self.nodes[*parent_idx]
                .children
                .iter()
                .filter(|&&c| self.nodes[c].tag == tag)
                .count();
            format!("{tag}[{n}]")
        } else {
            tag.to_string()
        };
        let key = match &parent {
            Some((_, parent_key)) => format!("{parent_key}/{segment}"),
            None => segment,
        };

        let idx = self.nodes.len();
        let displayed = parent_displayed && !hidden;
        self.nodes.push(Node {
            key: key.clone(),
            tag,
            attrs,
            text,
            children: Vec::new(),
            end: idx + 1,
            displayed,
            enabled: !disabled,
            action,
        });
        if let Some((parent_idx, _)) = &parent {
            self.nodes[*parent_idx].children.push(idx);
        }
        self.by_key.insert(key.clone(), idx);

        for child in children {
            self.push(child, Some((idx, key.clone())), displayed);
        }
        self.nodes[idx].end = self.nodes.len();
        idx
    }

    pub(crate) fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn index_of(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// Selenium-style visible text: hidden elements read as empty
    pub(crate) fn visible_text(&self, idx: usize) -> String {
        let node = &self.nodes[idx];
        if !node.displayed {
            return String::new();
        }
        let mut parts = Vec::new();
        let own = node.text.trim();
        if !own.is_empty() {
            parts.push(own.to_string());
        }
        for &child in &node.children {
            let text = self.visible_text(child);
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join("\n")
    }

    /// XPath string value: all descendant text, hidden included
    pub(crate) fn string_value(&self, idx: usize) -> String {
        let node = &self.nodes[idx];
        let mut value = node.text.clone();
        for &child in &node.children {
            value.push_str(&self.string_value(child));
        }
        value
    }

    /// Every node matching `locator`, in document order
    pub(crate) fn find(&self, locator: &Locator) -> E2eResult<Vec<usize>> {
        let selector = locator.selector();
        match locator.strategy() {
            Strategy::Id => Ok(self.filter(|n| n.attribute("id") == Some(selector))),
            Strategy::Text => {
                Ok(self.filter(|n| n.children.is_empty() && n.text.contains(selector)))
            }
            Strategy::Css => self.find_css(selector),
            Strategy::XPath => self.find_xpath(selector),
        }
    }

    fn filter(&self, pred: impl Fn(&Node) -> bool) -> Vec<usize> {
        (0..self.nodes.len()).filter(|&i| pred(&self.nodes[i])).collect()
    }

    fn candidates(&self, context: Option<usize>, descendant: bool) -> Vec<usize> {
        match (context, descendant) {
            (None, true) => (0..self.nodes.len()).collect(),
            (None, false) => vec![0],
            (Some(idx), true) => (idx + 1..self.nodes[idx].end).collect(),
            (Some(idx), false) => self.nodes[idx].children.clone(),
        }
    }

    // =========================================================================
    // XPATH
    // =========================================================================

    fn find_xpath(&self, expr: &str) -> E2eResult<Vec<usize>> {
        let steps = parse_xpath(expr)?;
        let mut context: Vec<Option<usize>> = vec![None];
        for step in &steps {
            let mut next = BTreeSet::new();
            for ctx in &context {
                for idx in self.candidates(*ctx, step.descendant) {
                    if self.step_matches(idx, step) {
                        next.insert(idx);
                    }
                }
            }
            context = next.into_iter().map(Some).collect();
        }
        Ok(context.into_iter().flatten().collect())
    }

    fn step_matches(&self, idx: usize, step: &Step) -> bool {
        let node = &self.nodes[idx];
        (step.tag == "*" || step.tag == node.tag)
            && step.predicates.iter().all(|p| match p {
                Predicate::TextContains(v) => node.text.contains(v.as_str()),
                Predicate::TextEquals(v) => node.text == *v,
                Predicate::ValueContains(v) => self.string_value(idx).contains(v.as_str()),
                Predicate::AttrContains(name, v) => {
                    node.attribute(name).is_some_and(|a| a.contains(v.as_str()))
                }
                Predicate::AttrEquals(name, v) => node.attribute(name) == Some(v.as_str()),
            })
    }

    // =========================================================================
    // CSS
    // =========================================================================

    fn find_css(&self, selector: &str) -> E2eResult<Vec<usize>> {
        let compounds = selector
            .split_whitespace()
            .map(parse_compound)
            .collect::<E2eResult<Vec<_>>>()?;
        if compounds.is_empty() {
            return Err(unsupported("css", selector));
        }
        let mut context: Vec<Option<usize>> = vec![None];
        for compound in &compounds {
            let mut next = BTreeSet::new();
            for ctx in &context {
                for idx in self.candidates(*ctx, true) {
                    if compound.matches(&self.nodes[idx]) {
                        next.insert(idx);
                    }
                }
            }
            context = next.into_iter().map(Some).collect();
        }
        Ok(context.into_iter().flatten().collect())
    }
}

fn unsupported(kind: &str, selector: &str) -> E2eError {
    E2eError::Script {
        message: format!("unsupported {kind} selector '{selector}'"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    TextContains(String),
    TextEquals(String),
    ValueContains(String),
    AttrContains(String, String),
    AttrEquals(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    descendant: bool,
    tag: String,
    predicates: Vec<Predicate>,
}

fn contains_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^contains\(\s*(text\(\)|\.|@[\w-]+)\s*,\s*(?:'([^']*)'|"([^"]*)")\s*\)$"#)
            .unwrap_or_else(|e| unreachable!("static regex: {e}"))
    })
}

fn equals_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(text\(\)|@[\w-]+)\s*=\s*(?:'([^']*)'|"([^"]*)")$"#)
            .unwrap_or_else(|e| unreachable!("static regex: {e}"))
    })
}

/// Split `s` on `sep` where it occurs outside quotes and brackets
fn split_top_level<'a>(s: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut i = 0;
    while i < s.len() {
        let c = s[i..].chars().next().unwrap_or_default();
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth -= 1,
            (None, _) if depth == 0 && s[i..].starts_with(sep) => {
                parts.push(&s[start..i]);
                i += sep.len();
                start = i;
                continue;
            }
            _ => {}
        }
        i += c.len_utf8();
    }
    parts.push(&s[start..]);
    parts
}

/// Contents of consecutive `[...]` groups; `None` if anything else is found
fn bracket_groups(s: &str) -> Option<Vec<&str>> {
    let mut groups = Vec::new();
    let mut depth = 0_i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => {
                if depth == 0 {
                    start = i + 1;
                }
                depth += 1;
            }
            (None, ']') => {
                depth -= 1;
                if depth == 0 {
                    groups.push(&s[start..i]);
                }
            }
            (None, c) if depth == 0 && !c.is_whitespace() => return None,
            _ => {}
        }
    }
    (depth == 0 && quote.is_none()).then_some(groups)
}

fn parse_predicate(expr: &str) -> Option<Predicate> {
    let expr = expr.trim();
    if let Some(caps) = contains_re().captures(expr) {
        let value = caps.get(2).or_else(|| caps.get(3))?.as_str().to_string();
        let target = caps.get(1)?.as_str();
        return Some(match target {
            "text()" => Predicate::TextContains(value),
            "." => Predicate::ValueContains(value),
            attr => Predicate::AttrContains(attr.trim_start_matches('@').to_string(), value),
        });
    }
    let caps = equals_re().captures(expr)?;
    let value = caps.get(2).or_else(|| caps.get(3))?.as_str().to_string();
    Some(match caps.get(1)?.as_str() {
        "text()" => Predicate::TextEquals(value),
        attr => Predicate::AttrEquals(attr.trim_start_matches('@').to_string(), value),
    })
}

fn parse_step(raw: &str, descendant: bool, expr: &str) -> E2eResult<Step> {
    let (tag, rest) = raw.find('[').map_or((raw, ""), |i| (&raw[..i], &raw[i..]));
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(unsupported("xpath", expr));
    }
    let mut predicates = Vec::new();
    for group in bracket_groups(rest).ok_or_else(|| unsupported("xpath", expr))? {
        for clause in split_top_level(group, " and ") {
            predicates.push(parse_predicate(clause).ok_or_else(|| unsupported("xpath", expr))?);
        }
    }
    Ok(Step {
        descendant,
        tag: tag.to_string(),
        predicates,
    })
}

fn parse_xpath(expr: &str) -> E2eResult<Vec<Step>> {
    let mut steps = Vec::new();
    for (i, part) in split_top_level(expr.trim(), "/").into_iter().enumerate() {
        // a leading "/" yields an empty first part; "//" yields an empty part
        // that marks the next step as a descendant step
        if part.is_empty() {
            if i == 0 {
                continue;
            }
            steps.push(None);
            continue;
        }
        let descendant = matches!(steps.last(), Some(None));
        if descendant {
            steps.pop();
        }
        steps.push(Some(parse_step(part, descendant, expr)?));
    }
    let steps: Vec<Step> = steps.into_iter().flatten().collect();
    if steps.is_empty() {
        return Err(unsupported("xpath", expr));
    }
    Ok(steps)
}

#[derive(Debug, Clone, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attr: Option<(String, String)>,
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        self.tag.as_deref().map_or(true, |t| t == "*" || t == node.tag)
            && self.id.as_deref().map_or(true, |id| node.attribute("id") == Some(id))
            && self.classes.iter().all(|c| node.has_class(c))
            && self
                .attr
                .as_ref()
                .map_or(true, |(n, v)| node.attribute(n) == Some(v.as_str()))
    }
}

fn parse_compound(raw: &str) -> E2eResult<Compound> {
    let (head, attr) = match raw.find('[') {
        Some(i) => {
            let inner = raw[i + 1..]
                .strip_suffix(']')
                .ok_or_else(|| unsupported("css", raw))?;
            let (name, value) = inner.split_once('=').ok_or_else(|| unsupported("css", raw))?;
            let value = value.trim_matches(|c| c == '\'' || c == '"');
            (&raw[..i], Some((name.to_string(), value.to_string())))
        }
        None => (raw, None),
    };

    let mut compound = Compound {
        attr,
        ..Compound::default()
    };
    let mut token = String::new();
    let mut kind = ' ';
    for c in head.chars().chain(std::iter::once('#')) {
        if c == '#' || c == '.' {
            match kind {
                ' ' if !token.is_empty() => compound.tag = Some(token.clone()),
                '#' => compound.id = Some(token.clone()),
                '.' => compound.classes.push(token.clone()),
                _ => {}
            }
            token.clear();
            kind = c;
        } else {
            token.push(c);
        }
    }
    Ok(compound)
}

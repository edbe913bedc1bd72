// SPDX-License-Identifier: PMPL-1.0-or-later

//! A laid-out page: tagged elements with document-space rectangles.
//!
//! This is the minimum of a DOM the presentation logic needs: class lists
//! for the reveal state, `data-*` attributes for step markers, anchors for
//! in-page navigation, and geometry for intersection checks.

use crate::observer::Rect;
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    anchor: Option<String>,
    classes: BTreeSet<String>,
    data: BTreeMap<String, String>,
    rect: Rect,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            anchor: None,
            classes: BTreeSet::new(),
            data: BTreeMap::new(),
            rect: Rect::default(),
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        for name in class.split_whitespace() {
            self.classes.insert(name.to_string());
        }
        self
    }

    pub fn anchor(mut self, anchor: &str) -> Self {
        self.anchor = Some(anchor.to_string());
        self
    }

    /// Set `data-<name>`; `name` is given without the prefix.
    pub fn data(mut self, name: &str, value: &str) -> Self {
        self.data.insert(name.to_string(), value.to_string());
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn data_value(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.anchor.as_deref(),
            other => other
                .strip_prefix("data-")
                .and_then(|data_name| self.data_value(data_name)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.element(id).map(Element::bounds)
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// Returns `true` when the class was not already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) -> bool {
        self.elements
            .get_mut(id.0)
            .is_some_and(|el| el.classes.insert(class.to_string()))
    }

    /// Returns `true` when the class was present.
    pub fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        self.elements
            .get_mut(id.0)
            .is_some_and(|el| el.classes.remove(class))
    }

    pub fn find_anchor(&self, anchor: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|el| el.anchor.as_deref() == Some(anchor))
            .map(ElementId)
    }

    /// Bottom edge of the lowest element.
    pub fn height(&self) -> f64 {
        self.elements
            .iter()
            .map(|el| el.rect.bottom())
            .fold(0.0, f64::max)
    }

    /// Elements matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let selector = SelectorList::parse(selector)?;
        Ok(self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, el)| selector.matches(el))
            .map(|(index, _)| ElementId(index))
            .collect())
    }
}

/// Comma-separated compound selectors: `tag`, `.class`, `#id`, `[attr]`,
/// `[attr=value]`, in any combination without whitespace.
#[derive(Debug, Clone, PartialEq)]
struct SelectorList(Vec<Compound>);

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl SelectorList {
    fn parse(raw: &str) -> Result<Self> {
        let compounds = raw
            .split(',')
            .map(|part| Compound::parse(part.trim()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(compounds))
    }

    fn matches(&self, element: &Element) -> bool {
        self.0.iter().any(|compound| compound.matches(element))
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn take_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

impl Compound {
    fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(anyhow!("empty selector"));
        }
        let chars: Vec<char> = raw.chars().collect();
        let mut compound = Compound::default();
        let mut pos = 0;

        if is_ident_char(chars[0]) {
            let (tag, end) = take_ident(&chars, 0);
            compound.tag = Some(tag.to_ascii_lowercase());
            pos = end;
        }

        while pos < chars.len() {
            match chars[pos] {
                '.' | '#' => {
                    let (name, end) = take_ident(&chars, pos + 1);
                    if name.is_empty() {
                        return Err(anyhow!("selector '{}' has an empty name at {}", raw, pos));
                    }
                    if chars[pos] == '.' {
                        compound.classes.push(name);
                    } else {
                        compound.id = Some(name);
                    }
                    pos = end;
                }
                '[' => {
                    let close = chars[pos..]
                        .iter()
                        .position(|&ch| ch == ']')
                        .map(|offset| pos + offset)
                        .ok_or_else(|| anyhow!("unterminated attribute in '{}'", raw))?;
                    let body: String = chars[pos + 1..close].iter().collect();
                    let attribute = match body.split_once('=') {
                        Some((name, value)) => (
                            name.trim().to_string(),
                            Some(value.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string()),
                        ),
                        None => (body.trim().to_string(), None),
                    };
                    if attribute.0.is_empty() {
                        return Err(anyhow!("empty attribute name in '{}'", raw));
                    }
                    compound.attributes.push(attribute);
                    pos = close + 1;
                }
                other => {
                    return Err(anyhow!(
                        "unsupported character '{}' in selector '{}'",
                        other,
                        raw
                    ))
                }
            }
        }
        Ok(compound)
    }

    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.anchor.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attributes.iter().all(|(name, expected)| {
            match (element.attribute(name), expected) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            }
        })
    }
}

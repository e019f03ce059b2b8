//! Declarative view tree with named slots.
//!
//! The tree is built once per dashboard. Slots (graphs and text) are addressed by
//! id; their contents are supplied separately when the page is rendered.

use crate::dashboard::view::DropdownOption;
use crate::dashboard::SlotContent;
use crate::data::Scalar;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

pub type Style = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutNode {
    Heading {
        text: String,
        style: Style,
    },
    Div {
        style: Style,
        children: Vec<LayoutNode>,
    },
    Dropdown {
        id: String,
        options: Vec<DropdownOption>,
        value: Scalar,
        style: Style,
    },
    Graph {
        id: String,
    },
    Text {
        id: String,
    },
    Break,
}

impl LayoutNode {
    pub fn heading(text: &str) -> Self {
        LayoutNode::Heading {
            text: text.to_string(),
            style: Style::new(),
        }
    }

    pub fn div(children: Vec<LayoutNode>) -> Self {
        LayoutNode::Div {
            style: Style::new(),
            children,
        }
    }

    pub fn graph(id: &str) -> Self {
        LayoutNode::Graph { id: id.to_string() }
    }

    pub fn text(id: &str) -> Self {
        LayoutNode::Text { id: id.to_string() }
    }

    /// Add CSS declarations. No-op on nodes without a style.
    pub fn styled<'a>(mut self, declarations: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        if let LayoutNode::Heading { style, .. }
        | LayoutNode::Div { style, .. }
        | LayoutNode::Dropdown { style, .. } = &mut self
        {
            style.extend(
                declarations
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string())),
            );
        }
        self
    }

    /// Ids of graph and text slots, depth first.
    pub fn slot_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_slots(&mut ids);
        ids
    }

    fn collect_slots<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            LayoutNode::Graph { id } | LayoutNode::Text { id } => ids.push(id),
            LayoutNode::Div { children, .. } => {
                for child in children {
                    child.collect_slots(ids);
                }
            }
            _ => {}
        }
    }

    /// Render as HTML. Text slots are filled from `slots`; graphs are drawn client-side.
    pub fn render_html(&self, slots: &BTreeMap<String, SlotContent>, out: &mut String) {
        match self {
            LayoutNode::Heading { text, style } => {
                let _ = write!(out, "<h1{}>{}</h1>", style_attr(style), escape_html(text));
            }
            LayoutNode::Div { style, children } => {
                let _ = write!(out, "<div{}>", style_attr(style));
                for child in children {
                    child.render_html(slots, out);
                }
                out.push_str("</div>");
            }
            LayoutNode::Dropdown {
                id,
                options,
                value,
                style,
            } => {
                let _ = write!(
                    out,
                    "<select id=\"{}\" data-selector{}>",
                    escape_html(id),
                    style_attr(style)
                );
                for option in options {
                    let encoded = serde_json::to_string(&option.value).unwrap_or_default();
                    let selected = if &option.value == value { " selected" } else { "" };
                    let _ = write!(
                        out,
                        "<option value=\"{}\"{}>{}</option>",
                        escape_html(&encoded),
                        selected,
                        escape_html(&option.label)
                    );
                }
                out.push_str("</select>");
            }
            LayoutNode::Graph { id } => {
                let _ = write!(out, "<div id=\"{}\" class=\"graph\"></div>", escape_html(id));
            }
            LayoutNode::Text { id } => {
                let text = match slots.get(id) {
                    Some(SlotContent::Caption { text }) => text.as_str(),
                    _ => "",
                };
                let _ = write!(
                    out,
                    "<div id=\"{}\">{}</div>",
                    escape_html(id),
                    escape_html(text)
                );
            }
            LayoutNode::Break => out.push_str("<br>"),
        }
    }
}

fn style_attr(style: &Style) -> String {
    if style.is_empty() {
        return String::new();
    }
    let css: Vec<String> = style.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    format!(" style=\"{}\"", escape_html(&css.join("; ")))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

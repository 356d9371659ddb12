// src/node_xpath.rs
//! Default XPaths derived from a node's name and options.

use crate::options::{NodeOptions, Tag};

pub struct NodeXPath<'o> {
    node_name: &'o str,
    options: &'o NodeOptions,
}

impl<'o> NodeXPath<'o> {
    pub fn new(node_name: &'o str, options: &'o NodeOptions) -> Self {
        Self { node_name, options }
    }

    /// An explicit `xpath` wins; otherwise `attribute`, then `self`, then `element`.
    pub fn xpath(&self) -> String {
        if let Some(xpath) = &self.options.xpath {
            return xpath.clone();
        }
        if let Some(tag) = &self.options.attribute {
            return format!("./@{}", self.tag_name(tag));
        }
        if self.options.self_node {
            return ".".to_string();
        }
        let tag = self.options.element.as_ref().unwrap_or(&Tag::NodeName);
        format!("./{}", self.tag_name(tag))
    }

    fn tag_name(&self, tag: &Tag) -> String {
        match tag {
            Tag::Named(name) => name.clone(),
            Tag::NodeName if self.options.array => singularize(self.node_name),
            Tag::NodeName => self.node_name.to_string(),
        }
    }
}

const IRREGULAR: [(&str, &str); 12] = [
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("movies", "movie"),
    ("indices", "index"),
    ("vertices", "vertex"),
];

const UNCOUNTABLE: [&str; 8] = [
    "data", "equipment", "information", "news", "rice", "series", "sheep", "species",
];

/// (plural suffix, singular suffix), first match wins.
const SUFFIX_RULES: [(&str, &str); 14] = [
    ("quizzes", "quiz"),
    ("statuses", "status"),
    ("aliases", "alias"),
    ("buses", "bus"),
    ("ies", "y"),
    ("hives", "hive"),
    ("tives", "tive"),
    ("lves", "lf"),
    ("rves", "rf"),
    ("ves", "fe"),
    ("sses", "ss"),
    ("xes", "x"),
    ("ches", "ch"),
    ("shes", "sh"),
];

/// English singular of a (snake_case) name: `houses → house`, `mice → mouse`,
/// `categories → category`, `boxes → box`. Only the last word is inflected.
pub fn singularize(word: &str) -> String {
    let (head, last) = match word.rfind('_') {
        Some(i) => word.split_at(i + 1),
        None => ("", word),
    };
    format!("{}{}", head, singularize_word(last))
}

fn singularize_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return singular.to_string();
    }
    for (plural, singular) in SUFFIX_RULES {
        if lower.ends_with(plural) {
            return format!("{}{}", &word[..word.len() - plural.len()], singular);
        }
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

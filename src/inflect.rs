//! Rule-table pluralization, used to derive a resource type string from a
//! Rust type name when none is declared.

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
    "police",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("ox", "oxen"),
];

pub fn pluralize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word.to_lowercase().as_str()) {
        return word.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if word.eq_ignore_ascii_case(singular) {
            return (*plural).to_string();
        }
    }

    for suffix in ["s", "x", "z", "ch", "sh"] {
        if word.ends_with(suffix) {
            return format!("{}es", word);
        }
    }
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.is_empty() && !ends_with_vowel(stem) {
            return format!("{}ies", stem);
        }
    }
    if let Some(stem) = word.strip_suffix("fe") {
        return format!("{}ves", stem);
    }
    if let Some(stem) = word.strip_suffix('f') {
        return format!("{}ves", stem);
    }
    format!("{}s", word)
}

pub fn singularize(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word.to_lowercase().as_str()) {
        return word.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if word.eq_ignore_ascii_case(plural) {
            return (*singular).to_string();
        }
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{}y", stem);
        }
    }
    if let Some(stem) = word.strip_suffix("ves") {
        return format!("{}f", stem);
    }
    for suffix in ["ses", "xes", "zes", "ches", "shes"] {
        if let Some(stem) = word.strip_suffix("es") {
            if word.ends_with(suffix) {
                return stem.to_string();
            }
        }
    }
    if word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

fn ends_with_vowel(word: &str) -> bool {
    matches!(
        word.chars().last(),
        Some('a' | 'e' | 'i' | 'o' | 'u')
    )
}

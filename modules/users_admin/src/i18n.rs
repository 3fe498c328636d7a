//! Built-in translations for flash notices.
//!
//! Messages use `:placeholder` tokens, e.g.
//! `The :model ":name" has been :action.`

pub const FALLBACK_LOCALE: &str = "en";

const EN: &[(&str, &str)] = &[
    ("notify.success", "The :model \":name\" has been :action."),
    ("model.user", "user"),
    ("action.created", "created"),
    ("action.updated", "updated"),
    ("action.deleted", "deleted"),
    ("action.restored", "restored"),
];

const NL: &[(&str, &str)] = &[
    ("notify.success", "De :model \":name\" is :action."),
    ("model.user", "gebruiker"),
    ("action.created", "aangemaakt"),
    ("action.updated", "bijgewerkt"),
    ("action.deleted", "verwijderd"),
    ("action.restored", "hersteld"),
];

fn catalog(locale: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match locale {
        "en" => Some(EN),
        "nl" => Some(NL),
        _ => None,
    }
}

/// What happened to the record a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Updated,
    Deleted,
    Restored,
}

impl Action {
    fn key(self) -> &'static str {
        match self {
            Action::Created => "action.created",
            Action::Updated => "action.updated",
            Action::Deleted => "action.deleted",
            Action::Restored => "action.restored",
        }
    }
}

pub fn is_supported(locale: &str) -> bool {
    catalog(locale).is_some()
}

/// Look up `key`, falling back to English and then to the key itself.
pub fn translate(locale: &str, key: &str) -> String {
    catalog(locale)
        .and_then(|cat| lookup(cat, key))
        .or_else(|| lookup(EN, key))
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

fn lookup(cat: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    cat.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Translate `key` and substitute `:name` style placeholders.
pub fn translate_with(locale: &str, key: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = translate(locale, key);
    // Longest names first so `:name` never eats part of `:names`.
    let mut sorted = replacements.to_vec();
    sorted.sort_by_key(|(k, _)| std::cmp::Reverse(k.len()));
    for (k, v) in sorted {
        out = out.replace(&format!(":{k}"), v);
    }
    out
}

/// `notify.success` for a user record.
pub fn user_notice(locale: &str, full_name: &str, action: Action) -> String {
    let model = translate(locale, "model.user");
    let action = translate(locale, action.key());
    translate_with(
        locale,
        "notify.success",
        &[("model", &model), ("name", full_name), ("action", &action)],
    )
}

/// Pick a supported locale from an `Accept-Language` header, honoring
/// q-values and matching on the primary subtag. Falls back to `default`
/// when it is supported, otherwise to English.
pub fn negotiate(accept_language: Option<&str>, default: &str) -> &'static str {
    let default = supported_static(default).unwrap_or(FALLBACK_LOCALE);
    let Some(header) = accept_language else {
        return default;
    };

    let mut best: Option<(&'static str, f32)> = None;
    for entry in header.split(',') {
        let mut parts = entry.trim().split(';');
        let tag = parts.next().unwrap_or_default().trim();
        let q = parts
            .find_map(|p| p.trim().strip_prefix("q="))
            .and_then(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0);
        if q <= 0.0 {
            continue;
        }
        let primary = tag.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
        if let Some(locale) = supported_static(&primary) {
            if best.map_or(true, |(_, best_q)| q > best_q) {
                best = Some((locale, q));
            }
        }
    }
    best.map(|(l, _)| l).unwrap_or(default)
}

fn supported_static(locale: &str) -> Option<&'static str> {
    match locale {
        "en" => Some("en"),
        "nl" => Some("nl"),
        _ => None,
    }
}

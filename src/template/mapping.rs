/// Canonicalize CRLF and lone CR to LF.
pub fn normalize_newlines(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}

/// Token → replacement pairs, kept in insertion order.
///
/// Replacements are newline-normalized on insert. Inserting an existing token
/// overwrites its replacement in place without changing its position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, String)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>, replacement: impl AsRef<str>) {
        let token = token.into();
        let replacement = normalize_newlines(replacement.as_ref());
        match self.entries.iter_mut().find(|(k, _)| *k == token) {
            Some(entry) => entry.1 = replacement,
            None => self.entries.push((token, replacement)),
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == token)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

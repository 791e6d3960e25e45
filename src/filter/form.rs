//! Form body parsing that keeps every value of a repeated key.

use std::collections::HashMap;

use url::form_urlencoded;

/// One parameter name with all values observed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntry {
    pub key: String,
    pub values: Vec<String>,
}

impl FormEntry {
    /// The value, if the key appeared exactly once.
    pub fn single_value(&self) -> Option<&str> {
        match self.values.as_slice() {
            [value] => Some(value),
            _ => None,
        }
    }
}

/// Decoded `application/x-www-form-urlencoded` pairs, in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<FormEntry>,
}

impl FormData {
    /// Decode a form body. `+` and percent escapes are decoded; invalid
    /// UTF-8 is replaced rather than rejected.
    pub fn parse(body: &[u8]) -> Self {
        let mut entries: Vec<FormEntry> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (key, value) in form_urlencoded::parse(body) {
            match index.get(&*key) {
                Some(&i) => entries[i].values.push(value.into_owned()),
                None => {
                    let key = key.into_owned();
                    index.insert(key.clone(), entries.len());
                    entries.push(FormEntry {
                        key,
                        values: vec![value.into_owned()],
                    });
                }
            }
        }

        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormEntry> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&FormEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decodes_plus_and_percent() {
        let form = FormData::parse(b"comment=tell+me+XYZZY%21&os=linux");
        assert_eq!(form.get("comment").unwrap().single_value(), Some("tell me XYZZY!"));
        assert_eq!(form.get("os").unwrap().single_value(), Some("linux"));
    }

    #[test]
    fn test_parse_groups_repeated_keys() {
        let form = FormData::parse(b"name=a&other=x&name=b");
        assert_eq!(form.len(), 2);
        let name = form.get("name").unwrap();
        assert_eq!(name.values, vec!["a", "b"]);
        assert_eq!(name.single_value(), None);
    }

    #[test]
    fn test_parse_preserves_first_seen_order() {
        let form = FormData::parse(b"b=1&a=2&b=3&c=4");
        let keys: Vec<&str> = form.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_key_without_value() {
        let form = FormData::parse(b"flag&x=");
        assert_eq!(form.get("flag").unwrap().single_value(), Some(""));
        assert_eq!(form.get("x").unwrap().single_value(), Some(""));
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(FormData::parse(b"").is_empty());
    }

    #[test]
    fn test_encoded_key_matches_decoded_repeat() {
        let form = FormData::parse(b"n%61me=a&name=b");
        assert_eq!(form.get("name").unwrap().values.len(), 2);
    }
}

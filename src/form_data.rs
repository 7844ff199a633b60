use std::collections::HashMap;

/// Fields of an `application/x-www-form-urlencoded` body.
#[derive(PartialEq, Debug, Default, Clone)]
pub struct FormData {
    items: HashMap<String, String>,
}

impl FormData {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        FormData {
            items,
        }
    }

    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: Vec<(K, V)>) -> Self {
        FormData {
            items: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(|v| v.as_str())
    }
}

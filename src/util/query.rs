use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Default)]
pub struct QueryParams {
    map: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(QueryParams { map })
    }
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(val) = self.map.get(key) {
            return Some(val);
        }
        self.map
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The `page` parameter. Missing means page 1; anything that is not a
    /// positive integer is `None`.
    pub fn page(&self) -> Option<u32> {
        match self.get("page") {
            None => Some(1),
            Some(s) => s.trim().parse::<u32>().ok().filter(|p| *p >= 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams {
            map: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_get_ignores_case() {
        let p = params(&[("Query", "alien")]);
        assert_eq!(p.get("query"), Some("alien"));
        assert_eq!(p.get("page"), None);
    }

    #[test]
    fn test_page() {
        assert_eq!(params(&[]).page(), Some(1));
        assert_eq!(params(&[("page", "3")]).page(), Some(3));
        assert_eq!(params(&[("page", "0")]).page(), None);
        assert_eq!(params(&[("page", "two")]).page(), None);
    }
}

/// A single custom property as authored in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Ordered name/value properties attached to maps, layers, tilesets, tiles
/// and objects. Values keep their textual form; typed getters parse on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(Vec<Property>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a property, replacing any earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.0.push(Property { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.parse().ok()
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.parse().ok()
    }

    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name)?.parse().ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.0.iter()
    }
}

impl FromIterator<Property> for Properties {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        let mut out = Properties::new();
        for p in iter {
            out.insert(p.name, p.value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_parse_text() {
        let mut props = Properties::new();
        props.insert("solid", "true");
        props.insert("damage", "10");
        props.insert("gravity", "9.5");
        props.insert("name", "forest");

        assert_eq!(props.get_bool("solid"), Some(true));
        assert_eq!(props.get_i64("damage"), Some(10));
        assert_eq!(props.get_f32("gravity"), Some(9.5));
        assert_eq!(props.get("name"), Some("forest"));
        assert_eq!(props.get_i64("name"), None);
        assert_eq!(props.get("missing"), None);
    }

    #[test]
    fn later_insert_replaces() {
        let mut props = Properties::new();
        props.insert("a", "1");
        props.insert("a", "2");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("a"), Some("2"));
    }
}

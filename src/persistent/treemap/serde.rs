//! Serde support: a map serializes as a serde map in ascending key order.

use std::fmt;
use std::marker::PhantomData;

use ::serde::de::{MapAccess, Visitor};
use ::serde::ser::SerializeMap;
use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::PersistentTreeMap;

impl<K: Serialize, V: Serialize> Serialize for PersistentTreeMap<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct PersistentTreeMapVisitor<K, V> {
    marker: PhantomData<fn() -> PersistentTreeMap<K, V>>,
}

impl<'de, K, V> Visitor<'de> for PersistentTreeMapVisitor<K, V>
where
    K: Deserialize<'de> + Clone + Ord,
    V: Deserialize<'de> + Clone,
{
    type Value = PersistentTreeMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        // Later duplicates overwrite earlier ones.
        let mut map = PersistentTreeMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map = map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for PersistentTreeMap<K, V>
where
    K: Deserialize<'de> + Clone + Ord,
    V: Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentTreeMapVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serializes_in_key_order() {
        let map = PersistentTreeMap::new()
            .insert("b".to_string(), 2)
            .insert("a".to_string(), 1);
        let json = serde_json::to_string(&map).expect("serialization succeeds");
        assert_eq!(json, r#"{"a":1,"b":2}"#);
    }

    #[rstest]
    fn test_deserialized_map_is_valid() {
        let json = r#"{"5":"e","1":"a","3":"c","2":"b","4":"d"}"#;
        let map: PersistentTreeMap<String, String> =
            serde_json::from_str(json).expect("deserialization succeeds");
        assert_eq!(map.len(), 5);
        assert_eq!(map.check_invariants(), Ok(()));
        assert_eq!(map.min().map(|(key, _)| key.as_str()), Some("1"));
    }

    #[rstest]
    fn test_rejects_non_map_input() {
        let result: Result<PersistentTreeMap<String, i32>, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }
}

use core::fmt::{self, Formatter};
use serde::{
    de::{self, Deserialize, Deserializer, MapAccess, Visitor},
    ser::{Serialize, Serializer},
};
use crate::Scalar;
use super::Tree;

/// Serializes the tree as a flat map from dotted keys to scalars, in pre-order.
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "serde")))]
impl Serialize for Tree {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.entries())
    }
}

/// Deserializes the tree from a flat map from dotted keys to scalars, inserting the entries in the order they appear in.
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "serde")))]
impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TreeVisitor)
    }
}

struct TreeVisitor;
impl<'de> Visitor<'de> for TreeVisitor {
    type Value = Tree;
    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a map from dotted property keys to scalars")
    }
    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tree = Tree::new();
        while let Some((key, value)) = map.next_entry::<String, Scalar>()? {
            tree.insert(&key, value).map_err(de::Error::custom)?;
        }
        Ok(tree)
    }
}

use super::*;
use std::collections::BTreeMap;

fn abc() -> Result<Tree> {
    let mut tree = Tree::new();
    tree.insert("a.b.c", "1")?;
    tree.insert("a.b.d", "2")?;
    tree.insert("a.b.a", "3")?;
    Ok(tree)
}

#[test]
fn basic() -> Result<()> {
    let tree = abc()?;
    assert_eq!(tree.to_string(), "(a,[(b,[(c=1), (d=2), (a=3)])])");
    assert_eq!(tree.len(), 5);
    assert!(!tree.is_empty());
    let b = tree.find("a.b").unwrap();
    assert!(b.is_inner());
    assert!(b.value().is_none());
    assert_eq!(b.parent().unwrap().key(), "a");
    assert!(tree.root().unwrap().is_root());
    assert!(!tree.root().unwrap().has_parent());
    Ok(())
}

#[test]
fn empty() {
    let tree = Tree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert!(tree.find("a").is_none());
    assert!(tree.find_relative("").is_none());
    assert_eq!(tree.to_string(), "()");
    assert_eq!(tree.iter().count(), 0);
    assert_eq!(tree, Tree::default());
}

#[test]
fn idempotent_insertion() -> Result<()> {
    let mut once = Tree::new();
    once.insert("a.b.c", "1")?;
    let mut twice = once.clone();
    twice.insert("a.b.c", "1")?;
    assert_eq!(once, twice);
    assert_eq!(twice.len(), 3);
    Ok(())
}

#[test]
fn overwrite() -> Result<()> {
    let mut tree = Tree::new();
    tree.insert("a.b.d", "2")?;
    tree.insert("a.b.d", "3")?;
    assert_eq!(tree.value("a.b.d").unwrap(), "3");
    assert_eq!(tree.find("a.b").unwrap().children().len(), 1);
    Ok(())
}

#[test]
fn promotion() -> Result<()> {
    let mut tree = Tree::new();
    tree.insert("a.b", "x")?;
    tree.insert("a.b.c", "y")?;
    let b = tree.find("a.b").unwrap();
    assert!(b.is_inner());
    assert!(b.value().is_none());
    let children = b.children().map(|x| x.key()).collect::<Vec<_>>();
    assert_eq!(children, ["c"]);
    assert_eq!(tree.value("a.b.c").unwrap(), "y");
    Ok(())
}

#[test]
fn value_at_inner_node_is_discarded() -> Result<()> {
    let mut forward = Tree::new();
    forward.insert("a.b", "x")?;
    forward.insert("a.b.c", "y")?;
    let mut backward = Tree::new();
    backward.insert("a.b.c", "y")?;
    backward.insert("a.b", "x")?;
    assert_eq!(forward, backward);
    assert!(backward.find("a.b").unwrap().is_inner());
    Ok(())
}

#[test]
fn invalid_paths() -> Result<()> {
    let mut tree = abc()?;
    let before = tree.clone();
    for path in &["", ".", "a..b", ".a", "a.", "a.b.c..", "a.b."] {
        match tree.insert(path, "boom") {
            Err(TreeError::InvalidArgument { path: reported, .. }) => assert_eq!(reported, *path),
            other => panic!("{:?} was accepted: {:?}", path, other),
        }
    }
    assert_eq!(tree, before);

    let mut empty = Tree::new();
    assert!(empty.insert("", 1).is_err());
    assert!(empty.is_empty());
    assert!(Tree::with_root("a.b").is_err());
    assert!(Tree::with_root("").is_err());
    assert!(Tree::from_entries(vec![("a.b", 1), ("a..c", 2)]).is_err());
    Ok(())
}

#[test]
fn path_round_trip() -> Result<()> {
    let keys = [
        "caches.caffeine[0].names",
        "caches.caffeine[0].config.spec",
        "caches.redis[0].ttl",
        "caches.redis[1].ttl",
    ];
    let mut tree = Tree::new();
    for (i, key) in keys.iter().enumerate() {
        tree.insert(key, i as i64)?;
    }
    for key in &keys {
        let node = tree.find(key).unwrap();
        assert_eq!(node.dotted_path(), *key);
        assert_eq!(node.path().join("."), *key);
    }
    let entries = tree.entries().map(|(k, _)| k).collect::<Vec<_>>();
    assert_eq!(entries, keys);
    Ok(())
}

#[test]
fn entries_rebuild_the_tree() -> Result<()> {
    let tree = abc()?;
    let rebuilt = Tree::from_entries(tree.entries().map(|(k, v)| (k, v.clone())))?;
    assert_eq!(tree, rebuilt);
    Ok(())
}

#[test]
fn entries_rebuild_a_single_block_under_a_transparent_root() -> Result<()> {
    let mut tree = Tree::anonymous();
    tree.insert("redis[0].names", "cache1")?;
    tree.insert("redis[0].config.spec", "maximumSize=10")?;
    assert!(tree.root().unwrap().is_anonymous());
    let rebuilt = Tree::from_entries(tree.entries().map(|(k, v)| (k, v.clone())))?;
    assert!(!rebuilt.root().unwrap().is_anonymous());
    assert_eq!(tree, rebuilt);
    assert_eq!(rebuilt, tree);
    Ok(())
}

#[test]
fn entries_lose_leafless_inner_nodes() -> Result<()> {
    let bare = Tree::with_root("caches")?;
    assert_eq!(bare.entries().count(), 0);
    let rebuilt = Tree::from_entries(bare.entries().map(|(k, v)| (k, v.clone())))?;
    assert!(rebuilt.is_empty());
    assert_ne!(bare, rebuilt);
    Ok(())
}

#[test]
fn equality_looks_through_the_transparent_root() -> Result<()> {
    assert_eq!(Tree::anonymous(), Tree::new());
    assert_eq!(Tree::new(), Tree::anonymous());

    let mut named = Tree::new();
    named.insert("a.b", 1)?;
    let mut wrapped = Tree::anonymous();
    wrapped.insert("a.b", 1)?;
    assert_eq!(named, wrapped);
    assert_ne!(wrapped, Tree::new());

    wrapped.insert("c", 2)?;
    assert_ne!(named, wrapped);
    named.insert("c", 2)?;
    assert_eq!(named, wrapped);
    Ok(())
}

#[test]
fn deep_paths() -> Result<()> {
    const DEPTH: usize = 50_000;
    let mut tree = Tree::new();
    tree.insert(&vec!["a"; DEPTH].join("."), 1)?;
    assert_eq!(tree.len(), DEPTH);

    let copy = tree.clone();
    assert_eq!(copy.len(), DEPTH);
    assert!(copy == tree);
    let mut other = Tree::new();
    other.insert(&vec!["a"; DEPTH].join("."), 2)?;
    assert!(other != tree);

    let rendered = tree.to_string();
    assert!(rendered.starts_with("(a,[(a,["));
    assert!(rendered.contains("(a=1)"));
    assert_eq!(rendered.len(), "(a,[".len() * (DEPTH - 1) + "(a=1)".len() + "])".len() * (DEPTH - 1));

    let leaf = tree.iter().find(|x| x.is_leaf()).unwrap();
    assert_eq!(leaf.to_tree().to_string(), "(a=1)");
    let below_root = tree.root().unwrap().children().next().unwrap().to_tree();
    assert_eq!(below_root.len(), DEPTH - 1);
    Ok(())
}

#[test]
fn find_totality() -> Result<()> {
    let tree = abc()?;
    for path in &["x", "a.x", "a.b.c.d", "b", "a.b.c.", "", "a..b"] {
        assert!(tree.find(path).is_none(), "{:?}", path);
    }
    // No prefix matching.
    assert!(tree.find("a.b.").is_none());
    assert!(tree.find("a.bb").is_none());
    Ok(())
}

#[test]
fn relative_lookup() -> Result<()> {
    let mut tree = Tree::new();
    tree.insert("redis.names", "cache1")?;
    tree.insert("redis.config.spec", "maximumSize=10")?;
    assert_eq!(tree.relative_value(".names").unwrap(), "cache1");
    assert_eq!(tree.relative_value("config.spec").unwrap(), "maximumSize=10");
    assert!(tree.relative_value(".config").is_none());
    assert!(tree.relative_value("redis.names").is_none());
    assert_eq!(tree.find_relative(".").unwrap().key(), "redis");
    Ok(())
}

#[test]
fn traversal_order() -> Result<()> {
    let mut tree = Tree::new();
    tree.insert("a.b.c", 1)?;
    tree.insert("a.e", 2)?;
    tree.insert("a.b.d", 3)?;
    let mut visited = Vec::new();
    tree.traverse(|node| visited.push(node.dotted_path()));
    assert_eq!(visited, ["a", "a.b", "a.b.c", "a.b.d", "a.e"]);

    let first_leaf = tree.iter().find(|x| x.is_leaf()).unwrap();
    assert_eq!(first_leaf.key(), "c");
    Ok(())
}

#[test]
fn apply_contexts() -> Result<()> {
    let mut tree = Tree::new();
    tree.insert("a.b.c", "1")?;
    tree.insert("a.b.d", "2")?;
    tree.insert("a.b.d", "3")?;

    let count = tree.apply(|_, count: &mut usize| *count += 1, 0);
    assert_eq!(count, 4);

    let properties = tree.apply(
        |node: NodeRef<'_>, map: &mut BTreeMap<String, String>| {
            if let Some(value) = node.value() {
                map.insert(node.dotted_path(), value.to_string());
            }
        },
        BTreeMap::new(),
    );
    assert_eq!(properties.len(), 2);
    assert_eq!(properties["a.b.d"], "3");

    let leaves = tree.apply(
        |node, leaves: &mut Vec<_>| {
            if node.is_leaf() {
                leaves.push(node.key());
            }
        },
        Vec::new(),
    );
    assert_eq!(leaves, ["c", "d"]);
    Ok(())
}

#[test]
fn children_are_read_only_views() -> Result<()> {
    let tree = abc()?;
    let b = tree.find("a.b").unwrap();
    let children = b.children();
    assert_eq!(children.len(), 3);
    let keys = children.rev().map(|x| x.key()).collect::<Vec<_>>();
    assert_eq!(keys, ["a", "d", "c"]);
    assert!(b.has_child("d"));
    assert!(!b.has_child("e"));
    assert_eq!(tree.find("a.b.c").unwrap().children().len(), 0);
    assert!(!tree.find("a.b.c").unwrap().has_child("c"));
    Ok(())
}

#[test]
fn widening() -> Result<()> {
    let mut tree = Tree::new();
    tree.insert("redis[0].names", "cache1")?;
    assert!(!tree.root().unwrap().is_anonymous());
    tree.insert("redis[1].names", "cache2")?;
    let root = tree.root().unwrap();
    assert!(root.is_anonymous());
    assert_eq!(root.key(), "");
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.to_string(), "[(redis[0],[(names=cache1)]), (redis[1],[(names=cache2)])]");

    let first = tree.find("redis[0]").unwrap();
    assert!(first.is_root());
    assert_eq!(tree.find("redis[0].names").unwrap().path(), ["redis[0]", "names"]);
    assert!(tree.find("").is_none());
    assert_eq!(tree.value("redis[1].names").unwrap(), "cache2");
    assert_eq!(tree.relative_value("redis[1].names").unwrap(), "cache2");

    // Inserting under an existing top-level key keeps a single transparent root.
    tree.insert("redis[0].ttl", 600)?;
    tree.insert("caffeine[0].names", "cache3")?;
    assert_eq!(tree.root().unwrap().children().len(), 3);
    assert_eq!(tree.find("redis[0]").unwrap().children().len(), 2);
    assert!(tree.iter().all(|x| !x.is_anonymous()));
    Ok(())
}

#[test]
fn with_root() -> Result<()> {
    let mut tree = Tree::with_root("caches")?;
    assert!(!tree.is_empty());
    assert_eq!(tree.to_string(), "(caches,[])");
    tree.insert("caches.redis.ttl", 1)?;
    assert_eq!(tree.len(), 3);
    Ok(())
}

#[test]
fn add_child() -> Result<()> {
    let mut tree = Tree::new();
    tree.insert("caches.redis.names", "old")?;
    tree.insert("caches.redis.ttl", 60)?;
    tree.insert("caches.caffeine.names", "kept")?;

    let mut other = Tree::new();
    other.insert("redis.names", "new")?;
    tree.root_mut()
        .unwrap()
        .add_child(other.root().unwrap())?;
    // Replaced in place, along with the old children.
    let keys = tree.root().unwrap().children().map(|x| x.key()).collect::<Vec<_>>();
    assert_eq!(keys, ["redis", "caffeine"]);
    assert_eq!(tree.value("caches.redis.names").unwrap(), "new");
    assert!(tree.find("caches.redis.ttl").is_none());
    assert_eq!(tree.find("caches.redis.names").unwrap().parent().unwrap().key(), "redis");
    assert_eq!(tree.len(), 5);

    // The source is untouched.
    assert_eq!(other.value("redis.names").unwrap(), "new");

    let mut leaf = tree.find_mut("caches.redis.names").unwrap();
    match leaf.add_child(other.root().unwrap()) {
        Err(TreeError::NotInner { key }) => assert_eq!(key, "names"),
        other => panic!("added a child to a leaf: {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[test]
fn add_anonymous_child() -> Result<()> {
    let mut tree = Tree::with_root("caches")?;
    let groups = Tree::from_entries(vec![("a[0].x", 1), ("b[0].x", 2)])?;
    tree.root_mut().unwrap().add_child(groups.root().unwrap())?;
    assert_eq!(tree.to_string(), "(caches,[(a[0],[(x=1)]), (b[0],[(x=2)])])");

    let mut caches = tree.root_mut().unwrap();
    let mut a = caches.find_child_mut("a[0]").unwrap();
    a.add_child(groups.find("b[0].x").unwrap())?;
    assert_eq!(a.as_ref().children().len(), 1);
    assert_eq!(tree.value("caches.a[0].x").unwrap().as_i64(), Some(2));
    Ok(())
}

#[test]
fn subtree_copies() -> Result<()> {
    let tree = abc()?;
    let b = tree.find("a.b").unwrap().to_tree();
    assert_eq!(b.to_string(), "(b,[(c=1), (d=2), (a=3)])");
    assert!(b.root().unwrap().parent().is_none());
    assert_eq!(b.find("b.c").unwrap().dotted_path(), "b.c");
    assert_ne!(b, tree);
    assert_eq!(b, b.clone());
    Ok(())
}

#[test]
fn deep_equality() -> Result<()> {
    let mut a = Tree::new();
    a.insert("x.b", 1)?;
    a.insert("x.c", 2)?;
    let mut b = Tree::new();
    b.insert("x.c", 2)?;
    b.insert("x.b", 1)?;
    // Child order is part of the shape.
    assert_ne!(a, b);
    let mut c = Tree::new();
    c.insert("x.b", 1)?;
    c.insert("x.c", 3)?;
    assert_ne!(a, c);
    c.insert("x.c", 2)?;
    assert_eq!(a, c);
    Ok(())
}

#[test]
fn typed_values() -> Result<()> {
    let mut tree = Tree::new();
    tree.insert("redis.ttl", 600)?;
    tree.insert("redis.stats", true)?;
    tree.insert("redis.ratio", 0.75)?;
    assert_eq!(tree.value("redis.ttl").and_then(Scalar::as_i64), Some(600));
    assert_eq!(tree.value("redis.stats").and_then(Scalar::as_bool), Some(true));
    assert_eq!(tree.value("redis.ratio").and_then(Scalar::as_f64), Some(0.75));
    assert_eq!(tree.to_string(), "(redis,[(ttl=600), (stats=true), (ratio=0.75)])");
    Ok(())
}

#[test]
fn concurrent_reads() -> Result<()> {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Tree>();
    assert_send_sync::<NodeRef<'static>>();

    let mut tree = Tree::new();
    for i in 0..16 {
        tree.insert(&format!("caches.redis[{}].names", i), format!("cache{}", i))?;
    }
    let tree = Arc::new(tree);
    let handles = (0..4)
        .map(|_| {
            let tree = Arc::clone(&tree);
            std::thread::spawn(move || {
                (0..16)
                    .filter(|i| {
                        let path = format!("caches.redis[{}].names", i);
                        tree.value(&path).and_then(Scalar::as_str) == Some(&*format!("cache{}", i))
                    })
                    .count()
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        assert_eq!(handle.join().expect("reader thread panicked"), 16);
    }
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn flat_map_serialization() -> Result<()> {
    let mut tree = Tree::new();
    tree.insert("redis[0].names", "cache1")?;
    tree.insert("redis[0].ttl", 600)?;
    tree.insert("redis[1].stats", true)?;
    let json = serde_json::to_string(&tree).expect("serializable");
    assert_eq!(
        json,
        r#"{"redis[0].names":"cache1","redis[0].ttl":600,"redis[1].stats":true}"#,
    );
    let back: Tree = serde_json::from_str(&json).expect("deserializable");
    assert_eq!(back, tree);

    let invalid = serde_json::from_str::<Tree>(r#"{"a..b": 1}"#);
    assert!(invalid.is_err());
    Ok(())
}

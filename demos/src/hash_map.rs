#[cfg(test)]
mod examples {
    use assoc::{Error, HashMap};

    #[test]
    fn single_threaded() {
        let workload_size = 128;
        let mut hashmap: HashMap<isize, isize> = HashMap::new();
        for i in 1..workload_size {
            if i % 2 == 0 {
                assert!(hashmap.put(-i, i).is_none());
            } else {
                assert!(hashmap.put(i, i).is_none());
            }
        }
        for i in 1..workload_size {
            if i % 2 == 0 {
                assert!(hashmap.get(&i).is_none());
                assert!(hashmap.get(&-i).is_some());
            } else {
                assert!(hashmap.get(&i).is_some());
                assert!(hashmap.get(&-i).is_none());
            }
        }
        for i in 1..workload_size {
            if i % 2 == 0 {
                assert!(hashmap.remove(&i).is_none());
                assert!(hashmap.remove(&-i).is_some());
                assert!(hashmap.remove(&-i).is_none());
            } else {
                assert!(hashmap.remove(&-i).is_none());
                assert!(hashmap.remove(&i).is_some());
                assert!(hashmap.remove(&i).is_none());
            }
        }
        assert!(hashmap.is_empty());
    }

    #[test]
    fn word_count() {
        let text = "the quick brown fox jumps over the lazy dog the end";
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for word in text.split_whitespace() {
            if let Some(count) = counts.get_mut(word) {
                *count += 1;
            } else {
                counts.put(word, 1);
            }
        }
        assert_eq!(counts.get("the"), Some(&3));
        assert_eq!(counts.len(), 9);
    }

    #[test]
    fn prune_while_iterating() {
        let mut hashmap: HashMap<u32, u32> = (0..100).map(|k| (k, k * k)).collect();
        let mut cursor = hashmap.cursor();
        while let Some((_, v)) = cursor.next(&hashmap).unwrap() {
            if v % 2 == 1 {
                cursor.remove(&mut hashmap).unwrap();
            }
        }
        assert_eq!(hashmap.len(), 50);

        let mut cursor = hashmap.cursor();
        hashmap.put(1000, 0);
        assert_eq!(cursor.next(&hashmap), Err(Error::StructuralChange));
    }
}

#![no_main]

use libfuzzer_sys::fuzz_target;
use memolru::LruCache;

#[derive(Debug)]
enum CacheOperation {
    Put(u8, u8),
    Get(u8),
    Peek(u8),
    Remove(u8),
    Pop,
    Clear,
    GetOrInsertWith(u8, u8),
    Iter,
}

impl<'a> arbitrary::Arbitrary<'a> for CacheOperation {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        match u.int_in_range(0..=7)? {
            0 => Ok(CacheOperation::Put(u.arbitrary()?, u.arbitrary()?)),
            1 => Ok(CacheOperation::Get(u.arbitrary()?)),
            2 => Ok(CacheOperation::Peek(u.arbitrary()?)),
            3 => Ok(CacheOperation::Remove(u.arbitrary()?)),
            4 => Ok(CacheOperation::Pop),
            5 => Ok(CacheOperation::Clear),
            6 => Ok(CacheOperation::GetOrInsertWith(
                u.arbitrary()?,
                u.arbitrary()?,
            )),
            7 => Ok(CacheOperation::Iter),
            _ => unreachable!(),
        }
    }
}

/// Vec-backed reference: entries ordered least- to most-recently used.
struct Model {
    capacity: usize,
    entries: Vec<(u8, u8)>,
}

impl Model {
    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|&(k, _)| k == key)
    }

    fn touch(&mut self, pos: usize) {
        let entry = self.entries.remove(pos);
        self.entries.push(entry);
    }

    fn put(&mut self, key: u8, value: u8) {
        if let Some(pos) = self.position(key) {
            self.entries.remove(pos);
        } else if self.entries.len() == self.capacity {
            self.entries.remove(0);
        }
        self.entries.push((key, value));
    }
}

fuzz_target!(|data: (u8, Vec<CacheOperation>)| {
    let (capacity_raw, operations) = data;

    let capacity = (capacity_raw % 8).max(1) as usize;
    let mut cache = LruCache::<u8, u8>::new(capacity).unwrap();
    let mut model = Model {
        capacity,
        entries: Vec::new(),
    };

    for op in operations {
        match op {
            CacheOperation::Put(key, value) => {
                let contained_before = cache.contains_key(&key);
                let replaced = cache.put(key, value);
                assert_eq!(replaced.is_some(), contained_before);
                model.put(key, value);

                assert!(cache.contains_key(&key));
                assert_eq!(cache.peek(&key), Some(&value));
            }

            CacheOperation::Get(key) => {
                let expected = model.position(key);
                let result = cache.get(&key).copied();
                match expected {
                    Some(pos) => {
                        assert_eq!(result, Some(model.entries[pos].1));
                        model.touch(pos);
                    }
                    None => assert_eq!(result, None),
                }
            }

            CacheOperation::Peek(key) => {
                let expected = model.position(key).map(|pos| model.entries[pos].1);
                assert_eq!(cache.peek(&key).copied(), expected);
            }

            CacheOperation::Remove(key) => {
                let expected = model
                    .position(key)
                    .map(|pos| model.entries.remove(pos).1);
                assert_eq!(cache.remove(&key), expected);
                assert!(!cache.contains_key(&key));
            }

            CacheOperation::Pop => {
                let expected = if model.entries.is_empty() {
                    None
                } else {
                    Some(model.entries.remove(0))
                };
                assert_eq!(cache.pop(), expected);
            }

            CacheOperation::Clear => {
                cache.clear();
                model.entries.clear();
                assert!(cache.is_empty());
            }

            CacheOperation::GetOrInsertWith(key, value) => {
                let expected = model.position(key);
                let result = *cache.get_or_insert_with(key, |_| value);
                match expected {
                    Some(pos) => {
                        assert_eq!(result, model.entries[pos].1);
                        model.touch(pos);
                    }
                    None => {
                        assert_eq!(result, value);
                        model.put(key, value);
                    }
                }
            }

            CacheOperation::Iter => {
                let entries: Vec<_> = cache.iter().map(|(&k, &v)| (k, v)).collect();
                assert_eq!(entries, model.entries);
            }
        }

        assert!(cache.len() <= cache.capacity());
        assert_eq!(cache.capacity(), capacity);
        assert_eq!(cache.len(), model.entries.len());
        assert_eq!(cache.is_empty(), model.entries.is_empty());
        assert_eq!(cache.tail().map(|(&k, &v)| (k, v)), model.entries.first().copied());
    }
});

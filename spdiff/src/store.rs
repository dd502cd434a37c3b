//! Hash-consing of composite terms.

use crate::term::{mix, tag_key, Comb, Key, RTerm, Term};
use fnv::FnvHashMap;
use std::rc::Rc;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// the children given for a tag do not form a valid term
    InvalidTerm,
}

/// Table of all composite terms constructed in a session.
///
/// Every composite is interned exactly once:
/// constructing a composite that is structurally equal to
/// a previously constructed one yields the previous instance.
/// Composites are indexed by their key; because different composites
/// may share the same key, every key maps to a bucket of composites,
/// which is searched for a structurally equal composite.
pub struct Store {
    table: FnvHashMap<Key, Vec<RTerm>>,
    mask: Key,
    collisions: usize,
}

impl Default for Store {
    fn default() -> Self {
        Self::with_key_bits(Key::BITS)
    }
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose keys retain only the lowest `bits` bits.
    ///
    /// ~~~
    /// # use spdiff::{Store, Term};
    /// let mut store = Store::with_key_bits(0);
    /// let f1 = store.intern("f".into(), vec![Term::int(1)]);
    /// let f2 = store.intern("f".into(), vec![Term::int(2)]);
    /// assert_eq!(f1.key(), f2.key());
    /// assert!(!f1.ptr_eq(&f2));
    /// assert_eq!(store.collisions(), 1);
    /// ~~~
    pub fn with_key_bits(bits: u32) -> Self {
        let mask = if bits >= Key::BITS {
            Key::MAX
        } else {
            (1 << bits) - 1
        };
        Self {
            table: Default::default(),
            mask,
            collisions: 0,
        }
    }

    /// Return the unique composite with the given tag and arguments.
    pub fn intern(&mut self, tag: Rc<str>, args: Vec<Term>) -> RTerm {
        let key = args.iter().fold(tag_key(&tag), |acc, a| mix(acc, a.key())) & self.mask;
        let bucket = self.table.entry(key).or_default();
        if let Some(tm) = bucket.iter().find(|c| c.tag == tag && c.args == args) {
            return tm.clone();
        }
        if !bucket.is_empty() {
            trace!("key collision on {} for {}", key, tag);
            self.collisions += 1;
        }
        let size = 1 + args.iter().map(Term::size).sum::<usize>();
        let ground = args.iter().all(Term::is_ground);
        let tm = RTerm::new(Comb {
            tag,
            args,
            key,
            size,
            ground,
        });
        bucket.push(tm.clone());
        tm
    }

    /// Number of distinct composites.
    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of composites that were inserted into a non-empty bucket.
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

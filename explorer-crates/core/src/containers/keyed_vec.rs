use std::collections::TryReserveError;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

/// A typed index into a [`KeyedVec`].
pub trait StorageKey: Copy {
    fn index(&self) -> usize;

    fn create_from_index(index: usize) -> Self;
}

/// An append-only vector which can only be indexed by `Key`.
///
/// The search tree keeps its nodes and its best-solution history in one. Values are never removed,
/// so a key returned by [`KeyedVec::push`] stays valid for as long as the vector lives.
#[derive(Debug)]
pub struct KeyedVec<Key, Value> {
    values: Vec<Value>,
    key: PhantomData<Key>,
}

impl<Key, Value> Default for KeyedVec<Key, Value> {
    fn default() -> Self {
        KeyedVec {
            values: Vec::new(),
            key: PhantomData,
        }
    }
}

impl<Key, Value: Clone> Clone for KeyedVec<Key, Value> {
    fn clone(&self) -> Self {
        KeyedVec {
            values: self.values.clone(),
            key: PhantomData,
        }
    }
}

impl<Key: StorageKey, Value> KeyedVec<Key, Value> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append `value`, returning the key under which it is stored.
    pub fn push(&mut self, value: Value) -> Key {
        let key = self.next_key();
        self.values.push(value);
        key
    }

    pub fn next_key(&self) -> Key {
        Key::create_from_index(self.values.len())
    }

    /// Make room for `additional` values without aborting the process when memory runs out.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.values.try_reserve_exact(additional)
    }

    pub fn get(&self, key: Key) -> Option<&Value> {
        self.values.get(key.index())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> {
        (0..self.values.len()).map(Key::create_from_index)
    }
}

impl<Key: StorageKey, Value> Index<Key> for KeyedVec<Key, Value> {
    type Output = Value;

    fn index(&self, key: Key) -> &Value {
        &self.values[key.index()]
    }
}

impl<Key: StorageKey, Value> IndexMut<Key> for KeyedVec<Key, Value> {
    fn index_mut(&mut self, key: Key) -> &mut Value {
        &mut self.values[key.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Slot(u32);

    impl StorageKey for Slot {
        fn index(&self) -> usize {
            self.0 as usize
        }

        fn create_from_index(index: usize) -> Self {
            Slot(index as u32)
        }
    }

    #[test]
    fn keys_stay_valid_after_later_pushes() {
        let mut slots: KeyedVec<Slot, &str> = KeyedVec::default();

        let root = slots.push("root");
        let child = slots.push("child");
        slots[root] = "closed root";

        assert_eq!("closed root", slots[root]);
        assert_eq!("child", slots[child]);
        assert_eq!(vec![Slot(0), Slot(1)], slots.keys().collect::<Vec<_>>());
    }

    #[test]
    fn next_key_is_the_key_of_the_next_push() {
        let mut slots: KeyedVec<Slot, i32> = KeyedVec::default();
        let _ = slots.push(3);

        let predicted = slots.next_key();

        assert_eq!(predicted, slots.push(4));
        assert_eq!(None, slots.get(Slot(2)));
        assert_eq!(Some(&4), slots.get(predicted));
    }
}
